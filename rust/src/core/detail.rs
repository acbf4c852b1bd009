use super::config::DisplayConfig;
use super::detail_vm::{AnnounceDetailVm, VmField};
use super::format::{format_price, format_timestamp};
use crate::state::{
    Announce, AnnounceDetailViewState, HeartIcon, ImageSlot, IndicatorDot, Screen, UserProfile,
};
use crate::updates::InternalEvent;

/// What a tap on the heart or message button asks the core to do next.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TapOutcome {
    /// The screen has not been shown yet; the tap did nothing.
    Ignored,
    PresentLogin,
    FavouriteToggleRequested,
    OpenChat(Screen),
}

/// Controller for one announce detail screen: owns the announce, the photo
/// index, the scoped view model, and the render model native code draws.
pub(crate) struct AnnounceDetailScreen {
    announce: Announce,
    image_displayed: u32,
    shown: bool,
    vm: AnnounceDetailVm,
    display: DisplayConfig,
    view: AnnounceDetailViewState,
}

impl AnnounceDetailScreen {
    pub(crate) fn new(
        screen_id: String,
        announce: Announce,
        vm: AnnounceDetailVm,
        display: DisplayConfig,
    ) -> Self {
        let view = AnnounceDetailViewState {
            screen_id,
            announce_id: announce.id.clone().unwrap_or_default(),
            title: String::new(),
            price_text: String::new(),
            date_text: None,
            description: String::new(),
            condition: String::new(),
            delivery: String::new(),
            top_image: ImageSlot::placeholder(&display.placeholder_image),
            image_displayed: 0,
            image_count: image_count(&announce),
            photo_indicator: vec![],
            heart: None,
            seller_name: String::new(),
            seller_avatar: ImageSlot::placeholder(&display.placeholder_image),
            swipe_enabled: false,
        };
        Self {
            announce,
            image_displayed: 0,
            shown: false,
            vm,
            display,
            view,
        }
    }

    pub(crate) fn screen_id(&self) -> &str {
        &self.view.screen_id
    }

    pub(crate) fn view(&self) -> &AnnounceDetailViewState {
        &self.view
    }

    #[cfg(test)]
    pub(crate) fn image_displayed(&self) -> u32 {
        self.image_displayed
    }

    /// First appearance. Returns `false` if the screen was already shown.
    pub(crate) fn on_show(&mut self) -> bool {
        if self.shown {
            return false;
        }
        self.shown = true;

        self.vm.fetch_favourite_status(&self.announce);
        self.vm.fetch_seller_profile(&self.announce);
        self.vm.fetch_current_user_profile();

        self.view.swipe_enabled = true;
        self.render_photo_indicator();
        self.render_static_fields();

        // Subscribing replays the current value of each field.
        let seller = self.vm.seller_profile().clone();
        self.on_seller_profile_changed(&seller);
        self.on_favourite_changed(self.vm.is_favourite());
        true
    }

    pub(crate) fn render_static_fields(&mut self) {
        self.view.top_image = self.image_slot_at(0);
        self.view.title = self.announce.title.clone();
        self.view.price_text = format_price(self.announce.price, &self.display.currency_suffix);
        self.view.date_text = self
            .announce
            .last_updated_at
            .and_then(|ts| format_timestamp(ts, &self.display.date_format));
        self.view.description = self.announce.description.clone();
        self.view.condition = self.announce.condition.clone();
        self.view.delivery = self.announce.delivery_type.clone();
    }

    pub(crate) fn on_seller_profile_changed(&mut self, profile: &UserProfile) {
        self.view.seller_avatar =
            ImageSlot::from_url(&profile.profile_picture_url, &self.display.placeholder_image);
        self.view.seller_name = profile.pseudo.clone();
    }

    /// The emitted value is ignored; the heart always mirrors the view model's
    /// flag at the time of the redraw.
    pub(crate) fn on_favourite_changed(&mut self, _emitted: bool) {
        self.view.heart = Some(HeartIcon::for_favourite(self.vm.is_favourite()));
    }

    /// Swipe towards the next photo. No-op on the last one.
    pub(crate) fn swipe_left(&mut self) -> bool {
        if !self.view.swipe_enabled || self.image_displayed + 1 >= image_count(&self.announce) {
            return false;
        }
        self.show_photo(self.image_displayed + 1);
        true
    }

    /// Swipe back towards the previous photo. No-op on the first one.
    pub(crate) fn swipe_right(&mut self) -> bool {
        if !self.view.swipe_enabled || self.image_displayed == 0 {
            return false;
        }
        self.show_photo(self.image_displayed - 1);
        true
    }

    fn show_photo(&mut self, index: u32) {
        self.view.top_image = self.image_slot_at(index);
        self.image_displayed = index;
        self.render_photo_indicator();
    }

    pub(crate) fn render_photo_indicator(&mut self) {
        let active_size = self.display.indicator_active_size;
        let inactive_size = self.display.indicator_inactive_size;
        self.view.image_displayed = self.image_displayed;
        self.view.photo_indicator = (0..image_count(&self.announce))
            .map(|index| {
                let active = index == self.image_displayed;
                IndicatorDot {
                    index,
                    active,
                    size: if active { active_size } else { inactive_size },
                }
            })
            .collect();
    }

    pub(crate) fn heart_tapped(&mut self, is_logged_in: bool) -> TapOutcome {
        if !self.shown {
            return TapOutcome::Ignored;
        }
        if !is_logged_in {
            return TapOutcome::PresentLogin;
        }
        self.vm.toggle_favourite(&self.announce);
        TapOutcome::FavouriteToggleRequested
    }

    pub(crate) fn message_tapped(&self, is_logged_in: bool) -> TapOutcome {
        if !self.shown {
            return TapOutcome::Ignored;
        }
        if !is_logged_in {
            return TapOutcome::PresentLogin;
        }
        TapOutcome::OpenChat(Screen::Chat {
            announce_id: self.announce.id.clone().unwrap_or_default(),
            other_user: self.vm.seller_profile().clone(),
            current_user: self.vm.current_user_profile().clone(),
        })
    }

    pub(crate) fn buy_tapped(&self) {
        tracing::debug!(screen_id = %self.view.screen_id, "buy not available yet");
    }

    /// Route a repository result through the view model, then notify the
    /// subscriber of whichever field changed. Before the first show there are
    /// no subscribers; the value is replayed on subscribe.
    pub(crate) fn apply_vm_event(&mut self, event: InternalEvent) {
        let Some(field) = self.vm.apply(event) else {
            return;
        };
        if !self.shown {
            return;
        }
        match field {
            VmField::Favourite => self.on_favourite_changed(self.vm.is_favourite()),
            VmField::SellerProfile => {
                let seller = self.vm.seller_profile().clone();
                self.on_seller_profile_changed(&seller);
            }
            VmField::CurrentUserProfile => {}
        }
    }

    fn image_slot_at(&self, index: u32) -> ImageSlot {
        match self.announce.image_refs.get(index as usize) {
            Some(url) => ImageSlot::from_url(url, &self.display.placeholder_image),
            None => ImageSlot::placeholder(&self.display.placeholder_image),
        }
    }
}

fn image_count(announce: &Announce) -> u32 {
    u32::try_from(announce.image_refs.len()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, RwLock};
    use std::time::Duration;

    use super::*;
    use crate::repository::{AnnounceRepository, RepositoryError, SharedAnnounceRepository};
    use crate::updates::CoreMsg;

    #[derive(Default)]
    struct RecordingRepository {
        toggles: Mutex<u32>,
    }

    impl AnnounceRepository for RecordingRepository {
        fn is_favourite(&self, _announce: Announce) -> Result<bool, RepositoryError> {
            Ok(false)
        }

        fn seller_profile(&self, _announce: Announce) -> Result<UserProfile, RepositoryError> {
            Ok(UserProfile::empty())
        }

        fn current_user_profile(&self) -> Result<UserProfile, RepositoryError> {
            Ok(UserProfile::empty())
        }

        fn toggle_favourite(&self, _announce: Announce) -> Result<bool, RepositoryError> {
            let mut n = self.toggles.lock().unwrap();
            *n += 1;
            Ok(*n % 2 == 1)
        }
    }

    struct Harness {
        _runtime: tokio::runtime::Runtime,
        core_rx: flume::Receiver<CoreMsg>,
        repo: Arc<RecordingRepository>,
        screen: AnnounceDetailScreen,
    }

    fn announce(image_count: usize) -> Announce {
        Announce {
            id: Some("announce-1".into()),
            user_id: "seller-1".into(),
            title: "Vintage bike".into(),
            price: 120.0,
            last_updated_at: None,
            description: "Barely used".into(),
            condition: "Good".into(),
            delivery_type: "Hand delivery".into(),
            image_refs: (0..image_count)
                .map(|i| format!("https://img.local/{i}.jpg"))
                .collect(),
        }
    }

    fn harness(announce: Announce) -> Harness {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let (core_tx, core_rx) = flume::unbounded();
        let repo = Arc::new(RecordingRepository::default());
        let slot: SharedAnnounceRepository =
            Arc::new(RwLock::new(Some(repo.clone() as Arc<dyn AnnounceRepository>)));
        let vm = AnnounceDetailVm::new(
            "screen-1".into(),
            runtime.handle().clone(),
            core_tx,
            slot,
        );
        let screen =
            AnnounceDetailScreen::new("screen-1".into(), announce, vm, DisplayConfig::default());
        Harness {
            _runtime: runtime,
            core_rx,
            repo,
            screen,
        }
    }

    fn recv_internal(rx: &flume::Receiver<CoreMsg>) -> InternalEvent {
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            CoreMsg::Internal(ev) => *ev,
            CoreMsg::Action(a) => panic!("unexpected action {}", a.tag()),
        }
    }

    fn dot_sizes(view: &AnnounceDetailViewState) -> Vec<u32> {
        view.photo_indicator.iter().map(|d| d.size).collect()
    }

    #[test]
    fn swipes_are_ignored_before_show() {
        let mut h = harness(announce(3));
        assert!(!h.screen.swipe_left());
        assert_eq!(h.screen.image_displayed(), 0);
        assert!(h.screen.view().photo_indicator.is_empty());
    }

    #[test]
    fn show_renders_static_fields_and_first_photo() {
        let mut h = harness(announce(3));
        assert!(h.screen.on_show());
        let view = h.screen.view();
        assert_eq!(view.title, "Vintage bike");
        assert_eq!(view.price_text, "120€");
        assert_eq!(view.date_text, None);
        assert_eq!(view.description, "Barely used");
        assert_eq!(view.condition, "Good");
        assert_eq!(view.delivery, "Hand delivery");
        assert_eq!(view.top_image.url.as_deref(), Some("https://img.local/0.jpg"));
        assert_eq!(view.top_image.placeholder, "camera");
        assert_eq!(dot_sizes(view), vec![10, 5, 5]);
        assert_eq!(view.heart, Some(HeartIcon::for_favourite(false)));
        assert!(view.swipe_enabled);

        // Second show is a no-op.
        assert!(!h.screen.on_show());
    }

    #[test]
    fn swipe_left_walks_forward_and_clamps_at_last_photo() {
        let mut h = harness(announce(3));
        h.screen.on_show();

        assert!(h.screen.swipe_left());
        assert!(h.screen.swipe_left());
        assert_eq!(h.screen.image_displayed(), 2);
        assert_eq!(
            h.screen.view().top_image.url.as_deref(),
            Some("https://img.local/2.jpg")
        );

        assert!(!h.screen.swipe_left());
        assert_eq!(h.screen.image_displayed(), 2);
        assert_eq!(dot_sizes(h.screen.view()), vec![5, 5, 10]);
    }

    #[test]
    fn swipe_right_walks_back_and_clamps_at_first_photo() {
        let mut h = harness(announce(4));
        h.screen.on_show();
        assert!(!h.screen.swipe_right());
        assert_eq!(h.screen.image_displayed(), 0);

        for _ in 0..3 {
            h.screen.swipe_left();
        }
        for expected in (0..3).rev() {
            assert!(h.screen.swipe_right());
            assert_eq!(h.screen.image_displayed(), expected);
            assert_eq!(h.screen.view().image_displayed, expected);
        }
        assert!(!h.screen.swipe_right());
    }

    #[test]
    fn every_index_moves_by_one_within_bounds() {
        let count = 5u32;
        for start in 0..count {
            let mut h = harness(announce(count as usize));
            h.screen.on_show();
            for _ in 0..start {
                h.screen.swipe_left();
            }
            assert_eq!(h.screen.image_displayed(), start);

            let moved = h.screen.swipe_left();
            let expected = if start < count - 1 { start + 1 } else { start };
            assert_eq!(moved, start < count - 1);
            assert_eq!(h.screen.image_displayed(), expected);
        }
    }

    #[test]
    fn single_photo_announce_never_moves() {
        let mut h = harness(announce(1));
        h.screen.on_show();
        assert!(!h.screen.swipe_left());
        assert!(!h.screen.swipe_right());
        assert_eq!(dot_sizes(h.screen.view()), vec![10]);
    }

    #[test]
    fn empty_image_list_shows_placeholder_and_no_dots() {
        let mut h = harness(announce(0));
        h.screen.on_show();
        assert_eq!(h.screen.view().top_image.url, None);
        assert!(h.screen.view().photo_indicator.is_empty());
        assert!(!h.screen.swipe_left());
        assert!(!h.screen.swipe_right());
    }

    #[test]
    fn indicator_redraw_is_idempotent() {
        let mut h = harness(announce(3));
        h.screen.on_show();
        h.screen.swipe_left();
        h.screen.render_photo_indicator();
        let first = h.screen.view().photo_indicator.clone();
        h.screen.render_photo_indicator();
        assert_eq!(h.screen.view().photo_indicator, first);
        assert_eq!(first.len(), 3);
        assert_eq!(first.iter().filter(|d| d.active).count(), 1);
    }

    #[test]
    fn heart_ignores_emitted_value() {
        let mut h = harness(announce(2));
        h.screen.on_show();
        h.screen.on_favourite_changed(true);
        assert_eq!(h.screen.view().heart, Some(HeartIcon::for_favourite(false)));

        h.screen.apply_vm_event(InternalEvent::FavouriteStatusFetched {
            screen_id: "screen-1".into(),
            result: Ok(true),
        });
        h.screen.on_favourite_changed(false);
        assert_eq!(h.screen.view().heart, Some(HeartIcon::for_favourite(true)));
    }

    #[test]
    fn failed_fetch_keeps_previous_values() {
        let mut h = harness(announce(2));
        h.screen.on_show();
        h.screen.apply_vm_event(InternalEvent::SellerProfileFetched {
            screen_id: "screen-1".into(),
            result: Ok(UserProfile {
                user_id: "seller-1".into(),
                pseudo: "Ben".into(),
                profile_picture_url: "https://img.local/ben.jpg".into(),
            }),
        });
        h.screen.apply_vm_event(InternalEvent::SellerProfileFetched {
            screen_id: "screen-1".into(),
            result: Err(RepositoryError::Backend {
                message: "offline".into(),
            }),
        });
        assert_eq!(h.screen.view().seller_name, "Ben");
        assert_eq!(
            h.screen.view().seller_avatar.url.as_deref(),
            Some("https://img.local/ben.jpg")
        );
    }

    #[test]
    fn results_before_show_are_replayed_on_subscribe() {
        let mut h = harness(announce(2));
        h.screen.apply_vm_event(InternalEvent::FavouriteStatusFetched {
            screen_id: "screen-1".into(),
            result: Ok(true),
        });
        assert_eq!(h.screen.view().heart, None);
        h.screen.on_show();
        assert_eq!(h.screen.view().heart, Some(HeartIcon::for_favourite(true)));
    }

    #[test]
    fn logged_out_taps_present_login_without_side_effects() {
        let mut h = harness(announce(2));
        h.screen.on_show();
        // Drain the three fetches issued by show.
        for _ in 0..3 {
            recv_internal(&h.core_rx);
        }

        assert_eq!(h.screen.heart_tapped(false), TapOutcome::PresentLogin);
        assert_eq!(h.screen.message_tapped(false), TapOutcome::PresentLogin);
        assert!(h.core_rx.recv_timeout(Duration::from_millis(200)).is_err());
        assert_eq!(*h.repo.toggles.lock().unwrap(), 0);
    }

    #[test]
    fn logged_in_heart_tap_requests_toggle() {
        let mut h = harness(announce(2));
        h.screen.on_show();
        for _ in 0..3 {
            recv_internal(&h.core_rx);
        }

        assert_eq!(
            h.screen.heart_tapped(true),
            TapOutcome::FavouriteToggleRequested
        );
        let ev = recv_internal(&h.core_rx);
        assert!(matches!(
            ev,
            InternalEvent::FavouriteToggled {
                result: Ok(true),
                ..
            }
        ));
        h.screen.apply_vm_event(ev);
        assert_eq!(h.screen.view().heart, Some(HeartIcon::for_favourite(true)));
        assert_eq!(*h.repo.toggles.lock().unwrap(), 1);
    }

    #[test]
    fn logged_in_message_tap_passes_profiles_unchanged() {
        let mut a = announce(2);
        a.id = None;
        let mut h = harness(a);
        let seller = UserProfile {
            user_id: "seller-1".into(),
            pseudo: "Ben".into(),
            profile_picture_url: String::new(),
        };
        let me = UserProfile {
            user_id: "me".into(),
            pseudo: "Alice".into(),
            profile_picture_url: "https://img.local/alice.jpg".into(),
        };
        h.screen.on_show();
        h.screen.apply_vm_event(InternalEvent::SellerProfileFetched {
            screen_id: "screen-1".into(),
            result: Ok(seller.clone()),
        });
        h.screen.apply_vm_event(InternalEvent::CurrentUserProfileFetched {
            screen_id: "screen-1".into(),
            result: Ok(me.clone()),
        });

        assert_eq!(
            h.screen.message_tapped(true),
            TapOutcome::OpenChat(Screen::Chat {
                announce_id: String::new(),
                other_user: seller,
                current_user: me,
            })
        );
    }

    #[test]
    fn taps_before_show_are_ignored() {
        let mut h = harness(announce(2));
        assert_eq!(h.screen.heart_tapped(true), TapOutcome::Ignored);
        assert_eq!(h.screen.message_tapped(true), TapOutcome::Ignored);
        assert_eq!(h.screen.heart_tapped(false), TapOutcome::Ignored);
        assert!(h.core_rx.recv_timeout(Duration::from_millis(200)).is_err());
        assert_eq!(*h.repo.toggles.lock().unwrap(), 0);
        assert_eq!(h.screen.view().heart, None);
    }

    #[test]
    fn status_fetch_landing_after_toggle_is_dropped() {
        let mut h = harness(announce(2));
        h.screen.on_show();
        // Hold the status fetch issued by show; it lands last.
        let mut status = None;
        for _ in 0..3 {
            match recv_internal(&h.core_rx) {
                ev @ InternalEvent::FavouriteStatusFetched { .. } => status = Some(ev),
                ev => h.screen.apply_vm_event(ev),
            }
        }
        let status = status.unwrap();
        assert!(matches!(
            status,
            InternalEvent::FavouriteStatusFetched {
                result: Ok(false),
                ..
            }
        ));

        assert_eq!(
            h.screen.heart_tapped(true),
            TapOutcome::FavouriteToggleRequested
        );
        let toggled = recv_internal(&h.core_rx);
        h.screen.apply_vm_event(toggled);
        assert_eq!(h.screen.view().heart, Some(HeartIcon::for_favourite(true)));

        h.screen.apply_vm_event(status);
        assert_eq!(h.screen.view().heart, Some(HeartIcon::for_favourite(true)));
        assert_eq!(*h.repo.toggles.lock().unwrap(), 1);
    }
}
