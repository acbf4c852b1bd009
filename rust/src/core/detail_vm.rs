use flume::Sender;

use crate::repository::{
    current_repository, AnnounceRepository, RepositoryError, SharedAnnounceRepository,
};
use crate::state::{Announce, UserProfile};
use crate::updates::{CoreMsg, InternalEvent};

/// Which published field a repository result changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VmField {
    Favourite,
    SellerProfile,
    CurrentUserProfile,
}

/// View model owned by one detail screen. Requests run on the runtime's blocking
/// pool and come back through the actor channel; fields only change in `apply`.
pub(crate) struct AnnounceDetailVm {
    screen_id: String,
    runtime: tokio::runtime::Handle,
    core_sender: Sender<CoreMsg>,
    repository: SharedAnnounceRepository,

    is_favourite: bool,
    seller_profile: UserProfile,
    current_user_profile: UserProfile,

    // Toggles issued so far. Once non-zero, status fetches are stale.
    toggles_requested: u64,
}

impl AnnounceDetailVm {
    pub(crate) fn new(
        screen_id: String,
        runtime: tokio::runtime::Handle,
        core_sender: Sender<CoreMsg>,
        repository: SharedAnnounceRepository,
    ) -> Self {
        Self {
            screen_id,
            runtime,
            core_sender,
            repository,
            is_favourite: false,
            seller_profile: UserProfile::empty(),
            current_user_profile: UserProfile::empty(),
            toggles_requested: 0,
        }
    }

    pub(crate) fn is_favourite(&self) -> bool {
        self.is_favourite
    }

    pub(crate) fn seller_profile(&self) -> &UserProfile {
        &self.seller_profile
    }

    pub(crate) fn current_user_profile(&self) -> &UserProfile {
        &self.current_user_profile
    }

    pub(crate) fn fetch_favourite_status(&self, announce: &Announce) {
        let announce = announce.clone();
        self.spawn_request(
            "fetch_favourite_status",
            move |repo| repo.is_favourite(announce),
            |screen_id, result| InternalEvent::FavouriteStatusFetched { screen_id, result },
        );
    }

    pub(crate) fn fetch_seller_profile(&self, announce: &Announce) {
        let announce = announce.clone();
        self.spawn_request(
            "fetch_seller_profile",
            move |repo| repo.seller_profile(announce),
            |screen_id, result| InternalEvent::SellerProfileFetched { screen_id, result },
        );
    }

    pub(crate) fn fetch_current_user_profile(&self) {
        self.spawn_request(
            "fetch_current_user_profile",
            |repo| repo.current_user_profile(),
            |screen_id, result| InternalEvent::CurrentUserProfileFetched { screen_id, result },
        );
    }

    pub(crate) fn toggle_favourite(&mut self, announce: &Announce) {
        self.toggles_requested += 1;
        let announce = announce.clone();
        self.spawn_request(
            "toggle_favourite",
            move |repo| repo.toggle_favourite(announce),
            |screen_id, result| InternalEvent::FavouriteToggled { screen_id, result },
        );
    }

    fn spawn_request<T, F, W>(&self, request: &'static str, call: F, wrap: W)
    where
        T: Send + 'static,
        F: FnOnce(&dyn AnnounceRepository) -> Result<T, RepositoryError> + Send + 'static,
        W: FnOnce(String, Result<T, RepositoryError>) -> InternalEvent + Send + 'static,
    {
        let Some(repo) = current_repository(&self.repository) else {
            tracing::warn!(
                screen_id = %self.screen_id,
                request,
                "no repository set; request skipped"
            );
            return;
        };
        let tx = self.core_sender.clone();
        let screen_id = self.screen_id.clone();
        tracing::debug!(%screen_id, request, "repository request");
        self.runtime.spawn_blocking(move || {
            let result = call(repo.as_ref());
            let _ = tx.send(CoreMsg::Internal(Box::new(wrap(screen_id, result))));
        });
    }

    /// Store a repository result. Returns the field that was published, or
    /// `None` when the request failed and the field kept its value.
    pub(crate) fn apply(&mut self, event: InternalEvent) -> Option<VmField> {
        let tag = event.tag();
        match event {
            InternalEvent::FavouriteStatusFetched { .. } if self.toggles_requested > 0 => {
                tracing::debug!(
                    screen_id = %self.screen_id,
                    toggles = self.toggles_requested,
                    "dropping status fetch older than a toggle"
                );
                None
            }
            InternalEvent::FavouriteStatusFetched { result, .. }
            | InternalEvent::FavouriteToggled { result, .. } => match result {
                Ok(is_favourite) => {
                    tracing::debug!(
                        screen_id = %self.screen_id,
                        is_favourite,
                        event = tag,
                        "favourite published"
                    );
                    self.is_favourite = is_favourite;
                    Some(VmField::Favourite)
                }
                Err(e) => {
                    tracing::warn!(
                        screen_id = %self.screen_id,
                        %e,
                        event = tag,
                        "favourite request failed"
                    );
                    None
                }
            },
            InternalEvent::SellerProfileFetched { result, .. } => match result {
                Ok(profile) => {
                    self.seller_profile = profile;
                    Some(VmField::SellerProfile)
                }
                Err(e) => {
                    tracing::warn!(
                        screen_id = %self.screen_id,
                        %e,
                        "seller profile fetch failed"
                    );
                    None
                }
            },
            InternalEvent::CurrentUserProfileFetched { result, .. } => match result {
                Ok(profile) => {
                    self.current_user_profile = profile;
                    Some(VmField::CurrentUserProfile)
                }
                Err(e) => {
                    tracing::warn!(
                        screen_id = %self.screen_id,
                        %e,
                        "current user profile fetch failed"
                    );
                    None
                }
            },
        }
    }
}
