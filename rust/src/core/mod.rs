mod config;
mod detail;
mod detail_vm;
mod format;

use std::sync::{Arc, RwLock};

use anyhow::Context;
use flume::Sender;

use crate::actions::AppAction;
use crate::repository::SharedAnnounceRepository;
use crate::state::{Announce, AppState, AuthState, Screen};
use crate::updates::{AppUpdate, CoreMsg, InternalEvent};

use config::DisplayConfig;
use detail::{AnnounceDetailScreen, TapOutcome};
use detail_vm::AnnounceDetailVm;

pub(crate) use config::default_app_config_json;

pub struct AppCore {
    pub state: AppState,
    rev: u64,

    update_sender: Sender<AppUpdate>,
    core_sender: Sender<CoreMsg>,
    shared_state: Arc<RwLock<AppState>>,
    repository: SharedAnnounceRepository,

    display: DisplayConfig,
    runtime: tokio::runtime::Runtime,

    // Open detail screens, in the order they were pushed.
    details: Vec<AnnounceDetailScreen>,
}

impl AppCore {
    pub fn new(
        update_sender: Sender<AppUpdate>,
        core_sender: Sender<CoreMsg>,
        data_dir: String,
        shared_state: Arc<RwLock<AppState>>,
        repository: SharedAnnounceRepository,
    ) -> anyhow::Result<Self> {
        let config = config::load_app_config(&data_dir);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("announce-core")
            .build()
            .context("build tokio runtime")?;

        let this = Self {
            state: AppState::empty(),
            rev: 0,
            update_sender,
            core_sender,
            shared_state,
            repository,
            display: config.display(),
            runtime,
            details: vec![],
        };

        // Ensure FfiApp.state() has an immediately-available snapshot.
        let snapshot = this.state.clone();
        this.commit_state_snapshot(&snapshot);
        Ok(this)
    }

    fn next_rev(&mut self) -> u64 {
        self.rev += 1;
        self.state.rev = self.rev;
        self.rev
    }

    fn commit_state_snapshot(&self, snapshot: &AppState) {
        match self.shared_state.write() {
            Ok(mut g) => *g = snapshot.clone(),
            Err(poison) => *poison.into_inner() = snapshot.clone(),
        }
    }

    fn emit_state(&mut self) {
        self.state.announce_details = self.details.iter().map(|d| d.view().clone()).collect();
        self.next_rev();
        let snapshot = self.state.clone();
        self.commit_state_snapshot(&snapshot);
        let _ = self.update_sender.send(AppUpdate::FullState(snapshot));
    }

    fn is_logged_in(&self) -> bool {
        self.state.auth.is_logged_in()
    }

    fn detail_mut(&mut self, screen_id: &str) -> Option<&mut AnnounceDetailScreen> {
        let found = self.details.iter_mut().find(|d| d.screen_id() == screen_id);
        if found.is_none() {
            tracing::debug!(%screen_id, "no open announce detail for screen id");
        }
        found
    }

    fn push_screen(&mut self, screen: Screen) {
        self.state.router.screen_stack.push(screen);
    }

    fn present_login(&mut self) {
        if self.state.router.screen_stack.last() != Some(&Screen::Login) {
            self.push_screen(Screen::Login);
        }
    }

    /// Tear down detail screens that are no longer on the router stack. Their
    /// view models go with them, so late repository results find nothing.
    fn sync_details_to_router(&mut self) {
        let stack = &self.state.router.screen_stack;
        self.details.retain(|d| {
            let keep = stack.iter().any(|s| {
                matches!(s, Screen::AnnounceDetail { screen_id, .. } if screen_id == d.screen_id())
            });
            if !keep {
                tracing::info!(screen_id = %d.screen_id(), "announce detail torn down");
            }
            keep
        });
    }

    fn open_announce(&mut self, announce: Announce) {
        let screen_id = uuid::Uuid::new_v4().to_string();
        let announce_id = announce.id.clone().unwrap_or_default();
        tracing::info!(
            %screen_id,
            %announce_id,
            images = announce.image_refs.len(),
            "open announce detail"
        );

        let vm = AnnounceDetailVm::new(
            screen_id.clone(),
            self.runtime.handle().clone(),
            self.core_sender.clone(),
            self.repository.clone(),
        );
        self.details.push(AnnounceDetailScreen::new(
            screen_id.clone(),
            announce,
            vm,
            self.display.clone(),
        ));
        self.push_screen(Screen::AnnounceDetail {
            screen_id,
            announce_id,
        });
    }

    pub fn handle_message(&mut self, msg: CoreMsg) {
        match msg {
            CoreMsg::Action(action) => {
                // Never log `?action` directly: it carries user profiles.
                tracing::info!(action = action.tag(), "dispatch");
                self.handle_action(action);
            }
            CoreMsg::Internal(internal) => self.handle_internal(*internal),
        }
    }

    fn handle_internal(&mut self, internal: InternalEvent) {
        tracing::debug!(
            event = internal.tag(),
            screen_id = internal.screen_id(),
            "internal"
        );
        let screen_id = internal.screen_id().to_string();
        let Some(screen) = self.detail_mut(&screen_id) else {
            // Screen was dismissed while the request was in flight.
            return;
        };
        let before = screen.view().clone();
        screen.apply_vm_event(internal);
        if *screen.view() != before {
            self.emit_state();
        }
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            // Session
            AppAction::SessionChanged { user_id } => {
                let user_id = user_id.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
                self.state.auth = match user_id {
                    Some(user_id) => AuthState::LoggedIn { user_id },
                    None => AuthState::LoggedOut,
                };
                if self.is_logged_in() {
                    // Login finished: drop any login screens we presented.
                    self.state
                        .router
                        .screen_stack
                        .retain(|s| !matches!(s, Screen::Login));
                }
                self.emit_state();
            }

            // Navigation
            AppAction::PushScreen { screen } => {
                if matches!(screen, Screen::AnnounceDetail { .. }) {
                    tracing::warn!(
                        "announce detail must be opened with OpenAnnounce; ignoring push"
                    );
                    return;
                }
                self.push_screen(screen);
                self.emit_state();
            }
            AppAction::PopScreen => {
                if self.state.router.screen_stack.pop().is_none() {
                    return;
                }
                self.sync_details_to_router();
                self.emit_state();
            }
            AppAction::UpdateScreenStack { stack } => {
                self.state.router.screen_stack = stack;
                self.sync_details_to_router();
                self.emit_state();
            }

            // Announce detail
            AppAction::OpenAnnounce { announce } => {
                self.open_announce(announce);
                self.emit_state();
            }
            AppAction::AnnounceDetailShown { screen_id } => {
                let Some(screen) = self.detail_mut(&screen_id) else {
                    return;
                };
                if screen.on_show() {
                    self.emit_state();
                }
            }
            AppAction::SwipePhotoLeft { screen_id } => {
                let Some(screen) = self.detail_mut(&screen_id) else {
                    return;
                };
                if screen.swipe_left() {
                    self.emit_state();
                }
            }
            AppAction::SwipePhotoRight { screen_id } => {
                let Some(screen) = self.detail_mut(&screen_id) else {
                    return;
                };
                if screen.swipe_right() {
                    self.emit_state();
                }
            }
            AppAction::HeartTapped { screen_id } => {
                let logged_in = self.is_logged_in();
                let Some(screen) = self.detail_mut(&screen_id) else {
                    return;
                };
                let outcome = screen.heart_tapped(logged_in);
                self.apply_tap_outcome(outcome);
            }
            AppAction::MessageTapped { screen_id } => {
                let logged_in = self.is_logged_in();
                let Some(screen) = self.detail_mut(&screen_id) else {
                    return;
                };
                let outcome = screen.message_tapped(logged_in);
                self.apply_tap_outcome(outcome);
            }
            AppAction::BuyTapped { screen_id } => {
                if let Some(screen) = self.detail_mut(&screen_id) {
                    screen.buy_tapped();
                }
            }
        }
    }

    fn apply_tap_outcome(&mut self, outcome: TapOutcome) {
        match outcome {
            TapOutcome::PresentLogin => {
                self.present_login();
                self.emit_state();
            }
            // The new flag arrives later as a FavouriteToggled result.
            TapOutcome::FavouriteToggleRequested | TapOutcome::Ignored => {}
            TapOutcome::OpenChat(screen) => {
                self.push_screen(screen);
                self.emit_state();
            }
        }
    }
}
