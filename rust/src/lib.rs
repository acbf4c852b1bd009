mod actions;
mod core;
mod logging;
mod repository;
mod route_projection;
mod state;
mod updates;
mod view_store;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;

use flume::{Receiver, Sender};

pub use actions::AppAction;
pub use repository::*;
pub use route_projection::*;
pub use state::*;
pub use updates::*;
pub use view_store::ViewStore;

/// Return the default `announce_config.json` payload used when no config file exists.
#[uniffi::export]
pub fn default_config_json() -> String {
    core::default_app_config_json()
}

uniffi::setup_scaffolding!();

#[uniffi::export(callback_interface)]
pub trait AppReconciler: Send + Sync + 'static {
    fn reconcile(&self, update: AppUpdate);
}

#[derive(uniffi::Object)]
pub struct FfiApp {
    core_tx: Sender<CoreMsg>,
    update_rx: Receiver<AppUpdate>,
    listening: AtomicBool,
    shared_state: Arc<RwLock<AppState>>,
    repository: SharedAnnounceRepository,
}

#[uniffi::export]
impl FfiApp {
    #[uniffi::constructor]
    pub fn new(data_dir: String) -> Arc<Self> {
        logging::init_logging(&data_dir);
        tracing::info!(data_dir = %data_dir, "FfiApp::new() starting");

        let (update_tx, update_rx) = flume::unbounded();
        let (core_tx, core_rx) = flume::unbounded::<CoreMsg>();
        let shared_state = Arc::new(RwLock::new(AppState::empty()));
        let repository: SharedAnnounceRepository = Arc::new(RwLock::new(None));

        // Actor loop thread (single threaded "app actor").
        let core_tx_for_core = core_tx.clone();
        let shared_for_core = shared_state.clone();
        let repository_for_core = repository.clone();
        thread::spawn(move || {
            let mut core = match crate::core::AppCore::new(
                update_tx,
                core_tx_for_core,
                data_dir,
                shared_for_core,
                repository_for_core,
            ) {
                Ok(core) => core,
                Err(e) => {
                    tracing::error!("app core failed to start: {e:#}");
                    return;
                }
            };
            while let Ok(msg) = core_rx.recv() {
                core.handle_message(msg);
            }
        });

        Arc::new(Self {
            core_tx,
            update_rx,
            listening: AtomicBool::new(false),
            shared_state,
            repository,
        })
    }

    pub fn state(&self) -> AppState {
        match self.shared_state.read() {
            Ok(g) => g.clone(),
            Err(poison) => poison.into_inner().clone(),
        }
    }

    pub fn dispatch(&self, action: AppAction) {
        // Contract: never block caller.
        let _ = self.core_tx.send(CoreMsg::Action(action));
    }

    pub fn listen_for_updates(&self, reconciler: Box<dyn AppReconciler>) {
        if self
            .listening
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            // Avoid multiple listeners that would split messages.
            return;
        }

        let rx = self.update_rx.clone();
        thread::spawn(move || {
            while let Ok(update) = rx.recv() {
                reconciler.reconcile(update);
            }
        });
    }

    pub fn set_repository(&self, repository: Box<dyn AnnounceRepository>) {
        let repository: Arc<dyn AnnounceRepository> = Arc::from(repository);
        match self.repository.write() {
            Ok(mut slot) => {
                *slot = Some(repository);
            }
            Err(poison) => {
                *poison.into_inner() = Some(repository);
            }
        }
    }
}
