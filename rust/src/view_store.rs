use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use flume::Sender;

use crate::{AppReconciler, AppState, AppUpdate, FfiApp};

/// Host-side mirror of the core state for shells written in Rust.
///
/// Updates arrive on the reconciler thread; the store keeps only the newest
/// revision and pings subscribers, which then read `state()` from their own UI
/// thread. Bursts collapse to whatever is latest at read time.
#[derive(Clone)]
pub struct ViewStore {
    inner: Arc<Inner>,
}

struct Inner {
    model: RwLock<StoreModel>,
    subscribers: Mutex<Vec<Sender<()>>>,
}

struct StoreModel {
    state: AppState,
    last_rev_applied: u64,
}

impl StoreModel {
    fn apply_update(&mut self, update: AppUpdate) -> bool {
        let update_rev = update.rev();
        if update_rev <= self.last_rev_applied {
            return false;
        }
        self.last_rev_applied = update_rev;
        match update {
            AppUpdate::FullState(state) => self.state = state,
        }
        true
    }
}

impl ViewStore {
    pub fn new(initial: AppState) -> Self {
        Self {
            inner: Arc::new(Inner {
                model: RwLock::new(StoreModel {
                    last_rev_applied: initial.rev,
                    state: initial,
                }),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Seed from the app's current snapshot and start listening for updates.
    pub fn attach(app: &FfiApp) -> Self {
        let store = Self::new(app.state());
        app.listen_for_updates(store.reconciler());
        store
    }

    pub fn reconciler(&self) -> Box<dyn AppReconciler> {
        Box::new(StoreReconciler {
            inner: self.inner.clone(),
        })
    }

    pub fn state(&self) -> AppState {
        read_model(&self.inner.model).state.clone()
    }

    pub fn last_rev_applied(&self) -> u64 {
        read_model(&self.inner.model).last_rev_applied
    }

    /// Apply an update. Returns `false` for stale revisions, which are dropped.
    pub fn apply_update(&self, update: AppUpdate) -> bool {
        self.inner.apply_update(update)
    }

    pub fn subscribe_updates(&self) -> flume::Receiver<()> {
        let (tx, rx) = flume::unbounded();
        lock_subscribers(&self.inner.subscribers).push(tx);
        rx
    }
}

impl Inner {
    fn apply_update(&self, update: AppUpdate) -> bool {
        let mut model = write_model(&self.model);
        let changed = model.apply_update(update);
        drop(model);

        if changed {
            self.notify_subscribers();
        }
        changed
    }

    fn notify_subscribers(&self) {
        let mut subscribers = lock_subscribers(&self.subscribers);
        subscribers.retain(|tx| tx.send(()).is_ok());
    }
}

struct StoreReconciler {
    inner: Arc<Inner>,
}

impl AppReconciler for StoreReconciler {
    fn reconcile(&self, update: AppUpdate) {
        self.inner.apply_update(update);
    }
}

fn read_model(model: &RwLock<StoreModel>) -> RwLockReadGuard<'_, StoreModel> {
    match model.read() {
        Ok(g) => g,
        Err(poison) => poison.into_inner(),
    }
}

fn write_model(model: &RwLock<StoreModel>) -> RwLockWriteGuard<'_, StoreModel> {
    match model.write() {
        Ok(g) => g,
        Err(poison) => poison.into_inner(),
    }
}

fn lock_subscribers(subscribers: &Mutex<Vec<Sender<()>>>) -> MutexGuard<'_, Vec<Sender<()>>> {
    match subscribers.lock() {
        Ok(g) => g,
        Err(poison) => poison.into_inner(),
    }
}
