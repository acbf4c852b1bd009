use std::sync::{Arc, RwLock};

use crate::state::{Announce, UserProfile};

#[derive(uniffi::Error, thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    #[error("backend error: {message}")]
    Backend { message: String },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for RepositoryError {
    fn from(err: uniffi::UnexpectedUniFFICallbackError) -> Self {
        RepositoryError::Backend {
            message: err.reason,
        }
    }
}

/// Host-provided data source behind the detail screen's view model.
///
/// Calls are blocking and run on the core's blocking pool, never on the actor
/// thread. Implementations must be thread-safe.
#[uniffi::export(callback_interface)]
pub trait AnnounceRepository: Send + Sync + 'static {
    fn is_favourite(&self, announce: Announce) -> Result<bool, RepositoryError>;
    fn seller_profile(&self, announce: Announce) -> Result<UserProfile, RepositoryError>;
    fn current_user_profile(&self) -> Result<UserProfile, RepositoryError>;
    /// Flip the favourite flag for `announce` and return the new value.
    fn toggle_favourite(&self, announce: Announce) -> Result<bool, RepositoryError>;
}

pub type SharedAnnounceRepository = Arc<RwLock<Option<Arc<dyn AnnounceRepository>>>>;

pub(crate) fn current_repository(
    slot: &SharedAnnounceRepository,
) -> Option<Arc<dyn AnnounceRepository>> {
    match slot.read() {
        Ok(g) => g.clone(),
        Err(poison) => poison.into_inner().clone(),
    }
}
