use crate::repository::RepositoryError;
use crate::state::{AppState, UserProfile};
use crate::AppAction;

#[derive(uniffi::Enum, Clone, Debug)]
pub enum AppUpdate {
    FullState(AppState),
}

impl AppUpdate {
    pub fn rev(&self) -> u64 {
        match self {
            AppUpdate::FullState(s) => s.rev,
        }
    }
}

#[derive(Debug)]
pub enum CoreMsg {
    Action(AppAction),
    Internal(Box<InternalEvent>),
}

/// Results of repository calls, posted back to the actor before they touch state.
/// Every variant carries the `screen_id` of the detail screen whose view model
/// issued the request.
#[derive(Debug)]
pub enum InternalEvent {
    FavouriteStatusFetched {
        screen_id: String,
        result: Result<bool, RepositoryError>,
    },
    SellerProfileFetched {
        screen_id: String,
        result: Result<UserProfile, RepositoryError>,
    },
    CurrentUserProfileFetched {
        screen_id: String,
        result: Result<UserProfile, RepositoryError>,
    },
    FavouriteToggled {
        screen_id: String,
        result: Result<bool, RepositoryError>,
    },
}

impl InternalEvent {
    pub fn screen_id(&self) -> &str {
        match self {
            InternalEvent::FavouriteStatusFetched { screen_id, .. }
            | InternalEvent::SellerProfileFetched { screen_id, .. }
            | InternalEvent::CurrentUserProfileFetched { screen_id, .. }
            | InternalEvent::FavouriteToggled { screen_id, .. } => screen_id,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            InternalEvent::FavouriteStatusFetched { .. } => "FavouriteStatusFetched",
            InternalEvent::SellerProfileFetched { .. } => "SellerProfileFetched",
            InternalEvent::CurrentUserProfileFetched { .. } => "CurrentUserProfileFetched",
            InternalEvent::FavouriteToggled { .. } => "FavouriteToggled",
        }
    }
}
