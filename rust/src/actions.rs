use crate::state::{Announce, Screen};

#[derive(uniffi::Enum, Debug, Clone)]
pub enum AppAction {
    // Session
    SessionChanged {
        user_id: Option<String>,
    },

    // Navigation
    PushScreen {
        screen: Screen,
    },
    PopScreen,
    UpdateScreenStack {
        stack: Vec<Screen>,
    },

    // Announce detail
    OpenAnnounce {
        announce: Announce,
    },
    AnnounceDetailShown {
        screen_id: String,
    },
    SwipePhotoLeft {
        screen_id: String,
    },
    SwipePhotoRight {
        screen_id: String,
    },
    HeartTapped {
        screen_id: String,
    },
    MessageTapped {
        screen_id: String,
    },
    BuyTapped {
        screen_id: String,
    },
}

impl AppAction {
    /// Log-safe action tag (never includes user ids or listing payloads).
    pub fn tag(&self) -> &'static str {
        match self {
            // Session
            AppAction::SessionChanged { .. } => "SessionChanged",

            // Navigation
            AppAction::PushScreen { .. } => "PushScreen",
            AppAction::PopScreen => "PopScreen",
            AppAction::UpdateScreenStack { .. } => "UpdateScreenStack",

            // Announce detail
            AppAction::OpenAnnounce { .. } => "OpenAnnounce",
            AppAction::AnnounceDetailShown { .. } => "AnnounceDetailShown",
            AppAction::SwipePhotoLeft { .. } => "SwipePhotoLeft",
            AppAction::SwipePhotoRight { .. } => "SwipePhotoRight",
            AppAction::HeartTapped { .. } => "HeartTapped",
            AppAction::MessageTapped { .. } => "MessageTapped",
            AppAction::BuyTapped { .. } => "BuyTapped",
        }
    }
}
