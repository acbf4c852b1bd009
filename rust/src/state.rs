#[derive(uniffi::Record, Clone, Debug, PartialEq)]
pub struct Announce {
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    pub price: f64,
    pub last_updated_at: Option<i64>,
    pub description: String,
    pub condition: String,
    pub delivery_type: String,
    pub image_refs: Vec<String>,
}

#[derive(uniffi::Record, Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: String,
    pub pseudo: String,
    pub profile_picture_url: String,
}

impl UserProfile {
    /// Value the view model publishes before the first fetch lands.
    pub fn empty() -> Self {
        Self {
            user_id: String::new(),
            pseudo: String::new(),
            profile_picture_url: String::new(),
        }
    }
}

#[derive(uniffi::Record, Clone, Debug)]
pub struct AppState {
    pub rev: u64,
    pub router: Router,
    pub auth: AuthState,
    pub announce_details: Vec<AnnounceDetailViewState>,
}

impl AppState {
    pub fn empty() -> Self {
        Self {
            rev: 0,
            router: Router {
                default_screen: Screen::AnnounceList,
                screen_stack: vec![],
            },
            auth: AuthState::LoggedOut,
            announce_details: vec![],
        }
    }

    pub fn announce_detail(&self, screen_id: &str) -> Option<&AnnounceDetailViewState> {
        self.announce_details
            .iter()
            .find(|d| d.screen_id == screen_id)
    }
}

#[derive(uniffi::Record, Clone, Debug)]
pub struct Router {
    pub default_screen: Screen,
    pub screen_stack: Vec<Screen>,
}

#[derive(uniffi::Enum, Clone, Debug, PartialEq)]
pub enum Screen {
    AnnounceList,
    Login,
    AnnounceDetail {
        screen_id: String,
        announce_id: String,
    },
    Chat {
        announce_id: String,
        other_user: UserProfile,
        current_user: UserProfile,
    },
}

#[derive(uniffi::Enum, Clone, Debug, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn { user_id: String },
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthState::LoggedIn { .. })
    }
}

/// Everything the native detail screen draws. Rebuilt by the core; native code
/// never patches it in place.
#[derive(uniffi::Record, Clone, Debug, PartialEq)]
pub struct AnnounceDetailViewState {
    pub screen_id: String,
    pub announce_id: String,
    pub title: String,
    pub price_text: String,
    pub date_text: Option<String>,
    pub description: String,
    pub condition: String,
    pub delivery: String,
    pub top_image: ImageSlot,
    pub image_displayed: u32,
    pub image_count: u32,
    pub photo_indicator: Vec<IndicatorDot>,
    pub heart: Option<HeartIcon>,
    pub seller_name: String,
    pub seller_avatar: ImageSlot,
    pub swipe_enabled: bool,
}

/// An image the native loader fetches by URL. `placeholder` names the icon shown
/// until the load completes, and kept if it fails.
#[derive(uniffi::Record, Clone, Debug, PartialEq, Eq)]
pub struct ImageSlot {
    pub url: Option<String>,
    pub placeholder: String,
}

impl ImageSlot {
    pub fn placeholder(placeholder: &str) -> Self {
        Self {
            url: None,
            placeholder: placeholder.to_string(),
        }
    }

    pub fn from_url(url: &str, placeholder: &str) -> Self {
        let url = url.trim();
        Self {
            url: (!url.is_empty()).then(|| url.to_string()),
            placeholder: placeholder.to_string(),
        }
    }
}

#[derive(uniffi::Record, Clone, Debug, PartialEq, Eq)]
pub struct IndicatorDot {
    pub index: u32,
    pub active: bool,
    pub size: u32,
}

#[derive(uniffi::Record, Clone, Debug, PartialEq, Eq)]
pub struct HeartIcon {
    pub filled: bool,
    pub symbol: String,
}

impl HeartIcon {
    pub fn for_favourite(is_favourite: bool) -> Self {
        let symbol = if is_favourite { "heart.fill" } else { "heart" };
        Self {
            filled: is_favourite,
            symbol: symbol.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_slot_blank_url_keeps_placeholder_only() {
        let slot = ImageSlot::from_url("   ", "camera");
        assert_eq!(slot.url, None);
        assert_eq!(slot.placeholder, "camera");

        let slot = ImageSlot::from_url(" https://img.local/a.jpg ", "camera");
        assert_eq!(slot.url.as_deref(), Some("https://img.local/a.jpg"));
    }

    #[test]
    fn heart_icon_symbol_tracks_flag() {
        assert_eq!(HeartIcon::for_favourite(true).symbol, "heart.fill");
        assert!(HeartIcon::for_favourite(true).filled);
        assert_eq!(HeartIcon::for_favourite(false).symbol, "heart");
        assert!(!HeartIcon::for_favourite(false).filled);
    }

    #[test]
    fn announce_detail_lookup_by_screen_id() {
        let state = AppState::empty();
        assert!(state.announce_detail("missing").is_none());
        assert!(!state.auth.is_logged_in());
        assert!(AuthState::LoggedIn {
            user_id: "u1".into()
        }
        .is_logged_in());
    }
}
