use crate::{AppState, Router, Screen};

#[derive(Clone, Debug, PartialEq)]
pub struct MobileRouteState {
    pub root_screen: Screen,
    pub stack: Vec<Screen>,
    pub active_screen: Screen,
    pub can_pop: bool,
}

/// Maps core router semantics to the navigation model shared by iOS and Android.
pub fn project_mobile(state: &AppState) -> MobileRouteState {
    let stack = state.router.screen_stack.clone();
    MobileRouteState {
        root_screen: state.router.default_screen.clone(),
        can_pop: !stack.is_empty(),
        active_screen: active_screen(&state.router),
        stack,
    }
}

fn active_screen(router: &Router) -> Screen {
    router
        .screen_stack
        .last()
        .cloned()
        .unwrap_or_else(|| router.default_screen.clone())
}

/// The detail screen currently on top, if any, as `(screen_id, announce_id)`.
pub fn active_announce_detail(state: &AppState) -> Option<(String, String)> {
    match active_screen(&state.router) {
        Screen::AnnounceDetail {
            screen_id,
            announce_id,
        } => Some((screen_id, announce_id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserProfile;

    fn detail(screen_id: &str) -> Screen {
        Screen::AnnounceDetail {
            screen_id: screen_id.to_string(),
            announce_id: format!("announce-{screen_id}"),
        }
    }

    #[test]
    fn empty_stack_projects_root() {
        let state = AppState::empty();
        let route = project_mobile(&state);
        assert_eq!(route.root_screen, Screen::AnnounceList);
        assert_eq!(route.active_screen, Screen::AnnounceList);
        assert!(route.stack.is_empty());
        assert!(!route.can_pop);
        assert_eq!(active_announce_detail(&state), None);
    }

    #[test]
    fn top_of_stack_is_active() {
        let mut state = AppState::empty();
        state.router.screen_stack = vec![detail("a"), detail("b")];
        let route = project_mobile(&state);
        assert_eq!(route.active_screen, detail("b"));
        assert!(route.can_pop);
        assert_eq!(
            active_announce_detail(&state),
            Some(("b".to_string(), "announce-b".to_string()))
        );
    }

    #[test]
    fn chat_on_top_hides_detail() {
        let mut state = AppState::empty();
        state.router.screen_stack = vec![
            detail("a"),
            Screen::Chat {
                announce_id: "announce-a".into(),
                other_user: UserProfile::empty(),
                current_user: UserProfile::empty(),
            },
        ];
        assert_eq!(active_announce_detail(&state), None);
    }
}
