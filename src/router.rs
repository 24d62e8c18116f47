//! Top-level navigation decision.
//!
//! The router is a pure function of three flags. It is evaluated again
//! whenever any of them changes; it never redirects imperatively.
//!
//! | loading | authenticated | onboarded | route |
//! |---|---|---|---|
//! | yes | any | any | [`Route::Loading`] |
//! | no | no | any | [`Route::Auth`] |
//! | no | yes | no | [`Route::Onboarding`] |
//! | no | yes | yes | [`Route::Main`] |

use std::fmt;

use serde::{Deserialize, Serialize};

/// A screen reachable from one of the stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Screen {
    Login,
    Register,
    Onboarding,
    #[default]
    Home,
    Scanner,
    History,
    Profile,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Onboarding => "Onboarding",
            Self::Home => "Home",
            Self::Scanner => "Scanner",
            Self::History => "History",
            Self::Profile => "Profile",
        };
        f.write_str(name)
    }
}

/// Which stack is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Bootstrap has not finished. No stack is mounted.
    Loading,
    /// Login and registration.
    Auth,
    /// The onboarding flow.
    Onboarding,
    /// Home, Scanner, History and Profile tabs.
    Main,
}

impl Route {
    /// Screens of the mounted stack, the first one being initial.
    pub fn screens(self) -> &'static [Screen] {
        match self {
            Self::Loading => &[],
            Self::Auth => &[Screen::Login, Screen::Register],
            Self::Onboarding => &[Screen::Onboarding],
            Self::Main => &[Screen::Home, Screen::Scanner, Screen::History, Screen::Profile],
        }
    }

    pub fn initial_screen(self) -> Option<Screen> {
        self.screens().first().copied()
    }

    pub fn contains(self, screen: Screen) -> bool {
        self.screens().contains(&screen)
    }
}

/// Picks the stack for the given state.
pub fn route(is_loading: bool, is_authenticated: bool, onboarding_completed: bool) -> Route {
    match (is_loading, is_authenticated, onboarding_completed) {
        (true, _, _) => Route::Loading,
        (false, false, _) => Route::Auth,
        (false, true, false) => Route::Onboarding,
        (false, true, true) => Route::Main,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_wins() {
        for authenticated in [false, true] {
            for onboarded in [false, true] {
                assert_eq!(route(true, authenticated, onboarded), Route::Loading);
            }
        }
    }

    #[test]
    fn test_unauthenticated_goes_to_auth() {
        assert_eq!(route(false, false, false), Route::Auth);
        assert_eq!(route(false, false, true), Route::Auth);
    }

    #[test]
    fn test_onboarding_and_main() {
        assert_eq!(route(false, true, false), Route::Onboarding);
        assert_eq!(route(false, true, true), Route::Main);
    }

    #[test]
    fn test_stacks() {
        assert!(Route::Loading.screens().is_empty());
        assert_eq!(Route::Auth.initial_screen(), Some(Screen::Login));
        assert!(Route::Auth.contains(Screen::Register));
        assert_eq!(Route::Onboarding.screens(), &[Screen::Onboarding]);
        assert_eq!(Route::Main.initial_screen(), Some(Screen::Home));
        assert!(!Route::Main.contains(Screen::Login));
    }
}
