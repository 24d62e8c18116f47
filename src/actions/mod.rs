//! Everything that changes state: sign-in, sign-out, startup and the
//! backend mutations.
//!
//! Each action is a small struct built from the handles it needs, with one
//! async `execute`. Mutations are never retried; a failed mutation leaves
//! the cache and stores as they were.

pub mod analyze_image;
pub mod bootstrap;
pub mod calculate_targets;
pub mod complete_onboarding;
pub mod create_goal;
pub mod login;
pub mod logout;
pub mod quick_log;
pub mod refresh_all;
pub mod register;
pub mod search_foods;
pub mod update_profile;

pub use analyze_image::AnalyzeImageAction;
pub use bootstrap::BootstrapAction;
pub use calculate_targets::CalculateTargetsAction;
pub use complete_onboarding::CompleteOnboardingAction;
pub use create_goal::CreateGoalAction;
pub use login::LoginAction;
pub use logout::LogoutAction;
pub use quick_log::QuickLogAction;
pub use refresh_all::RefreshAllAction;
pub use register::RegisterAction;
pub use search_foods::SearchFoodsAction;
pub use update_profile::UpdateProfileAction;
