//! Endpoint paths, relative to [`ApiConfig::base_url`](crate::config::ApiConfig).

pub const LOGIN: &str = "/users/auth/login/";
pub const REGISTER: &str = "/users/auth/registration/";
pub const LOGOUT: &str = "/users/auth/logout/";
pub const CURRENT_USER: &str = "/users/me/";

pub const PROFILE: &str = "/nutrition/profile/";
pub const GOALS: &str = "/nutrition/goals/";
pub const ACTIVE_GOAL: &str = "/nutrition/goals/active/";
pub const TODAY_TARGETS: &str = "/nutrition/targets/today/";
pub const CALCULATE_TARGETS: &str = "/nutrition/targets/calculate/";

pub const FOOD_SEARCH: &str = "/foods/search/";
pub const SCANNED_FOODS: &str = "/foods/scanned/my/";

pub const ANALYZE_IMAGE: &str = "/ai/analyze/";
pub const AI_STATS: &str = "/ai/stats/";

pub const TODAY_LOG: &str = "/tracking/logs/today/";
pub const LOG_BY_DATE: &str = "/tracking/logs/by-date/";
pub const QUICK_LOG: &str = "/tracking/foods/quick-log/";
pub const SUMMARY: &str = "/tracking/summary/";

/// Default `limit` for the scanned food list.
pub const DEFAULT_SCANNED_LIMIT: u32 = 20;

/// Default `limit` for a catalog search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Default `image_format` for analysis uploads.
pub const DEFAULT_IMAGE_FORMAT: &str = "jpeg";
