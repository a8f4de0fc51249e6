pub(crate) const APP_NAME: &str = "Walnut";
pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_BACKGROUND: (u8, u8, u8) = (0xff, 0xf5, 0xee);

pub(crate) const PRODUCTION_CONTENT_URL: &str = "https://heywalnut.com/";
pub(crate) const DEVELOPMENT_CONTENT_URL: &str = "http://localhost:3000/";
pub(crate) const HELP_URL: &str = "https://heywalnut.com";

pub(crate) const ENVIRONMENT_ENV: &str = "WALNUT_ENV";
pub(crate) const CONTENT_URL_ENV: &str = "WALNUT_CONTENT_URL";
pub(crate) const SKIP_UPDATE_CHECK_ENV: &str = "WALNUT_SKIP_UPDATE_CHECK";
pub(crate) const CONNECTIVITY_TIMEOUT_ENV: &str = "WALNUT_CONNECTIVITY_TIMEOUT_MS";
pub(crate) const DESKTOP_LOG_ENV: &str = "WALNUT_DESKTOP_LOG";

pub(crate) const DEFAULT_WINDOW_WIDTH: u32 = 1200;
pub(crate) const DEFAULT_WINDOW_HEIGHT: u32 = 680;
pub(crate) const MIN_WINDOW_WIDTH: u32 = 860;
pub(crate) const MIN_WINDOW_HEIGHT: u32 = 600;
pub(crate) const WINDOW_STATE_FILE: &str = "window-state.json";
pub(crate) const WINDOW_STATE_DEBOUNCE_MS: u64 = 500;

pub(crate) const DEFAULT_CONNECTIVITY_TIMEOUT_MS: u64 = 3_000;
pub(crate) const CONNECTIVITY_FALLBACK_PROBES: &[(&str, u16)] = &[("1.1.1.1", 443), ("8.8.8.8", 53)];

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
