use std::{env, time::Duration};

use url::Url;

use crate::{
    CONNECTIVITY_TIMEOUT_ENV, CONTENT_URL_ENV, DEFAULT_CONNECTIVITY_TIMEOUT_MS,
    DEVELOPMENT_CONTENT_URL, ENVIRONMENT_ENV, PRODUCTION_CONTENT_URL, SKIP_UPDATE_CHECK_ENV,
};

const MIN_CONNECTIVITY_TIMEOUT_MS: u64 = 100;
const MAX_CONNECTIVITY_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunMode {
    Development,
    Production,
}

impl RunMode {
    fn default_content_url(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_CONTENT_URL,
            Self::Production => PRODUCTION_CONTENT_URL,
        }
    }
}

/// Settings resolved once at startup from the process environment.
#[derive(Debug, Clone)]
pub(crate) struct ShellConfig {
    pub(crate) mode: RunMode,
    pub(crate) content_url: Url,
    pub(crate) update_check_enabled: bool,
    pub(crate) connectivity_timeout: Duration,
}

impl ShellConfig {
    pub(crate) fn from_env<L>(log: L) -> Result<Self, String>
    where
        L: Fn(&str),
    {
        Self::resolve(|key| env::var(key).ok(), log)
    }

    pub(crate) fn resolve<F, L>(lookup: F, log: L) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
        L: Fn(&str),
    {
        let mode = parse_run_mode(lookup(ENVIRONMENT_ENV).as_deref());
        let default_url = mode.default_content_url();
        let content_url = match lookup(CONTENT_URL_ENV) {
            Some(raw) if !raw.trim().is_empty() => match normalize_content_url(&raw) {
                Ok(url) => url,
                Err(error) => {
                    log(&format!(
                        "ignoring {CONTENT_URL_ENV}: {error}; using {default_url}"
                    ));
                    normalize_content_url(default_url)?
                }
            },
            _ => normalize_content_url(default_url)?,
        };

        let update_check_enabled = mode == RunMode::Production
            && !is_truthy(lookup(SKIP_UPDATE_CHECK_ENV).as_deref());
        let connectivity_timeout =
            parse_connectivity_timeout(lookup(CONNECTIVITY_TIMEOUT_ENV).as_deref());

        Ok(Self {
            mode,
            content_url,
            update_check_enabled,
            connectivity_timeout,
        })
    }
}

pub(crate) fn parse_run_mode(raw: Option<&str>) -> RunMode {
    match raw.map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("development") => RunMode::Development,
        _ => RunMode::Production,
    }
}

pub(crate) fn normalize_content_url(raw: &str) -> Result<Url, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("content URL is empty".to_string());
    }

    let mut parsed = Url::parse(trimmed).map_err(|error| format!("invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(format!("unsupported URL scheme '{scheme}'")),
    }
    if parsed.path().is_empty() {
        parsed.set_path("/");
    }
    Ok(parsed)
}

fn is_truthy(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|value| value.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

pub(crate) fn parse_connectivity_timeout(raw: Option<&str>) -> Duration {
    let millis = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_CONNECTIVITY_TIMEOUT_MS)
        .clamp(MIN_CONNECTIVITY_TIMEOUT_MS, MAX_CONNECTIVITY_TIMEOUT_MS);
    Duration::from_millis(millis)
}
