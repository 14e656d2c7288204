use crate::geo::Coordinate;
use crate::http_handler::http_request::launches_query_post::LaunchesQuery;
use std::{env, fmt::Display, str::FromStr, time::Duration};

/// Runtime settings, read once from the environment at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    page_size: u32,
    search: Option<String>,
    user_coords: Option<Coordinate>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(Self::DEFAULT_BASE_URL),
            timeout: Duration::from_millis(Self::DEFAULT_TIMEOUT_MS),
            page_size: LaunchesQuery::DEFAULT_PAGE_SIZE,
            search: None,
            user_coords: None,
        }
    }
}

impl ClientConfig {
    const DEFAULT_BASE_URL: &'static str = "https://api.spacexdata.com";
    const DEFAULT_TIMEOUT_MS: u64 = 10_000;

    const BASE_URL_VAR: &'static str = "LAUNCH_API_BASE_URL";
    const TIMEOUT_VAR: &'static str = "LAUNCH_API_TIMEOUT_MS";
    const PAGE_SIZE_VAR: &'static str = "LAUNCH_PAGE_SIZE";
    const SEARCH_VAR: &'static str = "LAUNCH_SEARCH";
    const USER_COORDS_VAR: &'static str = "USER_COORDS";

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self { Self::from_lookup(|name| env::var(name).ok()) }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Unset variables fall back to their defaults, malformed ones are
    /// reported with a warning and fall back as well.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let base_url = lookup(Self::BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.base_url);
        let timeout_ms = parse_or(&lookup, Self::TIMEOUT_VAR, Self::DEFAULT_TIMEOUT_MS, |ms| *ms > 0);
        let page_size = parse_or(&lookup, Self::PAGE_SIZE_VAR, defaults.page_size, |n| *n > 0);
        let search = lookup(Self::SEARCH_VAR).filter(|term| !term.trim().is_empty());
        let user_coords = lookup(Self::USER_COORDS_VAR).and_then(|raw| {
            raw.parse::<Coordinate>()
                .inspect_err(|err| {
                    log::warn!("Ignoring {}={raw}: {err}", Self::USER_COORDS_VAR);
                })
                .ok()
        });
        Self { base_url, timeout: Duration::from_millis(timeout_ms), page_size, search, user_coords }
    }

    pub fn base_url(&self) -> &str { &self.base_url }
    pub fn timeout(&self) -> Duration { self.timeout }
    pub fn page_size(&self) -> u32 { self.page_size }
    pub fn search(&self) -> Option<&str> { self.search.as_deref() }
    pub fn user_coords(&self) -> Option<Coordinate> { self.user_coords }
}

/// Parses variable `name`, falling back to `default` if it is unset or rejected.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(name) else { return default };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        Ok(value) => {
            log::warn!("Invalid {name}={value}, using {default}");
            default
        }
        Err(err) => {
            log::warn!("Invalid {name}={raw} ({err}), using {default}");
            default
        }
    }
}
