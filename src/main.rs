#![allow(dead_code)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod geo;
mod http_handler;
mod keychain;
mod logger;
mod query_cache;

use crate::config::ClientConfig;
use crate::geo::{
    ExternalMapOpener, MapMode, MapOpenError, MapPlatform, calculate_distance, format_distance,
    open_external_map,
};
use crate::http_handler::http_response::launch::Launch;
use crate::http_handler::reqwest::Url;
use crate::keychain::Keychain;
use crate::query_cache::LaunchListQuery;
use itertools::Itertools;
use tokio_util::sync::CancellationToken;

/// Number of launches printed from the first page.
const LIST_PREVIEW: usize = 10;

/// Map opener for a terminal host: only web links are supported and
/// "opening" means printing them.
struct TerminalMapOpener;

impl ExternalMapOpener for TerminalMapOpener {
    fn platform(&self) -> MapPlatform { MapPlatform::Web }

    fn can_open(&self, url: &Url) -> bool { matches!(url.scheme(), "http" | "https") }

    fn open(&self, url: &Url) -> Result<(), MapOpenError> {
        println!("  map: {url}");
        Ok(())
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    logger::init();
    let config = ClientConfig::from_env();
    let keychain = Keychain::new(&config);
    log::info!("Using launch API at {}", keychain.client().url());

    let queries = keychain.queries();
    let cancel = CancellationToken::new();
    let gc = tokio::spawn(queries.clone().run_gc(cancel.clone()));

    let list = queries.launch_list(config.search());
    if let Some(id) = show_list(&list).await {
        show_launch(&keychain, &id, &config).await;
    }

    cancel.cancel();
    if let Err(err) = gc.await {
        log::error!("Cache garbage collection task failed: {err}");
    }
}

/// Loads and prints the first page of `list`.
///
/// # Returns
/// The id of the first listed launch, if any.
async fn show_list(list: &LaunchListQuery) -> Option<String> {
    let pages = match list.load().await {
        Ok(pages) => pages,
        Err(err) => {
            log::error!("{err}");
            return None;
        }
    };
    let launches: Vec<&Launch> = pages.launches().collect();
    match list.search() {
        Some(term) => log::info!("{} launches matching '{term}' on page 1", launches.len()),
        None => log::info!("{} launches on page 1", launches.len()),
    }
    for launch in launches.iter().take(LIST_PREVIEW) {
        println!("{}", summary(launch));
    }
    if pages.has_next_page() {
        println!("... more launches available");
    }
    launches.first().map(|launch| launch.id().to_owned())
}

fn summary(launch: &Launch) -> String {
    format!(
        "#{:<4} {:<32} {}  {}",
        launch.flight_number(),
        launch.name(),
        launch.date_utc().format("%Y-%m-%d %H:%M"),
        launch.outcome()
    )
}

/// Prints the details of launch `id` and its launchpad, including the
/// distance to the configured user position.
async fn show_launch(keychain: &Keychain, id: &str, config: &ClientConfig) {
    let queries = keychain.queries();
    let launch = match queries.launch(id).await {
        Ok(launch) => launch,
        Err(err) => {
            log::error!("{err}");
            return;
        }
    };
    println!("\n{} (flight {})", launch.name(), launch.flight_number());
    if let Some(details) = launch.details() {
        println!("  {details}");
    }
    let links = [launch.links().webcast(), launch.links().article(), launch.links().wikipedia()];
    let link_line = links.into_iter().flatten().join(" | ");
    if !link_line.is_empty() {
        println!("  links: {link_line}");
    }

    let pad = match queries.launchpad(launch.launchpad_id()).await {
        Ok(pad) => pad,
        Err(err) => {
            log::error!("{err}");
            return;
        }
    };
    print!("  launchpad: {} ({}, {})", pad.full_name(), pad.locality(), pad.region());
    if let Some(rate) = pad.success_rate() {
        print!(", {rate:.1}% success");
    }
    println!();
    if let Some(user) = config.user_coords() {
        let km = calculate_distance(user, pad.coordinate());
        println!("  distance: {}", format_distance(km));
    }
    if let Err(err) =
        open_external_map(&TerminalMapOpener, pad.coordinate(), Some(pad.name()), MapMode::Directions)
    {
        log::warn!("Could not open map: {err}");
    }
}
