pub use reqwest;

pub mod http_client;
pub mod http_request;
pub mod http_response;
mod http_handler_common;
mod launch_api;

pub use http_handler_common::{FetchError, ResourceKind};
pub use launch_api::{LaunchApi, LaunchSource};
