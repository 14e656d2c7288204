mod cache;
mod infinite_data;
mod launch_queries;
mod query_key;
mod query_policy;
mod query_state;

pub use cache::{Fetcher, QueryCache};
pub use infinite_data::InfiniteData;
pub use launch_queries::{LaunchListQuery, LaunchQueries};
pub use query_key::QueryKey;
pub use query_policy::QueryPolicy;
pub use query_state::QueryState;

#[cfg(test)]
mod tests;
