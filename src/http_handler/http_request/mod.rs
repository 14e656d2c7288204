pub mod launch_get;
pub mod launches_get;
pub mod launches_query_post;
pub mod launchpad_get;
pub mod launchpads_get;
pub mod request_common;
