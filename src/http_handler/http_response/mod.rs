pub(crate) mod response_common;
pub mod launch;
pub mod launch_list;
pub mod launch_page;
pub mod launchpad;
