pub mod assertions;
pub mod fixtures;
pub mod logging;

pub use assertions::{assert_contains, assert_not_contains};
pub use fixtures::ShimEnv;
pub use logging::init_test_logging;
