mod paths;
mod target;

pub use paths::{AppPaths, AppPathsError};
pub use target::{sdkman_platform, sdkman_platform_for};
