pub mod config;
pub mod target;
pub mod version;

pub use config::{BuildContext, Config};
pub use target::{Action, Target};
pub use version::VersionInfo;
