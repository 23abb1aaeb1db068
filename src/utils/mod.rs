pub mod fs;
pub mod git;
pub mod gitversion;
pub mod process;

pub use fs::{ensure_clean_dir, find_files_by_extension};
pub use git::get_git_root_path;
pub use gitversion::detect_version;
pub use process::{CommandRunner, DryRunRunner, Invocation, SystemRunner};
