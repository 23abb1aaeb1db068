//! packrun - package build automation
//!
//! Cleans, restores, builds, tests, packs and pushes a package by driving its
//! package-manager CLI, stamping every output with a version computed from
//! the repository history.
//!
//! # Examples
//!
//! ## Computing the execution order
//!
//! ```
//! use packrun::targets::{self, PACK, PUSH};
//!
//! let graph = targets::graph().unwrap();
//! let plan = graph.plan(&[PUSH], &[]).unwrap();
//! assert_eq!(plan.names(), vec![PACK, PUSH]);
//! ```
//!
//! ## Running a target
//!
//! ```no_run
//! use packrun::{
//!     targets,
//!     types::{BuildContext, Config},
//!     utils::{detect_version, get_git_root_path, SystemRunner},
//! };
//!
//! let root = get_git_root_path().unwrap();
//! let version = detect_version(&root, "gitversion").unwrap();
//! let context = BuildContext::new(root, Config::default(), version);
//!
//! targets::graph()
//!     .unwrap()
//!     .run(&["Build"], &context, &SystemRunner)
//!     .unwrap();
//! ```

pub mod commands;
pub mod error;
pub mod graph;
pub mod targets;
pub mod types;
pub mod utils;

pub use error::{GraphError, NoPackagesFound, RunError};
pub use graph::{ExecutionPlan, TargetGraph};
