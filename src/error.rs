use std::path::PathBuf;

/// Invalid target declarations, detected when the graph is built.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("target `{0}` is declared more than once")]
    DuplicateTarget(String),
    #[error("target `{target}` refers to undeclared target `{reference}`")]
    UnknownDependency { target: String, reference: String },
    #[error("targets form a cycle: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("unknown target `{0}`")]
    UnknownTarget(String),
    #[error("target `{target}` requires parameter `{parameter}`, which is not set")]
    MissingParameter { target: String, parameter: String },
    #[error("target `{target}` failed")]
    TargetFailed {
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("no package files found in {}", .dir.display())]
pub struct NoPackagesFound {
    pub dir: PathBuf,
}
