use {
    super::config::BuildContext,
    crate::utils::process::CommandRunner,
    anyhow::Result,
    std::fmt,
};

/// Work performed when a target runs.
pub type Action = fn(&BuildContext, &dyn CommandRunner) -> Result<()>;

/// A named build step and its ordering constraints.
#[derive(Clone)]
pub struct Target {
    pub name: &'static str,
    pub description: &'static str,
    /// Targets pulled into the run and completed before this one.
    pub depends_on: Vec<&'static str>,
    /// Targets that run after this one when both are scheduled.
    pub runs_before: Vec<&'static str>,
    /// Parameters that must be non-empty before anything runs.
    pub required_parameters: Vec<&'static str>,
    pub action: Action,
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .field("runs_before", &self.runs_before)
            .field("required_parameters", &self.required_parameters)
            .finish_non_exhaustive()
    }
}
