use {
    anyhow::{anyhow, Context, Result},
    log::{debug, info},
    std::{
        fmt,
        path::{Path, PathBuf},
        process::Command,
    },
};

#[derive(Clone, PartialEq, Eq)]
enum Arg {
    Plain(String),
    Secret(String),
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Plain(value) => write!(f, "{value:?}"),
            Arg::Secret(_) => write!(f, "\"***\""),
        }
    }
}

impl Arg {
    fn as_str(&self) -> &str {
        match self {
            Arg::Plain(value) | Arg::Secret(value) => value,
        }
    }
}

/// A single external command: program, arguments and working directory.
///
/// Arguments pushed with [`Invocation::secret`] are passed to the process
/// verbatim but shown as `***` when the invocation is displayed or logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<Arg>,
    cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Plain(arg.into()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args
            .extend(args.into_iter().map(|arg| Arg::Plain(arg.into())));
        self
    }

    pub fn secret(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Secret(arg.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> Vec<&str> {
        self.args.iter().map(Arg::as_str).collect()
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args.iter().map(Arg::as_str));
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            match arg {
                Arg::Plain(value) if value.contains(' ') => write!(f, " \"{value}\"")?,
                Arg::Plain(value) => write!(f, " {value}")?,
                Arg::Secret(_) => write!(f, " ***")?,
            }
        }
        Ok(())
    }
}

/// Executes invocations on behalf of target actions.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Spawns each invocation and waits for it, inheriting stdio.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        info!("running `{invocation}`");
        if let Some(cwd) = invocation.get_current_dir() {
            debug!("  in {}", cwd.display());
        }

        let status = invocation
            .to_command()
            .status()
            .with_context(|| format!("failed to run `{}`", invocation.program()))?;

        if !status.success() {
            return Err(anyhow!("`{invocation}` exited with {status}"));
        }
        Ok(())
    }
}

/// Logs each invocation without spawning anything.
#[derive(Debug, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        info!("[dry-run] `{invocation}`");
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use {super::*, std::cell::RefCell};

    /// Records every invocation it is asked to run and reports success.
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        pub invocations: RefCell<Vec<Invocation>>,
    }

    impl RecordingRunner {
        pub fn programs(&self) -> Vec<String> {
            self.invocations
                .borrow()
                .iter()
                .map(|invocation| invocation.program().to_string())
                .collect()
        }

        pub fn commands(&self) -> Vec<String> {
            self.invocations
                .borrow()
                .iter()
                .map(|invocation| invocation.get_args().join(" "))
                .collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<()> {
            self.invocations.borrow_mut().push(invocation.clone());
            Ok(())
        }
    }
}
