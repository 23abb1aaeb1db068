use {
    crate::{
        graph::TargetGraph,
        targets::{self, API_KEY_PARAMETER, DEFAULT_TARGET, SOURCE_PARAMETER},
        types::{config::DEFAULT_PACKAGE_MANAGER, BuildContext, Config},
        utils::{
            detect_version, get_git_root_path, gitversion::DEFAULT_GITVERSION, CommandRunner,
            DryRunRunner, SystemRunner,
        },
    },
    anyhow::{Context, Result},
    clap::Args,
    log::{debug, info},
    std::{collections::BTreeMap, io::Write, path::PathBuf},
};

#[derive(Args, Debug, Default)]
pub struct CommandArgs {
    /// Targets to run, dependencies included
    #[arg(value_name = "TARGET", default_value = DEFAULT_TARGET)]
    pub targets: Vec<String>,

    /// Build with the Release configuration instead of Debug
    #[arg(long, env = "PACKRUN_FOR_PROD")]
    pub for_prod: bool,

    /// Package source that Push publishes to
    #[arg(long, env = "PACKRUN_SOURCE", value_name = "URL")]
    pub source: Option<String>,

    /// API key for the package source
    #[arg(long, env = "PACKRUN_API_KEY", value_name = "KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Project or solution file, relative to the repository root
    #[arg(long, value_name = "PATH")]
    pub project: Option<PathBuf>,

    /// Repository root; asks git when omitted
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    #[arg(
        long,
        env = "PACKRUN_PACKAGE_MANAGER",
        value_name = "PROGRAM",
        default_value = DEFAULT_PACKAGE_MANAGER
    )]
    pub package_manager: String,

    /// Version tool printing GitVersion JSON; falls back to `git describe` when missing
    #[arg(
        long,
        env = "PACKRUN_GITVERSION",
        value_name = "PROGRAM",
        default_value = DEFAULT_GITVERSION
    )]
    pub gitversion: String,

    /// Leave a target out even when another one depends on it
    #[arg(long, value_name = "TARGET")]
    pub skip: Vec<String>,

    /// List the declared targets and exit
    #[arg(long, conflicts_with = "plan")]
    pub list: bool,

    /// Print the execution order and exit
    #[arg(long)]
    pub plan: bool,

    /// Log the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

impl CommandArgs {
    pub fn config(&self) -> Config {
        let parameters = [
            (SOURCE_PARAMETER, &self.source),
            (API_KEY_PARAMETER, &self.api_key),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|value| (name.to_string(), value)))
        .collect::<BTreeMap<_, _>>();

        Config {
            for_prod: self.for_prod,
            project: self.project.clone(),
            package_manager: self.package_manager.clone(),
            parameters,
        }
    }
}

pub fn run(args: CommandArgs) -> Result<()> {
    let graph = targets::graph().context("invalid target declarations")?;

    if args.list {
        return list(&graph, &mut std::io::stdout().lock());
    }

    let plan = graph.plan(&args.targets, &args.skip)?;
    let config = args.config();
    plan.check_parameters(&config)?;
    debug!("execution plan: {}", plan.names().join(", "));

    if args.plan {
        let mut out = std::io::stdout().lock();
        for name in plan.names() {
            writeln!(out, "{name}")?;
        }
        return Ok(());
    }

    let root = match args.root {
        Some(root) => root,
        None => get_git_root_path().context("failed to find the repository root")?,
    };
    let version = detect_version(&root, &args.gitversion).context("failed to compute version")?;
    info!(
        "{} {} ({}) in {}",
        plan.names().join(", "),
        version.sem_ver,
        config.configuration(),
        root.display()
    );

    let context = BuildContext::new(root, config, version);
    let runner: &dyn CommandRunner = if args.dry_run {
        &DryRunRunner
    } else {
        &SystemRunner
    };
    plan.execute(&context, runner)?;

    info!("done");
    Ok(())
}

fn list(graph: &TargetGraph, out: &mut impl Write) -> Result<()> {
    for target in graph.targets() {
        let default = if target.name == DEFAULT_TARGET {
            " (default)"
        } else {
            ""
        };
        writeln!(out, "{:<10} {}{default}", target.name, target.description)?;
        if !target.depends_on.is_empty() {
            writeln!(out, "{:<10}   depends on: {}", "", target.depends_on.join(", "))?;
        }
        if !target.runs_before.is_empty() {
            writeln!(out, "{:<10}   runs before: {}", "", target.runs_before.join(", "))?;
        }
        if !target.required_parameters.is_empty() {
            writeln!(
                out,
                "{:<10}   requires: {}",
                "",
                target
                    .required_parameters
                    .iter()
                    .map(|parameter| format!("--{parameter}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
        }
    }
    Ok(())
}
