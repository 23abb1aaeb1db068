//! The package build: clean, restore, build, test, pack and push.

use {
    crate::{
        error::{GraphError, NoPackagesFound},
        graph::TargetGraph,
        types::{BuildContext, Target},
        utils::{
            fs::{ensure_clean_dir, find_files_by_extension},
            process::{CommandRunner, Invocation},
        },
    },
    anyhow::{anyhow, Result},
    log::{info, warn},
};

pub const CLEAN: &str = "Clean";
pub const RESTORE: &str = "Restore";
pub const BUILD: &str = "Build";
pub const TEST: &str = "Test";
pub const PACK: &str = "Pack";
pub const PUSH: &str = "Push";

pub const DEFAULT_TARGET: &str = BUILD;

pub const SOURCE_PARAMETER: &str = "source";
pub const API_KEY_PARAMETER: &str = "api-key";

pub const PACKAGE_EXTENSION: &str = "nupkg";
pub const SYMBOL_PACKAGE_EXTENSION: &str = "snupkg";

pub fn targets() -> Vec<Target> {
    vec![
        Target {
            name: CLEAN,
            description: "Delete and recreate the artifacts directory",
            depends_on: vec![],
            runs_before: vec![RESTORE],
            required_parameters: vec![],
            action: clean,
        },
        Target {
            name: RESTORE,
            description: "Restore package dependencies",
            depends_on: vec![],
            runs_before: vec![],
            required_parameters: vec![],
            action: restore,
        },
        Target {
            name: BUILD,
            description: "Compile with version stamping",
            depends_on: vec![RESTORE],
            runs_before: vec![TEST],
            required_parameters: vec![],
            action: build,
        },
        Target {
            name: TEST,
            description: "Run the tests against the existing build",
            depends_on: vec![],
            runs_before: vec![PACK],
            required_parameters: vec![],
            action: test,
        },
        Target {
            name: PACK,
            description: "Pack packages and symbol packages into the artifacts directory",
            depends_on: vec![],
            runs_before: vec![],
            required_parameters: vec![],
            action: pack,
        },
        Target {
            name: PUSH,
            description: "Publish every package in the artifacts directory",
            depends_on: vec![PACK],
            runs_before: vec![],
            required_parameters: vec![SOURCE_PARAMETER, API_KEY_PARAMETER],
            action: push,
        },
    ]
}

pub fn graph() -> Result<TargetGraph, GraphError> {
    TargetGraph::new(targets())
}

/// `<package manager> <subcommand> [<project>]`, run from the repository root.
fn package_manager(context: &BuildContext, subcommand: &str) -> Invocation {
    let invocation = Invocation::new(&context.config.package_manager)
        .arg(subcommand)
        .current_dir(context.root());
    match &context.config.project {
        Some(project) => invocation.arg(project.to_string_lossy()),
        None => invocation,
    }
}

fn clean(context: &BuildContext, _runner: &dyn CommandRunner) -> Result<()> {
    let artifacts_dir = context.artifacts_dir();
    info!("cleaning {}", artifacts_dir.display());
    ensure_clean_dir(&artifacts_dir)
}

fn restore(context: &BuildContext, runner: &dyn CommandRunner) -> Result<()> {
    runner.run(&package_manager(context, "restore"))
}

fn build(context: &BuildContext, runner: &dyn CommandRunner) -> Result<()> {
    info!("version: {}", context.version.sem_ver);
    let invocation = package_manager(context, "build")
        .args(["--configuration", context.config.configuration()])
        .arg("--no-restore")
        .args(context.version.msbuild_properties());
    runner.run(&invocation)
}

fn test(context: &BuildContext, runner: &dyn CommandRunner) -> Result<()> {
    let invocation = package_manager(context, "test")
        .args(["--configuration", context.config.configuration()])
        .args(["--no-build", "--no-restore"]);
    runner.run(&invocation)
}

fn pack(context: &BuildContext, runner: &dyn CommandRunner) -> Result<()> {
    let invocation = package_manager(context, "pack")
        .args(["--configuration", context.config.configuration()])
        .arg("--output")
        .arg(context.artifacts_dir().to_string_lossy())
        .args(["--include-symbols", "--include-source"])
        .args(["--no-build", "--no-restore"])
        .args(context.version.msbuild_properties())
        .arg(format!("-p:SymbolPackageFormat={SYMBOL_PACKAGE_EXTENSION}"));
    runner.run(&invocation)
}

fn push(context: &BuildContext, runner: &dyn CommandRunner) -> Result<()> {
    let parameter = |name: &str| {
        context
            .config
            .parameter(name)
            .ok_or_else(|| anyhow!("parameter `{name}` is not set"))
    };
    let source = parameter(SOURCE_PARAMETER)?;
    let api_key = parameter(API_KEY_PARAMETER)?;

    let artifacts_dir = context.artifacts_dir();
    let mut packages = vec![];
    for extension in [PACKAGE_EXTENSION, SYMBOL_PACKAGE_EXTENSION] {
        let found = find_files_by_extension(&artifacts_dir, extension)?;
        if found.is_empty() {
            warn!("no *.{extension} files in {}", artifacts_dir.display());
        }
        packages.extend(found);
    }
    if packages.is_empty() {
        return Err(NoPackagesFound { dir: artifacts_dir }.into());
    }

    info!("pushing {} package(s) to {source}", packages.len());
    for package in packages {
        let invocation = Invocation::new(&context.config.package_manager)
            .args(["nuget", "push"])
            .arg(package.to_string_lossy())
            .args(["--source", source])
            .arg("--api-key")
            .secret(api_key)
            .current_dir(context.root());
        runner.run(&invocation)?;
    }
    Ok(())
}
