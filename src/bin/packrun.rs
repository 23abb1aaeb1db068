use {
    anyhow::Result,
    clap::{Args, Parser},
    log::error,
};

#[derive(Parser)]
#[command(name = "packrun", about = "Package build tasks", version)]
struct Packrun {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(flatten)]
    run: packrun::commands::run::CommandArgs,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

fn main() {
    if let Err(err) = try_main() {
        error!("Error: {err}");
        for (i, cause) in err.chain().skip(1).enumerate() {
            error!("  {}: {}", i.saturating_add(1), cause);
        }
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let packrun = Packrun::parse();

    if packrun.global.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    packrun::commands::run::run(packrun.run)
}
