use anyhow::Result;
use clap::Parser; // needed for Cli::parse()

use flashdeck_app::cli::commands::run_cli;
use flashdeck_app::cli::opts::Cli;
use flashdeck_app::logging::init_tracing;

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    // Everything runs on this one thread, one call at a time.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run_cli(args))
}
