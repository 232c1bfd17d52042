use anyhow::Context;
use clap::Parser;
use nextcloud_caddy_gen::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    cli::run(&cli).context("nextcloud-caddy-gen failed")?;
    Ok(())
}
