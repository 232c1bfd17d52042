use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{Config, DEFAULT_PROJECT_DIR, Instance};
use crate::error::{GenError, GenResult};
use crate::script;

#[derive(Parser, Debug)]
#[command(name = "nextcloud-caddy-gen")]
#[command(about = "Generate a multi-tenant Nextcloud deployment script with Caddy")]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the deployment script
    Generate {
        #[command(flatten)]
        opts: GenerateOptions,
    },

    /// Write a starter configuration file (YAML)
    Init {
        /// Destination file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Configuration file (.json, .yml or .yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory created on the server
    #[arg(long)]
    pub project_dir: Option<String>,

    /// Let's Encrypt contact email
    #[arg(long)]
    pub email: Option<String>,

    /// Instance to deploy, repeatable. Order sets the instance
    /// number.
    #[arg(long = "instance", value_name = "DOMAIN[:ADMIN]")]
    pub instances: Vec<Instance>,

    /// Destination file, stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl GenerateOptions {
    /// Build the configuration: file first, then flags. Scalar
    /// flags replace file values, `--instance` entries are appended.
    pub fn resolve(&self) -> GenResult<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_path(path)?,
            None => Config::new(DEFAULT_PROJECT_DIR, ""),
        };

        if let Some(dir) = &self.project_dir {
            config.project_dir.clone_from(dir);
        }
        if let Some(email) = &self.email {
            config.acme_email.clone_from(email);
        }
        config.instances.extend(self.instances.iter().cloned());

        Ok(config)
    }
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over the
/// verbosity flag.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second call keeps the subscriber already installed.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Dispatch a parsed command line.
pub fn run(cli: &Cli) -> GenResult<()> {
    match &cli.command {
        Command::Generate { opts } => cmd_generate(opts),
        Command::Init { output, force } => cmd_init(output.as_deref(), *force),
    }
}

fn cmd_generate(opts: &GenerateOptions) -> GenResult<()> {
    let config = opts.resolve()?;
    debug!(?config, "resolved configuration");

    config.validate()?;

    let script = script::compose(&config);
    info!(
        instances = config.instances.len(),
        bytes = script.len(),
        "rendered deployment script"
    );

    match &opts.output {
        Some(path) => {
            write_executable(path, &script)?;
            info!("wrote {}", path.display());
            eprintln!("Run it on your server:");
            eprintln!("  chmod +x {0} && ./{0}", display_name(path));
        }
        None => print!("{script}"),
    }

    Ok(())
}

fn cmd_init(output: Option<&Path>, force: bool) -> GenResult<()> {
    let yaml = Config::starter().to_yaml()?;

    match output {
        Some(path) => {
            if path.exists() && !force {
                return Err(GenError::FileExists(path.display().to_string()));
            }
            fs::write(path, yaml)?;
            info!("wrote starter configuration to {}", path.display());
        }
        None => print!("{yaml}"),
    }

    Ok(())
}

fn write_executable(path: &Path, contents: &str) -> GenResult<()> {
    fs::write(path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| path.display().to_string(), ToString::to_string)
}
