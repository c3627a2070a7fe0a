use std::{
    io,
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use require_codeowners::{
    config::DEFAULT_CONFIG_PATH, locate, render, render::Format, Config, DirectorySpec, Validator,
    EXIT_CONFIG_ERROR, EXIT_SUCCESS, EXIT_VALIDATION_FAILED,
};

#[derive(Parser)]
#[command(version, about = "Check that directories are covered by CODEOWNERS rules")]
#[command(long_about = "Check that directories are covered by CODEOWNERS rules.\n\n\
    Exit codes:\n  \
    0 - All directories are covered\n  \
    1 - One or more directories failed the check\n  \
    2 - Configuration or startup error")]
struct Cli {
    /// Config file [default: <root>/.requirecodeowners.yml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CODEOWNERS file [default: auto-detected under <root>]
    #[arg(long = "codeowners-path")]
    codeowners_path: Option<PathBuf>,

    /// Repository root that directory paths are relative to
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Directory to check, replacing the config file (repeatable)
    #[arg(long = "dir", value_name = "PATH[:LEVEL]")]
    dirs: Vec<DirectorySpec>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Github)]
    format: Format,

    /// Increase log verbosity (-v, -vv for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.root.join(DEFAULT_CONFIG_PATH))
    }

    /// The specs to validate and a name for where they came from.
    fn specs(&self) -> Result<(Vec<DirectorySpec>, String)> {
        if !self.dirs.is_empty() {
            return Ok((self.dirs.clone(), "--dir flags".to_owned()));
        }
        let path = self.config_path();
        let config = Config::load(&path)?;
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok((config.directories, source))
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(&cli) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_VALIDATION_FAILED,
        Err(err) => {
            eprintln!("error: {err:#}");
            EXIT_CONFIG_ERROR
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<bool> {
    let (specs, source) = cli.specs()?;
    let (codeowners_path, ruleset) =
        locate::load_ruleset(&cli.root, cli.codeowners_path.as_deref())?;
    tracing::info!(
        codeowners = %codeowners_path.display(),
        specs = specs.len(),
        root = %display_root(&cli.root),
        "checking CODEOWNERS coverage"
    );

    let report = Validator::new(&ruleset)
        .root(&cli.root)
        .source(source)
        .validate(&specs);

    render::render(
        &report,
        cli.format,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;
    Ok(report.is_success())
}

fn display_root(root: &Path) -> String {
    root.canonicalize()
        .unwrap_or_else(|_| root.to_path_buf())
        .display()
        .to_string()
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}
