use anyhow::{Context, Result};
use clap::Parser;
use flightdelay::{Config, DelayPipeline, Query, SUPPORTED_YEARS};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Average arrival delay of flights into an airport for one year.
#[derive(Debug, Parser)]
#[command(name = "flightdelay", version, about)]
struct Cli {
    /// Year of the dataset (1987-2008).
    #[arg(required_unless_present = "years")]
    year: Option<String>,

    /// Destination airport IATA code, e.g. LAX.
    #[arg(required_unless_present = "years")]
    airport: Option<String>,

    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base address the yearly archives are published under.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Connect timeout in seconds.
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u64>,

    /// Read timeout in seconds.
    #[arg(long, value_name = "SECS")]
    read_timeout: Option<u64>,

    /// Deadline for the whole download in seconds.
    #[arg(long, value_name = "SECS")]
    transfer_timeout: Option<u64>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// List the years the dataset covers and exit.
    #[arg(long)]
    years: bool,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let base = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let mut cfg = base.apply_env()?;
        if let Some(url) = &self.base_url {
            cfg.base_url.clone_from(url);
        }
        if let Some(secs) = self.connect_timeout {
            cfg.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.read_timeout {
            cfg.read_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.transfer_timeout {
            cfg.transfer_timeout = Duration::from_secs(secs);
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.years {
        for year in SUPPORTED_YEARS {
            println!("{year}");
        }
        return Ok(());
    }

    let query = Query::parse(cli.year.as_deref(), cli.airport.as_deref())?;
    let config = cli.config().context("configuration")?;
    let report = DelayPipeline::new(config)
        .run(&query)
        .with_context(|| format!("average delay for {query}"))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
