use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use mfr_risk::pipeline::adjust::InputProfile;
use mfr_risk::{RiskService, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "mfr-risk", version, about = "Material fire-risk scoring service")]
struct Cli {
    /// Training dataset (.csv, .json or .parquet).
    #[arg(long, env = "MFR_DATASET", default_value = mfr_risk::config::DEFAULT_DATASET, global = true)]
    dataset: PathBuf,

    /// Units incoming requests are expressed in.
    #[arg(long, env = "MFR_PROFILE", value_enum, default_value_t = Profile::Interface, global = true)]
    profile: Profile,

    /// Ridge L2 penalty.
    #[arg(long, default_value_t = 0.1, global = true)]
    ridge_penalty: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Profile {
    Measurement,
    Interface,
}

impl From<Profile> for InputProfile {
    fn from(p: Profile) -> Self {
        match p {
            Profile::Measurement => InputProfile::Measurement,
            Profile::Interface => InputProfile::Interface,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answers one JSON request per stdin line with one JSON response per stdout line.
    Serve,
    /// Scores a single request read from a JSON file.
    Predict {
        #[arg(long)]
        input: PathBuf,
    },
    /// Prints the frozen training stats and feature groups as JSON.
    Stats {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    fn config(&self) -> ServiceConfig {
        ServiceConfig {
            dataset: self.dataset.clone(),
            ridge_penalty: self.ridge_penalty,
            profile: self.profile.into(),
            ..ServiceConfig::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // nothing is served unless training succeeds
    let service = RiskService::from_config(&cli.config()).context("starting risk service")?;

    match &cli.command {
        Commands::Serve => serve(&service),
        Commands::Predict { input } => {
            let text = std::fs::read_to_string(input)
                .with_context(|| format!("reading {}", input.display()))?;
            println!("{}", service.respond(&text));
            Ok(())
        }
        Commands::Stats { out } => {
            let body = json!({
                "profile": service.profile(),
                "stats": service.stats(),
                "featureColumns": service.feature_columns(),
                "featureGroups": service.feature_groups(),
                "evaluation": service.evaluation(),
            });
            let text = serde_json::to_string_pretty(&body)?;
            match out {
                Some(path) => std::fs::write(path, text)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{text}"),
            }
            Ok(())
        }
    }
}

fn serve(service: &RiskService) -> Result<()> {
    log::info!("serving requests on stdin");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("reading request")?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(stdout, "{}", service.respond(&line))?;
        stdout.flush()?;
    }
    Ok(())
}
