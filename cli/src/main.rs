//! fundgov: operator CLI for inspecting a governance store.
//!
//! Opens the LMDB environment read-only, so it can run next to a live
//! engine.

mod output;

use anyhow::Context;
use clap::Parser;
use fundgov_governance::{EngineConfig, GovernanceReader, ProposalStatus};
use fundgov_store_lmdb::LmdbEnvironment;
use fundgov_types::{Name, Timestamp};
use fundgov_utils::{init_logging, LogFormat};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fundgov", about = "Inspect fundgov governance state")]
struct Cli {
    /// Path to a TOML configuration file. Without one, defaults apply.
    #[arg(long, env = "FUNDGOV_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory, overriding the config file.
    #[arg(long, env = "FUNDGOV_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level, overriding the config file.
    #[arg(long, env = "FUNDGOV_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show the governance parameters.
    Params,
    /// List proposals.
    Proposals {
        /// Only proposals in this status.
        #[arg(long)]
        status: Option<ProposalStatus>,
    },
    /// Show one proposal.
    Proposal { name: Name },
    /// List the ballots cast on a proposal.
    Ballots { name: Name },
    /// List queued disbursements.
    Outbox {
        /// Only intents not yet delivered.
        #[arg(long)]
        pending: bool,
    },
    /// Print the effective configuration.
    ShowConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level)?;

    if let Command::ShowConfig = cli.command {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let env = LmdbEnvironment::open_read_only(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;
    let store = env.governance_store();
    let reader = GovernanceReader::new(&store, &config);
    tracing::debug!(data_dir = %config.data_dir.display(), "store opened");

    let now = Timestamp::now();
    match cli.command {
        Command::Params => {
            let params = reader.params()?;
            emit(cli.json, &params, || output::params(&params))
        }
        Command::Proposals { status } => {
            let proposals = reader.proposals(status)?;
            emit(cli.json, &proposals, || output::proposal_list(&proposals, now))
        }
        Command::Proposal { name } => {
            let proposal = reader.proposal(&name)?;
            emit(cli.json, &proposal, || output::proposal(&proposal, now))
        }
        Command::Ballots { name } => {
            let ballots = reader.ballots(&name)?;
            emit(cli.json, &ballots, || output::ballots(&ballots))
        }
        Command::Outbox { pending } => {
            let intents = if pending {
                reader.pending_disbursements()?
            } else {
                reader.disbursements()?
            };
            emit(cli.json, &intents, || output::outbox(&intents))
        }
        Command::ShowConfig => Ok(()),
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}
