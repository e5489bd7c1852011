use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::op::{Op, OpContext};
use crate::ops::{Capsule, Daemon, Init, Version};

/// Kairos - time-locked message and file vault
#[derive(Debug, Parser)]
#[command(name = "kairos", author, version, about, long_about = None)]
pub struct Args {
    /// URL of a remote daemon to drive (defaults to the local daemon)
    #[arg(long, global = true)]
    pub remote: Option<String>,

    /// Override the kairos config directory (~/.kairos)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize the kairos config directory
    Init(Init),
    /// Run the daemon serving the capsule API
    Daemon(Daemon),
    /// Capsule operations
    #[command(subcommand)]
    Capsule(Capsule),
    /// Print version information
    Version(Version),
}

impl Command {
    pub async fn execute(&self, ctx: &OpContext) -> anyhow::Result<String> {
        match self {
            Command::Init(op) => Ok(op.execute(ctx).await?),
            Command::Daemon(op) => Ok(op.execute(ctx).await?),
            Command::Capsule(op) => op.execute(ctx).await,
            Command::Version(op) => Ok(op.execute(ctx).await?),
        }
    }
}
