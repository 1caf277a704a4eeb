//! CLI module for the notes API
//!
//! - `serve`: run the HTTP server (default)
//! - `migrate`: apply or revert PostgreSQL schema migrations

pub mod migrate;
pub mod serve;

use clap::{Args, Parser, Subcommand};

/// Notes API - user lifecycle management over HTTP
#[derive(Parser)]
#[command(name = "notes-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default mode)
    Serve,

    /// Apply pending database migrations
    Migrate(MigrateArgs),
}

#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead
    #[arg(long)]
    pub revert: bool,
}
