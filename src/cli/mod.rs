//! CLI module for gdev
//!
//! Provides subcommands:
//! - `serve`: HTTP server with token-protected routes
//! - `copy`: mirror a directory tree, preserving ownership and permissions
//! - `token`: issue a signed token for a subject and role

pub mod copy;
pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};

/// gdev - directory copy and token authentication utilities
#[derive(Parser)]
#[command(name = "gdev")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Copy a directory tree
    Copy(copy::CopyArgs),

    /// Issue a signed token
    Token(token::TokenArgs),
}
