//! CLI module - Command-line interface for Telecombase
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};

/// Telecombase - telecom equipment inventory API
#[derive(Parser)]
#[command(name = "telecombase")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server (default)
    Serve,

    /// Apply database migrations and exit
    Migrate,

    /// Insert demo reference data into empty tables
    Seed,

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List all users
    #[command(alias = "ls")]
    List,

    /// Approve a pending user
    Approve {
        /// User ID
        id: i32,
    },
}
