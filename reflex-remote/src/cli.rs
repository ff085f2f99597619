// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use reflex_common::config::MAX_PLAYERS;

use crate::commands;
use crate::transport::Transport;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "reflex-remote")]
#[command(about = "Remote control for the Reflex Rush game", version)]
pub struct Cli {
    /// Serial port (e.g., /dev/ttyACM0)
    #[arg(short, long)]
    pub port: String,

    /// Baud rate (ignored by USB CDC, used by UART bridges)
    #[arg(short, long, default_value = "115200")]
    pub baud: u32,

    /// Quiet period in ms after which a reply is considered complete
    #[arg(short, long, default_value = "1000")]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Set the number of active players
    Players {
        #[arg(value_name = "COUNT", value_parser = clap::value_parser!(u32).range(1..=MAX_PLAYERS as i64))]
        count: u32,
    },

    /// Rename a player
    Name {
        /// Player number, starting at 1
        #[arg(value_name = "INDEX")]
        index: u32,

        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Start a round
    Start {
        /// Wait for the round and print its result
        #[arg(short, long)]
        wait: bool,
    },

    /// Download the game history
    History {
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the best reaction time per player slot
    Leaderboard,

    /// Delete the game history
    DeleteHistory,

    /// Send one protocol line verbatim
    Raw {
        #[arg(value_name = "LINE")]
        line: String,
    },

    /// Print everything the device sends
    Monitor,
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<()> {
    let mut transport = Transport::new(&cli.port, cli.baud, cli.timeout_ms)?;

    match cli.command {
        Commands::Players { count } => commands::select_players(&mut transport, count),
        Commands::Name { index, name } => commands::set_player(&mut transport, index, &name),
        Commands::Start { wait } => commands::start(&mut transport, wait),
        Commands::History { output } => commands::history(&mut transport, output.as_deref()),
        Commands::Leaderboard => commands::leaderboard(&mut transport),
        Commands::DeleteHistory => commands::delete_history(&mut transport),
        Commands::Raw { line } => commands::raw(&mut transport, &line),
        Commands::Monitor => commands::monitor(&mut transport),
    }
}
