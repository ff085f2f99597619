// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Game logic for the Reflex Rush reaction-time game.
//!
//! This crate supports both `no_std` (embedded) and `std` (host) environments:
//! - Default: `no_std` mode for the RP2040 firmware
//! - `std` feature: Enables `std` support for the host remote tool
//! - `defmt` feature: Routes log calls to `defmt`
//!
//! Hardware is reached only through the traits in [`io`], so every round can
//! be driven on the host with fakes.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
mod log;

pub mod command;
pub mod config;
pub mod game;
pub mod history;
pub mod input;
pub mod io;
pub mod leaderboard;
pub mod menu;
pub mod result;
pub mod sequencer;
pub mod service;
pub mod storage;
pub mod touch;

// Re-export commonly used types
pub use command::{Command, Reply};
pub use config::{GameOptions, GameSettings, PlayerName, SettingsError, MAX_PLAYERS};
pub use game::Game;
pub use history::{AppendOutcome, HistoryLog};
pub use io::{Clock, Link, TextDisplay, TextSize};
pub use leaderboard::{Leaderboard, Player};
pub use result::{Outcome, RoundResult};
pub use sequencer::{Action, DurationSource, Light, Phase, Sequencer, XorShift};
pub use storage::{BlobStorage, StorageError};
pub use touch::{TouchCaptureState, TouchChannel};
