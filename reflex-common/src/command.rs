// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Line protocol spoken over the remote link.
//!
//! Requests are single case-sensitive lines:
//! - `SELECT_PLAYERS_<n>`: set the active player count
//! - `SET_PLAYER_<i>_<name>`: rename player `i` (one-based)
//! - `START`: start a round
//! - `VIEW_HISTORY`, `VIEW_LEADERBOARD`, `DELETE_HISTORY`
//!
//! Every request gets one `OK: `, `ERROR: ` or `WARNING: ` line back, and
//! the view commands follow it with data lines.

use core::fmt;
use heapless::String;

use crate::config::MAX_LINE_LEN;

pub type Line = String<MAX_LINE_LEN>;

const SELECT_PLAYERS: &str = "SELECT_PLAYERS_";
const SET_PLAYER: &str = "SET_PLAYER_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Requested count; `None` when the argument is not a number.
    SelectPlayers(Option<u32>),
    /// One-based index (`None` when not a number) and the raw name.
    SetPlayer { index: Option<u32>, name: Line },
    Start,
    ViewHistory,
    ViewLeaderboard,
    DeleteHistory,
    Unknown,
}

impl Command {
    /// Parse one received line. Surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Some(arg) = line.strip_prefix(SELECT_PLAYERS) {
            return Self::SelectPlayers(arg.parse().ok());
        }
        if let Some(arg) = line.strip_prefix(SET_PLAYER) {
            let (index, name) = arg.split_once('_').unwrap_or((arg, ""));
            return Self::SetPlayer {
                index: index.parse().ok(),
                name: Line::try_from(name).unwrap_or_default(),
            };
        }
        match line {
            "START" => Self::Start,
            "VIEW_HISTORY" => Self::ViewHistory,
            "VIEW_LEADERBOARD" => Self::ViewLeaderboard,
            "DELETE_HISTORY" => Self::DeleteHistory,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectPlayers(Some(n)) => write!(f, "{SELECT_PLAYERS}{n}"),
            Self::SelectPlayers(None) => f.write_str(SELECT_PLAYERS),
            Self::SetPlayer { index, name } => {
                f.write_str(SET_PLAYER)?;
                if let Some(i) = index {
                    write!(f, "{i}")?;
                }
                write!(f, "_{name}")
            }
            Self::Start => f.write_str("START"),
            Self::ViewHistory => f.write_str("VIEW_HISTORY"),
            Self::ViewLeaderboard => f.write_str("VIEW_LEADERBOARD"),
            Self::DeleteHistory => f.write_str("DELETE_HISTORY"),
            Self::Unknown => Ok(()),
        }
    }
}

/// Status line sent back by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply<'a> {
    Ok(&'a str),
    Error(&'a str),
    Warning(&'a str),
    /// Any other line: result text, history chunks, leaderboard entries.
    Data(&'a str),
}

impl<'a> Reply<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(rest) = line.strip_prefix("OK: ") {
            Self::Ok(rest)
        } else if let Some(rest) = line.strip_prefix("ERROR: ") {
            Self::Error(rest)
        } else if let Some(rest) = line.strip_prefix("WARNING: ") {
            Self::Warning(rest)
        } else {
            Self::Data(line)
        }
    }

    pub fn is_status(&self) -> bool {
        !matches!(self, Self::Data(_))
    }
}
