// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Game constants and runtime settings.

use core::fmt;
use core::fmt::Write as _;
use heapless::String;

/// Maximum number of players (one touch channel each).
pub const MAX_PLAYERS: usize = 4;

/// Minimum spacing between two accepted edges on the same touch channel.
pub const DEBOUNCE_MS: u32 = 50;

/// Red phase duration range in ms (half-open).
pub const RED_RANGE_MS: (u32, u32) = (1000, 5000);
/// Yellow phase duration range in ms (half-open).
pub const YELLOW_RANGE_MS: (u32, u32) = (500, 2000);
/// Green phase duration range in ms (half-open).
pub const GREEN_RANGE_MS: (u32, u32) = (1000, 3000);

/// How long the result screen stays up after scoring.
pub const RESULT_DISPLAY_MS: u32 = 5000;
/// Hold after the result screen before the menu accepts input again.
pub const POST_ROUND_DELAY_MS: u32 = 5000;

/// Character budget of the history log.
pub const MAX_HISTORY_SIZE: usize = 10_000;
/// Size of one history chunk sent over the link.
pub const LINK_CHUNK_SIZE: usize = 200;
/// Pause between two history chunks.
pub const CHUNK_DELAY_MS: u32 = 50;
/// Longest accepted command line.
pub const MAX_LINE_LEN: usize = 64;

/// Characters per display row at text size 1.
pub const DISPLAY_COLUMNS: usize = 21;
/// Display rows at text size 1.
pub const DISPLAY_ROWS: usize = 8;

/// Joystick deflection (12-bit ADC) needed to register a move.
pub const JOYSTICK_THRESHOLD: u16 = 1000;
pub const ADC_MAX: u16 = 4095;
/// Minimum time between two joystick moves.
pub const JOYSTICK_REPEAT_MS: u32 = 200;
/// Confirm button must stay pressed this long.
pub const BUTTON_DEBOUNCE_MS: u32 = 20;

/// Used-bytes threshold after which history is wiped before saving.
pub const STORAGE_USAGE_LIMIT: u32 = 1024 * 1024;

pub const HISTORY_BLOB: &str = "history.txt";
pub const LEADERBOARD_BLOB: &str = "leaderboard.txt";

/// Longest player name in bytes.
pub const NAME_MAX_LEN: usize = 16;

pub type PlayerName = String<NAME_MAX_LEN>;

/// Settings validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Player count outside `1..=MAX_PLAYERS`.
    InvalidPlayerCount,
    /// Player index outside the active players.
    InvalidPlayer,
    /// Empty, too long, or containing characters the leaderboard blob cannot hold.
    InvalidName,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlayerCount => f.write_str("invalid player count"),
            Self::InvalidPlayer => f.write_str("invalid player index"),
            Self::InvalidName => f.write_str("invalid player name"),
        }
    }
}

/// Build-time switches for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOptions {
    /// Honour the remote `START` command.
    pub remote_start: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self { remote_start: true }
    }
}

/// Active player count and display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    player_count: u8,
    names: [PlayerName; MAX_PLAYERS],
}

impl GameSettings {
    pub fn new() -> Self {
        Self {
            player_count: 1,
            names: core::array::from_fn(default_name),
        }
    }

    pub fn player_count(&self) -> u8 {
        self.player_count
    }

    pub fn names(&self) -> &[PlayerName; MAX_PLAYERS] {
        &self.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|n| n.as_str())
    }

    /// Set the active player count, leaving it unchanged on error.
    pub fn set_player_count(&mut self, count: u32) -> Result<u8, SettingsError> {
        if count == 0 || count > MAX_PLAYERS as u32 {
            return Err(SettingsError::InvalidPlayerCount);
        }
        self.player_count = count as u8;
        Ok(self.player_count)
    }

    /// Rename the player at zero-based `index`.
    pub fn set_player_name(&mut self, index: usize, name: &str) -> Result<(), SettingsError> {
        if index >= self.player_count as usize {
            return Err(SettingsError::InvalidPlayer);
        }
        let name = validate_name(name)?;
        self.names[index] = name;
        Ok(())
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// `Player <n>` with a one-based number.
pub fn default_name(index: usize) -> PlayerName {
    let mut name = PlayerName::new();
    let _ = write!(name, "Player {}", index + 1);
    name
}

fn validate_name(name: &str) -> Result<PlayerName, SettingsError> {
    if name.is_empty() || name.contains([',', '\n', '\r']) {
        return Err(SettingsError::InvalidName);
    }
    PlayerName::try_from(name).map_err(|_| SettingsError::InvalidName)
}
