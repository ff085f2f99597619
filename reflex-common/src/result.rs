// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Round outcomes and their text form.

use core::fmt::{self, Write as _};
use heapless::{String, Vec};

use crate::config::{PlayerName, MAX_PLAYERS, NAME_MAX_LEN};
use crate::touch::{TouchCaptureState, JUMPSTART, UNSET};

/// Header + one line per player with room for the longest name and time.
pub const RESULT_TEXT_CAP: usize = 16 + MAX_PLAYERS * (NAME_MAX_LEN + 24);

/// Outcome of one player in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Touched before green.
    Jumpstart,
    /// Milliseconds from green to touch.
    ReactionTime(u32),
    NoResponse,
}

impl Outcome {
    /// Classify a channel from its final state.
    ///
    /// Precedence is jumpstart, then reaction time, then no response. A
    /// timestamp that precedes the green start can only come from a touch
    /// before green, so it counts as a jumpstart too. Times are compared as
    /// wrapping differences so a round that spans a clock wrap still scores.
    pub fn classify(touched: bool, timestamp: u32, green_started_at: u32) -> Self {
        if !touched || timestamp == UNSET {
            return Self::NoResponse;
        }
        let elapsed = timestamp.wrapping_sub(green_started_at);
        if timestamp == JUMPSTART || (elapsed as i32) < 0 {
            return Self::Jumpstart;
        }
        if elapsed > 0 {
            Self::ReactionTime(elapsed)
        } else {
            Self::NoResponse
        }
    }

    pub fn reaction_time(&self) -> Option<u32> {
        match self {
            Self::ReactionTime(ms) => Some(*ms),
            _ => None,
        }
    }
}

/// One entry per active player, in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    entries: Vec<(PlayerName, Outcome), MAX_PLAYERS>,
}

impl RoundResult {
    /// Build the result from the capture state at the end of green.
    pub fn from_capture(
        touch: &TouchCaptureState,
        names: &[PlayerName],
        green_started_at: u32,
    ) -> Self {
        let entries = names
            .iter()
            .take(MAX_PLAYERS)
            .enumerate()
            .map(|(i, name)| {
                let outcome =
                    Outcome::classify(touch.is_touched(i), touch.timestamp(i), green_started_at);
                (name.clone(), outcome)
            })
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: Vec<(PlayerName, Outcome), MAX_PLAYERS>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(PlayerName, Outcome)] {
        &self.entries
    }

    pub fn outcome(&self, slot: usize) -> Option<Outcome> {
        self.entries.get(slot).map(|(_, o)| *o)
    }

    /// Multi-line text as shown, sent and logged.
    pub fn to_text(&self) -> String<RESULT_TEXT_CAP> {
        let mut text = String::new();
        let _ = write!(text, "{self}");
        text
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Game result: \n")?;
        for (name, outcome) in &self.entries {
            match outcome {
                Outcome::Jumpstart => writeln!(f, "{name}: JS (Jumpstart)")?,
                Outcome::ReactionTime(ms) => writeln!(f, "{name}: {ms} ms")?,
                Outcome::NoResponse => writeln!(f, "{name}: No response")?,
            }
        }
        Ok(())
    }
}
