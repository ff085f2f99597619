// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Best reaction time per player slot.
//!
//! Slot `i` always holds player `i`'s personal best; it is not a ranking.
//! Persisted as one `name,bestTime` line per slot, empty slots included.

use core::fmt::Write as _;
use heapless::String;

use crate::config::{PlayerName, LEADERBOARD_BLOB, MAX_PLAYERS, NAME_MAX_LEN};
use crate::result::RoundResult;
use crate::storage::{BlobStorage, StorageError};

/// Longest leaderboard blob: name, comma, ten digits and a newline per slot.
pub const LEADERBOARD_TEXT_CAP: usize = MAX_PLAYERS * (NAME_MAX_LEN + 12);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    pub name: PlayerName,
    /// Best time in ms, 0 when unset.
    pub best_reaction_time: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    slots: [Player; MAX_PLAYERS],
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Player; MAX_PLAYERS] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Player> {
        self.slots.get(index)
    }

    /// Slots that hold a best time.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Player)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, p)| p.best_reaction_time > 0)
    }

    /// Fold a round in. Returns true when any slot changed.
    pub fn update(&mut self, result: &RoundResult) -> bool {
        let mut changed = false;
        for (slot, (name, outcome)) in self.slots.iter_mut().zip(result.entries()) {
            let Some(ms) = outcome.reaction_time() else {
                continue;
            };
            if slot.best_reaction_time == 0 || ms < slot.best_reaction_time {
                info!("Leaderboard: {} improved to {} ms", name.as_str(), ms);
                slot.name = name.clone();
                slot.best_reaction_time = ms;
                changed = true;
            }
        }
        changed
    }

    /// Parse `name,time` lines into the slots, stopping at the end of the text.
    ///
    /// Slots past the last line keep their current value. A missing comma
    /// reads as a name without a time; an unparsable time reads as 0.
    pub fn load(&mut self, text: &str) -> usize {
        let mut loaded = 0;
        for (slot, line) in self.slots.iter_mut().zip(text.lines()) {
            let (name, time) = line.split_once(',').unwrap_or((line, ""));
            slot.name = truncate_name(name);
            slot.best_reaction_time = time.trim().parse().unwrap_or(0);
            loaded += 1;
        }
        loaded
    }

    /// Serialize every slot as a `name,time` line.
    pub fn save(&self) -> String<LEADERBOARD_TEXT_CAP> {
        let mut text = String::new();
        for slot in &self.slots {
            let _ = writeln!(text, "{},{}", slot.name, slot.best_reaction_time);
        }
        text
    }

    pub fn load_from<S: BlobStorage>(&mut self, storage: &mut S) -> Result<usize, StorageError> {
        if !storage.exists(LEADERBOARD_BLOB) {
            info!("Leaderboard: no stored leaderboard");
            return Err(StorageError::NotFound);
        }

        let mut buf = [0u8; LEADERBOARD_TEXT_CAP];
        let len = storage.read(LEADERBOARD_BLOB, &mut buf)?;
        let text = core::str::from_utf8(&buf[..len]).map_err(|_| StorageError::Corrupt)?;
        let loaded = self.load(text);
        info!("Leaderboard: loaded {} slots", loaded);
        Ok(loaded)
    }

    pub fn save_to<S: BlobStorage>(&self, storage: &mut S) -> Result<(), StorageError> {
        storage.write(LEADERBOARD_BLOB, self.save().as_bytes())
    }
}

fn truncate_name(name: &str) -> PlayerName {
    let mut end = name.len().min(NAME_MAX_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    PlayerName::try_from(&name[..end]).unwrap_or_default()
}
