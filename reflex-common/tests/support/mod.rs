// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! In-memory stand-ins for the hardware collaborators.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};

use reflex_common::command::Line;
use reflex_common::game::TickOutcome;
use reflex_common::sequencer::{DurationSource, Phase};
use reflex_common::storage::{BlobStorage, StorageError};
use reflex_common::{Clock, Game, GameOptions, Link, TextDisplay, TextSize, TouchCaptureState};

/// Clock that moves forward one millisecond every time it is read.
pub struct StepClock {
    now: Cell<u32>,
}

impl StepClock {
    pub fn starting_at(ms: u32) -> Self {
        Self { now: Cell::new(ms) }
    }
}

impl Clock for StepClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now + 1);
        now
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now.set(self.now.get() + ms);
    }
}

/// Always picks the low end of each range.
pub struct ShortestDurations;

impl DurationSource for ShortestDurations {
    fn between(&mut self, lo: u32, _hi: u32) -> u32 {
        lo
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub lines: Vec<String>,
    pub size: TextSize,
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub screens: Vec<Screen>,
}

impl RecordingDisplay {
    pub fn last(&self) -> Option<&Screen> {
        self.screens.last()
    }

    pub fn showed(&self, text: &str) -> bool {
        self.screens
            .iter()
            .any(|s| s.lines.iter().any(|l| l == text))
    }
}

impl TextDisplay for RecordingDisplay {
    fn show_text(&mut self, lines: &[&str], size: TextSize) {
        self.screens.push(Screen {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            size,
        });
    }

    fn clear(&mut self) {
        self.screens.push(Screen {
            lines: Vec::new(),
            size: TextSize::Normal,
        });
    }
}

#[derive(Default)]
pub struct MockLink {
    pub incoming: VecDeque<String>,
    pub sent: Vec<String>,
}

impl MockLink {
    pub fn push(&mut self, line: &str) {
        self.incoming.push_back(line.to_string());
    }

    pub fn take_sent(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sent)
    }
}

impl Link for MockLink {
    fn read_line(&mut self) -> Option<Line> {
        let line = self.incoming.pop_front()?;
        Line::try_from(line.as_str()).ok()
    }

    fn send_line(&mut self, line: &str) {
        self.sent.push(line.to_string());
    }
}

#[derive(Default)]
pub struct MemStorage {
    pub blobs: HashMap<String, Vec<u8>>,
    pub fail_writes: bool,
    pub reported_usage: Option<u32>,
}

impl MemStorage {
    pub fn text(&self, name: &str) -> Option<String> {
        self.blobs
            .get(name)
            .map(|b| String::from_utf8(b.clone()).unwrap())
    }
}

impl BlobStorage for MemStorage {
    fn read(&mut self, name: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let blob = self.blobs.get(name).ok_or(StorageError::NotFound)?;
        if blob.len() > buf.len() {
            return Err(StorageError::TooLarge);
        }
        buf[..blob.len()].copy_from_slice(blob);
        Ok(blob.len())
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io);
        }
        self.blobs.insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn exists(&mut self, name: &str) -> bool {
        self.blobs.contains_key(name)
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        self.blobs
            .remove(name)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    fn used_bytes(&mut self) -> u32 {
        self.reported_usage
            .unwrap_or_else(|| self.blobs.values().map(|b| b.len() as u32).sum())
    }
}

pub type TestGame<'t> =
    Game<'t, RecordingDisplay, MockLink, MemStorage, StepClock, ShortestDurations>;

pub fn game(touch: &TouchCaptureState, storage: Option<MemStorage>) -> TestGame<'_> {
    game_with_options(touch, storage, GameOptions::default())
}

pub fn game_with_options(
    touch: &TouchCaptureState,
    storage: Option<MemStorage>,
    options: GameOptions,
) -> TestGame<'_> {
    Game::new(
        touch,
        ShortestDurations,
        RecordingDisplay::default(),
        MockLink::default(),
        storage,
        StepClock::starting_at(10_000),
        options,
    )
}

/// Tick until the sequencer reaches green and return its start time.
pub fn tick_until_green(game: &mut TestGame<'_>) -> u32 {
    loop {
        game.tick();
        if let Phase::Green { started_at, .. } = game.phase() {
            return started_at;
        }
    }
}

/// Start time of the red phase the game is currently in.
pub fn red_started_at(game: &TestGame<'_>) -> u32 {
    match game.phase() {
        Phase::Red { started_at, .. } => started_at,
        other => panic!("expected red, got {other:?}"),
    }
}

/// Tick until the round is over.
pub fn finish_round(game: &mut TestGame<'_>) {
    while game.tick() != TickOutcome::Finished {}
}
