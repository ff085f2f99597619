// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Per-player touch capture shared between edge interrupts and the sequencer.
//!
//! Each channel is written by exactly one interrupt source. The main flow only
//! reads it, resets it between rounds, and stamps jumpstarts while the lights
//! are red or yellow. All fields are plain atomics accessed with load/store so
//! the same code runs on cores without compare-and-swap (Cortex-M0+).

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::{DEBOUNCE_MS, MAX_PLAYERS};

/// Timestamp of a channel that has not been touched this round.
pub const UNSET: u32 = u32::MAX;
/// Timestamp forced onto a channel touched before green.
pub const JUMPSTART: u32 = 0;

/// Touch flags and timestamps for every channel.
pub struct TouchCaptureState {
    touched: [AtomicBool; MAX_PLAYERS],
    timestamps: [AtomicU32; MAX_PLAYERS],
    last_edge: [AtomicU32; MAX_PLAYERS],
}

impl TouchCaptureState {
    pub const fn new() -> Self {
        Self {
            touched: [const { AtomicBool::new(false) }; MAX_PLAYERS],
            timestamps: [const { AtomicU32::new(UNSET) }; MAX_PLAYERS],
            last_edge: [const { AtomicU32::new(0) }; MAX_PLAYERS],
        }
    }

    /// Rising edge on `channel` observed at `now_ms`.
    ///
    /// Single-shot per round: once a channel is touched, further edges are
    /// ignored until [`reset`](Self::reset). Edges closer than the debounce
    /// window to the last accepted one are dropped. Never blocks.
    ///
    /// Edges of one channel come from one interrupt line, which cannot preempt
    /// itself, so the check and the store below are not interleaved.
    pub fn on_edge(&self, channel: usize, now_ms: u32) -> bool {
        let (Some(touched), Some(timestamp), Some(last_edge)) = (
            self.touched.get(channel),
            self.timestamps.get(channel),
            self.last_edge.get(channel),
        ) else {
            return false;
        };

        if touched.load(Ordering::Acquire) {
            return false;
        }
        if now_ms.wrapping_sub(last_edge.load(Ordering::Relaxed)) <= DEBOUNCE_MS {
            return false;
        }

        // The clock wraps; keep real stamps off the sentinels.
        timestamp.store(now_ms.clamp(JUMPSTART + 1, UNSET - 1), Ordering::Relaxed);
        last_edge.store(now_ms, Ordering::Relaxed);
        touched.store(true, Ordering::Release);
        true
    }

    /// Clear every channel before a round starts.
    pub fn reset(&self) {
        for (touched, timestamp) in self.touched.iter().zip(&self.timestamps) {
            touched.store(false, Ordering::Release);
            timestamp.store(UNSET, Ordering::Relaxed);
        }
    }

    pub fn is_touched(&self, channel: usize) -> bool {
        self.touched
            .get(channel)
            .is_some_and(|t| t.load(Ordering::Acquire))
    }

    /// Recorded time for `channel`, [`UNSET`] or [`JUMPSTART`].
    pub fn timestamp(&self, channel: usize) -> u32 {
        self.timestamps
            .get(channel)
            .map_or(UNSET, |t| t.load(Ordering::Acquire))
    }

    pub fn is_jumpstart(&self, channel: usize) -> bool {
        self.is_touched(channel) && self.timestamp(channel) == JUMPSTART
    }

    /// Force the penalty timestamp on a touched channel.
    ///
    /// Only called by the sequencer while the channel is already touched, when
    /// the interrupt side no longer writes it.
    pub(crate) fn mark_jumpstart(&self, channel: usize) -> bool {
        if !self.is_touched(channel) || self.timestamp(channel) == JUMPSTART {
            return false;
        }
        self.timestamps[channel].store(JUMPSTART, Ordering::Release);
        true
    }

    /// Handle bound to one channel.
    pub fn channel(&self, index: usize) -> TouchChannel<'_> {
        TouchChannel { state: self, index }
    }
}

impl Default for TouchCaptureState {
    fn default() -> Self {
        Self::new()
    }
}

/// An edge source for a single player.
#[derive(Clone, Copy)]
pub struct TouchChannel<'a> {
    state: &'a TouchCaptureState,
    index: usize,
}

impl TouchChannel<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn on_edge(&self, now_ms: u32) -> bool {
        self.state.on_edge(self.index, now_ms)
    }
}
