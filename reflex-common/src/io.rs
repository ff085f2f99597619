// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Narrow interfaces to the hardware around the game.

use crate::config::{DISPLAY_COLUMNS, DISPLAY_ROWS, MAX_LINE_LEN};
use heapless::{String, Vec};

/// Font scale for [`TextDisplay::show_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextSize {
    /// Menus, messages and results.
    Normal,
    /// Traffic light phases.
    Large,
}

/// Something that can render a few lines of text.
pub trait TextDisplay {
    fn show_text(&mut self, lines: &[&str], size: TextSize);
    fn clear(&mut self);
}

/// Line-oriented remote link.
pub trait Link {
    /// Next complete line, if one is buffered. Never blocks.
    fn read_line(&mut self) -> Option<String<MAX_LINE_LEN>>;
    fn send_line(&mut self, line: &str);
}

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since boot, wrapping after about 49.7 days.
    ///
    /// Compare readings with `wrapping_sub`, never with `<` or `>`.
    fn now_ms(&self) -> u32;
    fn delay_ms(&mut self, ms: u32);
}

/// Split `text` into display rows of at most `DISPLAY_COLUMNS` characters.
///
/// Line breaks start a new row; rows past the bottom of the screen are dropped.
pub fn wrap(text: &str) -> Vec<&str, DISPLAY_ROWS> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let mut rest = line;
        loop {
            let split = rest
                .char_indices()
                .nth(DISPLAY_COLUMNS)
                .map_or(rest.len(), |(i, _)| i);
            let (row, tail) = rest.split_at(split);
            if rows.push(row).is_err() {
                return rows;
            }
            if tail.is_empty() {
                break;
            }
            rest = tail;
        }
    }
    rows
}
