// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Append-only result history with a character budget.
//!
//! When an append would reach the budget, the whole log is replaced by the
//! new text. There is no rolling window.

use heapless::String;

use crate::config::{HISTORY_BLOB, MAX_HISTORY_SIZE};
use crate::io::{Clock, Link};
use crate::storage::{BlobStorage, StorageError};

/// What [`HistoryLog::append`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppendOutcome {
    Appended,
    /// Earlier history was discarded.
    Truncated,
}

pub struct HistoryLog {
    text: String<MAX_HISTORY_SIZE>,
    budget: usize,
}

impl HistoryLog {
    pub const fn new() -> Self {
        Self::with_budget(MAX_HISTORY_SIZE)
    }

    /// Log with a smaller budget. Capped at [`MAX_HISTORY_SIZE`].
    pub const fn with_budget(budget: usize) -> Self {
        let budget = if budget > MAX_HISTORY_SIZE {
            MAX_HISTORY_SIZE
        } else {
            budget
        };
        Self {
            text: String::new(),
            budget,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn append(&mut self, entry: &str) -> AppendOutcome {
        if self.text.len() + entry.len() < self.budget {
            // Fits by the check above.
            let _ = self.text.push_str(entry);
            return AppendOutcome::Appended;
        }

        warn!(
            "History: budget {} reached, keeping only the newest entry",
            self.budget
        );
        self.text.clear();
        self.push_prefix(entry);
        AppendOutcome::Truncated
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Fixed-size pieces of the log, split on character boundaries.
    pub fn chunks(&self, chunk_size: usize) -> Chunks<'_> {
        Chunks {
            rest: self.text.as_str(),
            size: chunk_size.max(1),
        }
    }

    /// Send the log as consecutive lines of at most `chunk_size` bytes.
    pub fn send_in_chunks<L: Link, C: Clock>(
        &self,
        link: &mut L,
        clock: &mut C,
        chunk_size: usize,
        delay_ms: u32,
    ) -> usize {
        let mut sent = 0;
        for chunk in self.chunks(chunk_size) {
            link.send_line(chunk);
            clock.delay_ms(delay_ms);
            sent += 1;
        }
        trace!("History: sent {} chunks", sent);
        sent
    }

    /// Replace the in-memory log with the stored blob.
    pub fn load_from<S: BlobStorage>(&mut self, storage: &mut S) -> Result<(), StorageError> {
        if !storage.exists(HISTORY_BLOB) {
            info!("History: no stored history");
            return Err(StorageError::NotFound);
        }

        let mut buf = [0u8; MAX_HISTORY_SIZE];
        let len = storage.read(HISTORY_BLOB, &mut buf)?;
        let text = core::str::from_utf8(&buf[..len]).map_err(|_| StorageError::Corrupt)?;

        self.text.clear();
        self.push_prefix(text);
        info!("History: loaded {} bytes", self.text.len());
        Ok(())
    }

    pub fn save_to<S: BlobStorage>(&self, storage: &mut S) -> Result<(), StorageError> {
        storage.write(HISTORY_BLOB, self.text.as_bytes())
    }

    /// Clear memory and remove the stored blob if there is one.
    pub fn delete_all<S: BlobStorage>(&mut self, storage: Option<&mut S>) -> Result<(), StorageError> {
        self.text.clear();
        match storage {
            Some(storage) => {
                if storage.exists(HISTORY_BLOB) {
                    storage.delete(HISTORY_BLOB)
                } else {
                    Ok(())
                }
            }
            None => Ok(()),
        }
    }

    /// Push as much of `s` as fits, cutting on a character boundary.
    fn push_prefix(&mut self, s: &str) {
        let room = self.budget.min(self.text.capacity()) - self.text.len();
        let mut end = s.len().min(room);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        let _ = self.text.push_str(&s[..end]);
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`HistoryLog::chunks`].
pub struct Chunks<'a> {
    rest: &'a str,
    size: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let mut end = self.size.min(self.rest.len());
        while !self.rest.is_char_boundary(end) {
            end += 1;
        }
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}
