// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Named-blob persistence.
//!
//! The game stores two blobs: the history text and the leaderboard CSV. A
//! backend only has to read, write, test and delete whole blobs by name.
//! Backends on raw flash prefix each blob with a [`BlobHeader`].

use core::fmt;
use crc::{Crc, CRC_32_ISO_HDLC};
use serde::{Deserialize, Serialize};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Storage failures. None of them stop the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No blob with that name.
    NotFound,
    /// Blob does not fit the backend slot or the caller's buffer.
    TooLarge,
    /// Stored bytes failed validation.
    Corrupt,
    /// Underlying device error.
    Io,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("blob not found"),
            Self::TooLarge => f.write_str("blob too large"),
            Self::Corrupt => f.write_str("blob corrupt"),
            Self::Io => f.write_str("storage i/o error"),
        }
    }
}

/// Whole-blob storage keyed by name.
pub trait BlobStorage {
    /// Read blob `name` into `buf`, returning the number of bytes copied.
    fn read(&mut self, name: &str, buf: &mut [u8]) -> Result<usize, StorageError>;
    /// Replace blob `name` with `data`.
    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StorageError>;
    fn exists(&mut self, name: &str) -> bool;
    fn delete(&mut self, name: &str) -> Result<(), StorageError>;
    /// Bytes currently occupied by all blobs.
    fn used_bytes(&mut self) -> u32;
}

/// Magic marking a programmed blob slot.
pub const BLOB_MAGIC: u32 = 0x5EF1_E7B0;
/// Fixed space reserved for the encoded header at the start of a slot.
pub const BLOB_HEADER_SIZE: usize = 16;

/// Slot header written in front of the blob bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobHeader {
    pub magic: u32,
    pub len: u32,
    pub crc32: u32,
}

impl BlobHeader {
    pub fn for_data(data: &[u8]) -> Self {
        Self {
            magic: BLOB_MAGIC,
            len: data.len() as u32,
            crc32: CRC32.checksum(data),
        }
    }

    /// Encode into a fixed-size, 0xFF-padded header block.
    pub fn encode(&self) -> Result<[u8; BLOB_HEADER_SIZE], StorageError> {
        let mut block = [0xFFu8; BLOB_HEADER_SIZE];
        postcard::to_slice(self, &mut block).map_err(|_| StorageError::Io)?;
        Ok(block)
    }

    /// Decode a header block. Erased or foreign slots yield `NotFound`.
    pub fn decode(block: &[u8]) -> Result<Self, StorageError> {
        let header: Self = postcard::from_bytes(block).map_err(|_| StorageError::NotFound)?;
        if header.magic != BLOB_MAGIC {
            return Err(StorageError::NotFound);
        }
        Ok(header)
    }

    /// Check `data` against the stored length and checksum.
    pub fn verify(&self, data: &[u8]) -> Result<(), StorageError> {
        if data.len() != self.len as usize || CRC32.checksum(data) != self.crc32 {
            return Err(StorageError::Corrupt);
        }
        Ok(())
    }
}
