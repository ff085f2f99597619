// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Blob store on the reserved tail of the on-board flash.
//!
//! Each named blob owns a fixed, sector-aligned slot. A slot starts with an
//! encoded [`BlobHeader`] followed by the blob bytes; an erased slot reads
//! back as "not found".

use crate::flash::{self, FLASH_BASE, FLASH_PAGE_SIZE, FLASH_SECTOR_SIZE, FLASH_SIZE};
use reflex_common::config::{HISTORY_BLOB, LEADERBOARD_BLOB};
use reflex_common::storage::{BlobHeader, BLOB_HEADER_SIZE};
use reflex_common::{BlobStorage, StorageError};

/// Start of the region excluded from the program image in `memory.x`.
pub const STORAGE_BASE: u32 = FLASH_BASE + FLASH_SIZE - 64 * 1024;

struct Slot {
    name: &'static str,
    addr: u32,
    size: u32,
}

static SLOTS: [Slot; 2] = [
    Slot {
        name: HISTORY_BLOB,
        addr: STORAGE_BASE,
        size: 3 * FLASH_SECTOR_SIZE,
    },
    Slot {
        name: LEADERBOARD_BLOB,
        addr: STORAGE_BASE + 3 * FLASH_SECTOR_SIZE,
        size: FLASH_SECTOR_SIZE,
    },
];

impl Slot {
    fn capacity(&self) -> usize {
        self.size as usize - BLOB_HEADER_SIZE
    }

    fn header(&self) -> Result<BlobHeader, StorageError> {
        let mut block = [0u8; BLOB_HEADER_SIZE];
        flash::flash_read(self.addr, &mut block);
        let header = BlobHeader::decode(&block)?;
        if header.len as usize > self.capacity() {
            return Err(StorageError::Corrupt);
        }
        Ok(header)
    }
}

fn slot(name: &str) -> Result<&'static Slot, StorageError> {
    SLOTS
        .iter()
        .find(|slot| slot.name == name)
        .ok_or(StorageError::NotFound)
}

/// Flash-backed [`BlobStorage`]. Only constructed once the ROM flash routines
/// have been resolved.
pub struct FlashBlobStore {
    _private: (),
}

impl FlashBlobStore {
    pub fn new() -> Option<Self> {
        if !flash::init() {
            return None;
        }
        defmt::info!("Storage: {} slots at 0x{:08x}", SLOTS.len(), STORAGE_BASE);
        Some(Self { _private: () })
    }
}

impl BlobStorage for FlashBlobStore {
    fn read(&mut self, name: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let slot = slot(name)?;
        let header = slot.header()?;
        let len = header.len as usize;
        if len > buf.len() {
            return Err(StorageError::TooLarge);
        }

        flash::flash_read(slot.addr + BLOB_HEADER_SIZE as u32, &mut buf[..len]);
        header.verify(&buf[..len])?;
        Ok(len)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        let slot = slot(name)?;
        if data.len() > slot.capacity() {
            return Err(StorageError::TooLarge);
        }

        let header = BlobHeader::for_data(data).encode()?;
        let total = (BLOB_HEADER_SIZE + data.len()) as u32;
        let offset = flash::addr_to_offset(slot.addr);

        unsafe {
            flash::flash_erase(offset, total.next_multiple_of(FLASH_SECTOR_SIZE));
        }

        let mut bytes = header.iter().chain(data).copied();
        let mut page_offset = offset;
        loop {
            let mut page = [0xFFu8; FLASH_PAGE_SIZE as usize];
            let filled = page.iter_mut().zip(&mut bytes).map(|(dst, src)| *dst = src).count();
            if filled == 0 {
                break;
            }
            unsafe {
                flash::flash_program(page_offset, page.as_ptr(), page.len());
            }
            page_offset += FLASH_PAGE_SIZE;
        }

        // Read back through XIP to catch a failed program.
        let stored = slot.header()?;
        if stored != BlobHeader::for_data(data) {
            defmt::error!("Storage: verify failed for {}", name);
            return Err(StorageError::Io);
        }
        defmt::trace!("Storage: wrote {} bytes to {}", data.len(), name);
        Ok(())
    }

    fn exists(&mut self, name: &str) -> bool {
        slot(name).and_then(Slot::header).is_ok()
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        let slot = slot(name)?;
        // The header lives in the first sector; erasing it empties the slot.
        unsafe {
            flash::flash_erase(flash::addr_to_offset(slot.addr), FLASH_SECTOR_SIZE);
        }
        Ok(())
    }

    fn used_bytes(&mut self) -> u32 {
        SLOTS
            .iter()
            .filter_map(|slot| slot.header().ok())
            .map(|header| BLOB_HEADER_SIZE as u32 + header.len)
            .sum()
    }
}
