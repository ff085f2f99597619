// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the flash blob header.

use reflex_common::storage::{BlobHeader, BLOB_HEADER_SIZE, BLOB_MAGIC};
use reflex_common::StorageError;

#[test]
fn test_header_for_data() {
    let header = BlobHeader::for_data(b"Player 1,300\n");

    assert_eq!(header.magic, BLOB_MAGIC);
    assert_eq!(header.len, 13);
    assert!(header.verify(b"Player 1,300\n").is_ok());
}

#[test]
fn test_header_block_decodes() {
    let header = BlobHeader::for_data(b"history");
    let block = header.encode().unwrap();

    assert_eq!(block.len(), BLOB_HEADER_SIZE);
    assert_eq!(BlobHeader::decode(&block), Ok(header));
}

#[test]
fn test_erased_slot_is_not_found() {
    let block = [0xFFu8; BLOB_HEADER_SIZE];

    assert_eq!(BlobHeader::decode(&block), Err(StorageError::NotFound));
}

#[test]
fn test_zeroed_slot_is_not_found() {
    let block = [0u8; BLOB_HEADER_SIZE];

    assert_eq!(BlobHeader::decode(&block), Err(StorageError::NotFound));
}

#[test]
fn test_verify_detects_corruption() {
    let header = BlobHeader::for_data(b"Player 1,300\n");

    assert_eq!(
        header.verify(b"Player 1,301\n"),
        Err(StorageError::Corrupt)
    );
    assert_eq!(header.verify(b"Player 1,30"), Err(StorageError::Corrupt));
}
