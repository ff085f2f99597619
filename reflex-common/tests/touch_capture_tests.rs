// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the per-channel touch capture.

use reflex_common::touch::{TouchCaptureState, JUMPSTART, UNSET};

#[test]
fn test_first_edge_records_timestamp() {
    let touch = TouchCaptureState::new();

    assert!(touch.on_edge(0, 1_000));
    assert!(touch.is_touched(0));
    assert_eq!(touch.timestamp(0), 1_000);
}

#[test]
fn test_edge_is_single_shot_until_reset() {
    let touch = TouchCaptureState::new();

    assert!(touch.on_edge(1, 1_000));
    assert!(!touch.on_edge(1, 2_000));
    assert_eq!(touch.timestamp(1), 1_000);

    touch.reset();
    assert!(touch.on_edge(1, 3_000));
    assert_eq!(touch.timestamp(1), 3_000);
}

#[test]
fn test_bounce_within_window_is_dropped_after_reset() {
    let touch = TouchCaptureState::new();

    assert!(touch.on_edge(2, 1_000));
    touch.reset();

    // 50 ms after the last accepted edge is still inside the window.
    assert!(!touch.on_edge(2, 1_050));
    assert!(!touch.is_touched(2));
    assert!(touch.on_edge(2, 1_051));
}

#[test]
fn test_channels_are_independent() {
    let touch = TouchCaptureState::new();

    assert!(touch.on_edge(0, 1_000));
    assert!(touch.on_edge(1, 1_001));
    assert!(!touch.is_touched(2));
    assert_eq!(touch.timestamp(3), UNSET);
}

#[test]
fn test_reset_clears_all_channels() {
    let touch = TouchCaptureState::new();
    for ch in 0..4 {
        touch.on_edge(ch, 1_000);
    }

    touch.reset();

    for ch in 0..4 {
        assert!(!touch.is_touched(ch));
        assert_eq!(touch.timestamp(ch), UNSET);
    }
}

#[test]
fn test_out_of_range_channel_is_ignored() {
    let touch = TouchCaptureState::new();

    assert!(!touch.on_edge(7, 1_000));
    assert!(!touch.is_touched(7));
    assert_eq!(touch.timestamp(7), UNSET);
}

#[test]
fn test_channel_handle_forwards_edges() {
    let touch = TouchCaptureState::new();
    let channel = touch.channel(3);

    assert_eq!(channel.index(), 3);
    assert!(channel.on_edge(5_000));
    assert!(touch.is_touched(3));
    assert!(!touch.is_jumpstart(3));
}

#[test]
fn test_edges_at_clock_wrap_do_not_look_like_markers() {
    let touch = TouchCaptureState::new();

    assert!(touch.on_edge(0, u32::MAX));
    assert_ne!(touch.timestamp(0), UNSET);

    assert!(touch.on_edge(1, u32::MAX - 1_000));
    touch.reset();
    assert!(touch.on_edge(1, 0));
    assert_ne!(touch.timestamp(1), JUMPSTART);
    assert!(!touch.is_jumpstart(1));
}
