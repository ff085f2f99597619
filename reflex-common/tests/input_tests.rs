// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for menu navigation and input debouncing.

use reflex_common::input::{ButtonDebouncer, Direction, NavDebouncer};
use reflex_common::menu::{Menu, MenuOption};

#[test]
fn test_joystick_centre_is_ignored() {
    let mut nav = NavDebouncer::new();

    assert_eq!(nav.sample(2048, 1_000), None);
}

#[test]
fn test_joystick_moves_are_rate_limited() {
    let mut nav = NavDebouncer::new();

    assert_eq!(nav.sample(100, 1_000), Some(Direction::Up));
    assert_eq!(nav.sample(100, 1_150), None);
    assert_eq!(nav.sample(4000, 1_201), Some(Direction::Down));
}

#[test]
fn test_button_reports_once_per_press() {
    let mut button = ButtonDebouncer::new();

    assert!(!button.sample(true, 1_000));
    assert!(!button.sample(true, 1_010));
    assert!(button.sample(true, 1_020));
    assert!(!button.sample(true, 1_500));

    assert!(!button.sample(false, 1_600));
    assert!(!button.sample(true, 1_700));
    assert!(button.sample(true, 1_725));
}

#[test]
fn test_button_glitch_is_ignored() {
    let mut button = ButtonDebouncer::new();

    assert!(!button.sample(true, 1_000));
    assert!(!button.sample(false, 1_005));
    assert!(!button.sample(true, 1_010));
    assert!(!button.sample(true, 1_025));
}

#[test]
fn test_menu_wraps_both_ways() {
    let mut menu = Menu::new();

    assert_eq!(menu.up(), MenuOption::DeleteHistory);
    assert_eq!(menu.down(), MenuOption::StartGame);
    assert_eq!(menu.down(), MenuOption::ViewHistory);
}

#[test]
fn test_menu_render_marks_selection() {
    let mut menu = Menu::new();
    menu.down();
    menu.down();

    let lines = menu.render();

    assert_eq!(lines[0].as_str(), "  Start Game");
    assert_eq!(lines[2].as_str(), "> View Leaderboard");
    assert_eq!(lines.len(), 4);
}
