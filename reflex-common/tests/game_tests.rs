// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Dispatcher and full-round tests against in-memory collaborators.

mod support;

use reflex_common::config::{HISTORY_BLOB, LEADERBOARD_BLOB, MAX_PLAYERS, STORAGE_USAGE_LIMIT};
use reflex_common::game::{Source, TickOutcome};
use reflex_common::input::Direction;
use reflex_common::{Command, GameOptions, HistoryLog, Phase, TextSize, TouchCaptureState};
use support::{
    finish_round, game, game_with_options, red_started_at, tick_until_green, MemStorage, TestGame,
};

fn send(game: &mut TestGame<'_>, line: &str) -> Vec<String> {
    game.link_mut().push(line);
    assert!(game.poll_link());
    game.link_mut().take_sent()
}

#[test]
fn test_select_players_accepts_every_valid_count() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);

    for n in 1..=MAX_PLAYERS {
        let sent = send(&mut game, &format!("SELECT_PLAYERS_{n}"));
        assert_eq!(sent, vec![format!("OK: Players set to {n}")]);
        assert_eq!(game.settings().player_count() as usize, n);
    }
}

#[test]
fn test_select_players_rejects_out_of_range() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);
    send(&mut game, "SELECT_PLAYERS_3");

    for bad in ["SELECT_PLAYERS_0", "SELECT_PLAYERS_5", "SELECT_PLAYERS_x"] {
        let sent = send(&mut game, bad);
        assert_eq!(sent, vec!["ERROR: Invalid player count"]);
        assert_eq!(game.settings().player_count(), 3);
    }
    assert!(game.display().showed("Invalid player count"));
}

#[test]
fn test_set_player_renames_slot() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);
    send(&mut game, "SELECT_PLAYERS_2");

    let sent = send(&mut game, "SET_PLAYER_2_Alice");

    assert_eq!(sent, vec!["OK: Player 2 set to Alice"]);
    assert_eq!(game.settings().name(1), Some("Alice"));
    assert!(game.display().showed("Alice set!"));
}

#[test]
fn test_set_player_rejects_bad_index_and_name() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);

    for bad in [
        "SET_PLAYER_2_Alice",
        "SET_PLAYER_0_Alice",
        "SET_PLAYER_1_",
        "SET_PLAYER_1_a,b",
        "SET_PLAYER_1_ThisNameIsFarTooLong",
        "SET_PLAYER_x_Alice",
    ] {
        let sent = send(&mut game, bad);
        assert_eq!(sent, vec!["ERROR: Invalid player or name"], "{bad}");
    }
    assert_eq!(game.settings().name(0), Some("Player 1"));
    assert_eq!(game.settings().name(1), Some("Player 2"));
}

#[test]
fn test_unknown_command() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);

    let sent = send(&mut game, "JUMP");

    assert_eq!(sent, vec!["ERROR: Unknown command"]);
    assert!(game.display().showed("Invalid command"));
}

#[test]
fn test_two_player_round_scores_and_persists() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, Some(MemStorage::default()));
    game.boot();
    send(&mut game, "SELECT_PLAYERS_2");

    let sent = send(&mut game, "START");
    assert_eq!(sent, vec!["OK: Game started"]);
    assert!(matches!(game.phase(), Phase::Red { .. }));

    let green_start = tick_until_green(&mut game);
    touch.on_edge(0, green_start + 300);
    finish_round(&mut game);

    let sent = game.link_mut().take_sent();
    assert_eq!(
        sent,
        vec!["Game result: ", "Player 1: 300 ms", "Player 2: No response"]
    );

    assert_eq!(game.leaderboard().slot(0).unwrap().best_reaction_time, 300);
    assert_eq!(game.leaderboard().slot(1).unwrap().best_reaction_time, 0);
    assert_eq!(
        game.history().as_str(),
        "Game result: \nPlayer 1: 300 ms\nPlayer 2: No response\n"
    );

    let storage = game.storage_mut().unwrap();
    assert_eq!(
        storage.text(HISTORY_BLOB).unwrap(),
        "Game result: \nPlayer 1: 300 ms\nPlayer 2: No response\n"
    );
    assert!(storage
        .text(LEADERBOARD_BLOB)
        .unwrap()
        .starts_with("Player 1,300\n"));
}

#[test]
fn test_round_shows_each_light_large() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);

    game.run_round();

    let lights: Vec<&str> = game
        .display()
        .screens
        .iter()
        .filter(|s| s.size == TextSize::Large)
        .map(|s| s.lines[0].as_str())
        .collect();
    assert_eq!(lights, vec!["RED LIGHT", "YELLOW LIGHT", "GREEN LIGHT"]);
    assert!(game.display().showed("Game result: "));
    assert!(game.is_idle());
}

#[test]
fn test_jumpstart_in_red_is_reported() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);
    send(&mut game, "SELECT_PLAYERS_2");
    assert!(game.start_round());

    let red_start = red_started_at(&game);
    touch.on_edge(1, red_start + 100);
    let green_start = tick_until_green(&mut game);
    touch.on_edge(0, green_start + 250);
    finish_round(&mut game);

    let sent = game.link_mut().take_sent();
    assert!(sent.contains(&"Player 1: 250 ms".to_string()));
    assert!(sent.contains(&"Player 2: JS (Jumpstart)".to_string()));
    assert_eq!(game.leaderboard().slot(1).unwrap().best_reaction_time, 0);
}

#[test]
fn test_round_without_storage_still_reports() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);
    game.boot();
    assert!(game.display().showed("Storage init failed!"));

    game.run_round();

    let sent = game.link_mut().take_sent();
    assert_eq!(sent, vec!["Game result: ", "Player 1: No response"]);
    assert!(!game.history().is_empty());
    assert!(!game.has_storage());
}

#[test]
fn test_storage_write_failure_is_reported_not_fatal() {
    let touch = TouchCaptureState::new();
    let storage = MemStorage {
        fail_writes: true,
        ..MemStorage::default()
    };
    let mut game = game(&touch, Some(storage));

    game.run_round();

    let sent = game.link_mut().take_sent();
    assert!(sent.contains(&"ERROR: Failed to write history".to_string()));
    assert!(sent.contains(&"ERROR: Failed to write leaderboard".to_string()));
    assert!(game.is_idle());
}

#[test]
fn test_remote_start_can_be_disabled() {
    let touch = TouchCaptureState::new();
    let mut game = game_with_options(&touch, None, GameOptions { remote_start: false });

    let sent = send(&mut game, "START");

    assert_eq!(sent, vec!["ERROR: Remote start disabled"]);
    assert!(game.is_idle());
}

#[test]
fn test_menu_start_ignores_remote_start_switch() {
    let touch = TouchCaptureState::new();
    let mut game = game_with_options(&touch, None, GameOptions { remote_start: false });

    game.confirm();

    assert_eq!(game.link_mut().take_sent(), vec!["OK: Game started"]);
    assert!(matches!(game.phase(), Phase::Red { .. }));
}

#[test]
fn test_remote_lines_wait_while_round_runs() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);
    assert!(game.start_round());

    game.link_mut().push("SELECT_PLAYERS_3");
    assert!(!game.poll_link());
    assert_eq!(game.settings().player_count(), 1);

    finish_round(&mut game);
    game.link_mut().take_sent();
    assert!(game.poll_link());
    assert_eq!(game.settings().player_count(), 3);
}

#[test]
fn test_execute_mid_round_is_refused() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);
    assert!(game.start_round());

    game.execute(Command::Start, Source::Remote);

    assert_eq!(game.link_mut().take_sent(), vec!["ERROR: Game in progress"]);
}

#[test]
fn test_view_history_sends_ack_then_chunks() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);
    game.run_round();
    game.link_mut().take_sent();

    let sent = send(&mut game, "VIEW_HISTORY");

    assert_eq!(sent[0], "OK: Game history");
    assert_eq!(sent[1..].concat(), game.history().as_str());
}

#[test]
fn test_view_leaderboard_lists_set_slots() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);
    assert!(game.start_round());
    let green_start = tick_until_green(&mut game);
    touch.on_edge(0, green_start + 410);
    finish_round(&mut game);
    game.link_mut().take_sent();

    let sent = send(&mut game, "VIEW_LEADERBOARD");

    assert_eq!(sent, vec!["OK: Leaderboard", "Player 1: 410 ms"]);
    let screen = game.display().last().unwrap();
    assert_eq!(screen.lines, vec!["Leaderboard:", "Player 1: 410 ms"]);
}

#[test]
fn test_view_leaderboard_wraps_long_rows_on_screen() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);
    send(&mut game, "SET_PLAYER_1_ABCDEFGHIJKLMNOP");
    assert!(game.start_round());
    let green_start = tick_until_green(&mut game);
    touch.on_edge(0, green_start + 987);
    finish_round(&mut game);
    game.link_mut().take_sent();

    let sent = send(&mut game, "VIEW_LEADERBOARD");

    assert_eq!(sent, vec!["OK: Leaderboard", "ABCDEFGHIJKLMNOP: 987 ms"]);
    let screen = game.display().last().unwrap();
    assert_eq!(
        screen.lines,
        vec!["Leaderboard:", "ABCDEFGHIJKLMNOP: 987", " ms"]
    );
}

#[test]
fn test_delete_history() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, Some(MemStorage::default()));
    game.run_round();
    game.link_mut().take_sent();

    let sent = send(&mut game, "DELETE_HISTORY");

    assert_eq!(sent, vec!["OK: History deleted"]);
    assert!(game.history().is_empty());
    assert!(!game.storage_mut().unwrap().blobs.contains_key(HISTORY_BLOB));
}

#[test]
fn test_truncation_warns_on_link_and_display() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None).with_history(HistoryLog::with_budget(40));

    game.run_round();
    assert!(!game.link_mut().take_sent().iter().any(|l| l.starts_with("WARNING")));
    game.run_round();

    let sent = game.link_mut().take_sent();
    assert!(sent.contains(&"WARNING: History truncated".to_string()));
    assert!(game.display().showed("History truncated!"));
    assert_eq!(game.history().as_str(), "Game result: \nPlayer 1: No response\n");
}

#[test]
fn test_storage_over_limit_clears_history() {
    let touch = TouchCaptureState::new();
    let storage = MemStorage {
        reported_usage: Some(STORAGE_USAGE_LIMIT + 1),
        ..MemStorage::default()
    };
    let mut game = game(&touch, Some(storage));
    game.run_round();
    game.run_round();

    let sent = game.link_mut().take_sent();
    assert!(sent.contains(&"WARNING: Storage full, history cleared".to_string()));
    assert_eq!(game.history().as_str(), "Game result: \nPlayer 1: No response\n");
}

#[test]
fn test_boot_loads_persisted_state() {
    let touch = TouchCaptureState::new();
    let mut storage = MemStorage::default();
    storage
        .blobs
        .insert(HISTORY_BLOB.into(), b"Game result: \nAlice: 222 ms\n".to_vec());
    storage
        .blobs
        .insert(LEADERBOARD_BLOB.into(), b"Alice,222\n,0\n,0\n,0\n".to_vec());
    let mut game = game(&touch, Some(storage));

    game.boot();

    assert_eq!(game.history().as_str(), "Game result: \nAlice: 222 ms\n");
    assert_eq!(game.leaderboard().slot(0).unwrap().name.as_str(), "Alice");
    assert_eq!(game.leaderboard().slot(0).unwrap().best_reaction_time, 222);
}

#[test]
fn test_menu_navigation_and_confirm() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);

    game.navigate(Direction::Down);
    let screen = game.display().last().unwrap();
    assert_eq!(screen.lines[1], "> View History");

    game.navigate(Direction::Up);
    game.navigate(Direction::Up);
    let screen = game.display().last().unwrap();
    assert_eq!(screen.lines[3], "> Delete History");

    game.confirm();
    assert_eq!(game.link_mut().take_sent(), vec!["OK: History deleted"]);
}

#[test]
fn test_menu_returns_after_round() {
    let touch = TouchCaptureState::new();
    let mut game = game(&touch, None);
    game.run_round();

    assert_eq!(game.tick(), TickOutcome::Idle);

    let screen = game.display().last().unwrap();
    assert_eq!(screen.lines[0], "> Start Game");
}
