// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the remote line protocol.

use reflex_common::command::Line;
use reflex_common::{Command, Reply};

#[test]
fn test_parse_select_players() {
    assert_eq!(
        Command::parse("SELECT_PLAYERS_3"),
        Command::SelectPlayers(Some(3))
    );
    assert_eq!(
        Command::parse("SELECT_PLAYERS_x"),
        Command::SelectPlayers(None)
    );
}

#[test]
fn test_parse_set_player() {
    assert_eq!(
        Command::parse("SET_PLAYER_2_Alice"),
        Command::SetPlayer {
            index: Some(2),
            name: Line::try_from("Alice").unwrap(),
        }
    );
}

#[test]
fn test_parse_set_player_keeps_underscores_in_name() {
    assert_eq!(
        Command::parse("SET_PLAYER_1_Mary_Ann"),
        Command::SetPlayer {
            index: Some(1),
            name: Line::try_from("Mary_Ann").unwrap(),
        }
    );
}

#[test]
fn test_parse_set_player_without_name() {
    assert_eq!(
        Command::parse("SET_PLAYER_1"),
        Command::SetPlayer {
            index: Some(1),
            name: Line::new(),
        }
    );
}

#[test]
fn test_parse_plain_commands_and_trims_line_ending() {
    assert_eq!(Command::parse("START\r\n"), Command::Start);
    assert_eq!(Command::parse("VIEW_HISTORY"), Command::ViewHistory);
    assert_eq!(Command::parse("VIEW_LEADERBOARD"), Command::ViewLeaderboard);
    assert_eq!(Command::parse("DELETE_HISTORY"), Command::DeleteHistory);
}

#[test]
fn test_parse_is_case_sensitive() {
    assert_eq!(Command::parse("start"), Command::Unknown);
    assert_eq!(Command::parse("HELLO"), Command::Unknown);
    assert_eq!(Command::parse(""), Command::Unknown);
}

#[test]
fn test_encode_matches_parse() {
    let commands = [
        Command::SelectPlayers(Some(4)),
        Command::SetPlayer {
            index: Some(3),
            name: Line::try_from("Bob").unwrap(),
        },
        Command::Start,
        Command::ViewHistory,
        Command::ViewLeaderboard,
        Command::DeleteHistory,
    ];

    for command in commands {
        assert_eq!(Command::parse(&command.to_string()), command);
    }
}

#[test]
fn test_reply_parse() {
    assert_eq!(
        Reply::parse("OK: Players set to 2\r\n"),
        Reply::Ok("Players set to 2")
    );
    assert_eq!(
        Reply::parse("ERROR: Unknown command"),
        Reply::Error("Unknown command")
    );
    assert_eq!(
        Reply::parse("WARNING: History truncated"),
        Reply::Warning("History truncated")
    );
    assert_eq!(Reply::parse("Player 1: 300 ms"), Reply::Data("Player 1: 300 ms"));
    assert!(!Reply::parse("Player 1: 300 ms").is_status());
}
