// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Main menu with a wraparound cursor.

use heapless::{String, Vec};

use crate::config::DISPLAY_COLUMNS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuOption {
    StartGame,
    ViewHistory,
    ViewLeaderboard,
    DeleteHistory,
}

impl MenuOption {
    pub const ALL: [MenuOption; 4] = [
        Self::StartGame,
        Self::ViewHistory,
        Self::ViewLeaderboard,
        Self::DeleteHistory,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::StartGame => "Start Game",
            Self::ViewHistory => "View History",
            Self::ViewLeaderboard => "View Leaderboard",
            Self::DeleteHistory => "Delete History",
        }
    }
}

pub const MENU_LEN: usize = MenuOption::ALL.len();

pub type MenuLine = String<DISPLAY_COLUMNS>;

#[derive(Debug, Default)]
pub struct Menu {
    cursor: usize,
}

impl Menu {
    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    pub fn selected(&self) -> MenuOption {
        MenuOption::ALL[self.cursor]
    }

    pub fn up(&mut self) -> MenuOption {
        let len = MenuOption::ALL.len();
        self.cursor = (self.cursor + len - 1) % len;
        self.selected()
    }

    pub fn down(&mut self) -> MenuOption {
        self.cursor = (self.cursor + 1) % MenuOption::ALL.len();
        self.selected()
    }

    /// One line per option, the selected one prefixed with `> `.
    pub fn render(&self) -> Vec<MenuLine, MENU_LEN> {
        MenuOption::ALL
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let mut line = MenuLine::new();
                let _ = line.push_str(if i == self.cursor { "> " } else { "  " });
                let _ = line.push_str(option.label());
                line
            })
            .collect()
    }
}
