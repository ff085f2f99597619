// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command dispatch and round orchestration.
//!
//! [`Game`] owns the settings, the leaderboard, the history log and the
//! sequencer, plus the display, link, clock and optional storage they talk
//! to. Commands from the menu and from the remote link both land in
//! [`Game::execute`]. While a round runs, remote lines stay unread and menu
//! input is ignored; the caller keeps ticking [`Game::tick`] until the
//! sequencer is idle again.

use core::fmt::Write as _;
use heapless::{String, Vec};

use crate::command::Command;
use crate::config::{
    GameOptions, GameSettings, SettingsError, CHUNK_DELAY_MS, LINK_CHUNK_SIZE, MAX_PLAYERS,
    NAME_MAX_LEN, STORAGE_USAGE_LIMIT,
};
use crate::history::{AppendOutcome, HistoryLog};
use crate::input::Direction;
use crate::io::{wrap, Clock, Link, TextDisplay, TextSize};
use crate::leaderboard::Leaderboard;
use crate::menu::{Menu, MenuOption, MENU_LEN};
use crate::result::RoundResult;
use crate::sequencer::{Action, DurationSource, Phase, Sequencer};
use crate::storage::{BlobStorage, StorageError};
use crate::touch::TouchCaptureState;

/// How long a status message stays up before the menu is redrawn.
pub const MESSAGE_HOLD_MS: u32 = 2000;

type Message = String<40>;

/// Header plus one `<name>: <ms> ms` line per slot.
const LEADERBOARD_TEXT_CAP: usize = 16 + MAX_PLAYERS * (NAME_MAX_LEN + 16);

/// Where a command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    Menu,
    Remote,
}

/// What a tick changed, for the caller's own bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    Idle,
    Running,
    /// The sequencer just returned to idle.
    Finished,
}

pub struct Game<'t, D, L, S, C, R> {
    settings: GameSettings,
    options: GameOptions,
    leaderboard: Leaderboard,
    history: HistoryLog,
    menu: Menu,
    sequencer: Sequencer<'t, R>,
    display: D,
    link: L,
    storage: Option<S>,
    clock: C,
    /// Shown when the result screen ends.
    pending_notice: Option<&'static str>,
    /// Menu redraw is due at this time, or immediately when `Some(now)` passed.
    menu_due: Option<u32>,
}

impl<'t, D, L, S, C, R> Game<'t, D, L, S, C, R>
where
    D: TextDisplay,
    L: Link,
    S: BlobStorage,
    C: Clock,
    R: DurationSource,
{
    pub fn new(
        touch: &'t TouchCaptureState,
        durations: R,
        display: D,
        link: L,
        storage: Option<S>,
        clock: C,
        options: GameOptions,
    ) -> Self {
        Self {
            settings: GameSettings::new(),
            options,
            leaderboard: Leaderboard::new(),
            history: HistoryLog::new(),
            menu: Menu::new(),
            sequencer: Sequencer::new(touch, durations),
            display,
            link,
            storage,
            clock,
            pending_notice: None,
            menu_due: None,
        }
    }

    /// Use a history log with a custom budget.
    pub fn with_history(mut self, history: HistoryLog) -> Self {
        self.history = history;
        self
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    pub fn is_idle(&self) -> bool {
        self.sequencer.is_idle()
    }

    pub fn has_storage(&self) -> bool {
        self.storage.is_some()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn storage_mut(&mut self) -> Option<&mut S> {
        self.storage.as_mut()
    }

    /// Load persisted state and put the menu up.
    pub fn boot(&mut self) {
        match self.storage.as_mut() {
            Some(storage) => {
                if let Err(e) = self.history.load_from(storage) {
                    if e != StorageError::NotFound {
                        error!("Game: history load failed: {:?}", e);
                    }
                }
                if let Err(e) = self.leaderboard.load_from(storage) {
                    if e != StorageError::NotFound {
                        error!("Game: leaderboard load failed: {:?}", e);
                    }
                }
                self.menu_due = Some(self.clock.now_ms());
            }
            None => {
                warn!("Game: storage unavailable, running without persistence");
                self.show_message("Storage init failed!");
            }
        }
    }

    /// Read and execute at most one remote line. Nothing is read mid-round.
    pub fn poll_link(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        let Some(line) = self.link.read_line() else {
            return false;
        };
        info!("Game: remote line {=str}", line.as_str());
        self.execute(Command::parse(&line), Source::Remote);
        true
    }

    /// Move the menu cursor. Ignored mid-round.
    pub fn navigate(&mut self, direction: Direction) {
        if !self.is_idle() {
            return;
        }
        let option = match direction {
            Direction::Up => self.menu.up(),
            Direction::Down => self.menu.down(),
        };
        trace!("Game: menu at {:?}", option);
        self.draw_menu();
    }

    /// Run the highlighted menu option. Ignored mid-round.
    pub fn confirm(&mut self) {
        if !self.is_idle() {
            return;
        }
        let command = match self.menu.selected() {
            MenuOption::StartGame => Command::Start,
            MenuOption::ViewHistory => Command::ViewHistory,
            MenuOption::ViewLeaderboard => Command::ViewLeaderboard,
            MenuOption::DeleteHistory => Command::DeleteHistory,
        };
        self.execute(command, Source::Menu);
    }

    /// Map a command to its action and answer it.
    pub fn execute(&mut self, command: Command, source: Source) {
        if !self.is_idle() {
            self.link.send_line("ERROR: Game in progress");
            return;
        }

        match command {
            Command::SelectPlayers(count) => self.select_players(count),
            Command::SetPlayer { index, name } => self.set_player(index, &name),
            Command::Start => self.remote_start(source),
            Command::ViewHistory => self.view_history(),
            Command::ViewLeaderboard => self.view_leaderboard(),
            Command::DeleteHistory => self.delete_history(),
            Command::Unknown => {
                self.show_message("Invalid command");
                self.link.send_line("ERROR: Unknown command");
            }
        }
    }

    fn select_players(&mut self, count: Option<u32>) {
        match count
            .ok_or(SettingsError::InvalidPlayerCount)
            .and_then(|n| self.settings.set_player_count(n))
        {
            Ok(n) => {
                info!("Game: {} players", n);
                let mut msg = Message::new();
                let _ = write!(msg, "Players: {n}");
                self.show_message(&msg);
                let mut reply = Message::new();
                let _ = write!(reply, "OK: Players set to {n}");
                self.link.send_line(&reply);
            }
            Err(_) => {
                self.show_message("Invalid player count");
                self.link.send_line("ERROR: Invalid player count");
            }
        }
    }

    fn set_player(&mut self, index: Option<u32>, name: &str) {
        let result = index
            .and_then(|i| (i as usize).checked_sub(1))
            .ok_or(SettingsError::InvalidPlayer)
            .and_then(|i| self.settings.set_player_name(i, name).map(|()| i));

        match result {
            Ok(i) => {
                info!("Game: player {} renamed to {=str}", i + 1, name);
                let mut msg = Message::new();
                let _ = write!(msg, "{name} set!");
                self.show_message(&msg);
                let mut reply: String<64> = String::new();
                let _ = write!(reply, "OK: Player {} set to {name}", i + 1);
                self.link.send_line(&reply);
            }
            Err(e) => {
                warn!("Game: rename rejected: {:?}", e);
                self.show_message("Invalid player");
                self.link.send_line("ERROR: Invalid player or name");
            }
        }
    }

    fn remote_start(&mut self, source: Source) {
        if source == Source::Remote && !self.options.remote_start {
            info!("Game: remote START ignored, disabled in this build");
            self.show_message("Remote start disabled");
            self.link.send_line("ERROR: Remote start disabled");
            return;
        }
        self.show_message("Starting game...");
        self.link.send_line("OK: Game started");
        self.start_round();
    }

    fn view_history(&mut self) {
        self.show_message("Viewing history...");
        self.link.send_line("OK: Game history");
        self.history.send_in_chunks(
            &mut self.link,
            &mut self.clock,
            LINK_CHUNK_SIZE,
            CHUNK_DELAY_MS,
        );
    }

    fn view_leaderboard(&mut self) {
        self.link.send_line("OK: Leaderboard");

        let mut text: String<LEADERBOARD_TEXT_CAP> = String::new();
        let _ = text.push_str("Leaderboard:\n");
        for (_, player) in self.leaderboard.entries() {
            let mut line: String<40> = String::new();
            let _ = write!(line, "{}: {} ms", player.name, player.best_reaction_time);
            self.link.send_line(&line);
            let _ = writeln!(text, "{}", line);
        }

        self.display.show_text(&wrap(&text), TextSize::Normal);
        self.hold_screen(MESSAGE_HOLD_MS);
    }

    fn delete_history(&mut self) {
        self.show_message("Deleting history...");
        match self.history.delete_all(self.storage.as_mut()) {
            Ok(()) => {
                info!("Game: history deleted");
                self.link.send_line("OK: History deleted");
            }
            Err(e) => {
                error!("Game: history delete failed: {:?}", e);
                self.link.send_line("ERROR: Failed to delete history");
            }
        }
    }

    /// Start the lights with the current settings.
    pub fn start_round(&mut self) -> bool {
        let players = &self.settings.names()[..self.settings.player_count() as usize];
        let now = self.clock.now_ms();
        match self.sequencer.start(now, players) {
            Ok(action) => {
                self.menu_due = None;
                self.apply(action);
                true
            }
            Err(_) => {
                warn!("Game: start ignored, round in progress");
                false
            }
        }
    }

    /// Advance the round, or redraw the menu when a held screen expires.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now_ms();
        if self.is_idle() {
            self.refresh_menu(now);
            return TickOutcome::Idle;
        }

        let action = self.sequencer.tick(now);
        let finished = matches!(action, Action::Finished);
        self.apply(action);
        if finished {
            TickOutcome::Finished
        } else {
            TickOutcome::Running
        }
    }

    /// Busy-poll a whole round from start to idle.
    pub fn run_round(&mut self) {
        if !self.start_round() {
            return;
        }
        while self.tick() != TickOutcome::Finished {}
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::ShowLight(light) => {
                self.display.show_text(&[light.label()], TextSize::Large);
            }
            Action::Score(result) => self.score(&result),
            Action::ClearResults => match self.pending_notice.take() {
                Some(notice) => self.display.show_text(&[notice], TextSize::Normal),
                None => self.display.clear(),
            },
            Action::Finished => {
                self.menu_due = Some(self.clock.now_ms());
            }
        }
    }

    /// Report the result everywhere, then persist it.
    fn score(&mut self, result: &RoundResult) {
        let text = result.to_text();
        info!("Game: {=str}", text.as_str());

        for line in text.lines() {
            self.link.send_line(line);
        }
        self.display.show_text(&wrap(&text), TextSize::Normal);

        self.check_storage_usage();
        if self.history.append(&text) == AppendOutcome::Truncated {
            self.pending_notice = Some("History truncated!");
            self.link.send_line("WARNING: History truncated");
        }

        self.leaderboard.update(result);

        let Some(storage) = self.storage.as_mut() else {
            trace!("Game: no storage, result kept in memory");
            return;
        };
        if let Err(e) = self.history.save_to(storage) {
            error!("Game: history save failed: {:?}", e);
            self.link.send_line("ERROR: Failed to write history");
        }
        if let Err(e) = self.leaderboard.save_to(storage) {
            error!("Game: leaderboard save failed: {:?}", e);
            self.link.send_line("ERROR: Failed to write leaderboard");
        }
    }

    /// Wipe history when storage use crosses the limit.
    fn check_storage_usage(&mut self) {
        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        let used = storage.used_bytes();
        if used <= STORAGE_USAGE_LIMIT {
            return;
        }

        warn!("Game: storage use {} bytes, clearing history", used);
        if let Err(e) = self.history.delete_all(Some(storage)) {
            error!("Game: history delete failed: {:?}", e);
        }
        self.pending_notice = Some("Storage full, history cleared!");
        self.link.send_line("WARNING: Storage full, history cleared");
    }

    fn show_message(&mut self, message: &str) {
        self.display.show_text(&[message], TextSize::Normal);
        self.hold_screen(MESSAGE_HOLD_MS);
    }

    fn hold_screen(&mut self, ms: u32) {
        self.menu_due = Some(self.clock.now_ms().wrapping_add(ms));
    }

    fn refresh_menu(&mut self, now: u32) {
        match self.menu_due {
            Some(due) if (now.wrapping_sub(due) as i32) >= 0 => {
                self.menu_due = None;
                self.draw_menu();
            }
            _ => {}
        }
    }

    fn draw_menu(&mut self) {
        let rows = self.menu.render();
        let lines: Vec<&str, MENU_LEN> = rows.iter().map(|r| r.as_str()).collect();
        self.display.show_text(&lines, TextSize::Normal);
    }
}
