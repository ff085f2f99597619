// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Debouncing for the joystick axis and the confirm button.

use crate::config::{ADC_MAX, BUTTON_DEBOUNCE_MS, JOYSTICK_REPEAT_MS, JOYSTICK_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
}

/// Turns raw joystick samples into rate-limited moves.
pub struct NavDebouncer {
    last_move: Option<u32>,
}

impl NavDebouncer {
    pub const fn new() -> Self {
        Self { last_move: None }
    }

    /// Feed a 12-bit ADC sample taken at `now`.
    pub fn sample(&mut self, raw: u16, now: u32) -> Option<Direction> {
        if let Some(last) = self.last_move {
            if now.wrapping_sub(last) <= JOYSTICK_REPEAT_MS {
                return None;
            }
        }

        let direction = if raw < JOYSTICK_THRESHOLD {
            Direction::Up
        } else if raw > ADC_MAX - JOYSTICK_THRESHOLD {
            Direction::Down
        } else {
            return None;
        };

        self.last_move = Some(now);
        Some(direction)
    }
}

impl Default for NavDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports one press once the button has been held for the debounce time.
pub struct ButtonDebouncer {
    pressed_since: Option<u32>,
    reported: bool,
}

impl ButtonDebouncer {
    pub const fn new() -> Self {
        Self {
            pressed_since: None,
            reported: false,
        }
    }

    /// Feed the current level (`true` = pressed) sampled at `now`.
    pub fn sample(&mut self, pressed: bool, now: u32) -> bool {
        if !pressed {
            self.pressed_since = None;
            self.reported = false;
            return false;
        }

        let since = *self.pressed_since.get_or_insert(now);
        if !self.reported && now.wrapping_sub(since) >= BUTTON_DEBOUNCE_MS {
            self.reported = true;
            return true;
        }
        false
    }
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new()
    }
}
