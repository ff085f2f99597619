// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Red/yellow/green round state machine.
//!
//! The sequencer performs no I/O. It is ticked from the main loop with the
//! current time and returns the [`Action`] the caller must carry out. Every
//! phase deadline is computed once on entry and compared against elapsed
//! time on each tick; a round cannot be aborted once started.

use heapless::Vec;

use crate::config::{
    PlayerName, GREEN_RANGE_MS, MAX_PLAYERS, POST_ROUND_DELAY_MS, RED_RANGE_MS,
    RESULT_DISPLAY_MS, YELLOW_RANGE_MS,
};
use crate::result::RoundResult;
use crate::touch::TouchCaptureState;

/// Source of random phase durations.
pub trait DurationSource {
    /// Uniform value in `lo..hi`.
    fn between(&mut self, lo: u32, hi: u32) -> u32;
}

/// Xorshift32 generator, seeded from hardware entropy on the board.
pub struct XorShift(u32);

impl XorShift {
    pub const fn new(seed: u32) -> Self {
        // Zero is a fixed point of xorshift.
        Self(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }
}

impl DurationSource for XorShift {
    fn between(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_u32() % (hi - lo)
    }
}

/// Traffic light shown during a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Light {
    Red,
    Yellow,
    Green,
}

impl Light {
    pub fn label(self) -> &'static str {
        match self {
            Self::Red => "RED LIGHT",
            Self::Yellow => "YELLOW LIGHT",
            Self::Green => "GREEN LIGHT",
        }
    }
}

/// Sequencer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Waiting for a start trigger.
    Idle,
    Red {
        started_at: u32,
        duration: u32,
    },
    Yellow {
        started_at: u32,
        duration: u32,
    },
    Green {
        started_at: u32,
        duration: u32,
    },
    /// Results computed; holding the result screen, then the post-round pause.
    Scoring {
        started_at: u32,
        results_cleared: bool,
    },
}

impl Phase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Side effect requested by a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// A phase began; draw its light.
    ShowLight(Light),
    /// Green ended; report, persist and fold in the result.
    Score(RoundResult),
    /// Result screen time is over.
    ClearResults,
    /// Back to idle.
    Finished,
}

/// Start was requested while a round is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoundInProgress;

/// One transition step: next phase plus the action to run.
struct Step {
    next: Phase,
    action: Action,
}

pub struct Sequencer<'t, R> {
    touch: &'t TouchCaptureState,
    durations: R,
    phase: Phase,
    players: Vec<PlayerName, MAX_PLAYERS>,
}

impl<'t, R: DurationSource> Sequencer<'t, R> {
    pub fn new(touch: &'t TouchCaptureState, durations: R) -> Self {
        Self {
            touch,
            durations,
            phase: Phase::Idle,
            players: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase.is_idle()
    }

    /// Start a round for the given active players.
    ///
    /// Resets touch capture before the red light goes up.
    pub fn start(&mut self, now: u32, players: &[PlayerName]) -> Result<Action, RoundInProgress> {
        if !self.is_idle() {
            return Err(RoundInProgress);
        }

        self.players = players.iter().take(MAX_PLAYERS).cloned().collect();
        self.touch.reset();

        let duration = self.durations.between(RED_RANGE_MS.0, RED_RANGE_MS.1);
        info!(
            "Sequencer: round start, {} players, red for {} ms",
            self.players.len(),
            duration
        );
        self.phase = Phase::Red {
            started_at: now,
            duration,
        };
        Ok(Action::ShowLight(Light::Red))
    }

    /// Advance the state machine to `now`.
    pub fn tick(&mut self, now: u32) -> Action {
        let step = self.transition(now);
        if step.next != self.phase {
            trace!("Sequencer: {:?} -> {:?}", self.phase, step.next);
        }
        self.phase = step.next;
        step.action
    }

    fn transition(&mut self, now: u32) -> Step {
        match self.phase {
            Phase::Idle => stay(Phase::Idle),
            Phase::Red {
                started_at,
                duration,
            } => {
                self.sweep_jumpstarts();
                if elapsed(now, started_at) < duration {
                    return stay(self.phase);
                }
                let duration = self.durations.between(YELLOW_RANGE_MS.0, YELLOW_RANGE_MS.1);
                info!("Sequencer: yellow for {} ms", duration);
                Step {
                    next: Phase::Yellow {
                        started_at: now,
                        duration,
                    },
                    action: Action::ShowLight(Light::Yellow),
                }
            }
            Phase::Yellow {
                started_at,
                duration,
            } => {
                self.sweep_jumpstarts();
                if elapsed(now, started_at) < duration {
                    return stay(self.phase);
                }
                let duration = self.durations.between(GREEN_RANGE_MS.0, GREEN_RANGE_MS.1);
                info!("Sequencer: green for {} ms, started at {}", duration, now);
                Step {
                    next: Phase::Green {
                        started_at: now,
                        duration,
                    },
                    action: Action::ShowLight(Light::Green),
                }
            }
            // Always runs the full green duration, even if everyone reacted.
            Phase::Green {
                started_at,
                duration,
            } => {
                if elapsed(now, started_at) < duration {
                    return stay(self.phase);
                }
                let result = RoundResult::from_capture(self.touch, &self.players, started_at);
                Step {
                    next: Phase::Scoring {
                        started_at: now,
                        results_cleared: false,
                    },
                    action: Action::Score(result),
                }
            }
            Phase::Scoring {
                started_at,
                results_cleared,
            } => {
                let held = elapsed(now, started_at);
                if !results_cleared && held >= RESULT_DISPLAY_MS {
                    return Step {
                        next: Phase::Scoring {
                            started_at,
                            results_cleared: true,
                        },
                        action: Action::ClearResults,
                    };
                }
                if results_cleared && held >= RESULT_DISPLAY_MS + POST_ROUND_DELAY_MS {
                    info!("Sequencer: round over");
                    return Step {
                        next: Phase::Idle,
                        action: Action::Finished,
                    };
                }
                stay(self.phase)
            }
        }
    }

    /// Stamp every touched active channel as a jumpstart.
    fn sweep_jumpstarts(&self) {
        for channel in 0..self.players.len() {
            if self.touch.mark_jumpstart(channel) {
                warn!("Sequencer: jumpstart by player {}", channel + 1);
            }
        }
    }
}

fn stay(phase: Phase) -> Step {
    Step {
        next: phase,
        action: Action::None,
    }
}

fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}
