// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! LED service for status indication.

use crate::peripherals::Peripherals;
use core::cell::Cell;
use embedded_hal::digital::OutputPin;
use reflex_common::service::{Event, Service, ServiceContext};

/// LED state machine
#[derive(Clone, Copy)]
enum LedState {
    /// Heartbeat while the menu is up.
    On { since_us: u64 },
    Off { since_us: u64 },
    /// Solid during a round.
    Round,
}

/// Service that blinks the LED while idle and holds it on during a round
pub struct LedStatusService {
    state: Cell<LedState>,
}

const LED_PERIOD_US: u64 = 500_000; // 500ms

impl LedStatusService {
    pub fn new() -> Self {
        Self {
            state: Cell::new(LedState::Off { since_us: 0 }),
        }
    }
}

impl Service<Peripherals> for LedStatusService {
    fn process(&self, ctx: &mut ServiceContext<Peripherals>) {
        let now = ctx.peripherals.timer.get_counter().ticks();

        let mut started = false;
        let mut finished = false;
        ctx.events.consume(|event| match event {
            Event::RoundStarted => {
                started = true;
                true
            }
            Event::RoundFinished => {
                finished = true;
                true
            }
            _ => false,
        });

        if started {
            ctx.peripherals.led_pin.set_high().ok();
            self.state.set(LedState::Round);
            return;
        }
        if finished {
            ctx.peripherals.led_pin.set_low().ok();
            self.state.set(LedState::Off { since_us: now });
            return;
        }

        match self.state.get() {
            LedState::On { since_us } => {
                if now - since_us >= LED_PERIOD_US {
                    ctx.peripherals.led_pin.set_low().ok();
                    self.state.set(LedState::Off { since_us: now });
                }
            }
            LedState::Off { since_us } => {
                if now - since_us >= LED_PERIOD_US {
                    ctx.peripherals.led_pin.set_high().ok();
                    self.state.set(LedState::On { since_us: now });
                }
            }
            LedState::Round => {}
        }
    }
}
