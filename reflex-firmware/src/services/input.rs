// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Joystick and confirm button sampling.

use crate::peripherals::Peripherals;
use core::cell::RefCell;
use embedded_hal::digital::InputPin;
use embedded_hal_0_2::adc::OneShot;
use reflex_common::{
    input::{ButtonDebouncer, NavDebouncer},
    service::{Event, Service, ServiceContext},
};

/// Service that turns raw joystick and button readings into menu events
pub struct InputService {
    nav: RefCell<NavDebouncer>,
    button: RefCell<ButtonDebouncer>,
}

impl InputService {
    pub fn new() -> Self {
        Self {
            nav: RefCell::new(NavDebouncer::new()),
            button: RefCell::new(ButtonDebouncer::new()),
        }
    }
}

impl Service<Peripherals> for InputService {
    fn process(&self, ctx: &mut ServiceContext<Peripherals>) {
        let p = &mut *ctx.peripherals;
        let now = (p.timer.get_counter().ticks() / 1000) as u32;

        let reading: Option<u16> = p.adc.read(&mut p.joystick).ok();
        if let Some(raw) = reading {
            if let Some(direction) = self.nav.borrow_mut().sample(raw, now) {
                defmt::trace!("Input: {}", direction);
                ctx.events.publish(Event::Navigate(direction));
            }
        }

        let pressed = p.button.is_low().unwrap_or(false);
        if self.button.borrow_mut().sample(pressed, now) {
            defmt::trace!("Input: confirm");
            ctx.events.publish(Event::Confirm);
        }
    }
}
