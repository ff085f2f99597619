// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Rising-edge capture for the four touch sensors.
//!
//! The GPIO bank interrupt stamps each channel's first edge into [`TOUCH`];
//! the main loop only ever reads it through the sequencer.

use core::cell::RefCell;

use critical_section::Mutex;
use reflex_common::config::MAX_PLAYERS;
use reflex_common::TouchCaptureState;
use rp2040_hal::{
    gpio::{DynPinId, FunctionSioInput, Interrupt::EdgeHigh, Pin, PullDown},
    pac::{self, interrupt},
    Timer,
};

pub type TouchPin = Pin<DynPinId, FunctionSioInput, PullDown>;

/// Capture state shared between the interrupt and the game.
pub static TOUCH: TouchCaptureState = TouchCaptureState::new();

struct TouchInputs {
    pins: [TouchPin; MAX_PLAYERS],
    timer: Timer,
}

/// Handed from `install` to the interrupt, which takes it on first entry.
static INPUTS: Mutex<RefCell<Option<TouchInputs>>> = Mutex::new(RefCell::new(None));

/// Arm rising-edge interrupts on the touch pins, in channel order.
pub fn install(mut pins: [TouchPin; MAX_PLAYERS], timer: Timer) {
    for pin in &mut pins {
        pin.clear_interrupt(EdgeHigh);
        pin.set_interrupt_enabled(EdgeHigh, true);
    }

    critical_section::with(|cs| {
        INPUTS.borrow(cs).replace(Some(TouchInputs { pins, timer }));
    });

    // SAFETY: the handler only touches state moved in above
    unsafe {
        pac::NVIC::unmask(pac::Interrupt::IO_IRQ_BANK0);
    }
    defmt::info!("Touch: {} channels armed", MAX_PLAYERS);
}

#[interrupt]
fn IO_IRQ_BANK0() {
    static mut INPUTS_LOCAL: Option<TouchInputs> = None;

    if INPUTS_LOCAL.is_none() {
        critical_section::with(|cs| {
            *INPUTS_LOCAL = INPUTS.borrow(cs).take();
        });
    }

    let Some(inputs) = INPUTS_LOCAL else {
        return;
    };

    // Same wrapping millisecond base as `BoardClock::now_ms`.
    let now_ms = (inputs.timer.get_counter().ticks() / 1000) as u32;
    for (channel, pin) in inputs.pins.iter_mut().enumerate() {
        if pin.interrupt_status(EdgeHigh) {
            pin.clear_interrupt(EdgeHigh);
            TOUCH.on_edge(channel, now_ms);
        }
    }
}
