// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Generic service system for event-driven architecture.

use core::cell::RefCell;
use heapless::Vec;

use crate::input::Direction;

/// Events that can be sent between services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Joystick moved
    Navigate(Direction),
    /// Confirm button pressed
    Confirm,
    /// Lights started
    RoundStarted,
    /// Sequencer back to idle
    RoundFinished,
}

/// Event bus for inter-service communication
pub struct EventBus {
    events: RefCell<Vec<Event, 16>>,
}

impl EventBus {
    pub const fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
        }
    }

    /// Publish an event to the bus
    pub fn publish(&self, event: Event) {
        if self.events.borrow_mut().push(event).is_err() {
            warn!("Event bus full, dropping event: {:?}", event);
        }
    }

    /// Consume events matching a filter
    pub fn consume<F>(&self, mut filter: F)
    where
        F: FnMut(&Event) -> bool,
    {
        self.events.borrow_mut().retain(|e| !filter(e));
    }

    /// Remove and return the oldest event matching a filter
    pub fn take_first<F>(&self, mut filter: F) -> Option<Event>
    where
        F: FnMut(&Event) -> bool,
    {
        let mut events = self.events.borrow_mut();
        let index = events.iter().position(&mut filter)?;
        Some(events.remove(index))
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared context passed to all services
pub struct ServiceContext<'a, P> {
    pub peripherals: &'a mut P,
    pub events: &'a EventBus,
}

/// Trait for services that run in the main loop
pub trait Service<P> {
    /// Process this service's logic
    /// Uses interior mutability (Cell/RefCell) for state changes
    fn process(&self, ctx: &mut ServiceContext<P>);
}
