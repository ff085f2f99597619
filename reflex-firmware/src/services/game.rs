// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Game service: feeds menu input and remote lines into the game and ticks it.

use crate::{
    display::OledDisplay,
    peripherals::{BoardClock, DisplayI2c, Peripherals},
    services::usb::UsbLink,
    storage::FlashBlobStore,
};
use core::cell::RefCell;
use reflex_common::{
    game::TickOutcome,
    service::{Event, Service, ServiceContext},
    Game, XorShift,
};

pub type FirmwareGame =
    Game<'static, OledDisplay<DisplayI2c>, UsbLink, FlashBlobStore, BoardClock, XorShift>;

/// Service that owns the game and reports round boundaries on the bus
pub struct GameService {
    game: RefCell<FirmwareGame>,
}

impl GameService {
    pub fn new(game: FirmwareGame) -> Self {
        Self {
            game: RefCell::new(game),
        }
    }

    fn is_menu_input(event: &Event) -> bool {
        matches!(event, Event::Navigate(_) | Event::Confirm)
    }
}

impl Service<Peripherals> for GameService {
    fn process(&self, ctx: &mut ServiceContext<Peripherals>) {
        let mut game = self.game.borrow_mut();
        let was_idle = game.is_idle();

        // Input that arrives mid-round is dropped, not replayed afterwards.
        while let Some(event) = ctx.events.take_first(Self::is_menu_input) {
            match event {
                Event::Navigate(direction) => game.navigate(direction),
                Event::Confirm => game.confirm(),
                _ => {}
            }
        }
        game.poll_link();

        if was_idle && !game.is_idle() {
            defmt::info!("Game: round started");
            ctx.events.publish(Event::RoundStarted);
        }

        if game.tick() == TickOutcome::Finished {
            ctx.events.publish(Event::RoundFinished);
        }
    }
}
