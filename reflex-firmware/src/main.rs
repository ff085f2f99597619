// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

#![no_std]
#![no_main]

mod display;
mod flash;
mod peripherals;
mod services;
mod storage;
mod touch;
mod usb_transport;

use defmt_rtt as _;
use embedded_hal::digital::OutputPin;
use panic_probe as _;

defmt::timestamp!("{=u64:us}", { 0 });

use cortex_m_rt::entry;
use reflex_common::{
    service::{EventBus, Service, ServiceContext},
    Clock, Game, GameOptions, TextDisplay, TextSize, XorShift,
};

use crate::display::OledDisplay;
use crate::peripherals::BoardClock;
use crate::services::{usb, GameService, InputService, LedStatusService, UsbTransportService};
use crate::storage::FlashBlobStore;
use crate::usb_transport::UsbTransport;

const SPLASH_MS: u32 = 2000;

#[unsafe(link_section = ".boot2")]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

#[entry]
fn main() -> ! {
    defmt::println!("Reflex Rush v{} init", env!("REFLEX_VERSION"));

    let Some(board) = peripherals::init() else {
        defmt::panic!("Board init failed");
    };
    let peripherals::Board {
        mut peripherals,
        display_i2c,
        usb_bus,
        seed,
    } = board;

    let mut display = match OledDisplay::new(display_i2c) {
        Ok(display) => display,
        Err(e) => {
            defmt::error!("Display init failed: {}", defmt::Debug2Format(&e));
            peripherals.led_pin.set_high().ok();
            loop {
                cortex_m::asm::nop();
            }
        }
    };

    display.show_text(
        &["Reflex Rush", concat!("v", env!("REFLEX_VERSION"))],
        TextSize::Normal,
    );

    match UsbTransport::new(usb_bus) {
        Ok(transport) => {
            defmt::println!("USB CDC initialized");
            usb::store_transport(transport);
        }
        Err(e) => defmt::error!("Failed to initialize USB transport: {:?}", e),
    }

    let mut clock = BoardClock::new(peripherals.timer);
    clock.delay_ms(SPLASH_MS);

    let storage = FlashBlobStore::new();
    if storage.is_none() {
        defmt::error!("Storage init failed");
    }

    let options = GameOptions {
        remote_start: cfg!(feature = "remote-start"),
    };
    let mut game = Game::new(
        &touch::TOUCH,
        XorShift::new(seed),
        display,
        usb::UsbLink,
        storage,
        clock,
        options,
    );
    game.boot();

    let usb_service = UsbTransportService::new();
    let input_service = InputService::new();
    let game_service = GameService::new(game);
    let led_service = LedStatusService::new();

    let events = EventBus::new();
    let mut ctx = ServiceContext {
        peripherals: &mut peripherals,
        events: &events,
    };

    let services: [&dyn Service<peripherals::Peripherals>; 4] =
        [&usb_service, &input_service, &game_service, &led_service];

    defmt::println!("Entering main loop");
    loop {
        for service in &services {
            service.process(&mut ctx);
        }
    }
}
