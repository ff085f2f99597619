// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Service implementations for the game firmware.

pub mod game;
pub mod input;
pub mod led;
pub mod usb;

pub use game::GameService;
pub use input::InputService;
pub use led::LedStatusService;
pub use usb::UsbTransportService;
