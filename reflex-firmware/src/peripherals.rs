// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Board bring-up and the peripherals shared by the services.
//!
//! Wiring (Raspberry Pi Pico):
//! - GP4/GP5: I2C0 SDA/SCL to the SSD1306
//! - GP10..GP13: touch sensors, one per player, active high
//! - GP14: confirm button to ground
//! - GP26 (ADC0): joystick Y axis
//! - GP25: on-board LED

use core::cell::UnsafeCell;

use embedded_hal::delay::DelayNs;
use reflex_common::Clock;
use rp2040_hal::{
    adc::{Adc, AdcPin},
    clocks::init_clocks_and_plls,
    fugit::RateExtU32,
    gpio::{
        bank0::{Gpio14, Gpio25, Gpio26, Gpio4, Gpio5},
        FunctionI2C, FunctionSioInput, FunctionSioOutput, Pin, Pins, PullDown, PullNone,
        PullUp,
    },
    pac,
    rosc::{Enabled, RingOscillator},
    usb::UsbBus,
    Sio, Timer, Watchdog, I2C,
};
use usb_device::class_prelude::UsbBusAllocator;

use crate::services::usb;
use crate::touch;

const XTAL_FREQ_HZ: u32 = 12_000_000;

pub type LedPin = Pin<Gpio25, FunctionSioOutput, PullDown>;
pub type ButtonPin = Pin<Gpio14, FunctionSioInput, PullUp>;
pub type JoystickPin = AdcPin<Pin<Gpio26, FunctionSioInput, PullNone>>;
pub type DisplayI2c = I2C<
    pac::I2C0,
    (
        Pin<Gpio4, FunctionI2C, PullUp>,
        Pin<Gpio5, FunctionI2C, PullUp>,
    ),
>;

/// Peripherals polled from the main loop.
pub struct Peripherals {
    pub timer: Timer,
    pub led_pin: LedPin,
    pub adc: Adc,
    pub joystick: JoystickPin,
    pub button: ButtonPin,
}

/// Everything `init` hands back to `main`.
pub struct Board {
    pub peripherals: Peripherals,
    pub display_i2c: DisplayI2c,
    pub usb_bus: &'static UsbBusAllocator<UsbBus>,
    /// Entropy from the ring oscillator for the phase durations.
    pub seed: u32,
}

/// Wrapper to hold the USB bus allocator in a static without `static mut`.
///
/// SAFETY: Written once in `init` before anything borrows it.
struct SyncBus(UnsafeCell<Option<UsbBusAllocator<UsbBus>>>);
unsafe impl Sync for SyncBus {}

static USB_BUS: SyncBus = SyncBus(UnsafeCell::new(None));

fn store_usb_bus(bus: UsbBusAllocator<UsbBus>) -> &'static UsbBusAllocator<UsbBus> {
    // SAFETY: Called once during init, single-threaded, before any reader exists
    unsafe {
        let slot = &mut *USB_BUS.0.get();
        slot.insert(bus)
    }
}

pub fn init() -> Option<Board> {
    let mut pac = pac::Peripherals::take()?;
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    let clocks = init_clocks_and_plls(
        XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()?;

    let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let seed = random_seed(RingOscillator::new(pac.ROSC).initialize());

    let sio = Sio::new(pac.SIO);
    let pins = Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let display_i2c = I2C::i2c0(
        pac.I2C0,
        pins.gpio4.reconfigure::<FunctionI2C, PullUp>(),
        pins.gpio5.reconfigure::<FunctionI2C, PullUp>(),
        400.kHz(),
        &mut pac.RESETS,
        &clocks.system_clock,
    );

    let adc = Adc::new(pac.ADC, &mut pac.RESETS);
    let joystick = AdcPin::new(pins.gpio26.into_floating_input()).ok()?;

    touch::install(
        [
            pins.gpio10.into_pull_down_input().into_dyn_pin(),
            pins.gpio11.into_pull_down_input().into_dyn_pin(),
            pins.gpio12.into_pull_down_input().into_dyn_pin(),
            pins.gpio13.into_pull_down_input().into_dyn_pin(),
        ],
        timer,
    );

    let usb_bus = store_usb_bus(UsbBusAllocator::new(UsbBus::new(
        pac.USBCTRL_REGS,
        pac.USBCTRL_DPRAM,
        clocks.usb_clock,
        true,
        &mut pac.RESETS,
    )));

    Some(Board {
        peripherals: Peripherals {
            timer,
            led_pin: pins.gpio25.into_push_pull_output(),
            adc,
            joystick,
            button: pins.gpio14.into_pull_up_input(),
        },
        display_i2c,
        usb_bus,
        seed,
    })
}

fn random_seed(rosc: RingOscillator<Enabled>) -> u32 {
    (0..32).fold(0u32, |acc, _| (acc << 1) | rosc.get_random_bit() as u32)
}

/// Millisecond clock on the 1 MHz system timer.
///
/// Delays keep servicing USB so the host does not see the device stall.
pub struct BoardClock {
    timer: Timer,
}

impl BoardClock {
    pub fn new(timer: Timer) -> Self {
        Self { timer }
    }
}

impl Clock for BoardClock {
    /// The 64-bit microsecond counter truncated to u32 milliseconds.
    fn now_ms(&self) -> u32 {
        (self.timer.get_counter().ticks() / 1000) as u32
    }

    fn delay_ms(&mut self, ms: u32) {
        let start = self.now_ms();
        while self.now_ms().wrapping_sub(start) < ms {
            if usb::with_transport(|transport| transport.poll()).is_none() {
                self.timer.delay_ms(1);
            }
        }
    }
}
