// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! USB CDC transport carrying newline-terminated text lines.

use reflex_common::command::Line;
use rp2040_hal::usb::UsbBus;
use usb_device::class_prelude::UsbBusAllocator;
use usb_device::prelude::*;
use usbd_serial::SerialPort;

const WRITE_STALL_LIMIT: u32 = 50_000;

#[derive(Debug, defmt::Format)]
pub enum TransportError {
    StringTooLong,
}

pub struct UsbTransport {
    serial: SerialPort<'static, UsbBus>,
    usb_dev: UsbDevice<'static, UsbBus>,
    rx_line: Line,
    /// Set once the current line has outgrown `rx_line`; the rest is dropped.
    overflowed: bool,
}

impl UsbTransport {
    pub fn new(usb_bus: &'static UsbBusAllocator<UsbBus>) -> Result<Self, TransportError> {
        let serial = SerialPort::new(usb_bus);
        let usb_dev = UsbDeviceBuilder::new(usb_bus, UsbVidPid(0x2E8A, 0x000A))
            .strings(&[StringDescriptors::default()
                .manufacturer("ADNT")
                .product("Reflex Rush")
                .serial_number("0001")])
            .map_err(|_| TransportError::StringTooLong)?
            .device_class(usbd_serial::USB_CLASS_CDC)
            .build();

        Ok(Self {
            serial,
            usb_dev,
            rx_line: Line::new(),
            overflowed: false,
        })
    }

    /// Poll USB device. Must be called frequently.
    pub fn poll(&mut self) -> bool {
        self.usb_dev.poll(&mut [&mut self.serial])
    }

    /// Read whatever the host sent and hand every completed line to `on_line`.
    pub fn try_receive(&mut self, mut on_line: impl FnMut(Line)) {
        const USB_READ_BUF_SIZE: usize = 64;
        let mut tmp = [0u8; USB_READ_BUF_SIZE];

        let Ok(count) = self.serial.read(&mut tmp) else {
            return;
        };

        for &byte in &tmp[..count] {
            if let Some(line) = self.process_byte(byte) {
                on_line(line);
            }
        }
    }

    /// Accumulate one byte. Returns the line when `byte` terminates it.
    fn process_byte(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\n' | b'\r' => self.take_line(),
            _ => {
                self.append_byte(byte);
                None
            }
        }
    }

    fn append_byte(&mut self, byte: u8) {
        // Non-ASCII bytes are not part of the protocol.
        if !byte.is_ascii() || self.rx_line.push(byte as char).is_err() {
            self.overflowed = true;
        }
    }

    fn take_line(&mut self) -> Option<Line> {
        let line = core::mem::take(&mut self.rx_line);
        if core::mem::replace(&mut self.overflowed, false) {
            defmt::warn!("USB: discarding malformed line");
            return None;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        Line::try_from(trimmed).ok()
    }

    /// A host has the port open.
    pub fn host_listening(&self) -> bool {
        self.usb_dev.state() == UsbDeviceState::Configured && self.serial.dtr()
    }

    /// Send one line followed by CRLF. Dropped when nobody is listening.
    pub fn send_line(&mut self, line: &str) {
        if !self.host_listening() {
            defmt::trace!("USB: no host, dropping line");
            return;
        }
        self.write_all(line.as_bytes());
        self.write_all(b"\r\n");
    }

    /// Write all bytes to USB serial, handling WouldBlock by polling.
    ///
    /// Gives up after `WRITE_STALL_LIMIT` polls without progress.
    fn write_all(&mut self, data: &[u8]) {
        let mut offset = 0;
        let mut stalled = 0;
        while offset < data.len() {
            match self.serial.write(&data[offset..]) {
                Ok(n) => {
                    offset += n;
                    stalled = 0;
                }
                Err(UsbError::WouldBlock) if stalled < WRITE_STALL_LIMIT => {
                    stalled += 1;
                    self.poll();
                }
                Err(_) => {
                    defmt::warn!("USB: write stalled, {} bytes dropped", data.len() - offset);
                    break;
                }
            }
        }
    }
}
