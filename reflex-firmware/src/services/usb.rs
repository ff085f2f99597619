// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! USB transport service for polling and receiving command lines.

use crate::{peripherals::Peripherals, usb_transport::UsbTransport};
use core::cell::UnsafeCell;
use heapless::spsc::Queue;
use reflex_common::{
    command::Line,
    service::{Service, ServiceContext},
    Link,
};

/// Wrapper to hold a Queue in a static without `static mut`.
///
/// SAFETY: This is only safe in a single-threaded (bare-metal, no OS) environment.
/// Only UsbTransportService (producer) calls enqueue, only UsbLink (consumer) calls dequeue.
struct SyncQueue(UnsafeCell<Queue<Line, 8>>);
unsafe impl Sync for SyncQueue {}

static LINE_QUEUE: SyncQueue = SyncQueue(UnsafeCell::new(Queue::new()));

/// Push a received line to the queue (called by USB service)
fn push_line(line: Line) -> Result<(), Line> {
    // SAFETY: Single-threaded bare-metal environment, no concurrent access
    unsafe { (*LINE_QUEUE.0.get()).enqueue(line) }
}

/// Pop the oldest received line (called through UsbLink)
fn pop_line() -> Option<Line> {
    // SAFETY: Single-threaded bare-metal environment, no concurrent access
    unsafe { (*LINE_QUEUE.0.get()).dequeue() }
}

/// Wrapper to hold an Option<UsbTransport> in a static without `static mut`.
///
/// SAFETY: Same single-threaded guarantee as above.
struct SyncTransport(UnsafeCell<Option<UsbTransport>>);
unsafe impl Sync for SyncTransport {}

static USB_TRANSPORT: SyncTransport = SyncTransport(UnsafeCell::new(None));

/// Store the USB transport (call once after initialization)
pub fn store_transport(transport: UsbTransport) {
    // SAFETY: Called only once during initialization, single-threaded
    unsafe {
        *USB_TRANSPORT.0.get() = Some(transport);
    }
}

/// Run `f` against the USB transport, if one has been stored.
///
/// Calls must not nest.
pub fn with_transport<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut UsbTransport) -> R,
{
    // SAFETY: Single-threaded environment, no concurrent access
    unsafe { (*USB_TRANSPORT.0.get()).as_mut().map(f) }
}

/// Game-facing end of the link: queued lines in, transport writes out.
pub struct UsbLink;

impl Link for UsbLink {
    fn read_line(&mut self) -> Option<Line> {
        pop_line()
    }

    fn send_line(&mut self, line: &str) {
        with_transport(|transport| transport.send_line(line));
    }
}

/// Service that polls USB and queues received lines
pub struct UsbTransportService;

impl UsbTransportService {
    pub fn new() -> Self {
        Self
    }
}

impl Service<Peripherals> for UsbTransportService {
    fn process(&self, _ctx: &mut ServiceContext<Peripherals>) {
        with_transport(|transport| {
            transport.poll();

            transport.try_receive(|line| {
                defmt::debug!("USB: received {=str}", line.as_str());
                if push_line(line).is_err() {
                    defmt::warn!("Line queue full, dropping command");
                }
            });
        });
    }
}
