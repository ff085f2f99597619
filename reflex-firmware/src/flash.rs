// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Flash read/program/erase wrappers over the RP2040 ROM routines.
//!
//! Erase and program must run with XIP disabled:
//!   1. connect_internal_flash()
//!   2. flash_exit_xip()
//!   3. flash_range_erase() or flash_range_program()
//!   4. flash_flush_cache()
//!   5. flash_enter_cmd_xip()
//!
//! Everything executing during steps 1-5 lives in RAM (`.data`), and the
//! ROM function pointers are resolved up front by [`init`].

use core::sync::atomic::{AtomicUsize, Ordering};

/// Start of the XIP window.
pub const FLASH_BASE: u32 = 0x1000_0000;
/// Total flash on a Pico.
pub const FLASH_SIZE: u32 = 2 * 1024 * 1024;
pub const FLASH_SECTOR_SIZE: u32 = 4096;
pub const FLASH_PAGE_SIZE: u32 = 256;

// RP2040 ROM table addresses (datasheet section 2.8.3)
/// Pointer to the ROM function table (16-bit pointer stored at 0x14)
const ROM_FUNC_TABLE_PTR: *const u16 = 0x0000_0014 as *const u16;
/// Pointer to the ROM table lookup function (16-bit pointer stored at 0x18)
const ROM_TABLE_LOOKUP_PTR: *const u16 = 0x0000_0018 as *const u16;

type RomFnVoid = unsafe extern "C" fn();
type RomFnErase = unsafe extern "C" fn(u32, usize, u32, u8);
type RomFnProgram = unsafe extern "C" fn(u32, *const u8, usize);

static ROM_CONNECT_INTERNAL_FLASH: AtomicUsize = AtomicUsize::new(0);
static ROM_FLASH_EXIT_XIP: AtomicUsize = AtomicUsize::new(0);
static ROM_FLASH_RANGE_ERASE: AtomicUsize = AtomicUsize::new(0);
static ROM_FLASH_RANGE_PROGRAM: AtomicUsize = AtomicUsize::new(0);
static ROM_FLASH_FLUSH_CACHE: AtomicUsize = AtomicUsize::new(0);
static ROM_FLASH_ENTER_CMD_XIP: AtomicUsize = AtomicUsize::new(0);

/// Look up a ROM function by its two-character tag.
unsafe fn rom_func_lookup(tag: &[u8; 2]) -> usize {
    let fn_table = *ROM_FUNC_TABLE_PTR as *const u16;

    let lookup: unsafe extern "C" fn(*const u16, u32) -> usize =
        core::mem::transmute::<usize, unsafe extern "C" fn(*const u16, u32) -> usize>(
            *ROM_TABLE_LOOKUP_PTR as usize,
        );

    let code = u16::from_le_bytes(*tag) as u32;
    lookup(fn_table, code)
}

/// Resolve the ROM flash routines. Must run once before any erase/program.
///
/// Returns `false` when any routine is missing from the ROM table, in which
/// case flash must not be written.
pub fn init() -> bool {
    let slots = [
        (&ROM_CONNECT_INTERNAL_FLASH, b"IF"),
        (&ROM_FLASH_EXIT_XIP, b"EX"),
        (&ROM_FLASH_RANGE_ERASE, b"RE"),
        (&ROM_FLASH_RANGE_PROGRAM, b"RP"),
        (&ROM_FLASH_FLUSH_CACHE, b"FC"),
        (&ROM_FLASH_ENTER_CMD_XIP, b"CX"),
    ];

    let mut complete = true;
    for (slot, tag) in slots {
        let addr = unsafe { rom_func_lookup(tag) };
        if addr == 0 {
            defmt::error!("Flash: ROM routine {} not found", tag);
            complete = false;
        }
        slot.store(addr, Ordering::Release);
    }
    complete
}

/// Convert an absolute XIP flash address to a flash-relative offset.
pub fn addr_to_offset(abs_addr: u32) -> u32 {
    abs_addr - FLASH_BASE
}

/// Erase whole sectors at the given flash-relative offset.
///
/// # Safety
/// [`init`] must have succeeded, and the range must not hold running code.
#[link_section = ".data"]
#[inline(never)]
pub unsafe fn flash_erase(offset: u32, size: u32) {
    let connect: RomFnVoid = core::mem::transmute(ROM_CONNECT_INTERNAL_FLASH.load(Ordering::Acquire));
    let exit_xip: RomFnVoid = core::mem::transmute(ROM_FLASH_EXIT_XIP.load(Ordering::Acquire));
    let erase: RomFnErase = core::mem::transmute(ROM_FLASH_RANGE_ERASE.load(Ordering::Acquire));
    let flush: RomFnVoid = core::mem::transmute(ROM_FLASH_FLUSH_CACHE.load(Ordering::Acquire));
    let enter_xip: RomFnVoid = core::mem::transmute(ROM_FLASH_ENTER_CMD_XIP.load(Ordering::Acquire));

    cortex_m::interrupt::disable();
    connect();
    exit_xip();
    erase(offset, size as usize, FLASH_SECTOR_SIZE, 0x20);
    flush();
    enter_xip();
    cortex_m::interrupt::enable();
}

/// Program whole pages at the given flash-relative offset.
///
/// # Safety
/// [`init`] must have succeeded, and the target range must be erased.
#[link_section = ".data"]
#[inline(never)]
pub unsafe fn flash_program(offset: u32, data: *const u8, len: usize) {
    let connect: RomFnVoid = core::mem::transmute(ROM_CONNECT_INTERNAL_FLASH.load(Ordering::Acquire));
    let exit_xip: RomFnVoid = core::mem::transmute(ROM_FLASH_EXIT_XIP.load(Ordering::Acquire));
    let program: RomFnProgram = core::mem::transmute(ROM_FLASH_RANGE_PROGRAM.load(Ordering::Acquire));
    let flush: RomFnVoid = core::mem::transmute(ROM_FLASH_FLUSH_CACHE.load(Ordering::Acquire));
    let enter_xip: RomFnVoid = core::mem::transmute(ROM_FLASH_ENTER_CMD_XIP.load(Ordering::Acquire));

    cortex_m::interrupt::disable();
    connect();
    exit_xip();
    program(offset, data, len);
    flush();
    enter_xip();
    cortex_m::interrupt::enable();
}

/// Read bytes from an absolute XIP flash address via volatile reads.
pub fn flash_read(abs_addr: u32, buf: &mut [u8]) {
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte = unsafe { ((abs_addr + i as u32) as *const u8).read_volatile() };
    }
}
