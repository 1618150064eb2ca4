//! TextOS: a single-task text console kernel for x86_64.
//!
//! The console core (terminal, shell, programs, search, shared arena) only
//! talks to hardware through the [`hal`] traits, so it builds and tests on
//! the host. The hardware side (VGA, serial, interrupts, power) is compiled
//! for the kernel only.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), feature(abi_x86_interrupt))]

// declared first so its macros are visible everywhere below
pub mod log;

pub mod buffer;
pub mod config;
pub mod constants;
pub mod error;
pub mod hal;
pub mod kernel;
pub mod keyboard;
pub mod programs;
pub mod search;
pub mod share;
pub mod shell;
pub mod sync;
pub mod terminal;
pub mod text;

#[cfg(not(test))]
pub mod interrupts;
#[cfg(not(test))]
pub mod power;
#[cfg(not(test))]
pub mod serial;
#[cfg(not(test))]
pub mod vga_buffer;

#[cfg(test)]
mod testing;

pub use error::Error;

/// Halts the CPU until the next interrupt, forever.
#[cfg(not(test))]
pub fn hlt_loop() -> ! {
    loop {
        x86_64::instructions::hlt();
    }
}
