use x86_64::instructions::port::Port;

use crate::constants::keyboard::{CMD_RESET_CPU, STATUS_COMMAND_PORT};
use crate::constants::power::{ACPI_SHUTDOWN_PORT, ACPI_SHUTDOWN_VALUE};
use crate::hal::Machine;
use crate::log_info;

const LOG_ORIGIN: &str = "power";

/// Power control for QEMU/Bochs-style PC hardware.
pub struct PcMachine;

impl Machine for PcMachine {
    fn shutdown(&mut self) {
        log_info!(LOG_ORIGIN, "shutting down");
        let mut port: Port<u16> = Port::new(ACPI_SHUTDOWN_PORT);
        unsafe {
            port.write(ACPI_SHUTDOWN_VALUE);
        }
        // only reached on hardware without the ACPI port
        crate::hlt_loop();
    }

    fn reboot(&mut self) {
        log_info!(LOG_ORIGIN, "rebooting");
        // pulse the CPU reset line through the keyboard controller
        let mut port: Port<u8> = Port::new(STATUS_COMMAND_PORT);
        unsafe {
            port.write(CMD_RESET_CPU);
        }
        crate::hlt_loop();
    }
}
