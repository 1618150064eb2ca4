#![no_std]
#![no_main]

use core::panic::PanicInfo;

use textos::config::Config;
use textos::interrupts;
use textos::kernel::Kernel;
use textos::power::PcMachine;
use textos::vga_buffer::VgaDisplay;
use textos::{hlt_loop, log_error, log_info, serial_println};

const LOG_ORIGIN: &str = "boot";

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    serial_println!("[PANIC] {}", info);
    hlt_loop();
}

#[no_mangle]
pub extern "C" fn _start() -> ! {
    log_info!(LOG_ORIGIN, "starting TextOS");

    interrupts::init();

    // the only owner of the text-mode frame buffer
    let display = unsafe { VgaDisplay::new() };
    let mut kernel = match Kernel::new(display, &interrupts::STDIN, PcMachine, Config::new()) {
        Ok(kernel) => kernel,
        Err(err) => {
            log_error!(LOG_ORIGIN, "console setup failed: {}", err);
            hlt_loop();
        }
    };

    kernel.run(core::hint::spin_loop)
}
