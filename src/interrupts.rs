use lazy_static::lazy_static;
use pic8259::ChainedPics;
use spin::Mutex;
use x86_64::instructions::port::Port;
use x86_64::structures::idt::{InterruptDescriptorTable, InterruptStackFrame, PageFaultErrorCode};

use crate::constants::interrupts::{
    PIC_1_DATA_PORT, PIC_1_KEYBOARD_ONLY, PIC_1_OFFSET, PIC_2_DATA_PORT, PIC_2_OFFSET,
};
use crate::keyboard::{self, KeyDecoder};
use crate::terminal::Stdin;
use crate::{log_error, log_info, log_warn};

const LOG_ORIGIN: &str = "interrupts";

/// Hardware interrupt numbers (after remapping)
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum InterruptIndex {
    Timer = PIC_1_OFFSET,
    Keyboard,
    // PIC 1 (master) IRQs 2-7
    Cascade,
    COM2,
    COM1,
    LPT2,
    FloppyDisk,
    LPT1,
    // PIC 2 (slave) IRQs 8-15
    RTC = PIC_2_OFFSET,
    ACPI,
    Available1,
    Available2,
    Mouse,
    CoProcessor,
    PrimaryATA,
    SecondaryATA,
}

impl InterruptIndex {
    fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Programmable Interrupt Controller (PIC) setup
pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

/// The input line the keyboard handler feeds.
pub static STDIN: Stdin = Stdin::new();

static KEYBOARD: Mutex<KeyDecoder> = Mutex::new(KeyDecoder::new());

lazy_static! {
    static ref IDT: InterruptDescriptorTable = {
        let mut idt = InterruptDescriptorTable::new();

        // CPU exceptions
        idt.breakpoint.set_handler_fn(breakpoint_handler);
        idt.double_fault.set_handler_fn(double_fault_handler);
        idt.page_fault.set_handler_fn(page_fault_handler);
        idt.general_protection_fault.set_handler_fn(general_protection_fault_handler);

        // Every PIC line gets a handler so a stray IRQ never triple faults
        idt[InterruptIndex::Keyboard.as_u8()].set_handler_fn(keyboard_interrupt_handler);
        for irq in [
            InterruptIndex::Timer,
            InterruptIndex::Cascade,
            InterruptIndex::COM2,
            InterruptIndex::COM1,
            InterruptIndex::LPT2,
            InterruptIndex::FloppyDisk,
            InterruptIndex::LPT1,
            InterruptIndex::RTC,
            InterruptIndex::ACPI,
            InterruptIndex::Available1,
            InterruptIndex::Available2,
            InterruptIndex::Mouse,
            InterruptIndex::CoProcessor,
            InterruptIndex::PrimaryATA,
            InterruptIndex::SecondaryATA,
        ] {
            idt[irq.as_u8()].set_handler_fn(spurious_interrupt_handler);
        }

        idt
    };
}

/// Loads the IDT, remaps the PICs with only the keyboard line unmasked and
/// enables interrupts. Called once at boot.
pub fn init() {
    IDT.load();

    unsafe {
        PICS.lock().initialize();

        let mut pic1_data: Port<u8> = Port::new(PIC_1_DATA_PORT);
        let mut pic2_data: Port<u8> = Port::new(PIC_2_DATA_PORT);
        pic1_data.write(PIC_1_KEYBOARD_ONLY);
        pic2_data.write(0xFF);
    }
    log_info!(LOG_ORIGIN, "IDT loaded, PIC1 mask {:#04x}", PIC_1_KEYBOARD_ONLY);

    x86_64::instructions::interrupts::enable();
}

// Exception handlers
extern "x86-interrupt" fn breakpoint_handler(stack_frame: InterruptStackFrame) {
    log_warn!(LOG_ORIGIN, "breakpoint\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn double_fault_handler(
    stack_frame: InterruptStackFrame,
    _error_code: u64,
) -> ! {
    log_error!(LOG_ORIGIN, "DOUBLE FAULT\n{:#?}", stack_frame);
    crate::hlt_loop();
}

extern "x86-interrupt" fn page_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: PageFaultErrorCode,
) {
    use x86_64::registers::control::Cr2;

    log_error!(
        LOG_ORIGIN,
        "PAGE FAULT at {:?}, {:?}\n{:#?}",
        Cr2::read(),
        error_code,
        stack_frame
    );
    crate::hlt_loop();
}

extern "x86-interrupt" fn general_protection_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: u64,
) {
    log_error!(LOG_ORIGIN, "GENERAL PROTECTION FAULT ({})\n{:#?}", error_code, stack_frame);
    crate::hlt_loop();
}

// Hardware interrupt handlers
extern "x86-interrupt" fn keyboard_interrupt_handler(_stack_frame: InterruptStackFrame) {
    if let Some(scancode) = keyboard::read_scancode() {
        // interrupts are off in here, so this cannot race the foreground
        KEYBOARD.lock().handle_scancode(scancode, &STDIN);
    }

    unsafe {
        PICS.lock()
            .notify_end_of_interrupt(InterruptIndex::Keyboard.as_u8());
    }
}

extern "x86-interrupt" fn spurious_interrupt_handler(_stack_frame: InterruptStackFrame) {
    // the line is unknown here; a slave vector acknowledges both PICs
    unsafe {
        PICS.lock().notify_end_of_interrupt(PIC_2_OFFSET);
    }
}
