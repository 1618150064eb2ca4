/// System-wide constants to avoid magic numbers

/// VGA text mode constants
pub mod vga {
    /// VGA text buffer physical address
    pub const BUFFER_ADDR: usize = 0xb8000;

    /// VGA text mode dimensions
    pub const BUFFER_HEIGHT: usize = 25;
    pub const BUFFER_WIDTH: usize = 80;

    /// Light gray on black, used for every cell
    pub const DEFAULT_ATTR: u8 = 0x07;

    /// VGA control ports (index / data pair)
    pub const COMMAND_PORT: u16 = 0x3D4;
    pub const DATA_PORT: u16 = 0x3D5;

    /// Cursor control registers
    pub const CURSOR_LOCATION_HIGH: u8 = 0x0E;
    pub const CURSOR_LOCATION_LOW: u8 = 0x0F;
}

/// PS/2 Keyboard controller constants
pub mod keyboard {
    /// PS/2 keyboard data port
    pub const DATA_PORT: u16 = 0x60;

    /// PS/2 keyboard status/command port
    pub const STATUS_COMMAND_PORT: u16 = 0x64;

    /// Status register bit flags
    pub const STATUS_OUTPUT_BUFFER_FULL: u8 = 0x01;

    /// Command to reset CPU via keyboard controller
    pub const CMD_RESET_CPU: u8 = 0xFE;
}

/// Interrupt constants
pub mod interrupts {
    /// PIC (Programmable Interrupt Controller) offset
    /// We remap PIC interrupts to start at 32 to avoid conflicts with CPU exceptions
    pub const PIC_1_OFFSET: u8 = 32;
    pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

    /// PIC mask registers
    pub const PIC_1_DATA_PORT: u16 = 0x21;
    pub const PIC_2_DATA_PORT: u16 = 0xA1;

    /// PIC1 mask with only IRQ1 (keyboard) enabled
    pub const PIC_1_KEYBOARD_ONLY: u8 = 0xFF ^ 0x02;
}

/// Power control (QEMU / Bochs ACPI shutdown port)
pub mod power {
    pub const ACPI_SHUTDOWN_PORT: u16 = 0x604;
    pub const ACPI_SHUTDOWN_VALUE: u16 = 0x2000;
}

/// Terminal buffers and input conventions
pub mod terminal {
    /// Input line capacity in bytes
    pub const INPUT_CAPACITY: usize = 255;

    /// Output (scrollback) capacity in bytes
    pub const OUTPUT_CAPACITY: usize = 2047;

    /// Once the input line holds this many bytes only backspace and
    /// newline are still accepted
    pub const INPUT_SOFT_LIMIT: usize = 40;

    /// Typing this character wipes the screen instead of being entered
    pub const CLEAR_SIGIL: u8 = b'`';

    /// Marker appended for the backspace key, resolved before each render
    pub const BACKSPACE: u8 = 0x08;
}

/// Program registry limits
pub mod programs {
    pub const PROGRAM_MAX: usize = 255;
    pub const NAME_MAX: usize = 32;

    /// Program name plus up to three arguments
    pub const ARGS_MAX: usize = 4;
}

/// Shared memory arena limits
pub mod share {
    pub const ENTRY_MAX: usize = 16;
    pub const ARENA_SIZE: usize = 511;
    pub const NAME_MAX: usize = 32;
    pub const BLOCK_MAX: usize = 255;
}
