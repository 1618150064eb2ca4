use volatile::Volatile;
use x86_64::instructions::port::Port;

use crate::constants::vga::{
    BUFFER_ADDR, BUFFER_HEIGHT, BUFFER_WIDTH, COMMAND_PORT, CURSOR_LOCATION_HIGH,
    CURSOR_LOCATION_LOW, DATA_PORT,
};
use crate::hal::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
struct ScreenChar {
    ascii_character: u8,
    color_code: u8,
}

#[repr(transparent)]
struct Buffer {
    chars: [[Volatile<ScreenChar>; BUFFER_WIDTH]; BUFFER_HEIGHT],
}

/// The 80x25 text-mode frame buffer at 0xb8000.
///
/// Cell (col, row) lives at byte offset `row * 160 + col * 2`: character
/// first, attribute second.
pub struct VgaDisplay {
    buffer: &'static mut Buffer,
    command: Port<u8>,
    data: Port<u8>,
}

impl VgaDisplay {
    /// # Safety
    ///
    /// Must be constructed at most once; the value takes exclusive
    /// ownership of the text-mode frame buffer and the CRTC port pair.
    pub unsafe fn new() -> Self {
        VgaDisplay {
            buffer: &mut *(BUFFER_ADDR as *mut Buffer),
            command: Port::new(COMMAND_PORT),
            data: Port::new(DATA_PORT),
        }
    }
}

impl Display for VgaDisplay {
    fn put(&mut self, col: usize, row: usize, byte: u8, attr: u8) {
        self.buffer.chars[row][col].write(ScreenChar {
            ascii_character: byte,
            color_code: attr,
        });
    }

    fn clear(&mut self) {
        let blank = ScreenChar {
            ascii_character: 0,
            color_code: 0,
        };
        for row in self.buffer.chars.iter_mut() {
            for cell in row.iter_mut() {
                cell.write(blank);
            }
        }
    }

    fn set_cursor(&mut self, col: usize, row: usize) {
        let pos = (row * BUFFER_WIDTH + col) as u16;
        unsafe {
            self.command.write(CURSOR_LOCATION_LOW);
            self.data.write((pos & 0xFF) as u8);
            self.command.write(CURSOR_LOCATION_HIGH);
            self.data.write((pos >> 8) as u8);
        }
    }
}
