//! Scan code decoding for the PS/2 keyboard.
//!
//! Set-1 scan codes become key events through `pc-keyboard`; key-down
//! events then map through a fixed US-position table. Shift only
//! uppercases letters and turns '8' into '*'.

use pc_keyboard::{KeyCode, KeyEvent, KeyState, ScancodeSet, ScancodeSet1};

use crate::constants::terminal::BACKSPACE;
use crate::log_debug;
use crate::terminal::Stdin;

const LOG_ORIGIN: &str = "keyboard";

/// Set-1 prefix bytes. As codes >= 0x80 they are releases of unmapped keys.
const EXTENDED_PREFIXES: [u8; 2] = [0xE0, 0xE1];

pub struct KeyDecoder {
    scancodes: ScancodeSet1,
    shift_held: bool,
}

impl KeyDecoder {
    pub const fn new() -> Self {
        KeyDecoder {
            scancodes: ScancodeSet1::new(),
            shift_held: false,
        }
    }

    pub fn shift_held(&self) -> bool {
        self.shift_held
    }

    /// Advances the decoder by one raw scan code and returns the character
    /// it produced, if any.
    ///
    /// Prefix bytes are dropped on their own, so the byte after them maps
    /// by position like any other code: keypad Enter still ends a line.
    pub fn decode(&mut self, scancode: u8) -> Option<u8> {
        if EXTENDED_PREFIXES.contains(&scancode) {
            return None;
        }
        let event = match self.scancodes.advance_state(scancode) {
            Ok(Some(event)) => event,
            Ok(None) => return None,
            Err(_) => {
                log_debug!(LOG_ORIGIN, "unknown scancode {:#04x}", scancode);
                return None;
            }
        };
        self.apply(event)
    }

    fn apply(&mut self, event: KeyEvent) -> Option<u8> {
        let is_shift = matches!(event.code, KeyCode::LShift | KeyCode::RShift);
        match event.state {
            KeyState::Down if is_shift => {
                self.shift_held = true;
                None
            }
            KeyState::Up if is_shift => {
                self.shift_held = false;
                None
            }
            KeyState::Down => key_char(event.code).map(|c| self.shifted(c)),
            _ => None,
        }
    }

    fn shifted(&self, c: u8) -> u8 {
        if !self.shift_held {
            return c;
        }
        match c {
            b'8' => b'*',
            c => c.to_ascii_uppercase(),
        }
    }

    /// Decodes `scancode` and hands the character to `stdin`. Characters
    /// decoded while no line edit is open are discarded.
    pub fn handle_scancode(&mut self, scancode: u8, stdin: &Stdin) {
        if let Some(c) = self.decode(scancode) {
            if let Err(err) = stdin.accept_char(c) {
                log_debug!(LOG_ORIGIN, "dropped {:#04x}: {}", c, err);
            }
        }
    }
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Unshifted character for each mapped key position.
fn key_char(code: KeyCode) -> Option<u8> {
    let c = match code {
        KeyCode::Escape => 0x13,
        KeyCode::Key1 => b'1',
        KeyCode::Key2 => b'2',
        KeyCode::Key3 => b'3',
        KeyCode::Key4 => b'4',
        KeyCode::Key5 => b'5',
        KeyCode::Key6 => b'6',
        KeyCode::Key7 => b'7',
        KeyCode::Key8 => b'8',
        KeyCode::Key9 => b'9',
        KeyCode::Key0 => b'0',
        KeyCode::OemMinus => b'-',
        KeyCode::OemPlus => b'+',
        KeyCode::Backspace => BACKSPACE,
        KeyCode::Tab => b'?',
        KeyCode::Q => b'q',
        KeyCode::W => b'w',
        KeyCode::E => b'e',
        KeyCode::R => b'r',
        KeyCode::T => b't',
        KeyCode::Y => b'y',
        KeyCode::U => b'u',
        KeyCode::I => b'i',
        KeyCode::O => b'o',
        KeyCode::P => b'p',
        KeyCode::Return => b'\n',
        KeyCode::A => b'a',
        KeyCode::S => b's',
        KeyCode::D => b'd',
        KeyCode::F => b'f',
        KeyCode::G => b'g',
        KeyCode::H => b'h',
        KeyCode::J => b'j',
        KeyCode::K => b'k',
        KeyCode::L => b'l',
        KeyCode::Oem1 => b':',
        KeyCode::Oem3 => b'\'',
        KeyCode::Oem8 => b'`',
        KeyCode::Z => b'z',
        KeyCode::X => b'x',
        KeyCode::C => b'c',
        KeyCode::V => b'v',
        KeyCode::B => b'b',
        KeyCode::N => b'n',
        KeyCode::M => b'm',
        KeyCode::Oem2 => b'/',
        KeyCode::NumpadMultiply => b'*',
        KeyCode::Spacebar => b' ',
        _ => return None,
    };
    Some(c)
}

/// Reads one pending scan code from the controller, if its output buffer
/// holds one. Nothing is queued: a code overwritten before this runs is
/// lost.
#[cfg(not(test))]
pub fn read_scancode() -> Option<u8> {
    use crate::constants::keyboard::{DATA_PORT, STATUS_COMMAND_PORT, STATUS_OUTPUT_BUFFER_FULL};
    use x86_64::instructions::port::Port;

    let mut status_port = Port::<u8>::new(STATUS_COMMAND_PORT);
    let mut data_port = Port::<u8>::new(DATA_PORT);
    unsafe {
        if status_port.read() & STATUS_OUTPUT_BUFFER_FULL != 0 {
            Some(data_port.read())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{press, release, type_text};

    const LSHIFT: u8 = 0x2A;
    const RSHIFT: u8 = 0x36;

    fn decode_all(decoder: &mut KeyDecoder, codes: &[u8]) -> ([u8; 32], usize) {
        let mut out = [0; 32];
        let mut n = 0;
        for &code in codes {
            if let Some(c) = decoder.decode(code) {
                out[n] = c;
                n += 1;
            }
        }
        (out, n)
    }

    #[test]
    fn key_down_maps_positionally() {
        let mut decoder = KeyDecoder::new();
        let codes = type_text("hello world\n");
        let (out, n) = decode_all(&mut decoder, &codes);
        assert_eq!(&out[..n], b"hello world\n");
    }

    #[test]
    fn key_up_yields_nothing() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(release(0x1E)), None);
        assert_eq!(decoder.decode(press(0x1E)), Some(b'a'));
    }

    #[test]
    fn shift_uppercases_letters_and_star_on_eight() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(press(LSHIFT)), None);
        assert!(decoder.shift_held());
        assert_eq!(decoder.decode(press(0x1E)), Some(b'A'));
        assert_eq!(decoder.decode(press(0x09)), Some(b'*'));
        // no other shifted symbols
        assert_eq!(decoder.decode(press(0x02)), Some(b'1'));
        assert_eq!(decoder.decode(press(0x35)), Some(b'/'));
        assert_eq!(decoder.decode(release(LSHIFT)), None);
        assert!(!decoder.shift_held());
        assert_eq!(decoder.decode(press(0x1E)), Some(b'a'));
    }

    #[test]
    fn right_shift_also_counts() {
        let mut decoder = KeyDecoder::new();
        decoder.decode(press(RSHIFT));
        assert_eq!(decoder.decode(press(0x10)), Some(b'Q'));
        decoder.decode(release(RSHIFT));
        assert_eq!(decoder.decode(press(0x10)), Some(b'q'));
    }

    #[test]
    fn unmapped_keys_yield_nothing() {
        let mut decoder = KeyDecoder::new();
        // left control, left alt, '['
        assert_eq!(decoder.decode(press(0x1D)), None);
        assert_eq!(decoder.decode(press(0x38)), None);
        assert_eq!(decoder.decode(press(0x1A)), None);
    }

    #[test]
    fn special_positions() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(press(0x0E)), Some(BACKSPACE));
        assert_eq!(decoder.decode(press(0x1C)), Some(b'\n'));
        assert_eq!(decoder.decode(press(0x29)), Some(b'`'));
        assert_eq!(decoder.decode(press(0x0D)), Some(b'+'));
        assert_eq!(decoder.decode(press(0x39)), Some(b' '));
    }

    #[test]
    fn prefixed_codes_map_by_position() {
        let mut decoder = KeyDecoder::new();
        // keypad Enter and keypad '/'
        assert_eq!(decoder.decode(0xE0), None);
        assert_eq!(decoder.decode(0x1C), Some(b'\n'));
        assert_eq!(decoder.decode(0xE0), None);
        assert_eq!(decoder.decode(0x35), Some(b'/'));
        assert_eq!(decoder.decode(0xE0), None);
        assert_eq!(decoder.decode(release(0x35)), None);

        // fake shift sent around extended keys still toggles shift
        decoder.decode(0xE0);
        decoder.decode(press(LSHIFT));
        assert!(decoder.shift_held());
        assert_eq!(decoder.decode(press(0x1E)), Some(b'A'));
        decoder.decode(0xE0);
        decoder.decode(release(LSHIFT));
        assert!(!decoder.shift_held());
    }

    #[test]
    fn keypad_enter_completes_a_line() {
        let stdin = Stdin::new();
        let mut decoder = KeyDecoder::new();
        let mut term = crate::terminal::Terminal::new(crate::testing::MockDisplay::new(), &stdin, "");
        term.open();
        for code in [press(0x23), press(0x17), 0xE0, press(0x1C)] {
            decoder.handle_scancode(code, &stdin);
        }
        assert_eq!(term.read_line(|| {}).as_str(), "hi");
    }

    #[test]
    fn forwards_only_while_open() {
        let stdin = Stdin::new();
        let mut decoder = KeyDecoder::new();
        decoder.handle_scancode(press(0x1E), &stdin);
        assert!(!stdin.is_open());

        let mut term = crate::terminal::Terminal::new(crate::testing::MockDisplay::new(), &stdin, "");
        term.open();
        decoder.handle_scancode(press(0x1E), &stdin);
        decoder.handle_scancode(press(0x1C), &stdin);
        assert_eq!(term.read_line(|| {}).as_str(), "a");
    }
}
