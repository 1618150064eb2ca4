//! Terminal engine: input line, scrollback, cursor and rendering.
//!
//! The input line is shared with the keyboard interrupt through [`Stdin`].
//! Everything else belongs to the foreground [`Terminal`].
//!
//! Rendering redraws the whole screen from the output buffer followed by
//! the open input line. Scrolling is "wipe and restart": when the walk
//! reaches row 25 the output buffer and the screen are cleared, the
//! prompt is put back and drawing continues at row 0.

use core::fmt;
use spin::Mutex;

use crate::buffer::LineBuffer;
use crate::constants::terminal::{
    BACKSPACE, CLEAR_SIGIL, INPUT_CAPACITY, INPUT_SOFT_LIMIT, OUTPUT_CAPACITY,
};
use crate::constants::vga::{BUFFER_HEIGHT, BUFFER_WIDTH, DEFAULT_ATTR};
use crate::error::Error;
use crate::hal::Display;
use crate::sync::critical;
use crate::{log_debug, log_warn};

const LOG_ORIGIN: &str = "terminal";

pub type InputLine = LineBuffer<INPUT_CAPACITY>;
pub type OutputLine = LineBuffer<OUTPUT_CAPACITY>;

struct InputState {
    line: InputLine,
    open: bool,
    clear_requested: bool,
}

/// Input line shared between the keyboard interrupt and the foreground.
///
/// All access goes through [`critical`], so each interrupt-side append of
/// a single character is atomic with respect to the multi-step foreground
/// operations (backspace resolution, snapshot, line take).
pub struct Stdin {
    state: Mutex<InputState>,
}

impl Stdin {
    pub const fn new() -> Self {
        Stdin {
            state: Mutex::new(InputState {
                line: LineBuffer::new(),
                open: false,
                clear_requested: false,
            }),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut InputState) -> R) -> R {
        critical(|| f(&mut self.state.lock()))
    }

    pub fn is_open(&self) -> bool {
        self.with(|s| s.open)
    }

    /// Feeds one decoded keystroke into the open line.
    ///
    /// The clear sigil is never stored; it raises a clear request served
    /// by the next render. Once the line holds `INPUT_SOFT_LIMIT` bytes
    /// only backspace and newline still get in.
    pub fn accept_char(&self, c: u8) -> Result<(), Error> {
        self.with(|s| {
            if !s.open {
                return Err(Error::InputClosed);
            }
            if c == CLEAR_SIGIL {
                s.clear_requested = true;
                return Ok(());
            }
            if s.line.len() >= INPUT_SOFT_LIMIT && c != BACKSPACE && c != b'\n' {
                return Err(Error::CapacityExceeded);
            }
            s.line.push(c)
        })
    }

    fn set_open(&self, open: bool) {
        self.with(|s| s.open = open);
    }

    fn take_clear_request(&self) -> bool {
        self.with(|s| core::mem::replace(&mut s.clear_requested, false))
    }

    /// Resolves pending backspaces in place and returns a copy of the line.
    fn snapshot(&self) -> InputLine {
        self.with(|s| {
            s.line.resolve_backspaces();
            s.line.clone()
        })
    }

    /// If the line ends in a newline: closes the edit, empties the shared
    /// line and hands back its resolved contents, newline included.
    fn finish_line(&self) -> Option<InputLine> {
        self.with(|s| {
            if s.line.last() != Some(b'\n') {
                return None;
            }
            s.open = false;
            s.line.resolve_backspaces();
            let line = s.line.clone();
            s.line.clear();
            Some(line)
        })
    }
}

impl Default for Stdin {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the next input character will be drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    pub is_input: bool,
}

/// Text sink handed to programs.
pub trait Console: fmt::Write {
    /// Wipes the screen and the output buffer, then reprints the prompt.
    fn clear(&mut self);
}

pub struct Terminal<'a, D: Display> {
    display: D,
    stdin: &'a Stdin,
    output: OutputLine,
    cursor: Cursor,
    prompt: &'static str,
}

impl<'a, D: Display> Terminal<'a, D> {
    pub fn new(mut display: D, stdin: &'a Stdin, prompt: &'static str) -> Self {
        display.clear();
        Terminal {
            display,
            stdin,
            output: LineBuffer::new(),
            cursor: Cursor::default(),
            prompt,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn output(&self) -> &str {
        self.output.as_str()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn prompt(&self) -> &'static str {
        self.prompt
    }

    /// Idle -> Editing. Keystrokes reach the input line from now on.
    pub fn open(&mut self) {
        self.cursor.is_input = true;
        self.stdin.set_open(true);
    }

    /// Editing -> Idle.
    pub fn close(&mut self) {
        self.cursor.is_input = false;
        self.stdin.set_open(false);
    }

    pub fn is_open(&self) -> bool {
        self.cursor.is_input
    }

    /// Appends `s` to the output buffer, rendering after every newline and
    /// once at the end.
    ///
    /// When the buffer is full the screen is rendered (which may wipe it)
    /// and the byte retried once; if there is still no room the rest of
    /// `s` is dropped and `CapacityExceeded` returned.
    pub fn print(&mut self, s: &str) -> Result<(), Error> {
        for byte in s.bytes() {
            if self.output.push(byte).is_err() {
                self.render();
                self.output.push(byte)?;
            }
            if byte == b'\n' {
                self.render();
            }
        }
        self.render();
        Ok(())
    }

    pub fn clear(&mut self) {
        log_debug!(LOG_ORIGIN, "screen cleared");
        self.display.clear();
        self.output.clear();
        // the prompt always fits in an empty buffer
        let _ = self.output.push_str(self.prompt);
    }

    /// Redraws the screen from the output buffer plus, while editing, the
    /// input line, and reprograms the hardware cursor.
    pub fn render(&mut self) {
        if self.stdin.take_clear_request() {
            self.clear();
        }

        self.output.resolve_backspaces();
        let input = if self.cursor.is_input {
            self.stdin.snapshot()
        } else {
            LineBuffer::new()
        };

        // the walk may wipe `self.output`, so draw from a copy
        let mut working: LineBuffer<{ OUTPUT_CAPACITY + INPUT_CAPACITY }> = LineBuffer::new();
        let _ = working.push_str(self.output.as_str());
        let _ = working.push_str(input.as_str());

        let (mut x, mut y) = (0, 0);
        for &byte in working.as_bytes() {
            if byte == b'\n' {
                x = 0;
                y += 1;
            } else {
                self.display.put(x, y, byte, DEFAULT_ATTR);
                x += 1;
                if x == BUFFER_WIDTH {
                    x = 0;
                    y += 1;
                }
            }

            if y == BUFFER_HEIGHT {
                log_debug!(LOG_ORIGIN, "screen full, wiping");
                self.clear();
                y = 0;
            }
        }

        // blank everything past the end of the text
        let (mut bx, mut by) = (x, y);
        while by < BUFFER_HEIGHT {
            self.display.put(bx, by, 0, DEFAULT_ATTR);
            bx += 1;
            if bx == BUFFER_WIDTH {
                bx = 0;
                by += 1;
            }
        }

        if self.cursor.is_input {
            self.cursor.x = x;
            self.cursor.y = y;
            self.display.set_cursor(x, y);
        }
    }

    /// Opens a line edit and busy-renders until the typed line ends in a
    /// newline, calling `poll` between renders. Returns the line without
    /// its newline; the line itself (with newline) is echoed into the
    /// output buffer.
    pub fn read_line(&mut self, mut poll: impl FnMut()) -> InputLine {
        self.open();
        let line = loop {
            self.render();
            if let Some(line) = self.stdin.finish_line() {
                break line;
            }
            poll();
        };
        self.close();

        if self.output.push_str(line.as_str()).is_err() {
            self.render();
            if self.output.push_str(line.as_str()).is_err() {
                log_warn!(LOG_ORIGIN, "echo dropped, output buffer full");
            }
        }
        self.render();

        let mut trimmed = LineBuffer::new();
        for &byte in line.as_bytes().iter().take_while(|&&b| b != b'\n') {
            // same capacity as `line`, cannot overflow
            let _ = trimmed.push(byte);
        }
        trimmed
    }
}

impl<D: Display> fmt::Write for Terminal<'_, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s).map_err(|_| fmt::Error)
    }
}

impl<D: Display> Console for Terminal<'_, D> {
    fn clear(&mut self) {
        Terminal::clear(self);
        self.render();
    }
}
