//! Host-side doubles for the hardware seams, plus scan code helpers.

use core::fmt;

use crate::config::Config;
use crate::constants::vga::{BUFFER_HEIGHT, BUFFER_WIDTH};
use crate::hal::{Display, Machine};
use crate::share::ShareArena;
use crate::shell::{self, Context, Registry};
use crate::terminal::Console;

/// Records every cell write, screen clear and cursor move.
pub struct MockDisplay {
    cells: [[u8; BUFFER_WIDTH]; BUFFER_HEIGHT],
    cursor: Option<(usize, usize)>,
    clears: usize,
}

impl MockDisplay {
    pub fn new() -> Self {
        MockDisplay {
            cells: [[0; BUFFER_WIDTH]; BUFFER_HEIGHT],
            cursor: None,
            clears: 0,
        }
    }

    /// Text of one row up to its first empty cell.
    pub fn row_text(&self, row: usize) -> String {
        self.cells[row]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect()
    }

    pub fn cursor(&self) -> Option<(usize, usize)> {
        self.cursor
    }

    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Display for MockDisplay {
    fn put(&mut self, col: usize, row: usize, byte: u8, _attr: u8) {
        assert!(col < BUFFER_WIDTH && row < BUFFER_HEIGHT, "cell ({col}, {row}) off screen");
        self.cells[row][col] = byte;
    }

    fn clear(&mut self) {
        self.cells = [[0; BUFFER_WIDTH]; BUFFER_HEIGHT];
        self.clears += 1;
    }

    fn set_cursor(&mut self, col: usize, row: usize) {
        assert!(col < BUFFER_WIDTH && row < BUFFER_HEIGHT);
        self.cursor = Some((col, row));
    }
}

#[derive(Default)]
pub struct MockMachine {
    pub shutdowns: usize,
    pub reboots: usize,
}

impl Machine for MockMachine {
    fn shutdown(&mut self) {
        self.shutdowns += 1;
    }

    fn reboot(&mut self) {
        self.reboots += 1;
    }
}

/// Console that keeps everything printed to it.
#[derive(Default)]
pub struct Transcript {
    pub text: String,
    pub clears: usize,
}

impl fmt::Write for Transcript {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.text.push_str(s);
        Ok(())
    }
}

impl Console for Transcript {
    fn clear(&mut self) {
        self.text.clear();
        self.clears += 1;
    }
}

pub fn press(code: u8) -> u8 {
    code
}

pub fn release(code: u8) -> u8 {
    code + 0x80
}

/// Set-1 make code for the key that types `c` without shift.
pub fn scancode(c: char) -> u8 {
    const ROWS: [(&str, u8); 4] = [
        ("1234567890", 0x02),
        ("qwertyuiop", 0x10),
        ("asdfghjkl", 0x1E),
        ("zxcvbnm", 0x2C),
    ];
    match c {
        ' ' => 0x39,
        '\n' => 0x1C,
        '\x08' => 0x0E,
        '`' => 0x29,
        '/' => 0x35,
        _ => ROWS
            .iter()
            .find_map(|(keys, base)| keys.find(c).map(|i| base + i as u8))
            .unwrap_or_else(|| panic!("no key for {c:?}")),
    }
}

/// Press/release pairs typing `text`.
pub fn type_text(text: &str) -> Vec<u8> {
    text.chars()
        .flat_map(|c| {
            let code = scancode(c);
            [press(code), release(code)]
        })
        .collect()
}

/// Everything a program can reach, with a transcript console.
pub struct Session {
    pub console: Transcript,
    pub programs: Registry,
    pub share: ShareArena,
    pub config: Config,
    pub machine: MockMachine,
}

impl Session {
    pub fn new() -> Self {
        Session {
            console: Transcript::default(),
            programs: Registry::new(),
            share: ShareArena::new(),
            config: Config::new(),
            machine: MockMachine::default(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut session = Self::new();
        crate::programs::install(&mut session.programs).unwrap();
        session
    }

    pub fn dispatch(&mut self, line: &str) -> Option<i32> {
        let mut ctx = Context {
            console: &mut self.console,
            programs: &self.programs,
            share: &mut self.share,
            config: &mut self.config,
            machine: &mut self.machine,
        };
        shell::dispatch(&mut ctx, line)
    }

    /// Dispatches `line` and returns what it printed.
    pub fn run(&mut self, line: &str) -> (Option<i32>, String) {
        self.console.text.clear();
        let result = self.dispatch(line);
        (result, core::mem::take(&mut self.console.text))
    }
}
