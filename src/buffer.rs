use core::str;

use crate::constants::terminal::BACKSPACE;
use crate::error::Error;

/// Fixed-capacity, append-only ASCII line.
///
/// An append that would overflow fails with `Error::CapacityExceeded`
/// and leaves the contents untouched.
#[derive(Clone)]
pub struct LineBuffer<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        LineBuffer {
            bytes: [0; N],
            len: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn last(&self) -> Option<u8> {
        self.as_bytes().last().copied()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn as_str(&self) -> &str {
        // push paths only admit ASCII
        str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn push(&mut self, byte: u8) -> Result<(), Error> {
        if !byte.is_ascii() {
            return Err(Error::NotAscii);
        }
        if self.len == N {
            return Err(Error::CapacityExceeded);
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Appends all of `s` or nothing.
    pub fn push_str(&mut self, s: &str) -> Result<(), Error> {
        if !s.is_ascii() {
            return Err(Error::NotAscii);
        }
        let end = self.len + s.len();
        if end > N {
            return Err(Error::CapacityExceeded);
        }
        self.bytes[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bytes[..self.len].fill(0);
        self.len = 0;
    }

    /// Removes every backspace marker together with the byte right before
    /// it. A marker at the very start removes only itself.
    pub fn resolve_backspaces(&mut self) {
        let mut kept: usize = 0;
        for i in 0..self.len {
            let byte = self.bytes[i];
            if byte == BACKSPACE {
                kept = kept.saturating_sub(1);
            } else {
                self.bytes[kept] = byte;
                kept += 1;
            }
        }
        self.bytes[kept..self.len].fill(0);
        self.len = kept;
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for LineBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}
