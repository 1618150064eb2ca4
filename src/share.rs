//! Shared memory arena: named, permanent blocks carved by a bump pointer.
//!
//! Blocks live for the whole run of the kernel. Nothing is ever freed,
//! resized or aligned; the bump offset only moves forward.

use crate::constants::share::{ARENA_SIZE, BLOCK_MAX, ENTRY_MAX, NAME_MAX};
use crate::error::Error;
use crate::{log_debug, log_warn};

const LOG_ORIGIN: &str = "share";

/// Location of a reserved block inside the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareBlock {
    pub offset: usize,
    pub size: usize,
}

#[derive(Clone, Copy)]
struct ShareEntry {
    name: [u8; NAME_MAX],
    name_len: usize,
    block: ShareBlock,
}

impl ShareEntry {
    fn name(&self) -> &[u8] {
        &self.name[..self.name_len]
    }
}

pub struct ShareArena {
    memory: [u8; ARENA_SIZE],
    next: usize,
    entries: [Option<ShareEntry>; ENTRY_MAX],
    count: usize,
}

impl ShareArena {
    pub const fn new() -> Self {
        ShareArena {
            memory: [0; ARENA_SIZE],
            next: 0,
            entries: [None; ENTRY_MAX],
            count: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        ARENA_SIZE - self.next
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Carves `size` bytes under `name`. On failure nothing changes.
    ///
    /// Names are not checked for uniqueness; [`lookup`](Self::lookup)
    /// returns the first block reserved under a name.
    pub fn reserve(&mut self, name: &str, size: usize) -> Result<ShareBlock, Error> {
        if name.is_empty() || name.len() > NAME_MAX {
            return Err(Error::InvalidName);
        }
        if size == 0 {
            return Err(Error::EmptyInput);
        }
        if self.count == ENTRY_MAX {
            log_warn!(LOG_ORIGIN, "table full, cannot reserve '{}'", name);
            return Err(Error::ShareTableFull);
        }
        if size > BLOCK_MAX || size > self.remaining() {
            log_warn!(
                LOG_ORIGIN,
                "'{}' wants {} bytes, {} left",
                name,
                size,
                self.remaining()
            );
            return Err(Error::OutOfMemory);
        }

        let block = ShareBlock {
            offset: self.next,
            size,
        };
        let mut entry = ShareEntry {
            name: [0; NAME_MAX],
            name_len: name.len(),
            block,
        };
        entry.name[..name.len()].copy_from_slice(name.as_bytes());
        self.entries[self.count] = Some(entry);
        self.count += 1;
        self.next += size;

        log_debug!(LOG_ORIGIN, "reserved '{}' at {} ({} bytes)", name, block.offset, size);
        Ok(block)
    }

    pub fn lookup(&self, name: &str) -> Option<ShareBlock> {
        self.entries[..self.count]
            .iter()
            .flatten()
            .find(|entry| entry.name() == name.as_bytes())
            .map(|entry| entry.block)
    }

    pub fn bytes(&self, block: ShareBlock) -> &[u8] {
        &self.memory[block.offset..block.offset + block.size]
    }

    pub fn bytes_mut(&mut self, block: ShareBlock) -> &mut [u8] {
        &mut self.memory[block.offset..block.offset + block.size]
    }
}

impl Default for ShareArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_then_lookup() {
        let mut arena = ShareArena::new();
        let block = arena.reserve("x", 10).unwrap();
        assert_eq!(arena.lookup("x"), Some(block));
        assert_eq!(block.size, 10);
        assert_eq!(arena.lookup("y"), None);
    }

    #[test]
    fn blocks_are_carved_back_to_back() {
        let mut arena = ShareArena::new();
        let a = arena.reserve("a", 3).unwrap();
        let b = arena.reserve("b", 5).unwrap();
        assert_eq!(a.offset, 0);
        assert_eq!(b.offset, 3);
        assert_eq!(arena.remaining(), ARENA_SIZE - 8);
    }

    #[test]
    fn seventeenth_entry_fails() {
        let mut arena = ShareArena::new();
        for i in 0..ENTRY_MAX {
            arena.reserve(&format!("e{i}"), 1).unwrap();
        }
        assert_eq!(arena.reserve("one-more", 1), Err(Error::ShareTableFull));
        assert_eq!(arena.len(), ENTRY_MAX);
    }

    #[test]
    fn oversized_reservation_leaves_state_unchanged() {
        let mut arena = ShareArena::new();
        arena.reserve("big", BLOCK_MAX).unwrap();
        arena.reserve("big2", BLOCK_MAX).unwrap();
        let remaining = arena.remaining();
        assert_eq!(remaining, 1);

        assert_eq!(arena.reserve("toobig", 2), Err(Error::OutOfMemory));
        assert_eq!(arena.remaining(), remaining);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.lookup("toobig"), None);

        // exactly the remaining space still fits
        assert!(arena.reserve("last", 1).is_ok());
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn block_size_is_capped() {
        let mut arena = ShareArena::new();
        assert_eq!(arena.reserve("huge", BLOCK_MAX + 1), Err(Error::OutOfMemory));
    }

    #[test]
    fn names_are_validated() {
        let mut arena = ShareArena::new();
        assert_eq!(arena.reserve("", 1), Err(Error::InvalidName));
        let long = "n".repeat(NAME_MAX + 1);
        assert_eq!(arena.reserve(&long, 1), Err(Error::InvalidName));
        assert!(arena.reserve(&"n".repeat(NAME_MAX), 1).is_ok());
    }

    #[test]
    fn zero_sized_request_is_rejected() {
        let mut arena = ShareArena::new();
        assert_eq!(arena.reserve("z", 0), Err(Error::EmptyInput));
        assert!(arena.is_empty());
    }

    #[test]
    fn block_contents_persist() {
        let mut arena = ShareArena::new();
        let block = arena.reserve("temp", 4).unwrap();
        arena.bytes_mut(block).copy_from_slice(b"abcd");
        let found = arena.lookup("temp").unwrap();
        assert_eq!(arena.bytes(found), b"abcd");
    }
}
