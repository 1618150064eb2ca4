//! Substring search: a naive scan and Boyer-Moore (bad-character rule),
//! selected by [`SearchMode`]. Both report the leftmost match.

use core::fmt;

/// Printable ASCII, `' '..='~'`.
pub const ALPHABET_LEN: usize = 95;
const ALPHABET_FIRST: u8 = b' ';
const ALPHABET_LAST: u8 = b'~';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Naive,
    BoyerMoore,
}

impl SearchMode {
    pub fn find(self, haystack: &[u8], needle: &[u8]) -> Option<usize> {
        match self {
            SearchMode::Naive => naive(haystack, needle),
            SearchMode::BoyerMoore => boyer_moore(haystack, needle),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "std" | "naive" => Some(SearchMode::Naive),
            "bm" | "boyer-moore" => Some(SearchMode::BoyerMoore),
            _ => None,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Naive => f.write_str("Standard"),
            SearchMode::BoyerMoore => f.write_str("Boyer-Moore"),
        }
    }
}

/// Compares every window left to right. An empty needle never matches.
pub fn naive(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Bad-character shift distances over the printable alphabet.
///
/// For a printable `c`, the shift is the distance from the needle's last
/// position back to the last `c` strictly before it, or the needle length
/// if there is none. Bytes outside the alphabet take `fallback`: the needle
/// length when the needle is all printable (such a byte can never match),
/// otherwise 1.
pub struct ShiftTable {
    shifts: [usize; ALPHABET_LEN],
    fallback: usize,
}

impl ShiftTable {
    pub fn build(needle: &[u8]) -> Self {
        let len = needle.len();
        let mut shifts = [len; ALPHABET_LEN];
        let mut fallback = len;
        if let Some((_, body)) = needle.split_last() {
            // later occurrences overwrite earlier ones
            for (i, &c) in body.iter().enumerate() {
                match index(c) {
                    Some(idx) => shifts[idx] = len - 1 - i,
                    None => fallback = 1,
                }
            }
        }
        ShiftTable { shifts, fallback }
    }

    pub fn shift(&self, c: u8) -> usize {
        index(c).map_or(self.fallback, |idx| self.shifts[idx])
    }
}

fn index(c: u8) -> Option<usize> {
    (ALPHABET_FIRST..=ALPHABET_LAST)
        .contains(&c)
        .then(|| usize::from(c - ALPHABET_FIRST))
}

/// Anchors a window at increasing offsets and compares it right to left;
/// on a mismatch the window advances by the shift of the haystack byte
/// under the needle's last position.
pub fn boyer_moore(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    let len = needle.len();
    if len == 0 || len > haystack.len() {
        return None;
    }
    let table = ShiftTable::build(needle);

    let mut start = 0;
    while start + len <= haystack.len() {
        let window = &haystack[start..start + len];
        if window.iter().rev().zip(needle.iter().rev()).all(|(a, b)| a == b) {
            return Some(start);
        }
        start += table.shift(window[len - 1]);
    }
    None
}
