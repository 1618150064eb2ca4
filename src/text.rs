//! Line splitting.

/// Splits on a single delimiter. Empty tokens between adjacent delimiters
/// are kept; one trailing delimiter does not add a final empty token.
pub fn split_on(line: &str, delim: char) -> impl Iterator<Item = &str> {
    line.strip_suffix(delim).unwrap_or(line).split(delim)
}

/// Splits on any delimiter in `delims`, collapsing runs. Never yields an
/// empty token.
pub fn split_any<'a>(line: &'a str, delims: &'a [char]) -> impl Iterator<Item = &'a str> + 'a {
    line.split(move |c: char| delims.contains(&c))
        .filter(|token| !token.is_empty())
}
