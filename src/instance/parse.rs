//! Reading the exchange format.
//!
//! Tokens are whitespace separated, like the solvers read them. The count prefix must match the
//! number of terminals that follow exactly; anything else is a malformed fixture.

use std::fs;
use std::path::Path;

use super::{ProblemInstance, Terminal};
use crate::errors::{HarnessError, InstanceError};

/// Whitespace-separated tokens with their byte offsets.
struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let start = self.pos + (rest.len() - rest.trim_start().len());
        if start >= self.text.len() {
            self.pos = self.text.len();
            return None;
        }
        let tail = &self.text[start..];
        let len = tail.find(char::is_whitespace).unwrap_or(tail.len());
        self.pos = start + len;
        Some((start, &tail[..len]))
    }
}

/// Parse an instance from its textual form. `name` labels diagnostics.
pub fn parse(name: &str, text: &str) -> Result<ProblemInstance, InstanceError> {
    let mut tokens = Tokens::new(text);
    let end = text.len();

    let Some((offset, raw)) = tokens.next() else {
        return Err(InstanceError::malformed(name, text, 0, 0, "missing terminal count"));
    };
    let count: usize = raw.parse().map_err(|_| {
        InstanceError::malformed(
            name,
            text,
            offset,
            raw.len(),
            format!("terminal count `{raw}` is not a non-negative integer"),
        )
    })?;
    if count == 0 {
        return Err(InstanceError::malformed(
            name,
            text,
            offset,
            raw.len(),
            "terminal count must be at least 1",
        ));
    }

    // a corrupt count must not trigger a huge allocation
    let mut terminals = Vec::with_capacity(count.min(1024));
    for index in 0..count {
        let mut coords = [0u32; 3];
        for coord in &mut coords {
            let Some((offset, raw)) = tokens.next() else {
                return Err(InstanceError::malformed(
                    name,
                    text,
                    end,
                    0,
                    format!("count says {count} terminals but only {index} complete ones follow"),
                ));
            };
            *coord = raw.parse().map_err(|_| {
                InstanceError::malformed(
                    name,
                    text,
                    offset,
                    raw.len(),
                    format!("coordinate `{raw}` of terminal {} is not a non-negative integer", index + 1),
                )
            })?;
        }
        terminals.push(Terminal::new(coords[0], coords[1], coords[2]));
    }

    if let Some((offset, raw)) = tokens.next() {
        return Err(InstanceError::malformed(
            name,
            text,
            offset,
            raw.len(),
            format!("unexpected data after {count} terminals"),
        ));
    }

    ProblemInstance::new(terminals)
}

/// Read and validate a fixture file.
pub fn read_fixture(path: &Path) -> Result<ProblemInstance, HarnessError> {
    let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    Ok(parse(&path.display().to_string(), &text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(err: InstanceError) -> (String, usize) {
        match err {
            InstanceError::Malformed { message, span, .. } => (message, span.offset()),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_given_fixture() {
        let inst = parse("i01", "3\n0 0 0\n5 5 5\n9 0 9\n").unwrap();
        assert_eq!(inst.len(), 3);
        assert_eq!(inst.terminals()[2], Terminal::new(9, 0, 9));
    }

    #[test]
    fn test_parse_tolerates_crlf_and_missing_final_newline() {
        let inst = parse("w", "2\r\n1 2 3\r\n4 5 6").unwrap();
        assert_eq!(inst.terminals(), &[Terminal::new(1, 2, 3), Terminal::new(4, 5, 6)]);
    }

    #[test]
    fn test_parse_empty_text() {
        let (msg, _) = message_of(parse("e", "   \n").unwrap_err());
        assert_eq!(msg, "missing terminal count");
    }

    #[test]
    fn test_parse_zero_count() {
        let (msg, offset) = message_of(parse("z", "0\n").unwrap_err());
        assert_eq!(msg, "terminal count must be at least 1");
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_parse_count_larger_than_body() {
        let (msg, _) = message_of(parse("short", "3\n0 0 0\n1 1 1\n").unwrap_err());
        assert_eq!(msg, "count says 3 terminals but only 2 complete ones follow");
    }

    #[test]
    fn test_parse_count_smaller_than_body() {
        let text = "1\n0 0 0\n7 7 7\n";
        let (msg, offset) = message_of(parse("long", text).unwrap_err());
        assert_eq!(msg, "unexpected data after 1 terminals");
        assert_eq!(offset, text.find('7').unwrap());
    }

    #[test]
    fn test_parse_negative_coordinate_points_at_token() {
        let text = "1\n4 -2 0\n";
        let (msg, offset) = message_of(parse("neg", text).unwrap_err());
        assert!(msg.contains("`-2`"), "{msg}");
        assert_eq!(offset, 4);
    }

    #[test]
    fn test_parse_huge_count_fails_cleanly() {
        let (msg, _) = message_of(parse("huge", "99999999999\n1 2 3\n").unwrap_err());
        assert!(msg.starts_with("count says 99999999999"), "{msg}");
    }

    #[test]
    fn test_tokens_offsets() {
        let toks: Vec<_> = Tokens::new("  ab\tc \n d").collect();
        assert_eq!(toks, vec![(2, "ab"), (5, "c"), (9, "d")]);
    }
}
