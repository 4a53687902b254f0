//! Plain-text to line conversion helpers.
//!
//! Recognizes `\r`, `\n` and `\r\n` terminators, including mixtures of them
//! within the same text. A trailing terminator yields a trailing empty line,
//! so a split always produces at least one line.

use serde::Serialize;

/// Line terminator flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NewlineKind {
    Lf,
    Cr,
    CrLf,
}

impl NewlineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Cr => "\r",
            Self::CrLf => "\r\n",
        }
    }
}

/// Result of splitting text into lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineSplit {
    /// Line contents without terminators; never empty.
    pub lines: Vec<String>,
    /// Distinct terminators seen, in order of first occurrence.
    pub newlines: Vec<NewlineKind>,
}

impl LineSplit {
    /// `true` when more than one terminator flavour was seen.
    pub fn has_mixed_newlines(&self) -> bool {
        self.newlines.len() > 1
    }
}

/// Returns `true` when `text` has no line terminator.
pub fn is_single_line(text: &str) -> bool {
    !text.contains(['\r', '\n'])
}

/// Split `text` into lines, recording which terminators appeared.
pub fn split_lines_detailed(text: &str) -> LineSplit {
    let mut split = LineSplit::default();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        let newline = match ch {
            '\n' => Some(NewlineKind::Lf),
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                Some(NewlineKind::CrLf)
            }
            '\r' => Some(NewlineKind::Cr),
            _ => None,
        };
        match newline {
            Some(kind) => {
                if !split.newlines.contains(&kind) {
                    split.newlines.push(kind);
                }
                split.lines.push(std::mem::take(&mut current));
            }
            None => current.push(ch),
        }
    }
    split.lines.push(current);
    split
}

/// Split `text` into lines, discarding terminator information.
pub fn split_lines(text: &str) -> Vec<String> {
    split_lines_detailed(text).lines
}

/// Join lines with a single terminator flavour.
pub fn join_lines<S: AsRef<str>>(lines: &[S], newline: NewlineKind) -> String {
    let mut out = String::new();
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            out.push_str(newline.as_str());
        }
        out.push_str(line.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_every_terminator_flavour() {
        let split = split_lines_detailed("a\rb\nc\r\nd");
        assert_eq!(split.lines, vec!["a", "b", "c", "d"]);
        assert_eq!(
            split.newlines,
            vec![NewlineKind::Cr, NewlineKind::Lf, NewlineKind::CrLf]
        );
        assert!(split.has_mixed_newlines());
    }

    #[test]
    fn trailing_terminator_yields_empty_last_line() {
        assert_eq!(split_lines("x\n"), vec!["x", ""]);
        assert_eq!(split_lines("\r\n"), vec!["", ""]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn cr_followed_by_cr_lf_is_two_breaks() {
        let split = split_lines_detailed("a\r\r\nb");
        assert_eq!(split.lines, vec!["a", "", "b"]);
        assert_eq!(split.newlines, vec![NewlineKind::Cr, NewlineKind::CrLf]);
    }

    #[test]
    fn join_reverses_uniform_split() {
        let lines = split_lines("one\ntwo\n");
        assert_eq!(join_lines(&lines, NewlineKind::Lf), "one\ntwo\n");
        assert_eq!(join_lines(&lines, NewlineKind::CrLf), "one\r\ntwo\r\n");
        assert!(is_single_line("no breaks"));
        assert!(!is_single_line("a\rb"));
    }
}
