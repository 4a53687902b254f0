//! Edit operations accepted on the command line.
//!
//! Each operation is `name[:field...]`. Coordinates are zero-based
//! `line:char` pairs; text fields come last, may contain `:`, and accept
//! the escapes `\n`, `\r`, `\t` and `\\`.

use gapdoc::{TextDocument, TextPos, TextRange};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpParseError {
    #[error("Unknown operation '{0}'")]
    UnknownOp(String),

    #[error("Operation '{op}' expects {expected}")]
    Arity { op: String, expected: &'static str },

    #[error("Invalid coordinate '{0}'")]
    InvalidNumber(String),

    #[error("Unknown escape '\\{0}'")]
    InvalidEscape(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Insert { pos: TextPos, text: String },
    Replace { range: TextRange, text: String },
    Remove(TextRange),
    Delete(TextPos),
    Backspace(TextPos),
    Indent(TextRange),
    Unindent(TextRange),
    Undo,
    Redo,
    Save,
}

impl Op {
    /// Apply the operation to `doc`.
    ///
    /// # Returns
    /// `Ok(false)` when the operation changed nothing.
    pub fn apply(&self, doc: &mut TextDocument) -> gapdoc::Result<bool> {
        match self {
            Self::Insert { pos, text } => doc.insert_text(*pos, text),
            Self::Replace { range, text } => doc.insert_text_in_range(*range, text),
            Self::Remove(range) => doc.remove_text(*range),
            Self::Delete(pos) => doc.remove_char(*pos),
            Self::Backspace(pos) => doc.remove_back(*pos),
            Self::Indent(range) => doc.indent(*range),
            Self::Unindent(range) => doc.unindent(*range),
            Self::Undo => Ok(doc.undo()),
            Self::Redo => Ok(doc.redo()),
            Self::Save => {
                doc.clear_modify_count();
                Ok(true)
            }
        }
    }
}

fn parse_index(value: &str) -> Result<usize, OpParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| OpParseError::InvalidNumber(value.to_string()))
}

fn parse_pos(fields: &[&str]) -> Result<TextPos, OpParseError> {
    Ok(TextPos::new(parse_index(fields[0])?, parse_index(fields[1])?))
}

fn parse_range(fields: &[&str]) -> Result<TextRange, OpParseError> {
    Ok(TextRange::new(parse_pos(&fields[..2])?, parse_pos(&fields[2..4])?))
}

fn unescape(text: &str) -> Result<String, OpParseError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => return Err(OpParseError::InvalidEscape(other)),
            None => return Err(OpParseError::InvalidEscape(' ')),
        }
    }
    Ok(out)
}

impl FromStr for Op {
    type Err = OpParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (name, rest) = value.split_once(':').unwrap_or((value, ""));
        let (field_count, expected) = match name {
            "undo" | "redo" | "save" => (0, "no fields"),
            "delete" | "backspace" => (2, "LINE:CHAR"),
            "insert" => (3, "LINE:CHAR:TEXT"),
            "remove" | "indent" | "unindent" => (4, "LINE:CHAR:LINE:CHAR"),
            "replace" => (5, "LINE:CHAR:LINE:CHAR:TEXT"),
            _ => return Err(OpParseError::UnknownOp(name.to_string())),
        };
        let fields: Vec<&str> = if value.contains(':') {
            rest.splitn(field_count.max(1), ':').collect()
        } else {
            Vec::new()
        };
        if fields.len() != field_count {
            return Err(OpParseError::Arity {
                op: name.to_string(),
                expected,
            });
        }

        Ok(match name {
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "save" => Self::Save,
            "delete" => Self::Delete(parse_pos(&fields)?),
            "backspace" => Self::Backspace(parse_pos(&fields)?),
            "insert" => Self::Insert {
                pos: parse_pos(&fields)?,
                text: unescape(fields[2])?,
            },
            "remove" => Self::Remove(parse_range(&fields)?),
            "indent" => Self::Indent(parse_range(&fields)?),
            "unindent" => Self::Unindent(parse_range(&fields)?),
            _ => Self::Replace {
                range: parse_range(&fields)?,
                text: unescape(fields[4])?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_operation() {
        assert_eq!("undo".parse::<Op>(), Ok(Op::Undo));
        assert_eq!("save".parse::<Op>(), Ok(Op::Save));
        assert_eq!(
            "insert:1:2:a:b\\n".parse::<Op>(),
            Ok(Op::Insert {
                pos: TextPos::new(1, 2),
                text: "a:b\n".to_string(),
            })
        );
        assert_eq!(
            "remove:2:0:0:3".parse::<Op>(),
            Ok(Op::Remove(TextRange::from_coords(2, 0, 0, 3)))
        );
        assert_eq!(
            "backspace:0:1".parse::<Op>(),
            Ok(Op::Backspace(TextPos::new(0, 1)))
        );
        assert_eq!(
            "replace:0:0:0:5:\\tx".parse::<Op>(),
            Ok(Op::Replace {
                range: TextRange::from_coords(0, 0, 0, 5),
                text: "\tx".to_string(),
            })
        );
    }

    #[test]
    fn insert_accepts_empty_text() {
        assert_eq!(
            "insert:0:0:".parse::<Op>(),
            Ok(Op::Insert {
                pos: TextPos::TOP,
                text: String::new(),
            })
        );
    }

    #[test]
    fn rejects_malformed_operations() {
        assert_eq!(
            "paste:0:0".parse::<Op>(),
            Err(OpParseError::UnknownOp("paste".to_string()))
        );
        assert!(matches!(
            "remove:0:0:1".parse::<Op>(),
            Err(OpParseError::Arity { .. })
        ));
        assert!(matches!("insert".parse::<Op>(), Err(OpParseError::Arity { .. })));
        assert_eq!(
            "delete:x:0".parse::<Op>(),
            Err(OpParseError::InvalidNumber("x".to_string()))
        );
        assert_eq!(
            "insert:0:0:\\q".parse::<Op>(),
            Err(OpParseError::InvalidEscape('q'))
        );
    }

    #[test]
    fn apply_reports_no_op_edits() {
        let mut doc = TextDocument::new();
        assert!(!Op::Undo.apply(&mut doc).expect("undo"));
        let insert: Op = "insert:0:0:hi".parse().expect("parse");
        assert!(insert.apply(&mut doc).expect("insert"));
        assert_eq!(doc.text(), "hi");
        assert!(Op::Save.apply(&mut doc).expect("save"));
        assert!(!doc.is_modified());
    }
}
