//! Primitive edits against the line store.
//!
//! Every variant adjusts the touched line and the document counter by the
//! same amount in `execute` and `undo`, so a pair always nets to zero.

use crate::document::DocumentData;
use crate::history::UndoRedoCommand;
use crate::line::{CharCount, TextLine};
use crate::position::TextPos;
use tracing::trace;

#[derive(Debug)]
pub(crate) enum LowLevelCommand {
    InsertSingleText {
        pos: TextPos,
        value: String,
    },
    RemoveSingleText {
        pos: TextPos,
        count: CharCount,
        /// Text cut by the last `execute`, reinserted by `undo`.
        removed: Option<String>,
    },
    InsertLines {
        line_index: usize,
        count: usize,
        /// Lines waiting to be inserted; empty while they live in the store.
        pending: Vec<TextLine>,
    },
    RemoveLines {
        line_index: usize,
        count: usize,
        /// Lines taken out by the last `execute`.
        removed: Vec<TextLine>,
    },
}

impl LowLevelCommand {
    pub(crate) fn insert_single_text(pos: TextPos, value: impl Into<String>) -> Self {
        Self::InsertSingleText {
            pos,
            value: value.into(),
        }
    }

    pub(crate) fn remove_single_text(pos: TextPos, count: CharCount) -> Self {
        Self::RemoveSingleText {
            pos,
            count,
            removed: None,
        }
    }

    pub(crate) fn insert_lines(line_index: usize, lines: Vec<TextLine>) -> Self {
        Self::InsertLines {
            line_index,
            count: lines.len(),
            pending: lines,
        }
    }

    pub(crate) fn remove_lines(line_index: usize, count: usize) -> Self {
        Self::RemoveLines {
            line_index,
            count,
            removed: Vec::new(),
        }
    }
}

impl UndoRedoCommand for LowLevelCommand {
    type Target = DocumentData;

    fn execute(&mut self, data: &mut DocumentData) {
        match self {
            Self::InsertSingleText { pos, value } => {
                let line = &mut data.lines[pos.line_index];
                line.insert(pos.char_index, value);
                line.increment_modify_count();
                trace!(%pos, len = value.len(), "insert single text");
            }
            Self::RemoveSingleText {
                pos,
                count,
                removed,
            } => {
                let line = &mut data.lines[pos.line_index];
                let text = line.cut(pos.char_index, *count);
                line.increment_modify_count();
                trace!(%pos, len = text.len(), "remove single text");
                *removed = Some(text);
            }
            Self::InsertLines {
                line_index,
                count,
                pending,
            } => {
                debug_assert_eq!(pending.len(), *count, "insert lines executed twice");
                for line in pending.iter_mut() {
                    line.increment_modify_count();
                }
                data.lines.insert_range(*line_index, pending.drain(..));
                trace!(line_index = *line_index, count = *count, "insert lines");
            }
            Self::RemoveLines {
                line_index,
                count,
                removed,
            } => {
                *removed = data.lines.remove_range(*line_index, *count);
                trace!(line_index = *line_index, count = *count, "remove lines");
            }
        }
        data.modify_count += 1;
    }

    fn undo(&mut self, data: &mut DocumentData) {
        match self {
            Self::InsertSingleText { pos, value } => {
                let line = &mut data.lines[pos.line_index];
                line.remove(pos.char_index, CharCount::Count(value.chars().count()));
                line.decrement_modify_count();
            }
            Self::RemoveSingleText { pos, removed, .. } => {
                let Some(text) = removed.take() else {
                    unreachable!("remove single text undone before execute");
                };
                let line = &mut data.lines[pos.line_index];
                line.insert(pos.char_index, &text);
                line.decrement_modify_count();
            }
            Self::InsertLines {
                line_index,
                count,
                pending,
            } => {
                let mut lines = data.lines.remove_range(*line_index, *count);
                for line in lines.iter_mut() {
                    line.decrement_modify_count();
                }
                *pending = lines;
            }
            Self::RemoveLines {
                line_index,
                removed,
                ..
            } => {
                data.lines.insert_range(*line_index, removed.drain(..));
            }
        }
        data.modify_count -= 1;
    }
}
