//! A single document line and its modification bookkeeping.

use crate::constants::INDENT_CHAR;
use serde::Serialize;

/// How a line differs from the last saved baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum LineModifyStatus {
    /// Never touched since the document was loaded.
    #[default]
    None,
    /// Currently differs from the saved baseline.
    Modified,
    /// Was modified at some point, then saved or reverted to the saved baseline.
    ModifySaved,
}

/// Span length for [`TextLine`] edits, in chars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CharCount {
    Count(usize),
    ToEnd,
}

/// One line of text, without its terminator.
///
/// All indices are char indices (Unicode scalar values); byte offsets never
/// leave this type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextLine {
    text: String,
    char_len: usize,
    modify_count: i32,
    is_modify_cleared: bool,
}

impl TextLine {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        debug_assert!(
            !text.contains(['\r', '\n']),
            "line text must not contain newlines"
        );
        let char_len = text.chars().count();
        Self {
            text,
            char_len,
            modify_count: 0,
            is_modify_cleared: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.char_len
    }

    /// Index of the last char, `None` for an empty line.
    pub fn end_char_index(&self) -> Option<usize> {
        self.char_len.checked_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    pub fn starts_with_tab(&self) -> bool {
        self.text.starts_with(INDENT_CHAR)
    }

    pub fn modify_count(&self) -> i32 {
        self.modify_count
    }

    pub fn is_modify_cleared(&self) -> bool {
        self.is_modify_cleared
    }

    pub fn modify_status(&self) -> LineModifyStatus {
        if self.modify_count != 0 {
            LineModifyStatus::Modified
        } else if self.is_modify_cleared {
            LineModifyStatus::ModifySaved
        } else {
            LineModifyStatus::None
        }
    }

    /// Reset the counter to the saved baseline.
    ///
    /// The sticky cleared flag is set only when the line had pending changes.
    pub(crate) fn clear_modify_count(&mut self) {
        self.is_modify_cleared |= self.modify_count != 0;
        self.modify_count = 0;
    }

    pub(crate) fn increment_modify_count(&mut self) {
        self.modify_count += 1;
    }

    pub(crate) fn decrement_modify_count(&mut self) {
        self.modify_count -= 1;
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        assert!(
            char_index <= self.char_len,
            "char index {} out of bounds for line of length {}",
            char_index,
            self.char_len
        );
        if self.char_len == self.text.len() {
            return char_index;
        }
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len())
    }

    fn resolve_count(&self, char_index: usize, count: CharCount) -> usize {
        let count = match count {
            CharCount::Count(count) => count,
            CharCount::ToEnd => self.char_len.saturating_sub(char_index),
        };
        assert!(
            char_index + count <= self.char_len,
            "span {}+{} out of bounds for line of length {}",
            char_index,
            count,
            self.char_len
        );
        count
    }

    pub(crate) fn insert(&mut self, char_index: usize, value: &str) {
        debug_assert!(
            !value.contains(['\r', '\n']),
            "inserted line text must not contain newlines"
        );
        let offset = self.byte_offset(char_index);
        self.text.insert_str(offset, value);
        self.char_len += value.chars().count();
    }

    pub(crate) fn remove(&mut self, char_index: usize, count: CharCount) {
        let count = self.resolve_count(char_index, count);
        let start = self.byte_offset(char_index);
        let end = self.byte_offset(char_index + count);
        self.text.replace_range(start..end, "");
        self.char_len -= count;
    }

    pub(crate) fn sub(&self, char_index: usize, count: CharCount) -> String {
        let count = self.resolve_count(char_index, count);
        let start = self.byte_offset(char_index);
        let end = self.byte_offset(char_index + count);
        self.text[start..end].to_string()
    }

    /// Remove a span and return what was removed.
    pub(crate) fn cut(&mut self, char_index: usize, count: CharCount) -> String {
        let removed = self.sub(char_index, count);
        self.remove(char_index, CharCount::Count(removed.chars().count()));
        removed
    }
}
