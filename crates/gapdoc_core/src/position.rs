//! Document coordinates and spans.

use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

/// Zero-based `(line, char)` coordinate inside a document.
///
/// Ordering is lexicographic: line first, then char. Bounds against actual
/// line lengths are checked by the document, not by this type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TextPos {
    pub line_index: usize,
    pub char_index: usize,
}

impl TextPos {
    /// First position of every document.
    pub const TOP: TextPos = TextPos::new(0, 0);

    pub const fn new(line_index: usize, char_index: usize) -> Self {
        Self {
            line_index,
            char_index,
        }
    }
}

impl fmt::Display for TextPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_index, self.char_index)
    }
}

impl From<(usize, usize)> for TextPos {
    fn from((line_index, char_index): (usize, usize)) -> Self {
        Self::new(line_index, char_index)
    }
}

/// Selection shape tag.
///
/// Only [`RangeKind::Normal`] is interpreted by edit commands; `Rect` is
/// carried through untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RangeKind {
    #[default]
    Normal,
    Rect,
}

/// Span between two positions, remembering the order it was created in.
///
/// `original_start`/`original_end` keep anchor and caret as given;
/// [`start`](Self::start) and [`end`](Self::end) are always ascending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TextRange {
    original_start: TextPos,
    original_end: TextPos,
    is_normal: bool,
    kind: RangeKind,
}

impl TextRange {
    pub fn new(start: TextPos, end: TextPos) -> Self {
        Self::with_kind(start, end, RangeKind::Normal)
    }

    pub fn with_kind(start: TextPos, end: TextPos, kind: RangeKind) -> Self {
        Self {
            original_start: start,
            original_end: end,
            is_normal: start <= end,
            kind,
        }
    }

    /// Empty range at `pos`.
    pub fn caret(pos: TextPos) -> Self {
        Self::new(pos, pos)
    }

    /// Build a range from raw `(line, char)` coordinates.
    pub fn from_coords(
        start_line: usize,
        start_char: usize,
        end_line: usize,
        end_char: usize,
    ) -> Self {
        Self::new(
            TextPos::new(start_line, start_char),
            TextPos::new(end_line, end_char),
        )
    }

    pub fn original_start(&self) -> TextPos {
        self.original_start
    }

    pub fn original_end(&self) -> TextPos {
        self.original_end
    }

    /// `true` when the range was created anchor-before-caret.
    pub fn is_normal(&self) -> bool {
        self.is_normal
    }

    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    pub fn start(&self) -> TextPos {
        if self.is_normal {
            self.original_start
        } else {
            self.original_end
        }
    }

    pub fn end(&self) -> TextPos {
        if self.is_normal {
            self.original_end
        } else {
            self.original_start
        }
    }

    pub fn is_empty(&self) -> bool {
        self.original_start == self.original_end
    }

    /// Number of lines touched, at least one.
    pub fn line_count(&self) -> usize {
        self.line_offset() + 1
    }

    /// Distance between the end line and the start line.
    pub fn line_offset(&self) -> usize {
        self.end().line_index - self.start().line_index
    }

    /// Line index of a single-line range.
    ///
    /// # Panics
    /// Panics when the range spans more than one line.
    pub fn line_index(&self) -> usize {
        self.assert_single_line("line_index");
        self.start().line_index
    }

    /// Char length of a single-line range.
    ///
    /// # Panics
    /// Panics when the range spans more than one line.
    pub fn char_length(&self) -> usize {
        self.assert_single_line("char_length");
        self.end().char_index - self.start().char_index
    }

    fn assert_single_line(&self, accessor: &str) {
        assert!(
            self.line_count() == 1,
            "{} requires a single-line range, got {}..{}",
            accessor,
            self.start(),
            self.end()
        );
    }

    /// `true` when `other` lies entirely inside this range.
    pub fn contains(&self, other: &TextRange) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }

    /// Every line index covered, inclusive of both ends.
    pub fn line_indexes(&self) -> RangeInclusive<usize> {
        self.start().line_index..=self.end().line_index
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.original_start, self.original_end)
    }
}
