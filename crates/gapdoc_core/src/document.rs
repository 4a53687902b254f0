//! The public document facade.
//!
//! [`TextDocument`] owns the line store and the undo history. Every edit is
//! turned into a high-level command, validated, executed through the
//! history and then reported to subscribers as a [`ModifyEvent`].

use crate::command::{
    HighLevelCommand, HighLevelCompositeCommand, IndentCommand, InsertTextCommand,
    RemoveTextCommand, UnindentCommand,
};
use crate::config::Config;
use crate::constants::INDENT_TEXT;
use crate::error::{DocumentError, Result};
use crate::event::{ModifyDetail, ModifyEvent, ModifyStatus, SubscriptionId};
use crate::gap_buffer::{self, GapBuffer};
use crate::history::UndoRedoHistory;
use crate::line::{CharCount, TextLine};
use crate::position::{TextPos, TextRange};
use crate::text::is_single_line;
use std::fmt;
use std::ops::Index;
use tracing::debug;

/// Mutable state handed to commands. Only commands change it.
#[derive(Debug)]
pub(crate) struct DocumentData {
    pub(crate) lines: GapBuffer<TextLine>,
    pub(crate) modify_count: i64,
}

impl DocumentData {
    pub(crate) fn from_lines(lines: impl IntoIterator<Item = TextLine>, capacity: usize) -> Self {
        let mut store = GapBuffer::with_capacity(capacity);
        store.extend(lines);
        Self {
            lines: store,
            modify_count: 0,
        }
    }

    fn end_pos(&self) -> TextPos {
        let last = self.lines.len().saturating_sub(1);
        TextPos::new(last, self.lines.get(last).map_or(0, TextLine::len))
    }
}

/// Read-only view over the lines of a document.
#[derive(Clone, Copy, Debug)]
pub struct Lines<'a> {
    lines: &'a GapBuffer<TextLine>,
}

impl<'a> Lines<'a> {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, line_index: usize) -> Option<&'a TextLine> {
        self.lines.get(line_index)
    }

    pub fn iter(&self) -> gap_buffer::Iter<'a, TextLine> {
        self.lines.iter()
    }
}

impl Index<usize> for Lines<'_> {
    type Output = TextLine;

    fn index(&self, line_index: usize) -> &TextLine {
        &self.lines[line_index]
    }
}

impl<'a> IntoIterator for Lines<'a> {
    type Item = &'a TextLine;
    type IntoIter = gap_buffer::Iter<'a, TextLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

type Listener = Box<dyn FnMut(&ModifyEvent)>;

/// Line-oriented text document with undo/redo and change notifications.
///
/// A document always holds at least one line. Positions passed to the
/// mutators must lie inside the document; out-of-range positions are
/// rejected with [`DocumentError::PositionOutOfRange`] before anything
/// changes.
pub struct TextDocument {
    data: DocumentData,
    history: UndoRedoHistory<Box<dyn HighLevelCommand>>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    trim_on_reset: bool,
}

impl fmt::Debug for TextDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextDocument")
            .field("line_count", &self.data.lines.len())
            .field("modify_count", &self.data.modify_count)
            .field("undo_len", &self.history.undo_len())
            .field("redo_len", &self.history.redo_len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDocument {
    /// Create a document holding one empty line, using [`Config::default`].
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            data: DocumentData::from_lines(
                std::iter::once(TextLine::default()),
                config.initial_line_capacity,
            ),
            history: UndoRedoHistory::new(),
            listeners: Vec::new(),
            next_subscription: 0,
            trim_on_reset: config.trim_on_reset,
        }
    }

    // ---- queries ----

    pub fn lines(&self) -> Lines<'_> {
        Lines {
            lines: &self.data.lines,
        }
    }

    pub fn line_count(&self) -> usize {
        self.data.lines.len()
    }

    /// `true` while the document differs from its last saved baseline.
    pub fn is_modified(&self) -> bool {
        self.data.modify_count != 0
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Position just past the last char of the last line.
    pub fn end_pos(&self) -> TextPos {
        self.data.end_pos()
    }

    /// Whole document joined with `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (index, line) in self.data.lines.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(line.text());
        }
        out
    }

    /// Text covered by `range`, one string per touched line.
    ///
    /// # Errors
    /// Returns [`DocumentError::PositionOutOfRange`] when either end of the
    /// range lies outside the document.
    pub fn strings_in_range(&self, range: TextRange) -> Result<Vec<String>> {
        self.check_range(range)?;
        let start = range.start();
        let end = range.end();
        let lines = &self.data.lines;
        if start.line_index == end.line_index {
            return Ok(vec![lines[start.line_index].sub(
                start.char_index,
                CharCount::Count(end.char_index - start.char_index),
            )]);
        }

        let mut out = Vec::with_capacity(range.line_count());
        out.push(lines[start.line_index].sub(start.char_index, CharCount::ToEnd));
        for line_index in start.line_index + 1..end.line_index {
            out.push(lines[line_index].text().to_string());
        }
        out.push(lines[end.line_index].sub(0, CharCount::Count(end.char_index)));
        Ok(out)
    }

    /// Position one char after `pos`, wrapping to the next line.
    ///
    /// Returns `pos` itself at the end of the document.
    pub fn next_pos(&self, pos: TextPos) -> Result<TextPos> {
        self.check_pos(pos)?;
        Ok(self.next_pos_unchecked(pos))
    }

    /// Position one char before `pos`, wrapping to the previous line.
    ///
    /// Returns `pos` itself at the start of the document.
    pub fn prev_pos(&self, pos: TextPos) -> Result<TextPos> {
        self.check_pos(pos)?;
        Ok(self.prev_pos_unchecked(pos))
    }

    fn next_pos_unchecked(&self, pos: TextPos) -> TextPos {
        if pos == self.end_pos() {
            pos
        } else if pos.char_index < self.data.lines[pos.line_index].len() {
            TextPos::new(pos.line_index, pos.char_index + 1)
        } else {
            TextPos::new(pos.line_index + 1, 0)
        }
    }

    fn prev_pos_unchecked(&self, pos: TextPos) -> TextPos {
        if pos == TextPos::TOP {
            pos
        } else if pos.char_index > 0 {
            TextPos::new(pos.line_index, pos.char_index - 1)
        } else {
            let line_index = pos.line_index - 1;
            TextPos::new(line_index, self.data.lines[line_index].len())
        }
    }

    fn check_pos(&self, pos: TextPos) -> Result<()> {
        let line_len = self.data.lines.get(pos.line_index).map(TextLine::len);
        match line_len {
            Some(len) if pos.char_index <= len => Ok(()),
            _ => Err(DocumentError::PositionOutOfRange {
                pos,
                line_count: self.data.lines.len(),
                line_len,
            }),
        }
    }

    fn check_range(&self, range: TextRange) -> Result<()> {
        self.check_pos(range.original_start())?;
        self.check_pos(range.original_end())
    }

    // ---- whole-document state ----

    /// Replace the content with a single empty line.
    pub fn new_document(&mut self) {
        self.reset(vec![TextLine::default()]);
    }

    /// Replace the content with `lines`, clearing history and counters.
    ///
    /// No event is raised.
    ///
    /// # Errors
    /// Returns [`DocumentError::EmptyDocument`] for an empty iterator and
    /// [`DocumentError::LineContainsNewline`] when a line holds a
    /// terminator. The document is unchanged on error.
    pub fn set_document<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut new_lines = Vec::new();
        for (line_index, text) in lines.into_iter().enumerate() {
            let text = text.into();
            if !is_single_line(&text) {
                return Err(DocumentError::LineContainsNewline { line_index });
            }
            new_lines.push(TextLine::new(text));
        }
        if new_lines.is_empty() {
            return Err(DocumentError::EmptyDocument);
        }
        self.reset(new_lines);
        Ok(())
    }

    fn reset(&mut self, lines: Vec<TextLine>) {
        self.data.modify_count = 0;
        self.history.clear();
        self.data.lines.clear();
        self.data.lines.extend(lines);
        if self.trim_on_reset {
            self.history.trim_excess();
            self.data.lines.trim_excess();
        }
        debug!(line_count = self.data.lines.len(), "document reset");
    }

    /// Mark the current content as the saved baseline.
    ///
    /// Lines that had pending changes report
    /// [`LineModifyStatus::ModifySaved`](crate::LineModifyStatus::ModifySaved)
    /// afterwards.
    pub fn clear_modify_count(&mut self) {
        self.data.modify_count = 0;
        for line in self.data.lines.iter_mut() {
            line.clear_modify_count();
        }
    }

    // ---- edits ----

    /// Insert `text` at `pos`. `text` may span several lines.
    ///
    /// # Returns
    /// `Ok(false)` when `text` is empty and nothing changed.
    pub fn insert_text(&mut self, pos: TextPos, text: &str) -> Result<bool> {
        self.insert_text_in_range(TextRange::caret(pos), text)
    }

    /// Replace `range` with `text` as one undo step.
    pub fn insert_text_in_range(&mut self, range: TextRange, text: &str) -> Result<bool> {
        self.check_range(range)?;
        let mut composite = HighLevelCompositeCommand::new();
        composite.try_add(Box::new(RemoveTextCommand::new(range, ModifyDetail::Remove)));
        composite.try_add(Box::new(InsertTextCommand::new(range.start(), text)));
        Ok(self.try_execute_command(Box::new(composite)))
    }

    pub fn remove_text(&mut self, range: TextRange) -> Result<bool> {
        self.check_range(range)?;
        Ok(self.try_execute_command(Box::new(RemoveTextCommand::new(
            range,
            ModifyDetail::Remove,
        ))))
    }

    /// Delete the char after `pos`, joining lines at a line end.
    pub fn remove_char(&mut self, pos: TextPos) -> Result<bool> {
        self.check_pos(pos)?;
        let range = TextRange::new(self.next_pos_unchecked(pos), pos);
        Ok(self.try_execute_command(Box::new(RemoveTextCommand::new(
            range,
            ModifyDetail::RemoveOne,
        ))))
    }

    /// Delete the char before `pos`, joining lines at a line start.
    pub fn remove_back(&mut self, pos: TextPos) -> Result<bool> {
        self.check_pos(pos)?;
        let range = TextRange::new(self.prev_pos_unchecked(pos), pos);
        Ok(self.try_execute_command(Box::new(RemoveTextCommand::new(
            range,
            ModifyDetail::RemoveOne,
        ))))
    }

    /// Indent every non-empty line of a multi-line `range`.
    ///
    /// A range within one line is replaced by a tab instead.
    pub fn indent(&mut self, range: TextRange) -> Result<bool> {
        self.check_range(range)?;
        if self.try_execute_command(Box::new(IndentCommand::new(range))) {
            return Ok(true);
        }
        self.insert_text_in_range(range, INDENT_TEXT)
    }

    /// Remove one leading tab from every line of a multi-line `range`.
    pub fn unindent(&mut self, range: TextRange) -> Result<bool> {
        self.check_range(range)?;
        Ok(self.try_execute_command(Box::new(UnindentCommand::new(range))))
    }

    /// Revert the most recent edit.
    ///
    /// # Returns
    /// `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let old_end_pos = self.end_pos();
        let event = match self.history.try_undo(&mut self.data) {
            Some(command) => Self::event_for(ModifyStatus::Undo, &**command, old_end_pos),
            None => return false,
        };
        self.raise(event);
        true
    }

    /// Re-apply the most recently undone edit.
    ///
    /// # Returns
    /// `false` when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let old_end_pos = self.end_pos();
        let event = match self.history.try_redo(&mut self.data) {
            Some(command) => Self::event_for(ModifyStatus::Modify, &**command, old_end_pos),
            None => return false,
        };
        self.raise(event);
        true
    }

    fn try_execute_command(&mut self, command: Box<dyn HighLevelCommand>) -> bool {
        if !command.validate() {
            debug!(detail = ?command.modify_detail(), "command rejected");
            return false;
        }
        let old_end_pos = self.end_pos();
        let command = self.history.execute(command, &mut self.data);
        let event = Self::event_for(ModifyStatus::Modify, &**command, old_end_pos);
        self.raise(event);
        true
    }

    fn event_for(
        status: ModifyStatus,
        command: &dyn HighLevelCommand,
        old_end_pos: TextPos,
    ) -> ModifyEvent {
        ModifyEvent {
            status,
            detail: command.modify_detail(),
            range: command.result_range(),
            old_end_pos,
        }
    }

    fn raise(&mut self, event: ModifyEvent) {
        debug!(
            status = ?event.status,
            detail = ?event.detail,
            range = %event.range,
            modify_count = self.data.modify_count,
            "document modified"
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    // ---- subscriptions ----

    /// Register `listener` to run after every change.
    ///
    /// Listeners run synchronously, in subscription order, before the
    /// mutating call returns.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ModifyEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// # Returns
    /// `true` when `id` was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::LineModifyStatus;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn document(lines: &[&str]) -> TextDocument {
        let mut doc = TextDocument::new();
        doc.set_document(lines.iter().copied()).expect("set document");
        doc
    }

    fn record(doc: &mut TextDocument) -> Rc<RefCell<Vec<ModifyEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        doc.subscribe(move |event| sink.borrow_mut().push(*event));
        events
    }

    #[test]
    fn fresh_document_has_one_empty_line() {
        let doc = TextDocument::new();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.text(), "");
        assert_eq!(doc.end_pos(), TextPos::TOP);
        assert!(!doc.is_modified());
        assert!(!doc.can_undo());
    }

    #[test]
    fn out_of_range_positions_are_rejected_before_any_change() {
        let mut doc = document(&["abc"]);
        let err = doc
            .insert_text(TextPos::new(0, 4), "x")
            .expect_err("past line end");
        assert!(matches!(
            err,
            DocumentError::PositionOutOfRange {
                line_count: 1,
                line_len: Some(3),
                ..
            }
        ));
        let err = doc.remove_char(TextPos::new(1, 0)).expect_err("past last line");
        assert!(matches!(
            err,
            DocumentError::PositionOutOfRange { line_len: None, .. }
        ));
        assert!(doc.strings_in_range(TextRange::from_coords(0, 0, 2, 0)).is_err());
        assert!(!doc.can_undo());
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn set_document_validates_input() {
        let mut doc = document(&["keep"]);
        assert!(matches!(
            doc.set_document(Vec::<String>::new()),
            Err(DocumentError::EmptyDocument)
        ));
        assert!(matches!(
            doc.set_document(["ok", "bad\nline"]),
            Err(DocumentError::LineContainsNewline { line_index: 1 })
        ));
        assert_eq!(doc.text(), "keep");
    }

    #[test]
    fn set_document_resets_history_without_events() {
        let mut doc = document(&["a"]);
        let events = record(&mut doc);
        doc.insert_text(TextPos::TOP, "x").expect("insert");
        doc.set_document(["b", "c"]).expect("set document");
        assert_eq!(events.borrow().len(), 1);
        assert!(!doc.can_undo());
        assert!(!doc.is_modified());

        doc.new_document();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn empty_insert_is_rejected_silently() {
        let mut doc = document(&["abc"]);
        let events = record(&mut doc);
        assert!(!doc.insert_text(TextPos::new(0, 1), "").expect("valid pos"));
        assert!(!doc.remove_text(TextRange::caret(TextPos::TOP)).expect("valid pos"));
        assert!(events.borrow().is_empty());
        assert!(!doc.can_undo());
    }

    #[test]
    fn events_report_status_detail_and_old_end() {
        let mut doc = document(&["ab"]);
        let events = record(&mut doc);
        doc.insert_text(TextPos::new(0, 2), "\ncd").expect("insert");
        doc.undo();
        doc.redo();

        let events = events.borrow();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].status, ModifyStatus::Modify);
        assert_eq!(events[0].detail, ModifyDetail::Insert);
        assert_eq!(events[0].range, TextRange::from_coords(0, 2, 1, 2));
        assert_eq!(events[0].old_end_pos, TextPos::new(0, 2));

        assert_eq!(events[1].status, ModifyStatus::Undo);
        assert_eq!(events[1].range, TextRange::caret(TextPos::new(0, 2)));
        assert_eq!(events[1].old_end_pos, TextPos::new(1, 2));

        assert_eq!(events[2].status, ModifyStatus::Modify);
        assert_eq!(events[2].old_end_pos, TextPos::new(0, 2));
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let mut doc = document(&[""]);
        let events = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&events);
        let id = doc.subscribe(move |_| *sink.borrow_mut() += 1);
        doc.insert_text(TextPos::TOP, "a").expect("insert");
        assert!(doc.unsubscribe(id));
        assert!(!doc.unsubscribe(id));
        doc.insert_text(TextPos::TOP, "b").expect("insert");
        assert_eq!(*events.borrow(), 1);
    }

    #[test]
    fn remove_char_and_back_join_lines_at_edges() {
        let mut doc = document(&["ab", "cd"]);
        let events = record(&mut doc);
        assert!(doc.remove_char(TextPos::new(0, 2)).expect("join forward"));
        assert_eq!(doc.text(), "abcd");
        assert_eq!(events.borrow()[0].detail, ModifyDetail::RemoveOne);

        assert!(!doc.remove_char(doc.end_pos()).expect("end of document"));
        assert!(!doc.remove_back(TextPos::TOP).expect("start of document"));

        doc.undo();
        assert!(doc.remove_back(TextPos::new(1, 0)).expect("join backward"));
        assert_eq!(doc.text(), "abcd");
        assert!(doc.remove_back(TextPos::new(0, 1)).expect("backspace"));
        assert_eq!(doc.text(), "bcd");
    }

    #[test]
    fn next_and_prev_pos_wrap_lines() {
        let doc = document(&["ab", "", "c"]);
        assert_eq!(doc.next_pos(TextPos::new(0, 1)).expect("pos"), TextPos::new(0, 2));
        assert_eq!(doc.next_pos(TextPos::new(0, 2)).expect("pos"), TextPos::new(1, 0));
        assert_eq!(doc.next_pos(TextPos::new(2, 1)).expect("pos"), TextPos::new(2, 1));
        assert_eq!(doc.prev_pos(TextPos::new(2, 0)).expect("pos"), TextPos::new(1, 0));
        assert_eq!(doc.prev_pos(TextPos::new(1, 0)).expect("pos"), TextPos::new(0, 2));
        assert_eq!(doc.prev_pos(TextPos::TOP).expect("pos"), TextPos::TOP);
        assert!(doc.next_pos(TextPos::new(3, 0)).is_err());
    }

    #[test]
    fn strings_in_range_follow_normalized_order() {
        let doc = document(&["hello", "big", "world"]);
        assert_eq!(
            doc.strings_in_range(TextRange::from_coords(2, 3, 0, 3))
                .expect("range"),
            ["lo", "big", "wor"]
        );
        assert_eq!(
            doc.strings_in_range(TextRange::from_coords(1, 1, 1, 3))
                .expect("range"),
            ["ig"]
        );
    }

    #[test]
    fn replacing_a_selection_is_one_undo_step() {
        let mut doc = document(&["hello world"]);
        assert!(doc
            .insert_text_in_range(TextRange::from_coords(0, 0, 0, 5), "bye\nnow")
            .expect("replace"));
        assert_eq!(doc.text(), "bye\nnow world");
        assert!(doc.undo());
        assert_eq!(doc.text(), "hello world");
        assert!(!doc.can_undo());

        assert!(doc
            .insert_text_in_range(TextRange::from_coords(0, 0, 0, 6), "")
            .expect("delete only"));
        assert_eq!(doc.text(), "world");
    }

    #[test]
    fn single_line_indent_falls_back_to_tab_insert() {
        let mut doc = document(&["abc"]);
        let events = record(&mut doc);
        assert!(doc.indent(TextRange::from_coords(0, 1, 0, 2)).expect("indent"));
        assert_eq!(doc.text(), "a\tc");
        assert_eq!(events.borrow()[0].detail, ModifyDetail::Insert);
        assert!(!doc.unindent(TextRange::from_coords(0, 0, 0, 3)).expect("unindent"));
    }

    #[test]
    fn clear_modify_count_marks_lines_saved() {
        let mut doc = document(&["a", "b"]);
        doc.insert_text(TextPos::new(1, 1), "!").expect("insert");
        assert!(doc.is_modified());
        assert_eq!(doc.lines()[1].modify_status(), LineModifyStatus::Modified);

        doc.clear_modify_count();
        assert!(!doc.is_modified());
        assert_eq!(doc.lines()[0].modify_status(), LineModifyStatus::None);
        assert_eq!(doc.lines()[1].modify_status(), LineModifyStatus::ModifySaved);

        doc.undo();
        assert!(doc.is_modified());
        assert_eq!(doc.lines()[1].modify_status(), LineModifyStatus::Modified);
    }

    #[test]
    fn with_config_honours_capacity_and_trim_flag() {
        let config = Config {
            initial_line_capacity: 2,
            trim_on_reset: false,
        };
        let mut doc = TextDocument::with_config(&config);
        doc.set_document(["1", "2", "3", "4", "5"]).expect("set document");
        doc.set_document(["only"]).expect("set document");
        assert_eq!(doc.data.lines.capacity(), 10);

        let mut trimmed = TextDocument::with_config(&Config {
            trim_on_reset: true,
            ..config
        });
        trimmed.set_document(["1", "2", "3", "4", "5"]).expect("set document");
        trimmed.set_document(["only"]).expect("set document");
        assert_eq!(trimmed.data.lines.capacity(), 2);
        assert_eq!(trimmed.lines().iter().count(), 1);
    }
}
