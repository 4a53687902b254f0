//! User-level edits built from low-level commands.
//!
//! Each command builds its low-level steps lazily in `execute`, because
//! captured text such as a line tail depends on the store at that moment.
//! `undo` reverts and drops the steps so the next redo rebuilds them.

use crate::command::LowLevelCommand;
use crate::constants::INDENT_TEXT;
use crate::document::DocumentData;
use crate::event::ModifyDetail;
use crate::history::{UndoRedoCommand, UndoRedoCompositeCommand};
use crate::line::{CharCount, TextLine};
use crate::position::{TextPos, TextRange};
use crate::text::{is_single_line, split_lines};
use std::fmt;

/// A reversible edit the document can validate, record and report.
pub(crate) trait HighLevelCommand: UndoRedoCommand<Target = DocumentData> + fmt::Debug {
    /// `false` when executing would change nothing; such commands are
    /// never executed or recorded.
    fn validate(&self) -> bool;

    fn modify_detail(&self) -> ModifyDetail;

    /// Range affected by the most recent execute or undo.
    fn result_range(&self) -> TextRange;
}

type Steps = UndoRedoCompositeCommand<LowLevelCommand>;

#[derive(Debug)]
pub(crate) struct InsertTextCommand {
    pos: TextPos,
    value: String,
    steps: Steps,
    result_range: TextRange,
}

impl InsertTextCommand {
    pub(crate) fn new(pos: TextPos, value: impl Into<String>) -> Self {
        Self {
            pos,
            value: value.into(),
            steps: Steps::new(),
            result_range: TextRange::caret(pos),
        }
    }
}

impl UndoRedoCommand for InsertTextCommand {
    type Target = DocumentData;

    fn execute(&mut self, data: &mut DocumentData) {
        let pos = self.pos;
        let end = if is_single_line(&self.value) {
            self.steps
                .add(LowLevelCommand::insert_single_text(pos, self.value.clone()));
            TextPos::new(pos.line_index, pos.char_index + self.value.chars().count())
        } else {
            let mut fragments = split_lines(&self.value).into_iter();
            let first = fragments.next().unwrap_or_default();
            let rest: Vec<TextLine> = fragments.map(TextLine::new).collect();
            let end = TextPos::new(
                pos.line_index + rest.len(),
                rest.last().map_or(0, TextLine::len),
            );
            let tail = data.lines[pos.line_index].sub(pos.char_index, CharCount::ToEnd);

            self.steps
                .add(LowLevelCommand::remove_single_text(pos, CharCount::ToEnd));
            self.steps.add(LowLevelCommand::insert_single_text(pos, first));
            self.steps
                .add(LowLevelCommand::insert_lines(pos.line_index + 1, rest));
            self.steps.add(LowLevelCommand::insert_single_text(end, tail));
            end
        };
        self.steps.execute(data);
        self.result_range = TextRange::new(pos, end);
    }

    fn undo(&mut self, data: &mut DocumentData) {
        self.steps.undo(data);
        self.steps.clear();
        self.result_range = TextRange::caret(self.pos);
    }
}

impl HighLevelCommand for InsertTextCommand {
    fn validate(&self) -> bool {
        !self.value.is_empty()
    }

    fn modify_detail(&self) -> ModifyDetail {
        ModifyDetail::Insert
    }

    fn result_range(&self) -> TextRange {
        self.result_range
    }
}

#[derive(Debug)]
pub(crate) struct RemoveTextCommand {
    range: TextRange,
    detail: ModifyDetail,
    steps: Steps,
    result_range: TextRange,
}

impl RemoveTextCommand {
    pub(crate) fn new(range: TextRange, detail: ModifyDetail) -> Self {
        Self {
            range,
            detail,
            steps: Steps::new(),
            result_range: range,
        }
    }
}

impl UndoRedoCommand for RemoveTextCommand {
    type Target = DocumentData;

    fn execute(&mut self, data: &mut DocumentData) {
        let start = self.range.start();
        if self.range.line_count() == 1 {
            self.steps.add(LowLevelCommand::remove_single_text(
                start,
                CharCount::Count(self.range.char_length()),
            ));
        } else {
            let end = self.range.end();
            let tail = data.lines[end.line_index].sub(end.char_index, CharCount::ToEnd);
            self.steps
                .add(LowLevelCommand::remove_single_text(start, CharCount::ToEnd));
            self.steps.add(LowLevelCommand::insert_single_text(start, tail));
            self.steps.add(LowLevelCommand::remove_lines(
                start.line_index + 1,
                self.range.line_offset(),
            ));
        }
        self.steps.execute(data);
        self.result_range = TextRange::caret(start);
    }

    fn undo(&mut self, data: &mut DocumentData) {
        self.steps.undo(data);
        self.steps.clear();
        self.result_range = self.range;
    }
}

impl HighLevelCommand for RemoveTextCommand {
    fn validate(&self) -> bool {
        !self.range.is_empty()
    }

    fn modify_detail(&self) -> ModifyDetail {
        self.detail
    }

    fn result_range(&self) -> TextRange {
        self.result_range
    }
}

/// Shift the original endpoints of `range` for a step applied at column 0
/// of `line_index`.
fn shift_endpoints(start: &mut TextPos, end: &mut TextPos, line_index: usize, grow: bool) {
    for pos in [start, end] {
        if pos.line_index == line_index {
            pos.char_index = if grow {
                pos.char_index + 1
            } else {
                pos.char_index.saturating_sub(1)
            };
        }
    }
}

#[derive(Debug)]
pub(crate) struct IndentCommand {
    range: TextRange,
    steps: Steps,
    result_range: TextRange,
}

impl IndentCommand {
    pub(crate) fn new(range: TextRange) -> Self {
        Self {
            range,
            steps: Steps::new(),
            result_range: range,
        }
    }
}

impl UndoRedoCommand for IndentCommand {
    type Target = DocumentData;

    fn execute(&mut self, data: &mut DocumentData) {
        let mut start = self.range.original_start();
        let mut end = self.range.original_end();
        for line_index in self.range.line_indexes() {
            if data.lines[line_index].is_empty() {
                continue;
            }
            self.steps.add(LowLevelCommand::insert_single_text(
                TextPos::new(line_index, 0),
                INDENT_TEXT,
            ));
            shift_endpoints(&mut start, &mut end, line_index, true);
        }
        self.steps.execute(data);
        self.result_range = TextRange::with_kind(start, end, self.range.kind());
    }

    fn undo(&mut self, data: &mut DocumentData) {
        self.steps.undo(data);
        self.steps.clear();
        self.result_range = self.range;
    }
}

impl HighLevelCommand for IndentCommand {
    fn validate(&self) -> bool {
        self.range.line_count() > 1
    }

    fn modify_detail(&self) -> ModifyDetail {
        ModifyDetail::IndentOrUnindent
    }

    fn result_range(&self) -> TextRange {
        self.result_range
    }
}

#[derive(Debug)]
pub(crate) struct UnindentCommand {
    range: TextRange,
    steps: Steps,
    result_range: TextRange,
}

impl UnindentCommand {
    pub(crate) fn new(range: TextRange) -> Self {
        Self {
            range,
            steps: Steps::new(),
            result_range: range,
        }
    }
}

impl UndoRedoCommand for UnindentCommand {
    type Target = DocumentData;

    fn execute(&mut self, data: &mut DocumentData) {
        let mut start = self.range.original_start();
        let mut end = self.range.original_end();
        for line_index in self.range.line_indexes() {
            if !data.lines[line_index].starts_with_tab() {
                continue;
            }
            self.steps.add(LowLevelCommand::remove_single_text(
                TextPos::new(line_index, 0),
                CharCount::Count(1),
            ));
            shift_endpoints(&mut start, &mut end, line_index, false);
        }
        self.steps.execute(data);
        self.result_range = TextRange::with_kind(start, end, self.range.kind());
    }

    fn undo(&mut self, data: &mut DocumentData) {
        self.steps.undo(data);
        self.steps.clear();
        self.result_range = self.range;
    }
}

impl HighLevelCommand for UnindentCommand {
    fn validate(&self) -> bool {
        self.range.line_count() > 1
    }

    fn modify_detail(&self) -> ModifyDetail {
        ModifyDetail::IndentOrUnindent
    }

    fn result_range(&self) -> TextRange {
        self.result_range
    }
}

/// Group of high-level commands recorded as a single undo step.
#[derive(Debug, Default)]
pub(crate) struct HighLevelCompositeCommand {
    commands: UndoRedoCompositeCommand<Box<dyn HighLevelCommand>>,
}

impl HighLevelCompositeCommand {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append `command` when it validates.
    ///
    /// # Returns
    /// `true` when the command was added.
    pub(crate) fn try_add(&mut self, command: Box<dyn HighLevelCommand>) -> bool {
        if !command.validate() {
            return false;
        }
        self.commands.add(command);
        true
    }

    fn reporter(&self) -> Option<&dyn HighLevelCommand> {
        self.commands
            .last_invoked()
            .or_else(|| self.commands.iter().last())
            .map(|command| &**command as &dyn HighLevelCommand)
    }
}

impl UndoRedoCommand for HighLevelCompositeCommand {
    type Target = DocumentData;

    fn execute(&mut self, data: &mut DocumentData) {
        self.commands.execute(data);
    }

    fn undo(&mut self, data: &mut DocumentData) {
        self.commands.undo(data);
    }
}

impl HighLevelCommand for HighLevelCompositeCommand {
    fn validate(&self) -> bool {
        !self.commands.is_empty()
    }

    fn modify_detail(&self) -> ModifyDetail {
        self.reporter()
            .map(|command| command.modify_detail())
            .unwrap_or_default()
    }

    fn result_range(&self) -> TextRange {
        self.reporter()
            .map(|command| command.result_range())
            .unwrap_or_else(|| TextRange::caret(TextPos::TOP))
    }
}
