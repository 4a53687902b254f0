//! Builders and snapshots shared by unit tests.

use crate::document::DocumentData;
use crate::line::TextLine;

/// Line store holding `lines`, with zeroed counters.
pub(crate) fn data_from(lines: &[&str]) -> DocumentData {
    DocumentData::from_lines(lines.iter().map(|&line| TextLine::new(line)), 4)
}

pub(crate) fn texts(data: &DocumentData) -> Vec<String> {
    data.lines.iter().map(|line| line.text().to_string()).collect()
}

/// Everything an `execute`/`undo` pair must restore.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Snapshot {
    lines: Vec<TextLine>,
    modify_count: i64,
}

pub(crate) fn snapshot(data: &DocumentData) -> Snapshot {
    Snapshot {
        lines: data.lines.iter().cloned().collect(),
        modify_count: data.modify_count,
    }
}
