//! Change notifications raised by [`TextDocument`](crate::TextDocument).

use crate::position::{TextPos, TextRange};
use serde::Serialize;

/// Whether a change came from a forward edit (including redo) or an undo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ModifyStatus {
    Modify,
    Undo,
}

/// Shape of the edit that produced a change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ModifyDetail {
    #[default]
    Insert,
    Remove,
    /// Single-character delete or backspace.
    RemoveOne,
    IndentOrUnindent,
}

/// Payload delivered to every subscriber after a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ModifyEvent {
    pub status: ModifyStatus,
    pub detail: ModifyDetail,
    /// Range affected by the change, in post-change coordinates.
    pub range: TextRange,
    /// Document end position captured before the change.
    pub old_end_pos: TextPos,
}

/// Handle returned by [`TextDocument::subscribe`](crate::TextDocument::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);
