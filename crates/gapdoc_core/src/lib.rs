//! Core text-document library for gapdoc (line store, edits, undo/redo).

mod command;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Document facade and read-only line view.
pub mod document;
/// Environment mutation helpers used by config tests.
pub mod env;
/// Error types for the document facade.
pub mod error;
/// Change notification types.
pub mod event;
/// Generic gap buffer used as the line store.
pub mod gap_buffer;
/// Generic undo/redo commands and history.
pub mod history;
/// Single-line storage and modification status.
pub mod line;
/// Positions and ranges.
pub mod position;
/// Plain-text splitting and joining helpers.
pub mod text;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use document::{Lines, TextDocument};
pub use error::{DocumentError, Result};
pub use event::{ModifyDetail, ModifyEvent, ModifyStatus, SubscriptionId};
pub use gap_buffer::GapBuffer;
pub use line::{LineModifyStatus, TextLine};
pub use position::{RangeKind, TextPos, TextRange};
pub use text::NewlineKind;
