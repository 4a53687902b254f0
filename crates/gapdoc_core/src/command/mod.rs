//! Reversible edit commands.
//!
//! Low-level commands touch exactly one region of the line store and are
//! combined by the high-level commands that the document facade builds.

pub(crate) mod high_level;
pub(crate) mod low_level;

pub(crate) use high_level::{
    HighLevelCommand, HighLevelCompositeCommand, IndentCommand, InsertTextCommand,
    RemoveTextCommand, UnindentCommand,
};
pub(crate) use low_level::LowLevelCommand;
