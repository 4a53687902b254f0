//! Root crate facade for gapdoc.

pub use gapdoc_core::{
    config, constants, document, env, error, event, gap_buffer, history, line, position, text,
    Config, DocumentError, GapBuffer, LineModifyStatus, Lines, ModifyDetail, ModifyEvent,
    ModifyStatus, NewlineKind, RangeKind, Result, SubscriptionId, TextDocument, TextLine, TextPos,
    TextRange,
};
