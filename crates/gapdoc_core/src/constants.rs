//! Shared constants used across gapdoc crates.

/// Default floor capacity for a [`GapBuffer`](crate::GapBuffer).
pub const DEFAULT_GAP_BUFFER_CAPACITY: usize = 1024;

/// Utilization below which [`GapBuffer::trim_excess`](crate::GapBuffer::trim_excess)
/// reallocates.
pub const TRIM_EXCESS_THRESHOLD: f64 = 0.9;

/// Text inserted by a single indentation step.
pub const INDENT_TEXT: &str = "\t";

/// Character removed by a single unindentation step.
pub const INDENT_CHAR: char = '\t';

/// Environment variable overriding the initial line-store capacity.
pub const LINE_CAPACITY_ENV: &str = "GAPDOC_LINE_CAPACITY";

/// Environment variable controlling whether document resets trim storage.
pub const TRIM_ON_RESET_ENV: &str = "GAPDOC_TRIM_ON_RESET";
