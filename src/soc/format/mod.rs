//! Text rendering of peripherals, registers and fields under a closed set of
//! display options.

pub mod options;
pub mod render;

pub use options::{DisplayOptions, FLAG_MARKER, WholeValue, split_flags};
pub use render::Formatter;
