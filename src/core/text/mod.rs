//! ANSI-aware text measurement, truncation and wrapping.
//!
//! Everything here is pure (string in, string out) so the region, the elements and the message
//! renderer can share it without touching the terminal.

pub mod ansi;
pub mod truncate;
pub mod width;
pub mod wrap;

pub use ansi::strip_ansi;
pub use truncate::truncate_to_width;
pub use width::visual_len;
pub use wrap::wrap_to_width;
