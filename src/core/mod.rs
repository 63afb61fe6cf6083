//! Terminal-independent building blocks: escape sequences, styles, text measurement and input
//! decoding, plus the `Terminal`/`InputSource` seams the runtime is written against.

pub mod ansi;
pub mod input_buffer;
pub mod input_event;
pub mod input_source;
pub mod style;
pub mod terminal;
pub mod text;
