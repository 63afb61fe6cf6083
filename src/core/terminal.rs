//! Output side of the terminal.

use std::io;

/// Where region frames are written.
///
/// Implementations should hand each `write` to the terminal in one piece; the region builds a
/// whole frame before calling it.
pub trait Terminal: Send {
    fn write(&mut self, data: &str) -> io::Result<()>;

    fn columns(&self) -> u16;

    fn rows(&self) -> u16;
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn write(&mut self, data: &str) -> io::Result<()> {
        (**self).write(data)
    }

    fn columns(&self) -> u16 {
        (**self).columns()
    }

    fn rows(&self) -> u16 {
        (**self).rows()
    }
}
