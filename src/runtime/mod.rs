//! Bottom-of-screen runtime: the region, the footer state machine and the element manager.

pub mod footer;
pub mod manager;
pub mod region;

pub use footer::{FooterSession, FooterState, StatusBar, StatusTicker, TerminalFooter};
pub use manager::ElementManager;
pub use region::{Region, TerminalRegion};
