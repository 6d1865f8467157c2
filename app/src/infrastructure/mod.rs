pub mod event_bus;
pub mod ui_context;

pub use event_bus::*;
pub use ui_context::*;
