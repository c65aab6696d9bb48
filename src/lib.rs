mod app;
pub mod config;
mod error;
mod registry;
mod selection;
pub mod ssh;
mod terminal;
pub mod ui;

pub use app::{Action, App, CRATE_NAME};
pub use error::{ConfigWarning, Error, Result};
pub use registry::{Registry, ServerRecord};
pub use selection::Selection;
pub use terminal::Terminal;
