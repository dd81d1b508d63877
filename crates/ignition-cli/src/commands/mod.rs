//! Command implementations.
//!
//! - [`preview`] - render a preview document and serve its modules
//! - [`exports`] - print a file's custom element exports
//! - [`serve`] - run the asset server for a workspace
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod exports;
pub mod preview;
pub mod serve;
pub(crate) mod utils;

pub use exports::execute as exports_execute;
pub use preview::execute as preview_execute;
pub use serve::execute as serve_execute;
