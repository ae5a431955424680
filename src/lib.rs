pub mod cli;
pub mod core;
pub mod report;

pub use crate::core::error::IndexError;
pub use crate::core::index::{RenderOptions, Rendered, render, render_with};
