pub mod config;
pub mod core;
pub mod error;
pub mod figures;

pub use error::{FigureError, Result};
