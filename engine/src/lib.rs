// Engine library root: everything the site does that isn't rendering.

pub mod config;
pub mod error;
pub mod forms;
pub mod pricing;
pub mod recommendations;
pub mod routing;
pub mod theme;

pub use error::{EngineError, Result};
