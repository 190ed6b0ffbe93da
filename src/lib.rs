pub mod content;
pub mod error;
pub mod model;
pub mod publish;
pub mod schedule;
pub mod score;
pub mod session;
pub mod store;

pub use error::{Error, Result};
