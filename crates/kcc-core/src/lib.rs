pub mod classify;
pub mod config;
pub mod error;
pub mod fieldedit;
pub mod locate;
pub mod paths;
pub mod phases;
pub mod plan;
pub mod scaffold;
pub mod types;

pub use config::{Config, GitAuthor};
pub use error::{Error, Result};
pub use types::*;
