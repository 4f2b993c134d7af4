mod api;
mod config;
pub mod consts;
mod error;
pub mod helpers;
mod types;
pub mod validation;

pub use api::*;
pub use config::*;
pub use error::TaskboardError;
pub use types::*;
