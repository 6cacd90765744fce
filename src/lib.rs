//! jobfoyu client library

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod messages;
pub mod output;
pub mod shell;
pub mod workflow;

pub use config::Config;
pub use error::{JobfoyuError, Result, ServiceError};
