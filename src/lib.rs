pub mod batch;
pub mod config;
pub mod error;
pub mod progress;
pub mod textutil;
pub mod tools;

pub use error::{BatchError, InvocationError};
