pub mod api;
pub mod auth;
pub mod cli;
pub mod environment;
pub mod error;
pub mod http;
pub mod logging;
pub mod steps;
pub mod storage;
pub mod testing;

pub use error::FlowError;
