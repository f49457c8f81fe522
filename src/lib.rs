mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod pipeline;
mod utils;

#[cfg(test)]
mod test;

pub use api::{
    Backend, CredentialProvider, HttpBackend, Mode, Resource, StaticToken, TestBackend, TokenFile,
};
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use model::{Amount, ContactQuery, Employee, QueryStatus, Record, Timestamp, User};
