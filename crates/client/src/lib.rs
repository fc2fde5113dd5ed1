//! tablekit_client - command line shell over a DynamoDB keyed table.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dynamodb;
pub mod error;
pub mod output;
pub mod prelude;

pub use config::Config;
pub use dynamodb::DynamoDbStore;
pub use error::{ClientError, Result};
