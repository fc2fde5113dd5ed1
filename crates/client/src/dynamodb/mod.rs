//! DynamoDB adapter (Imperative Shell).
//!
//! Everything that touches the AWS SDK lives here; the rest of the crate
//! talks to [`tablekit_core::store::TableStore`].

mod client;
pub mod conversions;
pub mod error;
pub mod schema;
mod store;

pub use client::create_client;
pub use store::DynamoDbStore;
