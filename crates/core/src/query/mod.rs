//! Read-side request construction.
//!
//! [`build_request`] validates a [`QuerySpec`] and produces a
//! [`RemoteRequest`]. Every parameter problem surfaces here, before the store
//! is contacted.

mod builder;
mod condition;
mod error;
mod expression;
mod request;

pub use builder::{build_request, AccessPattern, QuerySpec};
pub use condition::{Comparator, Comparison, Condition};
pub use error::{QueryError, Result};
pub use expression::{ExpressionBuilder, Expressions};
pub use request::{Projection, QueryRequest, RemoteRequest, ScanRequest};
