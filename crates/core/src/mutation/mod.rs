//! Point mutations: insert, conditional update, delete, and streaming loads.

mod engine;
mod error;
mod vocabulary;

pub use engine::{Ack, LoadReport, MutationEngine, Rejection, UpdateOutcome};
pub use error::{LoadError, MutationError, Result};
pub use vocabulary::Vocabulary;
