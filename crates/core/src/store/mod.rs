mod error;
#[cfg(any(test, feature = "inmemory"))]
mod inmemory;
mod traits;
mod types;

pub use error::{Result, StoreError};
#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryStore;
pub use traits::TableStore;
pub use types::{AttributeUpdate, IndexState, ResourceStatus, TableState};
