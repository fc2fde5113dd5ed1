//! Records, values and table descriptors shared by every component.

mod error;
mod record;
mod table;
mod value;

pub use error::{RecordError, ValueError};
pub use record::{Item, ItemKey, KeyValue, Record};
pub use table::{
    AttributeType, BillingMode, IndexDescriptor, IndexProjection, KeyAttribute, TableDescriptor,
};
pub use value::{Decimal, TypedValue};
