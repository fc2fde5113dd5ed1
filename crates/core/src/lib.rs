//! Record ingestion and query engine for partition/sort-keyed attribute stores.
//!
//! This crate is the functional core: it types raw text, turns CSV/JSON input
//! into keyed records, plans and polls provisioning, builds read requests and
//! applies point mutations. The remote store sits behind [`store::TableStore`];
//! no vendor SDK types appear here.

pub mod ingest;
pub mod model;
pub mod mutation;
pub mod provisioning;
pub mod query;
pub mod store;
pub mod typing;
