//! Project input records: panels, circuits, wire segments and wirepaths.

pub mod schema;

pub use schema::*;
