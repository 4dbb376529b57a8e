//! fieldbind - declarative field validation and record binding
//!
//! - `fields`: typed fields, rule pipelines and the type registry
//! - `model`: named field sets bound to a store collection
//! - `store`: the async document store contract and an in-memory backend
//! - `cli`: the `fieldbind` command line

pub mod cli;
pub mod fields;
pub mod model;
pub mod store;
