//! Repository layer — database operations for document records.
//!
//! Every function takes a caller-held `&Connection` as its unit of work and
//! commits at statement granularity. "Not found" is an `Ok(None)`, never an
//! error; only infrastructure failures surface as `Err`.

mod document;

pub use document::*;
