//! Schema module - protocol definitions and field layouts.
//!
//! The schema is an external JSON document describing every protocol the
//! device can emit:
//!
//! ```text
//! {
//!   "meta":      { "<field>": {"byte": 0, "mask": "0xFF", "shift": 0}, ... },
//!   "protocols": {
//!     "<hex id>": { "name": "...", "length": N,
//!                   "fields": { "<field>": {"byte": ..., "mask": "...", "shift": ...} } },
//!     ...
//!   }
//! }
//! ```
//!
//! [`SchemaRegistry::load`] parses the document once at startup into an
//! immutable registry that every decode call reads by shared reference.

mod field;
mod registry;

pub use field::FieldSpec;
pub use registry::{Protocol, SchemaRegistry};
