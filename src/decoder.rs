//! Frame decoder - turns a raw frame into named field values.
//!
//! Decoding is a pure function over the frame bytes and the schema registry:
//! no state is retained between calls, and decoding the same bytes twice
//! yields identical results.
//!
//! # Example
//!
//! ```
//! use serialwire::decoder::{decode, UNKNOWN_PROTOCOL};
//! use serialwire::schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::from_json(r#"{
//!     "meta": { "command": {"byte": 0, "mask": "0xFF", "shift": 0} },
//!     "protocols": {
//!         "0x01": { "name": "Ping", "length": 2,
//!                   "fields": { "seq": {"byte": 1, "mask": "0xFF", "shift": 0} } }
//!     }
//! }"#).unwrap();
//!
//! let frame = decode(&[0x01, 0x07], &registry);
//! assert_eq!(frame.protocol, "Ping");
//! assert_eq!(frame.fields["seq"], 7);
//!
//! let frame = decode(&[0x02, 0x07], &registry);
//! assert_eq!(frame.protocol, UNKNOWN_PROTOCOL);
//! assert!(frame.fields.is_empty());
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::schema::{FieldSpec, SchemaRegistry};

/// Meta field carrying the protocol identifier.
pub const COMMAND_FIELD: &str = "command";

/// Protocol name reported for frames whose command is not in the registry.
///
/// An unknown command is a normal outcome, always delivered to the sink so
/// unexpected traffic stays observable.
pub const UNKNOWN_PROTOCOL: &str = "Unknown Protocol";

/// One decoded frame: protocol name plus field name → value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedFrame {
    /// Matched protocol name, or [`UNKNOWN_PROTOCOL`].
    pub protocol: String,
    /// Extracted field values. Empty for unknown protocols.
    pub fields: BTreeMap<String, u8>,
}

impl DecodedFrame {
    fn unknown() -> Self {
        Self {
            protocol: UNKNOWN_PROTOCOL.to_string(),
            fields: BTreeMap::new(),
        }
    }
}

/// Decode one frame against the registry.
///
/// Meta fields are extracted first; the `command` value selects the protocol,
/// whose fields are then extracted from the frame prefix of the protocol's
/// declared length. Meta fields are merged in last and win on name collision.
/// Fields whose byte offset falls outside the (truncated) frame are omitted,
/// never defaulted.
pub fn decode(frame: &[u8], registry: &SchemaRegistry) -> DecodedFrame {
    let meta = extract_fields(frame, registry.meta());

    let Some(&command) = meta.get(COMMAND_FIELD) else {
        return DecodedFrame::unknown();
    };
    let Some(protocol) = registry.protocol(u16::from(command)) else {
        return DecodedFrame::unknown();
    };

    // Only the declared-length prefix is visible to protocol fields, even
    // when the physical frame is longer.
    let visible = &frame[..frame.len().min(protocol.length)];
    let mut fields = extract_fields(visible, &protocol.fields);
    fields.extend(meta);

    DecodedFrame {
        protocol: protocol.name.clone(),
        fields,
    }
}

fn extract_fields(frame: &[u8], layout: &BTreeMap<String, FieldSpec>) -> BTreeMap<String, u8> {
    layout
        .iter()
        .filter_map(|(name, spec)| spec.extract(frame).map(|value| (name.clone(), value)))
        .collect()
}
