//! Schema registry - loads and indexes protocol definitions.
//!
//! The registry is built once at startup from the JSON schema document and
//! never mutated afterward. Decode calls share it by reference; there is no
//! global state.
//!
//! # Example
//!
//! ```
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
//! assert_eq!(registry.protocol(0x01).unwrap().name, "Ping");
//! assert!(registry.protocol(0x02).is_none());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::de::Error as _;
use serde::Deserialize;

use super::FieldSpec;
use crate::error::{Result, SerialwireError};

/// On-disk shape of the schema document.
///
/// Protocol entries stay untyped here so that a literal `meta` key under
/// `protocols` (which holds a field layout, not a protocol) can be skipped
/// before its shape is checked.
#[derive(Debug, Deserialize)]
struct SchemaDoc {
    meta: BTreeMap<String, FieldSpec>,
    protocols: BTreeMap<String, serde_json::Value>,
}

/// On-disk shape of one protocol definition.
#[derive(Debug, Deserialize)]
struct ProtocolDoc {
    name: String,
    length: usize,
    fields: BTreeMap<String, FieldSpec>,
}

/// One protocol definition: name, frame length, and field layout.
#[derive(Debug, Clone)]
pub struct Protocol {
    /// Human-readable protocol name.
    pub name: String,
    /// Declared frame size in bytes. Field extraction only sees the frame
    /// prefix of this length.
    pub length: usize,
    /// Field name → layout.
    pub fields: BTreeMap<String, FieldSpec>,
}

/// Immutable mapping from protocol identifier to [`Protocol`], plus the
/// shared meta layout applied to every frame.
///
/// Protocol identifiers are parsed from the hexadecimal string keys of the
/// document's `protocols` section. Duplicate keys that convert to the same
/// identifier are the schema author's responsibility: the last definition
/// wins, silently.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    meta: BTreeMap<String, FieldSpec>,
    protocols: HashMap<u16, Protocol>,
}

impl SchemaRegistry {
    /// Load the registry from a schema file.
    ///
    /// # Errors
    ///
    /// - [`SerialwireError::SchemaNotFound`] when the file does not exist
    /// - [`SerialwireError::SchemaFormat`] when the content is not a valid
    ///   schema document
    /// - [`SerialwireError::Io`] for other read failures
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SerialwireError::SchemaNotFound {
                    path: path.display().to_string(),
                    source,
                }
            } else {
                SerialwireError::Io(source)
            }
        })?;

        Self::from_json(&raw).map_err(|source| SerialwireError::SchemaFormat {
            path: path.display().to_string(),
            source,
        })
    }

    /// Build the registry from a schema document held in memory.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let doc: SchemaDoc = serde_json::from_str(json)?;

        let mut protocols = HashMap::with_capacity(doc.protocols.len());
        for (key, value) in doc.protocols {
            // Some schema documents repeat the meta section under
            // `protocols`; it is not a protocol.
            if key == "meta" {
                continue;
            }

            let id = parse_identifier(&key).ok_or_else(|| {
                serde_json::Error::custom(format!(
                    "protocol key {:?} is not a hexadecimal identifier",
                    key
                ))
            })?;

            let proto: ProtocolDoc = serde_json::from_value(value)?;
            protocols.insert(
                id,
                Protocol {
                    name: proto.name,
                    length: proto.length,
                    fields: proto.fields,
                },
            );
        }

        Ok(Self {
            meta: doc.meta,
            protocols,
        })
    }

    /// The meta field layout applied to every frame.
    pub fn meta(&self) -> &BTreeMap<String, FieldSpec> {
        &self.meta
    }

    /// Look up a protocol by its decoded identifier.
    pub fn protocol(&self, id: u16) -> Option<&Protocol> {
        self.protocols.get(&id)
    }

    /// Number of registered protocols.
    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    /// Whether no protocols are registered.
    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}

/// Parse a hexadecimal protocol identifier, with or without a `0x` prefix.
fn parse_identifier(key: &str) -> Option<u16> {
    let digits = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);

    u16::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "meta": {
            "command": {"byte": 0, "mask": "0xFF", "shift": 0},
            "flags":   {"byte": 0, "mask": "0x30", "shift": 4}
        },
        "protocols": {
            "0x01": { "name": "Ping", "length": 2,
                      "fields": { "seq": {"byte": 1, "mask": "0xFF", "shift": 0} } },
            "1A":   { "name": "Status", "length": 4,
                      "fields": { "level": {"byte": 2, "mask": "0x0F", "shift": 0} } }
        }
    }"#;

    #[test]
    fn test_from_json_builds_registry() {
        let registry = SchemaRegistry::from_json(SCHEMA).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.meta().len(), 2);

        let ping = registry.protocol(0x01).unwrap();
        assert_eq!(ping.name, "Ping");
        assert_eq!(ping.length, 2);
        assert!(ping.fields.contains_key("seq"));

        let status = registry.protocol(0x1A).unwrap();
        assert_eq!(status.name, "Status");
    }

    #[test]
    fn test_unknown_id_lookup() {
        let registry = SchemaRegistry::from_json(SCHEMA).unwrap();
        assert!(registry.protocol(0x02).is_none());
    }

    #[test]
    fn test_meta_key_under_protocols_is_skipped() {
        // The repeated meta section has field-layout shape, not protocol
        // shape; it must be skipped before its shape is checked.
        let registry = SchemaRegistry::from_json(
            r#"{
                "meta": {},
                "protocols": {
                    "meta": { "command": {"byte": 0, "mask": "0xFF", "shift": 0} },
                    "0x05": { "name": "Real", "length": 1, "fields": {} }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.protocol(0x05).unwrap().name, "Real");
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        // "01" and "0x01" both convert to identifier 1. BTreeMap iteration
        // is ordered, so "0x01" (sorting after "01") is inserted last.
        let registry = SchemaRegistry::from_json(
            r#"{
                "meta": {},
                "protocols": {
                    "01":   { "name": "First", "length": 1, "fields": {} },
                    "0x01": { "name": "Second", "length": 1, "fields": {} }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.protocol(0x01).unwrap().name, "Second");
    }

    #[test]
    fn test_non_hex_key_is_a_format_error() {
        let err = SchemaRegistry::from_json(
            r#"{
                "meta": {},
                "protocols": {
                    "ping": { "name": "Ping", "length": 1, "fields": {} }
                }
            }"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("ping"));
    }

    #[test]
    fn test_invalid_json_is_a_format_error() {
        assert!(SchemaRegistry::from_json("not json").is_err());
        assert!(SchemaRegistry::from_json(r#"{"meta": {}}"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SchemaRegistry::load("/nonexistent/protocols.json").unwrap_err();
        assert!(matches!(err, SerialwireError::SchemaNotFound { .. }));
        assert!(err.to_string().contains("/nonexistent/protocols.json"));
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCHEMA.as_bytes()).unwrap();

        let registry = SchemaRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_load_malformed_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ definitely not a schema").unwrap();

        let err = SchemaRegistry::load(file.path()).unwrap_err();
        assert!(matches!(err, SerialwireError::SchemaFormat { .. }));
    }
}
