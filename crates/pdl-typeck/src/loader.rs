//! Protocol document loading.
//!
//! One pass over the document: verify it declares a protocol, dispatch
//! each definition to its constructor in document order, then resolve the
//! PDU list. The first failure aborts the load; a partially built
//! protocol is never returned.

use pdl_ast::{Definition, Document};

use crate::error::{LoadError, TypeError};
use crate::protocol::Protocol;

/// Load a deserialized protocol document into a checked IR.
pub fn load(doc: &Document) -> Result<Protocol, TypeError> {
    if doc.construct != "Protocol" {
        return Err(TypeError::NotAProtocol { found: doc.construct.clone() });
    }
    let mut protocol = Protocol::new(&doc.name)?;
    for definition in &doc.definitions {
        match definition {
            Definition::BitString(def) => protocol.define_bit_string(def)?,
            Definition::Array(def) => protocol.define_array(def)?,
            Definition::Struct(def) => protocol.define_struct(def)?,
            Definition::Enum(def) => protocol.define_enum(def)?,
            Definition::NewType(def) => protocol.define_new_type(def)?,
            Definition::Function(def) => protocol.define_function(def)?,
            Definition::Context(def) => protocol.extend_context(def)?,
        }
    }
    let mut pdus = Vec::with_capacity(doc.pdus.len());
    for pdu in &doc.pdus {
        if protocol.get_type(&pdu.ty).is_none() {
            return Err(TypeError::UnknownPdu { name: pdu.ty.clone() });
        }
        pdus.push(pdu.ty.clone());
    }
    pdus.sort();
    pdus.dedup();
    protocol.set_pdus(pdus);
    Ok(protocol)
}

/// Deserialize a JSON value as a protocol document and load it.
pub fn load_value(value: serde_json::Value) -> Result<Protocol, LoadError> {
    let doc: Document = serde_json::from_value(value)?;
    Ok(load(&doc)?)
}

/// Parse a JSON string as a protocol document and load it.
pub fn load_str(input: &str) -> Result<Protocol, LoadError> {
    let doc: Document = serde_json::from_str(input)?;
    Ok(load(&doc)?)
}
