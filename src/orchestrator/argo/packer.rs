// src/orchestrator/argo/packer.rs

//! Decoding of compressed node status.
//!
//! Large workflows store `status.nodes` as gzip-compressed JSON, base64
//! encoded, in `status.compressedNodes`.

use std::collections::BTreeMap;
use std::io::Read;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::GzDecoder;

use crate::errors::{ReporterError, Result};

use super::model::NodeStatus;

/// Decode a `compressedNodes` payload back into the node map.
pub fn decompress_nodes(encoded: &str) -> Result<BTreeMap<String, NodeStatus>> {
    let compressed = STANDARD
        .decode(encoded.trim())
        .map_err(|err| ReporterError::DecodeError(format!("compressedNodes is not base64: {err}")))?;

    let mut json = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut json)
        .map_err(|err| ReporterError::DecodeError(format!("compressedNodes is not gzip: {err}")))?;

    serde_json::from_str(&json)
        .map_err(|err| ReporterError::DecodeError(format!("compressedNodes is not a node map: {err}")))
}
