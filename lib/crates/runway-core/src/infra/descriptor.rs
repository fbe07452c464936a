//! Pipeline descriptor loading.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::Descriptor;

/// Descriptor deployed when no custom file is configured.
pub const DEFAULT_DESCRIPTOR: &[u8] = include_bytes!("../../assets/descriptor.yml");

/// Load the descriptor from `path`, or the embedded default when `None`.
///
/// The bytes are not parsed; they are uploaded verbatim.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is empty.
pub fn load_descriptor(path: Option<&Path>) -> Result<Descriptor> {
    let Some(path) = path else {
        return Ok(Descriptor::new(DEFAULT_DESCRIPTOR));
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read descriptor {}", path.display()))?;
    anyhow::ensure!(!bytes.is_empty(), "descriptor {} is empty", path.display());
    Ok(Descriptor::new(bytes))
}
