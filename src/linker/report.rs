//! Caller-side view of a merge result.
//!
//! The linking pass leaves a pipeline output nothing wrote to unbound rather
//! than failing; whether that is fatal is this layer's (i.e. the caller's)
//! decision.

use anyhow::{Result, bail};
use serde::Serialize;

use super::block::BlockLinkInstance;
use super::container::Container;
use super::types::{ValueType, VariableId};

#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub property: bool,
    pub used: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Dotted path of the bound source, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MergedInterfaceReport {
    pub block: String,
    pub inputs: Vec<FieldReport>,
    pub outputs: Vec<FieldReport>,
}

impl MergedInterfaceReport {
    pub fn build(container: &Container, merged: &BlockLinkInstance) -> Self {
        Self {
            block: merged.block_name.clone(),
            inputs: field_reports(container, merged.input_instance),
            outputs: field_reports(container, merged.output_instance),
        }
    }
}

fn field_reports(container: &Container, owner: VariableId) -> Vec<FieldReport> {
    container[owner]
        .fields
        .iter()
        .map(|id| {
            let var = &container[*id];
            FieldReport {
                name: var.name.clone(),
                value_type: var.value_type,
                property: var.property,
                used: var.used,
                aliases: var.aliases.clone(),
                source: var.source.map(|s| container.path(s)),
            }
        })
        .collect()
}

/// Names of merged output fields nothing wrote to. Surfaced block outputs
/// are always bound, so anything listed here is an unwritten pipeline
/// output.
pub fn unbound_outputs(container: &Container, merged: &BlockLinkInstance) -> Vec<String> {
    container[merged.output_instance]
        .fields
        .iter()
        .filter(|id| container[**id].source.is_none())
        .map(|id| container[*id].name.clone())
        .collect()
}

/// Bails if any pipeline output was never written.
pub fn ensure_outputs_bound(container: &Container, merged: &BlockLinkInstance) -> Result<()> {
    let unbound = unbound_outputs(container, merged);
    if !unbound.is_empty() {
        bail!(
            "merged block {} has unbound outputs: {}",
            merged.block_name,
            unbound.join(", ")
        );
    }
    Ok(())
}
