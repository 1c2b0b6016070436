//! The block linking pass and its data model.
//!
//! This module covers:
//! - [`types`]: value types, variable records and arena handles
//! - [`container`]: the arena that owns every variable of a session
//! - [`scope`]: the (type, name) resolution stack for one merge
//! - [`block`]: merge participants with materialized variable surfaces
//! - [`merger`]: the linking algorithm itself
//! - [`report`]: caller-side interface report and unbound-output checks

pub mod block;
pub mod container;
pub mod merger;
pub mod report;
pub mod scope;
pub mod types;

pub use block::BlockLinkInstance;
pub use container::Container;
pub use merger::{BlockMerger, LinkContext};
pub use report::MergedInterfaceReport;
pub use scope::ScopeSet;
pub use types::{ValueType, Variable, VariableId};

use anyhow::Result;

use crate::dsl::{BlockSetDsl, validate_block_set};

/// Result of linking a whole block set.
#[derive(Debug)]
pub struct LinkedBlockSet {
    pub merged: BlockLinkInstance,
    /// The participants, in the order they were linked. Their input fields
    /// carry the resolved source bindings.
    pub participants: Vec<BlockLinkInstance>,
}

/// Validate, materialize and link a block set in declaration order.
pub fn link_block_set(container: &mut Container, set: &BlockSetDsl) -> Result<LinkedBlockSet> {
    validate_block_set(set)?;

    let participants: Vec<BlockLinkInstance> = set
        .blocks
        .iter()
        .map(|block| BlockLinkInstance::from_dsl(container, block))
        .collect();

    let name = set
        .metadata
        .as_ref()
        .map(|m| m.name.clone())
        .unwrap_or_else(|| "merged".to_string());

    let ctx = LinkContext {
        name,
        block_instances: participants.clone(),
        inputs: set.inputs.clone(),
        outputs: set.outputs.clone(),
    };
    let merged = BlockMerger::new().link(container, &ctx);
    Ok(LinkedBlockSet {
        merged,
        participants,
    })
}
