//! Merge participants: a block plus its materialized variable surfaces.

use super::container::Container;
use super::types::{ValueType, VariableId};
use crate::dsl::{BlockDsl, VariableDsl};

/// One participant in a merge: the block's name plus two owner variables
/// whose sub-fields are the block's declared inputs and outputs.
///
/// The merge result is itself a `BlockLinkInstance`, which is what makes
/// re-merging an already-merged block possible.
#[derive(Debug, Clone)]
pub struct BlockLinkInstance {
    pub block_name: String,
    pub input_instance: VariableId,
    pub output_instance: VariableId,
}

impl BlockLinkInstance {
    /// Fresh, empty surfaces. Used for the merge accumulation target.
    pub fn empty(container: &mut Container, name: &str) -> Self {
        let input_instance = container.create_variable(
            ValueType::Struct,
            &format!("{name}_inputs"),
            Vec::new(),
            false,
        );
        let output_instance = container.create_variable(
            ValueType::Struct,
            &format!("{name}_outputs"),
            Vec::new(),
            false,
        );
        Self {
            block_name: name.to_string(),
            input_instance,
            output_instance,
        }
    }

    /// Materialize a block description into container variables.
    pub fn from_dsl(container: &mut Container, block: &BlockDsl) -> Self {
        let instance = Self::empty(container, &block.name);
        for input in &block.inputs {
            add_field(container, instance.input_instance, input);
        }
        for output in &block.outputs {
            add_field(container, instance.output_instance, output);
        }
        instance
    }

    pub fn input_fields(&self, container: &Container) -> Vec<VariableId> {
        container[self.input_instance].fields.clone()
    }

    pub fn output_fields(&self, container: &Container) -> Vec<VariableId> {
        container[self.output_instance].fields.clone()
    }
}

fn add_field(container: &mut Container, owner: VariableId, var: &VariableDsl) -> VariableId {
    let id = container.create_sub_field(
        owner,
        var.value_type,
        &var.name,
        var.attributes.clone(),
        var.property,
    );
    for alias in &var.aliases {
        container.add_alias(id, alias);
    }
    id
}
