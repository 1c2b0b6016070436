//! The linking pass: resolves every block input against previously produced
//! outputs and synthesizes the merged block's input/output surfaces.
//!
//! Linking is total. An input that cannot be matched (or that is a property
//! and must not be) is promoted to a new merged input, so the pass always
//! succeeds structurally. The one soft failure (a pipeline output nothing
//! wrote to) is surfaced as an unbound field and left for the caller to
//! judge (see [`report`](super::report)).

use log::{debug, trace};

use super::block::BlockLinkInstance;
use super::container::Container;
use super::scope::ScopeSet;
use super::types::VariableId;
use crate::dsl::VariableDsl;

/// Everything one merge invocation consumes: the participants in resolution
/// order plus the pipeline-level input/output declarations.
#[derive(Debug, Clone, Default)]
pub struct LinkContext {
    /// Name of the merged block. Prefixes promoted variable names if this
    /// result participates in a later merge.
    pub name: String,
    /// Participants in resolution order. A block only ever sees outputs of
    /// the blocks before it.
    pub block_instances: Vec<BlockLinkInstance>,
    /// Pipeline-level inputs, visible to every block by reference name.
    pub inputs: Vec<VariableDsl>,
    /// Pipeline-level outputs, bound to the last producer if any.
    pub outputs: Vec<VariableDsl>,
}

/// Composite variable name for fields promoted or surfaced onto the merged
/// block on behalf of `block_name`.
pub fn build_variable_name(block_name: &str, field_name: &str) -> String {
    format!("{block_name}_{field_name}")
}

/// Runs the linking pass. Stateless: every [`link`](BlockMerger::link) call
/// owns a fresh scope set and merged instance, so calls are re-entrant as
/// long as each uses its own container exclusively.
#[derive(Debug, Default)]
pub struct BlockMerger;

impl BlockMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn link(&self, container: &mut Container, ctx: &LinkContext) -> BlockLinkInstance {
        let mut scopes = ScopeSet::new();
        let merged = BlockLinkInstance::empty(container, &ctx.name);

        self.setup_inputs(container, &mut scopes, &ctx.inputs, &merged);
        for instance in &ctx.block_instances {
            self.link_block_inputs(container, &mut scopes, &merged, instance);
            self.link_block_outputs(container, &mut scopes, &merged, instance);
        }
        self.link_final_outputs(container, &scopes, &ctx.outputs, &merged);
        merged
    }

    /// Seed the merged input surface with the pipeline-level inputs so the
    /// first block that needs one can resolve it by reference name.
    fn setup_inputs(
        &self,
        container: &mut Container,
        scopes: &mut ScopeSet,
        inputs: &[VariableDsl],
        merged: &BlockLinkInstance,
    ) {
        for input in inputs {
            let id = container.create_sub_field(
                merged.input_instance,
                input.value_type,
                &input.name,
                input.attributes.clone(),
                input.property,
            );
            for alias in &input.aliases {
                container.add_alias(id, alias);
            }
            scopes.set(id, input.value_type, &input.name);
            trace!("seeded pipeline input {} ({})", input.name, input.value_type.name());
        }
    }

    /// First-match-in-declared-order search: the field's own name first,
    /// then each alias. Returns the hit and the name it was found under.
    fn find_match(
        &self,
        container: &Container,
        scopes: &ScopeSet,
        field: VariableId,
    ) -> Option<(VariableId, String)> {
        let var = &container[field];
        if let Some(hit) = scopes.find(var.value_type, &var.name) {
            return Some((hit, var.name.clone()));
        }
        for alias in &var.aliases {
            if let Some(hit) = scopes.find(var.value_type, alias) {
                return Some((hit, alias.clone()));
            }
        }
        None
    }

    /// Reuse an existing same-named field on `owner` (duplicate blocks
    /// collapse here) or create one copying the template's type, attributes
    /// and property flag.
    fn find_or_create_field(
        &self,
        container: &mut Container,
        owner: VariableId,
        template: VariableId,
        name: &str,
    ) -> VariableId {
        if let Some(existing) = container.find_field(owner, name) {
            return existing;
        }
        let (value_type, attributes, property) = {
            let template = &container[template];
            (
                template.value_type,
                template.attributes.clone(),
                template.property,
            )
        };
        container.create_sub_field(owner, value_type, name, attributes, property)
    }

    fn link_block_inputs(
        &self,
        container: &mut Container,
        scopes: &mut ScopeSet,
        merged: &BlockLinkInstance,
        instance: &BlockLinkInstance,
    ) {
        for input in instance.input_fields(container) {
            let is_property = container[input].property;

            // Properties represent externally configurable values; a local
            // output of the same name must not silently absorb them.
            let matched = if is_property {
                None
            } else {
                self.find_match(container, scopes, input)
            };

            let source = match matched {
                Some((hit, via)) => {
                    debug!(
                        "{}.{} <- {} (matched as {via})",
                        instance.block_name,
                        container[input].name,
                        container.path(hit),
                    );
                    hit
                }
                None => {
                    // Promote to a merged input. Properties keep their own
                    // name; everything else gets a block-qualified one plus
                    // the original name as alias so a later merge of this
                    // result can still resolve it.
                    let input_name = container[input].name.clone();
                    let promoted_name = if is_property {
                        input_name.clone()
                    } else {
                        build_variable_name(&instance.block_name, &input_name)
                    };
                    let promoted = self.find_or_create_field(
                        container,
                        merged.input_instance,
                        input,
                        &promoted_name,
                    );
                    if !is_property {
                        container.add_alias(promoted, &input_name);
                    }
                    debug!(
                        "{}.{input_name} promoted to merged input {promoted_name}",
                        instance.block_name,
                    );
                    promoted
                }
            };

            container.mark_used(source);
            container.mark_used(input);
            container.set_source(input, source);
        }
    }

    fn link_block_outputs(
        &self,
        container: &mut Container,
        scopes: &mut ScopeSet,
        merged: &BlockLinkInstance,
        instance: &BlockLinkInstance,
    ) {
        for output in instance.output_fields(container) {
            let (value_type, name, aliases) = {
                let var = &container[output];
                (var.value_type, var.name.clone(), var.aliases.clone())
            };

            // Later blocks' inputs resolve against the block's own output.
            scopes.set(output, value_type, &name);

            // Always surface the output on the merged block; a later merge
            // or an external consumer may still want it.
            let surfaced_name = build_variable_name(&instance.block_name, &name);
            let surfaced =
                self.find_or_create_field(container, merged.output_instance, output, &surfaced_name);
            container.set_source(surfaced, output);
            container.mark_used(surfaced);
            container.mark_used(output);

            // Propagate the original name and every alias onto the surfaced
            // field, and make each alias resolvable in this merge too.
            container.add_alias(surfaced, &name);
            for alias in &aliases {
                container.add_alias(surfaced, alias);
                scopes.set(output, value_type, alias);
            }
            trace!("surfaced {}.{name} as {surfaced_name}", instance.block_name);
        }
    }

    /// Pipeline outputs bind by reference name only; alias fallback does not
    /// apply at this final stage. An unwritten output stays unbound.
    fn link_final_outputs(
        &self,
        container: &mut Container,
        scopes: &ScopeSet,
        outputs: &[VariableDsl],
        merged: &BlockLinkInstance,
    ) {
        for output in outputs {
            let id = container.create_sub_field(
                merged.output_instance,
                output.value_type,
                &output.name,
                output.attributes.clone(),
                output.property,
            );
            for alias in &output.aliases {
                container.add_alias(id, alias);
            }
            match scopes.find(output.value_type, &output.name) {
                Some(producer) => {
                    container.set_source(id, producer);
                    container.mark_used(id);
                    container.mark_used(producer);
                    debug!("pipeline output {} <- {}", output.name, container.path(producer));
                }
                None => {
                    debug!("pipeline output {} has no producer", output.name);
                }
            }
        }
    }
}
