//! Property tests over generated block sets: linking is total (every input
//! ends up bound) and the used flag tracks source references exactly.

use block_forge::{
    dsl::{BlockDsl, BlockSetDsl, VariableDsl},
    linker::{self, Container, ValueType},
};
use proptest::prelude::*;

const NAME_POOL: &[&str] = &["albedo", "normal", "uv", "fog", "depth", "tint", "shadow"];

fn value_type() -> impl Strategy<Value = ValueType> {
    prop::sample::select(vec![
        ValueType::F32,
        ValueType::Vec2,
        ValueType::Vec3,
        ValueType::Vec4,
    ])
}

/// Up to four uniquely named fields drawn from the shared name pool, so
/// cross-block name collisions (the interesting case) are frequent.
fn fields() -> impl Strategy<Value = Vec<VariableDsl>> {
    prop::sample::subsequence(NAME_POOL.to_vec(), 0..=4).prop_flat_map(|names| {
        let len = names.len();
        (
            Just(names),
            prop::collection::vec((value_type(), any::<bool>()), len),
        )
            .prop_map(|(names, meta)| {
                names
                    .into_iter()
                    .zip(meta)
                    .map(|(name, (value_type, property))| VariableDsl {
                        name: name.to_string(),
                        value_type,
                        property,
                        attributes: Vec::new(),
                        aliases: Vec::new(),
                    })
                    .collect()
            })
    })
}

fn block_set() -> impl Strategy<Value = BlockSetDsl> {
    (
        prop::collection::vec((fields(), fields()), 1..=4),
        fields(),
        fields(),
    )
        .prop_map(|(blocks, inputs, outputs)| BlockSetDsl {
            version: "1.0".to_string(),
            metadata: None,
            blocks: blocks
                .into_iter()
                .enumerate()
                .map(|(i, (inputs, outputs))| BlockDsl {
                    name: format!("block{i}"),
                    inputs,
                    outputs,
                })
                .collect(),
            inputs,
            outputs,
        })
}

proptest! {
    #[test]
    fn every_block_input_ends_up_bound(set in block_set()) {
        let mut container = Container::new();
        let linked = linker::link_block_set(&mut container, &set).unwrap();

        for participant in &linked.participants {
            for input in participant.input_fields(&container) {
                prop_assert!(container[input].source.is_some());
                prop_assert!(container[input].used);
            }
        }
    }

    #[test]
    fn used_flag_tracks_source_references(set in block_set()) {
        let mut container = Container::new();
        linker::link_block_set(&mut container, &set).unwrap();

        for (_, variable) in container.iter() {
            if let Some(source) = variable.source {
                prop_assert!(
                    container[source].used,
                    "{} is referenced as a source but not marked used",
                    container.path(source)
                );
            }
        }
    }

    #[test]
    fn properties_never_bind_to_block_outputs(set in block_set()) {
        let mut container = Container::new();
        let linked = linker::link_block_set(&mut container, &set).unwrap();

        // A property input's source always lives on the merged input
        // surface, never on some block's output surface. (It may share a
        // field with a same-named pipeline input; name collapse is by
        // design.)
        for participant in &linked.participants {
            for input in participant.input_fields(&container) {
                let var = &container[input];
                if var.property {
                    let source = var.source.unwrap();
                    prop_assert_eq!(
                        container[source].parent,
                        Some(linked.merged.input_instance)
                    );
                }
            }
        }
    }

    #[test]
    fn surfaced_outputs_cover_every_block_output(set in block_set()) {
        let mut container = Container::new();
        let linked = linker::link_block_set(&mut container, &set).unwrap();

        for participant in &linked.participants {
            for output in participant.output_fields(&container) {
                let name = format!("{}_{}", participant.block_name, container[output].name);
                let surfaced = container
                    .find_field(linked.merged.output_instance, &name)
                    .unwrap();
                prop_assert_eq!(container[surfaced].source, Some(output));
            }
        }
    }
}
