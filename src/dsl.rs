//! JSON description of a link job: the blocks to merge, their declared
//! variables, and the pipeline-level inputs and outputs.

use std::collections::HashSet;

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::linker::types::ValueType;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BlockSetDsl {
    pub version: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    pub blocks: Vec<BlockDsl>,
    /// Pipeline-level inputs, visible to every block by reference name.
    #[serde(default)]
    pub inputs: Vec<VariableDsl>,
    /// Pipeline-level outputs, bound to the last producing block if any.
    #[serde(default)]
    pub outputs: Vec<VariableDsl>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BlockDsl {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<VariableDsl>,
    #[serde(default)]
    pub outputs: Vec<VariableDsl>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VariableDsl {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Externally configurable value; exempt from automatic same-name wiring.
    #[serde(default)]
    pub property: bool,
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Alternate names this variable may be discovered under during
    /// resolution.
    #[serde(default)]
    pub aliases: Vec<String>,
}

pub fn find_block<'a>(set: &'a BlockSetDsl, name: &str) -> Result<&'a BlockDsl> {
    set.blocks
        .iter()
        .find(|b| b.name == name)
        .ok_or_else(|| anyhow!("block not found: {name}"))
}

/// Structural validation of a block set before linking. Linking itself is
/// total, so everything that should be rejected is rejected here.
pub fn validate_block_set(set: &BlockSetDsl) -> Result<()> {
    let mut seen_blocks: HashSet<&str> = HashSet::new();
    for block in &set.blocks {
        if block.name.is_empty() {
            bail!("block with empty name");
        }
        if !seen_blocks.insert(block.name.as_str()) {
            bail!("duplicate block name: {}", block.name);
        }
        check_fields(&block.name, "input", &block.inputs)?;
        check_fields(&block.name, "output", &block.outputs)?;
    }
    check_fields("<pipeline>", "input", &set.inputs)?;
    check_fields("<pipeline>", "output", &set.outputs)?;
    Ok(())
}

fn check_fields(owner: &str, direction: &str, fields: &[VariableDsl]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for field in fields {
        if field.name.is_empty() {
            bail!("{owner}: {direction} with empty name");
        }
        if !seen.insert(field.name.as_str()) {
            bail!("{owner}: duplicate {direction} name: {}", field.name);
        }
        if field.aliases.iter().any(|a| a.is_empty()) {
            bail!("{owner}: {direction} {} has an empty alias", field.name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, value_type: ValueType) -> VariableDsl {
        VariableDsl {
            name: name.to_string(),
            value_type,
            property: false,
            attributes: Vec::new(),
            aliases: Vec::new(),
        }
    }

    #[test]
    fn test_parse_minimal_block_set() {
        let json = r#"{
            "version": "1.0",
            "blocks": [
                {
                    "name": "Surface",
                    "inputs": [{ "name": "uv", "type": "vec2" }],
                    "outputs": [
                        { "name": "albedo", "type": "vec3", "aliases": ["baseColor"] },
                        { "name": "tint", "type": "vec4", "property": true }
                    ]
                }
            ],
            "outputs": [{ "name": "albedo", "type": "vec3" }]
        }"#;
        let set: BlockSetDsl = serde_json::from_str(json).unwrap();
        assert_eq!(set.blocks.len(), 1);
        let block = find_block(&set, "Surface").unwrap();
        assert_eq!(block.inputs[0].value_type, ValueType::Vec2);
        assert_eq!(block.outputs[0].aliases, vec!["baseColor".to_string()]);
        assert!(block.outputs[1].property);
        assert!(set.inputs.is_empty());
        validate_block_set(&set).unwrap();
    }

    #[test]
    fn test_validate_rejects_duplicate_block_names() {
        let set = BlockSetDsl {
            version: "1.0".to_string(),
            metadata: None,
            blocks: vec![
                BlockDsl {
                    name: "A".to_string(),
                    inputs: vec![],
                    outputs: vec![],
                },
                BlockDsl {
                    name: "A".to_string(),
                    inputs: vec![],
                    outputs: vec![],
                },
            ],
            inputs: vec![],
            outputs: vec![],
        };
        let err = validate_block_set(&set).unwrap_err();
        assert!(err.to_string().contains("duplicate block name"));
    }

    #[test]
    fn test_validate_rejects_duplicate_field_names_in_one_direction() {
        let set = BlockSetDsl {
            version: "1.0".to_string(),
            metadata: None,
            blocks: vec![BlockDsl {
                name: "A".to_string(),
                inputs: vec![var("x", ValueType::F32), var("x", ValueType::Vec3)],
                outputs: vec![],
            }],
            inputs: vec![],
            outputs: vec![],
        };
        assert!(validate_block_set(&set).is_err());
    }

    #[test]
    fn test_validate_allows_same_name_across_directions() {
        let set = BlockSetDsl {
            version: "1.0".to_string(),
            metadata: None,
            blocks: vec![BlockDsl {
                name: "A".to_string(),
                inputs: vec![var("color", ValueType::Vec3)],
                outputs: vec![var("color", ValueType::Vec3)],
            }],
            inputs: vec![],
            outputs: vec![],
        };
        validate_block_set(&set).unwrap();
    }

    #[test]
    fn test_find_block_missing() {
        let set = BlockSetDsl {
            version: "1.0".to_string(),
            metadata: None,
            blocks: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        assert!(find_block(&set, "nope").is_err());
    }
}
