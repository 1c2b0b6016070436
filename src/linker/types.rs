//! Core type definitions for the linker module.

use serde::{Deserialize, Serialize};

/// Shader value type carried by a variable. Scope resolution matches on
/// (type, name), so two variables only meet when both components agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    F32,
    I32,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
    Texture2D,
    Sampler,
    /// Owner instances (a block's input or output surface) rather than a
    /// wire value; never registered in scope.
    Struct,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::I32 => "i32",
            Self::Bool => "bool",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Mat4 => "mat4",
            Self::Texture2D => "texture2d",
            Self::Sampler => "sampler",
            Self::Struct => "struct",
        }
    }
}

/// Stable handle of a variable inside a [`Container`](super::Container).
///
/// Sources and sub-fields are stored as handles rather than references, so
/// the variable graph has no ownership cycles to worry about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(pub(crate) usize);

/// One typed, named value flowing through a merge.
///
/// Identity (type, name) is fixed at creation; `source`, `used`, `aliases`
/// and `fields` are the only parts that grow during linking.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub value_type: ValueType,
    pub attributes: Vec<String>,
    /// Alternate names this variable may be discovered under. Append-only.
    pub aliases: Vec<String>,
    /// Externally configurable; exempt from automatic same-name wiring.
    pub property: bool,
    /// True once anything reads or writes through this variable. Monotonic.
    pub used: bool,
    /// The variable this one is ultimately bound to, if any.
    pub source: Option<VariableId>,
    /// Sub-fields owned by this variable, in creation order.
    pub fields: Vec<VariableId>,
    pub parent: Option<VariableId>,
}
