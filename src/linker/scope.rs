//! Name resolution table for one merge pass.

use std::collections::HashMap;

use super::types::{ValueType, VariableId};

type ScopeKey = (ValueType, String);

/// Stack of (type, name) → variable tables.
///
/// `find` searches innermost frame first and requires both key components to
/// match exactly; there is no partial or fuzzy matching. `set` writes the
/// innermost frame, overwriting any previous entry for the same key: last
/// writer wins, matching output production order. One `ScopeSet` lives
/// exactly as long as one merge invocation.
#[derive(Debug)]
pub struct ScopeSet {
    frames: Vec<HashMap<ScopeKey, VariableId>>,
}

impl Default for ScopeSet {
    fn default() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }
}

impl ScopeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Drops the innermost frame. The root frame always stays.
    pub fn pop_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Most recently registered variable under exactly (type, name), or none.
    pub fn find(&self, value_type: ValueType, name: &str) -> Option<VariableId> {
        let key = (value_type, name.to_string());
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(&key).copied())
    }

    /// Register `id` under `name` in the innermost frame. Called once per
    /// output name and once per alias name.
    pub fn set(&mut self, id: VariableId, value_type: ValueType, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert((value_type, name.to_string()), id);
        }
    }
}
