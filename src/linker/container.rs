//! Arena that owns every variable created while building and linking blocks.

use std::ops::Index;

use super::types::{ValueType, Variable, VariableId};

/// Owns all [`Variable`]s of one linking session.
///
/// A merge result references variables in the container that produced it, so
/// feeding that result into a further merge only works against the same
/// container. Reads go through `container[id]`; mutation goes through the
/// explicit methods below so the append-only/monotonic rules hold.
#[derive(Debug, Default)]
pub struct Container {
    variables: Vec<Variable>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VariableId(i), v))
    }

    /// Create a free-standing variable with no owner.
    pub fn create_variable(
        &mut self,
        value_type: ValueType,
        name: &str,
        attributes: Vec<String>,
        property: bool,
    ) -> VariableId {
        let id = VariableId(self.variables.len());
        self.variables.push(Variable {
            name: name.to_string(),
            value_type,
            attributes,
            aliases: Vec::new(),
            property,
            used: false,
            source: None,
            fields: Vec::new(),
            parent: None,
        });
        id
    }

    /// Look up an already-created sub-field of `owner`. Matches on name
    /// alone; types are not compared here.
    pub fn find_field(&self, owner: VariableId, name: &str) -> Option<VariableId> {
        self[owner]
            .fields
            .iter()
            .copied()
            .find(|f| self[*f].name == name)
    }

    /// Create a new sub-field owned by `owner`.
    pub fn create_sub_field(
        &mut self,
        owner: VariableId,
        value_type: ValueType,
        name: &str,
        attributes: Vec<String>,
        property: bool,
    ) -> VariableId {
        let id = self.create_variable(value_type, name, attributes, property);
        self.variables[id.0].parent = Some(owner);
        self.variables[owner.0].fields.push(id);
        id
    }

    /// Register an alternate lookup name. Aliases accumulate and are never
    /// removed; the variable's own name and repeated aliases are skipped.
    pub fn add_alias(&mut self, id: VariableId, alias: &str) {
        let var = &mut self.variables[id.0];
        if var.name != alias && !var.aliases.iter().any(|a| a == alias) {
            var.aliases.push(alias.to_string());
        }
    }

    /// Bind this variable's value to come from `source`.
    pub fn set_source(&mut self, id: VariableId, source: VariableId) {
        self.variables[id.0].source = Some(source);
    }

    /// Flag the variable as read or written through linking. Never unset.
    pub fn mark_used(&mut self, id: VariableId) {
        self.variables[id.0].used = true;
    }

    /// Dotted `owner.field` path, for reports and logs.
    pub fn path(&self, id: VariableId) -> String {
        match self[id].parent {
            Some(parent) => format!("{}.{}", self.path(parent), self[id].name),
            None => self[id].name.clone(),
        }
    }
}

impl Index<VariableId> for Container {
    type Output = Variable;

    fn index(&self, id: VariableId) -> &Variable {
        &self.variables[id.0]
    }
}
