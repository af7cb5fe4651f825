//! The variable store shared by every statement of a compiled script.
//!
//! Variables are declared once in the DECLARE section and live in a single
//! [`VariableStore`] owned by the [`CompiledScript`](crate::CompiledScript).
//! Statements that write results hold a [`VarId`] slot handle instead of a
//! copy of the store, so a value written by one statement is visible to the
//! caller (and to anything reading the store) after it runs.

use std::collections::{BTreeMap, HashMap};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Handle to one variable slot in a [`VariableStore`].
///
/// A `VarId` is only meaningful for the store that issued it (or a clone of
/// that store). Passing it to another store addresses an unrelated slot, or
/// panics if that store has fewer slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    slots: Vec<(String, String)>,
    index: HashMap<String, VarId>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` with an initial value.
    ///
    /// Redeclaring a name keeps its slot and overwrites the value, so the
    /// last declaration wins.
    pub fn declare(&mut self, name: impl Into<String>, value: impl Into<String>) -> VarId {
        let name = name.into();
        let value = value.into();
        if let Some(&id) = self.index.get(&name) {
            self.slots[id.0].1 = value;
            return id;
        }
        let id = VarId(self.slots.len());
        self.index.insert(name.clone(), id);
        self.slots.push((name, value));
        id
    }

    pub fn lookup(&self, name: &str) -> Option<VarId> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|id| self.value(id))
    }

    /// # Panics
    ///
    /// If `id` was issued by a smaller store.
    pub fn value(&self, id: VarId) -> &str {
        &self.slots[id.0].1
    }

    /// # Panics
    ///
    /// If `id` was issued by a smaller store.
    pub fn name(&self, id: VarId) -> &str {
        &self.slots[id.0].0
    }

    /// Overwrites the slot `id` refers to.
    ///
    /// # Panics
    ///
    /// If `id` was issued by a smaller store.
    pub fn set(&mut self, id: VarId, value: impl Into<String>) {
        self.slots[id.0].1 = value.into();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.slots.iter().cloned().collect()
    }
}

impl Serialize for VariableStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (name, value) in &self.slots {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
