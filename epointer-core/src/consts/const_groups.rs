//! Grouping of qualifying constants by their named type.
//!
//! Types keep the order in which their first qualifying constant was seen;
//! constants keep source order within their type. Nothing is sorted.

use std::collections::HashMap;

use serde::Serialize;

use super::const_resolver::ResolvedSpec;
use crate::oracle::NamedType;

/// A named type and the constants declared with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeGroup {
    pub type_name: NamedType,
    pub constants: Vec<String>,
}

/// Insertion-ordered mapping from type to [`TypeGroup`].
#[derive(Debug, Clone, Default)]
pub struct TypeGroups {
    groups: Vec<TypeGroup>,
    index: HashMap<NamedType, usize>,
}

impl TypeGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a constant, creating its type's group on first encounter.
    pub fn insert(&mut self, type_name: &NamedType, constant: &str) {
        let idx = match self.index.get(type_name) {
            Some(&idx) => idx,
            None => {
                self.groups.push(TypeGroup {
                    type_name: type_name.clone(),
                    constants: Vec::new(),
                });
                self.index.insert(type_name.clone(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[idx].constants.push(constant.to_string());
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeGroup> {
        self.index
            .get(&NamedType::new(type_name))
            .map(|&idx| &self.groups[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Type names in output order.
    pub fn type_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.type_name.as_str()).collect()
    }

    /// Total number of grouped constants.
    pub fn constant_count(&self) -> usize {
        self.groups.iter().map(|g| g.constants.len()).sum()
    }

    pub fn as_slice(&self) -> &[TypeGroup] {
        &self.groups
    }
}

impl<'a> IntoIterator for &'a TypeGroups {
    type Item = &'a TypeGroup;
    type IntoIter = std::slice::Iter<'a, TypeGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Groups qualifying, emitted specs by type, in encounter order.
pub fn group_by_type(resolved: &[ResolvedSpec]) -> TypeGroups {
    let mut groups = TypeGroups::new();
    for spec in resolved.iter().filter(|r| r.qualifies && r.emit) {
        if let Some(named) = spec.ty.as_named() {
            groups.insert(named, &spec.name);
        }
    }
    groups
}
