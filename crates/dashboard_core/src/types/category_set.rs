//! User-editable category assignment

use log::warn;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

use super::workflow::{WorkflowId, WorkflowRecord};

/// Ordered mapping of category name to an ordered list of workflow ids.
///
/// Category order is insertion order and survives serialization, since the
/// JSON form is an object whose key order is the category order. A workflow
/// id is held by at most one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    buckets: Vec<(String, Vec<WorkflowId>)>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from `(name, members)` pairs.
    ///
    /// Repeated names are merged into the first occurrence and an id that
    /// already belongs to an earlier category is dropped.
    pub fn from_buckets<I, N, T>(buckets: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<T>)>,
        N: Into<String>,
        T: Into<WorkflowId>,
    {
        let mut set = CategorySet::new();
        let mut seen: HashSet<WorkflowId> = HashSet::new();
        for (name, members) in buckets {
            let name = name.into();
            let bucket = set.bucket_entry(&name);
            for id in members {
                let id = id.into();
                if seen.insert(id.clone()) {
                    bucket.push(id);
                } else {
                    warn!("Dropping duplicate assignment of workflow {} to {}", id, name);
                }
            }
        }
        set
    }

    /// Default assignment: one category per parsed group, in first-seen order.
    ///
    /// The category level of the naming convention is collapsed so the seeded
    /// list stays flat and easy to edit.
    pub fn seed_from_workflows(workflows: &[WorkflowRecord]) -> Self {
        CategorySet::from_buckets(
            workflows
                .iter()
                .map(|workflow| (workflow.parsed_name().group, vec![workflow.id.clone()])),
        )
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// True when at least one category holds a workflow
    pub fn has_members(&self) -> bool {
        self.buckets.iter().any(|(_, members)| !members.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&[WorkflowId]> {
        self.position(name)
            .map(|index| self.buckets[index].1.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WorkflowId])> {
        self.buckets
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    /// Name of the category currently holding `id`
    pub fn category_of(&self, id: &WorkflowId) -> Option<&str> {
        self.buckets
            .iter()
            .find(|(_, members)| members.iter().any(|member| member.as_str() == id.as_str()))
            .map(|(name, _)| name.as_str())
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.buckets.iter().position(|(existing, _)| existing == name)
    }

    /// Members of `name`, creating an empty category at the end if needed
    pub(crate) fn bucket_entry(&mut self, name: &str) -> &mut Vec<WorkflowId> {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                self.buckets.push((name.to_string(), Vec::new()));
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[index].1
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Vec<WorkflowId>> {
        self.position(name)
            .map(|index| self.buckets.remove(index).1)
    }

    pub(crate) fn rename_at(&mut self, index: usize, name: String) {
        self.buckets[index].0 = name;
    }

    /// Removes `id` from every category
    pub(crate) fn detach(&mut self, id: &WorkflowId) {
        for (_, members) in &mut self.buckets {
            members.retain(|member| member.as_str() != id.as_str());
        }
    }
}

impl Serialize for CategorySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (name, members) in &self.buckets {
            map.serialize_entry(name, members)?;
        }
        map.end()
    }
}

struct CategorySetVisitor;

impl<'de> Visitor<'de> for CategorySetVisitor {
    type Value = CategorySet;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of category names to workflow id lists")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut buckets: Vec<(String, Vec<WorkflowId>)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, members)) = access.next_entry::<String, Vec<WorkflowId>>()? {
            buckets.push((name, members));
        }
        Ok(CategorySet::from_buckets(buckets))
    }
}

impl<'de> Deserialize<'de> for CategorySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CategorySetVisitor)
    }
}
