//! Categorization engine
//!
//! Merges the workflow listing with the stored category assignment into a
//! [`RenderModel`]. A stored assignment with at least one member selects
//! custom mode; anything else falls back to the naming convention.

use icu_collator::{Collator, CollatorOptions, Strength};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::name_parser::UNCATEGORIZED;
use crate::types::{CategorySet, WorkflowRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Buckets come from the stored category assignment
    Custom,
    /// Buckets come from the naming convention
    Auto,
}

/// What custom mode does with workflows no stored category mentions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedPolicy {
    /// Show them in an `Uncategorized` bucket
    #[default]
    Collect,
    /// Leave them off the dashboard
    Hide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowEntry {
    pub display_name: String,
    pub workflow: WorkflowRecord,
}

impl WorkflowEntry {
    fn from_record(workflow: &WorkflowRecord) -> Self {
        Self {
            display_name: workflow.parsed_name().display_name,
            workflow: workflow.clone(),
        }
    }
}

/// Named sub-bucket. Custom mode emits a single unnamed section per bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: Option<String>,
    pub entries: Vec<WorkflowEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub name: String,
    pub sections: Vec<Section>,
}

impl Bucket {
    pub fn entries(&self) -> impl Iterator<Item = &WorkflowEntry> {
        self.sections.iter().flat_map(|section| section.entries.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|section| section.entries.is_empty())
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.name.as_deref() == Some(name))
    }
}

/// Derived dashboard hierarchy, rebuilt on every resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    pub mode: RenderMode,
    pub buckets: Vec<Bucket>,
}

impl RenderModel {
    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|bucket| bucket.name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &WorkflowEntry> {
        self.buckets.iter().flat_map(|bucket| bucket.entries())
    }

    pub fn workflow_count(&self) -> usize {
        self.entries().count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategorizationEngine {
    unassigned: UnassignedPolicy,
}

impl CategorizationEngine {
    pub fn new(unassigned: UnassignedPolicy) -> Self {
        Self { unassigned }
    }

    pub fn resolve(&self, workflows: &[WorkflowRecord], stored: Option<&CategorySet>) -> RenderModel {
        match stored {
            Some(set) if set.has_members() => self.resolve_custom(workflows, set),
            _ => resolve_auto(workflows),
        }
    }

    fn resolve_custom(&self, workflows: &[WorkflowRecord], set: &CategorySet) -> RenderModel {
        let by_id: HashMap<&str, &WorkflowRecord> = workflows
            .iter()
            .map(|workflow| (workflow.id.as_str(), workflow))
            .collect();
        let mut assigned: HashSet<&str> = HashSet::new();

        let mut buckets: Vec<Bucket> = set
            .iter()
            .map(|(name, members)| {
                let entries = members
                    .iter()
                    .filter_map(|id| {
                        assigned.insert(id.as_str());
                        let found = by_id.get(id.as_str());
                        if found.is_none() {
                            debug!("Category {} references missing workflow {}", name, id);
                        }
                        found.map(|workflow| WorkflowEntry::from_record(workflow))
                    })
                    .collect();
                Bucket {
                    name: name.to_string(),
                    sections: vec![Section {
                        name: None,
                        entries,
                    }],
                }
            })
            .collect();

        let unassigned: Vec<WorkflowEntry> = workflows
            .iter()
            .filter(|workflow| !assigned.contains(workflow.id.as_str()))
            .map(WorkflowEntry::from_record)
            .collect();

        if !unassigned.is_empty() {
            match self.unassigned {
                UnassignedPolicy::Hide => {
                    debug!("Hiding {} workflows without a category", unassigned.len());
                }
                UnassignedPolicy::Collect => {
                    match buckets.iter_mut().find(|bucket| bucket.name == UNCATEGORIZED) {
                        Some(bucket) => bucket.sections[0].entries.extend(unassigned),
                        None => buckets.push(Bucket {
                            name: UNCATEGORIZED.to_string(),
                            sections: vec![Section {
                                name: None,
                                entries: unassigned,
                            }],
                        }),
                    }
                }
            }
        }

        RenderModel {
            mode: RenderMode::Custom,
            buckets,
        }
    }
}

/// Resolves with the default unassigned-workflow policy
pub fn resolve(workflows: &[WorkflowRecord], stored: Option<&CategorySet>) -> RenderModel {
    CategorizationEngine::default().resolve(workflows, stored)
}

fn resolve_auto(workflows: &[WorkflowRecord]) -> RenderModel {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut bucket_index: HashMap<String, usize> = HashMap::new();

    for workflow in workflows {
        let parsed = workflow.parsed_name();
        let index = *bucket_index.entry(parsed.group.clone()).or_insert_with(|| {
            buckets.push(Bucket {
                name: parsed.group.clone(),
                sections: Vec::new(),
            });
            buckets.len() - 1
        });

        let sections = &mut buckets[index].sections;
        let section = match sections
            .iter()
            .position(|section| section.name.as_deref() == Some(parsed.category.as_str()))
        {
            Some(position) => &mut sections[position],
            None => {
                sections.push(Section {
                    name: Some(parsed.category.clone()),
                    entries: Vec::new(),
                });
                let last = sections.len() - 1;
                &mut sections[last]
            }
        };
        section.entries.push(WorkflowEntry {
            display_name: parsed.display_name,
            workflow: workflow.clone(),
        });
    }

    let order = DisplayNameOrder::new();
    for section in buckets.iter_mut().flat_map(|bucket| bucket.sections.iter_mut()) {
        section
            .entries
            .sort_by(|a, b| order.compare(&a.display_name, &b.display_name));
    }

    RenderModel {
        mode: RenderMode::Auto,
        buckets,
    }
}

/// Root-locale collation of display names.
///
/// Case is ignored first, so `Équipe` sorts between `alpha` and `Zulu`. Ties
/// go to lowercase first, and code points keep the order total.
struct DisplayNameOrder {
    collators: Option<(Collator, Collator)>,
}

impl DisplayNameOrder {
    fn new() -> Self {
        let collators = root_collator(Strength::Secondary)
            .and_then(|ignore_case| root_collator(Strength::Tertiary).map(|with_case| (ignore_case, with_case)));
        Self { collators }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        let collated = match &self.collators {
            Some((ignore_case, with_case)) => ignore_case
                .compare(a, b)
                .then_with(|| with_case.compare(a, b)),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };
        collated.then_with(|| a.cmp(b))
    }
}

fn root_collator(strength: Strength) -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(strength);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(error) => {
            warn!("Collation unavailable, sorting by lowercase code points: {}", error);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkflowId;

    fn names(bucket: &Bucket) -> Vec<&str> {
        bucket.entries().map(|entry| entry.display_name.as_str()).collect()
    }

    #[test]
    fn test_auto_mode_without_stored_set() {
        let workflows = vec![
            WorkflowRecord::new(1, "CI - Build - lint"),
            WorkflowRecord::new(2, "CI - Build - Archive"),
            WorkflowRecord::new(3, "CI - Release - Tag"),
        ];

        let model = resolve(&workflows, None);

        assert_eq!(model.mode, RenderMode::Auto);
        let ci = model.bucket("CI").unwrap();
        assert_eq!(ci.sections.len(), 2);
        assert_eq!(
            ci.section("Build")
                .unwrap()
                .entries
                .iter()
                .map(|entry| entry.display_name.as_str())
                .collect::<Vec<_>>(),
            vec!["Archive", "lint"]
        );
    }

    #[test]
    fn test_all_empty_stored_set_falls_back_to_auto() {
        let workflows = vec![WorkflowRecord::new(1, "CI - Build - Lint")];
        let set = CategorySet::from_buckets([("Empty", Vec::<u64>::new())]);

        let model = resolve(&workflows, Some(&set));

        assert_eq!(model.mode, RenderMode::Auto);
        assert!(model.bucket("Empty").is_none());
    }

    #[test]
    fn test_custom_mode_keeps_stored_order_and_drops_missing_ids() {
        let workflows = vec![
            WorkflowRecord::new(1, "CI - Build - Lint"),
            WorkflowRecord::new(2, "Deploy"),
        ];
        let set = CategorySet::from_buckets([
            ("Ship", vec![2u64, 99]),
            ("Checks", vec![1]),
            ("Drop here", vec![]),
        ]);

        let model = resolve(&workflows, Some(&set));

        assert_eq!(model.mode, RenderMode::Custom);
        let bucket_names: Vec<&str> = model.buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(bucket_names, vec!["Ship", "Checks", "Drop here"]);
        assert_eq!(names(&model.buckets[0]), vec!["Deploy"]);
        assert_eq!(names(&model.buckets[1]), vec!["Lint"]);
        assert!(model.buckets[2].is_empty());
        assert_eq!(model.buckets[0].sections.len(), 1);
        assert_eq!(model.buckets[0].sections[0].name, None);
    }

    #[test]
    fn test_custom_mode_collects_unassigned_workflows() {
        let workflows = vec![
            WorkflowRecord::new(1, "CI - Build - Lint"),
            WorkflowRecord::new(2, "Nightly"),
            WorkflowRecord::new(3, "Weekly"),
        ];
        let set = CategorySet::from_buckets([("Checks", vec![1u64])]);

        let model = resolve(&workflows, Some(&set));

        let uncategorized = model.bucket(UNCATEGORIZED).unwrap();
        assert_eq!(names(uncategorized), vec!["Nightly", "Weekly"]);
        assert_eq!(model.workflow_count(), 3);
    }

    #[test]
    fn test_custom_mode_appends_unassigned_to_existing_uncategorized() {
        let workflows = vec![WorkflowRecord::new(1, "Lint"), WorkflowRecord::new(2, "Nightly")];
        let set = CategorySet::from_buckets([("Uncategorized", vec![1u64]), ("Other", vec![])]);

        let model = resolve(&workflows, Some(&set));

        assert_eq!(model.buckets.len(), 2);
        assert_eq!(names(&model.buckets[0]), vec!["Lint", "Nightly"]);
    }

    #[test]
    fn test_custom_mode_can_hide_unassigned_workflows() {
        let workflows = vec![WorkflowRecord::new(1, "Lint"), WorkflowRecord::new(2, "Nightly")];
        let set = CategorySet::from_buckets([("Checks", vec![1u64])]);

        let model = CategorizationEngine::new(UnassignedPolicy::Hide).resolve(&workflows, Some(&set));

        assert!(model.bucket(UNCATEGORIZED).is_none());
        assert_eq!(model.workflow_count(), 1);
    }

    #[test]
    fn test_entries_carry_workflow_records() {
        let workflows = vec![WorkflowRecord::new(7, "CI - Build - Lint").with_badge_url("https://b")];
        let model = resolve(&workflows, None);
        let entry = model.entries().next().unwrap();
        assert_eq!(entry.workflow.id, WorkflowId::from(7));
        assert_eq!(entry.workflow.badge_url(), Some("https://b"));
    }

    #[test]
    fn test_auto_mode_sorts_accented_names_by_collation() {
        let workflows = vec![
            WorkflowRecord::new(1, "App - Test - Zulu"),
            WorkflowRecord::new(2, "App - Test - Équipe"),
            WorkflowRecord::new(3, "App - Test - alpha"),
        ];

        let model = resolve(&workflows, None);

        assert_eq!(
            names(model.bucket("App").unwrap()),
            vec!["alpha", "Équipe", "Zulu"]
        );
    }

    #[test]
    fn test_compare_display_names() {
        let order = DisplayNameOrder::new();
        assert_eq!(order.compare("e2e", "Unit"), Ordering::Less);
        assert_eq!(order.compare("Beta", "alpha"), Ordering::Greater);
        assert_eq!(order.compare("a", "A"), Ordering::Less);
        assert_eq!(order.compare("Équipe", "Zulu"), Ordering::Less);
        assert_eq!(order.compare("équipe", "Equipe"), Ordering::Greater);
    }
}
