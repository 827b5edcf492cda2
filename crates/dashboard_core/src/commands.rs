//! Category edit commands
//!
//! Every edit to a [`CategorySet`] goes through these functions. They are
//! pure: the input set is never touched and a rejected command leaves no
//! trace. Persisting the result and re-resolving the dashboard is up to the
//! caller.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::CommandRejected;
use crate::name_parser::UNCATEGORIZED;
use crate::types::{CategorySet, WorkflowId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CategoryCommand {
    MoveWorkflow { id: WorkflowId, target: String },
    AddCategory { name: String },
    RenameCategory { from: String, to: String },
    DeleteCategory { name: String },
}

impl CategoryCommand {
    pub fn apply(&self, set: &CategorySet) -> Result<CategorySet, CommandRejected> {
        match self {
            CategoryCommand::MoveWorkflow { id, target } => Ok(move_workflow(id, target, set)),
            CategoryCommand::AddCategory { name } => add_category(name, set),
            CategoryCommand::RenameCategory { from, to } => rename_category(from, to, set),
            CategoryCommand::DeleteCategory { name } => Ok(delete_category(name, set)),
        }
    }
}

/// Moves `id` into `target`, creating the category if needed.
///
/// The id is first removed from every category, so it ends up in exactly one
/// place and repeating the move changes nothing.
pub fn move_workflow(id: &WorkflowId, target: &str, set: &CategorySet) -> CategorySet {
    let mut next = set.clone();
    next.detach(id);
    next.bucket_entry(target).push(id.clone());
    debug!("Moved workflow {} to {}", id, target);
    next
}

pub fn add_category(name: &str, set: &CategorySet) -> Result<CategorySet, CommandRejected> {
    let name = validate_name(name)?;
    if set.contains(name) {
        return Err(CommandRejected::DuplicateName(name.to_string()));
    }
    let mut next = set.clone();
    next.bucket_entry(name);
    Ok(next)
}

/// Renames a category in place, keeping its position and member order
pub fn rename_category(from: &str, to: &str, set: &CategorySet) -> Result<CategorySet, CommandRejected> {
    let to = validate_name(to)?;
    if to == from {
        return Err(CommandRejected::UnchangedName(to.to_string()));
    }
    if set.contains(to) {
        return Err(CommandRejected::DuplicateName(to.to_string()));
    }
    let index = set
        .position(from)
        .ok_or_else(|| CommandRejected::UnknownCategory(from.to_string()))?;
    let mut next = set.clone();
    next.rename_at(index, to.to_string());
    Ok(next)
}

/// Removes a category, moving its members to the end of `Uncategorized`.
///
/// Deleting a category that does not exist changes nothing.
pub fn delete_category(name: &str, set: &CategorySet) -> CategorySet {
    let mut next = set.clone();
    let Some(members) = next.remove(name) else {
        return next;
    };
    if !members.is_empty() {
        debug!("Recovering {} workflows from {} into {}", members.len(), name, UNCATEGORIZED);
        next.bucket_entry(UNCATEGORIZED).extend(members);
    }
    next
}

fn validate_name(name: &str) -> Result<&str, CommandRejected> {
    let name = name.trim();
    if name.is_empty() {
        Err(CommandRejected::EmptyName)
    } else {
        Ok(name)
    }
}
