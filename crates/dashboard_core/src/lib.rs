//! # Dashboard Core
//!
//! Categorization engine for the actions dashboard: derives group/category
//! structure from workflow names, keeps the user-editable category
//! assignment consistent, and classifies badge status labels.

pub mod board;
pub mod commands;
pub mod engine;
pub mod error;
pub mod name_parser;
pub mod repo;
pub mod status;
pub mod types;

pub use board::{Epoch, StatusBoard, StatusUpdate};
pub use commands::{add_category, delete_category, move_workflow, rename_category, CategoryCommand};
pub use engine::{
    resolve, Bucket, CategorizationEngine, RenderMode, RenderModel, Section, UnassignedPolicy,
    WorkflowEntry,
};
pub use error::{CommandRejected, PageNotRecognized};
pub use name_parser::{parse, ParsedName, NAME_DELIMITER, OTHER_CATEGORY, UNCATEGORIZED};
pub use repo::RepoRef;
pub use status::{BadgeStatus, StatusClassification};
pub use types::{CategorySet, WorkflowId, WorkflowRecord, WorkflowState};
