use thiserror::Error;

/// Reasons a category edit is refused. A rejected command never mutates state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandRejected {
    #[error("Category name must not be empty")]
    EmptyName,

    #[error("Category already exists: {0}")]
    DuplicateName(String),

    #[error("Category is already named {0}")]
    UnchangedName(String),

    #[error("Category not found: {0}")]
    UnknownCategory(String),
}

/// The given location is not a repository's workflow listing page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Not a workflow listing page: {path}")]
pub struct PageNotRecognized {
    pub path: String,
}
