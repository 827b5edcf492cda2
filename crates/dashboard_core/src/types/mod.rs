pub mod category_set;
pub mod workflow;

pub use category_set::CategorySet;
pub use workflow::{WorkflowId, WorkflowRecord, WorkflowState};
