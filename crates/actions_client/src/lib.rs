pub mod badge;
pub mod config;
pub mod error;
pub mod http;
pub mod retry;
pub mod status_resolver;
pub mod workflows;

pub use badge::extract_label;
pub use config::{ClientConfig, RetryPolicy, DEFAULT_API_BASE, PAGE_SIZE};
pub use error::{BadgeError, ClientError};
pub use http::build_http_client;
pub use retry::{retry_with_timeout, AttemptError, RetryError};
pub use status_resolver::StatusResolver;
pub use workflows::{GithubWorkflowSource, WorkflowSource};
