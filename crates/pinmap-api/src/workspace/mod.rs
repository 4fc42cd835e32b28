// Workspace-database API (Notion-compatible REST surface)

mod client;
pub mod types;

pub use client::{DEFAULT_API_VERSION, DEFAULT_BASE_URL, WorkspaceClient};
pub use types::Paginated;
