pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod schema;
pub mod session;
pub mod template;

pub use config::Settings;
pub use error::{IngestError, TemplateError};
pub use pipeline::{reconcile_file, FileReport};
pub use process::{build_table, load_table, IngestOptions, MalformedRowReport, Table};
pub use template::{ColumnMatcher, MatchResult};
pub use session::{InMemoryStore, Session, SessionStore};
