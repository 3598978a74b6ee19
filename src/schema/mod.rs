pub mod arrow;
pub mod detect;
pub mod types;

pub use arrow::{change_records_to_batch, string_schema, table_to_batch};
pub use detect::detect_schema;
pub use types::{is_placeholder, placeholder_name, unique_headers, ColumnSchema};
