pub mod catalog;
pub mod mapping;
pub mod matcher;

pub use catalog::{TemplateCatalog, TemplateSchema};
pub use mapping::{apply_mapping, suggest_mappings, ColumnMapping};
pub use matcher::{match_columns, ColumnMatcher, MatchResult, AMBIGUITY_DELIMITER};
