pub mod alias;
pub mod charts;
pub mod record;
pub mod summary;
pub mod trend;

pub use alias::{resolve, FieldAliases, LogicalField};
pub use charts::{analyze_for_charts, ChartCategory, ChartKind, ChartSpec};
pub use record::Record;
pub use summary::{format_for_report, summarize, DataSummary};
pub use trend::{classify, ChangeRecord, ChangeTally, TrendClassifier, TrendStatus};
