use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::alias::{FieldAliases, LogicalField};
use super::Record;
use crate::config::Settings;
use crate::process::utils::{parse_number, round2};

static BUILTIN_CLASSIFIER: Lazy<TrendClassifier> =
    Lazy::new(|| TrendClassifier::from_settings(Settings::builtin()));

/// Changes at or below this magnitude (in percent) count as slight.
pub const SLIGHT_THRESHOLD: f64 = 5.0;

/// Direction of a previous → current change. A zero change is `Slight`;
/// there is no separate unchanged state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Slight,
    Improved,
    Worsened,
}

impl TrendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendStatus::Slight => "slight",
            TrendStatus::Improved => "improved",
            TrendStatus::Worsened => "worsened",
        }
    }
}

/// One classified row. `change_percentage` and `status` are both `None`
/// when the row has no comparable previous/current pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub data: Record,
    pub change_percentage: Option<f64>,
    pub status: Option<TrendStatus>,
}

/// Unrounded percentage change from `previous` to `current`.
///
/// A zero baseline has no ratio: any rise reads as 100, no change as 0 and
/// any fall as -100.
pub fn change_ratio(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else if current < 0.0 {
            -100.0
        } else {
            0.0
        }
    } else {
        100.0 * (current - previous) / previous.abs()
    }
}

/// `change_ratio` rounded to 2 dp, as reported.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    round2(change_ratio(previous, current))
}

/// Status for an unrounded change on a metric labelled `label`.
pub fn derive_status<S: AsRef<str>>(change: f64, label: &str, lower_is_better: &[S]) -> TrendStatus {
    if change.abs() <= SLIGHT_THRESHOLD {
        return TrendStatus::Slight;
    }
    let rising = change > 0.0;
    let good = if is_lower_better(label, lower_is_better) {
        !rising
    } else {
        rising
    };
    if good {
        TrendStatus::Improved
    } else {
        TrendStatus::Worsened
    }
}

/// Case-insensitive substring match of `label` against the keyword list.
pub fn is_lower_better<S: AsRef<str>>(label: &str, keywords: &[S]) -> bool {
    let label = label.to_lowercase();
    keywords
        .iter()
        .any(|k| label.contains(&k.as_ref().to_lowercase()))
}

/// Classifies rows using a fixed alias table and keyword list.
#[derive(Debug, Clone)]
pub struct TrendClassifier {
    aliases: FieldAliases,
    lower_is_better: Vec<String>,
}

impl TrendClassifier {
    pub fn new(aliases: FieldAliases, lower_is_better: Vec<String>) -> Self {
        Self {
            aliases,
            lower_is_better,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.aliases.clone(), settings.lower_is_better.clone())
    }

    /// Shared classifier over the built-in settings, built once per process.
    pub fn builtin() -> &'static TrendClassifier {
        &BUILTIN_CLASSIFIER
    }

    /// Exactly one `ChangeRecord` for `record`, whatever it contains.
    pub fn classify(&self, record: Record) -> ChangeRecord {
        // status is judged on the exact change; only the reported value is rounded
        let change = self.compare(&record);
        let status = change.map(|c| {
            let label = self
                .aliases
                .lookup(&record, LogicalField::Field)
                .unwrap_or("");
            derive_status(c, label, &self.lower_is_better)
        });
        ChangeRecord {
            data: record,
            change_percentage: change.map(round2),
            status,
        }
    }

    pub fn classify_all<I: IntoIterator<Item = Record>>(&self, records: I) -> Vec<ChangeRecord> {
        records.into_iter().map(|r| self.classify(r)).collect()
    }

    fn compare(&self, record: &Record) -> Option<f64> {
        let prev = self.aliases.lookup(record, LogicalField::PrevYear)?;
        let cur = self.aliases.lookup(record, LogicalField::Current)?;
        match (parse_number(prev), parse_number(cur)) {
            (Some(p), Some(c)) => Some(change_ratio(p, c)),
            _ => {
                debug!(prev, cur, "non-numeric values; skipping trend");
                None
            }
        }
    }
}

/// Classify `record` with the built-in settings.
pub fn classify(record: Record) -> ChangeRecord {
    TrendClassifier::builtin().classify(record)
}

/// Counts of each outcome across a set of change records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeTally {
    pub improved: usize,
    pub worsened: usize,
    pub slight: usize,
    pub no_data: usize,
}

impl ChangeTally {
    pub fn from_records(records: &[ChangeRecord]) -> Self {
        records.iter().fold(Self::default(), |mut t, r| {
            match r.status {
                Some(TrendStatus::Improved) => t.improved += 1,
                Some(TrendStatus::Worsened) => t.worsened += 1,
                Some(TrendStatus::Slight) => t.slight += 1,
                None => t.no_data += 1,
            }
            t
        })
    }
}
