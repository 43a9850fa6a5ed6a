use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDateTime;

use super::trade::TradeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Chronological comparison where a missing timestamp sorts after every
/// known one in either direction.
pub fn compare_timestamps(
    a: Option<NaiveDateTime>,
    b: Option<NaiveDateTime>,
    order: SortOrder,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by timestamp: ties keep their input order.
pub fn sort_by_timestamp(records: &mut [&TradeRecord], order: SortOrder) {
    records.sort_by(|a, b| compare_timestamps(a.timestamp, b.timestamp, order));
}

/// Every row of every loaded trade log, ascending by timestamp.
#[derive(Debug, Clone, Default)]
pub struct MergedDataset {
    records: Vec<TradeRecord>,
    labels: Vec<String>,
}

impl MergedDataset {
    /// Build from rows in source order. Sorting is stable, so rows sharing a
    /// timestamp stay in the order they were read.
    pub fn from_records(mut records: Vec<TradeRecord>) -> Self {
        let mut labels: Vec<String> = Vec::new();
        for r in &records {
            if !labels.contains(&r.bot_type) {
                labels.push(r.bot_type.clone());
            }
        }

        records.sort_by(|a, b| compare_timestamps(a.timestamp, b.timestamp, SortOrder::Asc));

        Self { records, labels }
    }

    /// Ascending by timestamp, unknown timestamps last.
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    /// Bot labels present in the data, in source order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Result of one load: either a dataset or the explicit "no data" state.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// Every source was missing, unreadable or empty.
    NoData,
    Loaded(MergedDataset),
}

impl LoadOutcome {
    pub fn from_records(records: Vec<TradeRecord>) -> Self {
        if records.is_empty() {
            LoadOutcome::NoData
        } else {
            LoadOutcome::Loaded(MergedDataset::from_records(records))
        }
    }

    pub fn dataset(&self) -> Option<&MergedDataset> {
        match self {
            LoadOutcome::NoData => None,
            LoadOutcome::Loaded(ds) => Some(ds),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, LoadOutcome::NoData)
    }
}
