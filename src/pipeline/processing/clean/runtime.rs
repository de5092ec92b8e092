use std::fmt;

use serde::{Serialize, Serializer};

use super::classify::{FieldError, Vocabulary};
use super::text::{numeric_tokens, strip_citations};

const NOT_REPORTED: Vocabulary = Vocabulary::exact("Runtime", &["", "TBA", "na"]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeBucket {
    UnderThirty,
    UnderSixty,
    OverSixty,
    Unknown,
}

impl RuntimeBucket {
    pub const ALL: [RuntimeBucket; 4] = [
        RuntimeBucket::UnderThirty,
        RuntimeBucket::UnderSixty,
        RuntimeBucket::OverSixty,
        RuntimeBucket::Unknown,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RuntimeBucket::UnderThirty => "<30 min",
            RuntimeBucket::UnderSixty => "<60 min",
            RuntimeBucket::OverSixty => ">60 min",
            RuntimeBucket::Unknown => "Unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label() == label)
    }

    /// Exactly 30 and exactly 60 both land in the middle band
    pub fn from_median(median: f64) -> Self {
        if median < 30.0 {
            RuntimeBucket::UnderThirty
        } else if median > 60.0 {
            RuntimeBucket::OverSixty
        } else {
            RuntimeBucket::UnderSixty
        }
    }
}

impl fmt::Display for RuntimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RuntimeBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn bucket_runtime(raw: Option<&str>) -> Result<RuntimeBucket, FieldError> {
    let Some(raw) = raw else {
        return Ok(RuntimeBucket::Unknown);
    };
    if let Some(bucket) = RuntimeBucket::from_label(raw) {
        return Ok(bucket);
    }

    let text = strip_citations(raw).replace('~', "");
    let text = text.trim();
    if text.contains('h') {
        return Ok(RuntimeBucket::OverSixty);
    }

    let minutes = match text.find("min") {
        Some(end) => text[..end].trim(),
        None => text,
    };
    NOT_REPORTED.classify_or_fail(minutes, RuntimeBucket::Unknown, |t| {
        numeric_tokens(t)
            .and_then(|values| median(&values))
            .map(RuntimeBucket::from_median)
    })
}
