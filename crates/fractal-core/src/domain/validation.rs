//! Validation results reported by a cluster's `validation` attribute.
//!
//! A result is a map from resource name to a typed message plus a summary
//! of counts. The counts must agree with the entries: decoding rejects a
//! payload where they do not.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome class of a single resource.
///
/// Ordered by severity so the overall status of a result is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationType {
    Success,
    Warning,
    Error,
}

impl ValidationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationType::Success => "success",
            ValidationType::Warning => "warning",
            ValidationType::Error => "error",
        }
    }
}

impl fmt::Display for ValidationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation outcome of one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceValidation {
    #[serde(rename = "type")]
    pub kind: ValidationType,
    pub message: String,
}

impl ResourceValidation {
    pub fn new(kind: ValidationType, message: impl Into<String>) -> Self {
        ResourceValidation {
            kind,
            message: message.into(),
        }
    }
}

/// Number of entries per [`ValidationType`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCounts {
    pub success: usize,
    pub warning: usize,
    pub error: usize,
}

impl ValidationCounts {
    /// Count entries by type
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a ResourceValidation>) -> Self {
        let mut counts = ValidationCounts::default();
        for entry in entries {
            match entry.kind {
                ValidationType::Success => counts.success += 1,
                ValidationType::Warning => counts.warning += 1,
                ValidationType::Error => counts.error += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.success + self.warning + self.error
    }
}

impl fmt::Display for ValidationCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} success, {} warning, {} error",
            self.success, self.warning, self.error
        )
    }
}

/// `counts` disagrees with the entries it summarises
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation counts ({declared}) do not match resource entries ({tallied})")]
pub struct CountsMismatch {
    pub declared: ValidationCounts,
    pub tallied: ValidationCounts,
}

/// Aggregate validation outcome of a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawValidationResult")]
pub struct ValidationResult {
    resources: IndexMap<String, ResourceValidation>,
    counts: ValidationCounts,
}

#[derive(Deserialize)]
struct RawValidationResult {
    resources: IndexMap<String, ResourceValidation>,
    counts: ValidationCounts,
}

impl TryFrom<RawValidationResult> for ValidationResult {
    type Error = CountsMismatch;

    fn try_from(raw: RawValidationResult) -> Result<Self, Self::Error> {
        let tallied = ValidationCounts::tally(raw.resources.values());
        if tallied != raw.counts {
            return Err(CountsMismatch {
                declared: raw.counts,
                tallied,
            });
        }

        Ok(ValidationResult {
            resources: raw.resources,
            counts: raw.counts,
        })
    }
}

impl ValidationResult {
    /// Build a result from entries, computing the counts
    pub fn from_resources(resources: IndexMap<String, ResourceValidation>) -> Self {
        let counts = ValidationCounts::tally(resources.values());
        ValidationResult { resources, counts }
    }

    pub fn resources(&self) -> &IndexMap<String, ResourceValidation> {
        &self.resources
    }

    pub fn counts(&self) -> ValidationCounts {
        self.counts
    }

    /// Overall status: error if any error, else warning if any warning,
    /// else success (including when there are no entries).
    pub fn status(&self) -> ValidationType {
        if self.counts.error > 0 {
            ValidationType::Error
        } else if self.counts.warning > 0 {
            ValidationType::Warning
        } else {
            ValidationType::Success
        }
    }

    pub fn has_errors(&self) -> bool {
        self.counts.error > 0
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl FromIterator<(String, ResourceValidation)> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = (String, ResourceValidation)>>(iter: I) -> Self {
        Self::from_resources(iter.into_iter().collect())
    }
}
