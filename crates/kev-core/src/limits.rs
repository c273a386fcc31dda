//! Hard ceilings of the tracking service and the effective per-call limits.

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Maximum number of IDs one WIQL response may carry.
pub const WIQL_PAGE_CEILING: usize = 20_000;

/// Maximum number of IDs one batch detail request may name.
pub const DETAIL_BATCH_CEILING: usize = 200;

/// Effective page and batch sizes, never above the service ceilings.
///
/// Deserialization goes through [`ServiceLimits::new`], so a decoded value is
/// clamped and never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLimits")]
pub struct ServiceLimits {
    page_size: usize,
    batch_size: usize,
}

#[derive(Deserialize)]
struct RawLimits {
    page_size: usize,
    batch_size: usize,
}

impl TryFrom<RawLimits> for ServiceLimits {
    type Error = CoreError;

    fn try_from(raw: RawLimits) -> Result<Self, Self::Error> {
        Self::new(raw.page_size, raw.batch_size)
    }
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            page_size: WIQL_PAGE_CEILING,
            batch_size: DETAIL_BATCH_CEILING,
        }
    }
}

impl ServiceLimits {
    /// Build limits, clamping each value down to its ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when either size is zero.
    pub fn new(page_size: usize, batch_size: usize) -> Result<Self, CoreError> {
        if page_size == 0 || batch_size == 0 {
            return Err(CoreError::Validation(format!(
                "page size and batch size must be positive (got {page_size} and {batch_size})"
            )));
        }
        Ok(Self {
            page_size: page_size.min(WIQL_PAGE_CEILING),
            batch_size: batch_size.min(DETAIL_BATCH_CEILING),
        })
    }

    #[must_use]
    pub const fn page_size(self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn batch_size(self) -> usize {
        self.batch_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_ceilings() {
        let limits = ServiceLimits::default();
        assert_eq!(limits.page_size(), 20_000);
        assert_eq!(limits.batch_size(), 200);
    }

    #[test]
    fn oversized_values_are_clamped() {
        let limits = ServiceLimits::new(50_000, 1_000).unwrap();
        assert_eq!(limits, ServiceLimits::default());
    }

    #[test]
    fn zero_is_rejected() {
        assert!(ServiceLimits::new(0, 10).is_err());
        assert!(ServiceLimits::new(10, 0).is_err());
        assert_eq!(ServiceLimits::new(5, 3).unwrap().batch_size(), 3);
    }

    #[test]
    fn decoding_validates_like_new() {
        let zero = serde_json::from_str::<ServiceLimits>(r#"{"page_size":0,"batch_size":0}"#);
        assert!(zero.is_err());

        let clamped: ServiceLimits =
            serde_json::from_str(r#"{"page_size":50000,"batch_size":1000}"#).unwrap();
        assert_eq!(clamped, ServiceLimits::default());
    }
}
