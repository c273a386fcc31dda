//! Page and batch size configuration.

use kev_core::ServiceLimits;
use kev_core::limits::{DETAIL_BATCH_CEILING, WIQL_PAGE_CEILING};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_page_size() -> usize {
    WIQL_PAGE_CEILING
}

const fn default_batch_size() -> usize {
    DETAIL_BATCH_CEILING
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// IDs requested per WIQL page. Clamped to the service ceiling.
    #[serde(default = "default_page_size")]
    pub wiql_page_size: usize,

    /// IDs per batch detail request. Clamped to the service ceiling.
    #[serde(default = "default_batch_size")]
    pub detail_batch_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            wiql_page_size: default_page_size(),
            detail_batch_size: default_batch_size(),
        }
    }
}

impl LimitsConfig {
    /// Convert to effective limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a size is zero.
    pub fn service_limits(&self) -> Result<ServiceLimits, ConfigError> {
        if self.wiql_page_size > WIQL_PAGE_CEILING || self.detail_batch_size > DETAIL_BATCH_CEILING
        {
            tracing::warn!(
                wiql_page_size = self.wiql_page_size,
                detail_batch_size = self.detail_batch_size,
                "configured limits exceed service ceilings; clamping"
            );
        }
        ServiceLimits::new(self.wiql_page_size, self.detail_batch_size).map_err(|error| {
            ConfigError::InvalidValue {
                field: "limits".to_string(),
                reason: error.to_string(),
            }
        })
    }
}
