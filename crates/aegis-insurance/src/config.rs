//! Insurance service configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::TierPolicy;

/// Insurance service configuration.
///
/// Usable with no environment at all; every field has a working default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceConfig {
    /// How payment fractions are matched against the tier table.
    pub tier_policy: TierPolicy,
}

impl Default for InsuranceConfig {
    fn default() -> Self {
        Self {
            tier_policy: TierPolicy::Exact,
        }
    }
}

impl InsuranceConfig {
    /// Load configuration from environment and .env file.
    ///
    /// `AEGIS_TIER_TOLERANCE` switches tier matching to an absolute-tolerance
    /// comparison; unset means the exact-equality default.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();

        if let Ok(val) = std::env::var("AEGIS_TIER_TOLERANCE") {
            if let Ok(eps) = val.parse::<f64>() {
                cfg.tier_policy = TierPolicy::Tolerance(eps);
            }
        }

        Ok(cfg)
    }
}
