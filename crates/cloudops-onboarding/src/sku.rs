//! License tier resolution.
//!
//! A [`SkuMap`] is built once per run from the tenant's subscribed SKUs and
//! passed by reference to everything that needs to translate a symbolic
//! tier into a provider SKU id.

use std::collections::HashMap;
use std::fmt;

use tracing::{info, instrument, warn};

use crate::directory::{Directory, SubscribedSku};
use crate::error::OnboardingError;

/// Symbolic license tier as written in the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LicenseTier {
    E3,
    E5,
    Intune,
    /// No license is assigned.
    None,
}

impl LicenseTier {
    /// Every recognized tier, in the order they are listed to users.
    pub const ALL: [LicenseTier; 4] = [Self::E3, Self::E5, Self::Intune, Self::None];

    /// Parses a tier name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "E3" => Some(Self::E3),
            "E5" => Some(Self::E5),
            "INTUNE" => Some(Self::Intune),
            "NONE" => Some(Self::None),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E3 => "E3",
            Self::E5 => "E5",
            Self::Intune => "INTUNE",
            Self::None => "NONE",
        }
    }

    /// The SKU part number this tier is sold as, `None` for [`LicenseTier::None`].
    #[must_use]
    pub fn part_number(&self) -> Option<&'static str> {
        match self {
            Self::E3 => Some("SPE_E3"),
            Self::E5 => Some("SPE_E5"),
            Self::Intune => Some("INTUNE_A_D"),
            Self::None => None,
        }
    }

    /// Comma-separated list of every tier name, for error messages.
    #[must_use]
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(LicenseTier::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of looking a tier up in a [`SkuMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkuLookup {
    /// The tier maps to this SKU id.
    Resolved(String),
    /// The tier carries no license. Assignment is a no-op.
    NoLicense,
    /// The tier is unknown or the tenant does not own its SKU.
    NotFound,
}

/// Read-only map from SKU part number to SKU id for one tenant.
#[derive(Debug, Clone, Default)]
pub struct SkuMap {
    by_part_number: HashMap<String, String>,
}

impl SkuMap {
    /// Builds the map from a list of subscribed SKUs.
    #[must_use]
    pub fn from_skus(skus: &[SubscribedSku]) -> Self {
        let by_part_number = skus
            .iter()
            .map(|sku| (sku.sku_part_number.clone(), sku.sku_id.clone()))
            .collect();
        Self { by_part_number }
    }

    /// Reads the tenant's subscribed SKUs and builds the map.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::SkuResolution`] if the directory call fails.
    #[instrument(skip(directory))]
    pub async fn resolve(directory: &dyn Directory) -> Result<Self, OnboardingError> {
        let skus = directory
            .list_subscribed_skus()
            .await
            .map_err(OnboardingError::SkuResolution)?;

        if skus.is_empty() {
            warn!("Tenant has no subscribed SKUs, every licensed tier will be unresolvable");
        }
        for sku in &skus {
            info!(
                sku_part_number = %sku.sku_part_number,
                available = sku.available_units(),
                "Subscribed SKU"
            );
        }

        Ok(Self::from_skus(&skus))
    }

    /// Translates a tier name into a SKU id.
    #[must_use]
    pub fn lookup(&self, tier: &str) -> SkuLookup {
        match LicenseTier::parse(tier) {
            Some(LicenseTier::None) => SkuLookup::NoLicense,
            Some(tier) => tier
                .part_number()
                .and_then(|part| self.by_part_number.get(part))
                .map_or(SkuLookup::NotFound, |id| SkuLookup::Resolved(id.clone())),
            None => SkuLookup::NotFound,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_part_number.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_part_number.is_empty()
    }
}
