//! Country rate registry: lookup of per-country tariffs by ISO code.
//!
//! Built once from a validated [`TariffConfig`] and shared by reference;
//! nothing mutates it afterwards.

use indexmap::IndexMap;
use std::path::Path;

use crate::config::{CountryShippingConfig, PackingRules, TariffConfig};
use crate::errors::{Result, ShippingError};

#[derive(Debug, Clone)]
pub struct CountryRegistry {
    tariff: TariffConfig,
}

impl CountryRegistry {
    /// Wrap a tariff after checking its invariants.
    pub fn new(tariff: TariffConfig) -> Result<Self> {
        tariff.validate()?;
        tracing::info!(
            carrier = %tariff.carrier,
            version = %tariff.version,
            countries = tariff.countries.len(),
            "shipping tariff loaded"
        );
        Ok(Self { tariff })
    }

    pub fn bundled() -> Result<Self> {
        Self::new(TariffConfig::bundled()?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(TariffConfig::load(path)?)
    }

    /// Resolve a country code. Only exact registry keys match: "FR", not "fr".
    pub fn lookup(&self, country_code: &str) -> Result<&CountryShippingConfig> {
        self.tariff
            .countries
            .get(country_code)
            .ok_or_else(|| ShippingError::UnsupportedCountry {
                code: country_code.to_string(),
            })
    }

    /// All supported countries in tariff order, for country selectors.
    pub fn supported_countries(&self) -> &IndexMap<String, CountryShippingConfig> {
        &self.tariff.countries
    }

    pub fn packing(&self) -> &PackingRules {
        &self.tariff.packing
    }

    pub fn carrier(&self) -> &str {
        &self.tariff.carrier
    }

    pub fn version(&self) -> &str {
        &self.tariff.version
    }
}
