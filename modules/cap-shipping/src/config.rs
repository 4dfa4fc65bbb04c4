use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::api::ServiceType;
use crate::errors::{Result, ShippingError};

/// Tariff compiled into the crate; used when no tariff file is configured.
pub const BUNDLED_TARIFF: &str = include_str!("../tariffs/mondial-relay-2025.yaml");

/// A carrier tariff document: packing rules plus one rate sheet per country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffConfig {
    /// Carrier identifier, e.g. "mondial-relay"
    pub carrier: String,
    /// Tariff edition, e.g. "2025.1"
    pub version: String,
    #[serde(default)]
    pub packing: PackingRules,
    /// Keyed by upper-case ISO country code, in document order
    pub countries: IndexMap<String, CountryShippingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackingRules {
    /// Grams per unit when `weight_source` is `fixed`
    #[serde(default = "default_unit_weight")]
    pub unit_weight: u32,
    /// Units per box
    #[serde(default = "default_box_capacity")]
    pub box_capacity: u32,
    /// Grams of packaging per box
    #[serde(default = "default_box_weight")]
    pub box_weight: u32,
    #[serde(default)]
    pub weight_source: WeightSource,
}

/// Where the per-unit product weight comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightSource {
    /// Every unit weighs `PackingRules::unit_weight` (uniform product line).
    #[default]
    Fixed,
    /// Each cart line uses its own `unit_weight`.
    Item,
}

fn default_unit_weight() -> u32 {
    1050
}

fn default_box_capacity() -> u32 {
    3
}

fn default_box_weight() -> u32 {
    200
}

impl Default for PackingRules {
    fn default() -> Self {
        Self {
            unit_weight: default_unit_weight(),
            box_capacity: default_box_capacity(),
            box_weight: default_box_weight(),
            weight_source: WeightSource::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryShippingConfig {
    pub code: String,
    pub name: String,
    pub pickup_point_available: bool,
    pub home_delivery_available: bool,
    /// Heaviest single parcel accepted for this country, in grams
    pub max_weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_point_rates: Option<Vec<RateBand>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_delivery_rates: Option<Vec<RateBand>>,
    pub delivery_time: String,
}

/// Inclusive weight range `[min_weight, max_weight]` in grams and its price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateBand {
    pub min_weight: u32,
    pub max_weight: u32,
    pub price: Decimal,
}

impl RateBand {
    pub fn contains(&self, weight: u32) -> bool {
        self.min_weight <= weight && weight <= self.max_weight
    }
}

impl CountryShippingConfig {
    pub fn is_available(&self, service: ServiceType) -> bool {
        match service {
            ServiceType::PickupPoint => self.pickup_point_available,
            ServiceType::HomeDelivery => self.home_delivery_available,
        }
    }

    /// Rate table for an enabled service; `None` when the service is off or
    /// has no bands.
    pub fn rates(&self, service: ServiceType) -> Option<&[RateBand]> {
        if !self.is_available(service) {
            return None;
        }
        let table = match service {
            ServiceType::PickupPoint => self.pickup_point_rates.as_deref(),
            ServiceType::HomeDelivery => self.home_delivery_rates.as_deref(),
        };
        table.filter(|t| !t.is_empty())
    }

    /// Pickup point when requested and offered, otherwise home delivery.
    pub fn resolve_service(&self, prefer_pickup_point: bool) -> Option<(ServiceType, &[RateBand])> {
        if prefer_pickup_point {
            if let Some(rates) = self.rates(ServiceType::PickupPoint) {
                return Some((ServiceType::PickupPoint, rates));
            }
        }
        self.rates(ServiceType::HomeDelivery)
            .map(|rates| (ServiceType::HomeDelivery, rates))
    }

    /// Per-parcel ceiling of a service: the top of its highest band.
    pub fn max_package_weight(&self, service: ServiceType) -> Option<u32> {
        self.rates(service).map(max_band_weight)
    }
}

pub(crate) fn max_band_weight(rates: &[RateBand]) -> u32 {
    rates.iter().map(|b| b.max_weight).max().unwrap_or(0)
}

impl TariffConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: TariffConfig =
            serde_yaml::from_str(text).map_err(|e| ShippingError::TariffParse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: TariffConfig =
            serde_json::from_str(text).map_err(|e| ShippingError::TariffParse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a tariff file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    pub fn bundled() -> Result<Self> {
        Self::from_yaml_str(BUNDLED_TARIFF)
    }

    /// Check the structural invariants every lookup relies on.
    pub fn validate(&self) -> Result<()> {
        if self.countries.is_empty() {
            return Err(invalid("no countries defined"));
        }
        if self.packing.box_capacity == 0 {
            return Err(invalid("packing.box_capacity must be > 0"));
        }
        for (key, country) in &self.countries {
            if key != &country.code {
                return Err(invalid(format!(
                    "country key {key} does not match code {}",
                    country.code
                )));
            }
            if key.is_empty() || !key.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(invalid(format!(
                    "country code {key:?} must be upper-case ASCII"
                )));
            }
            for service in [ServiceType::PickupPoint, ServiceType::HomeDelivery] {
                if !country.is_available(service) {
                    continue;
                }
                let rates = country.rates(service).ok_or_else(|| {
                    invalid(format!("{key}: {service} is enabled but has no rate bands"))
                })?;
                validate_bands(key, service, rates)?;
                let top = max_band_weight(rates);
                if country.max_weight < top {
                    return Err(invalid(format!(
                        "{key}: max_weight {} is below the {service} table ceiling {top}",
                        country.max_weight
                    )));
                }
            }
        }
        Ok(())
    }
}

fn validate_bands(country: &str, service: ServiceType, rates: &[RateBand]) -> Result<()> {
    let mut expected_min = 0u32;
    for (i, band) in rates.iter().enumerate() {
        if band.min_weight != expected_min {
            return Err(invalid(format!(
                "{country}: {service} band {i} starts at {}g, expected {expected_min}g",
                band.min_weight
            )));
        }
        if band.min_weight > band.max_weight {
            return Err(invalid(format!(
                "{country}: {service} band {i} has min_weight > max_weight"
            )));
        }
        if band.price.is_sign_negative() {
            return Err(invalid(format!(
                "{country}: {service} band {i} has a negative price"
            )));
        }
        expected_min = band.max_weight.saturating_add(1);
    }
    if max_band_weight(rates) == 0 {
        return Err(invalid(format!(
            "{country}: {service} table must accept parcels heavier than 0g"
        )));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> ShippingError {
    ShippingError::InvalidTariff(msg.into())
}
