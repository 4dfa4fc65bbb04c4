use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CountryShippingConfig;

/// Carrier delivery product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    PickupPoint,
    HomeDelivery,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PickupPoint => "pickup_point",
            Self::HomeDelivery => "home_delivery",
        }
    }

    /// The service a caller asks for, before availability is considered.
    pub fn preferred(prefer_pickup_point: bool) -> Self {
        if prefer_pickup_point {
            Self::PickupPoint
        } else {
            Self::HomeDelivery
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PickupPoint => write!(f, "pickup point"),
            Self::HomeDelivery => write!(f, "home delivery"),
        }
    }
}

/// One product line of a cart. `unit_weight` excludes packaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default)]
    pub unit_weight: u32,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(unit_weight: u32, quantity: u32) -> Self {
        Self {
            unit_weight,
            quantity,
        }
    }
}

/// One physical parcel of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub weight: u32,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentPlan {
    pub packages: Vec<PackageInfo>,
    pub total_cost: Decimal,
    pub total_weight: u32,
    pub package_count: usize,
    pub service: ServiceType,
}

/// Everything the checkout flow displays for a shipment.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentInfo<'a> {
    pub cost: Decimal,
    pub service: ServiceType,
    pub weight: u32,
    pub formatted_weight: String,
    pub delivery_time: String,
    pub country: &'a CountryShippingConfig,
    pub packages: Vec<PackageInfo>,
    pub total_cost: Decimal,
    pub total_weight: u32,
    pub package_count: usize,
    pub package_details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeightValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WeightValidation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableServices<'a> {
    pub pickup_point: bool,
    pub home_delivery: bool,
    pub country: &'a CountryShippingConfig,
}
