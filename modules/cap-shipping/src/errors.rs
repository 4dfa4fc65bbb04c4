//! Error taxonomy for the shipping calculator.
//!
//! Every failure is deterministic in (weight, country, service): retrying the
//! same call yields the same error. Codes follow the `Err.<Category>.<Detail>`
//! convention and carry an HTTP status plus an actionable hint so that the
//! checkout boundary can translate them without matching on messages.

use crate::api::ServiceType;

#[derive(Debug, thiserror::Error)]
pub enum ShippingError {
    #[error("unsupported country: {code}")]
    UnsupportedCountry { code: String },

    #[error("no delivery service available for {country} (requested {requested})")]
    NoServiceAvailable {
        country: String,
        requested: ServiceType,
    },

    #[error(
        "{}kg exceeds {}kg limit for {service} to {country_name}",
        kg(.weight),
        kg(.limit)
    )]
    WeightExceedsLimit {
        weight: u32,
        limit: u32,
        service: ServiceType,
        country: String,
        country_name: String,
    },

    #[error("invalid tariff: {0}")]
    InvalidTariff(String),

    #[error("tariff io: {0}")]
    TariffIo(#[from] std::io::Error),

    #[error("tariff parse: {0}")]
    TariffParse(String),
}

impl ShippingError {
    /// Canonical string representation: `Err.Shipping.<Detail>`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedCountry { .. } => "Err.Shipping.UnsupportedCountry",
            Self::NoServiceAvailable { .. } => "Err.Shipping.NoServiceAvailable",
            Self::WeightExceedsLimit { .. } => "Err.Shipping.WeightExceedsLimit",
            Self::InvalidTariff(_) => "Err.Shipping.InvalidTariff",
            Self::TariffIo(_) => "Err.Shipping.TariffIo",
            Self::TariffParse(_) => "Err.Shipping.TariffParse",
        }
    }

    /// Recommended HTTP status code for API responses.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UnsupportedCountry { .. } => 404,
            Self::NoServiceAvailable { .. } | Self::WeightExceedsLimit { .. } => 422,
            Self::TariffParse(_) => 400,
            Self::InvalidTariff(_) | Self::TariffIo(_) => 500,
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::UnsupportedCountry { .. } => "The destination is not in the tariff registry. Fall back to a default country or reject the checkout step.",
            Self::NoServiceAvailable { .. } => "The tariff has no pickup-point or home-delivery table for this country. Add the missing rate table to the tariff document.",
            Self::WeightExceedsLimit { .. } => "Offer pickup-point delivery, which accepts multi-parcel shipments, or ask the customer to split the order.",
            Self::InvalidTariff(_) => "Fix the tariff document: bands must start at 0, be contiguous and non-empty for every enabled service.",
            Self::TariffIo(_) => "Check that SHIPPING_TARIFF_PATH points to a readable file.",
            Self::TariffParse(_) => "The tariff document is not valid YAML/JSON for the expected schema. Quote prices as strings, e.g. price: \"4.19\".",
        }
    }

    /// Retrying never helps: every variant is a pure function of the inputs.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// JSON body for HTTP error responses.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ok": false,
            "error": {
                "code": self.code(),
                "status": self.http_status(),
                "message": self.to_string(),
                "hint": self.hint(),
            }
        })
    }
}

pub type Result<T, E = ShippingError> = std::result::Result<T, E>;

/// Grams to a kilogram string without trailing zeros: 25000 → "25", 30500 → "30.5".
fn kg(grams: &u32) -> String {
    (rust_decimal::Decimal::from(*grams) / rust_decimal::Decimal::from(1000))
        .normalize()
        .to_string()
}
