//! cap-shipping — carrier shipping rates for the storefront checkout.
//!
//! Converts a cart into a shippable weight, picks the carrier service for the
//! destination, splits heavy pickup-point shipments into several parcels and
//! prices each parcel against a weight-banded tariff.
//!
//! Pure evaluation: every function takes the [`CountryRegistry`] explicitly,
//! performs no IO and keeps no state between calls.

pub mod api;
pub mod config;
pub mod engine;
pub mod errors;
pub mod registry;
pub mod weight;

use rust_decimal::{Decimal, RoundingStrategy};

pub use api::{
    AvailableServices, CartItem, PackageInfo, ServiceType, ShipmentInfo, ShipmentPlan,
    WeightValidation,
};
pub use config::{CountryShippingConfig, PackingRules, RateBand, TariffConfig, WeightSource};
pub use errors::{Result, ShippingError};
pub use registry::CountryRegistry;

/// Minimum dunnage added to any parcel, in grams.
pub const MIN_DUNNAGE_WEIGHT: u32 = 100;

// ---------------------------------------------------------------------------
// Facade used by the checkout flow and admin tools.
// ---------------------------------------------------------------------------

/// Shippable weight of a cart under the registry's packing rules.
pub fn total_weight(reg: &CountryRegistry, cart: &[CartItem]) -> u32 {
    weight::total_weight(reg.packing(), cart)
}

/// Total shipping cost, summed over every parcel.
pub fn shipping_cost(
    reg: &CountryRegistry,
    total_weight: u32,
    country_code: &str,
    prefer_pickup_point: bool,
) -> Result<Decimal> {
    engine::plan_shipment(reg, total_weight, country_code, prefer_pickup_point)
        .map(|plan| plan.total_cost)
}

/// Full shipment breakdown with display fields.
pub fn shipment_info<'a>(
    reg: &'a CountryRegistry,
    total_weight: u32,
    country_code: &str,
    prefer_pickup_point: bool,
) -> Result<ShipmentInfo<'a>> {
    let country = reg.lookup(country_code)?;
    let plan = engine::plan_shipment(reg, total_weight, country_code, prefer_pickup_point)?;

    Ok(ShipmentInfo {
        cost: plan.total_cost,
        service: plan.service,
        weight: plan.total_weight,
        formatted_weight: format_weight(plan.total_weight),
        delivery_time: country.delivery_time.clone(),
        country,
        package_details: package_details(&plan.packages),
        packages: plan.packages,
        total_cost: plan.total_cost,
        total_weight: plan.total_weight,
        package_count: plan.package_count,
    })
}

/// Weigh a cart and return its shipment breakdown.
pub fn quote_cart<'a>(
    reg: &'a CountryRegistry,
    cart: &[CartItem],
    country_code: &str,
    prefer_pickup_point: bool,
) -> Result<ShipmentInfo<'a>> {
    let weight = total_weight(reg, cart);
    shipment_info(reg, weight, country_code, prefer_pickup_point)
}

/// Whether a weight can be shipped to a country at all.
///
/// Never fails: an unknown country comes back as an invalid result with the
/// error message. There is no upper bound here since pickup-point shipments
/// split into as many parcels as needed.
pub fn validate_package_weight(
    reg: &CountryRegistry,
    total_weight: u32,
    country_code: &str,
) -> WeightValidation {
    if let Err(e) = reg.lookup(country_code) {
        return WeightValidation::invalid(e.to_string());
    }
    if u64::from(total_weight) + u64::from(MIN_DUNNAGE_WEIGHT) == 0 {
        return WeightValidation::invalid("weight must be positive");
    }
    WeightValidation::valid()
}

pub fn available_services<'a>(
    reg: &'a CountryRegistry,
    country_code: &str,
) -> Result<AvailableServices<'a>> {
    let country = reg.lookup(country_code)?;
    Ok(AvailableServices {
        pickup_point: country.pickup_point_available,
        home_delivery: country.home_delivery_available,
        country,
    })
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// "1.3 kg" from 1000g upwards (one decimal), "999 g" below.
pub fn format_weight(grams: u32) -> String {
    if grams >= 1000 {
        format!("{} kg", kg_one_decimal(grams))
    } else {
        format!("{grams} g")
    }
}

/// "1 colis (4.6kg)" or "2 colis (30.0kg + 0.0kg)".
pub fn package_details(packages: &[PackageInfo]) -> String {
    let weights: Vec<String> = packages
        .iter()
        .map(|p| format!("{}kg", kg_one_decimal(p.weight)))
        .collect();
    format!("{} colis ({})", packages.len(), weights.join(" + "))
}

fn kg_one_decimal(grams: u32) -> Decimal {
    let mut kg = (Decimal::from(grams) / Decimal::from(1000))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    kg.rescale(1);
    kg
}
