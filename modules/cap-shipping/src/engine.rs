use rust_decimal::Decimal;

use crate::api::{PackageInfo, ServiceType, ShipmentPlan};
use crate::config::{max_band_weight, CountryShippingConfig, RateBand};
use crate::errors::{Result, ShippingError};
use crate::registry::CountryRegistry;

/// Price of a single parcel for a country and service preference.
pub fn price_package(
    reg: &CountryRegistry,
    package_weight: u32,
    country_code: &str,
    prefer_pickup_point: bool,
) -> Result<Decimal> {
    let country = reg.lookup(country_code)?;
    let (service, rates) = select_service(country, prefer_pickup_point)?;
    price_in_table(country, service, rates, package_weight)
}

/// Split `total_weight` into parcels and price each one.
///
/// Parcels are filled greedily up to the service ceiling, the last one
/// taking the remainder. Only pickup-point shipments may span several
/// parcels; home delivery above the ceiling is rejected.
pub fn plan_shipment(
    reg: &CountryRegistry,
    total_weight: u32,
    country_code: &str,
    prefer_pickup_point: bool,
) -> Result<ShipmentPlan> {
    let country = reg.lookup(country_code)?;
    let (service, rates) = select_service(country, prefer_pickup_point)?;
    let max_package_weight = max_band_weight(rates);

    if total_weight <= max_package_weight {
        let cost = price_in_table(country, service, rates, total_weight)?;
        return Ok(ShipmentPlan {
            packages: vec![PackageInfo {
                weight: total_weight,
                cost,
            }],
            total_cost: cost,
            total_weight,
            package_count: 1,
            service,
        });
    }

    if service == ServiceType::HomeDelivery {
        return Err(exceeds(country, service, total_weight, max_package_weight));
    }

    let mut packages = Vec::new();
    let mut remaining = total_weight;
    while remaining > 0 {
        let weight = remaining.min(max_package_weight);
        let cost = price_in_table(country, service, rates, weight)?;
        tracing::debug!(
            country = %country.code,
            parcel = packages.len() + 1,
            weight,
            %cost,
            "parcel planned"
        );
        packages.push(PackageInfo { weight, cost });
        remaining -= weight;
    }

    let total_cost = packages.iter().map(|p| p.cost).sum();
    Ok(ShipmentPlan {
        package_count: packages.len(),
        packages,
        total_cost,
        total_weight,
        service,
    })
}

/// Pickup-point rates when requested and offered, else home-delivery rates.
pub fn select_service(
    country: &CountryShippingConfig,
    prefer_pickup_point: bool,
) -> Result<(ServiceType, &[RateBand])> {
    let selected = country.resolve_service(prefer_pickup_point).ok_or_else(|| {
        ShippingError::NoServiceAvailable {
            country: country.code.clone(),
            requested: ServiceType::preferred(prefer_pickup_point),
        }
    })?;
    tracing::debug!(
        country = %country.code,
        prefer_pickup_point,
        service = selected.0.as_str(),
        "service selected"
    );
    Ok(selected)
}

fn price_in_table(
    country: &CountryShippingConfig,
    service: ServiceType,
    rates: &[RateBand],
    weight: u32,
) -> Result<Decimal> {
    if let Some(band) = rates.iter().find(|b| b.contains(weight)) {
        return Ok(band.price);
    }

    let ceiling = max_band_weight(rates);
    if weight > ceiling {
        return Err(exceeds(country, service, weight, ceiling));
    }

    // Kept for tariffs whose bands do not start at 0. CountryRegistry::new
    // validates every tariff, so no registry reaches this today.
    let first = rates.first().ok_or_else(|| ShippingError::NoServiceAvailable {
        country: country.code.clone(),
        requested: service,
    })?;
    tracing::warn!(
        country = %country.code,
        service = service.as_str(),
        weight,
        "no rate band matched, using first band"
    );
    Ok(first.price)
}

fn exceeds(
    country: &CountryShippingConfig,
    service: ServiceType,
    weight: u32,
    limit: u32,
) -> ShippingError {
    ShippingError::WeightExceedsLimit {
        weight,
        limit,
        service,
        country: country.code.clone(),
        country_name: country.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn reg() -> CountryRegistry {
        CountryRegistry::bundled().unwrap()
    }

    fn registry_from(yaml: &str) -> CountryRegistry {
        CountryRegistry::new(crate::config::TariffConfig::from_yaml_str(yaml).unwrap()).unwrap()
    }

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn band_upper_bound_is_inclusive() {
        let r = reg();
        assert_eq!(price_package(&r, 250, "FR", true).unwrap(), d("4.19"));
        assert_eq!(price_package(&r, 251, "FR", true).unwrap(), d("4.30"));
        assert_eq!(price_package(&r, 0, "FR", true).unwrap(), d("4.19"));
    }

    #[test]
    fn home_delivery_table_is_used_when_pickup_not_preferred() {
        let r = reg();
        assert_eq!(price_package(&r, 1000, "FR", false).unwrap(), d("8.99"));
        assert_eq!(price_package(&r, 1001, "FR", false).unwrap(), d("9.99"));
    }

    #[test]
    fn single_parcel_over_ceiling_is_rejected() {
        let r = reg();
        let err = price_package(&r, 30001, "FR", true).unwrap_err();
        assert!(matches!(
            err,
            ShippingError::WeightExceedsLimit {
                weight: 30001,
                limit: 30000,
                service: ServiceType::PickupPoint,
                ..
            }
        ));
    }

    #[test]
    fn unsupported_country() {
        let err = price_package(&reg(), 1000, "ZZ", true).unwrap_err();
        assert!(matches!(err, ShippingError::UnsupportedCountry { .. }));
    }

    #[test]
    fn plan_at_ceiling_is_one_parcel() {
        let plan = plan_shipment(&reg(), 30000, "FR", true).unwrap();
        assert_eq!(plan.package_count, 1);
        assert_eq!(plan.total_cost, d("32.40"));
        assert_eq!(plan.service, ServiceType::PickupPoint);
    }

    #[test]
    fn plan_one_gram_over_ceiling_adds_a_parcel() {
        let plan = plan_shipment(&reg(), 30001, "FR", true).unwrap();
        assert_eq!(
            plan.packages,
            vec![
                PackageInfo { weight: 30000, cost: d("32.40") },
                PackageInfo { weight: 1, cost: d("4.19") },
            ]
        );
        assert_eq!(plan.total_cost, d("36.59"));
        assert_eq!(plan.package_count, 2);
        assert_eq!(plan.total_weight, 30001);
    }

    #[test]
    fn greedy_split_fills_full_parcels_first() {
        // 65kg: 30 + 30 + 5. A 21.7kg x3 split is never explored.
        let plan = plan_shipment(&reg(), 65000, "FR", true).unwrap();
        let weights: Vec<u32> = plan.packages.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![30000, 30000, 5000]);
        assert_eq!(plan.total_cost, d("74.79"));
    }

    #[test]
    fn home_delivery_never_splits() {
        let err = plan_shipment(&reg(), 30000, "FR", false).unwrap_err();
        match err {
            ShippingError::WeightExceedsLimit { weight, limit, service, ref country_name, .. } => {
                assert_eq!((weight, limit), (30000, 25000));
                assert_eq!(service, ServiceType::HomeDelivery);
                assert_eq!(country_name, "France");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pickup_preference_falls_back_without_error() {
        let r = reg();
        let plan = plan_shipment(&r, 1000, "DE", true).unwrap();
        assert_eq!(plan.service, ServiceType::HomeDelivery);
        assert_eq!(plan.total_cost, price_package(&r, 1000, "DE", false).unwrap());
    }

    #[test]
    fn country_without_any_service() {
        let text = r#"
carrier: test
version: "1"
countries:
  XX:
    code: XX
    name: Nowhere
    pickup_point_available: false
    home_delivery_available: false
    max_weight: 0
    delivery_time: "-"
"#;
        let r = registry_from(text);
        let err = plan_shipment(&r, 100, "XX", true).unwrap_err();
        assert!(matches!(
            err,
            ShippingError::NoServiceAvailable { requested: ServiceType::PickupPoint, .. }
        ));
    }

    #[test]
    fn pickup_only_country_rejects_home_request() {
        let text = r#"
carrier: test
version: "1"
countries:
  IT:
    code: IT
    name: Italy
    pickup_point_available: true
    home_delivery_available: false
    max_weight: 1000
    delivery_time: "4 days"
    pickup_point_rates:
      - { min_weight: 0, max_weight: 1000, price: "6.00" }
"#;
        let r = registry_from(text);
        assert!(plan_shipment(&r, 500, "IT", true).is_ok());
        assert!(matches!(
            plan_shipment(&r, 500, "IT", false).unwrap_err(),
            ShippingError::NoServiceAvailable { .. }
        ));
    }
}
