use cap_shipping::{shipment_info, shipping_cost, total_weight, CartItem, CountryRegistry};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn reg() -> CountryRegistry {
    CountryRegistry::bundled().expect("bundled tariff")
}

fn country() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("FR"),
        Just("BE"),
        Just("LU"),
        Just("NL"),
        Just("ES"),
        Just("PT"),
        Just("IT"),
        Just("DE"),
        Just("AT"),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn weight_formula(q in 0u32..500) {
        let r = reg();
        let expected = q * 1050 + q.div_ceil(3) * 200;
        prop_assert_eq!(total_weight(&r, &[CartItem::new(1, q)]), expected);
    }

    #[test]
    fn splitting_a_cart_across_lines_changes_nothing(a in 0u32..50, b in 0u32..50) {
        let r = reg();
        let split = [CartItem::new(1050, a), CartItem::new(1050, b)];
        let merged = [CartItem::new(1050, a + b)];
        prop_assert_eq!(total_weight(&r, &split), total_weight(&r, &merged));
    }

    #[test]
    fn cost_is_monotonic_within_one_parcel(
        c in country(),
        pickup in any::<bool>(),
        w in 0u32..=30000,
        dw in 0u32..=30000,
    ) {
        let r = reg();
        let country = r.lookup(c).unwrap();
        let (service, _) = country.resolve_service(pickup).unwrap();
        let ceiling = country.max_package_weight(service).unwrap();
        let w = w.min(ceiling);
        let w2 = (w + dw).min(ceiling);
        let lo = shipping_cost(&r, w, c, pickup).unwrap();
        let hi = shipping_cost(&r, w2, c, pickup).unwrap();
        prop_assert!(lo <= hi, "{c} {w}g={lo} > {w2}g={hi}");
    }

    #[test]
    fn packages_sum_to_totals(c in country(), w in 0u32..200_000) {
        let r = reg();
        // pickup preferred: multi-parcel allowed wherever pickup exists
        match shipment_info(&r, w, c, true) {
            Ok(info) => {
                let weight: u32 = info.packages.iter().map(|p| p.weight).sum();
                let cost: Decimal = info.packages.iter().map(|p| p.cost).sum();
                prop_assert_eq!(weight, info.total_weight);
                prop_assert_eq!(cost, info.total_cost);
                prop_assert_eq!(info.cost, info.total_cost);
                prop_assert_eq!(info.package_count, info.packages.len());
            }
            Err(e) => {
                // only home-delivery-only countries refuse heavy shipments
                prop_assert!(!r.lookup(c).unwrap().pickup_point_available, "{e}");
                prop_assert!(w > 25000);
            }
        }
    }

    #[test]
    fn pricing_is_idempotent(c in country(), pickup in any::<bool>(), w in 0u32..60_000) {
        let r = reg();
        let first = shipping_cost(&r, w, c, pickup).map_err(|e| e.to_string());
        let second = shipping_cost(&r, w, c, pickup).map_err(|e| e.to_string());
        prop_assert_eq!(first, second);
    }
}
