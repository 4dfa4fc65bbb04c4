use crate::api::CartItem;
use crate::config::{PackingRules, WeightSource};

/// Shippable weight of a cart in grams: product weight plus one box per
/// `box_capacity` units. An empty cart weighs 0g (no box).
pub fn total_weight(packing: &PackingRules, cart: &[CartItem]) -> u32 {
    let products_weight = match packing.weight_source {
        WeightSource::Fixed => total_units(cart).saturating_mul(u64::from(packing.unit_weight)),
        WeightSource::Item => cart
            .iter()
            .map(|i| u64::from(i.unit_weight) * u64::from(i.quantity))
            .fold(0u64, u64::saturating_add),
    };
    let boxes_weight = boxes_needed(packing, cart).saturating_mul(u64::from(packing.box_weight));

    u32::try_from(products_weight.saturating_add(boxes_weight)).unwrap_or(u32::MAX)
}

/// Number of boxes the packing rules need for a cart.
pub fn boxes_needed(packing: &PackingRules, cart: &[CartItem]) -> u64 {
    total_units(cart).div_ceil(u64::from(packing.box_capacity.max(1)))
}

fn total_units(cart: &[CartItem]) -> u64 {
    cart.iter()
        .map(|i| u64::from(i.quantity))
        .fold(0u64, u64::saturating_add)
}
