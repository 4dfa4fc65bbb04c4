use anyhow::{bail, Context, Result};
use cap_shipping::{CartItem, CountryRegistry};
use clap::Args;

/// Registry keys are upper-case ISO codes; accept " fr " from the command line.
fn country_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

fn read_json(path_or_inline: &str) -> Result<serde_json::Value> {
    if std::path::Path::new(path_or_inline).exists() {
        Ok(serde_json::from_str(&std::fs::read_to_string(
            path_or_inline,
        )?)?)
    } else {
        Ok(serde_json::from_str(path_or_inline)?)
    }
}

// ---------------------------------------------------------------------------
// shipcalc quote
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Destination country code (FR, BE, DE, ...)
    #[arg(long)]
    pub country: String,
    /// Number of bottles in the cart
    #[arg(long, conflicts_with_all = ["cart", "weight"])]
    pub qty: Option<u32>,
    /// Cart JSON: [{"unit_weight":1050,"quantity":2}, ...] or path to file
    #[arg(long, conflicts_with = "weight")]
    pub cart: Option<String>,
    /// Total shipment weight in grams, skipping the packing rules
    #[arg(long)]
    pub weight: Option<u32>,
    /// Home delivery instead of pickup point
    #[arg(long)]
    pub home: bool,
    /// Print the full breakdown as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn quote(reg: &CountryRegistry, args: QuoteArgs) -> Result<()> {
    let prefer_pickup_point = !args.home;
    let country = country_code(&args.country);
    let info = match (args.qty, args.cart.as_deref(), args.weight) {
        (Some(qty), _, _) => {
            let cart = [CartItem::new(reg.packing().unit_weight, qty)];
            cap_shipping::quote_cart(reg, &cart, &country, prefer_pickup_point)?
        }
        (_, Some(cart), _) => {
            let value = read_json(cart)?;
            let cart: Vec<CartItem> = serde_json::from_value(value)
                .context("cart must be a list of {unit_weight, quantity}")?;
            cap_shipping::quote_cart(reg, &cart, &country, prefer_pickup_point)?
        }
        (_, _, Some(weight)) => {
            cap_shipping::shipment_info(reg, weight, &country, prefer_pickup_point)?
        }
        (None, None, None) => bail!("one of --qty, --cart or --weight is required"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }
    println!("{} ({})", info.country.name, info.country.code);
    println!("service:  {}", info.service);
    println!("weight:   {}", info.formatted_weight);
    println!("parcels:  {}", info.package_details);
    println!("delivery: {}", info.delivery_time);
    println!("cost:     {} EUR", info.cost);
    Ok(())
}

// ---------------------------------------------------------------------------
// shipcalc countries
// ---------------------------------------------------------------------------

pub fn countries(reg: &CountryRegistry, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(reg.supported_countries())?
        );
        return Ok(());
    }
    println!("{} {}", reg.carrier(), reg.version());
    for c in reg.supported_countries().values() {
        let services = cap_shipping::available_services(reg, &c.code)?;
        println!(
            "{}  {:<12} pickup_point={:<5} home_delivery={:<5} {}",
            c.code, c.name, services.pickup_point, services.home_delivery, c.delivery_time
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// shipcalc validate
// ---------------------------------------------------------------------------

pub fn validate(reg: &CountryRegistry, country: &str, weight: u32) -> Result<()> {
    let v = cap_shipping::validate_package_weight(reg, weight, &country_code(country));
    println!("{}", serde_json::to_string(&v)?);
    if !v.is_valid {
        bail!(v.error.unwrap_or_else(|| "invalid weight".into()));
    }
    Ok(())
}
