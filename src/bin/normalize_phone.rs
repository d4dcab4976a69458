//! Utility to normalize phone numbers the same way the API does.
//!
//! Usage: `normalize_phone [--region BR] <phone>...`

use phone_address_api::config::Config;
use phone_address_api::phone::{normalize_phone_in, parse_region};

/// Main entry point for the normalization utility.
///
/// Prints `input -> +E164` per argument and exits non-zero if any input is rejected.
fn main() -> anyhow::Result<()> {
    let mut region = Config::from_env()?.default_region;
    let mut inputs = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--region" {
            let code = args
                .next()
                .ok_or_else(|| anyhow::anyhow!("--region requires a value"))?;
            region = parse_region(&code)
                .ok_or_else(|| anyhow::anyhow!("Unknown region code: {}", code))?;
        } else {
            inputs.push(arg);
        }
    }

    if inputs.is_empty() {
        anyhow::bail!("Usage: normalize_phone [--region CC] <phone>...");
    }

    let mut rejected = 0;
    for input in &inputs {
        match normalize_phone_in(region, input) {
            Ok(phone) => println!("{} -> {}", input, phone),
            Err(e) => {
                rejected += 1;
                println!("{} -> {}", input, e);
            }
        }
    }

    if rejected > 0 {
        anyhow::bail!("{} of {} inputs rejected", rejected, inputs.len());
    }

    Ok(())
}
