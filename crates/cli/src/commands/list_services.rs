//! `--list-services`: print the available collectors and exit.

use anyhow::Result;

use awsmap_collectors::{builtin_registry, load_config, AwsContext};
use awsmap_config::Config;

/// Listing needs no credentials; the registry is built from an unresolved
/// session and never invoked.
pub async fn run(config: &Config) -> Result<()> {
    let sdk_config = load_config(config.scan.profile.as_deref()).await;
    let ctx = AwsContext {
        config: sdk_config,
        account_id: String::new(),
    };
    let registry = builtin_registry(&ctx);

    let services: Vec<String> = registry.services().map(str::to_string).collect();
    println!("\nAvailable service collectors ({}):\n", services.len());
    for (i, service) in services.iter().enumerate() {
        println!("  {:>3}. {service}", i + 1);
    }
    println!();
    Ok(())
}
