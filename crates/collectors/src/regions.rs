//! Region enablement source.
//!
//! Asks the Account API which regions the account has enabled; falls back
//! to a static list of commercial regions when that API is unreachable
//! (older SDK permissions frequently lack `account:ListRegions`).

use aws_config::SdkConfig;
use aws_sdk_account::config::Region;
use aws_sdk_account::error::DisplayErrorContext;
use aws_sdk_account::types::RegionOptStatus;

/// Regions assumed enabled when the Account API cannot be queried.
const FALLBACK_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-north-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-south-1",
    "sa-east-1",
    "ca-central-1",
];

/// List the regions enabled for the account, sorted.
pub async fn enabled_regions(config: &SdkConfig) -> Vec<String> {
    // The Account API is only served from the us-east-1 endpoint.
    let account_config = aws_sdk_account::config::Builder::from(config)
        .region(Region::new("us-east-1"))
        .build();
    let client = aws_sdk_account::Client::from_conf(account_config);

    let mut regions = Vec::new();
    let mut pages = client
        .list_regions()
        .region_opt_status_contains(RegionOptStatus::Enabled)
        .region_opt_status_contains(RegionOptStatus::EnabledByDefault)
        .into_paginator()
        .send();
    loop {
        match pages.next().await {
            Some(Ok(page)) => {
                for region in page.regions() {
                    if let Some(name) = region.region_name() {
                        regions.push(name.to_string());
                    }
                }
            }
            Some(Err(err)) => {
                tracing::warn!(
                    error = %DisplayErrorContext(&err),
                    "falling back to the static region list"
                );
                return FALLBACK_REGIONS.iter().map(|r| r.to_string()).collect();
            }
            None => break,
        }
    }

    if regions.is_empty() {
        return FALLBACK_REGIONS.iter().map(|r| r.to_string()).collect();
    }
    regions.sort_unstable();
    regions
}
