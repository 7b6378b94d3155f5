//! AWS SDK-backed collectors for the awsmap scanner.
//!
//! Each module wraps one service's enumeration API in a thin
//! [`awsmap_scanner::Collector`] implementation: call the provider, map the
//! response into [`awsmap_scanner::ResourceRecord`]s, and surface failures
//! as typed [`awsmap_scanner::CollectError`]s. The orchestrator never sees
//! any of these types directly; it reaches them through the registry built
//! by [`builtin_registry`].
//!
//! The crate also provides the two account-level inputs the scanner treats
//! as opaque: caller identity ([`account::resolve_identity`]) and the
//! enabled-region list ([`regions::enabled_regions`]).

pub mod account;
pub mod regions;
mod registry;
mod util;

mod cloudfront;
mod dynamodb;
mod ec2;
mod globalaccelerator;
mod iam;
mod lambda;
mod rds;
mod route53;
mod s3;
mod sns;
mod sqs;

use aws_config::{BehaviorVersion, SdkConfig};

pub use account::{resolve_identity, IdentityError};
pub use regions::enabled_regions;
pub use registry::builtin_registry;

/// Shared provider session: resolved credentials plus the scanned account's
/// id (collectors need it to construct ARNs the provider does not return).
#[derive(Debug, Clone)]
pub struct AwsContext {
    pub config: SdkConfig,
    pub account_id: String,
}

/// Load the provider configuration from the default credential chain,
/// optionally pinned to a named profile.
pub async fn load_config(profile: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}
