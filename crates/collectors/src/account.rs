//! Account identity resolution.
//!
//! Responsibilities:
//! - Validate credentials and resolve the caller's account id and ARN
//!   before any planning happens.
//! - Best-effort lookup of the account alias for report headers.
//!
//! Does NOT handle:
//! - Credential acquisition itself (the default chain / named profile is
//!   resolved by `aws-config`).

use aws_config::SdkConfig;
use aws_sdk_sts::error::DisplayErrorContext;
use thiserror::Error;

use awsmap_scanner::AccountIdentity;

/// Credential validation failure; fatal before a scan starts.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("invalid or missing AWS credentials: {0}")]
    InvalidCredentials(String),
}

/// Resolve the caller identity, failing fast on unusable credentials.
///
/// The account alias is optional decoration: an error there (commonly a
/// missing `iam:ListAccountAliases` permission) is logged and ignored.
pub async fn resolve_identity(config: &SdkConfig) -> Result<AccountIdentity, IdentityError> {
    let sts = aws_sdk_sts::Client::new(config);
    let caller = sts
        .get_caller_identity()
        .send()
        .await
        .map_err(|err| IdentityError::InvalidCredentials(format!("{}", DisplayErrorContext(&err))))?;

    let account_id = caller
        .account()
        .ok_or_else(|| {
            IdentityError::InvalidCredentials("caller identity has no account id".to_string())
        })?
        .to_string();

    let mut identity = AccountIdentity::new(account_id);
    identity.caller_arn = caller.arn().map(str::to_string);
    identity.account_alias = lookup_alias(config).await;
    Ok(identity)
}

async fn lookup_alias(config: &SdkConfig) -> Option<String> {
    let iam = aws_sdk_iam::Client::new(config);
    match iam.list_account_aliases().send().await {
        Ok(output) => output.account_aliases().first().cloned(),
        Err(err) => {
            tracing::debug!(error = %DisplayErrorContext(&err), "account alias unavailable");
            None
        }
    }
}
