//! Shared helpers for mapping SDK failures and regional client setup.

use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use awsmap_scanner::CollectError;

/// Map an SDK error into the scanner's typed failure taxonomy.
///
/// Classification is by provider error code where one exists; codes vary in
/// spelling across services, so the throttling/authorization families match
/// every known variant.
pub(crate) fn classify<E, R>(region: &str, err: SdkError<E, R>) -> CollectError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let message = format!("{}", DisplayErrorContext(&err));
    match err.code() {
        Some(
            "Throttling" | "ThrottlingException" | "TooManyRequestsException"
            | "RequestLimitExceeded" | "SlowDown",
        ) => CollectError::Throttled(message),
        Some(
            "AccessDenied" | "AccessDeniedException" | "UnauthorizedOperation" | "AuthFailure"
            | "NotAuthorized",
        ) => CollectError::AccessDenied(message),
        // Opt-in regions the account has not enabled reject with these.
        Some("OptInRequired" | "InvalidClientTokenId") => CollectError::UnsupportedRegion {
            region: region.to_string(),
        },
        Some(_) => CollectError::Api(message),
        None => match &err {
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
                CollectError::Transport(message)
            }
            _ => CollectError::Api(message),
        },
    }
}

/// Trim an ARN down to its trailing name segment.
pub(crate) fn arn_name(arn: &str) -> String {
    arn.rsplit(['/', ':'])
        .next()
        .unwrap_or(arn)
        .to_string()
}
