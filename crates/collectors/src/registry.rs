//! Built-in collector registration.

use std::sync::Arc;

use awsmap_scanner::CollectorRegistry;

use crate::cloudfront::CloudFrontCollector;
use crate::dynamodb::DynamoDbCollector;
use crate::ec2::Ec2Collector;
use crate::globalaccelerator::GlobalAcceleratorCollector;
use crate::iam::IamCollector;
use crate::lambda::LambdaCollector;
use crate::rds::RdsCollector;
use crate::route53::Route53Collector;
use crate::s3::S3Collector;
use crate::sns::SnsCollector;
use crate::sqs::SqsCollector;
use crate::AwsContext;

/// Build the registry of every SDK-backed collector this crate ships.
pub fn builtin_registry(ctx: &AwsContext) -> CollectorRegistry {
    let mut registry = CollectorRegistry::new();
    registry.register(Arc::new(Ec2Collector::new(ctx.clone())));
    registry.register(Arc::new(S3Collector::new(ctx.clone())));
    registry.register(Arc::new(RdsCollector::new(ctx.clone())));
    registry.register(Arc::new(DynamoDbCollector::new(ctx.clone())));
    registry.register(Arc::new(LambdaCollector::new(ctx.clone())));
    registry.register(Arc::new(SnsCollector::new(ctx.clone())));
    registry.register(Arc::new(SqsCollector::new(ctx.clone())));
    registry.register(Arc::new(IamCollector::new(ctx.clone())));
    registry.register(Arc::new(CloudFrontCollector::new(ctx.clone())));
    registry.register(Arc::new(Route53Collector::new(ctx.clone())));
    registry.register(Arc::new(GlobalAcceleratorCollector::new(ctx.clone())));
    registry
}
