use aws_config::SdkConfig;
use aws_sdk_lambda::config::Region;

pub mod iam_roles;
pub mod lambda_client;

/// Resolves configuration through the SDK default chain, pinning the region
/// when one is given. Shared by the Lambda and IAM clients.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
