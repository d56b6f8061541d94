use std::time::Duration;

use aws_sdk_iam::client::Waiters;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::operation::create_role::CreateRoleError;
use function_deploy_core::{RoleCreateError, RoleProvisioner};

const ROLE_EXISTS_MAX_WAIT: Duration = Duration::from_secs(60);

/// `RoleProvisioner` backed by the IAM role APIs.
///
/// Same runtime requirement as `AwsLambdaFunctionCreator`: call from inside a
/// multi-threaded tokio runtime.
#[derive(Clone)]
pub struct AwsIamRoleProvisioner {
    iam_client: aws_sdk_iam::Client,
}

impl AwsIamRoleProvisioner {
    pub fn new(iam_client: aws_sdk_iam::Client) -> Self {
        Self { iam_client }
    }

    pub fn from_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(aws_sdk_iam::Client::new(config))
    }
}

impl RoleProvisioner for AwsIamRoleProvisioner {
    fn create_role(&self, role_name: &str, trust_policy: &str) -> Result<String, RoleCreateError> {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(create_role_and_wait(
                &self.iam_client,
                role_name,
                trust_policy,
            ))
        })
    }

    fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> Result<(), String> {
        let client = &self.iam_client;

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                client
                    .attach_role_policy()
                    .role_name(role_name)
                    .policy_arn(policy_arn)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        format!(
                            "failed to attach policy '{policy_arn}' to role '{role_name}': {}",
                            DisplayErrorContext(&error)
                        )
                    })
            })
        })
    }

    fn role_arn(&self, role_name: &str) -> Result<String, String> {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(get_role_arn(&self.iam_client, role_name))
        })
    }
}

async fn create_role_and_wait(
    client: &aws_sdk_iam::Client,
    role_name: &str,
    trust_policy: &str,
) -> Result<String, RoleCreateError> {
    let output = client
        .create_role()
        .role_name(role_name)
        .assume_role_policy_document(trust_policy)
        .send()
        .await
        .map_err(|error| {
            if error
                .as_service_error()
                .is_some_and(is_entity_already_exists)
            {
                RoleCreateError::AlreadyExists
            } else {
                RoleCreateError::Failed(format!(
                    "failed to create role '{role_name}': {}",
                    DisplayErrorContext(&error)
                ))
            }
        })?;

    let role_arn = output
        .role()
        .map(|role| role.arn().to_string())
        .ok_or_else(|| {
            RoleCreateError::Failed("create role response did not include a role".to_string())
        })?;

    client
        .wait_until_role_exists()
        .role_name(role_name)
        .wait(ROLE_EXISTS_MAX_WAIT)
        .await
        .map_err(|error| {
            RoleCreateError::Failed(format!(
                "role '{role_name}' did not become visible: {}",
                DisplayErrorContext(&error)
            ))
        })?;

    Ok(role_arn)
}

async fn get_role_arn(client: &aws_sdk_iam::Client, role_name: &str) -> Result<String, String> {
    let output = client
        .get_role()
        .role_name(role_name)
        .send()
        .await
        .map_err(|error| {
            format!(
                "failed to look up role '{role_name}': {}",
                DisplayErrorContext(&error)
            )
        })?;

    output
        .role()
        .map(|role| role.arn().to_string())
        .ok_or_else(|| format!("role '{role_name}' lookup returned no role"))
}

fn is_entity_already_exists(error: &CreateRoleError) -> bool {
    error.is_entity_already_exists_exception()
}
