use serde_json::json;

use crate::error::DeployError;
use crate::log::{log_error, log_info};

pub const BASIC_EXECUTION_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";
pub const LAMBDA_SERVICE_PRINCIPAL: &str = "lambda.amazonaws.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleCreateError {
    AlreadyExists,
    Failed(String),
}

/// Remote capability that manages execution roles by name.
pub trait RoleProvisioner {
    /// Creates the role and waits until it is visible, returning its ARN.
    fn create_role(&self, role_name: &str, trust_policy: &str) -> Result<String, RoleCreateError>;

    fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> Result<(), String>;

    fn role_arn(&self, role_name: &str) -> Result<String, String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRole {
    pub role_name: String,
    pub role_arn: String,
    pub created: bool,
}

/// Trust policy letting the function service assume the role.
pub fn lambda_trust_policy() -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Effect": "Allow",
                "Principal": { "Service": LAMBDA_SERVICE_PRINCIPAL },
                "Action": "sts:AssumeRole",
            }
        ],
    })
    .to_string()
}

/// Creates `role_name` with the basic execution policy attached, or reuses
/// the existing role of that name untouched.
pub fn ensure_execution_role(
    provisioner: &impl RoleProvisioner,
    role_name: &str,
) -> Result<ExecutionRole, DeployError> {
    let role_name = role_name.trim();
    if role_name.is_empty() {
        return Err(DeployError::RoleProvisioningFailed(
            "role name must not be empty".to_string(),
        ));
    }

    let result = match provisioner.create_role(role_name, &lambda_trust_policy()) {
        Ok(role_arn) => provisioner
            .attach_role_policy(role_name, BASIC_EXECUTION_POLICY_ARN)
            .map(|()| ExecutionRole {
                role_name: role_name.to_string(),
                role_arn,
                created: true,
            }),
        Err(RoleCreateError::AlreadyExists) => {
            provisioner
                .role_arn(role_name)
                .map(|role_arn| ExecutionRole {
                    role_name: role_name.to_string(),
                    role_arn,
                    created: false,
                })
        }
        Err(RoleCreateError::Failed(message)) => Err(message),
    };

    match result {
        Ok(role) => {
            log_info(
                if role.created {
                    "role_created"
                } else {
                    "role_reused"
                },
                json!({
                    "role_name": role.role_name.clone(),
                    "role_arn": role.role_arn.clone(),
                    "policy_arn": role.created.then_some(BASIC_EXECUTION_POLICY_ARN),
                }),
            );
            Ok(role)
        }
        Err(message) => {
            log_error(
                "role_failed",
                json!({
                    "role_name": role_name,
                    "error": message.clone(),
                }),
            );
            Err(DeployError::RoleProvisioningFailed(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::Value;

    use super::*;

    const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/aws-lambda-demo-role";

    struct RecordingProvisioner {
        calls: Mutex<Vec<String>>,
        create_outcome: Result<String, RoleCreateError>,
        attach_outcome: Result<(), String>,
    }

    impl RecordingProvisioner {
        fn with_create(create_outcome: Result<String, RoleCreateError>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                create_outcome,
                attach_outcome: Ok(()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("poisoned mutex").clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().expect("poisoned mutex").push(call);
        }
    }

    impl RoleProvisioner for RecordingProvisioner {
        fn create_role(
            &self,
            role_name: &str,
            trust_policy: &str,
        ) -> Result<String, RoleCreateError> {
            let policy: Value = serde_json::from_str(trust_policy).expect("policy should be JSON");
            assert_eq!(
                policy["Statement"][0]["Principal"]["Service"],
                LAMBDA_SERVICE_PRINCIPAL
            );
            self.record(format!("create:{role_name}"));
            self.create_outcome.clone()
        }

        fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> Result<(), String> {
            self.record(format!("attach:{role_name}:{policy_arn}"));
            self.attach_outcome.clone()
        }

        fn role_arn(&self, role_name: &str) -> Result<String, String> {
            self.record(format!("get:{role_name}"));
            Ok(ROLE_ARN.to_string())
        }
    }

    #[test]
    fn new_role_is_created_and_given_basic_execution_policy() {
        let provisioner = RecordingProvisioner::with_create(Ok(ROLE_ARN.to_string()));

        let role = ensure_execution_role(&provisioner, "aws-lambda-demo-role")
            .expect("role should be created");

        assert_eq!(role.role_arn, ROLE_ARN);
        assert!(role.created);
        assert_eq!(
            provisioner.calls(),
            vec![
                "create:aws-lambda-demo-role".to_string(),
                format!("attach:aws-lambda-demo-role:{BASIC_EXECUTION_POLICY_ARN}"),
            ]
        );
    }

    #[test]
    fn existing_role_is_reused_without_attaching_policy() {
        let provisioner = RecordingProvisioner::with_create(Err(RoleCreateError::AlreadyExists));

        let role = ensure_execution_role(&provisioner, "aws-lambda-demo-role")
            .expect("existing role should be reused");

        assert_eq!(role.role_arn, ROLE_ARN);
        assert!(!role.created);
        assert_eq!(
            provisioner.calls(),
            vec![
                "create:aws-lambda-demo-role".to_string(),
                "get:aws-lambda-demo-role".to_string(),
            ]
        );
    }

    #[test]
    fn create_failure_is_reported() {
        let provisioner = RecordingProvisioner::with_create(Err(RoleCreateError::Failed(
            "AccessDenied".to_string(),
        )));

        let error = ensure_execution_role(&provisioner, "aws-lambda-demo-role")
            .expect_err("create failure should propagate");

        assert_eq!(
            error,
            DeployError::RoleProvisioningFailed("AccessDenied".to_string())
        );
        assert_eq!(provisioner.calls().len(), 1);
    }

    #[test]
    fn attach_failure_is_reported() {
        let mut provisioner = RecordingProvisioner::with_create(Ok(ROLE_ARN.to_string()));
        provisioner.attach_outcome = Err("policy not attachable".to_string());

        let error = ensure_execution_role(&provisioner, "aws-lambda-demo-role")
            .expect_err("attach failure should propagate");

        assert_eq!(error.kind(), "role_provisioning_failed");
    }

    #[test]
    fn blank_role_name_never_reaches_provisioner() {
        let provisioner = RecordingProvisioner::with_create(Ok(ROLE_ARN.to_string()));

        let error = ensure_execution_role(&provisioner, "  ").expect_err("blank name should fail");

        assert_eq!(error.kind(), "role_provisioning_failed");
        assert!(provisioner.calls().is_empty());
    }
}
