use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_DESCRIPTION: &str = "Created by the function deploy CLI";
pub const DEFAULT_RUNTIME: &str = "python3.12";

/// Provider runtime identifier, e.g. `python3.12`, `java21`, `provided.al2023`.
///
/// The set of accepted tags changes as the provider retires runtimes, so the
/// value is carried as an opaque string and only checked for emptiness here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RuntimeTag(String);

impl RuntimeTag {
    pub fn new(tag: impl Into<String>) -> Result<Self, ValidationError> {
        let tag = tag.into();
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("runtime tag must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RuntimeTag {
    fn default() -> Self {
        Self(DEFAULT_RUNTIME.to_string())
    }
}

impl std::fmt::Display for RuntimeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RuntimeTag {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub name: String,
    pub artifact_bytes: Vec<u8>,
    pub role: String,
    pub handler: String,
    pub runtime: RuntimeTag,
    pub description: String,
    pub publish: bool,
}

impl DeploymentRequest {
    /// Local checks only; role and handler are opaque to this side.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("function name must not be empty"));
        }
        if self.artifact_bytes.is_empty() {
            return Err(ValidationError::new("artifact must not be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for DeploymentRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentRequest")
            .field("name", &self.name)
            .field("artifact_len", &self.artifact_bytes.len())
            .field("role", &self.role)
            .field("handler", &self.handler)
            .field("runtime", &self.runtime)
            .field("description", &self.description)
            .field("publish", &self.publish)
            .finish()
    }
}

/// Identifier and metadata reported by the service for a newly created function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedFunction {
    pub function_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_size: Option<i64>,
}

impl CreatedFunction {
    pub fn new(function_arn: impl Into<String>) -> Self {
        Self {
            function_arn: function_arn.into(),
            version: None,
            code_sha256: None,
            code_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> DeploymentRequest {
        DeploymentRequest {
            name: "lambda-test-function".to_string(),
            artifact_bytes: b"PK\x03\x04".to_vec(),
            role: "arn:aws:iam::123456789012:role/lambda-demo".to_string(),
            handler: "mylambda.my_handler".to_string(),
            runtime: RuntimeTag::default(),
            description: DEFAULT_DESCRIPTION.to_string(),
            publish: false,
        }
    }

    #[test]
    fn runtime_tag_rejects_blank_values() {
        let error = RuntimeTag::new("   ").expect_err("blank runtime should fail");
        assert_eq!(error.message(), "runtime tag must not be empty");
    }

    #[test]
    fn runtime_tag_trims_and_parses() {
        let tag: RuntimeTag = " java21 ".parse().expect("runtime should parse");
        assert_eq!(tag.as_str(), "java21");
        assert_eq!(RuntimeTag::default().as_str(), DEFAULT_RUNTIME);
    }

    #[test]
    fn validate_accepts_opaque_role_and_handler() {
        let mut request = sample_request();
        request.role = "not-an-arn".to_string();
        request.handler = String::new();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let mut request = sample_request();
        request.name = " ".to_string();
        let error = request.validate().expect_err("blank name should fail");
        assert_eq!(error.message(), "function name must not be empty");
    }

    #[test]
    fn validate_rejects_empty_artifact() {
        let mut request = sample_request();
        request.artifact_bytes.clear();
        let error = request.validate().expect_err("empty artifact should fail");
        assert_eq!(error.message(), "artifact must not be empty");
    }

    #[test]
    fn debug_output_omits_artifact_bytes() {
        let rendered = format!("{:?}", sample_request());
        assert!(rendered.contains("artifact_len: 4"));
        assert!(!rendered.contains("artifact_bytes"));
    }

    #[test]
    fn created_function_serializes_without_missing_fields() {
        let value = serde_json::to_value(CreatedFunction::new("arn:aws:lambda:us-east-1:1:function:f"))
            .expect("created function should serialize");
        assert_eq!(
            value,
            serde_json::json!({"function_arn": "arn:aws:lambda:us-east-1:1:function:f"})
        );
    }
}
