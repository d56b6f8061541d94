use std::time::Instant;

use serde_json::json;

use crate::artifact::{artifact_fingerprint, ArtifactSource};
use crate::contract::{CreatedFunction, DeploymentRequest, RuntimeTag, DEFAULT_DESCRIPTION};
use crate::error::DeployError;
use crate::log::{log_error, log_info};
use crate::role::{ensure_execution_role, RoleProvisioner};

/// Remote capability that registers a function from a fully built request.
pub trait FunctionCreator {
    fn create_function(&self, request: &DeploymentRequest) -> Result<CreatedFunction, String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployParams {
    pub name: String,
    pub artifact: ArtifactSource,
    pub role: String,
    pub handler: String,
    pub runtime: RuntimeTag,
    pub description: String,
    pub publish: bool,
}

impl DeployParams {
    pub fn new(
        name: impl Into<String>,
        artifact: ArtifactSource,
        role: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            artifact,
            role: role.into(),
            handler: handler.into(),
            runtime: RuntimeTag::default(),
            description: DEFAULT_DESCRIPTION.to_string(),
            publish: false,
        }
    }

    /// Name as submitted and logged; surrounding whitespace is dropped.
    pub fn function_name(&self) -> &str {
        self.name.trim()
    }
}

/// Loads the artifact, builds the request, and submits it once.
///
/// Nothing reaches `creator` unless the artifact was read and the request
/// passed local validation.
pub fn deploy(
    creator: &impl FunctionCreator,
    params: &DeployParams,
) -> Result<CreatedFunction, DeployError> {
    logged(params, || {
        let request = prepare_request(params)?;
        submit(creator, &request)
    })
}

/// Like `deploy`, but `params.role` is a role name. The role is created (or
/// reused) only after the artifact is loaded and validated, and its ARN is
/// what gets submitted.
pub fn deploy_with_role_provisioning(
    creator: &impl FunctionCreator,
    provisioner: &impl RoleProvisioner,
    params: &DeployParams,
) -> Result<CreatedFunction, DeployError> {
    logged(params, || {
        let mut request = prepare_request(params)?;
        request.role = ensure_execution_role(provisioner, &params.role)?.role_arn;
        submit(creator, &request)
    })
}

fn logged(
    params: &DeployParams,
    attempt: impl FnOnce() -> Result<CreatedFunction, DeployError>,
) -> Result<CreatedFunction, DeployError> {
    let started_at = Instant::now();
    log_info(
        "deploy_started",
        json!({
            "function_name": params.function_name(),
            "artifact_path": params.artifact.path().display().to_string(),
            "artifact_kind": params.artifact.kind(),
            "runtime": params.runtime.as_str(),
            "handler": params.handler.clone(),
        }),
    );

    match attempt() {
        Ok(created) => {
            log_info(
                "deploy_completed",
                json!({
                    "function_name": params.function_name(),
                    "function": created.clone(),
                    "duration_ms": started_at.elapsed().as_millis(),
                }),
            );
            Ok(created)
        }
        Err(error) => {
            log_error(
                "deploy_failed",
                json!({
                    "function_name": params.function_name(),
                    "error_kind": error.kind(),
                    "error": error.to_string(),
                    "duration_ms": started_at.elapsed().as_millis(),
                }),
            );
            Err(error)
        }
    }
}

fn prepare_request(params: &DeployParams) -> Result<DeploymentRequest, DeployError> {
    let artifact_bytes = params.artifact.load()?;
    log_info(
        "artifact_loaded",
        json!({
            "function_name": params.function_name(),
            "artifact_bytes": artifact_bytes.len(),
            "artifact_sha256": artifact_fingerprint(&artifact_bytes),
        }),
    );

    let request = DeploymentRequest {
        name: params.function_name().to_string(),
        artifact_bytes,
        role: params.role.clone(),
        handler: params.handler.clone(),
        runtime: params.runtime.clone(),
        description: params.description.clone(),
        publish: params.publish,
    };
    request.validate()?;
    Ok(request)
}

fn submit(
    creator: &impl FunctionCreator,
    request: &DeploymentRequest,
) -> Result<CreatedFunction, DeployError> {
    creator
        .create_function(request)
        .map_err(DeployError::DeploymentFailed)
}
