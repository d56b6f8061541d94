use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Terminal failures of a single deploy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    /// The artifact path is missing, not a regular file, or unreadable.
    ArtifactNotFound { path: PathBuf, reason: String },
    /// The artifact was read but could not be zipped.
    PackagingFailed { path: PathBuf, reason: String },
    /// The request was rejected locally before any remote call.
    InvalidRequest(ValidationError),
    /// The execution role could not be created or looked up.
    RoleProvisioningFailed(String),
    /// The remote client reported an error.
    DeploymentFailed(String),
}

impl DeployError {
    pub fn artifact_not_found(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DeployError::ArtifactNotFound {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn packaging_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DeployError::PackagingFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DeployError::ArtifactNotFound { .. } => "artifact_not_found",
            DeployError::PackagingFailed { .. } => "packaging_failed",
            DeployError::InvalidRequest(_) => "invalid_request",
            DeployError::RoleProvisioningFailed(_) => "role_provisioning_failed",
            DeployError::DeploymentFailed(_) => "deployment_failed",
        }
    }
}

impl std::fmt::Display for DeployError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployError::ArtifactNotFound { path, reason } => {
                write!(f, "artifact '{}' could not be read: {reason}", path.display())
            }
            DeployError::PackagingFailed { path, reason } => {
                write!(f, "artifact '{}' could not be packaged: {reason}", path.display())
            }
            DeployError::InvalidRequest(error) => write!(f, "invalid deployment request: {error}"),
            DeployError::RoleProvisioningFailed(message) => {
                write!(f, "execution role could not be provisioned: {message}")
            }
            DeployError::DeploymentFailed(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeployError::InvalidRequest(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ValidationError> for DeployError {
    fn from(error: ValidationError) -> Self {
        DeployError::InvalidRequest(error)
    }
}
