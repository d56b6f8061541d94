//! Provider-neutral function deployment primitives.
//!
//! This crate owns the create-function request contract, artifact loading and
//! packaging, execution-role provisioning, and the single-shot deploy
//! operation. It intentionally excludes AWS SDK and runtime concerns; those
//! live behind the `FunctionCreator` and `RoleProvisioner` traits.

pub mod artifact;
pub mod contract;
pub mod deployer;
pub mod error;
mod log;
pub mod role;

pub use contract::{CreatedFunction, DeploymentRequest, RuntimeTag};
pub use deployer::{deploy, deploy_with_role_provisioning, DeployParams, FunctionCreator};
pub use error::{DeployError, ValidationError};
pub use role::{ensure_execution_role, ExecutionRole, RoleCreateError, RoleProvisioner};
