//! AWS Lambda adapter and command-line surface for function deployment.
//!
//! The deploy operation itself lives in `function_deploy_core`; this crate
//! supplies the `aws-sdk-lambda` backed `FunctionCreator` and the CLI that
//! wires arguments and environment into it.

pub mod adapters;
pub mod cli;
