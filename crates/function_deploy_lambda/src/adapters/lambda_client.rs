use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::operation::create_function::CreateFunctionOutput;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{FunctionCode, Runtime};
use function_deploy_core::{CreatedFunction, DeploymentRequest, FunctionCreator, RuntimeTag};

/// `FunctionCreator` backed by the Lambda `CreateFunction` API.
///
/// Must be called from inside a multi-threaded tokio runtime; the async SDK
/// call is driven to completion on the current thread.
#[derive(Clone)]
pub struct AwsLambdaFunctionCreator {
    lambda_client: aws_sdk_lambda::Client,
}

impl AwsLambdaFunctionCreator {
    pub fn new(lambda_client: aws_sdk_lambda::Client) -> Self {
        Self { lambda_client }
    }

    pub fn from_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(aws_sdk_lambda::Client::new(config))
    }
}

impl FunctionCreator for AwsLambdaFunctionCreator {
    fn create_function(&self, request: &DeploymentRequest) -> Result<CreatedFunction, String> {
        let client = &self.lambda_client;

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                client
                    .create_function()
                    .function_name(request.name.as_str())
                    .description(request.description.as_str())
                    .role(request.role.as_str())
                    .handler(request.handler.as_str())
                    .runtime(runtime_for(&request.runtime))
                    .code(zip_file_code(&request.artifact_bytes))
                    .publish(request.publish)
                    .send()
                    .await
                    .map_err(|error| {
                        format!(
                            "failed to create function '{}': {}",
                            request.name,
                            DisplayErrorContext(&error)
                        )
                    })
                    .and_then(created_function_from_output)
            })
        })
    }
}

/// Unknown tags pass through unchanged so newly launched runtimes work
/// before the SDK enum learns about them.
pub fn runtime_for(tag: &RuntimeTag) -> Runtime {
    Runtime::from(tag.as_str())
}

fn zip_file_code(artifact_bytes: &[u8]) -> FunctionCode {
    FunctionCode::builder()
        .zip_file(Blob::new(artifact_bytes.to_vec()))
        .build()
}

pub fn created_function_from_output(
    output: CreateFunctionOutput,
) -> Result<CreatedFunction, String> {
    let function_arn = output
        .function_arn()
        .filter(|arn| !arn.is_empty())
        .ok_or_else(|| "create function response did not include a function ARN".to_string())?;

    Ok(CreatedFunction {
        function_arn: function_arn.to_string(),
        version: output.version().map(str::to_string),
        code_sha256: output.code_sha256().map(str::to_string),
        code_size: Some(output.code_size()),
    })
}
