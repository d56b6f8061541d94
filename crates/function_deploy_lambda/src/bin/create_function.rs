use std::io;
use std::process::ExitCode;

use function_deploy_lambda::adapters::iam_roles::AwsIamRoleProvisioner;
use function_deploy_lambda::adapters::lambda_client::AwsLambdaFunctionCreator;
use function_deploy_lambda::adapters::load_sdk_config;
use function_deploy_lambda::cli::run_with;

#[tokio::main]
async fn main() -> ExitCode {
    let code = run_with(
        std::env::args_os(),
        |cli| {
            let region = cli.region.clone();
            let config = tokio::task::block_in_place(|| {
                tokio::runtime::Handle::current().block_on(load_sdk_config(region.as_deref()))
            });
            (
                AwsLambdaFunctionCreator::from_config(&config),
                AwsIamRoleProvisioner::from_config(&config),
            )
        },
        &mut io::stdout(),
        &mut io::stderr(),
    );
    ExitCode::from(code)
}
