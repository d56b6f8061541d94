use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use function_deploy_core::artifact::ArtifactSource;
use function_deploy_core::contract::{DEFAULT_DESCRIPTION, DEFAULT_RUNTIME};
use function_deploy_core::{
    deploy, deploy_with_role_provisioning, DeployParams, FunctionCreator, RoleProvisioner,
    RuntimeTag,
};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

pub const USAGE: &str = "create_function <functionName> <filePath> <role> <handler> [OPTIONS]";

pub const ARGUMENTS_HELP: &str = "Where:\n    \
    functionName - the name of the Lambda function\n    \
    filePath - the path to the ZIP or JAR where the code is located\n    \
    role - the role ARN that has Lambda permissions (a role name with --create-role)\n    \
    handler - the fully qualified method name (for example, example.Handler::handleRequest)";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "create_function",
    version,
    about = "Create a Lambda function from a local code artifact",
    override_usage = USAGE,
    after_help = ARGUMENTS_HELP
)]
pub struct Cli {
    /// Name of the function to create
    #[arg(value_name = "functionName")]
    pub function_name: String,
    /// ZIP or JAR holding the function code
    #[arg(value_name = "filePath")]
    pub file_path: PathBuf,
    /// ARN of the execution role, or its name with --create-role
    #[arg(value_name = "role")]
    pub role: String,
    /// Entry point inside the artifact
    #[arg(value_name = "handler")]
    pub handler: String,
    /// Runtime identifier
    #[arg(long, env = "FUNCTION_RUNTIME", default_value = DEFAULT_RUNTIME)]
    pub runtime: RuntimeTag,
    /// Region to deploy into; falls back to the SDK default chain
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,
    #[arg(long, default_value = DEFAULT_DESCRIPTION)]
    pub description: String,
    /// Publish a numbered version on create
    #[arg(long)]
    pub publish: bool,
    /// Treat filePath as a single handler source file and zip it in memory
    #[arg(long)]
    pub package_source: bool,
    /// Treat role as a role name; create it with basic execution permissions
    /// or reuse it when it already exists
    #[arg(long)]
    pub create_role: bool,
}

impl Cli {
    pub fn deploy_params(&self) -> DeployParams {
        let artifact = if self.package_source {
            ArtifactSource::HandlerSource(self.file_path.clone())
        } else {
            ArtifactSource::Archive(self.file_path.clone())
        };

        DeployParams {
            name: self.function_name.clone(),
            artifact,
            role: self.role.clone(),
            handler: self.handler.clone(),
            runtime: self.runtime.clone(),
            description: self.description.clone(),
            publish: self.publish,
        }
    }
}

pub fn parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Prints a parse outcome and returns the exit code for it. Help and version
/// requests go to stdout and succeed; everything else is a usage failure.
pub fn report_parse_error(
    error: &clap::Error,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> u8 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(stdout, "{}", error.render());
            EXIT_SUCCESS
        }
        _ => {
            let _ = writeln!(stderr, "{}", error.render());
            let _ = writeln!(stderr, "{ARGUMENTS_HELP}");
            EXIT_FAILURE
        }
    }
}

pub fn run_deploy(
    cli: &Cli,
    creator: &impl FunctionCreator,
    provisioner: &impl RoleProvisioner,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> u8 {
    let params = cli.deploy_params();
    let outcome = if cli.create_role {
        deploy_with_role_provisioning(creator, provisioner, &params)
    } else {
        deploy(creator, &params)
    };

    match outcome {
        Ok(created) => {
            let _ = writeln!(stdout, "The function ARN is {}", created.function_arn);
            if let Some(version) = created.version.as_deref().filter(|_| cli.publish) {
                let _ = writeln!(stdout, "Published version {version}");
            }
            EXIT_SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            EXIT_FAILURE
        }
    }
}

/// Parses `args`, builds the remote clients from the parsed flags, and
/// deploys.
///
/// `connect` only runs once the arguments are valid, so a usage error never
/// touches the remote service.
pub fn run_with<I, T, C, P, F>(
    args: I,
    connect: F,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    C: FunctionCreator,
    P: RoleProvisioner,
    F: FnOnce(&Cli) -> (C, P),
{
    let cli = match parse_cli(args) {
        Ok(cli) => cli,
        Err(error) => return report_parse_error(&error, stdout, stderr),
    };

    let (creator, provisioner) = connect(&cli);
    run_deploy(&cli, &creator, &provisioner, stdout, stderr)
}
