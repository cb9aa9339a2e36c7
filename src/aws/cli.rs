//! AWS CLI invoker
//!
//! Runs `aws <service> <operation> --region <region> --output json` with the
//! call parameters passed through `--cli-input-json`.

use crate::error::InvokeError;
use crate::resource::{Invoker, Params, RawItem};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Maximum length of stderr kept in error messages
const MAX_ERROR_LENGTH: usize = 200;

/// Invoker that shells out to the `aws` CLI.
#[derive(Debug, Clone)]
pub struct AwsCliInvoker {
    program: PathBuf,
    profile: Option<String>,
}

impl AwsCliInvoker {
    pub fn new(profile: Option<String>) -> Self {
        Self {
            program: PathBuf::from("aws"),
            profile,
        }
    }

    /// Use a different executable instead of `aws` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Command line arguments for one call
    pub fn command_args(
        &self,
        service: &str,
        region: &str,
        operation: &str,
        params: &Params,
    ) -> Vec<String> {
        let mut args = vec![
            service.to_string(),
            cli_operation_name(operation),
            "--region".to_string(),
            region.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];

        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }

        if let Some(input) = cli_input_json(params) {
            args.push("--cli-input-json".to_string());
            args.push(input);
        }

        args
    }
}

impl Invoker for AwsCliInvoker {
    fn invoke(
        &self,
        service: &str,
        region: &str,
        operation: &str,
        params: &Params,
    ) -> Result<RawItem, InvokeError> {
        let args = self.command_args(service, region, operation, params);
        tracing::debug!("Executing: aws {} {} --region {}", service, args[1], region);

        let output = Command::new(&self.program)
            .args(&args)
            .env("AWS_PAGER", "")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    InvokeError::new("CliUnavailable", format!("{} not found", self.program.display()))
                } else {
                    InvokeError::new("CliFailure", e.to_string())
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let err = parse_cli_error(&stderr);
            tracing::debug!("{}.{} in {} failed: {}", service, operation, region, err);
            return Err(err);
        }

        parse_cli_output(&output.stdout)
    }
}

/// `describe_db_instances` -> `describe-db-instances`
pub fn cli_operation_name(operation: &str) -> String {
    operation.replace('_', "-")
}

/// Render parameters for `--cli-input-json`, dropping absent values.
fn cli_input_json(params: &Params) -> Option<String> {
    let map: Map<String, Value> = params
        .iter()
        .filter(|(_, v)| !v.is_absent())
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect();

    if map.is_empty() {
        None
    } else {
        Some(Value::Object(map).to_string())
    }
}

/// Parse CLI stdout. Operations without output print nothing.
fn parse_cli_output(stdout: &[u8]) -> Result<RawItem, InvokeError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawItem::Mapping(Default::default()));
    }
    let value: Value = serde_json::from_slice(stdout)
        .map_err(|e| InvokeError::new("InvalidResponse", e.to_string()))?;
    Ok(RawItem::from_response(value))
}

/// Extract the provider error code from CLI stderr.
///
/// Service errors look like
/// `An error occurred (AccessDenied) when calling the ListBuckets operation: ...`.
pub fn parse_cli_error(stderr: &str) -> InvokeError {
    let message: String = stderr.trim().chars().take(MAX_ERROR_LENGTH).collect();

    let code = stderr
        .split_once("An error occurred (")
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(code, _)| code.to_string())
        .unwrap_or_else(|| {
            if stderr.contains("Unable to locate credentials") {
                "NoCredentials".to_string()
            } else if stderr.contains("Could not connect to the endpoint URL") {
                "EndpointConnectionError".to_string()
            } else {
                "CliFailure".to_string()
            }
        });

    InvokeError::new(code, message)
}

/// User-facing hint for common failures.
pub fn describe_error(err: &InvokeError) -> String {
    match err.code.as_str() {
        "CliUnavailable" => "aws CLI not found - install it or put it on PATH".to_string(),
        "NoCredentials" | "InvalidClientTokenId" | "SignatureDoesNotMatch" => {
            "Invalid or missing credentials - run 'aws configure'".to_string()
        }
        "ExpiredToken" | "ExpiredTokenException" => {
            "Credentials expired - refresh or reconfigure".to_string()
        }
        "AccessDenied" | "AccessDeniedException" | "UnauthorizedOperation" => {
            "Access denied - check IAM permissions".to_string()
        }
        _ => err.to_string(),
    }
}
