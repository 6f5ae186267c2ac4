//! BLS Tate Runner
//!
//! Runs setup, signing and verification for one request and prints every
//! intermediate value as JSON.
//!
//! Usage:
//!   bls-tate [--config limits.json] [request.json | -]
//!
//! Without a request the reference example runs: p = 103, y^2 = x^3 + x,
//! private key 7, message "שלום". `-` reads the request from stdin.
//! Set RUST_LOG=debug (or trace) to follow the searches and the Miller loop.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use bls_tate::error::BlsError;
use bls_tate::service::{self, BlsRequest, ServiceError};
use bls_tate::SchemeConfig;

struct Args {
    config: Option<String>,
    request: Option<String>,
}

fn parse_args() -> Result<Args, ServiceError> {
    let mut args = std::env::args().skip(1);
    let mut parsed = Args {
        config: None,
        request: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| usage("--config needs a file argument"))?;
                parsed.config = Some(path);
            }
            _ if parsed.request.is_none() => parsed.request = Some(arg),
            _ => return Err(usage(&format!("unexpected argument {}", arg))),
        }
    }
    Ok(parsed)
}

fn usage(msg: &str) -> ServiceError {
    BlsError::Validation(format!(
        "{}; usage: bls-tate [--config limits.json] [request.json | -]",
        msg
    ))
    .into()
}

fn read_request(source: &str) -> Result<String, ServiceError> {
    let read = if source == "-" {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body).map(|_| body)
    } else {
        fs::read_to_string(source)
    };
    read.map_err(|e| BlsError::Validation(format!("cannot read {}: {}", source, e)).into())
}

fn execute(args: &Args) -> Result<String, ServiceError> {
    let config = match &args.config {
        Some(path) => SchemeConfig::from_json_file(path)?,
        None => SchemeConfig::default(),
    };

    match &args.request {
        Some(source) => service::handle_json(&read_request(source)?, &config),
        None => {
            let response = service::run_with(&BlsRequest::reference(), &config)?;
            serde_json::to_string_pretty(&response)
                .map_err(|e| BlsError::Internal(format!("response: {}", e)).into())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let outcome = parse_args().and_then(|args| execute(&args));
    match outcome {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("request failed with status {}: {}", err.status_code(), err);
            let body = serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
    }
}
