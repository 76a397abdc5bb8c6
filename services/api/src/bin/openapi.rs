//! services/api/src/bin/openapi.rs
//!
//! Writes the tutor's OpenAPI document to disk so the UI can generate its client
//! from it. Usage: `openapi [PATH]`, defaulting to `openapi.json`.

use api_lib::{error::ApiError, web::rest::openapi_json};
use std::path::PathBuf;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), ApiError> {
    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let document = openapi_json()?;
    std::fs::write(&output, document)?;
    println!("OpenAPI document written to {}", output.display());
    Ok(())
}
