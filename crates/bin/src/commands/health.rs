//! Health check command - checks a running tokenlist server.

use std::time::Duration;

use serde_json::Value;

use crate::cli::HealthArgs;

/// Run the health check command
///
/// Prints the number of lists the server holds and exits non-zero when the
/// server is unreachable or reports anything but a healthy registry.
pub async fn run(args: &HealthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!("http://{}:{}/health", args.host, args.port);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build()?;

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("unhealthy: failed to connect to {url}: {e}");
            std::process::exit(1);
        }
    };
    if !response.status().is_success() {
        eprintln!("unhealthy: {url} returned HTTP status {}", response.status());
        std::process::exit(1);
    }

    match collection_count(&response.json().await?) {
        Ok(collections) => {
            println!("healthy: serving {collections} lists");
            Ok(())
        }
        Err(reason) => {
            eprintln!("unhealthy: {reason}");
            std::process::exit(1);
        }
    }
}

/// Reads the list count out of a `/health` response body.
fn collection_count(body: &Value) -> Result<u64, String> {
    match body.get("status").and_then(Value::as_str) {
        Some("healthy") => {}
        Some(other) => return Err(format!("server reported status {other}")),
        None => return Err(format!("response has no status: {body}")),
    }
    body.get("collections")
        .and_then(Value::as_u64)
        .ok_or_else(|| format!("response has no collection count: {body}"))
}
