//! Ingestion example: decode JSON submissions and run them through the gate.
//!
//! Quotas come from the file named by `QUOTA_GATE_CONFIG`, or the two demo
//! subjects when unset. Set `RUST_LOG` to change verbosity.
//!
//! ```text
//! cargo run --example ingest
//! RUST_LOG=quota_gate=info cargo run --example ingest
//! ```

use quota_gate::{GateBuilder, GateConfig, Submission};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const PAYLOADS: &[&str] = &[
    r#"{"unique_id": 1, "user_id": 1}"#,
    r#"{"unique_id": 2, "user_id": 1}"#,
    r#"{"unique_id": 3, "user_id": 2}"#,
    r#"{"unique_id": 3, "user_id": 2}"#,
    r#"{"unique_id": 4, "user_id": 99}"#,
    r#"{"unique_id": 6, "user_id": -1}"#,
    r#"{"user_id": 2}"#,
    r#"{"unique_id": "five", "user_id": 2}"#,
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quota_gate=debug"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    // A config with a retention block yields a sweeper; without one it is None
    let config = GateConfig::from_env()?;
    let (gate, sweeper) = GateBuilder::from_config(config)?.build_with_sweeper()?;

    println!("=== Ingestion Example ===\n");

    for payload in PAYLOADS {
        let submission: Submission = match serde_json::from_str(payload) {
            Ok(submission) => submission,
            Err(e) => {
                println!("{payload:<40} -> 400 malformed body: {e}");
                continue;
            }
        };

        match gate.admit_submission(&submission) {
            Ok(admission) => println!("{payload:<40} -> 200 accepted token {}", admission.token),
            Err(e) => {
                let status = match e.code() {
                    "minute_limit_exceeded" | "monthly_limit_exceeded" => 429,
                    "duplicate" => 409,
                    "no_quota" => 403,
                    _ => 400,
                };
                println!("{payload:<40} -> {status} {} ({e})", e.code());
            }
        }
    }

    if let Some(sweeper) = sweeper {
        println!("\nretention sweep removed {} tokens", sweeper.sweep());
    }

    let snapshot = gate.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "admitted: {}, rejected: {}, rejection rate: {:.1}%",
        snapshot.admitted,
        snapshot.rejected(),
        snapshot.rejection_rate() * 100.0
    );

    Ok(())
}
