//! Definition File
//!
//! This example loads a model from a JSON definition and resolves its rule
//! codes through a registry that includes one caller-defined rule.
//!
//! Run with: RUST_LOG=modelguard=debug cargo run --example definition_file

use modelguard::core::{RawInput, Rule, Value};
use modelguard::model::DefinitionError;
use modelguard::rules::Custom;
use modelguard::{ModelDefinition, RuleRegistry};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const PRODUCT: &str = r#"{
  "name": "Product",
  "fields": [
    {"name": "sku", "type": "string",
     "rules": [{"rule": "trim"}, {"rule": "begins_with", "params": {"value": "sku-", "ignore_case": true}}]},
    {"name": "price", "type": "real",
     "rules": [{"rule": "min_value", "params": {"value": 0, "inclusive": false}}]},
    {"name": "quantity", "type": "integer",
     "rules": [{"rule": "multiple_of", "params": {"step": 6}}]},
    {"name": "tags", "type": {"list": {"items": "string"}}, "required": false},
    {"name": "status", "type": "string", "nullable": true,
     "rules": [{"rule": "one_of", "params": {"values": ["draft", "listed", "retired"]}}]}
  ]
}"#;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modelguard=info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

fn registry() -> RuleRegistry {
    let mut registry = RuleRegistry::with_builtins();
    registry.register("multiple_of", |params: &serde_json::Value| {
        let step = params
            .get("step")
            .and_then(serde_json::Value::as_i64)
            .filter(|step| *step > 0)
            .ok_or_else(|| DefinitionError::InvalidParameter {
                rule: "multiple_of".to_string(),
                reason: "'step' must be a positive integer".to_string(),
            })?;
        let rule: Arc<dyn Rule> = Arc::new(Custom::predicate(
            "multiple_of",
            move |v: &Value| v.as_i64().is_some_and(|n| n % step == 0),
            format!("Quantity must be packed in multiples of {step}"),
        ));
        Ok(rule)
    });
    registry
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    println!("=== Definition File Example ===\n");

    let spec = ModelDefinition::from_json_str(PRODUCT)?.build(&registry())?;
    println!("Loaded model '{}' with {} fields\n", spec.name(), spec.len());

    let good = RawInput::from_json(json!({
        "sku": " SKU-1001 ",
        "price": 9.5,
        "quantity": 12,
        "tags": ["kitchen", "steel"],
        "status": null
    }))?;
    let instance = spec.construct(&good)?;
    println!("Valid product:\n{:#}\n", instance.to_json());

    let bad = RawInput::from_json(json!({
        "sku": "1001",
        "price": 0,
        "quantity": 10,
        "tags": ["kitchen", 7],
        "status": "sold"
    }))?;
    match spec.construct(&bad) {
        Ok(_) => println!("Unexpectedly valid"),
        Err(failure) => println!("Rejected product:\n{:#}", failure.to_json()),
    }

    Ok(())
}
