//! User Registration
//!
//! This example validates sign-up requests against a model declared with
//! the builder API and with the `model!` macro.
//!
//! Key concepts:
//! - Every invalid field is reported in one pass
//! - Each field reports only its first failing rule
//! - Transforming rules (trim, lowercase) feed later rules
//! - Custom rules sit beside built-in ones
//!
//! Run with: RUST_LOG=modelguard=debug cargo run --example user_registration

use modelguard::core::{EnumType, FieldType, RawInput, Value};
use modelguard::{model, FieldBuilder, ModelBuilder, ModelSpec};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modelguard=info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

fn registration_spec() -> ModelSpec {
    let role = EnumType::new("UserRole", ["admin", "editor", "viewer"]);

    ModelBuilder::new("Registration")
        .field(
            FieldBuilder::new("username", FieldType::String)
                .trim()
                .lowercase()
                .min_length(3)
                .max_length(20)
                .pattern(r"[a-z0-9_]+$"),
        )
        .field(
            FieldBuilder::new("email", FieldType::String)
                .trim()
                .contains("@")
                .not_in_ignore_case(["root@localhost"]),
        )
        .field(FieldBuilder::new("password", FieldType::String).min_length(8).max_length(64))
        .field(FieldBuilder::new("age", FieldType::Integer).in_range(13, 120))
        .field(FieldBuilder::new("role", FieldType::EnumOf(role)).optional())
        .field(
            FieldBuilder::new("referral", FieldType::String)
                .optional()
                .nullable()
                .require(
                    "referral_prefix",
                    |v: &Value| v.as_str().is_some_and(|s| s.starts_with("REF-")),
                    "Referral codes start with 'REF-'",
                ),
        )
        .build()
        .unwrap_or_else(|e| panic!("registration model is misdeclared: {e}"))
}

fn report(spec: &ModelSpec, label: &str, input: RawInput) {
    println!("{label}");
    match spec.construct(&input) {
        Ok(instance) => {
            for (field, value) in instance.iter() {
                println!("  {field} = {value}");
            }
        }
        Err(failure) => println!("  {failure}"),
    }
    println!();
}

fn main() {
    init_logging();
    println!("=== User Registration Example ===\n");

    let spec = registration_spec();

    report(
        &spec,
        "Example 1: A valid request (username normalised)",
        RawInput::new()
            .with("username", "  Sam_99 ")
            .with("email", "sam@example.com")
            .with("password", "correct horse")
            .with("age", 34)
            .with("role", "editor")
            .with_null("referral"),
    );

    report(
        &spec,
        "Example 2: Several invalid fields at once",
        RawInput::new()
            .with("username", "x")
            .with("email", "ROOT@localhost")
            .with("password", "abc")
            .with("age", "thirty")
            .with("role", "owner")
            .with("referral", "FRIEND"),
    );

    report(
        &spec,
        "Example 3: Missing and null required fields",
        RawInput::new().with("username", "sam").with_null("email"),
    );

    println!("Example 4: The same model declared with model!");
    let compact = model! {
        "User" {
            age: FieldType::Integer => [min_value(13)];
            nickname: FieldType::String, optional, nullable => [not_in(["Shanyu"])];
        }
    }
    .unwrap_or_else(|e| panic!("user model is misdeclared: {e}"));
    match compact.construct(&RawInput::new().with("age", 10).with("nickname", "Shanyu")) {
        Ok(_) => println!("  unexpectedly valid"),
        Err(failure) => {
            for field_failure in failure.iter() {
                println!("  {field_failure}");
            }
        }
    }
}
