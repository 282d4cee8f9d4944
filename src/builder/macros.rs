//! Macros for declaring models with minimal boilerplate.

/// Declare a model as a list of fields, flags and rule chains.
///
/// Each field is `name: type`, optionally followed by the flags `optional`
/// and `nullable`, then `=> [rule(args), ...]`. Rules are any
/// [`FieldBuilder`](crate::builder::FieldBuilder) method and run in the
/// order written. Expands to builder calls and evaluates to
/// `Result<ModelSpec, DefinitionError>`.
///
/// # Example
///
/// ```
/// use modelguard::core::{FieldType, RawInput};
/// use modelguard::model;
///
/// let spec = model! {
///     "User" {
///         age: FieldType::Integer => [min_value(13)];
///         nickname: FieldType::String, optional, nullable => [not_in(["Shanyu"])];
///     }
/// }
/// .unwrap();
///
/// let input = RawInput::new().with("age", 13).with_null("nickname");
/// assert!(spec.construct(&input).is_ok());
/// ```
#[macro_export]
macro_rules! model {
    (
        $model:literal {
            $(
                $field:ident : $ty:expr
                $(, $flag:ident)*
                $(=> [ $( $rule:ident ( $($arg:expr),* $(,)? ) ),* $(,)? ])?
            );* $(;)?
        }
    ) => {
        $crate::builder::ModelBuilder::new($model)
            $(
                .field(
                    $crate::builder::FieldBuilder::new(stringify!($field), $ty)
                        $( .$flag() )*
                        $($( .$rule($($arg),*) )*)?
                )
            )*
            .build()
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{FieldType, RawInput, Value};
    use crate::engine::FailureKind;
    use crate::model::DefinitionError;

    #[test]
    fn model_macro_declares_fields_in_order() {
        let spec = model! {
            "User" {
                age: FieldType::Integer => [min_value(13)];
                nickname: FieldType::String, optional, nullable => [not_in(["Shanyu"])];
                email: FieldType::String, optional;
            }
        }
        .unwrap();

        assert_eq!(spec.name(), "User");
        let names: Vec<&str> = spec.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["age", "nickname", "email"]);

        let nickname = spec.field("nickname").unwrap();
        assert!(!nickname.is_required());
        assert!(nickname.is_nullable());
        assert_eq!(nickname.rule_codes(), vec!["not_in"]);
    }

    #[test]
    fn model_macro_rules_run_in_written_order() {
        let spec = model! {
            "Account" {
                username: FieldType::String => [trim(), lowercase(), min_length(3), max_length(12)];
            }
        }
        .unwrap();

        let instance = spec
            .construct(&RawInput::new().with("username", "  Alice "))
            .unwrap();
        assert_eq!(instance.get("username").unwrap(), Some(&Value::from("alice")));

        let report = spec
            .construct(&RawInput::new().with("username", " ab "))
            .unwrap_err();
        assert_eq!(
            report.failures()[0].kind,
            FailureKind::RuleViolation {
                rule: "min_length".to_string()
            }
        );
    }

    #[test]
    fn model_macro_surfaces_definition_errors() {
        let result = model! {
            "Broken" {
                score: FieldType::Real => [in_range(10, 1)];
            }
        };

        assert!(matches!(
            result,
            Err(DefinitionError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn model_macro_accepts_empty_model() {
        let spec = model! { "Empty" {} }.unwrap();
        assert!(spec.is_empty());
    }
}
