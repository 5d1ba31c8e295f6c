//! Declarative request validation.
//!
//! A [`Validator`] holds an ordered rule list per field. Each field stops at
//! its first failing rule; failures from different fields accumulate into
//! one [`ValidationErrors`].
//!
//! ```ignore
//! let validated = Validator::new()
//!     .field("slug", [Rule::Required, Rule::String, Rule::unique(LookupColumn::PostSlug)])
//!     .validate(&body, lookup)
//!     .await?;
//! let input: PostInput = validated.into_payload()?;
//! ```

mod errors;
pub mod schemas;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::ValidateEmail;

use crate::error::{DomainError, RepoError};
use crate::ports::{LookupColumn, LookupValue, RecordLookup};

pub use errors::ValidationErrors;

/// A single validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Present, not null, not blank, not an empty array.
    Required,
    String,
    Email,
    /// A JSON integer or a string holding one. Strings are normalised to numbers.
    Integer,
    /// At most N characters for strings, at most N for numbers.
    Max(usize),
    /// No stored row holds the value, ignoring the row with id `except_id`.
    Unique {
        column: LookupColumn,
        except_id: Option<i64>,
    },
    /// At least one stored row holds the value.
    Exists(LookupColumn),
}

impl Rule {
    pub fn unique(column: LookupColumn) -> Self {
        Rule::Unique {
            column,
            except_id: None,
        }
    }

    pub fn unique_except(column: LookupColumn, except_id: Option<i64>) -> Self {
        Rule::Unique { column, except_id }
    }
}

enum Check {
    Pass,
    Replace(Value),
    Fail(String),
}

struct FieldRules {
    name: &'static str,
    rules: Vec<Rule>,
}

impl FieldRules {
    fn attribute(&self) -> String {
        self.name.replace('_', " ")
    }

    /// `Ok(Ok(value))` when the field passes, `Ok(Err(message))` on the first failing rule.
    async fn check(
        &self,
        value: Option<&Value>,
        lookup: &dyn RecordLookup,
    ) -> Result<Result<Option<Value>, String>, RepoError> {
        let attribute = self.attribute();

        let Some(mut current) = value.filter(|v| is_filled(v)).cloned() else {
            if self.rules.contains(&Rule::Required) {
                return Ok(Err(format!("The {attribute} field is required.")));
            }
            return Ok(Ok(None));
        };

        for rule in &self.rules {
            match apply(rule, &current, &attribute, lookup).await? {
                Check::Pass => {}
                Check::Replace(normalised) => current = normalised,
                Check::Fail(message) => return Ok(Err(message)),
            }
        }

        Ok(Ok(Some(current)))
    }
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

async fn apply(
    rule: &Rule,
    value: &Value,
    attribute: &str,
    lookup: &dyn RecordLookup,
) -> Result<Check, RepoError> {
    let check = match rule {
        Rule::Required => Check::Pass,
        Rule::String => match value {
            Value::String(_) => Check::Pass,
            _ => Check::Fail(format!("The {attribute} field must be a string.")),
        },
        Rule::Email => match value.as_str() {
            Some(s) if s.validate_email() => Check::Pass,
            _ => Check::Fail(format!(
                "The {attribute} field must be a valid email address."
            )),
        },
        Rule::Integer => match value {
            Value::Number(n) if n.is_i64() => Check::Pass,
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(n) => Check::Replace(Value::from(n)),
                Err(_) => Check::Fail(format!("The {attribute} field must be an integer.")),
            },
            _ => Check::Fail(format!("The {attribute} field must be an integer.")),
        },
        Rule::Max(max) => match value {
            Value::String(s) if s.chars().count() > *max => Check::Fail(format!(
                "The {attribute} field must not be greater than {max} characters."
            )),
            Value::Number(n) if n.as_f64().is_some_and(|n| n > *max as f64) => Check::Fail(
                format!("The {attribute} field must not be greater than {max}."),
            ),
            _ => Check::Pass,
        },
        Rule::Unique { column, except_id } => match LookupValue::from_json(value) {
            Some(needle) if lookup.count(*column, &needle, *except_id).await? > 0 => {
                tracing::debug!(column = column.qualified_name(), "unique rule failed");
                Check::Fail(format!("The {attribute} has already been taken."))
            }
            _ => Check::Pass,
        },
        Rule::Exists(column) => match LookupValue::from_json(value) {
            Some(needle) if lookup.count(*column, &needle, None).await? > 0 => Check::Pass,
            _ => Check::Fail(format!("The selected {attribute} is invalid.")),
        },
    };

    Ok(check)
}

/// The fields that passed validation, with normalised values.
#[derive(Debug, Clone, Default)]
pub struct Validated(Map<String, Value>);

impl Validated {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Deserialize the validated fields into a typed payload.
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<T, DomainError> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| DomainError::Internal(format!("Validated payload is malformed: {e}")))
    }
}

/// Ordered set of field rules.
#[derive(Default)]
pub struct Validator {
    fields: Vec<FieldRules>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field and its rules, checked in the given order.
    pub fn field(mut self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push(FieldRules {
            name,
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Validate a JSON body.
    ///
    /// Returns `DomainError::Validation` when any field fails and
    /// `DomainError::Repo` when a lookup cannot be performed.
    pub async fn validate(
        &self,
        body: &Value,
        lookup: &dyn RecordLookup,
    ) -> Result<Validated, DomainError> {
        let mut errors = ValidationErrors::new();
        let mut validated = Map::new();

        for field in &self.fields {
            match field.check(body.get(field.name), lookup).await? {
                Ok(Some(value)) => {
                    validated.insert(field.name.to_string(), value);
                }
                Ok(None) => {}
                Err(message) => errors.add(field.name, message),
            }
        }

        if errors.is_empty() {
            Ok(Validated(validated))
        } else {
            Err(DomainError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    /// Lookup over a fixed set of rows: (column, value, row id).
    struct FixedLookup(Vec<(LookupColumn, LookupValue, i64)>);

    #[async_trait]
    impl RecordLookup for FixedLookup {
        async fn count(
            &self,
            column: LookupColumn,
            value: &LookupValue,
            except_id: Option<i64>,
        ) -> Result<u64, RepoError> {
            let hits = self
                .0
                .iter()
                .filter(|(c, v, id)| {
                    *c == column && v.as_text() == value.as_text() && Some(*id) != except_id
                })
                .count();
            Ok(hits as u64)
        }
    }

    struct BrokenLookup;

    #[async_trait]
    impl RecordLookup for BrokenLookup {
        async fn count(
            &self,
            _column: LookupColumn,
            _value: &LookupValue,
            _except_id: Option<i64>,
        ) -> Result<u64, RepoError> {
            Err(RepoError::Connection("refused".to_string()))
        }
    }

    fn errors_of(result: Result<Validated, DomainError>) -> ValidationErrors {
        match result {
            Err(DomainError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_required_rejects_missing_null_and_blank() {
        let validator = Validator::new()
            .field("title", [Rule::Required, Rule::String])
            .field("slug", [Rule::Required, Rule::String])
            .field("body", [Rule::Required, Rule::String]);
        let body = json!({ "slug": "   ", "body": null });

        let errors = errors_of(validator.validate(&body, &FixedLookup(vec![])).await);

        assert_eq!(errors.get("title").unwrap(), ["The title field is required."]);
        assert_eq!(errors.get("slug").unwrap(), ["The slug field is required."]);
        assert_eq!(errors.get("body").unwrap(), ["The body field is required."]);
    }

    #[tokio::test]
    async fn test_stops_at_first_failure_per_field() {
        let validator = Validator::new().field(
            "email",
            [Rule::Required, Rule::String, Rule::Email, Rule::Max(3)],
        );

        let errors = errors_of(
            validator
                .validate(&json!({ "email": 42 }), &FixedLookup(vec![]))
                .await,
        );

        assert_eq!(errors.message_count(), 1);
        assert_eq!(
            errors.get("email").unwrap(),
            ["The email field must be a string."]
        );
    }

    #[tokio::test]
    async fn test_email_and_max_messages() {
        let validator = Validator::new()
            .field("email", [Rule::Required, Rule::Email])
            .field("name", [Rule::Required, Rule::String, Rule::Max(5)]);
        let body = json!({ "email": "not-an-address", "name": "abcdefg" });

        let errors = errors_of(validator.validate(&body, &FixedLookup(vec![])).await);

        assert_eq!(
            errors.get("email").unwrap(),
            ["The email field must be a valid email address."]
        );
        assert_eq!(
            errors.get("name").unwrap(),
            ["The name field must not be greater than 5 characters."]
        );
    }

    #[tokio::test]
    async fn test_numeric_max_message_has_no_unit() {
        let validator = Validator::new().field("rating", [Rule::Integer, Rule::Max(10)]);

        let errors = errors_of(
            validator
                .validate(&json!({ "rating": 11 }), &FixedLookup(vec![]))
                .await,
        );

        assert_eq!(
            errors.get("rating").unwrap(),
            ["The rating field must not be greater than 10."]
        );
    }

    #[tokio::test]
    async fn test_integer_strings_are_normalised() {
        let lookup = FixedLookup(vec![(LookupColumn::UserId, LookupValue::Integer(7), 7)]);
        let validator = Validator::new().field(
            "author_id",
            [Rule::Required, Rule::Integer, Rule::Exists(LookupColumn::UserId)],
        );

        let validated = validator
            .validate(&json!({ "author_id": "7" }), &lookup)
            .await
            .unwrap();

        assert_eq!(validated.get("author_id"), Some(&json!(7)));
    }

    #[tokio::test]
    async fn test_integer_and_exists_failures() {
        let validator = Validator::new().field(
            "author_id",
            [Rule::Required, Rule::Integer, Rule::Exists(LookupColumn::UserId)],
        );

        let errors = errors_of(
            validator
                .validate(&json!({ "author_id": "seven" }), &FixedLookup(vec![]))
                .await,
        );
        assert_eq!(
            errors.get("author_id").unwrap(),
            ["The author id field must be an integer."]
        );

        let errors = errors_of(
            validator
                .validate(&json!({ "author_id": 99 }), &FixedLookup(vec![]))
                .await,
        );
        assert_eq!(
            errors.get("author_id").unwrap(),
            ["The selected author id is invalid."]
        );
    }

    #[tokio::test]
    async fn test_unique_ignores_excepted_row() {
        let lookup = FixedLookup(vec![(
            LookupColumn::PostSlug,
            LookupValue::Text("hello".to_string()),
            3,
        )]);
        let body = json!({ "slug": "hello" });

        let taken = Validator::new().field(
            "slug",
            [Rule::Required, Rule::unique(LookupColumn::PostSlug)],
        );
        let errors = errors_of(taken.validate(&body, &lookup).await);
        assert_eq!(
            errors.get("slug").unwrap(),
            ["The slug has already been taken."]
        );

        let own = Validator::new().field(
            "slug",
            [
                Rule::Required,
                Rule::unique_except(LookupColumn::PostSlug, Some(3)),
            ],
        );
        assert!(own.validate(&body, &lookup).await.is_ok());
    }

    #[tokio::test]
    async fn test_only_ruled_fields_are_returned() {
        let validator = Validator::new()
            .field("name", [Rule::Required, Rule::String])
            .field("nickname", [Rule::String]);
        let body = json!({ "name": "Ada", "role": "admin" });

        let validated = validator
            .validate(&body, &FixedLookup(vec![]))
            .await
            .unwrap();

        assert_eq!(validated.get("name"), Some(&json!("Ada")));
        assert!(validated.get("nickname").is_none());
        assert!(validated.get("role").is_none());
    }

    #[tokio::test]
    async fn test_non_object_body_fails_every_required_field() {
        let validator = Validator::new()
            .field("name", [Rule::Required])
            .field("email", [Rule::Required]);

        let errors = errors_of(validator.validate(&json!([1, 2]), &FixedLookup(vec![])).await);

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name", "email"]);
    }

    #[tokio::test]
    async fn test_lookup_failures_propagate() {
        let validator = Validator::new().field(
            "email",
            [Rule::Required, Rule::unique(LookupColumn::UserEmail)],
        );

        let result = validator
            .validate(&json!({ "email": "a@x.com" }), &BrokenLookup)
            .await;

        assert!(matches!(result, Err(DomainError::Repo(RepoError::Connection(_)))));
    }
}
