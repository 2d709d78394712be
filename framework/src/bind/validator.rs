//! Validator engine handle

use super::{Schema, Source};
use crate::error::FieldErrors;
use std::collections::HashMap;
use std::sync::Arc;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Runs a schema's `validator` rules and reports failures by source name
///
/// The reason reported for a failed rule is, in order of preference: a
/// message registered here for the rule code, the rule's own `message`, or
/// the rule code itself (`"length"`, `"range"`, `"email"`, ...).
///
/// Cloning is cheap; one validator can be shared by many binders.
///
/// # Example
///
/// ```rust,ignore
/// let validator = Validator::new()
///     .message("length", "must not be empty")
///     .message("range", "out of range");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    messages: Arc<HashMap<String, String>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `message` whenever a rule with this code fails
    pub fn message(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.messages).insert(code.into(), message.into());
        self
    }

    /// Validate `value`, naming failed fields the way `source` names them
    ///
    /// Nested struct and list failures are reported under dotted and
    /// indexed paths (`address.city`, `items[0].name`). Only the top-level
    /// segment follows `source`; segments inside a nested value keep the
    /// validator's field keys, since the nested type is not known here.
    pub fn validate<T: Schema>(&self, value: &T, source: Source) -> Result<(), FieldErrors> {
        match value.validate() {
            Ok(()) => Ok(()),
            Err(errors) => {
                let mut out = FieldErrors::new();
                for (field, kind) in errors.errors() {
                    let field = field.to_string();
                    let name = T::field_name(&field, source).unwrap_or(field.as_str());
                    self.collect(name, kind, &mut out);
                }
                Err(out)
            }
        }
    }

    fn collect(&self, path: &str, kind: &ValidationErrorsKind, out: &mut FieldErrors) {
        match kind {
            ValidationErrorsKind::Field(errors) => {
                for error in errors {
                    let code: &str = &error.code;
                    let reason = self
                        .messages
                        .get(code)
                        .cloned()
                        .or_else(|| error.message.as_ref().map(|m| m.to_string()))
                        .unwrap_or_else(|| code.to_string());
                    out.add(path, reason);
                }
            }
            ValidationErrorsKind::Struct(inner) => self.collect_nested(path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    self.collect_nested(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }

    fn collect_nested(&self, prefix: &str, errors: &ValidationErrors, out: &mut FieldErrors) {
        for (field, kind) in errors.errors() {
            self.collect(&format!("{}.{}", prefix, field), kind, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;
    use pretty_assertions::assert_eq;

    #[crate::schema]
    struct Signup {
        #[bind(query = "user")]
        #[validate(length(min = 1))]
        name: String,

        #[validate(email)]
        email: String,

        #[validate(range(min = 18, message = "too young"))]
        age: i32,

        #[validate(nested)]
        address: Address,
    }

    #[crate::schema]
    struct Address {
        #[bind(query = "town")]
        #[validate(length(min = 2))]
        city: String,
    }

    fn valid() -> Signup {
        Signup {
            name: "John".into(),
            email: "john@example.com".into(),
            age: 20,
            address: Address { city: "Oslo".into() },
        }
    }

    #[test]
    fn valid_value_passes() {
        assert_eq!(Validator::new().validate(&valid(), Source::Json), Ok(()));
    }

    #[test]
    fn reasons_default_to_rule_code() {
        let signup = Signup {
            name: String::new(),
            email: "nope".into(),
            ..valid()
        };
        let errors = Validator::new().validate(&signup, Source::Json).unwrap_err();

        assert_eq!(errors.get("name"), Some("length"));
        assert_eq!(errors.get("email"), Some("email"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn names_follow_active_source() {
        let signup = Signup {
            name: String::new(),
            ..valid()
        };
        let errors = Validator::new().validate(&signup, Source::Query).unwrap_err();
        assert_eq!(errors.fields(), vec!["user"]);
    }

    #[test]
    fn registered_messages_win_over_rule_messages() {
        let signup = Signup { age: 10, ..valid() };

        let plain = Validator::new().validate(&signup, Source::Json).unwrap_err();
        assert_eq!(plain.get("age"), Some("too young"));

        let custom = Validator::new()
            .message("range", "must be an adult")
            .validate(&signup, Source::Json)
            .unwrap_err();
        assert_eq!(custom.get("age"), Some("must be an adult"));
    }

    #[test]
    fn nested_failures_use_dotted_paths() {
        let signup = Signup {
            address: Address { city: "X".into() },
            ..valid()
        };
        let errors = Validator::new().validate(&signup, Source::Json).unwrap_err();
        assert_eq!(errors.get("address.city"), Some("length"));
    }

    #[test]
    fn nested_segments_keep_field_keys() {
        let signup = Signup {
            name: String::new(),
            address: Address { city: "X".into() },
            ..valid()
        };
        let errors = Validator::new().validate(&signup, Source::Query).unwrap_err();
        assert_eq!(errors.get("user"), Some("length"));
        assert_eq!(errors.get("address.city"), Some("length"));
        assert_eq!(errors.get("address.town"), None);
    }
}
