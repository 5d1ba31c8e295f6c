use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Field-level validation failures, kept in the order fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding one message for one field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Append a message to a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.fields.push((field, vec![message.into()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Names of the failing fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Total number of messages across all fields.
    pub fn message_count(&self) -> usize {
        self.fields.iter().map(|(_, messages)| messages.len()).sum()
    }

    /// First message, followed by a count of the rest.
    ///
    /// e.g. `The slug field is required. (and 2 more errors)`
    pub fn summary(&self) -> String {
        let Some(first) = self.fields.first().and_then(|(_, m)| m.first()) else {
            return "The given data was invalid.".to_string();
        };

        match self.message_count() - 1 {
            0 => first.clone(),
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.fields.into_iter().collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, messages) in &self.fields {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_remaining_messages() {
        let mut errors = ValidationErrors::single("slug", "The slug field is required.");
        assert_eq!(errors.summary(), "The slug field is required.");

        errors.add("title", "The title field is required.");
        assert_eq!(
            errors.summary(),
            "The slug field is required. (and 1 more error)"
        );

        errors.add("body", "The body field is required.");
        assert_eq!(
            errors.summary(),
            "The slug field is required. (and 2 more errors)"
        );
    }

    #[test]
    fn test_messages_group_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");

        assert_eq!(errors.get("email").unwrap(), ["first", "second"]);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email"]);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["email"][1], "second");
    }
}
