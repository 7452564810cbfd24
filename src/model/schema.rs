use std::collections::HashMap;

use super::ExtractionError;

/// How a field reads its value out of the root element of a record.
///
/// A `selector` of `None` designates the root element itself, otherwise the first
/// descendant matching the selector in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// The value of an attribute.
    Attribute {
        selector: Option<&'static str>,
        attribute: &'static str,
    },

    /// The whitespace-collapsed text of the element's own text nodes, ignoring its
    /// child elements.
    DirectText { selector: Option<&'static str> },

    /// The whitespace-collapsed text of the whole subtree.
    SubtreeText { selector: Option<&'static str> },

    /// The whitespace-collapsed text, without the text of the descendants matching `exclude`.
    TextExcluding {
        selector: Option<&'static str>,
        exclude: &'static str,
    },
}

impl FieldRule {
    /// The selector of the element the rule reads from.
    pub fn selector(&self) -> Option<&'static str> {
        match self {
            FieldRule::Attribute { selector, .. }
            | FieldRule::DirectText { selector }
            | FieldRule::SubtreeText { selector }
            | FieldRule::TextExcluding { selector, .. } => *selector,
        }
    }
}

/// A named field of an extraction schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub rule: FieldRule,
}

/// A declarative description of the records found in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionSchema {
    /// The name of the schema, used in logs.
    pub name: &'static str,

    /// The selector of the repeated elements, one per record.
    pub root: &'static str,

    /// The fields read from each root element. All of them are required.
    pub fields: &'static [FieldSchema],
}

/// The raw field values of one record.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Record {
    values: HashMap<&'static str, String>,
}

impl Record {
    /// Sets the value of a field.
    pub fn insert(&mut self, field: &'static str, value: String) {
        self.values.insert(field, value);
    }

    /// Retrieves the value of a field.
    pub fn get(&self, field: &'static str) -> Result<&str, ExtractionError> {
        self.values
            .get(field)
            .map(String::as_str)
            .ok_or(ExtractionError::UnknownField(field))
    }
}
