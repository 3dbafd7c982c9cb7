//! Import schema definitions.
//!
//! A [`Schema`] is the ordered, typed field contract a batch is validated
//! against. Schemas are statically defined per import kind and immutable at
//! runtime; the two presets used by this system are
//! [`Schema::person_batch`] and [`Schema::wage_batch`].

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};

// =============================================================================
// Field Kind
// =============================================================================

/// The declared type of a schema field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "camelCase")]
pub enum FieldKind {
    /// Free text; no type check beyond the required check.
    Text,
    /// Must parse as a finite number. Range is not checked: a negative
    /// balance is accepted.
    Number,
    /// Must parse as a finite number and be >= 0. Parse failure and
    /// negative values share one message.
    NonNegativeNumber,
    /// Must be one of the allowed values (exact, case-sensitive match).
    /// Empty values are left to the required check.
    Enum(Vec<String>),
    /// Must match `YYYY-MM-DD` exactly. Pattern only: the calendar is not
    /// consulted, so `2024-13-45` passes.
    Date,
}

impl FieldKind {
    /// Allowed values for an enum field.
    pub fn allowed_values(&self) -> Option<&[String]> {
        match self {
            FieldKind::Enum(values) => Some(values),
            _ => None,
        }
    }

    /// The type-check failure message for this kind, or `None` for kinds
    /// whose checks cannot fail (`Text`).
    pub fn type_message(&self, display_name: &str) -> Option<String> {
        match self {
            FieldKind::Text => None,
            FieldKind::Number => Some(format!("{} must be a valid number", display_name)),
            FieldKind::NonNegativeNumber => {
                Some(format!("{} must be a positive number", display_name))
            }
            FieldKind::Enum(values) => Some(format!(
                "{} must be either {}",
                display_name,
                quoted_alternatives(values)
            )),
            FieldKind::Date => Some(format!("{} must be in YYYY-MM-DD format", display_name)),
        }
    }
}

/// Join allowed values as `"a" or "b"` / `"a", "b", or "c"`.
fn quoted_alternatives(values: &[String]) -> String {
    match values {
        [] => String::new(),
        [only] => format!("\"{}\"", only),
        [a, b] => format!("\"{}\" or \"{}\"", a, b),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(|v| format!("\"{}\"", v)).collect();
            format!("{}, or \"{}\"", head.join(", "), last)
        }
    }
}

// =============================================================================
// Field Definition
// =============================================================================

/// One field of a schema: a unique name, a display name used in messages,
/// a required flag, and a declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Field name as it appears in the CSV header (unique within a schema).
    pub name: String,
    /// Display name used in user-facing messages.
    pub display_name: String,
    /// Whether a blank value is an error.
    pub required: bool,
    /// Declared type.
    pub kind: FieldKind,
    /// Example value used in the sample CSV.
    pub sample: String,
}

impl FieldDef {
    /// A required field.
    pub fn new(name: &str, display_name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            required: true,
            kind,
            sample: String::new(),
        }
    }

    /// Mark the field as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the example value for the sample CSV.
    pub fn with_sample(mut self, sample: &str) -> Self {
        self.sample = sample.to_string();
        self
    }

    /// The required-check failure message.
    pub fn required_message(&self) -> String {
        format!("{} is required", self.display_name)
    }
}

// =============================================================================
// Schema
// =============================================================================

/// The ordered field contract for one import kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    name: String,
    /// Noun used in summary messages ("inmates", "wage entries").
    record_noun: String,
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a schema, rejecting empty or duplicate field lists.
    pub fn new(name: &str, record_noun: &str, fields: Vec<FieldDef>) -> SchemaResult<Self> {
        if fields.is_empty() {
            return Err(SchemaError::NoFields);
        }
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self {
            name: name.to_string(),
            record_noun: record_noun.to_string(),
            fields,
        })
    }

    /// Schema preset for bulk-adding people (inmate accounts).
    pub fn person_batch() -> Self {
        Self {
            name: "person-batch".to_string(),
            record_noun: "inmates".to_string(),
            fields: vec![
                FieldDef::new("inmateNumber", "Inmate number", FieldKind::Text)
                    .with_sample("INM-1001"),
                FieldDef::new("firstName", "First name", FieldKind::Text).with_sample("John"),
                FieldDef::new("lastName", "Last name", FieldKind::Text).with_sample("Doe"),
                FieldDef::new("balance", "Balance", FieldKind::Number).with_sample("100.00"),
                FieldDef::new(
                    "status",
                    "Status",
                    FieldKind::Enum(vec!["active".to_string(), "inactive".to_string()]),
                )
                .with_sample("active"),
            ],
        }
    }

    /// Schema preset for bulk-adding wage entries.
    pub fn wage_batch() -> Self {
        Self {
            name: "wage-batch".to_string(),
            record_noun: "wage entries".to_string(),
            fields: vec![
                FieldDef::new("inmateNumber", "Inmate number", FieldKind::Text)
                    .with_sample("INM-1001"),
                FieldDef::new("wageAmount", "Wage amount", FieldKind::NonNegativeNumber)
                    .with_sample("50.00"),
                FieldDef::new(
                    "wageType",
                    "Wage type",
                    FieldKind::Enum(vec![
                        "hourly".to_string(),
                        "daily".to_string(),
                        "bonus".to_string(),
                    ]),
                )
                .with_sample("hourly"),
                FieldDef::new("paymentDate", "Payment date", FieldKind::Date)
                    .with_sample("2024-01-15"),
                FieldDef::new("description", "Description", FieldKind::Text)
                    .with_sample("Workshop wages"),
            ],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_noun(&self) -> &str {
        &self.record_noun
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// The expected header list, comma-joined in schema order. Used in the
    /// header failure message.
    pub fn expected_header(&self) -> String {
        self.field_names().join(", ")
    }

    /// Render a sample CSV (header plus one example row) that re-imports
    /// cleanly through the validator.
    pub fn sample_csv(&self) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.fields.iter().map(|f| f.name.as_str()))
            .expect("writing to a Vec cannot fail");
        writer
            .write_record(self.fields.iter().map(|f| f.sample.as_str()))
            .expect("writing to a Vec cannot fail");
        let bytes = writer.into_inner().expect("writing to a Vec cannot fail");
        String::from_utf8(bytes).expect("sample CSV is valid UTF-8")
    }
}

// =============================================================================
// Tests
// =============================================================================
