use super::{ConditionOperator, FieldValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a form field, as listed by the form-type schema service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Number,
    Text,
    Select {
        #[serde(default)]
        options: Vec<SelectOption>,
    },
    Users,
    Departments,
    Teams,
    Companies,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// The field type without its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Number,
    Text,
    Select,
    Users,
    Departments,
    Teams,
    Companies,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Number => "number",
            FieldKind::Text => "text",
            FieldKind::Select => "select",
            FieldKind::Users => "users",
            FieldKind::Departments => "departments",
            FieldKind::Teams => "teams",
            FieldKind::Companies => "companies",
        };
        write!(f, "{}", name)
    }
}

impl FieldType {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldType::Number => FieldKind::Number,
            FieldType::Text => FieldKind::Text,
            FieldType::Select { .. } => FieldKind::Select,
            FieldType::Users => FieldKind::Users,
            FieldType::Departments => FieldKind::Departments,
            FieldType::Teams => FieldKind::Teams,
            FieldType::Companies => FieldKind::Companies,
        }
    }

    /// Whether a condition on a field of this type may use `operator`.
    pub fn supports(&self, operator: ConditionOperator) -> bool {
        use ConditionOperator::*;
        match self {
            FieldType::Number => matches!(operator, Equals | NotEquals | GreaterThan | LessThan),
            FieldType::Text
            | FieldType::Select { .. }
            | FieldType::Users
            | FieldType::Departments
            | FieldType::Teams
            | FieldType::Companies => {
                matches!(operator, Equals | NotEquals | Contains | NotContains)
            }
        }
    }

    /// Renders a record value for display next to the field.
    pub fn format_value(&self, value: &FieldValue) -> String {
        if value.is_null() {
            return "-".to_string();
        }
        match self {
            FieldType::Number => match value.as_number() {
                Some(n) => format!("{:.2}", n),
                None => value.to_string(),
            },
            FieldType::Text => value.to_string(),
            FieldType::Select { options } => value
                .as_set()
                .unwrap_or_default()
                .iter()
                .map(|item| {
                    options
                        .iter()
                        .find(|option| &option.value == item)
                        .map_or(item.as_str(), |option| option.label.as_str())
                })
                .collect::<Vec<_>>()
                .join(", "),
            FieldType::Users | FieldType::Departments | FieldType::Teams | FieldType::Companies => {
                value.as_set().unwrap_or_default().join(", ")
            }
        }
    }
}

/// One field of a form-type schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub field_type: FieldType,
}

/// The fields that apply to one entity form type, e.g. `payment_requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FormSchema {
    #[serde(default, alias = "formType")]
    pub form_type: String,
    pub fields: Vec<FormField>,
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
