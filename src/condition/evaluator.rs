use super::{ConditionOperator, FieldKind, FieldType, FieldValue, FormSchema};
use crate::data::EntityData;
use crate::error::ConditionError;
use crate::workflow::ConditionConfig;
use tracing::debug;

/// Evaluates one comparison after coercing both sides to the field's declared type.
///
/// Unsupported operator/type pairs and non-numeric comparison values on number
/// fields are configuration defects and return an error. A record value that is
/// missing or cannot be coerced is absent data: positive operators yield `false`,
/// `not_equals` and `not_contains` yield `true`.
pub fn evaluate(
    field: &str,
    field_type: &FieldType,
    value: &FieldValue,
    operator: ConditionOperator,
    comparison: &str,
) -> Result<bool, ConditionError> {
    if !field_type.supports(operator) {
        return Err(ConditionError::UnsupportedOperator {
            field: field.to_string(),
            kind: field_type.kind(),
            operator,
        });
    }

    let outcome = match field_type.kind() {
        FieldKind::Number => {
            let target = comparison.trim().parse::<f64>().ok().filter(|n| n.is_finite());
            let target = target.ok_or_else(|| ConditionError::InvalidComparisonValue {
                field: field.to_string(),
                value: comparison.to_string(),
            })?;
            value
                .as_number()
                .map(|actual| compare_numbers(actual, operator.positive(), target))
        }
        FieldKind::Text => value
            .as_text()
            .map(|actual| compare_text(&actual, operator.positive(), comparison)),
        FieldKind::Select
        | FieldKind::Users
        | FieldKind::Departments
        | FieldKind::Teams
        | FieldKind::Companies => value
            .as_set()
            .map(|actual| compare_sets(&actual, operator.positive(), &split_set(comparison))),
    };

    Ok(match outcome {
        Some(holds) => holds != operator.is_negated(),
        None => operator.is_negated(),
    })
}

fn compare_numbers(actual: f64, operator: ConditionOperator, target: f64) -> bool {
    match operator {
        ConditionOperator::GreaterThan => actual > target,
        ConditionOperator::LessThan => actual < target,
        _ => actual == target,
    }
}

fn compare_text(actual: &str, operator: ConditionOperator, target: &str) -> bool {
    match operator {
        ConditionOperator::Contains => actual.contains(target.trim()),
        _ => actual.trim() == target.trim(),
    }
}

/// `actual` and `target` are sorted and deduplicated.
fn compare_sets(actual: &[String], operator: ConditionOperator, target: &[String]) -> bool {
    match operator {
        ConditionOperator::Contains => actual.iter().any(|item| target.contains(item)),
        _ => actual == target,
    }
}

fn split_set(raw: &str) -> Vec<String> {
    let mut items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    items.sort();
    items.dedup();
    items
}

/// Evaluates condition nodes against a record, resolving field types from a form schema.
pub struct ConditionEvaluator<'a> {
    schema: Option<&'a FormSchema>,
}

impl<'a> ConditionEvaluator<'a> {
    pub fn new(schema: &'a FormSchema) -> Self {
        Self {
            schema: Some(schema),
        }
    }

    /// An evaluator that treats every field as text.
    pub fn without_schema() -> Self {
        Self { schema: None }
    }

    /// Declared type of `field`. Fields outside the schema compare as text.
    pub fn field_type(&self, field: &str) -> FieldType {
        self.schema
            .and_then(|schema| schema.field(field))
            .map_or(FieldType::Text, |f| f.field_type.clone())
    }

    pub fn evaluate_node(
        &self,
        config: &ConditionConfig,
        data: &EntityData,
    ) -> Result<bool, ConditionError> {
        let field_type = self.field_type(&config.field);
        let value = data.field_value(&config.field);
        let outcome = evaluate(
            &config.field,
            &field_type,
            &value,
            config.operator,
            &config.value,
        )?;
        debug!(
            field = %config.field,
            operator = %config.operator,
            comparison = %config.value,
            actual = %value,
            outcome,
            "evaluated condition"
        );
        Ok(outcome)
    }
}
