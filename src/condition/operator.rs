use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operators available on condition nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
    NotContains,
}

impl ConditionOperator {
    pub const ALL: [ConditionOperator; 6] = [
        ConditionOperator::Equals,
        ConditionOperator::NotEquals,
        ConditionOperator::GreaterThan,
        ConditionOperator::LessThan,
        ConditionOperator::Contains,
        ConditionOperator::NotContains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "not_equals",
            ConditionOperator::GreaterThan => "greater_than",
            ConditionOperator::LessThan => "less_than",
            ConditionOperator::Contains => "contains",
            ConditionOperator::NotContains => "not_contains",
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            ConditionOperator::NotEquals | ConditionOperator::NotContains
        )
    }

    /// The non-negated form of this operator.
    pub fn positive(&self) -> ConditionOperator {
        match self {
            ConditionOperator::NotEquals => ConditionOperator::Equals,
            ConditionOperator::NotContains => ConditionOperator::Contains,
            other => *other,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "==",
            ConditionOperator::NotEquals => "!=",
            ConditionOperator::GreaterThan => ">",
            ConditionOperator::LessThan => "<",
            ConditionOperator::Contains => "contains",
            ConditionOperator::NotContains => "not contains",
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConditionOperator {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ConditionOperator::ALL
            .into_iter()
            .find(|op| op.as_str() == value.trim())
            .ok_or_else(|| format!("unknown condition operator '{}'", value))
    }
}
