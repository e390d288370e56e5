//! Position-level classification for in-kind allowance lookup.
//!
//! Classification walks an ordered rule list and the first matching rule
//! wins. The order is fixed: staff titles, operator titles, contract
//! employment, then the general fallback.

use crate::config::{AllowanceConfig, PositionLevel};
use crate::models::{Employee, EmploymentType};

/// One classification rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelRule {
    /// Matches when the job title contains any of the keywords.
    TitleContains {
        /// Case-sensitive title fragments.
        keywords: Vec<String>,
        /// Level assigned on match.
        level: PositionLevel,
    },
    /// Matches on employment type.
    Employment {
        /// Employment type to match.
        employment_type: EmploymentType,
        /// Level assigned on match.
        level: PositionLevel,
    },
}

impl LevelRule {
    /// The level this rule assigns.
    pub fn level(&self) -> PositionLevel {
        match self {
            LevelRule::TitleContains { level, .. } | LevelRule::Employment { level, .. } => *level,
        }
    }

    fn matches(&self, employee: &Employee) -> bool {
        match self {
            LevelRule::TitleContains { keywords, .. } => keywords
                .iter()
                .any(|keyword| employee.position.contains(keyword.as_str())),
            LevelRule::Employment {
                employment_type, ..
            } => employee.employment_type == *employment_type,
        }
    }
}

/// The ordered rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionClassifier {
    rules: Vec<LevelRule>,
}

impl PositionClassifier {
    /// Builds the fixed-precedence rule list from the configured keywords.
    pub fn from_config(config: &AllowanceConfig) -> Self {
        Self {
            rules: vec![
                LevelRule::TitleContains {
                    keywords: config.staff_keywords.clone(),
                    level: PositionLevel::Staff,
                },
                LevelRule::TitleContains {
                    keywords: config.operator_keywords.clone(),
                    level: PositionLevel::Operator,
                },
                LevelRule::Employment {
                    employment_type: EmploymentType::Contract,
                    level: PositionLevel::Contract,
                },
            ],
        }
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[LevelRule] {
        &self.rules
    }

    /// Classifies an employee; falls back to [`PositionLevel::General`].
    pub fn classify(&self, employee: &Employee) -> PositionLevel {
        self.rules
            .iter()
            .find(|rule| rule.matches(employee))
            .map(LevelRule::level)
            .unwrap_or(PositionLevel::General)
    }
}
