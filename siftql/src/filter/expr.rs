//! Expression tree handed over by the query grammar parser

use serde::{Deserialize, Serialize};

/// Boolean combination of leaf comparisons
///
/// Arguments are raw text; they are only typed once the comparison has been
/// validated against a field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    And {
        children: Vec<Node>,
    },
    Or {
        children: Vec<Node>,
    },
    Comparison {
        selector: String,
        operator: String,
        #[serde(default)]
        arguments: Vec<String>,
    },
}

impl Node {
    pub fn and(children: Vec<Node>) -> Self {
        Self::And { children }
    }

    pub fn or(children: Vec<Node>) -> Self {
        Self::Or { children }
    }

    pub fn comparison(selector: &str, operator: &str, arguments: &[&str]) -> Self {
        Self::Comparison {
            selector: selector.to_string(),
            operator: operator.to_string(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
        }
    }
}
