//! Score explanation trees.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One node of a score explanation. Every arithmetic operand of a score
/// is a child node, so the tree can be re-added by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub value: f64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Explanation>,
}

impl Explanation {
    /// A leaf explanation.
    pub fn new<S: Into<String>>(value: f64, message: S) -> Self {
        Explanation {
            value,
            message: message.into(),
            children: Vec::new(),
        }
    }

    /// An explanation combining `children`.
    pub fn with_children<S: Into<String>>(
        value: f64,
        message: S,
        children: Vec<Explanation>,
    ) -> Self {
        Explanation {
            value,
            message: message.into(),
            children,
        }
    }

    /// Render as indented JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{} = {}", "", self.value, self.message, indent = depth * 2)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
