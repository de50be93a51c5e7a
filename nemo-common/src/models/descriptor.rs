use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::TypeTag;

/// One named argument of a recorded contract call, rendered for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorArgument {
    pub name: String,
    pub value: String,
}

/// Audit record of a single contract call appended to a call sequence.
///
/// Descriptors are never executed; the sequence's commands are the source of truth.
/// They exist so that a failed simulation can be traced back to what was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallDescriptor {
    /// `<package>::<module>::<function>`
    pub target: String,
    pub arguments: Vec<DescriptorArgument>,
    pub type_arguments: Vec<TypeTag>,
}

impl CallDescriptor {
    pub fn new(target: impl Into<String>, type_arguments: Vec<TypeTag>) -> Self {
        Self { target: target.into(), arguments: Vec::new(), type_arguments }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments
            .push(DescriptorArgument { name: name.into(), value: value.into() });
        self
    }

    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| arg.value.as_str())
    }
}

impl fmt::Display for CallDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target)?;
        if !self.type_arguments.is_empty() {
            write!(f, "<{}>", self.type_arguments.join(", "))?;
        }
        let args = self
            .arguments
            .iter()
            .map(|arg| format!("{}: {}", arg.name, arg.value))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "({args})")
    }
}
