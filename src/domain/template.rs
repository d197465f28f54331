//! File template parsing and rendering
//!
//! Supports variable syntax: `${var:variable-name:default-value}`
//! - `${var:name}` - Required variable, error if not provided
//! - `${var:name:default}` - Optional variable with default value

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Regex to match variable patterns: ${var:name} or ${var:name:default}
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:([a-zA-Z0-9][-a-zA-Z0-9_]*)(?::([^}]*))?\}")
        .expect("variable pattern is valid")
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },

    #[error("Conflicting defaults for variable: {name}")]
    ConflictingDefaults { name: String },
}

/// A variable referenced by a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariable {
    pub name: String,
    pub default: Option<String>,
}

impl TemplateVariable {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A parsed file template
#[derive(Debug, Clone)]
pub struct FileTemplate {
    content: String,
    variables: Vec<TemplateVariable>,
}

impl FileTemplate {
    /// Parse a template string and collect its variables
    ///
    /// A variable may appear many times, but every occurrence must agree on
    /// its default.
    pub fn parse(content: impl Into<String>) -> Result<Self, TemplateError> {
        let content = content.into();
        let mut variables: Vec<TemplateVariable> = Vec::new();
        let mut seen = HashSet::new();

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let name = cap[1].to_string();
            let default = cap.get(2).map(|m| m.as_str().to_string());

            if !seen.insert(name.clone()) {
                let existing = variables.iter().find(|v| v.name == name);
                if existing.is_some_and(|v| v.default != default) {
                    return Err(TemplateError::ConflictingDefaults { name });
                }
                continue;
            }

            variables.push(TemplateVariable { name, default });
        }

        Ok(Self { content, variables })
    }

    pub fn variables(&self) -> &[TemplateVariable] {
        &self.variables
    }

    /// Render the template with provided values
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .variables
            .iter()
            .find(|v| v.is_required() && !values.contains_key(&v.name))
        {
            return Err(TemplateError::MissingVariable {
                name: missing.name.clone(),
            });
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |cap: &regex::Captures| {
            values
                .get(&cap[1])
                .map(String::as_str)
                .or_else(|| cap.get(2).map(|m| m.as_str()))
                .unwrap_or_default()
                .to_string()
        });

        Ok(rendered.into_owned())
    }
}

/// Convenience function to render a template string directly
pub fn render_template(
    template: &str,
    values: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    FileTemplate::parse(template)?.render(values)
}
