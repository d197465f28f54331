//! Domain layer - token identity, templates and errors

pub mod error;
pub mod template;
pub mod token;

pub use error::DomainError;
pub use template::{render_template, FileTemplate, TemplateError, TemplateVariable};
pub use token::TokenInfo;
