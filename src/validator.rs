//! External-tool validation: schema checking, style linting, and the pass
//! runner that drives them against one document.

pub mod runner;
pub mod schema;
pub mod style;
pub mod tools;

pub use runner::{PassReport, ValidationRunner};
pub use schema::ValidationOutcome;
pub use style::{StyleFinding, StyleFormat};
pub use tools::ToolError;
