//! Row models (`FromRow`) and input DTOs, one module per table.

pub mod output;
pub mod prompt;
pub mod user;
pub mod video;
