//! CLI library for testing purposes

pub mod check;
pub mod convert;
pub mod generate;
pub mod validation;

pub use check::{CheckOptions, run_validate_command};
pub use convert::{ConvertOptions, run_convert_command};
pub use validation::{resolve_format, validate_file_path, validate_output_path};
