use log::{debug, info};
use xarfconv::{FormatType, ValidationOptions, ValidationResult, convert, validate};

use crate::validation::{read_input, resolve_format, write_output};

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub input_format: Option<String>,
    pub output_format: Option<String>,
    /// Run the validator on XARF output and report findings on stderr.
    pub validate: bool,
}

/// Converts `input` (a path or `-`) and writes the result to `output` or stdout.
pub fn run_convert_command(
    input: &str,
    output: Option<&str>,
    options: &ConvertOptions,
) -> Result<(), String> {
    let source = resolve_format(options.input_format.as_deref(), Some(input), "input")?;
    let target = resolve_format(options.output_format.as_deref(), output, "output")?;
    let content = read_input(input)?;

    let converted = convert(content.as_str(), source, target).map_err(|e| e.to_string())?;
    info!("converted {} from {} to {}", input, source, target);

    if options.validate {
        if target == FormatType::Xarf {
            let result =
                validate(&converted, &ValidationOptions::default()).map_err(|e| e.to_string())?;
            print_findings(&result);
        } else {
            debug!("skipping validation of {} output", target);
        }
    }

    write_output(output, &converted)
}

/// Prints validation findings to stderr.
pub fn print_findings(result: &ValidationResult) {
    if result.is_clean() {
        eprintln!("✅ Report is valid");
        return;
    }
    if result.valid {
        eprintln!("✅ Report is valid, with {} warning(s)", result.warnings.len());
    } else {
        eprintln!("❌ Report is invalid: {} error(s)", result.errors.len());
    }
    for error in &result.errors {
        eprintln!("   error: {}", error);
    }
    for warning in &result.warnings {
        eprintln!("   warning: {}", warning);
    }
}
