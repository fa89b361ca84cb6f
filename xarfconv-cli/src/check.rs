use xarfconv::{ValidationOptions, validate};

use crate::convert::print_findings;
use crate::validation::read_input;

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    pub strict: bool,
    pub no_warnings: bool,
    /// Print the result as JSON on stdout instead of a summary on stderr.
    pub json: bool,
}

/// Validates a XARF report. Returns whether the report is valid.
pub fn run_validate_command(input: &str, options: CheckOptions) -> Result<bool, String> {
    let content = read_input(input)?;
    let validation = ValidationOptions::new()
        .with_strict(options.strict)
        .with_warnings(!options.no_warnings);
    let result = validate(&content, &validation).map_err(|e| e.to_string())?;

    if options.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to render result: {}", e))?;
        println!("{}", json);
    } else {
        print_findings(&result);
    }
    Ok(result.valid)
}
