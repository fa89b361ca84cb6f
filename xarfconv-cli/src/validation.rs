//! Argument checks shared by the subcommands: paths, format labels, input and output.

use std::io::Read;
use std::path::Path;

use xarfconv::{FormatType, infer_format_from_extension, traits::read_text};

/// The path that stands for stdin (input) or stdout (output).
pub const STDIO: &str = "-";

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        return Err(format!("Cannot create output directory: {}", e));
    }

    Ok(())
}

/// Parses a `--from`/`--to` label.
pub fn parse_format(label: &str) -> Result<FormatType, String> {
    label.parse::<FormatType>().map_err(|e| e.to_string())
}

/// Picks the explicit format if given, otherwise infers it from the path.
///
/// `what` names the side ("input" or "output") in error messages.
pub fn resolve_format(
    explicit: Option<&str>,
    path: Option<&str>,
    what: &str,
) -> Result<FormatType, String> {
    if let Some(label) = explicit {
        return parse_format(label);
    }
    match path {
        Some(path) if path != STDIO => infer_format_from_extension(path).ok_or_else(|| {
            format!(
                "Cannot infer {} format from `{}`; pass it explicitly (xarf, arf, csv, iodef)",
                what, path
            )
        }),
        _ => Err(format!(
            "Cannot infer {} format without a file name; pass it explicitly (xarf, arf, csv, iodef)",
            what
        )),
    }
}

/// Reads the whole input, from stdin when `path` is `-`.
pub fn read_input(path: &str) -> Result<String, String> {
    if path == STDIO {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        return Ok(content);
    }
    validate_file_path(path)?;
    read_text(path).map_err(|e| format!("Failed to read {}: {}", path, e))
}

/// Writes `content` to `path`, or to stdout when there is no path.
pub fn write_output(path: Option<&str>, content: &str) -> Result<(), String> {
    match path {
        Some(path) if path != STDIO => {
            validate_output_path(path)?;
            std::fs::write(path, content).map_err(|e| format!("Failed to write {}: {}", path, e))
        }
        _ => {
            println!("{}", content);
            Ok(())
        }
    }
}
