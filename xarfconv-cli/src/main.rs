use clap::{ArgGroup, Parser, Subcommand};
use xarfconv::{FormatType, GenerateOptions};
use xarfconv_cli::{
    CheckOptions, ConvertOptions,
    generate::{HashInput, run_generate_command, run_hash_command, run_sample_command},
    run_convert_command, run_validate_command,
    validation::parse_format,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log routing and parsing details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an abuse report between formats.
    Convert {
        /// The input file, or `-` for stdin
        #[arg(short, long)]
        input: String,
        /// The output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
        /// Source format (xarf, arf, csv, iodef); inferred from the input extension by default
        #[arg(long)]
        from: Option<String>,
        /// Target format (xarf, arf, csv, iodef); inferred from the output extension by default
        #[arg(long)]
        to: Option<String>,
        /// Validate XARF output and print findings to stderr
        #[arg(long)]
        validate: bool,
    },

    /// Validate a XARF report. Exits with status 1 when it is invalid.
    Validate {
        /// The XARF JSON file, or `-` for stdin
        #[arg(short, long)]
        input: String,
        /// Apply strict validation
        #[arg(long)]
        strict: bool,
        /// Skip recommended-field and value-range warnings
        #[arg(long)]
        no_warnings: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a sample report.
    Sample {
        #[arg(short, long, value_parser = parse_format, default_value = "xarf")]
        format: FormatType,
        /// The output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate a fresh XARF report.
    Generate {
        /// Report category, e.g. abuse
        #[arg(long)]
        category: String,
        /// Event type within the category, e.g. ddos
        #[arg(long = "type")]
        kind: String,
        /// Source identifier, usually an IP address
        #[arg(long)]
        source: String,
        /// Reporter contact address
        #[arg(long)]
        contact: String,
        /// Reporter organization
        #[arg(long)]
        org: Option<String>,
        /// Organization the report is filed on behalf of
        #[arg(long)]
        on_behalf_org: Option<String>,
        /// Contact of the organization the report is filed on behalf of
        #[arg(long, requires = "on_behalf_org")]
        on_behalf_contact: Option<String>,
        /// Attach a sample evidence item
        #[arg(long)]
        evidence: bool,
        /// Fill severity, confidence, tags and a destination
        #[arg(long)]
        optional: bool,
        /// Output format
        #[arg(short, long, value_parser = parse_format, default_value = "xarf")]
        format: FormatType,
        /// The output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Hash evidence and print it as a XARF evidence item.
    #[command(group(ArgGroup::new("source").required(true).args(["input", "text", "base64"])))]
    Hash {
        /// The evidence file
        #[arg(short, long)]
        input: Option<String>,
        /// Evidence given as text
        #[arg(long)]
        text: Option<String>,
        /// Evidence given as base64 data
        #[arg(long)]
        base64: Option<String>,
        /// MIME type recorded on file evidence
        #[arg(long, requires = "input")]
        content_type: Option<String>,
        /// Also print the SHA-1 digest to stderr
        #[arg(long)]
        sha1: bool,
    },
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match args.commands {
        Commands::Convert {
            input,
            output,
            from,
            to,
            validate,
        } => {
            let options = ConvertOptions {
                input_format: from,
                output_format: to,
                validate,
            };
            run_convert_command(&input, output.as_deref(), &options)
        }
        Commands::Validate {
            input,
            strict,
            no_warnings,
            json,
        } => {
            let options = CheckOptions {
                strict,
                no_warnings,
                json,
            };
            match run_validate_command(&input, options) {
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => Err(e),
            }
        }
        Commands::Sample { format, output } => run_sample_command(format, output.as_deref()),
        Commands::Generate {
            category,
            kind,
            source,
            contact,
            org,
            on_behalf_org,
            on_behalf_contact,
            evidence,
            optional,
            format,
            output,
        } => {
            let mut options = GenerateOptions::new(category, kind, source, contact)
                .with_evidence(evidence)
                .with_optional(optional);
            options.reporter_org = org;
            if let Some(on_behalf_org) = on_behalf_org {
                options = options.with_on_behalf_of(&on_behalf_org, on_behalf_contact.as_deref());
            }
            run_generate_command(&options, format, output.as_deref())
        }
        Commands::Hash {
            input,
            text,
            base64,
            content_type,
            sha1,
        } => {
            let source = match (input, text, base64) {
                (Some(path), _, _) => Ok(HashInput::File { path, content_type }),
                (_, Some(text), _) => Ok(HashInput::Text(text)),
                (_, _, Some(data)) => Ok(HashInput::Base64(data)),
                (None, None, None) => {
                    Err("one of --input, --text or --base64 is required".to_string())
                }
            };
            source.and_then(|source| run_hash_command(source, sha1))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
