use assay::context::variables::value_to_string;
use assay::{AssayError, TestContext, ValidationConfig, XmlMessageValidator, evaluate_condition};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

/// Validates message payloads against control templates.
#[derive(Parser, Debug)]
#[command(name = "assay", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an XML payload using a JSON validation configuration.
    Validate {
        /// Path to the validation configuration.
        #[arg(short, long)]
        config: PathBuf,
        /// Path to the actual XML payload.
        payload: PathBuf,
    },
    /// Evaluate a boolean condition such as "((1 lt 2) or (3 gt 5))".
    Eval { expression: String },
    /// Resolve variables and functions in a piece of text.
    Resolve {
        text: String,
        /// Variable definitions as name=value.
        #[arg(short = 'D', long = "define", value_parser = parse_definition)]
        definitions: Vec<(String, String)>,
        /// Wrap substituted values in single quotes.
        #[arg(long)]
        quote: bool,
    },
}

fn parse_definition(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

fn main() -> Result<(), AssayError> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { config, payload } => {
            let config = ValidationConfig::from_file(&config)?;
            let actual = fs::read_to_string(&payload)?;
            let test_ctx = config.run(&XmlMessageValidator::default(), &actual)?;
            println!("Validation of {} successful", payload.display());
            for (name, value) in test_ctx.variables() {
                if !config.global_variables.contains_key(name) {
                    println!("  {} = {}", name, value_to_string(value));
                }
            }
        }
        Command::Eval { expression } => {
            println!("{}", evaluate_condition(&expression)?);
        }
        Command::Resolve {
            text,
            definitions,
            quote,
        } => {
            let mut test_ctx = TestContext::default();
            for (name, value) in definitions {
                test_ctx.set_variable(&name, value)?;
            }
            println!("{}", test_ctx.resolve_in_string(&text, quote)?);
        }
    }
    Ok(())
}
