//! Command-line interface implementation for molt.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

use crate::encoding::Encoding;

/// Command-line arguments structure for molt.
#[derive(Parser, Debug)]
#[command(author, version, about = "molt: Mustache project templates", long_about = None)]
pub struct Args {
    /// Path to the template directory
    #[arg(value_name = "TEMPLATE_DIR", required_unless_present = "license")]
    pub template_dir: Option<PathBuf>,

    /// JSON or YAML file holding the template context
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory where the project will be created. Must not exist.
    /// Defaults to the first free one of "output", "output (1)", ...
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Encoding of the files that get rendered
    #[arg(short, long, value_enum, default_value_t = Encoding::Utf8)]
    pub encoding: Encoding,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the license and exit
    #[arg(long)]
    pub license: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help()
                    .unwrap();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
