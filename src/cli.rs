//! Command-line interface implementation for setupgen.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, ArgGroup, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for setupgen.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "setupgen: generate agent rule and skill trees from profile configurations",
    long_about = None
)]
#[command(group(ArgGroup::new("source").required(true).multiple(true).args(["config", "profiles"])))]
pub struct Args {
    /// Profile configuration document (setup-config.<profile>.yaml); may be repeated
    #[arg(short, long, value_name = "FILE")]
    pub config: Vec<PathBuf>,

    /// Directory whose setup-config.*.yaml documents are all generated
    #[arg(short, long, value_name = "DIR")]
    pub profiles: Option<PathBuf>,

    /// Directory where the generated tree is written; with several profiles
    /// each one goes to its own subdirectory
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Template tree to expand [default: templates/ beside the first configuration]
    #[arg(short, long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Print the resolved placeholders of each profile and exit
    #[arg(short, long)]
    pub list: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
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
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
