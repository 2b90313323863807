//! setupgen's main application entry point.
//! Parses arguments, resolves the profiles to generate and reports a
//! per-profile summary.

use setupgen::{
    cli::{get_args, Args},
    config::ConfigDocument,
    error::{default_error_handler, Error, Result},
    generator::{
        default_template_dir, discover_profiles, run_batch, Profile, ProfileGenerator,
        ProfileResult,
    },
    logger::init_logger,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => default_error_handler(err),
    }
}

/// Collects profiles from `--config` and `--profiles`, in that order.
fn resolve_profiles(args: &Args) -> Result<Vec<Profile>> {
    let mut profiles: Vec<Profile> = args.config.iter().map(Profile::from_path).collect();
    if let Some(dir) = &args.profiles {
        profiles.extend(discover_profiles(dir)?);
    }
    Ok(profiles)
}

/// Main application logic execution.
///
/// # Returns
/// * `Result<bool>` - whether every profile passed
///
/// # Flow
/// 1. Resolves profiles and the template tree
/// 2. With `--list`, prints resolved placeholders and stops
/// 3. Generates and validates every profile in sequence
/// 4. Prints the files each profile produced
/// 5. Prints the per-profile summary and the aggregate count
fn run(args: Args) -> Result<bool> {
    let profiles = resolve_profiles(&args)?;
    let Some(first) = profiles.first() else {
        return Err(Error::ProfileNotFound { location: "command line".to_string() });
    };

    if args.list {
        for profile in &profiles {
            println!("[{}]", profile.name);
            let document = ConfigDocument::load(&profile.config_path)?;
            for (name, value) in document.placeholders() {
                println!("  {{{}}} = {}", name, value);
            }
        }
        return Ok(true);
    }

    let template_root =
        args.templates.clone().unwrap_or_else(|| default_template_dir(&first.config_path));
    let generator = ProfileGenerator::new(template_root);
    println!("Using templates from '{}'", generator.template_root().display());

    let summary = run_batch(&generator, &profiles, &args.output);
    for result in &summary.results {
        if let ProfileResult::Completed(report) = result {
            for target in &report.expansion.written {
                println!("Writing: '{}'", target.display());
            }
            for target in &report.expansion.copied {
                println!("Copying: '{}'", target.display());
            }
        }
    }
    println!("{}", summary);
    Ok(summary.success())
}
