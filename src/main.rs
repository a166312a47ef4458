//! molt's application entry point.
//! Parses arguments, sets up logging and hands the template over to the molter.

use molt::{
    cli::{get_args, Args},
    constants::{DEFAULT_OUTPUT_DIR, LICENSE},
    dirchooser::choose_output_dir,
    error::{default_error_handler, Result},
    molter::{MoltOptions, Molter},
    renderer::MustacheRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let verbose = args.verbose;
    if let Err(err) = run(args) {
        default_error_handler(err, verbose);
    }
}

/// Molts the template and prints the output directory on success.
fn run(args: Args) -> Result<()> {
    if args.license {
        print!("{LICENSE}");
        return Ok(());
    }
    let template_dir = args.template_dir.expect("clap requires TEMPLATE_DIR without --license");

    let renderer = MustacheRenderer::new();
    let options = MoltOptions { encoding: args.encoding };

    let output_dir = args.output.unwrap_or_else(|| choose_output_dir(DEFAULT_OUTPUT_DIR));

    Molter::new(&renderer, options).molt(
        &template_dir,
        args.config.as_deref(),
        &output_dir,
    )?;

    log::info!("Molted {} into {}", template_dir.display(), output_dir.display());
    println!("{}", output_dir.display());
    Ok(())
}
