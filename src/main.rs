use anyhow::{Context, Result};
use mdpage::{Config, converter_for, format_file_size};
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status for invalid command line configuration, matching clap.
const EXIT_USAGE: u8 = 2;

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mdpage={}", config.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(config: &Config) -> Result<()> {
    let request = config.request();
    let converter = converter_for(config.backend, &config.pandoc);

    tracing::debug!(
        backend = converter.name(),
        input = %request.input.display(),
        output = %request.output.display(),
        "Converting document"
    );

    converter
        .convert(&request)
        .with_context(|| format!("Failed to render {}", request.input.display()))?;

    let size = fs::metadata(&request.output)
        .map(|m| m.len() as usize)
        .context("Generated page is missing")?;

    if !config.quiet {
        println!(
            "Generated: {} ({})",
            request.output.display(),
            format_file_size(size)
        );
    }

    if config.open {
        // The page exists at this point; a browser failure is not fatal
        if let Err(e) = open::that(&request.output) {
            tracing::warn!("Failed to open {}: {}", request.output.display(), e);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(&config);

    if let Err(e) = config.validate() {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(EXIT_USAGE);
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<mdpage::Error>()
                .map(mdpage::Error::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
