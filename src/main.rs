use anyhow::Context;
use lumoface_emotions::cli::Menu;
use lumoface_emotions::config::{AppConfig, CONFIG_FILE_NAME};
use lumoface_emotions::emotion::{Catalog, SystemClock};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so they never interleave with the menu.
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(Path::new(CONFIG_FILE_NAME));

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::import_from_file(path)
            .with_context(|| format!("Failed to load emotion catalog from {}", path.display()))?,
        None => Catalog::reference(),
    };
    tracing::info!(
        emotions = catalog.len(),
        total_weight = catalog.total_weight(),
        "Emotion catalog ready"
    );

    let mut rng = config.rng();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    Menu::new(
        &catalog,
        &config,
        &mut rng,
        SystemClock,
        stdin.lock(),
        stdout.lock(),
    )
    .run()
    .context("Console I/O failed")?;

    Ok(())
}
