mod page;
mod renderer;

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("vitrine_core=warn,vitrine=info"))
        .unwrap_or_default();

    // Raw-mode terminal owns stdout; logs go to stderr so a redirect
    // (`2>vitrine.log`) captures them without tearing the screen.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let spec = match std::env::args().nth(1) {
        Some(path) => page::PageSpec::load(&PathBuf::from(path))?,
        None => page::PageSpec::sample(),
    };

    renderer::run(&spec)?;
    Ok(())
}
