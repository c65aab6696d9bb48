use anyhow::Context;
use sshift::{config, ssh, ui, App, Registry, Terminal, CRATE_NAME};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=warn", CRATE_NAME))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let path = config::default_config_path()?;
    let outcome = config::load(&path);
    if outcome.created_template {
        println!("Created {}, add your servers there.", path.display());
    }
    for warning in &outcome.warnings {
        println!("⚠ {}", warning);
    }

    let mut app = App::new(Registry::new(outcome.servers), path);

    let mut terminal = Terminal::new(ui::VIEWPORT_HEIGHT).context("failed to set up terminal")?;
    let selected = app.run(&mut terminal)?;

    // drop is needed to cleanup the terminal
    drop(terminal);

    if let Some(record) = selected {
        let code = ssh::connect(&record)?;
        std::process::exit(code);
    }

    Ok(())
}
