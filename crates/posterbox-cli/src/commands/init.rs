//! Initialize Posterbox.

use super::{get_database, get_paths};
use anyhow::{Context, Result};
use colored::Colorize;
use posterbox_config::{Config, ACCOUNT_VAR, PASSWORD_VAR};

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    println!("{}", "Initializing Posterbox...".cyan().bold());

    paths
        .ensure_dirs()
        .context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    if paths.config_file.exists() {
        println!(
            "  {} Config already exists: {}",
            "•".yellow(),
            paths.config_file.display()
        );
    } else {
        Config::create_default_file(&paths.config_file)
            .context("Failed to create config file")?;
        println!(
            "  {} Created config: {}",
            "✓".green(),
            paths.config_file.display()
        );
    }

    let config = Config::load_from(&paths.config_file).context("Failed to read config file")?;
    let db = get_database(&config, &paths)?;
    if let Some(path) = db.path() {
        println!("  {} Database ready: {}", "✓".green(), path.display());
    }

    println!();
    println!("{}", "Posterbox initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set {} and {} (or put them in a .env file)",
        ACCOUNT_VAR.cyan(),
        PASSWORD_VAR.cyan()
    );
    println!("  2. Check providers: {}", "posterbox check".cyan());
    println!("  3. Run a pass: {}", "posterbox".cyan());

    Ok(())
}
