//! Tags command.

use super::{get_database, get_paths, load_config};
use anyhow::Result;
use colored::Colorize;

pub fn run() -> Result<()> {
    let config = load_config()?;
    let paths = get_paths()?;
    let db = get_database(&config, &paths)?;

    let tag_counts = db.get_tag_counts()?;

    if tag_counts.is_empty() {
        println!(
            "{}",
            "No tags yet. Tags are created when posters are ingested.".dimmed()
        );
        return Ok(());
    }

    println!("{}", "Tags".cyan().bold());
    println!("{}", "─".repeat(50));

    for (tag, count) in tag_counts {
        println!("  {} {} ({})", "•".yellow(), tag.name.white(), count);
    }

    Ok(())
}
