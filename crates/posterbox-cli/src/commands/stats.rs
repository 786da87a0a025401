//! Stats command - show database statistics.

use super::{format_size, get_database, get_paths, load_config};
use anyhow::Result;
use colored::Colorize;

pub fn run() -> Result<()> {
    let config = load_config()?;
    let paths = get_paths()?;
    let db = get_database(&config, &paths)?;
    run_with_db(&db)
}

/// Run stats with an existing database connection.
pub fn run_with_db(db: &posterbox_db::Database) -> Result<()> {
    let stats = db.get_stats()?;

    println!("{}", "Posterbox Statistics".cyan().bold());
    println!("{}", "─".repeat(50));

    println!();
    println!("{}", "Archive".white().bold());
    println!("  Posters: {}", stats.total_posters.to_string().green());
    if stats.untagged_posters > 0 {
        println!("  Untagged: {}", stats.untagged_posters.to_string().yellow());
    }
    match stats.latest_received {
        Some(latest) => println!("  Last received: {}", latest.format("%Y-%m-%d %H:%M UTC")),
        None => println!("  Last received: {}", "never".dimmed()),
    }

    println!();
    println!("{}", "Tags".white().bold());
    println!("  Distinct tags: {}", stats.total_tags);
    println!("  Poster links: {}", stats.total_links);

    println!();
    println!("{}", "Storage".white().bold());
    println!("  Database size: {}", format_size(stats.database_size_bytes));
    if !db.integrity_check()? {
        println!("  {} Integrity check failed", "✗".red());
    }

    Ok(())
}
