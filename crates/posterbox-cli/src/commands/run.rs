//! Run command - one ingestion pass over the inbox.

use super::{build_recognizer, build_tagger, get_database, get_paths, load_config};
use anyhow::{Context, Result};
use colored::Colorize;
use posterbox_ingest::{ContentStore, Exporter, Ingestor};
use posterbox_mail::ImapConnection;
use tracing::{error, warn};

pub fn run(export: bool) -> Result<()> {
    let config = load_config()?;

    // Credentials are checked before any network or disk work.
    let credentials = config.credentials()?;

    let paths = get_paths()?;
    let db = get_database(&config, &paths)?;
    let store = ContentStore::open(config.storage.attachment_dir(&paths))
        .context("Failed to open attachment store")?;

    let recognizer = build_recognizer(&config);
    let tagger = build_tagger(&config);

    println!("{}", "Checking for new emails...".cyan().bold());

    let mail = &config.mail;
    let connection = ImapConnection::connect(&mail.server, mail.port, &credentials)
        .inspect_err(|e| error!("{}", e))
        .with_context(|| format!("Could not reach {}", mail.server))?;
    let mailbox = connection
        .select(&mail.inbox, &mail.processed_folder)
        .inspect_err(|e| error!("{}", e))
        .with_context(|| format!("Could not open {}", mail.inbox))?;

    let ingestor = Ingestor::new(&db, &store, recognizer.as_ref(), tagger.as_ref());
    let summary = ingestor
        .run(mailbox, &mail.processed_folder)
        .inspect_err(|e| error!("{}", e))
        .context("Ingestion pass aborted")?;

    println!();
    println!("{}", "Pass Summary".cyan().bold());
    println!("{}", "─".repeat(50));
    for line in summary.to_string().lines() {
        println!("  {}", line);
    }
    if summary.messages_failed > 0 {
        println!(
            "  {} {} message(s) left in {} for the next pass",
            "!".yellow(),
            summary.messages_failed,
            mail.inbox
        );
    }
    if !summary.finalized {
        println!(
            "  {} Processed messages were flagged but not expunged",
            "!".yellow()
        );
    }

    if export {
        let output = config.storage.export_file(&paths);
        match Exporter::new(&db).write(&output) {
            Ok(count) => println!(
                "\n{} Exported {} posters to {}",
                "✓".green(),
                count,
                output.display()
            ),
            Err(e) => {
                warn!("Export failed: {}", e);
                println!("\n{} Export failed: {}", "✗".red(), e);
            }
        }
    }

    println!("\n{}", "Process finished.".green().bold());
    Ok(())
}
