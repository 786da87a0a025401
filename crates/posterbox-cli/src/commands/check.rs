//! Check command - report whether the OCR and tagging providers work.

use super::load_config;
use anyhow::Result;
use colored::Colorize;
use posterbox_ollama::OllamaTagExtractor;

pub fn run() -> Result<()> {
    let config = load_config()?;

    println!("{}", "Provider Check".cyan().bold());
    println!("{}", "─".repeat(50));

    println!();
    println!("{}", "Text recognition".white().bold());
    if !config.ocr.enabled {
        println!("  {}", "disabled in config".dimmed());
    } else {
        for (tool, found) in posterbox_process::check_dependencies() {
            print_status(tool, found);
        }
        println!(
            "  language: {}, page segmentation: {}",
            config.ocr.language, config.ocr.page_segmentation
        );
    }

    println!();
    println!("{}", "Tagging".white().bold());
    if !config.tagging.enabled {
        println!("  {}", "disabled in config".dimmed());
    } else {
        let tagger = OllamaTagExtractor::from_config(&config.tagging)?;
        let running = tagger.is_available();
        print_status(&format!("ollama at {}", config.tagging.host), running);

        if running {
            let has_model = tagger.has_model().unwrap_or(false);
            print_status(&format!("model {}", config.tagging.model), has_model);
            if !has_model {
                println!(
                    "    Pull it with: {}",
                    format!("ollama pull {}", config.tagging.model).cyan()
                );
            }
        }
    }

    println!();
    println!("{}", "Mail".white().bold());
    match config.credentials() {
        Ok(credentials) => println!(
            "  {} {} on {}:{}",
            "✓".green(),
            credentials.account,
            config.mail.server,
            config.mail.port
        ),
        Err(e) => println!("  {} {}", "✗".red(), e),
    }

    Ok(())
}

fn print_status(name: &str, ok: bool) {
    if ok {
        println!("  {} {}", "✓".green(), name);
    } else {
        println!("  {} {}", "✗".red(), name);
    }
}
