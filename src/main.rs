//! Guild Damage Parser
//!
//! Extracts guild-boss damage tables and personal damage reports from
//! mobile-game screenshots via OCR, with a content-addressed result cache.

mod config;
mod damage;
mod extract;
mod geometry;
mod image_io;
mod ocr;
mod paths;

use anyhow::{anyhow, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use extract::DamageTableExtractor;
use ocr::TesseractEngine;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("guild_damage_parser.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    paths::ensure_directories()?;

    let mut stats_mode = false;
    let mut normalize_mode = false;
    let mut inputs: Vec<String> = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--stats" {
            stats_mode = true;
        } else if arg == "--normalize" {
            normalize_mode = true;
        } else if arg == "--help" || arg == "-h" {
            print_usage();
            return Ok(());
        } else {
            inputs.push(arg);
        }
    }
    if inputs.is_empty() {
        print_usage();
        return Err(anyhow!("no inputs given"));
    }

    if normalize_mode {
        // Re-render user-typed damage tokens ("8.88b", "8880M", raw numbers)
        // in canonical form; a bad token fails alone, not the batch.
        let mut failures = 0usize;
        for token in &inputs {
            match damage::parse_damage(token) {
                Ok(value) => log(&format!("{} => {}", token, damage::format_damage(value))),
                Err(e) => {
                    failures += 1;
                    log(&format!("ERROR {}", e));
                }
            }
        }
        if failures > 0 {
            return Err(anyhow!("{} of {} tokens failed", failures, inputs.len()));
        }
        return Ok(());
    }

    let images: Vec<PathBuf> = inputs.into_iter().map(PathBuf::from).collect();

    let config = config::load_config();
    let engine = TesseractEngine::new(config.ocr_executable.clone(), config.ocr_language.clone());
    let extractor = DamageTableExtractor::new(Box::new(engine), config);

    // One image's failure must not stop the rest of the batch
    let mut failures = 0usize;
    for image in &images {
        log(&format!("Processing {}", image.display()));
        let outcome = if stats_mode {
            run_stats(&extractor, image)
        } else {
            run_table(&extractor, image)
        };
        if let Err(e) = outcome {
            failures += 1;
            log(&format!("ERROR {}: {:#}", image.display(), e));
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} of {} images failed", failures, images.len()));
    }
    log("Done.");
    Ok(())
}

fn run_table(extractor: &DamageTableExtractor, image: &std::path::Path) -> Result<()> {
    let table = extractor.extract_table(image)?;
    log(&format!("Header: {}", table.header.join(" | ")));
    for row in &table.rows {
        log(&format!("Row: {}", row.join(" | ")));
    }
    Ok(())
}

fn run_stats(extractor: &DamageTableExtractor, image: &std::path::Path) -> Result<()> {
    let stats = extractor.extract_stats(image)?;
    log(&format!(
        "Boss: {}",
        stats.boss.as_deref().unwrap_or("(not found)")
    ));
    log(&format!(
        "Level: {}",
        stats
            .level
            .map(|level| level.to_string())
            .unwrap_or_else(|| "(not found)".to_string())
    ));
    log(&format!(
        "Damage: {}",
        stats
            .damage
            .map(|value| damage::format_damage(value as f64))
            .unwrap_or_else(|| "(not found)".to_string())
    ));
    Ok(())
}

fn print_usage() {
    println!("Usage: guild-damage-parser [--stats | --normalize] <image|token>...");
    println!();
    println!("  default      extract the guild participant damage table");
    println!("  --stats      extract boss / level / total damage from a damage report");
    println!("  --normalize  treat arguments as damage tokens and print canonical form");
}
