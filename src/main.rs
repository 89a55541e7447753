//! # chatdom CLI
//!
//! Command-line interface for the chatdom library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatdom::ChatdomError;
use chatdom::chats::list_chats;
use chatdom::cli::Args;
use chatdom::config::EngineConfig;
use chatdom::engine::{Engine, ScrapeRequest};
use chatdom::export::export_path;
use chatdom::format::{ExportFormat, to_format_string, write_to_format};
use chatdom::logging::init_logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatdomError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose);

    let document = std::fs::read_to_string(&args.input)?;

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(date) = args.reference_date()? {
        config = config.with_reference_date(date);
    }

    if args.list_chats {
        for chat in list_chats(&document, &config.markers)? {
            println!("{chat}");
        }
        return Ok(());
    }

    let format: ExportFormat = args.format.into();

    if args.stdout {
        let scrape = scrape(&document, &args, config)?;
        print!("{}", to_format_string(&scrape.log.rows(), format)?);
        return Ok(());
    }

    let chat = args.chat_name();
    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => export_path(
            &args.export_dir,
            &chat,
            chrono::Local::now().naive_local(),
            format,
        )?,
    };

    // Print header
    println!("📦 chatdom v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("💬 Chat:    {}", chat);
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", output_path.display());
    println!("📄 Format:  {}", format);
    if let Some(date) = config.reference_date {
        println!("📅 Today:   {}", date);
    }
    println!();

    println!("⏳ Scraping...");
    let scrape_start = Instant::now();
    let scrape = scrape(&document, &args, config)?;
    let report = &scrape.report;
    println!(
        "   Found {} messages in {} fragments ({:.2}s)",
        report.records,
        report.fragments,
        scrape_start.elapsed().as_secs_f64()
    );

    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    let rows = scrape.log.rows();
    write_to_format(&rows, &output_path, format)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", output_path.display());

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Dates:     {}", scrape.log.groups().len());
    println!("   Messages:  {}", rows.len());
    println!("   You:       {}", report.self_identity);
    if report.unresolved_senders > 0 || report.unresolved_timestamps > 0 {
        println!(
            "   Inferred:  {} senders, {} timestamps",
            report.unresolved_senders, report.unresolved_timestamps
        );
    }
    if report.count_mismatch() {
        println!(
            "⚠️  Expected {} messages, exported {} ({} fragments dropped)",
            report.expected_records(),
            report.records,
            report.dropped.len()
        );
    }
    if !report.target_reached() {
        println!(
            "⚠️  Snapshot holds {} of the {} requested messages",
            report.fragments,
            report.target.unwrap_or_default()
        );
    }

    println!();
    println!("⚡ Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

fn scrape(
    document: &str,
    args: &Args,
    config: EngineConfig,
) -> Result<chatdom::engine::Scrape, ChatdomError> {
    let mut request = ScrapeRequest::new(document);
    if let Some(target) = args.target {
        request = request.with_target(target);
    }
    Engine::with_config(config).scrape(&request)
}
