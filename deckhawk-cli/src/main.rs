use clap::{Parser, Subcommand};
use deckhawk_core::{DeckEditor, ExportGrouping, ExportOptions, get_scryfall_client};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deckhawk-cli")]
#[command(about = "A CLI for building Magic: The Gathering decks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for Magic cards
    Search {
        /// Search query
        query: String,
    },
    /// Import a decklist file and print what resolved
    Import {
        /// Path to a decklist text file
        file: PathBuf,
        /// Re-export the imported deck grouped by category
        #[arg(long)]
        export: bool,
    },
    /// Show a random card
    Random,
    /// List Magic sets
    Sets {
        /// Maximum number of sets to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let client = get_scryfall_client();

    match cli.command {
        Commands::Search { query } => {
            println!("Searching for '{}'...", query);

            match client.search_cards(&query).await {
                Ok(results) => {
                    println!("Found {} cards:", results.total_cards);
                    for (i, card) in results.cards.iter().enumerate().take(10) {
                        println!(
                            "  {}. {} ({}) - {}",
                            i + 1,
                            card.name,
                            card.set.to_uppercase(),
                            card.type_line
                        );
                    }
                    if results.cards.len() > 10 {
                        println!("  ... and {} more", results.cards.len() - 10);
                    }
                }
                Err(e) => {
                    eprintln!("Search failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Import { file, export } => {
            let decklist = std::fs::read_to_string(&file)?;
            let mut editor = DeckEditor::new();

            println!("Importing {}...", file.display());
            let report = editor.import(&decklist, client).await;

            for entry in &report.imported {
                println!("  + {}x {} -> {}", entry.quantity, entry.name, entry.category);
            }
            for failure in &report.failed {
                eprintln!("  ! '{}': {}", failure.line, failure.reason);
            }

            let counts = editor.counts();
            println!(
                "Imported {} cards ({} mainboard, {} sideboard, {} failed lines)",
                counts.total(),
                counts.mainboard,
                counts.sideboard,
                report.failed.len()
            );

            if export {
                let options = ExportOptions {
                    grouping: ExportGrouping::ByCategory,
                    ..Default::default()
                };
                println!("\n{}", editor.export(&options));
            }

            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Commands::Random => match client.get_random_card().await {
            Ok(card) => {
                println!("{} ({})", card.name, card.set.to_uppercase());
                println!("  {}", card.type_line);
                if let Some(price) = card.price_usd {
                    println!("  ${:.2}", price);
                }
            }
            Err(e) => {
                eprintln!("Random card failed: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Sets { limit } => match client.get_all_sets().await {
            Ok(sets) => {
                println!("{} sets:", sets.len());
                for set in sets.iter().take(limit) {
                    println!(
                        "  {} - {} ({} cards)",
                        set.code.to_uppercase(),
                        set.name,
                        set.card_count
                    );
                }
            }
            Err(e) => {
                eprintln!("Set listing failed: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
