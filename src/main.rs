use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use nutrition_rag::app;
use nutrition_rag::commands::{system, Outcome};
use nutrition_rag::config::AppConfig;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Nutrition chatbot backed by USDA FoodData Central", long_about = None)]
struct Args {
    /// JSON array of food names to ingest (overrides FOODS_FILE)
    #[arg(long)]
    foods: Option<PathBuf>,

    /// Number of foods retrieved per question (overrides RAG_TOP_K)
    #[arg(long)]
    top_k: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    // Fails before any network call when a key is missing
    let mut config = AppConfig::from_env().context("Configuration error")?;
    config
        .apply_overrides(args.foods, args.top_k)
        .context("Configuration error")?;

    println!("{}", "=".repeat(60));
    println!("{}", "NUTRITION ASSISTANT".bold());
    println!("{}", "=".repeat(60));
    println!("\nInitializing...");

    let mut handler = app::bootstrap(config).await?;
    println!(
        "{} {} foods in the knowledge base.\n",
        "Ready!".green(),
        handler.chat().index().len()
    );

    let mut stdout = io::stdout();
    system::print_help(&mut stdout)?;

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    // Main input loop
    loop {
        match rl.readline("👤 ") {
            Ok(line) => {
                let input = line.trim();
                if !input.is_empty() {
                    let _ = rl.add_history_entry(input);
                }
                if handler.run_line(input, &mut stdout).await == Outcome::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
