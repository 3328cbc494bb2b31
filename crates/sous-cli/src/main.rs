use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sous_core::kitchen::Course;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "sous")]
#[command(about = "SOUS - turn what is in your pantry into dishes, recipes and kitchen advice", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest dishes for a set of ingredients
    Suggest {
        /// snack, starter, main or dessert
        #[arg(long, default_value = "main")]
        course: Course,

        /// Expand the suggestion with this id into a full recipe
        #[arg(long)]
        expand: Option<String>,

        /// Write the dish photo of the expanded suggestion to this file
        #[arg(long, requires = "expand")]
        image_out: Option<PathBuf>,

        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Write a full recipe (and photo) for a dish
    Recipe {
        title: String,

        ingredients: Vec<String>,

        /// Write the dish photo to this file
        #[arg(long)]
        image_out: Option<PathBuf>,
    },
    /// Talk to the sous chef
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest {
            course,
            expand,
            image_out,
            ingredients,
        } => commands::suggest::run(course, &ingredients, expand.as_deref(), image_out).await?,
        Commands::Recipe {
            title,
            ingredients,
            image_out,
        } => commands::recipe::run(&title, &ingredients, image_out).await?,
        Commands::Chat => commands::chat::run().await?,
    }

    Ok(())
}
