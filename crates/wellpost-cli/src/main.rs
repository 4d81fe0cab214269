mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wellpost_core::Platform;
use wellpost_pipeline::Pipeline;

#[derive(Debug, Parser)]
#[command(name = "wellpost-cli")]
#[command(about = "Generate holistic-health social media posts")]
struct Cli {
    /// Print results as JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a post for one platform
    Generate {
        /// instagram, facebook or linkedin
        #[arg(long)]
        platform: Platform,

        /// Free-form topic; normalized before generation
        #[arg(long)]
        topic: String,

        /// Also generate and store a matching image
        #[arg(long)]
        image: bool,

        /// Print a mailto: link for the result
        #[arg(long)]
        mailto: bool,
    },
    /// Revise an existing post (read from --file or stdin)
    Edit {
        #[arg(long)]
        platform: Platform,

        /// What to change, e.g. "make it shorter"
        #[arg(long)]
        instruction: String,

        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Suggest up to three improvements for a post (read from --file or stdin)
    Suggest {
        #[arg(long)]
        platform: Platform,

        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Generate and store an image for a topic
    Image {
        #[arg(long)]
        platform: Platform,

        #[arg(long)]
        topic: String,

        /// Exact text to render on the image
        #[arg(long)]
        subject: Option<String>,
    },
    /// List trending health topics
    Trending {
        /// Print a single topic picked at random
        #[arg(long)]
        random: bool,
    },
    /// Show platform profiles
    Platforms,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("wellpost-cli: run with --help to see available commands");
        return Ok(());
    };

    let config = wellpost_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pipeline = Pipeline::from_app_config(&config)?;
    let output = commands::Output { json: cli.json };
    tracing::debug!(?command, env = %config.env, "running command");

    match command {
        Commands::Generate {
            platform,
            topic,
            image,
            mailto,
        } => {
            let options = commands::GenerateOptions {
                platform,
                topic: &topic,
                image,
                mailto,
                mail_recipient: config.mail_recipient.as_deref(),
            };
            commands::run_generate(&pipeline, output, &options).await
        }
        Commands::Edit {
            platform,
            instruction,
            file,
        } => {
            let post = commands::read_post(file.as_deref())?;
            commands::run_edit(&pipeline, output, platform, &instruction, post).await
        }
        Commands::Suggest { platform, file } => {
            let post = commands::read_post(file.as_deref())?;
            commands::run_suggest(&pipeline, output, platform, &post).await
        }
        Commands::Image {
            platform,
            topic,
            subject,
        } => commands::run_image(&pipeline, output, platform, &topic, subject.as_deref()).await,
        Commands::Trending { random } => commands::run_trending(&pipeline, output, random).await,
        Commands::Platforms => {
            commands::run_platforms(&pipeline, output);
            Ok(())
        }
    }
}
