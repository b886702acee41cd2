// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use prompt_chain_rs::chain::config::{ChainConfig, ModelSection};
use prompt_chain_rs::chain::session::{parse_input, Input, Outcome, Session};
use prompt_chain_rs::chain::workflow::build_question_graph;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML file with model settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Model name, overrides the config file and GROQ_MODEL
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Sampling temperature (0 to 2)
    #[arg(short, long, global = true)]
    temperature: Option<f32>,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask questions interactively until exit, quit or q
    Chat,
    /// Ask a single question
    Ask {
        /// The question to ask
        question: String,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ChainConfig::load(path)?,
        None => ChainConfig::default(),
    };
    config.merge_overrides(ModelSection {
        model_name: args.model,
        temperature: args.temperature,
        base_url: args.base_url,
        ..Default::default()
    });

    let model_config = config.resolve()?;
    log::info!(
        "Using provider: {} with model: {}",
        model_config.endpoint.provider,
        model_config.endpoint.model_name
    );

    let generation = model_config.generation.clone();
    let graph = build_question_graph(Arc::new(model_config), generation)
        .context("failed to build the question graph")?;
    let session = Session::new(&graph);

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let stdin = BufReader::new(tokio::io::stdin());
            let stats = session.run(stdin, tokio::io::stdout()).await?;
            log::info!(
                "Session ended after {} question(s), {} failed",
                stats.asked,
                stats.failed
            );
        }
        Commands::Ask { question, json } => {
            let question = match parse_input(&question) {
                Input::Question(question) => question,
                _ => bail!("question must not be empty or an exit command"),
            };

            let state = session.ask(&question).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state.to_json())?);
            } else {
                println!("{}", Outcome::from_state(&state)?.render());
            }
        }
    }

    Ok(())
}
