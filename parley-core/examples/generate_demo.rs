//! Minimal end-to-end generation demo.
//!
//! Loads a model table, sends one prompt, and prints the normalized
//! assistant turn with its usage and cost.
//!
//! Run with: cargo run --example generate_demo -- models.yaml gpt-4o "say hi"

use anyhow::{anyhow, Context, Result};
use parley_core::client::LlmClient;
use parley_core::config;
use parley_core::protocol::{ChatRequest, Message};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley_core=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let table_path = args
        .next()
        .ok_or_else(|| anyhow!("usage: generate_demo <models.yaml> <model> <prompt>"))?;
    let model = args.next().ok_or_else(|| anyhow!("missing model id"))?;
    let prompt = args.next().ok_or_else(|| anyhow!("missing prompt"))?;

    let table = config::load_from_yaml(&table_path)
        .with_context(|| format!("loading model table from {table_path}"))?;
    println!("Loaded {} model(s) from {table_path}", table.models.len());

    let client = LlmClient::new(table)?;
    let request = ChatRequest::new(
        &model,
        vec![
            Message::system("You are a concise assistant."),
            Message::user(&prompt),
        ],
    );

    let message = client
        .generate(&request)
        .await
        .with_context(|| format!("generating with {model}"))?;

    println!("\n=== Assistant ===");
    println!("{}", message.content.as_deref().unwrap_or("<no text>"));
    if let Some(reasoning) = &message.reasoning {
        println!("\n=== Reasoning ===\n{reasoning}");
    }
    if let Some(calls) = &message.tool_calls {
        println!("\n=== Tool calls ===");
        for call in calls {
            println!(
                "  {} {}",
                call.name,
                serde_json::Value::Object(call.arguments.clone())
            );
        }
    }
    if let Some(usage) = &message.usage {
        println!(
            "\nTokens: {} prompt / {} completion",
            usage.prompt_tokens, usage.completion_tokens
        );
    }
    if let Some(cost) = message.cost {
        println!("Cost: ${cost:.6}");
    }

    Ok(())
}
