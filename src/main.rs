use anyhow::Result;
use atlas_chat::chat::ChatContext;
use atlas_chat::llm::{ChatMessage, OpenAiClient, Role};
use atlas_chat::AtlasConfig;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TOOL_RESULT_PREVIEW: usize = 500;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atlas_chat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load .env for local dev (if present)
    if dotenvy::dotenv().is_ok() {
        tracing::info!("Loaded .env");
    }

    tracing::info!("Starting Atlas Chat");

    let config = AtlasConfig::from_env()?;
    tracing::info!(
        "Configuration loaded: server={}, model={}",
        config.mcp.server_url,
        config.llm.model
    );

    let llm = OpenAiClient::new(config.llm.clone())?;
    let mut context = ChatContext::connect(&config, Box::new(llm)).await?;

    println!(
        "Connected. {} tools available.",
        context.function_schemas().len()
    );
    for schema in context.function_schemas() {
        tracing::info!("  - {}: {}", schema.function.name, schema.function.description);
    }
    println!("Type a message, /clear to reset the conversation, /quit to exit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break, // EOF
            Ok(_) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                match input {
                    "/quit" | "/exit" => break,
                    "/clear" => {
                        context.clear();
                        println!("Conversation cleared.");
                        continue;
                    }
                    _ => {}
                }

                let before = context.transcript().len();
                match context.process_message(input).await {
                    Ok(transcript) => render_new_entries(&transcript[before..]),
                    Err(e) => {
                        // A failed turn must not take the process down.
                        tracing::error!("Turn failed: {}", e);
                        println!("Something went wrong: {e}");
                    }
                }
            }
            Err(e) => {
                tracing::error!("Error reading from stdin: {}", e);
                break;
            }
        }
    }

    context.close();
    tracing::info!("Atlas Chat shutting down");
    Ok(())
}

fn render_new_entries(entries: &[ChatMessage]) {
    for message in entries {
        match message.role {
            Role::Assistant => {
                if let Some(calls) = &message.tool_calls {
                    for call in calls {
                        println!("-> calling tool: {}", call.function.name);
                    }
                }
                if let Some(content) = &message.content {
                    if !content.is_empty() {
                        println!("{content}");
                    }
                }
            }
            Role::Tool => {
                let name = message.name.as_deref().unwrap_or("tool");
                let content = message.content.as_deref().unwrap_or_default();
                let preview: String = content.chars().take(TOOL_RESULT_PREVIEW).collect();
                let ellipsis = if content.chars().count() > TOOL_RESULT_PREVIEW {
                    "..."
                } else {
                    ""
                };
                println!("[{name}] {preview}{ellipsis}");
            }
            Role::User | Role::System => {}
        }
    }
}
