use chat_completion::{ChatCompletion, GenerationConfig, Message, telemetry};
use futures::StreamExt;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let client = ChatCompletion::from_env()?;

    let messages = vec![
        Message::system("You are a helpful assistant that provides detailed, thoughtful answers."),
        Message::user("Explain the process of photosynthesis step by step."),
    ];

    let settings = GenerationConfig::new().temperature(0.7).max_tokens(1024);
    let mut stream = client.stream_completion(&messages, settings).await?;

    while let Some(fragment) = stream.next().await {
        match fragment {
            Ok(text) => {
                print!("{text}");
                io::stdout().flush()?;
            }
            Err(e) => {
                eprintln!("\nError during streaming: {e}");
                break;
            }
        }
    }

    println!();

    Ok(())
}
