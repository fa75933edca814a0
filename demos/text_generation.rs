use chat_completion::{ChatCompletion, GenerationConfig, Message, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let client = ChatCompletion::from_env()?;

    let messages = vec![
        Message::system("You are a concise, upbeat assistant."),
        Message::user("Share a fun fact about Rust programming."),
    ];

    let text = client
        .generate_completion(&messages, GenerationConfig::default())
        .await?;

    println!("Assistant ({}):\n{}", client.model(), text);

    Ok(())
}
