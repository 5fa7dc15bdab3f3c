//! Basic OpenAI client usage example

use openai_client::{ChatRequest, Message, OpenAIClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize from environment
    let client = OpenAIClient::from_env()?;

    // Simple chat completion
    println!("=== Chat Completion ===");
    let response = client
        .chat_completion(
            ChatRequest::new("gpt-4o-mini")
                .message(Message::system("You are a helpful assistant."))
                .message(Message::user("What is Songkran in one sentence?"))
                .temperature(0.7)
                .token_limit(100),
        )
        .await?;

    println!("Response: {}", response.content);

    // JSON mode
    println!("\n=== JSON Mode ===");
    let response = client
        .chat_completion(
            ChatRequest::new("gpt-4o-mini")
                .message(Message::system(
                    "Reply with a JSON object {\"city\": string, \"country\": string}.",
                ))
                .message(Message::user("Where is Chiang Mai?"))
                .json_mode(),
        )
        .await?;

    let parsed: serde_json::Value = serde_json::from_str(&response.content)?;
    println!("City: {}", parsed["city"]);
    println!("Country: {}", parsed["country"]);

    Ok(())
}
