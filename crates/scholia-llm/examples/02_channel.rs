use anyhow::Result;
use scholia_llm::{ChatChannel, GeminiClient, GenerativeModel, HistoryEntry};

#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("GEMINI_API_KEY")?;
    let client = GeminiClient::new(api_key)?;

    // Seed the channel as if one exchange had already happened
    let channel = client.create_channel(vec![
        HistoryEntry::user("Reply with JSON only. Say hello."),
        HistoryEntry::model(r#"{"greeting": "hello"}"#),
    ]);

    let reply = channel.send("Now say goodbye.").await?;
    println!("Response: {}", reply.text);

    Ok(())
}
