use anyhow::Result;
use scholia_llm::{GeminiClient, GenerativeModel};

#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("GEMINI_API_KEY")?;
    let client = GeminiClient::new(api_key)?;

    let reply = client
        .generate("What is the capital of France? Answer in one word.", None)
        .await?;

    println!("Response: {}", reply.text);

    if let Some(usage) = reply.usage {
        println!("Tokens used: {}", usage.total_tokens);
    }

    Ok(())
}
