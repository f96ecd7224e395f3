use std::env;

use anyhow::Result;

use crate::chat::TranscriptStore;

pub fn run(username: &str) -> Result<()> {
    let storage_path = env::var("TONY_STORAGE_PATH").unwrap_or("./".to_string());
    let store = TranscriptStore::new(&storage_path);
    let transcript = store.load(username);

    if transcript.is_empty() {
        println!("No saved history for {}", username);
        return Ok(());
    }
    for message in transcript.iter() {
        println!("[{}] {}", message.role.as_str(), message.content);
    }

    Ok(())
}
