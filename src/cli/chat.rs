use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::{ChatMessage, ChatSession};
use crate::core::{AppConfig, Credentials};
use crate::openai::AssistantsClient;

/// Prompt for a username and password until a pair matches the
/// credential list. The password is read without echo. EOF aborts
/// startup.
fn login(credentials: &Credentials) -> Result<String> {
    loop {
        print!("Username: ");
        io::stdout().flush()?;
        let mut username = String::new();
        if io::stdin().read_line(&mut username)? == 0 {
            bail!("Login aborted");
        }
        let username = username.trim();

        let password = rpassword::prompt_password("Password: ").context("Login aborted")?;
        let password = password.trim();

        if credentials.verify(username, password) {
            return Ok(username.to_string());
        }
        println!("Incorrect username or password. Try again.");
    }
}

/// Run one turn. Ctrl-C while the assistant is working cancels the
/// wait for that turn instead of killing the process.
async fn send_turn(session: &mut ChatSession, line: &str) -> Result<ChatMessage> {
    let cancel = AtomicBool::new(false);
    let send = session.send(line, &cancel);
    tokio::pin!(send);

    tokio::select! {
        reply = &mut send => reply,
        _ = tokio::signal::ctrl_c() => {
            cancel.store(true, Ordering::SeqCst);
            send.await
        }
    }
}

pub async fn run() -> Result<()> {
    let config = AppConfig::default();
    let credentials = Credentials::load(&config.credentials_path)?;
    let username = login(&credentials)?;

    let client = AssistantsClient::new(&config.api_hostname, &config.api_key);
    let mut session = ChatSession::start(&username, &config, Box::new(client)).await?;

    println!("Hola {}! Ctrl-D ends the session.", session.username());
    for message in session.transcript().iter() {
        println!("[{}] {}", message.role.as_str(), message.content);
    }

    let mut rl = DefaultEditor::new().expect("Editor failed");

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                match send_turn(&mut session, &line).await {
                    Ok(reply) => println!("{}", reply.content),
                    Err(err) => println!("Error: {:#}", err),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
