use std::io::{BufRead as _, Write as _};

use syllendar_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    syllendar_client::init_observability();

    let client = SyllabusClient::from_env()?;
    let mut session = client.chat_session();
    println!("{}", session.transcript()[0].text);
    println!("(type a message, 'download' to fetch a pending calendar, or 'quit')");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim();
        match line {
            "quit" => break,
            "download" => match session.download_pending_calendar().await? {
                Some(file) => {
                    std::fs::write(&file.file_name, &file.bytes).map_err(|e| {
                        ClientError::config(format!("failed to write calendar: {e}"))
                    })?;
                    println!("wrote {}", file.file_name);
                }
                None => println!("nothing to download yet"),
            },
            _ => {
                session.send_message(line).await;
                if let Some(turn) = session.transcript().last() {
                    println!("{}", turn.text);
                }
                if session.pending_calendar().is_some() {
                    println!("(a calendar is ready, type 'download')");
                }
            }
        }
    }
    Ok(())
}
