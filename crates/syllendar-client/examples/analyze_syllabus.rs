use std::io::Write as _;

use syllendar_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    syllendar_client::init_observability();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "syllabus.pdf".to_string());
    let bytes = std::fs::read(&path)
        .map_err(|e| ClientError::config(format!("failed to read {path}: {e}")))?;
    let file = match path.rsplit('.').next() {
        Some("png") => DocumentFile::new(&path, "image/png", bytes),
        Some("jpg") | Some("jpeg") => DocumentFile::new(&path, "image/jpeg", bytes),
        _ => DocumentFile::pdf(&path, bytes),
    };

    let client = SyllabusClient::from_env()?;
    let hooks = ProgressHooks::new()
        .on_status(|message| println!("{message}"))
        .on_progress(|_| {
            print!(".");
            let _ = std::io::stdout().flush();
        });

    let schedule = client.analyze_file(&file, hooks).await?;
    println!();
    println!("{} ({})", schedule.course_name, schedule.course_code);
    for event in &schedule.events {
        println!("  {}: {} to {}", event.title, event.start_time, event.end_time);
    }

    let calendar = client.generate_calendar(&schedule).await?;
    std::fs::write(&calendar.file_name, &calendar.bytes)
        .map_err(|e| ClientError::config(format!("failed to write calendar: {e}")))?;
    println!("wrote {}", calendar.file_name);
    Ok(())
}
