use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use shelfmate_client::{ReadingSessionTracker, Shelfmate, TrackerState};
use shelfmate_types::{ReadingSession, ReadingStatus};

pub async fn search_books(app: &Shelfmate, query: &str, page: u32) -> Result<()> {
    let results = app.books().search(query, page).await?;
    if results.items.is_empty() {
        println!("{}", "No books found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Authors", "Pages", "Rating"]);
    for book in &results.items {
        table.add_row(vec![
            Cell::new(&book.id),
            Cell::new(&book.title),
            Cell::new(book.author_line()),
            Cell::new(book.page_count.map_or_else(|| "-".to_string(), |p| p.to_string())),
            Cell::new(
                book.average_rating.map_or_else(|| "-".to_string(), |r| format!("{r:.1}")),
            ),
        ]);
    }

    println!("{table}");
    if results.has_more() {
        println!("\nMore results: --page {}", results.page + 1);
    }
    Ok(())
}

pub async fn list_library(app: &Shelfmate, status: Option<&str>, json: bool) -> Result<()> {
    let status = status
        .map(|s| ReadingStatus::from_string(s).with_context(|| format!("Unknown status '{s}'")))
        .transpose()?;
    let entries = app.profile().library(status).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("{}", "Your shelf is empty.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Status", "Progress", "Rating"]);
    for entry in &entries {
        let status = match entry.status {
            ReadingStatus::Reading => Cell::new(entry.status).fg(Color::Cyan),
            ReadingStatus::Finished => Cell::new(entry.status).fg(Color::Green),
            ReadingStatus::Abandoned => Cell::new(entry.status).fg(Color::DarkGrey),
            ReadingStatus::WantToRead => Cell::new(entry.status),
        };
        table.add_row(vec![
            Cell::new(&entry.book.id),
            Cell::new(&entry.book.title),
            status,
            Cell::new(format!("{:.0}%", entry.progress_percent())),
            Cell::new(entry.rating.map_or_else(|| "-".to_string(), |r| format!("{r}/5"))),
        ]);
    }

    println!("{table}");
    println!("\n{} books on your shelf", entries.len());
    Ok(())
}

pub async fn start_session(app: &Shelfmate, book_id: &str, page: u32) -> Result<()> {
    let mut tracker = app.session_tracker().await?;
    let session = tracker.start(book_id, page).await?;
    println!("{} Reading {} from page {}", "▶".green(), session.book_id.bold(), session.start_page);
    Ok(())
}

pub async fn pause_session(app: &Shelfmate) -> Result<()> {
    let mut tracker = app.session_tracker().await?;
    let session = tracker.pause().await?;
    println!("{} Paused after {}", "⏸".yellow(), format_duration(session.active_seconds));
    Ok(())
}

pub async fn resume_session(app: &Shelfmate) -> Result<()> {
    let mut tracker = app.session_tracker().await?;
    let session = tracker.resume().await?;
    println!("{} Resumed {}", "▶".green(), session.book_id.bold());
    Ok(())
}

pub async fn finish_session(app: &Shelfmate, end_page: u32) -> Result<()> {
    let mut tracker = app.session_tracker().await?;
    let session = tracker.finish(end_page).await?;
    println!("{} {}", "✓".green(), summarize(&session));

    // Upload right away when online; the queue keeps the session otherwise.
    sync_quietly(app, &mut tracker).await;
    Ok(())
}

pub async fn discard_session(app: &Shelfmate) -> Result<()> {
    let mut tracker = app.session_tracker().await?;
    tracker.discard().await?;
    println!("{} Session discarded", "✓".green());
    Ok(())
}

pub async fn session_status(app: &Shelfmate) -> Result<()> {
    let tracker = app.session_tracker().await?;
    match tracker.state() {
        TrackerState::Idle => println!("No session in progress."),
        TrackerState::Active { session, .. } => println!(
            "{} Reading {} since page {} ({})",
            "▶".green(),
            session.book_id.bold(),
            session.start_page,
            format_duration(tracker.elapsed_seconds())
        ),
        TrackerState::Paused { session } => println!(
            "{} Paused on {} ({})",
            "⏸".yellow(),
            session.book_id.bold(),
            format_duration(session.active_seconds)
        ),
    }

    let pending = tracker.pending();
    if pending > 0 {
        println!("{} change(s) waiting to upload. Run `shelfmate session sync`.", pending);
    }
    Ok(())
}

pub async fn sync_sessions(app: &Shelfmate) -> Result<()> {
    let mut tracker = app.session_tracker().await?;
    if tracker.pending() == 0 {
        println!("Nothing to sync.");
        return Ok(());
    }

    let report = tracker.sync(&app.sessions()).await?;
    println!(
        "{} {} sent, {} dropped, {} remaining",
        "✓".green(),
        report.sent,
        report.dropped,
        report.remaining
    );
    if let Some(failure) = report.halted_by {
        println!("{} Stopped early: {}", "!".yellow(), failure.message());
        if failure.requires_login() {
            println!("Sign in again with `shelfmate login <email>`.");
        }
    }
    Ok(())
}

async fn sync_quietly(app: &Shelfmate, tracker: &mut ReadingSessionTracker) {
    match tracker.sync(&app.sessions()).await {
        Ok(report) if report.remaining == 0 => println!("  Synced."),
        Ok(report) => println!("  {} change(s) queued for later.", report.remaining),
        Err(e) => tracing::warn!("Could not sync sessions: {}", e),
    }
}

fn summarize(session: &ReadingSession) -> String {
    let mut line = format!(
        "Read {} pages in {}",
        session.pages_read(),
        format_duration(session.active_seconds)
    );
    if let Some(pace) = session.pages_per_hour() {
        line.push_str(&format!(" ({pace:.0} pages/h)"));
    }
    line
}

fn format_duration(seconds: u64) -> String {
    let (hours, minutes, secs) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m {secs:02}s")
    }
}
