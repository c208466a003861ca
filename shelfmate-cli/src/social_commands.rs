use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use shelfmate_client::Shelfmate;
use shelfmate_types::models::NewQuote;

const QUOTE_PREVIEW_CHARS: usize = 60;

pub async fn add_quote(
    app: &Shelfmate,
    book_id: String,
    text: String,
    page: Option<u32>,
    note: Option<String>,
    public: bool,
) -> Result<()> {
    let quote = NewQuote { book_id, text, page, note, is_public: public };
    let saved = app.quotes().create(&quote).await?;
    println!("{} Quote saved ({})", "✓".green(), saved.id);
    Ok(())
}

pub async fn list_quotes(app: &Shelfmate, book_id: Option<&str>, page: u32) -> Result<()> {
    let quotes = app.quotes().list(book_id, page).await?;
    if quotes.items.is_empty() {
        println!("{}", "No quotes yet.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Book", "Page", "Quote", "Likes"]);
    for quote in &quotes.items {
        table.add_row(vec![
            Cell::new(&quote.id),
            Cell::new(&quote.book_id),
            Cell::new(quote.page.map_or_else(|| "-".to_string(), |p| p.to_string())),
            Cell::new(preview(&quote.text)),
            Cell::new(quote.likes_count),
        ]);
    }

    println!("{table}");
    println!("\nPage {} of {} quotes", quotes.page, quotes.total);
    Ok(())
}

pub async fn show_feed(app: &Shelfmate, page: u32, json: bool) -> Result<()> {
    let feed = app.feed().page(page).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
        return Ok(());
    }
    if feed.items.is_empty() {
        println!("{}", "Nothing new in your feed.".yellow());
        return Ok(());
    }

    for item in &feed.items {
        let when = item.created_at.format("%Y-%m-%d %H:%M").to_string();
        println!("{}  {}", when.dimmed(), item.headline());
    }
    if feed.has_more() {
        println!("\nOlder: --page {}", feed.page + 1);
    }
    Ok(())
}

/// First line of `text`, cut to a table-friendly width.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= QUOTE_PREVIEW_CHARS && !text.trim().contains('\n') {
        return line.to_string();
    }
    let cut: String = line.chars().take(QUOTE_PREVIEW_CHARS - 1).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("Short"), "Short");
        assert_eq!(preview("First line\nsecond"), "First line…");

        let long = "x".repeat(100);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), QUOTE_PREVIEW_CHARS);
        assert!(shown.ends_with('…'));
    }
}
