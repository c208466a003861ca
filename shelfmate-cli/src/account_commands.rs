use anyhow::Result;
use colored::Colorize;
use shelfmate_client::Shelfmate;
use shelfmate_types::models::RegisterRequest;

const PROGRESS_WIDTH: usize = 20;

pub async fn login(app: &Shelfmate, email: &str, password: &str) -> Result<()> {
    let user = app.auth().login(email, password).await?;
    println!("{} Signed in as {}", "✓".green(), user.display_label().green());
    Ok(())
}

pub async fn register(
    app: &Shelfmate,
    email: String,
    username: String,
    password: String,
    display_name: Option<String>,
) -> Result<()> {
    let request = RegisterRequest { email, username, password, display_name };
    let user = app.auth().register(request).await?;
    println!("{} Welcome, {}!", "✓".green(), user.display_label().green());
    Ok(())
}

pub async fn logout(app: &Shelfmate) -> Result<()> {
    app.sign_out().await?;
    println!("{} Signed out", "✓".green());
    Ok(())
}

pub async fn whoami(app: &Shelfmate, json: bool) -> Result<()> {
    if !app.auth().is_signed_in().await? {
        println!("{}", "Not signed in. Run `shelfmate login <email>`.".yellow());
        return Ok(());
    }

    let user = app.profile().me().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("{} (@{})", user.display_label().bold(), user.username);
    println!("  {}", user.email.dimmed());
    println!(
        "  Level {} {} {}/{} exp",
        user.level,
        progress_bar(user.level_progress()),
        user.exp,
        user.exp_for_next_level
    );
    println!(
        "  {} coins, {} day streak, {} books read",
        user.coins, user.streak_days, user.books_read
    );

    match app.profile().stats().await {
        Ok(stats) => {
            let pace = stats
                .pages_per_hour()
                .map_or_else(|| "-".to_string(), |p| format!("{p:.0} pages/h"));
            println!(
                "  {} pages in {} min ({pace}), {} quotes, {} reviews",
                stats.pages_read, stats.minutes_read, stats.quotes_saved, stats.reviews_written
            );
        },
        Err(e) => tracing::debug!("Stats unavailable: {}", e),
    }
    Ok(())
}

fn progress_bar(fraction: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "fraction is clamped to [0, 1]"
    )]
    let filled = (fraction.clamp(0.0, 1.0) * PROGRESS_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled).green(), "-".repeat(PROGRESS_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_bounds() {
        colored::control::set_override(false);
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(PROGRESS_WIDTH)));
        assert_eq!(progress_bar(1.5), format!("[{}]", "#".repeat(PROGRESS_WIDTH)));
        assert_eq!(progress_bar(0.5).matches('#').count(), PROGRESS_WIDTH / 2);
    }
}
