use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use shelfmate_client::Shelfmate;

pub async fn list_items(app: &Shelfmate) -> Result<()> {
    let items = app.shop().items().await?;
    let me = app.profile().me().await?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Category", "Price"]);
    for item in &items {
        let price = if item.owned {
            Cell::new("owned").fg(Color::DarkGrey)
        } else if item.affordable_by(&me) {
            Cell::new(format!("{} coins", item.price_coins)).fg(Color::Green)
        } else {
            Cell::new(format!("{} coins", item.price_coins)).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&item.id),
            Cell::new(&item.name),
            Cell::new(format!("{:?}", item.category)),
            price,
        ]);
    }

    println!("{table}");
    println!("\nBalance: {} coins", me.coins);
    Ok(())
}

pub async fn buy_item(app: &Shelfmate, item_id: &str) -> Result<()> {
    let items = app.shop().items().await?;
    let item = items
        .iter()
        .find(|i| i.id == item_id)
        .with_context(|| format!("No shop item '{item_id}'"))?;
    let me = app.profile().me().await?;

    let purchase = app.shop().purchase(item, &me).await?;
    println!(
        "{} Bought {} for {} coins, {} left",
        "✓".green(),
        item.name.green(),
        purchase.coins_spent,
        purchase.remaining_coins
    );
    Ok(())
}

pub async fn subscription_status(app: &Shelfmate) -> Result<()> {
    let Some(subscription) = app.subscriptions().current().await? else {
        println!("{}", "No subscription. See `shelfmate subscription plans`.".yellow());
        return Ok(());
    };

    let label = if subscription.is_premium() { "Premium".green() } else { "Inactive".red() };
    let status = format!("{:?}", subscription.status).to_lowercase();
    println!("{label} ({status}, plan {})", subscription.plan_id);
    if let Some(end) = subscription.current_period_end {
        let verb = if subscription.cancel_at_period_end { "Ends" } else { "Renews" };
        println!("  {verb} on {}", end.format("%Y-%m-%d"));
    }
    Ok(())
}

pub async fn list_plans(app: &Shelfmate) -> Result<()> {
    let plans = app.subscriptions().plans().await?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Plan", "Price", "Per month", "Features"]);
    for plan in &plans {
        table.add_row(vec![
            Cell::new(&plan.id),
            Cell::new(&plan.name),
            Cell::new(format!("{} {} / {:?}", cents(plan.price_cents), plan.currency, plan.interval)),
            Cell::new(cents(plan.monthly_price_cents())),
            Cell::new(plan.features.join("\n")),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn cents(amount: u32) -> String {
    format!("{}.{:02}", amount / 100, amount % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents() {
        assert_eq!(cents(0), "0.00");
        assert_eq!(cents(499), "4.99");
        assert_eq!(cents(12000), "120.00");
    }
}
