use chrono::NaiveDate;

use crate::pages::Dashboard;
use crate::state::Session;

pub async fn cmd_dashboard(
    session: &Session,
    today: NaiveDate,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new(session, today);
    if let Some(date) = date {
        dashboard.select_date(date);
    }

    // Failures land in the banner, which render prints.
    let _ = dashboard.load().await;
    println!("{}", dashboard.render());
    Ok(())
}
