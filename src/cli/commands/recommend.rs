use chrono::NaiveDate;

use crate::domain::MealType;
use crate::pages::RecommendationsPage;
use crate::render::dates::format_with_weekday;
use crate::state::Session;

pub struct RecommendArgs {
    pub meal_type: MealType,
    pub date: Option<NaiveDate>,
    pub refresh: bool,
    /// 1-based, as printed.
    pub accept: Option<usize>,
}

pub async fn cmd_recommend(
    session: &Session,
    today: NaiveDate,
    args: RecommendArgs,
) -> anyhow::Result<()> {
    let mut page = RecommendationsPage::new(session, today);
    page.select_meal_type(args.meal_type);
    if let Some(date) = args.date {
        page.select_date(date);
    }

    let loaded = if args.refresh {
        page.refresh().await
    } else {
        page.load().await
    };
    if loaded.is_err() {
        println!("{}", page.render());
        return Ok(());
    }

    let Some(number) = args.accept else {
        println!("{}", page.render());
        println!("\nAccept one with: mealdeck recommend --accept N");
        return Ok(());
    };

    match page.accept(number.saturating_sub(1)).await {
        Ok((meal, next)) => {
            println!(
                "✓ Logged {} for {} on {}",
                meal.name,
                meal.meal_type.label(),
                format_with_weekday(meal.date)
            );
            println!("  See it with: mealdeck {next} --date {}", meal.date);
        }
        Err(e) => println!("✗ {e}"),
    }
    Ok(())
}
