use chrono::NaiveDate;

use crate::cache::Record;
use crate::domain::{MealId, MealType};
use crate::models::Meal;
use crate::pages::MealActions;
use crate::render::{dates::format_with_weekday, meal_card};
use crate::services::meal_names::MIN_QUERY_CHARS;
use crate::state::Session;

pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub meal_type: Option<MealType>,
    pub date: Option<NaiveDate>,
}

async fn find_meal(session: &Session, id: &MealId) -> Option<Meal> {
    match session.meals.detail(id).await {
        Ok(Some(meal)) => Some(meal),
        Ok(None) => {
            println!("Meal ID is required");
            None
        }
        Err(e) => {
            println!("✗ Meal {id}: {e}");
            None
        }
    }
}

pub async fn cmd_add_meal(
    session: &Session,
    name: &str,
    meal_type: MealType,
    date: NaiveDate,
    description: Option<&str>,
) -> anyhow::Result<()> {
    let mut actions = MealActions::new(session);
    actions.open_add(date, meal_type);
    let form = actions.meal_form_mut();
    form.name = name.to_string();
    form.description = description.unwrap_or_default().to_string();

    match actions.submit_meal().await {
        Ok(meal) => {
            println!("✓ Logged meal:");
            println!("{}", meal_card(&Record::Committed(meal)));
        }
        Err(e) => println!("✗ Could not log meal: {e}"),
    }
    Ok(())
}

pub async fn cmd_edit_meal(session: &Session, id: &MealId, changes: MealChanges) -> anyhow::Result<()> {
    let Some(meal) = find_meal(session, id).await else {
        return Ok(());
    };

    let mut actions = MealActions::new(session);
    actions.open_edit(&Record::Committed(meal))?;
    let form = actions.meal_form_mut();
    if let Some(name) = changes.name {
        form.name = name;
    }
    if let Some(description) = changes.description {
        form.description = description;
    }
    if changes.meal_type.is_some() {
        form.meal_type = changes.meal_type;
    }
    if changes.date.is_some() {
        form.date = changes.date;
    }

    match actions.submit_meal().await {
        Ok(meal) => {
            println!("✓ Saved:");
            println!("{}", meal_card(&Record::Committed(meal)));
        }
        Err(e) => println!("✗ Could not save meal: {e}"),
    }
    Ok(())
}

pub async fn cmd_delete_meal(session: &Session, id: &MealId, yes: bool) -> anyhow::Result<()> {
    let Some(meal) = find_meal(session, id).await else {
        return Ok(());
    };

    let name = meal.name.clone();
    let day = format_with_weekday(meal.date);
    let actions = MealActions::new(session);
    match actions.delete(&Record::Committed(meal), yes).await {
        Ok(Some(message)) => println!("✓ {message}: {name} ({day})"),
        Ok(None) => {
            println!("Delete {name} ({day})?");
            println!("Run again with --yes to confirm.");
        }
        Err(e) => println!("✗ Could not delete meal: {e}"),
    }
    Ok(())
}

pub async fn cmd_rate_meal(
    session: &Session,
    id: &MealId,
    stars: u8,
    comment: Option<&str>,
) -> anyhow::Result<()> {
    let Some(meal) = find_meal(session, id).await else {
        return Ok(());
    };

    let mut actions = MealActions::new(session);
    actions.open_rate(&Record::Committed(meal.clone()))?;
    let form = actions.rating_form_mut();
    form.rating = Some(stars);
    form.comment = comment.unwrap_or_default().to_string();

    if let Err(e) = actions.submit_rating().await {
        println!("✗ Could not save rating: {e}");
        return Ok(());
    }

    let summary = session.ratings.for_meal(&meal.id).await?;
    println!("✓ Rated {} {}★", meal.name, stars);
    println!(
        "  Average ★ {:.1} from {} rating(s)",
        summary.average, summary.count
    );
    Ok(())
}

pub async fn cmd_meal_names(session: &Session, query: &str) -> anyhow::Result<()> {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        println!("Type at least {MIN_QUERY_CHARS} characters.");
        return Ok(());
    }

    let names = session.meal_names.search(query).await?;
    if names.is_empty() {
        println!("No logged meals match '{query}'.");
    }
    for name in names {
        println!("• {name}");
    }
    Ok(())
}
