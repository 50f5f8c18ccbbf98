use crate::pages::SettingsPage;
use crate::state::Session;

pub struct PreferenceEdits {
    pub dietary: Vec<String>,
    pub cuisines: Vec<String>,
    pub dislike: Vec<String>,
    pub undislike: Vec<String>,
    pub location: Option<String>,
}

pub async fn cmd_settings_show(session: &Session) -> anyhow::Result<()> {
    let mut page = SettingsPage::new(session);
    let _ = page.load().await;
    println!("{}", page.render());
    Ok(())
}

pub async fn cmd_settings_set(session: &Session, edits: PreferenceEdits) -> anyhow::Result<()> {
    let mut page = SettingsPage::new(session);
    if page.load().await.is_err() {
        println!("{}", page.render());
        return Ok(());
    }

    let form = page.form_mut();
    for tag in &edits.dietary {
        form.toggle_dietary(tag);
    }
    for cuisine in &edits.cuisines {
        form.toggle_cuisine(cuisine);
    }
    for ingredient in &edits.dislike {
        if !form.add_ingredient(ingredient) {
            println!("Skipping '{ingredient}': blank or already listed");
        }
    }
    for ingredient in &edits.undislike {
        form.remove_ingredient(ingredient);
    }
    if let Some(location) = edits.location {
        form.location_name = location;
    }

    match page.submit().await {
        Ok(_) => {
            println!("✓ Preferences saved");
            println!("{}", page.render());
        }
        Err(e) => println!("✗ {e}"),
    }
    Ok(())
}
