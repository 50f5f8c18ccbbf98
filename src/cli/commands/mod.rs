mod dashboard;
mod history;
mod init;
mod meals;
mod recommend;
mod settings;
mod weather;

pub use dashboard::cmd_dashboard;
pub use history::cmd_history;
pub use init::cmd_init;
pub use meals::{
    MealChanges, cmd_add_meal, cmd_delete_meal, cmd_edit_meal, cmd_meal_names, cmd_rate_meal,
};
pub use recommend::{RecommendArgs, cmd_recommend};
pub use settings::{PreferenceEdits, cmd_settings_set, cmd_settings_show};
pub use weather::cmd_weather;
