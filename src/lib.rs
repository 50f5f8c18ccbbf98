pub mod cache;
pub mod cli;
pub mod clients;
pub mod config;
pub mod domain;
pub mod forms;
pub mod models;
pub mod observability;
pub mod pages;
pub mod render;
pub mod services;
pub mod state;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Commands, MealChanges, PreferenceEdits, RecommendArgs, SettingsCommands, cmd_add_meal,
    cmd_dashboard, cmd_delete_meal, cmd_edit_meal, cmd_history, cmd_init, cmd_meal_names,
    cmd_rate_meal, cmd_recommend, cmd_settings_set, cmd_settings_show, cmd_weather,
};
pub use config::Config;
pub use state::Session;

fn init_logging(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    // Logs go to stderr; stdout carries the rendered pages.
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(env_filter);
    if config.general.json_logs {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&config);
    let metrics = observability::install_recorder(&config.observability)?;

    let command = cli.command.unwrap_or(Commands::Dashboard { date: None });
    if matches!(command, Commands::Init) {
        return cmd_init();
    }

    config.validate()?;
    let session = Session::new(config).context("Failed to start session")?;
    info!(base_url = %session.config.api.base_url, "Session ready");
    let today = Local::now().date_naive();

    let result = match command {
        Commands::Dashboard { date } => cmd_dashboard(&session, today, date).await,

        Commands::Add {
            name,
            meal_type,
            date,
            description,
        } => {
            let name = name.join(" ");
            let date = date.unwrap_or(today);
            cmd_add_meal(&session, &name, meal_type, date, description.as_deref()).await
        }

        Commands::Edit {
            id,
            name,
            description,
            meal_type,
            date,
        } => {
            let changes = MealChanges {
                name,
                description,
                meal_type,
                date,
            };
            cmd_edit_meal(&session, &id, changes).await
        }

        Commands::Delete { id, yes } => cmd_delete_meal(&session, &id, yes).await,

        Commands::Rate { id, stars, comment } => {
            cmd_rate_meal(&session, &id, stars, comment.as_deref()).await
        }

        Commands::History { meal_type, search } => {
            cmd_history(&session, meal_type, search.as_deref()).await
        }

        Commands::Recommend {
            meal_type,
            date,
            refresh,
            accept,
        } => {
            let args = RecommendArgs {
                meal_type,
                date,
                refresh,
                accept,
            };
            cmd_recommend(&session, today, args).await
        }

        Commands::Names { query } => cmd_meal_names(&session, &query.join(" ")).await,

        Commands::Settings { command } => match command {
            SettingsCommands::Show => cmd_settings_show(&session).await,
            SettingsCommands::Set {
                dietary,
                cuisines,
                dislike,
                undislike,
                location,
            } => {
                let edits = PreferenceEdits {
                    dietary,
                    cuisines,
                    dislike,
                    undislike,
                    location,
                };
                cmd_settings_set(&session, edits).await
            }
        },

        Commands::Weather { lat, lng } => cmd_weather(&session, lat, lng).await,

        Commands::Init => cmd_init(),
    };

    if let Some(handle) = &metrics {
        observability::report(handle);
    }
    result
}
