//! Command-line interface for mealdeck.
//!
//! Every subcommand builds the page it stands for, drives it once and
//! prints the result.

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{MealId, MealType};
use crate::pages::TypeFilter;
use crate::render::dates::parse_cli_date;

/// mealdeck - meal log and recommendations
#[derive(Parser)]
#[command(name = "mealdeck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show one day's meals, progress and weather
    #[command(alias = "d")]
    Dashboard {
        /// Day to show (yyyy-mm-dd or dd/mm/yyyy), defaults to today
        #[arg(long, value_parser = parse_cli_date)]
        date: Option<NaiveDate>,
    },

    /// Log a meal
    #[command(alias = "a")]
    Add {
        /// Meal name
        #[arg(required = true)]
        name: Vec<String>,
        /// breakfast, lunch or dinner
        #[arg(long = "type", short)]
        meal_type: MealType,
        #[arg(long, value_parser = parse_cli_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Change a logged meal
    #[command(alias = "e")]
    Edit {
        id: MealId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type", short)]
        meal_type: Option<MealType>,
        #[arg(long, value_parser = parse_cli_date)]
        date: Option<NaiveDate>,
    },

    /// Delete a logged meal
    #[command(alias = "rm")]
    Delete {
        id: MealId,
        /// Skip the confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Rate a meal from 1 to 5
    Rate {
        id: MealId,
        stars: u8,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Show every logged meal, newest first
    #[command(alias = "h")]
    History {
        /// all, breakfast, lunch or dinner
        #[arg(long = "type", short, default_value = "all")]
        meal_type: TypeFilter,
        /// Case-insensitive match on name or description
        #[arg(long)]
        search: Option<String>,
    },

    /// Get meal suggestions
    #[command(alias = "r")]
    Recommend {
        #[arg(long = "type", short, default_value = "breakfast")]
        meal_type: MealType,
        #[arg(long, value_parser = parse_cli_date)]
        date: Option<NaiveDate>,
        /// Ask for a new set
        #[arg(long)]
        refresh: bool,
        /// Log suggestion N as a meal
        #[arg(long, value_name = "N")]
        accept: Option<usize>,
    },

    /// Complete a meal name from history
    Names {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Show or change preferences
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Show current weather
    Weather {
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print stored preferences
    Show,
    /// Change preferences; tags toggle on and off
    Set {
        #[arg(long = "diet", value_name = "TAG")]
        dietary: Vec<String>,
        #[arg(long = "cuisine", value_name = "CUISINE")]
        cuisines: Vec<String>,
        #[arg(long = "dislike", value_name = "INGREDIENT")]
        dislike: Vec<String>,
        #[arg(long = "undislike", value_name = "INGREDIENT")]
        undislike: Vec<String>,
        #[arg(long)]
        location: Option<String>,
    },
}

pub use commands::*;
