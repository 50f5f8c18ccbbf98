use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    /// Degrees Celsius.
    pub temp: f64,

    pub condition: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub humidity: f64,

    #[serde(default)]
    pub wind_speed: f64,

    #[serde(default)]
    pub location: String,

    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl WeatherQuery {
    pub(crate) fn to_params(self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(lat) = self.lat {
            params.push(("lat", lat.to_string()));
        }
        if let Some(lng) = self.lng {
            params.push(("lng", lng.to_string()));
        }
        params
    }
}
