use serde::Deserialize;

use super::{ApiClient, ApiError};
use crate::models::{Weather, WeatherQuery};

#[derive(Deserialize)]
struct WeatherBody {
    weather: Weather,
}

impl ApiClient {
    pub async fn get_weather(&self, query: WeatherQuery) -> Result<Weather, ApiError> {
        let body: WeatherBody = self.get(&["api", "weather"], &query.to_params()).await?;
        Ok(body.weather)
    }
}
