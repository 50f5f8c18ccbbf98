use crate::models::WeatherQuery;
use crate::render::weather_widget;
use crate::state::Session;

pub async fn cmd_weather(session: &Session, lat: Option<f64>, lng: Option<f64>) -> anyhow::Result<()> {
    // Without coordinates the stored location is used, then the server default.
    let query = if lat.is_some() {
        WeatherQuery { lat, lng }
    } else {
        session
            .preferences
            .get()
            .await
            .map(|p| WeatherQuery {
                lat: p.location_lat,
                lng: p.location_lng,
            })
            .unwrap_or_default()
    };

    match session.weather.current(query).await {
        Ok(weather) => println!("{}", weather_widget(&weather)),
        Err(e) => println!("✗ Weather unavailable: {e}"),
    }
    Ok(())
}
