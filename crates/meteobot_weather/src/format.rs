//! Rendering weather data into user-facing reply text.
//!
//! Pure transformation, no I/O. Output is Russian-language markdown,
//! matching the provider's `lang=ru` condition descriptions.

use crate::{CurrentWeather, ForecastSample};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Weekday};

/// Hard cap on an outbound chat message.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Replies render times in Moscow local time regardless of the city.
const MSK_OFFSET_SECS: i32 = 3 * 3600;

/// 16-point compass rose, clockwise from north.
const WIND_DIRECTIONS: [&str; 16] = [
    "С", "ССВ", "СВ", "ВСВ", "В", "ВЮВ", "ЮВ", "ЮЮВ", "Ю", "ЮЮЗ", "ЮЗ", "ЗЮЗ", "З", "ЗСЗ", "СЗ",
    "ССЗ",
];

/// Placeholder for data the provider did not supply.
const UNAVAILABLE: &str = "н/д";

/// How many calendar days the forecast section covers.
const FORECAST_DAYS: usize = 3;

/// Map wind degrees onto the 16-point compass rose.
///
/// Zero degrees is ambiguous between "calm" and "due north" in provider
/// data, so both zero and absent render as unavailable.
pub fn wind_direction(degrees: Option<f64>) -> &'static str {
    match degrees {
        None => UNAVAILABLE,
        Some(deg) if deg == 0.0 => UNAVAILABLE,
        Some(deg) => {
            let index = (deg / 22.5).round() as usize % 16;
            WIND_DIRECTIONS[index]
        }
    }
}

/// Map a provider icon code onto an emoji glyph.
///
/// Closed table; unknown codes get a default glyph, never an error.
pub fn weather_icon(code: &str) -> &'static str {
    match code {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" => "☁️",
        "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" => "🌧️",
        "10d" => "🌦️",
        "10n" => "🌧️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => "🌤️",
    }
}

/// Render a full weather report: current conditions plus the short-range
/// forecast.
pub fn format_report(current: &CurrentWeather, forecast: &[ForecastSample]) -> String {
    let mut message = format_current(current);

    let daily = daily_forecast(forecast);
    if !daily.is_empty() {
        message.push_str("\n📅 **Прогноз на ближайшие дни:**\n");
        message.push_str(&daily);
    }

    truncate_reply(message, MAX_MESSAGE_LEN)
}

/// Render the current-conditions block, fixed section order.
fn format_current(current: &CurrentWeather) -> String {
    let condition = current.weather().first();
    let icon = condition.map(|c| weather_icon(&c.icon)).unwrap_or("🌤️");
    let description = condition.map(|c| c.description.as_str()).unwrap_or(UNAVAILABLE);
    let country = current.sys().country().as_deref().unwrap_or(UNAVAILABLE);

    let mut message = format!(
        "{} **Погода в {}, {}**\n\n",
        icon,
        current.name(),
        country
    );
    message.push_str(&format!(
        "🌡️ **Температура:** {}°C (ощущается как {}°C)\n",
        current.main().temp().round(),
        current.main().feels_like().round()
    ));
    message.push_str(&format!("☁️ **Описание:** {}\n", description));
    message.push_str(&format!("💧 **Влажность:** {}%\n", current.main().humidity()));
    message.push_str(&format!("🌪️ **Давление:** {} гПа\n", current.main().pressure()));
    message.push_str(&format!(
        "💨 **Ветер:** {} м/с, {}\n",
        current.wind().speed,
        wind_direction(current.wind().deg)
    ));

    let visibility = match current.visibility() {
        Some(meters) => format!("{}", (*meters as f64 / 1000.0).round()),
        None => UNAVAILABLE.to_string(),
    };
    message.push_str(&format!("👁️ **Видимость:** {} км\n", visibility));

    if let Some(clouds) = current.clouds() {
        message.push_str(&format!("☁️ **Облачность:** {}%\n", clouds.all));
    }
    if let Some(sunrise) = current.sys().sunrise() {
        message.push_str(&format!("🌅 **Восход:** {}\n", format_time(*sunrise)));
    }
    if let Some(sunset) = current.sys().sunset() {
        message.push_str(&format!("🌇 **Закат:** {}\n", format_time(*sunset)));
    }

    message
}

/// Summarize the first three distinct calendar days of forecast samples.
///
/// Samples are grouped by local date; per day, min/max over all of that
/// day's samples, with the icon taken from the first sample encountered
/// for the date (not a majority vote).
pub fn daily_forecast(samples: &[ForecastSample]) -> String {
    struct DayAgg {
        date: NaiveDate,
        min: f64,
        max: f64,
        icon: String,
    }

    let mut days: Vec<DayAgg> = Vec::new();
    for sample in samples {
        let Some(local) = local_time(*sample.dt()) else {
            continue;
        };
        let date = local.date_naive();
        let temp = sample.main().temp;

        match days.iter_mut().find(|d| d.date == date) {
            Some(day) => {
                day.min = day.min.min(temp);
                day.max = day.max.max(temp);
            }
            None => {
                let icon = sample
                    .weather()
                    .first()
                    .map(|c| weather_icon(&c.icon))
                    .unwrap_or("🌤️")
                    .to_string();
                days.push(DayAgg {
                    date,
                    min: temp,
                    max: temp,
                    icon,
                });
            }
        }
    }

    days.iter()
        .take(FORECAST_DAYS)
        .map(|day| {
            format!(
                "{} **{}:** {}°...{}°C\n",
                day.icon,
                weekday_short(day.date.weekday()),
                day.min.round(),
                day.max.round()
            )
        })
        .collect()
}

/// Clamp a reply to the platform maximum, marking truncation.
pub fn truncate_reply(message: String, max_len: usize) -> String {
    if message.chars().count() <= max_len {
        return message;
    }
    let mut truncated: String = message.chars().take(max_len.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

fn local_time(timestamp: i64) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(MSK_OFFSET_SECS)?;
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&offset))
}

fn format_time(timestamp: i64) -> String {
    local_time(timestamp)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

fn weekday_short(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "пн",
        Weekday::Tue => "вт",
        Weekday::Wed => "ср",
        Weekday::Thu => "чт",
        Weekday::Fri => "пт",
        Weekday::Sat => "сб",
        Weekday::Sun => "вс",
    }
}
