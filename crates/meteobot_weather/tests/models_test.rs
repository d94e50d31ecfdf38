//! Tests for provider response deserialization.

use meteobot_weather::{CurrentWeather, ForecastResponse};

const CURRENT_JSON: &str = r#"{
    "coord": {"lon": 37.6156, "lat": 55.7522},
    "weather": [{"id": 600, "main": "Snow", "description": "небольшой снег", "icon": "13d"}],
    "main": {"temp": -2.4, "feels_like": -6.7, "temp_min": -3.1, "temp_max": -1.8,
             "pressure": 1012, "humidity": 87},
    "visibility": 8000,
    "wind": {"speed": 4.2, "deg": 90},
    "clouds": {"all": 75},
    "dt": 1700000000,
    "sys": {"country": "RU", "sunrise": 1699935600, "sunset": 1699966800},
    "name": "Москва",
    "cod": 200
}"#;

const FORECAST_JSON: &str = r#"{
    "cod": "200",
    "cnt": 2,
    "list": [
        {"dt": 1700000000,
         "main": {"temp": -1.0, "feels_like": -4.0, "pressure": 1010, "humidity": 80},
         "weather": [{"id": 600, "main": "Snow", "description": "снег", "icon": "13d"}]},
        {"dt": 1700010800,
         "main": {"temp": -3.5, "feels_like": -7.0, "pressure": 1011, "humidity": 85},
         "weather": [{"id": 800, "main": "Clear", "description": "ясно", "icon": "01n"}]}
    ],
    "city": {"name": "Москва", "country": "RU"}
}"#;

#[test]
fn test_current_weather_decodes_provider_fields() {
    let current: CurrentWeather = serde_json::from_str(CURRENT_JSON).unwrap();

    assert_eq!(current.name(), "Москва");
    assert_eq!(current.sys().country().as_deref(), Some("RU"));
    assert_eq!(*current.main().humidity(), 87);
    assert_eq!(current.wind().deg, Some(90.0));
    assert_eq!(*current.visibility(), Some(8000));
    assert_eq!(current.weather()[0].icon, "13d");
}

#[test]
fn test_current_weather_tolerates_missing_optionals() {
    let minimal = r#"{
        "weather": [{"description": "ясно", "icon": "01d"}],
        "main": {"temp": 10.0, "feels_like": 9.0, "pressure": 1015, "humidity": 40},
        "wind": {"speed": 1.5},
        "sys": {},
        "name": "Тестовск"
    }"#;

    let current: CurrentWeather = serde_json::from_str(minimal).unwrap();
    assert_eq!(*current.visibility(), None);
    assert!(current.clouds().is_none());
    assert_eq!(current.wind().deg, None);
    assert!(current.sys().country().is_none());
}

#[test]
fn test_forecast_decodes_sample_list() {
    let forecast: ForecastResponse = serde_json::from_str(FORECAST_JSON).unwrap();

    assert_eq!(forecast.list().len(), 2);
    assert_eq!(*forecast.list()[0].dt(), 1_700_000_000);
    assert_eq!(forecast.list()[1].main().temp, -3.5);
    assert_eq!(forecast.list()[1].weather()[0].icon, "01n");
}
