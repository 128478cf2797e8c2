//! Conversion of provider payloads into API responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{
    model::weather::{
        CurrentWeatherDto, CurrentWeatherResponseDto, DailyForecastDto, ForecastResponseDto,
        HourlyForecastDto, LocationDto, TemperatureRangeDto, WeatherConditionDto, WindDto,
    },
    server::model::weather::{OwmCondition, OwmCurrent, OwmForecast, OwmForecastItem},
};

/// Forecast entries shown in the hourly strip (3-hour steps, 24 hours).
pub const HOURLY_ENTRIES: usize = 8;

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn condition(conditions: &[OwmCondition]) -> WeatherConditionDto {
    conditions
        .first()
        .map(|c| WeatherConditionDto {
            main: c.main.clone(),
            description: c.description.clone(),
            icon: c.icon.clone(),
        })
        .unwrap_or_else(|| WeatherConditionDto {
            main: String::new(),
            description: String::new(),
            icon: String::new(),
        })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn location_of_current(data: &OwmCurrent) -> LocationDto {
    LocationDto {
        name: data.name.clone(),
        country: data.sys.country.clone(),
        lat: data.coord.lat,
        lon: data.coord.lon,
    }
}

pub fn location_of_forecast(data: &OwmForecast) -> LocationDto {
    LocationDto {
        name: data.city.name.clone(),
        country: data.city.country.clone(),
        lat: data.city.coord.lat,
        lon: data.city.coord.lon,
    }
}

/// Current conditions with rounded temperatures and visibility in kilometres.
pub fn current(data: &OwmCurrent) -> CurrentWeatherDto {
    CurrentWeatherDto {
        temperature: data.main.temp.round() as i64,
        feels_like: data.main.feels_like.round() as i64,
        humidity: data.main.humidity.round() as i64,
        pressure: data.main.pressure.round() as i64,
        visibility: data.visibility.unwrap_or_default() / 1000.0,
        uv_index: data.uvi.unwrap_or_default(),
        wind: WindDto {
            speed: data.wind.speed,
            direction: data.wind.deg,
        },
        weather: condition(&data.weather),
        sunrise: timestamp(data.sys.sunrise),
        sunset: timestamp(data.sys.sunset),
    }
}

pub fn current_response(data: &OwmCurrent) -> CurrentWeatherResponseDto {
    CurrentWeatherResponseDto {
        location: location_of_current(data),
        current: current(data),
        timestamp: Utc::now(),
    }
}

/// The first [`HOURLY_ENTRIES`] forecast steps.
pub fn hourly(items: &[OwmForecastItem]) -> Vec<HourlyForecastDto> {
    items
        .iter()
        .take(HOURLY_ENTRIES)
        .map(|item| HourlyForecastDto {
            time: timestamp(item.dt),
            temperature: item.main.temp.round() as i64,
            weather: condition(&item.weather),
            humidity: item.main.humidity.round() as i64,
            wind_speed: item.wind.speed,
        })
        .collect()
}

/// Groups forecast steps by the location's local calendar date.
///
/// `utc_offset_secs` is the provider's `city.timezone`. Each day reports the
/// rounded minimum and maximum temperature, the first step's conditions and the
/// rounded mean humidity and wind speed.
pub fn daily(items: &[OwmForecastItem], utc_offset_secs: i32) -> Vec<DailyForecastDto> {
    let offset = Duration::seconds(i64::from(utc_offset_secs));
    let mut days: BTreeMap<NaiveDate, Vec<&OwmForecastItem>> = BTreeMap::new();
    for item in items {
        let local_date = (timestamp(item.dt) + offset).date_naive();
        days.entry(local_date).or_default().push(item);
    }

    days.into_values()
        .filter_map(|steps| {
            let first = steps.first()?;
            let temps: Vec<f64> = steps.iter().map(|s| s.main.temp).collect();
            let humidity: Vec<f64> = steps.iter().map(|s| s.main.humidity).collect();
            let wind: Vec<f64> = steps.iter().map(|s| s.wind.speed).collect();
            let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
            let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            Some(DailyForecastDto {
                date: timestamp(first.dt),
                temperature: TemperatureRangeDto {
                    min: min.round() as i64,
                    max: max.round() as i64,
                },
                weather: condition(&first.weather),
                humidity: mean(&humidity).round() as i64,
                wind_speed: mean(&wind).round() as i64,
            })
        })
        .collect()
}

pub fn forecast_response(data: &OwmForecast) -> ForecastResponseDto {
    ForecastResponseDto {
        location: location_of_forecast(data),
        daily: daily(&data.list, data.city.timezone),
        hourly: hourly(&data.list),
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::weather::{OwmMain, OwmWind};

    fn step(dt: i64, temp: f64, humidity: f64, wind: f64, main: &str) -> OwmForecastItem {
        OwmForecastItem {
            dt,
            main: OwmMain {
                temp,
                feels_like: temp,
                temp_min: temp,
                temp_max: temp,
                humidity,
                pressure: 1010.0,
            },
            weather: vec![OwmCondition {
                main: main.to_string(),
                description: main.to_lowercase(),
                icon: "01d".to_string(),
            }],
            wind: OwmWind {
                speed: wind,
                deg: None,
            },
        }
    }

    // 2024-06-01T00:00:00Z
    const MIDNIGHT_UTC: i64 = 1_717_200_000;
    const HOUR: i64 = 3_600;

    #[test]
    fn groups_days_in_local_time() {
        // 18:00Z and 21:00Z on June 1 fall on June 2 at UTC+7.
        let items = vec![
            step(MIDNIGHT_UTC + 15 * HOUR, 30.4, 70.0, 2.0, "Clouds"),
            step(MIDNIGHT_UTC + 18 * HOUR, 27.6, 80.0, 3.0, "Rain"),
            step(MIDNIGHT_UTC + 21 * HOUR, 26.2, 90.0, 4.0, "Rain"),
        ];

        let utc = daily(&items, 0);
        let local = daily(&items, 7 * 3_600);

        assert_eq!(utc.len(), 1);
        assert_eq!(local.len(), 2);
        assert_eq!(local[1].temperature.min, 26);
        assert_eq!(local[1].temperature.max, 28);
        assert_eq!(local[1].weather.main, "Rain");
        assert_eq!(local[1].humidity, 85);
        assert_eq!(local[1].wind_speed, 4);
    }

    #[test]
    fn aggregates_a_single_day() {
        let items = vec![
            step(MIDNIGHT_UTC, 20.2, 50.0, 1.0, "Clear"),
            step(MIDNIGHT_UTC + 3 * HOUR, 24.6, 61.0, 2.0, "Clouds"),
        ];

        let days = daily(&items, 0);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temperature.min, 20);
        assert_eq!(days[0].temperature.max, 25);
        assert_eq!(days[0].weather.main, "Clear");
        assert_eq!(days[0].humidity, 56);
        assert_eq!(days[0].wind_speed, 2);
        assert_eq!(days[0].date.timestamp(), MIDNIGHT_UTC);
    }

    #[test]
    fn keeps_first_eight_hourly_steps() {
        let items: Vec<OwmForecastItem> = (0..12)
            .map(|i| step(MIDNIGHT_UTC + i * 3 * HOUR, 20.0 + i as f64, 50.0, 1.5, "Clear"))
            .collect();

        let hours = hourly(&items);

        assert_eq!(hours.len(), HOURLY_ENTRIES);
        assert_eq!(hours[0].temperature, 20);
        assert_eq!(hours[7].temperature, 27);
        assert_eq!(hours[0].wind_speed, 1.5);
    }

    #[test]
    fn tolerates_missing_conditions() {
        let mut item = step(MIDNIGHT_UTC, 20.0, 50.0, 1.0, "Clear");
        item.weather.clear();

        let hours = hourly(&[item]);

        assert_eq!(hours[0].weather.main, "");
    }
}
