use std::fmt;

use forecast_core::ViewModel;

const ICON_URL: &str = "https://openweathermap.org/img/wn";

pub fn icon_url(icon_id: &str) -> String {
    format!("{ICON_URL}/{icon_id}.png")
}

/// Plain-text rendering of the widget.
pub fn render(view: &ViewModel) -> String {
    Rendered(view).to_string()
}

struct Rendered<'a>(&'a ViewModel);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let unit = view.unit_symbol;

        if view.loading {
            writeln!(f, "Fetching...")?;
        }
        if let Some(error) = &view.error {
            writeln!(f, "{error}")?;
        }

        let Some(current) = &view.current else {
            return Ok(());
        };

        writeln!(f, "{}", current.city_name)?;
        writeln!(f, "{}", current.time_label)?;
        writeln!(f, "{}", current.date_label)?;
        writeln!(
            f,
            "{}°{unit}  (feels like {}°{unit})  {}",
            current.temperature,
            current.feels_like,
            icon_url(&current.icon_id)
        )?;
        writeln!(
            f,
            "Humidity {}%  Wind {} m/s  Visibility {} km  Pressure {} hPa",
            current.humidity_pct, current.wind_speed_mps, current.visibility_km, current.pressure_hpa
        )?;
        writeln!(f, "Sunrise {}  Sunset {}", current.sunrise, current.sunset)?;

        writeln!(f, "\n3-Hourly Forecast")?;
        for tile in &view.hourly {
            writeln!(f, "  {}  {:>4}°  [{}]", tile.time_label, tile.temperature, tile.icon_id)?;
        }

        writeln!(f, "\nNext 5 Days")?;
        for (i, tile) in view.daily.iter().enumerate() {
            let marker = if tile.selected { '>' } else { ' ' };
            writeln!(
                f,
                "{marker} {i}. {}  {:>4}°{unit}  [{}]",
                tile.weekday, tile.temperature, tile.icon_id
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use forecast_core::{CurrentConditions, DailyTile, HourlyTile};

    use super::*;

    fn view() -> ViewModel {
        ViewModel {
            loading: false,
            error: None,
            unit_symbol: 'C',
            current: Some(CurrentConditions {
                city_name: "Oslo".into(),
                time_label: "Local Time: 09:15 AM".into(),
                date_label: "Sat Oct 17 2026".into(),
                temperature: 7,
                feels_like: 4,
                humidity_pct: 81,
                wind_speed_mps: 3.2,
                visibility_km: 10.0,
                pressure_hpa: 1018,
                sunrise: "08:02 AM".into(),
                sunset: "06:11 PM".into(),
                icon_id: "04d".into(),
            }),
            hourly: vec![HourlyTile {
                timestamp_epoch: 0,
                time_label: "09:00 AM".into(),
                temperature: 7,
                icon_id: "04d".into(),
            }],
            daily: vec![
                DailyTile {
                    timestamp_epoch: 0,
                    weekday: "Sat".into(),
                    temperature: 8,
                    icon_id: "04d".into(),
                    selected: false,
                },
                DailyTile {
                    timestamp_epoch: 1,
                    weekday: "Sun".into(),
                    temperature: 6,
                    icon_id: "10d".into(),
                    selected: true,
                },
            ],
        }
    }

    #[test]
    fn renders_current_and_tiles() {
        let out = render(&view());

        assert!(out.starts_with("Oslo\nLocal Time: 09:15 AM\n"));
        assert!(out.contains("7°C  (feels like 4°C)"));
        assert!(out.contains("https://openweathermap.org/img/wn/04d.png"));
        assert!(out.contains("Sunrise 08:02 AM  Sunset 06:11 PM"));
        assert!(out.contains("  0. Sat"));
        assert!(out.contains("> 1. Sun"));
    }

    #[test]
    fn renders_error_only() {
        let mut v = view();
        v.current = None;
        v.hourly.clear();
        v.daily.clear();
        v.error = Some("City not found".into());

        assert_eq!(render(&v), "City not found\n");
    }

    #[test]
    fn renders_loading_line_only_while_pending() {
        let v = ViewModel {
            loading: true,
            error: None,
            unit_symbol: 'F',
            current: None,
            hourly: Vec::new(),
            daily: Vec::new(),
        };

        assert_eq!(render(&v), "Fetching...\n");
        assert!(!render(&view()).contains("Fetching..."));
    }
}
