use std::fmt;

use forecast_core::{ForecastWidget, Transition};
use inquire::{InquireError, Select, Text};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    SelectDay,
    ToggleUnit,
    Refresh,
    Quit,
}

impl Action {
    const ALL: [Action; 5] = [
        Action::Search,
        Action::SelectDay,
        Action::ToggleUnit,
        Action::Refresh,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search city",
            Action::SelectDay => "Select day",
            Action::ToggleUnit => "Toggle °C/°F",
            Action::Refresh => "Refresh",
            Action::Quit => "Quit",
        })
    }
}

/// The interactive widget loop. Prompts run on the blocking pool so that
/// debounce timers and requests keep running on the runtime.
pub async fn run(mut widget: ForecastWidget) -> anyhow::Result<()> {
    loop {
        let Some(action) = prompt(|| Select::new("What next?", Action::ALL.to_vec()).prompt()).await?
        else {
            return Ok(());
        };

        match action {
            Action::Search => {
                let Some(city) = prompt(|| Text::new("City:").prompt()).await? else {
                    continue;
                };
                widget.input_city(&city);
                drive(&mut widget).await;
            }
            Action::SelectDay => {
                let labels: Vec<String> = widget
                    .view()
                    .daily
                    .iter()
                    .map(|d| format!("{}  {}°{}", d.weekday, d.temperature, widget.unit().symbol()))
                    .collect();
                if labels.is_empty() {
                    println!("Search for a city first.");
                    continue;
                }

                let Some(choice) = prompt(move || Select::new("Day:", labels).raw_prompt()).await?
                else {
                    continue;
                };
                widget.select_day(choice.index)?;
            }
            Action::ToggleUnit => {
                widget.toggle_unit();
            }
            Action::Refresh => {
                widget.refresh();
                drive(&mut widget).await;
            }
            Action::Quit => return Ok(()),
        }

        print!("{}", render::render(&widget.view()));
    }
}

async fn drive(widget: &mut ForecastWidget) {
    while let Some(transition) = widget.next_transition().await {
        if let Transition::Started { query } = transition {
            println!("Fetching {query}...");
        }
    }
}

/// Runs a blocking prompt; `None` when the user cancels it.
async fn prompt<T, F>(f: F) -> anyhow::Result<Option<T>>
where
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await? {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_lists_every_action_once() {
        let labels: Vec<String> = Action::ALL.iter().map(ToString::to_string).collect();

        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0], "Search city");
        assert_eq!(labels.last().map(String::as_str), Some("Quit"));
    }
}
