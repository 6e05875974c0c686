use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};

use crate::{
    Config,
    fetcher::{FetchState, ForecastFetcher, Transition},
    model::{ForecastModel, Reading, Unit},
    provider::{ForecastProvider, provider_from_config},
    selection::{Selection, SelectionError},
    view::ViewModel,
};

/// The whole widget: fetch lifecycle, day selection and display unit.
///
/// Input events (`input_city`, `select_day`, `toggle_unit`) are applied
/// immediately; fetch progress is applied by awaiting [`next_transition`].
///
/// [`next_transition`]: ForecastWidget::next_transition
#[derive(Debug)]
pub struct ForecastWidget {
    fetcher: ForecastFetcher,
    selection: Selection,
    unit: Unit,
}

impl ForecastWidget {
    pub fn new(provider: Arc<dyn ForecastProvider>, debounce: Duration, unit: Unit) -> Self {
        Self {
            fetcher: ForecastFetcher::new(provider, debounce),
            selection: Selection::default(),
            unit,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider: Arc<dyn ForecastProvider> = Arc::from(provider_from_config(config)?);
        Ok(Self::new(provider, config.debounce(), config.unit))
    }

    pub fn input_city(&mut self, city: &str) {
        self.fetcher.set_city(city);
    }

    pub fn refresh(&mut self) {
        self.fetcher.refresh();
    }

    pub fn state(&self) -> &FetchState {
        self.fetcher.state()
    }

    pub fn model(&self) -> Option<&ForecastModel> {
        self.fetcher.state().model()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn toggle_unit(&mut self) -> Unit {
        self.unit = self.unit.toggled();
        self.unit
    }

    pub fn select_day(&mut self, index: usize) -> Result<(), SelectionError> {
        let model = self.fetcher.state().model().ok_or(SelectionError::NoForecast)?;
        self.selection.select_day(model, index)
    }

    pub fn select(&mut self, timestamp_epoch: i64) -> Result<(), SelectionError> {
        let model = self.fetcher.state().model().ok_or(SelectionError::NoForecast)?;
        self.selection.select(model, timestamp_epoch)
    }

    pub fn hourly_slice(&self) -> Vec<&Reading> {
        self.selection.hourly_slice(self.model())
    }

    /// Applies the next fetch event, keeping the selection in step with the
    /// installed forecast.
    pub async fn next_transition(&mut self) -> Option<Transition> {
        let transition = self.fetcher.next_transition().await?;

        match &transition {
            Transition::Installed => {
                if let Some(model) = self.fetcher.state().model() {
                    self.selection.reset(model);
                }
            }
            Transition::Failed { .. } => self.selection.clear(),
            Transition::Started { .. } | Transition::Discarded => {}
        }

        Some(transition)
    }

    /// Runs pending fetch work to completion.
    pub async fn settle(&mut self) -> &FetchState {
        while self.next_transition().await.is_some() {}
        self.fetcher.state()
    }

    /// Snapshot for rendering; the local clock is read now.
    pub fn view(&self) -> ViewModel {
        self.view_at(Utc::now())
    }

    pub fn view_at(&self, now: DateTime<Utc>) -> ViewModel {
        ViewModel::assemble(self.fetcher.state(), &self.selection, self.unit, now)
    }
}
