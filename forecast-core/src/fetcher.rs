//! Debounced forecast retrieval.
//!
//! A city-name change arms a timer; only when the name has been stable for
//! the debounce interval is the provider called. Every change bumps a
//! request generation, and timer or request completions tagged with an older
//! generation are dropped, so a slow answer for a superseded city can never
//! overwrite newer state.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::{debug, warn};

use crate::{error::FetchError, model::ForecastModel, provider::ForecastProvider};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Where the fetch lifecycle currently is. Exactly one at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Pending {
        query: String,
    },
    Success(ForecastModel),
    Failed(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Pending { .. })
    }

    pub fn model(&self) -> Option<&ForecastModel> {
        match self {
            FetchState::Success(model) => Some(model),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What applying one scheduled event did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Debounce elapsed; a request for `query` is in flight.
    Started { query: String },
    /// A forecast was installed.
    Installed,
    Failed { message: String },
    /// The event belonged to superseded input and was ignored.
    Discarded,
}

#[derive(Debug)]
enum FetchEvent {
    Fire {
        generation: u64,
    },
    Completed {
        generation: u64,
        query: String,
        result: Result<ForecastModel, FetchError>,
    },
}

/// A spawned task that is aborted when the handle is dropped.
#[derive(Debug)]
struct TaskHandle(JoinHandle<()>);

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[derive(Debug)]
pub struct ForecastFetcher {
    provider: Arc<dyn ForecastProvider>,
    debounce: Duration,
    query: String,
    generation: u64,
    timer: Option<TaskHandle>,
    in_flight: Option<TaskHandle>,
    state: FetchState,
    /// Last non-pending state, restored if pending work is withdrawn.
    settled: FetchState,
    events_tx: mpsc::UnboundedSender<FetchEvent>,
    events_rx: mpsc::UnboundedReceiver<FetchEvent>,
}

impl ForecastFetcher {
    pub fn new(provider: Arc<dyn ForecastProvider>, debounce: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            provider,
            debounce,
            query: String::new(),
            generation: 0,
            timer: None,
            in_flight: None,
            state: FetchState::Idle,
            settled: FetchState::Idle,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// The city the next or current request is for.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// True while a timer is armed or a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.timer.is_some() || self.in_flight.is_some()
    }

    /// Feeds a new value of the city input.
    ///
    /// An empty value withdraws a still-armed timer but leaves any
    /// outstanding request alone; if that leaves no work at all, a pending
    /// state falls back to the last settled one. An unchanged value is
    /// ignored. Anything else supersedes all earlier work and restarts the
    /// debounce timer.
    pub fn set_city(&mut self, city: &str) {
        let city = city.trim();

        if city.is_empty() {
            if self.timer.take().is_some() {
                debug!(generation = self.generation, "city cleared, scheduled fetch withdrawn");
            }
            self.query.clear();
            self.release_if_idle();
            return;
        }

        if city == self.query {
            return;
        }

        self.query = city.to_string();
        self.schedule();
    }

    /// Fetches the current city again after the debounce interval.
    pub fn refresh(&mut self) {
        if !self.query.is_empty() {
            self.schedule();
        }
    }

    /// Waits for the next timer fire or request completion and applies it.
    ///
    /// Returns `None` when nothing is scheduled or in flight.
    pub async fn next_transition(&mut self) -> Option<Transition> {
        if !self.is_busy() {
            return None;
        }

        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    /// Drives transitions until no work is left; returns the final state.
    pub async fn settle(&mut self) -> &FetchState {
        while self.next_transition().await.is_some() {}
        &self.state
    }

    fn schedule(&mut self) {
        self.generation += 1;
        // Dropping the handles aborts superseded work.
        self.in_flight = None;

        let generation = self.generation;
        let deadline = Instant::now() + self.debounce;
        let tx = self.events_tx.clone();

        debug!(city = %self.query, generation, "forecast fetch scheduled");

        self.timer = Some(TaskHandle(tokio::spawn(async move {
            sleep_until(deadline).await;
            let _ = tx.send(FetchEvent::Fire { generation });
        })));
    }

    fn start_request(&mut self) {
        let generation = self.generation;
        let city = self.query.clone();
        let provider = Arc::clone(&self.provider);
        let tx = self.events_tx.clone();

        self.in_flight = Some(TaskHandle(tokio::spawn(async move {
            let result = provider.fetch_forecast(&city).await;
            let _ = tx.send(FetchEvent::Completed {
                generation,
                query: city,
                result,
            });
        })));
    }

    /// Pending with nothing armed or in flight would never resolve; fall
    /// back to whatever was showing before the fetch started.
    fn release_if_idle(&mut self) {
        if !self.is_busy() && self.state.is_loading() {
            debug!(generation = self.generation, "pending fetch withdrawn, restoring last state");
            self.state = std::mem::take(&mut self.settled);
        }
    }

    fn apply(&mut self, event: FetchEvent) -> Transition {
        match event {
            FetchEvent::Fire { generation } => {
                if generation != self.generation || self.timer.is_none() {
                    debug!(generation, current = self.generation, "stale debounce timer ignored");
                    self.release_if_idle();
                    return Transition::Discarded;
                }
                self.timer = None;

                let query = self.query.clone();
                debug!(city = %query, generation, "fetching forecast");
                let previous = std::mem::replace(
                    &mut self.state,
                    FetchState::Pending {
                        query: query.clone(),
                    },
                );
                if !previous.is_loading() {
                    self.settled = previous;
                }
                self.start_request();

                Transition::Started { query }
            }
            FetchEvent::Completed {
                generation,
                query,
                result,
            } => {
                if generation != self.generation || self.in_flight.is_none() {
                    debug!(city = %query, generation, current = self.generation, "stale forecast result discarded");
                    self.release_if_idle();
                    return Transition::Discarded;
                }
                self.in_flight = None;
                self.settled = FetchState::Idle;

                match result {
                    Ok(model) => {
                        debug!(
                            city = %model.city_name,
                            readings = model.full_series().len(),
                            days = model.daily_len(),
                            "forecast installed"
                        );
                        self.state = FetchState::Success(model);
                        Transition::Installed
                    }
                    Err(err) => {
                        warn!(city = %query, error = %err, "forecast fetch failed");
                        let message = err.to_string();
                        self.state = FetchState::Failed(message.clone());
                        Transition::Failed { message }
                    }
                }
            }
        }
    }
}
