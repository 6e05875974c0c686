use thiserror::Error;

use crate::{
    clock,
    model::{ForecastModel, Reading},
};

/// Readings shown for "today": the next 24 hours at 3-hour resolution.
pub const TODAY_HOURLY_COUNT: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No forecast loaded")]
    NoForecast,

    #[error("Reading at {0} is not a daily forecast tile")]
    NotADailyReading(i64),

    #[error("Day {index} out of range (forecast has {len} days)")]
    DayOutOfRange { index: usize, len: usize },
}

/// The selected day, keyed by the selected reading's timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<i64>,
}

impl Selection {
    /// Points the selection at the first reading of a freshly installed model.
    pub fn reset(&mut self, model: &ForecastModel) {
        self.selected = Some(model.first().timestamp_epoch);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected_timestamp(&self) -> Option<i64> {
        self.selected
    }

    /// Selects a daily tile by its reading's timestamp.
    ///
    /// The first reading of the series is also accepted, since that is where
    /// the selection starts after every fetch.
    pub fn select(&mut self, model: &ForecastModel, timestamp_epoch: i64) -> Result<(), SelectionError> {
        if !model.is_daily(timestamp_epoch) && model.first().timestamp_epoch != timestamp_epoch {
            return Err(SelectionError::NotADailyReading(timestamp_epoch));
        }

        self.selected = Some(timestamp_epoch);
        Ok(())
    }

    /// Selects the `index`-th daily tile.
    pub fn select_day(&mut self, model: &ForecastModel, index: usize) -> Result<(), SelectionError> {
        let reading = model.daily_reading(index).ok_or(SelectionError::DayOutOfRange {
            index,
            len: model.daily_len(),
        })?;

        self.selected = Some(reading.timestamp_epoch);
        Ok(())
    }

    pub fn selected_reading<'a>(&self, model: &'a ForecastModel) -> Option<&'a Reading> {
        self.selected.and_then(|ts| model.reading_at(ts))
    }

    pub fn is_selected(&self, reading: &Reading) -> bool {
        self.selected == Some(reading.timestamp_epoch)
    }

    /// True when the selection is the first reading of the series.
    pub fn is_today(&self, model: &ForecastModel) -> bool {
        self.selected == Some(model.first().timestamp_epoch)
    }

    /// Readings for the hourly strip of the selected day.
    ///
    /// "Today" shows the next eight readings whatever their date; any other
    /// day shows every reading on that day's calendar date in the city's own
    /// time zone (its UTC offset), not the viewer's.
    pub fn hourly_slice<'a>(&self, model: Option<&'a ForecastModel>) -> Vec<&'a Reading> {
        let Some(model) = model else {
            return Vec::new();
        };
        let Some(selected) = self.selected_reading(model) else {
            return Vec::new();
        };

        let series = model.full_series();
        if self.is_today(model) {
            return series.iter().take(TODAY_HOURLY_COUNT).collect();
        }

        let offset = model.timezone_offset_seconds;
        let date = clock::local_date(selected.timestamp_epoch, offset);

        series
            .iter()
            .filter(|r| clock::local_date(r.timestamp_epoch, offset) == date)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::*;

    #[test]
    fn empty_without_model_or_selection() {
        let model = five_day_model();
        let selection = Selection::default();

        assert!(selection.hourly_slice(None).is_empty());
        assert!(selection.hourly_slice(Some(&model)).is_empty());
    }

    #[test]
    fn reset_selects_first_reading_as_today() {
        let model = five_day_model();
        let mut selection = Selection::default();
        selection.reset(&model);

        assert!(selection.is_today(&model));
        assert_eq!(selection.selected_timestamp(), Some(START));

        let slice = selection.hourly_slice(Some(&model));
        assert_eq!(slice.len(), TODAY_HOURLY_COUNT);
        assert_eq!(slice[0].timestamp_epoch, START);
    }

    #[test]
    fn today_slice_is_capped_by_series_length() {
        let model = ForecastModel::new("X".into(), 0, 0, 0, series(START, 5)).unwrap();
        let mut selection = Selection::default();
        selection.reset(&model);

        assert_eq!(selection.hourly_slice(Some(&model)).len(), 5);
    }

    #[test]
    fn today_slice_spans_midnight() {
        // Starts at 18:00, so the next 24 hours reach into tomorrow.
        let model = ForecastModel::new("X".into(), 0, 0, 0, series(START + 18 * 3600, 16)).unwrap();
        let mut selection = Selection::default();
        selection.reset(&model);

        let slice = selection.hourly_slice(Some(&model));
        assert_eq!(slice.len(), 8);
        assert_eq!(slice[7].timestamp_epoch, START + 39 * 3600);
    }

    #[test]
    fn selecting_a_day_yields_that_days_readings() {
        let model = five_day_model();
        let before = model.clone();
        let mut selection = Selection::default();
        selection.reset(&model);

        selection.select_day(&model, 2).unwrap();
        assert!(!selection.is_today(&model));

        let slice = selection.hourly_slice(Some(&model));
        let day_start = START + 2 * 24 * 3600;
        let expected: Vec<i64> = (0..8).map(|i| day_start + i * STEP).collect();
        let got: Vec<i64> = slice.iter().map(|r| r.timestamp_epoch).collect();

        assert_eq!(got, expected);
        assert_eq!(model, before);
    }

    #[test]
    fn day_matching_uses_city_offset() {
        // UTC+3: local midnight is 21:00 UTC the previous day.
        let model = ForecastModel::new("X".into(), 3 * 3600, 0, 0, series(START, 40)).unwrap();
        let mut selection = Selection::default();
        selection.reset(&model);
        selection.select_day(&model, 1).unwrap();

        let slice = selection.hourly_slice(Some(&model));
        assert_eq!(slice.len(), 8);
        assert_eq!(slice[0].timestamp_epoch, START + 21 * 3600);
        let date = clock::local_date(slice[0].timestamp_epoch, 3 * 3600);
        assert!(slice.iter().all(|r| clock::local_date(r.timestamp_epoch, 3 * 3600) == date));
    }

    #[test]
    fn boundary_day_returns_fewer_readings() {
        // The last day only has readings up to 15:00.
        let model = ForecastModel::new("X".into(), 0, 0, 0, series(START + 12 * 3600, 34)).unwrap();
        let mut selection = Selection::default();
        selection.reset(&model);

        let last = model.daily_len() - 1;
        selection.select_day(&model, last).unwrap();

        let slice = selection.hourly_slice(Some(&model));
        assert!(slice.len() < 8);
        assert!(!slice.is_empty());
    }

    #[test]
    fn rejects_non_daily_readings() {
        let model = five_day_model();
        let mut selection = Selection::default();

        let err = selection.select(&model, START + 3 * 3600).unwrap_err();
        assert_eq!(err, SelectionError::NotADailyReading(START + 3 * 3600));
        assert_eq!(selection.selected_timestamp(), None);

        selection.select(&model, START + 12 * 3600).unwrap();
        assert!(selection.is_selected(model.daily_reading(0).unwrap()));

        let err = selection.select_day(&model, 9).unwrap_err();
        assert_eq!(err, SelectionError::DayOutOfRange { index: 9, len: 5 });
    }
}
