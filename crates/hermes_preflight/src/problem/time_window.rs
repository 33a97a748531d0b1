use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::travel_matrix::Time;

/// Seconds-of-day window, optionally pinned to a day of the schedule.
#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct TimeWindow {
    pub start: Option<Time>,
    pub end: Option<Time>,
    pub day_index: Option<i64>,
}

impl TimeWindow {
    pub fn new(start: Option<Time>, end: Option<Time>) -> Self {
        TimeWindow {
            start,
            end,
            day_index: None,
        }
    }

    pub fn bounded(start: Time, end: Time) -> Self {
        TimeWindow::new(Some(start), Some(end))
    }

    pub fn on_day(mut self, day_index: i64) -> Self {
        self.day_index = Some(day_index);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Length of the window, only when both bounds are known.
    pub fn span(&self) -> Option<Time> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    pub fn days_compatible(&self, other: &TimeWindow) -> bool {
        match (self.day_index, other.day_index) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span() {
        assert_eq!(TimeWindow::bounded(3600.0, 7200.0).span(), Some(3600.0));
        assert_eq!(TimeWindow::new(Some(3600.0), None).span(), None);
        assert!(TimeWindow::default().is_empty());
    }

    #[test]
    fn test_days_compatible() {
        let monday = TimeWindow::bounded(0.0, 10.0).on_day(0);
        let tuesday = TimeWindow::bounded(0.0, 10.0).on_day(1);
        let any_day = TimeWindow::bounded(0.0, 10.0);

        assert!(!monday.days_compatible(&tuesday));
        assert!(monday.days_compatible(&any_day));
        assert!(any_day.days_compatible(&tuesday));
    }

    #[test]
    fn test_deserialize_partial() {
        let time_window: TimeWindow = serde_json::from_str(r#"{ "end": 500 }"#).unwrap();

        assert_eq!(time_window.start, None);
        assert_eq!(time_window.end, Some(500.0));
        assert_eq!(time_window.day_index, None);
    }
}
