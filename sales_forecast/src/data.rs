//! Sales observations and read-only views over a series of them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One dated sales record: aggregate revenue plus per-item quantities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    date: NaiveDate,
    revenue: f64,
    #[serde(default)]
    quantities: BTreeMap<String, f64>,
}

impl Observation {
    /// Create an observation without item quantities
    pub fn new(date: NaiveDate, revenue: f64) -> Self {
        Self {
            date,
            revenue,
            quantities: BTreeMap::new(),
        }
    }

    /// Create an observation with item quantities
    pub fn with_quantities(
        date: NaiveDate,
        revenue: f64,
        quantities: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            date,
            revenue,
            quantities,
        }
    }

    /// Add one item quantity
    pub fn with_item(mut self, item: impl Into<String>, quantity: f64) -> Self {
        self.quantities.insert(item.into(), quantity);
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn quantities(&self) -> &BTreeMap<String, f64> {
        &self.quantities
    }

    /// Quantity recorded for `item`, if the record mentions it at all
    pub fn quantity(&self, item: &str) -> Option<f64> {
        self.quantities.get(item).copied()
    }
}

/// Borrowed view over a date-sorted, de-duplicated observation sequence
#[derive(Debug, Clone, Copy)]
pub struct SalesSeries<'a> {
    observations: &'a [Observation],
}

impl<'a> SalesSeries<'a> {
    pub fn new(observations: &'a [Observation]) -> Self {
        Self { observations }
    }

    pub fn observations(&self) -> &'a [Observation] {
        self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Revenue column in series order
    pub fn revenues(&self) -> Vec<f64> {
        self.observations.iter().map(Observation::revenue).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(Observation::date).collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(Observation::date)
    }

    /// Every item key that appears in any observation, sorted
    pub fn item_names(&self) -> BTreeSet<&'a str> {
        self.observations
            .iter()
            .flat_map(|obs| obs.quantities.keys().map(String::as_str))
            .collect()
    }

    /// `(series position, quantity)` for each observation that records `item`
    pub fn item_points(&self, item: &str) -> Vec<(f64, f64)> {
        self.observations
            .iter()
            .enumerate()
            .filter_map(|(i, obs)| obs.quantity(item).map(|q| (i as f64, q)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_series_views() {
        let observations = vec![
            Observation::new(day(1), 100.0).with_item("iron", 3.0),
            Observation::new(day(2), 120.0).with_item("battery", 1.0),
            Observation::new(day(3), 90.0)
                .with_item("iron", 5.0)
                .with_item("aluminum", 2.0),
        ];
        let series = SalesSeries::new(&observations);

        assert_eq!(series.len(), 3);
        assert_eq!(series.revenues(), vec![100.0, 120.0, 90.0]);
        assert_eq!(series.last_date(), Some(day(3)));
        assert_eq!(
            series.item_names().into_iter().collect::<Vec<_>>(),
            vec!["aluminum", "battery", "iron"]
        );
        assert_eq!(series.item_points("iron"), vec![(0.0, 3.0), (2.0, 5.0)]);
        assert!(series.item_points("glass").is_empty());
    }

    #[test]
    fn test_deserializes_without_quantities() {
        let obs: Observation =
            serde_json::from_str(r#"{"date": "2024-03-01", "revenue": 42.5}"#).unwrap();
        assert_eq!(obs.date(), day(1));
        assert!(obs.quantities().is_empty());
    }
}
