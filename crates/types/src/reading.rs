//! One complete poll result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Value of a single channel
///
/// Concentrations are floating point, particle counts are integers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelValue {
    Count(u64),
    Concentration(f64),
}

impl ChannelValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            ChannelValue::Count(count) => *count as f64,
            ChannelValue::Concentration(value) => *value,
        }
    }
}

impl From<f64> for ChannelValue {
    fn from(value: f64) -> Self {
        ChannelValue::Concentration(value)
    }
}

impl From<u64> for ChannelValue {
    fn from(count: u64) -> Self {
        ChannelValue::Count(count)
    }
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelValue::Count(count) => write!(f, "{}", count),
            ChannelValue::Concentration(value) => write!(f, "{:.1}", value),
        }
    }
}

/// Immutable snapshot of every channel from a single poll
///
/// A channel the device did not report is stored as `None`. Readings are
/// never modified after construction; a new poll produces a new `Reading`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    values: HashMap<String, Option<ChannelValue>>,
    taken_at: DateTime<Utc>,
}

impl Reading {
    pub fn new(values: HashMap<String, Option<ChannelValue>>, taken_at: DateTime<Utc>) -> Self {
        Self { values, taken_at }
    }

    /// Value for a channel key
    ///
    /// Missing keys and unreported channels both yield `None`.
    pub fn get(&self, key: &str) -> Option<ChannelValue> {
        self.values.get(key).copied().flatten()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// When the frame behind this reading was read
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Get a reference to the underlying values map
    pub fn values(&self) -> &HashMap<String, Option<ChannelValue>> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reading {
        let mut values = HashMap::new();
        values.insert("pm2_5".to_string(), Some(ChannelValue::Concentration(10.0)));
        values.insert("particles_0_3".to_string(), Some(ChannelValue::Count(100)));
        values.insert("pm10_atm".to_string(), None);
        Reading::new(values, Utc::now())
    }

    #[test]
    fn test_missing_and_unreported_keys_are_none() {
        let reading = sample();
        assert_eq!(reading.get("pm2_5"), Some(ChannelValue::Concentration(10.0)));
        assert_eq!(reading.get("pm10_atm"), None);
        assert!(reading.contains_key("pm10_atm"));
        assert_eq!(reading.get("does_not_exist"), None);
        assert!(!reading.contains_key("does_not_exist"));
    }

    #[test]
    fn test_channel_value_json_shape() {
        let reading = sample();
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["values"]["particles_0_3"], serde_json::json!(100));
        assert_eq!(json["values"]["pm2_5"], serde_json::json!(10.0));
        assert!(json["values"]["pm10_atm"].is_null());

        let back: Reading = serde_json::from_value(json).unwrap();
        assert_eq!(back.get("particles_0_3"), Some(ChannelValue::Count(100)));
        assert_eq!(back.get("pm2_5"), Some(ChannelValue::Concentration(10.0)));
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(ChannelValue::Concentration(11.04).to_string(), "11.0");
        assert_eq!(ChannelValue::Count(80).to_string(), "80");
        assert!((ChannelValue::Count(5).as_f64() - 5.0).abs() < f64::EPSILON);
    }
}
