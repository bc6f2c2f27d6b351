//! Opening hours keyed by weekday.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// All days, Monday first
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Three-letter label
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Weekday {
    type Err = ();

    /// Accepts three-letter and full English day names in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let day = match lower.as_str() {
            "mon" | "monday" => Weekday::Mon,
            "tue" | "tues" | "tuesday" => Weekday::Tue,
            "wed" | "wednesday" => Weekday::Wed,
            "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
            "fri" | "friday" => Weekday::Fri,
            "sat" | "saturday" => Weekday::Sat,
            "sun" | "sunday" => Weekday::Sun,
            _ => return Err(()),
        };
        Ok(day)
    }
}

/// Free-text opening hours per weekday, e.g. `Mon -> "9am-5pm"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours(BTreeMap<Weekday, String>);

impl Hours {
    /// Normalize a stored hours value.
    ///
    /// Accepts an object keyed by day name or that object serialized into a
    /// string. Unknown keys and empty values are skipped; `None` when nothing
    /// usable remains.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                let days: BTreeMap<Weekday, String> = map
                    .iter()
                    .filter_map(|(key, v)| {
                        let day = key.parse::<Weekday>().ok()?;
                        let text = v.as_str()?.trim();
                        (!text.is_empty()).then(|| (day, text.to_string()))
                    })
                    .collect();
                (!days.is_empty()).then_some(Hours(days))
            }
            Value::String(text) if text.trim_start().starts_with('{') => {
                let parsed: Value = serde_json::from_str(text).ok()?;
                Self::from_value(&parsed)
            }
            _ => None,
        }
    }

    /// Hours for one day
    pub fn get(&self, day: Weekday) -> Option<&str> {
        self.0.get(&day).map(String::as_str)
    }

    /// Days with hours, Monday first
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &str)> {
        self.0.iter().map(|(d, h)| (*d, h.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
