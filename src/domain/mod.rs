/// Domain models for the application
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Detailed information about a SpaceX rocket launch.
///
/// Built only by decoding a payload (see [`crate::decode`]); every field is
/// read-only afterwards. Two launches are equal when their ids are equal,
/// whatever else differs between the payloads they came from.
///
/// Serializes back to the payload shape it was decoded from.
#[derive(Debug, Clone)]
pub struct Launch {
    pub(crate) id: String,
    pub(crate) number: i64,
    pub(crate) name: String,
    pub(crate) details: Option<String>,
    pub(crate) rocket: String,
    pub(crate) launch_date: DateTime<Utc>,
    pub(crate) date_precision: DatePrecision,
    pub(crate) upcoming: bool,
    pub(crate) links: LaunchLinks,
}

impl Launch {
    /// Unique identifier of the launch
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Flight number
    pub fn number(&self) -> i64 {
        self.number
    }

    /// Launch name, e.g. "FalconSat"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Brief summary of how the launch went, when one is available
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Identifier of the rocket used. Not resolved to a rocket record.
    pub fn rocket(&self) -> &str {
        &self.rocket
    }

    /// Launch date in UTC. Only meaningful down to [`Launch::date_precision`].
    pub fn launch_date(&self) -> DateTime<Utc> {
        self.launch_date
    }

    pub fn date_precision(&self) -> DatePrecision {
        self.date_precision
    }

    pub fn is_upcoming(&self) -> bool {
        self.upcoming
    }

    pub fn links(&self) -> &LaunchLinks {
        &self.links
    }

    /// Image of the launch
    pub fn large_image_url(&self) -> Option<&Url> {
        self.links.flickr.original.first()
    }

    pub fn large_image_urls(&self) -> &[Url] {
        &self.links.flickr.original
    }

    /// Launch date rendered only as far as its precision allows
    pub fn formatted_launch_date(&self) -> String {
        self.date_precision.format(&self.launch_date)
    }
}

impl PartialEq for Launch {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Launch {}

impl Hash for Launch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Links to related articles, videos, images and other materials.
///
/// Links are held as parsed absolute [`Url`]s, so the text is normalised
/// (`https://img` reads back as `https://img/`) and relative references
/// such as `youtube` are rejected at decode time.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchLinks {
    /// Flickr images archive
    pub flickr: FlickrLinks,
    /// Official press kit
    pub presskit: Option<Url>,
    /// Launch webcast or recording
    pub webcast: Option<Url>,
    pub article: Option<Url>,
    pub wikipedia: Option<Url>,
}

/// Flickr image lists. `small` and `original` are independent; no
/// positional correspondence between them is implied.
///
/// Entries are normalised absolute URLs, as for [`LaunchLinks`]; order is
/// kept as sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlickrLinks {
    pub small: Vec<Url>,
    pub original: Vec<Url>,
}

/// How much of a launch date is meaningful, ordered coarse to fine.
///
/// A launch scheduled for July 2022 arrives as `2022-07-01T00:00:00Z` with
/// `Month` precision. Zeroing the finer units is done upstream and is
/// trusted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
    Half,
    Quarter,
    Year,
    Month,
    Day,
    Hour,
}

impl DatePrecision {
    pub const ALL: [DatePrecision; 6] = [
        DatePrecision::Half,
        DatePrecision::Quarter,
        DatePrecision::Year,
        DatePrecision::Month,
        DatePrecision::Day,
        DatePrecision::Hour,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatePrecision::Half => "half",
            DatePrecision::Quarter => "quarter",
            DatePrecision::Year => "year",
            DatePrecision::Month => "month",
            DatePrecision::Day => "day",
            DatePrecision::Hour => "hour",
        }
    }

    /// Render `date` down to this precision, e.g. `2022 H2` or `2022-07`
    pub fn format(self, date: &DateTime<Utc>) -> String {
        match self {
            DatePrecision::Half => format!("{} H{}", date.year(), date.month0() / 6 + 1),
            DatePrecision::Quarter => format!("{} Q{}", date.year(), date.month0() / 3 + 1),
            DatePrecision::Year => date.format("%Y").to_string(),
            DatePrecision::Month => date.format("%Y-%m").to_string(),
            DatePrecision::Day => date.format("%Y-%m-%d").to_string(),
            DatePrecision::Hour => date.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

impl fmt::Display for DatePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a string that is not one of the six precision tokens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown date precision: {0:?}")]
pub struct UnknownPrecision(pub String);

impl FromStr for DatePrecision {
    type Err = UnknownPrecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatePrecision::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPrecision(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn launch(id: &str, details: Option<&str>) -> Launch {
        Launch {
            id: id.to_string(),
            number: 1,
            name: "FalconSat".to_string(),
            details: details.map(str::to_string),
            rocket: "5e9d0d95eda69955f709d1eb".to_string(),
            launch_date: Utc.timestamp_opt(1143239400, 0).unwrap(),
            date_precision: DatePrecision::Hour,
            upcoming: false,
            links: LaunchLinks {
                flickr: FlickrLinks::default(),
                presskit: None,
                webcast: None,
                article: None,
                wikipedia: None,
            },
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_equality_ignores_everything_but_id() {
        let a = launch("5eb87cd9ffd86e000604b32a", None);
        let mut b = launch("5eb87cd9ffd86e000604b32a", Some("Engine failure at 33 seconds"));
        b.number = 99;
        b.upcoming = true;
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_ids_are_not_equal() {
        assert_ne!(launch("a", None), launch("b", None));
    }

    #[test]
    fn test_hash_agrees_with_equality() {
        let set: HashSet<Launch> = [launch("a", None), launch("a", Some("x")), launch("b", None)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_large_image_url_is_first_original() {
        let mut l = launch("a", None);
        l.links.flickr.original = vec![url("https://img/a.jpg"), url("https://img/b.jpg")];
        l.links.flickr.small = vec![url("https://img/small.jpg")];
        assert_eq!(l.large_image_url(), Some(&url("https://img/a.jpg")));
        assert_eq!(l.large_image_urls().len(), 2);
    }

    #[test]
    fn test_large_image_url_absent_when_no_originals() {
        let mut l = launch("a", None);
        l.links.flickr.small = vec![url("https://img/small.jpg")];
        assert_eq!(l.large_image_url(), None);
        assert!(l.large_image_urls().is_empty());
    }

    #[test]
    fn test_precision_tokens_round_trip() {
        for p in DatePrecision::ALL {
            assert_eq!(p.as_str().parse::<DatePrecision>(), Ok(p));
            assert_eq!(p.to_string(), p.as_str());
        }
    }

    #[test]
    fn test_precision_rejects_unknown_and_uppercase() {
        assert!("century".parse::<DatePrecision>().is_err());
        assert!("Hour".parse::<DatePrecision>().is_err());
        assert!("".parse::<DatePrecision>().is_err());
    }

    #[test]
    fn test_precision_orders_coarse_to_fine() {
        assert!(DatePrecision::Half < DatePrecision::Quarter);
        assert!(DatePrecision::Month < DatePrecision::Day);
        assert_eq!(DatePrecision::ALL.iter().max(), Some(&DatePrecision::Hour));
    }

    #[test]
    fn test_precision_format() {
        let date = Utc.with_ymd_and_hms(2022, 7, 1, 14, 0, 0).unwrap();
        assert_eq!(DatePrecision::Half.format(&date), "2022 H2");
        assert_eq!(DatePrecision::Quarter.format(&date), "2022 Q3");
        assert_eq!(DatePrecision::Year.format(&date), "2022");
        assert_eq!(DatePrecision::Month.format(&date), "2022-07");
        assert_eq!(DatePrecision::Day.format(&date), "2022-07-01");
        assert_eq!(DatePrecision::Hour.format(&date), "2022-07-01 14:00 UTC");
    }

    #[test]
    fn test_first_half_and_quarter_boundaries() {
        let june = Utc.with_ymd_and_hms(2023, 6, 30, 0, 0, 0).unwrap();
        assert_eq!(DatePrecision::Half.format(&june), "2023 H1");
        assert_eq!(DatePrecision::Quarter.format(&june), "2023 Q2");
    }

    #[test]
    fn test_serializes_precision_lowercase() {
        assert_eq!(
            serde_json::to_value(DatePrecision::Quarter).unwrap(),
            "quarter"
        );
    }

    #[test]
    fn test_unknown_precision_message() {
        let err = "century".parse::<DatePrecision>().unwrap_err();
        assert_eq!(err.to_string(), "unknown date precision: \"century\"");
    }
}
