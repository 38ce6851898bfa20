/// Payload decoding and encoding driven by explicit key mapping tables
use crate::domain::{DatePrecision, FlickrLinks, Launch, LaunchLinks};
use crate::errors::{DecodeError, DecodeResult};
use crate::utils::{epoch_to_utc, int, json_type};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// One row of a mapping table: payload key to record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub key: &'static str,
    pub field: &'static str,
    pub presence: Presence,
}

impl FieldMapping {
    const fn required(key: &'static str, field: &'static str) -> Self {
        Self {
            key,
            field,
            presence: Presence::Required,
        }
    }

    const fn optional(key: &'static str, field: &'static str) -> Self {
        Self {
            key,
            field,
            presence: Presence::Optional,
        }
    }
}

const ID: FieldMapping = FieldMapping::required("id", "id");
const NUMBER: FieldMapping = FieldMapping::required("flight_number", "number");
const NAME: FieldMapping = FieldMapping::required("name", "name");
const DETAILS: FieldMapping = FieldMapping::optional("details", "details");
const ROCKET: FieldMapping = FieldMapping::required("rocket", "rocket");
const LAUNCH_DATE: FieldMapping = FieldMapping::required("date_unix", "launch_date");
const DATE_PRECISION: FieldMapping = FieldMapping::required("date_precision", "date_precision");
const UPCOMING: FieldMapping = FieldMapping::required("upcoming", "upcoming");
const LINKS: FieldMapping = FieldMapping::required("links", "links");

const FLICKR: FieldMapping = FieldMapping::required("flickr", "flickr");
const PRESSKIT: FieldMapping = FieldMapping::optional("presskit", "presskit");
const WEBCAST: FieldMapping = FieldMapping::optional("webcast", "webcast");
const ARTICLE: FieldMapping = FieldMapping::optional("article", "article");
const WIKIPEDIA: FieldMapping = FieldMapping::optional("wikipedia", "wikipedia");

const SMALL: FieldMapping = FieldMapping::required("small", "small");
const ORIGINAL: FieldMapping = FieldMapping::required("original", "original");

/// Launch payload keys. Anything not listed here is ignored.
pub const LAUNCH_FIELDS: &[FieldMapping] = &[
    ID,
    NUMBER,
    NAME,
    DETAILS,
    ROCKET,
    LAUNCH_DATE,
    DATE_PRECISION,
    UPCOMING,
    LINKS,
];

pub const LINKS_FIELDS: &[FieldMapping] = &[FLICKR, PRESSKIT, WEBCAST, ARTICLE, WIKIPEDIA];

pub const FLICKR_FIELDS: &[FieldMapping] = &[SMALL, ORIGINAL];

/// Paginated query responses wrap their launches in this key
const PAGE_KEY: &str = "docs";

/// Keyed view over one payload object, checked against its mapping table
struct Fields<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Fails on a non-object or on the first absent required key, in table order
    fn new(value: &'a Value, table: &[FieldMapping]) -> DecodeResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| mismatch(String::new(), "object", value))?;

        if let Some(missing) = table.iter().find(|m| {
            m.presence == Presence::Required && object.get(m.key).map_or(true, Value::is_null)
        }) {
            return Err(DecodeError::MissingField {
                path: missing.key.to_string(),
            });
        }

        Ok(Self { object })
    }

    /// Present and non-null value for a mapping
    fn get(&self, m: &FieldMapping) -> DecodeResult<Option<&'a Value>> {
        match self.object.get(m.key).filter(|v| !v.is_null()) {
            Some(v) => Ok(Some(v)),
            None if m.presence == Presence::Optional => Ok(None),
            None => Err(DecodeError::MissingField {
                path: m.key.to_string(),
            }),
        }
    }

    fn required(&self, m: &FieldMapping) -> DecodeResult<&'a Value> {
        self.get(m)?.ok_or_else(|| DecodeError::MissingField {
            path: m.key.to_string(),
        })
    }

    fn string(&self, m: &FieldMapping) -> DecodeResult<String> {
        to_string(self.required(m)?, m.key)
    }

    fn opt_string(&self, m: &FieldMapping) -> DecodeResult<Option<String>> {
        self.get(m)?.map(|v| to_string(v, m.key)).transpose()
    }

    fn integer(&self, m: &FieldMapping) -> DecodeResult<i64> {
        let v = self.required(m)?;
        int(v).ok_or_else(|| mismatch(m.key.to_string(), "integer", v))
    }

    fn boolean(&self, m: &FieldMapping) -> DecodeResult<bool> {
        let v = self.required(m)?;
        v.as_bool()
            .ok_or_else(|| mismatch(m.key.to_string(), "boolean", v))
    }

    fn timestamp(&self, m: &FieldMapping) -> DecodeResult<DateTime<Utc>> {
        let v = self.required(m)?;
        if !v.is_number() {
            return Err(mismatch(m.key.to_string(), "unix timestamp", v));
        }
        epoch_to_utc(v).ok_or_else(|| DecodeError::TypeMismatch {
            path: m.key.to_string(),
            expected: "unix timestamp within range",
            found: json_type(v),
        })
    }

    fn precision(&self, m: &FieldMapping) -> DecodeResult<DatePrecision> {
        let token = self.string(m)?;
        token
            .parse()
            .map_err(|_| DecodeError::UnrecognizedEnumeration {
                path: m.key.to_string(),
                value: token,
            })
    }

    fn opt_url(&self, m: &FieldMapping) -> DecodeResult<Option<Url>> {
        self.get(m)?.map(|v| to_url(v, m.key.to_string())).transpose()
    }

    fn urls(&self, m: &FieldMapping) -> DecodeResult<Vec<Url>> {
        let v = self.required(m)?;
        let items = v
            .as_array()
            .ok_or_else(|| mismatch(m.key.to_string(), "array", v))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| to_url(item, format!("{}[{}]", m.key, i)))
            .collect()
    }

    fn nested<T>(
        &self,
        m: &FieldMapping,
        decode: fn(&Value) -> DecodeResult<T>,
    ) -> DecodeResult<T> {
        decode(self.required(m)?).map_err(|e| e.within(m.key))
    }
}

fn mismatch(path: String, expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::TypeMismatch {
        path,
        expected,
        found: json_type(found),
    }
}

fn to_string(v: &Value, key: &str) -> DecodeResult<String> {
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(key.to_string(), "string", v))
}

fn to_url(v: &Value, path: String) -> DecodeResult<Url> {
    let s = match v.as_str() {
        Some(s) => s,
        None => return Err(mismatch(path, "URL string", v)),
    };
    Url::parse(s).map_err(|e| DecodeError::MalformedUrl {
        path,
        value: s.to_string(),
        reason: e.to_string(),
    })
}

/// Decode one launch payload. All-or-nothing: any field error fails the whole record.
pub fn decode_launch(value: &Value) -> DecodeResult<Launch> {
    let result = build_launch(value);
    match &result {
        Ok(launch) => debug!("Decoded launch {} ({})", launch.id, launch.name),
        Err(e) => debug!("Launch decode failed at {}: {}", e.path().unwrap_or("-"), e),
    }
    result
}

fn build_launch(value: &Value) -> DecodeResult<Launch> {
    let fields = Fields::new(value, LAUNCH_FIELDS)?;

    Ok(Launch {
        id: fields.string(&ID)?,
        number: fields.integer(&NUMBER)?,
        name: fields.string(&NAME)?,
        details: fields.opt_string(&DETAILS)?,
        rocket: fields.string(&ROCKET)?,
        launch_date: fields.timestamp(&LAUNCH_DATE)?,
        date_precision: fields.precision(&DATE_PRECISION)?,
        upcoming: fields.boolean(&UPCOMING)?,
        links: fields.nested(&LINKS, decode_links)?,
    })
}

/// Decode the `links` object of a launch payload
pub fn decode_links(value: &Value) -> DecodeResult<LaunchLinks> {
    let fields = Fields::new(value, LINKS_FIELDS)?;

    Ok(LaunchLinks {
        flickr: fields.nested(&FLICKR, decode_flickr)?,
        presskit: fields.opt_url(&PRESSKIT)?,
        webcast: fields.opt_url(&WEBCAST)?,
        article: fields.opt_url(&ARTICLE)?,
        wikipedia: fields.opt_url(&WIKIPEDIA)?,
    })
}

/// Decode the `links.flickr` object of a launch payload
pub fn decode_flickr(value: &Value) -> DecodeResult<FlickrLinks> {
    let fields = Fields::new(value, FLICKR_FIELDS)?;

    Ok(FlickrLinks {
        small: fields.urls(&SMALL)?,
        original: fields.urls(&ORIGINAL)?,
    })
}

/// Launch payloads found in a batch response, with the key they sit under
fn batch_items(value: &Value) -> DecodeResult<(Vec<&Value>, Option<&'static str>)> {
    // Handle different response formats
    match value {
        Value::Array(items) => Ok((items.iter().collect(), None)),
        Value::Object(map) => match map.get(PAGE_KEY) {
            Some(Value::Array(items)) => Ok((items.iter().collect(), Some(PAGE_KEY))),
            Some(other) => Err(mismatch(PAGE_KEY.to_string(), "array", other)),
            None => Ok((vec![value], None)),
        },
        other => Err(mismatch(String::new(), "array or object", other)),
    }
}

fn indexed(err: DecodeError, index: usize, key: Option<&str>) -> DecodeError {
    let err = err.within(&format!("[{index}]"));
    match key {
        Some(key) => err.within(key),
        None => err,
    }
}

/// Decode every launch in a batch payload: a JSON array, a paginated
/// `{"docs": [...]}` response, or a single launch object.
///
/// Fails on the first bad element; its path carries the element index.
pub fn decode_launches(value: &Value) -> DecodeResult<Vec<Launch>> {
    let (items, key) = batch_items(value)?;
    let single = key.is_none() && !value.is_array();

    let launches = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            decode_launch(item).map_err(|e| if single { e } else { indexed(e, i, key) })
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    info!("Decoded {} launches", launches.len());
    Ok(launches)
}

/// Like [`decode_launches`], but keeps the launches that decode and
/// collects an error for each one that does not.
pub fn decode_launches_lenient(value: &Value) -> (Vec<Launch>, Vec<DecodeError>) {
    let (items, key) = match batch_items(value) {
        Ok(found) => found,
        Err(e) => return (Vec::new(), vec![e]),
    };
    let single = key.is_none() && !value.is_array();

    let mut launches = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        match decode_launch(item) {
            Ok(launch) => launches.push(launch),
            Err(e) if single => errors.push(e),
            Err(e) => errors.push(indexed(e, i, key)),
        }
    }

    info!(
        "Decoded {} launches, skipped {} invalid",
        launches.len(),
        errors.len()
    );
    (launches, errors)
}

impl Launch {
    /// Parse JSON text and decode it as a single launch
    pub fn from_json_str(s: &str) -> DecodeResult<Self> {
        let value: Value = serde_json::from_str(s)?;
        decode_launch(&value)
    }
}

impl<'de> Deserialize<'de> for Launch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        decode_launch(&value).map_err(de::Error::custom)
    }
}

/// `date_unix` as written back: whole seconds, or fractional seconds when
/// the timestamp carries sub-second nanos
fn epoch_value(date: &DateTime<Utc>) -> Value {
    match date.timestamp_subsec_nanos() {
        0 => Value::from(date.timestamp()),
        nanos => Value::from(date.timestamp() as f64 + f64::from(nanos) / 1_000_000_000.0),
    }
}

impl Serialize for Launch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(LAUNCH_FIELDS.len()))?;
        map.serialize_entry(ID.key, &self.id)?;
        map.serialize_entry(NUMBER.key, &self.number)?;
        map.serialize_entry(NAME.key, &self.name)?;
        map.serialize_entry(DETAILS.key, &self.details)?;
        map.serialize_entry(ROCKET.key, &self.rocket)?;
        map.serialize_entry(LAUNCH_DATE.key, &epoch_value(&self.launch_date))?;
        map.serialize_entry(DATE_PRECISION.key, self.date_precision.as_str())?;
        map.serialize_entry(UPCOMING.key, &self.upcoming)?;
        map.serialize_entry(LINKS.key, &self.links)?;
        map.end()
    }
}

impl Serialize for LaunchLinks {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(LINKS_FIELDS.len()))?;
        map.serialize_entry(FLICKR.key, &self.flickr)?;
        map.serialize_entry(PRESSKIT.key, &self.presskit)?;
        map.serialize_entry(WEBCAST.key, &self.webcast)?;
        map.serialize_entry(ARTICLE.key, &self.article)?;
        map.serialize_entry(WIKIPEDIA.key, &self.wikipedia)?;
        map.end()
    }
}

impl Serialize for FlickrLinks {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(FLICKR_FIELDS.len()))?;
        map.serialize_entry(SMALL.key, &self.small)?;
        map.serialize_entry(ORIGINAL.key, &self.original)?;
        map.end()
    }
}
