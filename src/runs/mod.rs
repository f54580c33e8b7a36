//! Test-run summaries as served by the test management API.

pub mod source;

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

/// One execution of a test suite against a named environment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ApiRun")]
pub struct TestRunSummary {
    pub id: String,
    pub environment: String,
    pub status: String,
    pub passed_test_count: u32,
    pub failed_test_count: u32,
    pub start_time: DateTime<Utc>,
    /// `None` while the run is still in progress.
    pub end_time: Option<DateTime<Utc>>,
    pub report_url: Option<String>,
}

/// A run exactly as the API sends it (`camelCase`).
///
/// The earlier API shape named the identifier `runId`. Either name is
/// accepted; `id` wins when both are present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRun {
    #[serde(default, deserialize_with = "deserialize_identifier")]
    id: Option<String>,

    #[serde(default, deserialize_with = "deserialize_identifier")]
    run_id: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    environment: String,

    status: String,

    #[serde(default, deserialize_with = "deserialize_count")]
    passed_test_count: u32,

    #[serde(default, deserialize_with = "deserialize_count")]
    failed_test_count: u32,

    #[serde(deserialize_with = "deserialize_timestamp")]
    start_time: DateTime<Utc>,

    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    end_time: Option<DateTime<Utc>>,

    #[serde(default)]
    report_url: Option<String>,
}

impl TryFrom<ApiRun> for TestRunSummary {
    type Error = String;

    fn try_from(run: ApiRun) -> Result<Self, Self::Error> {
        let id = run
            .id
            .or(run.run_id)
            .ok_or_else(|| "missing field `id`".to_string())?;
        Ok(Self {
            id,
            environment: run.environment,
            status: run.status,
            passed_test_count: run.passed_test_count,
            failed_test_count: run.failed_test_count,
            start_time: run.start_time,
            end_time: run.end_time,
            report_url: run.report_url,
        })
    }
}

impl TestRunSummary {
    /// Report link target, if the run has a non-empty one.
    pub fn report_link(&self) -> Option<&str> {
        self.report_url.as_deref().filter(|url| !url.is_empty())
    }

    /// CSS class for the status badge, e.g. `status-failed`.
    pub fn status_class(&self) -> String {
        format!("status-{}", self.status.to_lowercase())
    }
}

/// Decode a runs API response body.
pub fn decode_runs(body: &[u8]) -> serde_json::Result<Vec<TestRunSummary>> {
    serde_json::from_slice(body)
}

/// Parse an API timestamp into an instant.
///
/// Accepts RFC 3339 with an offset, or an offset-less ISO-8601 date-time
/// (optionally without seconds, optionally with a fraction) which is taken
/// to be in the local time zone. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?;

    resolve_local(&Local, naive)
}

/// Place a wall-clock time in `tz`.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times
/// skipped by a forward transition are moved forward by the hour the
/// clocks jumped, so `02:30` in a `02:00 -> 03:00` gap becomes `03:30`.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    let local = match tz.from_local_datetime(&naive) {
        LocalResult::None => tz.from_local_datetime(&(naive + Duration::hours(1))),
        found => found,
    };
    local.earliest().map(|dt| dt.with_timezone(&Utc))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}")))
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}"))),
    }
}

/// Identifiers may arrive as strings or numbers; numbers are stringified.
fn deserialize_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|id| match id {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}
