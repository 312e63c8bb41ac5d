use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Client id plus access token obtained by the bootstrap handshake.
///
/// Lives for a single run; there is no expiry tracking.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    access_token: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            access_token: access_token.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Origin and destination city names, exactly as the operator directory spells them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripPair {
    pub origin: String,
    pub destination: String,
}

impl TripPair {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripRequest {
    pub origin_id: i64,
    pub destination_id: i64,
    pub departure_date: NaiveDate,
}

impl TripRequest {
    pub fn query(&self) -> RouteQuery {
        RouteQuery {
            origin: self.origin_id,
            destination: self.destination_id,
            departure_date: self.departure_date.format("%Y-%m-%d").to_string(),
            availability: true,
        }
    }
}

/// JSON body of a route query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    pub origin: i64,
    pub destination: i64,
    pub departure_date: String,
    pub availability: bool,
}

/// Requests of one run, in (date, trip pair) order. Duplicates are kept.
pub type Batch = Vec<TripRequest>;

/// Status used when the transport call itself failed and no HTTP status exists.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status_code: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::new(TRANSPORT_FAILURE_STATUS, message)
    }
}

/// `%s` renders the Unix timestamp, so the datetime reads
/// `2024-01-01 12:30:1704112200`. Downstream consumers parse this exact shape.
pub const COLLECTION_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%s";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStamp {
    pub timezone: String,
    pub datetime: String,
}

impl CollectionStamp {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            timezone: "UTC".to_string(),
            datetime: instant.format(COLLECTION_DATETIME_FORMAT).to_string(),
        }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }
}

/// A usable route-query answer: the decoded response object with its
/// collection stamp appended alongside the operator's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(flatten)]
    body: Map<String, Value>,
    collect_at: CollectionStamp,
}

impl RouteRecord {
    /// Returns `None` when the body carries no `result.servicesList` array.
    /// An operator field named `collect_at` is replaced by the stamp.
    pub fn new(mut body: Map<String, Value>, collect_at: CollectionStamp) -> Option<Self> {
        services_of(&body)?;
        body.shift_remove("collect_at");
        Some(Self { body, collect_at })
    }

    pub fn services(&self) -> &[Value] {
        services_of(&self.body).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn collect_at(&self) -> &CollectionStamp {
        &self.collect_at
    }
}

fn services_of(body: &Map<String, Value>) -> Option<&Vec<Value>> {
    body.get("result")?.get("servicesList")?.as_array()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    #[serde(rename = "response.body")]
    pub body: String,
    #[serde(rename = "response.code")]
    pub status_code: u16,
    pub collect_at: CollectionStamp,
}

impl FailureRecord {
    pub fn new(response: RawResponse, collect_at: CollectionStamp) -> Self {
        Self {
            body: response.body,
            status_code: response.status_code,
            collect_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedRecord {
    Route(RouteRecord),
    Failure(FailureRecord),
}

impl ClassifiedRecord {
    pub fn is_route(&self) -> bool {
        matches!(self, ClassifiedRecord::Route(_))
    }
}

/// Output of the fetch stage: requests and their responses, position for position.
#[derive(Debug, Clone)]
pub struct FetchedBatch {
    pub requests: Batch,
    pub responses: Vec<RawResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub routes_path: String,
    pub failures_path: String,
    pub route_count: usize,
    pub failure_count: usize,
}
