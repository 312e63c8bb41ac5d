use crate::domain::model::{
    ClassifiedRecord, CollectionStamp, FailureRecord, RawResponse, RouteRecord,
    TRANSPORT_FAILURE_STATUS,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;

/// Why a response did not yield route data. Only logged; the failure record
/// itself keeps the raw status and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Transport,
    Unauthorized,
    UnexpectedStatus,
    NotJson,
    Unsuccessful,
    MissingServiceList,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureReason::Transport => "request never reached the endpoint",
            FailureReason::Unauthorized => "could not authenticate to the endpoint",
            FailureReason::UnexpectedStatus => "endpoint answered with a non-200 status",
            FailureReason::NotJson => "body is not a JSON object",
            FailureReason::Unsuccessful => "body does not report success",
            FailureReason::MissingServiceList => "body carries no result.servicesList",
        };
        f.write_str(text)
    }
}

/// Classifies with the current time as collection stamp.
pub fn classify(response: RawResponse) -> ClassifiedRecord {
    classify_at(response, Utc::now())
}

pub fn classify_at(response: RawResponse, collected_at: DateTime<Utc>) -> ClassifiedRecord {
    let stamp = CollectionStamp::at(collected_at);

    match decode(&response) {
        Ok(body) => match RouteRecord::new(body, stamp.clone()) {
            Some(record) => ClassifiedRecord::Route(record),
            None => fail(response, stamp, FailureReason::MissingServiceList),
        },
        Err(reason) => fail(response, stamp, reason),
    }
}

/// Classifies a whole fetched batch. Every record shares one collection
/// instant, taken when classification starts.
pub fn classify_batch(responses: Vec<RawResponse>) -> Vec<ClassifiedRecord> {
    let collected_at = Utc::now();
    responses
        .into_iter()
        .map(|response| classify_at(response, collected_at))
        .collect()
}

fn decode(response: &RawResponse) -> std::result::Result<Map<String, Value>, FailureReason> {
    match response.status_code {
        200 => {}
        TRANSPORT_FAILURE_STATUS => return Err(FailureReason::Transport),
        401 => return Err(FailureReason::Unauthorized),
        _ => return Err(FailureReason::UnexpectedStatus),
    }

    let body = match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Object(body)) => body,
        _ => return Err(FailureReason::NotJson),
    };

    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(FailureReason::Unsuccessful);
    }

    Ok(body)
}

fn fail(response: RawResponse, stamp: CollectionStamp, reason: FailureReason) -> ClassifiedRecord {
    tracing::warn!(
        "⚠️ Invalid call ({}): STATUS: {} BODY: {}",
        reason,
        response.status_code,
        response.body
    );
    ClassifiedRecord::Failure(FailureRecord::new(response, stamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
    }

    fn failure_of(record: ClassifiedRecord) -> FailureRecord {
        match record {
            ClassifiedRecord::Failure(failure) => failure,
            ClassifiedRecord::Route(route) => panic!("expected failure, got {:?}", route),
        }
    }

    #[test]
    fn ok_json_success_is_route_record() {
        let body = json!({"success": true, "result": {"servicesList": [{"price": 120.5}]}});
        let record = classify_at(RawResponse::new(200, body.to_string()), at());

        match record {
            ClassifiedRecord::Route(route) => {
                assert_eq!(route.services(), &[json!({"price": 120.5})]);
                assert_eq!(route.collect_at(), &CollectionStamp::at(at()));
            }
            other => panic!("expected route, got {:?}", other),
        }
    }

    #[test]
    fn ok_json_without_success_is_failure() {
        let body = json!({"success": false, "result": {"servicesList": []}}).to_string();
        let failure = failure_of(classify_at(RawResponse::new(200, body.clone()), at()));
        assert_eq!(failure.status_code, 200);
        assert_eq!(failure.body, body);
    }

    #[test]
    fn ok_non_json_is_failure() {
        let failure = failure_of(classify_at(RawResponse::new(200, "<html/>"), at()));
        assert_eq!(failure.body, "<html/>");
    }

    #[test]
    fn json_array_is_failure() {
        assert!(!classify_at(RawResponse::new(200, "[]"), at()).is_route());
    }

    #[test]
    fn non_ok_status_is_failure_whatever_the_body() {
        let body = json!({"success": true, "result": {"servicesList": []}}).to_string();
        for status in [401, 404, 500, 503] {
            let failure = failure_of(classify_at(RawResponse::new(status, body.clone()), at()));
            assert_eq!(failure.status_code, status);
        }
    }

    #[test]
    fn transport_failure_is_failure() {
        let failure = failure_of(classify_at(RawResponse::transport_failure("refused"), at()));
        assert_eq!(failure.status_code, TRANSPORT_FAILURE_STATUS);
        assert_eq!(failure.body, "refused");
    }

    #[test]
    fn success_without_service_list_is_failure() {
        let body = json!({"success": true, "result": {}}).to_string();
        assert!(!classify_at(RawResponse::new(200, body), at()).is_route());
    }

    #[test]
    fn batch_shares_one_stamp_and_keeps_order() {
        let ok = json!({"success": true, "result": {"servicesList": []}}).to_string();
        let records = classify_batch(vec![
            RawResponse::new(500, "x"),
            RawResponse::new(200, ok),
            RawResponse::transport_failure("timeout"),
        ]);

        assert_eq!(records.len(), 3);
        assert!(!records[0].is_route());
        assert!(records[1].is_route());
        assert!(!records[2].is_route());

        let stamps: Vec<&CollectionStamp> = records
            .iter()
            .map(|record| match record {
                ClassifiedRecord::Route(route) => route.collect_at(),
                ClassifiedRecord::Failure(failure) => &failure.collect_at,
            })
            .collect();
        assert!(stamps.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
