//! InfluxDB line-protocol sink.
//!
//! One point per test run:
//! `ui_test_results,test_name=<name>,status=<passed|failed> duration=<secs> <ns>`
//! posted to `POST {endpoint}/write?db={database}`. A single attempt with a
//! bounded request timeout; the reporter layer decides what a failure means.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;
use waypoint_common::TestOutcome;

use crate::{TelemetryError, TelemetrySink};

const MEASUREMENT: &str = "ui_test_results";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct InfluxSink {
    http: reqwest::Client,
    write_url: Url,
}

impl InfluxSink {
    pub fn new(endpoint: &str, database: &str) -> Result<Self, TelemetryError> {
        let base = Url::parse(endpoint).map_err(|e| TelemetryError::Endpoint(e.to_string()))?;
        let mut write_url = base
            .join("write")
            .map_err(|e| TelemetryError::Endpoint(e.to_string()))?;
        write_url
            .query_pairs_mut()
            .append_pair("db", database)
            .append_pair("precision", "ns");

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { http, write_url })
    }
}

#[async_trait]
impl TelemetrySink for InfluxSink {
    async fn write_point(&self, outcome: &TestOutcome) -> Result<(), TelemetryError> {
        let line = encode_line(outcome);
        debug!(%line, "writing outcome point");

        let response = self
            .http
            .post(self.write_url.clone())
            .body(line)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TelemetryError::Rejected {
                status: status.as_u16(),
                message: snip(&message),
            });
        }
        Ok(())
    }
}

/// Render one line-protocol point for the fixed schema.
pub(crate) fn encode_line(outcome: &TestOutcome) -> String {
    let timestamp_ns = outcome.completed_at.timestamp_nanos_opt().unwrap_or_default();
    format!(
        "{MEASUREMENT},test_name={},status={} duration={} {timestamp_ns}",
        escape_tag(&outcome.test_name),
        outcome.status.as_str(),
        outcome.duration_secs,
    )
}

/// Tag values must escape commas, spaces, and equals signs.
fn escape_tag(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, ',' | ' ' | '=') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn snip(body: &str) -> String {
    let mut snip = body.to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use waypoint_common::TestStatus;

    #[test]
    fn line_carries_measurement_tags_field_and_timestamp() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let end = start + chrono::Duration::milliseconds(12_340);
        let outcome = TestOutcome::new("career_journey", TestStatus::Passed, start, end);

        let line = encode_line(&outcome);
        let expected_ns = end.timestamp_nanos_opt().unwrap();
        assert_eq!(
            line,
            format!(
                "ui_test_results,test_name=career_journey,status=passed duration=12.34 {expected_ns}"
            )
        );
    }

    #[test]
    fn tag_values_with_spaces_and_commas_are_escaped() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let outcome = TestOutcome::new(
            "career journey, chrome",
            TestStatus::Failed,
            start,
            start + chrono::Duration::seconds(1),
        );

        let line = encode_line(&outcome);
        assert!(line.starts_with(
            r"ui_test_results,test_name=career\ journey\,\ chrome,status=failed "
        ));
    }

    #[test]
    fn rejected_endpoint_is_an_error_at_construction() {
        assert!(InfluxSink::new("not a url", "test_results").is_err());
    }
}
