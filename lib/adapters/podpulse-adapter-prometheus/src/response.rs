use std::collections::HashMap;

use serde::Deserialize;

use podpulse_domain::MetricSample;
use podpulse_ports::MetricsError;

const POD_LABEL: &str = "pod";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct VectorSample {
    #[serde(default)]
    metric: HashMap<String, String>,
    /// `[unix_seconds, "value"]`.
    #[serde(default)]
    value: Option<(serde_json::Value, String)>,
}

/// Decodes an instant-query body into per-pod samples. Series without a
/// `pod` label or with an unparsable value are skipped; non-vector results
/// yield nothing.
pub(crate) fn decode_samples(body: &str) -> Result<Vec<MetricSample>, MetricsError> {
    let response: QueryResponse =
        serde_json::from_str(body).map_err(|err| MetricsError::Decode(err.to_string()))?;
    if response.status != "success" {
        return Err(MetricsError::Backend {
            status: 200,
            message: response.error.unwrap_or(response.status),
        });
    }

    let Some(serde_json::Value::Array(series)) = response.data.map(|data| data.result) else {
        return Ok(Vec::new());
    };

    let samples = series
        .into_iter()
        .filter_map(|raw| serde_json::from_value::<VectorSample>(raw).ok())
        .filter_map(|sample| {
            let pod = sample.metric.get(POD_LABEL)?.clone();
            let (_, raw_value) = sample.value?;
            let value = raw_value.parse::<f64>().ok()?;
            Some(MetricSample::new(pod, value))
        })
        .collect();
    Ok(samples)
}
