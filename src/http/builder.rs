use serde_json::{Map, Value};

use crate::domain::{BodyTemplate, HttpMethod, RunConfig};
use crate::error::HttpError;

use super::random::RandomSource;

/// Suffix appended to the configured path for invalid-target requests.
pub const INVALID_PATH_SUFFIX: &str = "-invalid";

const SEQ_FIELD: &str = "_seq";
const INVALID_FIELD: &str = "invalid";
const TOKEN_FIELD: &str = "_rnd";
const SCALAR_FIELD: &str = "value";

/// One concrete request, ready for a [`super::RequestExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub seq: u64,
    pub path: String,
    pub method: HttpMethod,
    pub invalid: bool,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// Builds request `seq` for `config`.
///
/// One uniform draw decides whether the request targets the invalid path;
/// a second supplies the correlation token when a body is sent. Nothing
/// shared is touched.
///
/// # Errors
///
/// Returns an error when the body cannot be serialized.
pub fn build_request<R>(
    config: &RunConfig,
    seq: u64,
    headers: &[(String, String)],
    rng: &mut R,
) -> Result<PreparedRequest, HttpError>
where
    R: RandomSource + ?Sized,
{
    let invalid = rng.roll_ppm() < config.invalid_ratio().ppm();
    let path = if invalid {
        format!("{}{}", config.path(), INVALID_PATH_SUFFIX)
    } else {
        config.path().to_owned()
    };

    let body = match config.body() {
        Some(template) if config.method().sends_body() => {
            let payload = render_body(template, seq, invalid, rng.correlation_token());
            Some(serde_json::to_vec(&payload).map_err(|err| HttpError::EncodeBody { source: err })?)
        }
        Some(_) | None => None,
    };

    Ok(PreparedRequest {
        seq,
        path,
        method: config.method(),
        invalid,
        headers: headers.to_vec(),
        body,
    })
}

fn render_body(template: &BodyTemplate, seq: u64, invalid: bool, token: String) -> Value {
    let mut payload = match template {
        BodyTemplate::Object(map) => map.clone(),
        BodyTemplate::Scalar(value) => {
            let mut map = Map::new();
            map.insert(SCALAR_FIELD.to_owned(), value.clone());
            map
        }
    };
    payload.insert(SEQ_FIELD.to_owned(), Value::from(seq));
    payload.insert(INVALID_FIELD.to_owned(), Value::Bool(invalid));
    payload.insert(TOKEN_FIELD.to_owned(), Value::String(token));
    Value::Object(payload)
}
