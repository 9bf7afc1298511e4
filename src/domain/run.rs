use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RunField, ValidationError};

/// Denominator of [`InvalidRatio`]: one million parts.
pub const PPM_SCALE: u32 = 1_000_000;
/// Parts-per-million in one percent.
pub(crate) const PPM_PER_PERCENT: u32 = 10_000;

pub const DEFAULT_MIN_DURATION_MS: u64 = 10_000;
pub const DEFAULT_MAX_DURATION_MS: u64 = 300_000;
/// 0.01 %
pub const DEFAULT_MIN_INVALID_PPM: u32 = 100;
/// 1 %
pub const DEFAULT_MAX_INVALID_PPM: u32 = 10_000;
/// Upper bound on workers per run.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// GET requests never carry a body, whatever the template says.
    #[must_use]
    pub const fn sends_body(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl FromStr for HttpMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ]
        .into_iter()
        .find(|method| method.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| ValidationError::UnsupportedMethod {
            value: s.to_owned(),
        })
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability of targeting the invalid path, in parts per million.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InvalidRatio(u32);

impl InvalidRatio {
    #[must_use]
    pub const fn from_ppm(ppm: u32) -> Self {
        Self(ppm)
    }

    #[must_use]
    pub const fn ppm(self) -> u32 {
        self.0
    }

    /// Percent with at least two decimals, e.g. `0.10` or `0.015`.
    #[must_use]
    pub fn percent_text(self) -> String {
        let whole = self.0.checked_div(PPM_PER_PERCENT).unwrap_or(0);
        let frac = self.0.checked_rem(PPM_PER_PERCENT).unwrap_or(0);
        let mut frac_text = format!("{:04}", frac);
        while frac_text.len() > 2 && frac_text.ends_with('0') {
            frac_text.pop();
        }
        format!("{}.{}", whole, frac_text)
    }
}

/// Inclusive windows the validator enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLimits {
    min_duration_ms: u64,
    max_duration_ms: u64,
    min_invalid: InvalidRatio,
    max_invalid: InvalidRatio,
    max_concurrency: usize,
}

impl RunLimits {
    /// Builds limits from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns an error when a minimum exceeds its maximum.
    pub fn new(
        min_duration_ms: u64,
        max_duration_ms: u64,
        min_invalid: InvalidRatio,
        max_invalid: InvalidRatio,
    ) -> Result<Self, ValidationError> {
        if min_duration_ms > max_duration_ms {
            return Err(ValidationError::LimitsInverted {
                field: RunField::Duration,
            });
        }
        if min_invalid.ppm() > max_invalid.ppm() {
            return Err(ValidationError::LimitsInverted {
                field: RunField::InvalidPercent,
            });
        }
        Ok(Self {
            min_duration_ms,
            max_duration_ms,
            min_invalid,
            max_invalid,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        })
    }

    /// Replaces the worker cap.
    ///
    /// # Errors
    ///
    /// Returns an error when `max_concurrency` is zero.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Result<Self, ValidationError> {
        if max_concurrency == 0 {
            return Err(ValidationError::ValueTooSmall { min: 1 });
        }
        self.max_concurrency = max_concurrency;
        Ok(self)
    }

    #[must_use]
    pub const fn min_duration_ms(&self) -> u64 {
        self.min_duration_ms
    }

    #[must_use]
    pub const fn max_duration_ms(&self) -> u64 {
        self.max_duration_ms
    }

    #[must_use]
    pub const fn min_invalid(&self) -> InvalidRatio {
        self.min_invalid
    }

    #[must_use]
    pub const fn max_invalid(&self) -> InvalidRatio {
        self.max_invalid
    }

    #[must_use]
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            min_duration_ms: DEFAULT_MIN_DURATION_MS,
            max_duration_ms: DEFAULT_MAX_DURATION_MS,
            min_invalid: InvalidRatio::from_ppm(DEFAULT_MIN_INVALID_PPM),
            max_invalid: InvalidRatio::from_ppm(DEFAULT_MAX_INVALID_PPM),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Parsed request body template.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyTemplate {
    /// A JSON object, extended with diagnostic fields per request.
    Object(Map<String, Value>),
    /// Any other JSON value, wrapped as `{"value": ...}` per request.
    ///
    /// Arrays and `null` land here too: they are nested under `value`
    /// rather than spread into the body, so every request body stays a
    /// JSON object with the template content intact.
    Scalar(Value),
}

impl From<Value> for BodyTemplate {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => BodyTemplate::Object(map),
            other @ (Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Array(_)) => BodyTemplate::Scalar(other),
        }
    }
}

/// Validated, immutable parameters of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub(super) path: String,
    pub(super) method: HttpMethod,
    pub(super) body: Option<BodyTemplate>,
    pub(super) concurrency: NonZeroUsize,
    pub(super) duration: Duration,
    pub(super) invalid_ratio: InvalidRatio,
}

impl RunConfig {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    #[must_use]
    pub const fn body(&self) -> Option<&BodyTemplate> {
        self.body.as_ref()
    }

    /// Number of workers the run spawns.
    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency.get()
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn invalid_ratio(&self) -> InvalidRatio {
        self.invalid_ratio
    }
}
