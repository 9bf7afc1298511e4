use thiserror::Error;

/// Run field a validation rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunField {
    Path,
    Method,
    Concurrency,
    Duration,
    InvalidPercent,
    Body,
}

impl RunField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RunField::Path => "path",
            RunField::Method => "method",
            RunField::Concurrency => "concurrency",
            RunField::Duration => "duration",
            RunField::InvalidPercent => "invalid_percent",
            RunField::Body => "body",
        }
    }
}

impl std::fmt::Display for RunField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Path must not be empty.")]
    PathEmpty,
    #[error("Path '{path}' should start with '/'.")]
    PathMissingLeadingSlash { path: String },
    #[error("Unsupported method '{value}'. Use GET, POST, PUT, PATCH, or DELETE.")]
    UnsupportedMethod { value: String },
    #[error("Concurrency '{value}' is not a finite number.")]
    ConcurrencyNotNumber { value: String },
    #[error("Concurrency must be greater than 0 (got '{value}').")]
    ConcurrencyNotPositive { value: String },
    #[error("Concurrency must be at most {max} (got '{value}').")]
    ConcurrencyTooLarge { value: String, max: usize },
    #[error("Duration '{value}' is not a valid duration.")]
    DurationNotNumber { value: String },
    #[error("Duration must be between {min_ms} ms and {max_ms} ms (got {value_ms} ms).")]
    DurationOutOfRange {
        value_ms: u64,
        min_ms: u64,
        max_ms: u64,
    },
    #[error("Invalid ratio '{value}' is not a finite percentage with at most 4 decimals.")]
    InvalidPercentNotNumber { value: String },
    #[error("Invalid ratio must be between {min}% and {max}% (got {value}%).")]
    InvalidPercentOutOfRange {
        value: String,
        min: String,
        max: String,
    },
    #[error("Invalid limits: min {field} must be <= max.")]
    LimitsInverted { field: RunField },
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration overflow.")]
    DurationOverflow,
}

impl ValidationError {
    /// Field the failing rule belongs to, when it belongs to one.
    #[must_use]
    pub const fn field(&self) -> Option<RunField> {
        match self {
            ValidationError::PathEmpty | ValidationError::PathMissingLeadingSlash { .. } => {
                Some(RunField::Path)
            }
            ValidationError::UnsupportedMethod { .. } => Some(RunField::Method),
            ValidationError::ConcurrencyNotNumber { .. }
            | ValidationError::ConcurrencyNotPositive { .. }
            | ValidationError::ConcurrencyTooLarge { .. } => Some(RunField::Concurrency),
            ValidationError::DurationNotNumber { .. }
            | ValidationError::DurationOutOfRange { .. }
            | ValidationError::DurationEmpty
            | ValidationError::InvalidDurationUnit { .. }
            | ValidationError::DurationOverflow => Some(RunField::Duration),
            ValidationError::InvalidPercentNotNumber { .. }
            | ValidationError::InvalidPercentOutOfRange { .. } => Some(RunField::InvalidPercent),
            ValidationError::LimitsInverted { field } => Some(*field),
            ValidationError::InvalidHeaderFormat { .. } | ValidationError::ValueTooSmall { .. } => {
                None
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("Request body must be valid JSON: {source}")]
pub struct MalformedBodyError {
    #[source]
    pub source: serde_json::Error,
}

/// Rejection of raw run input, raised before any run state exists.
#[derive(Debug, Error)]
pub enum RunConfigError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    MalformedBody(#[from] MalformedBodyError),
}

impl RunConfigError {
    #[must_use]
    pub const fn field(&self) -> Option<RunField> {
        match self {
            RunConfigError::Validation(err) => err.field(),
            RunConfigError::MalformedBody(_) => Some(RunField::Body),
        }
    }
}
