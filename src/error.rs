use thiserror::Error;

/// Failures raised by the planning core. All of them are detected before any
/// demand state is modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PlanError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PlanError::InvalidParameter(msg.into())
    }
}

/// Checks that a radius-like parameter is a positive finite number.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<(), PlanError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlanError::invalid(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}
