use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Failure kinds surfaced at the engine boundary.
///
/// Store and provider failures are wrapped as `Upstream` so callers can tell
/// client mistakes (`InvalidInput`, `NotFound`) apart from unexpected faults.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("upstream failure: {0:#}")]
    Upstream(anyhow::Error),

    #[error("record store unavailable")]
    Unavailable,
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Upstream(err)
    }
}

impl EngineError {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidInput(_) => "invalid_input",
            EngineError::NotFound(_) => "not_found",
            EngineError::Upstream(_) => "upstream_failure",
            EngineError::Unavailable => "unavailable",
        }
    }
}

/// Parses a user id path segment. Only positive integers are accepted.
pub fn parse_user_id(raw: &str) -> EngineResult<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput("userId is required".to_string()));
    }
    match trimmed.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(EngineError::InvalidInput(format!(
            "userId must be a positive integer (got {trimmed:?})"
        ))),
    }
}

pub fn parse_recommendation_id(raw: &str) -> EngineResult<uuid::Uuid> {
    uuid::Uuid::parse_str(raw.trim()).map_err(|_| {
        EngineError::InvalidInput(format!("recommendationId must be a UUID (got {raw:?})"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_user_id_accepts_positive_integers() {
        assert_eq!(parse_user_id("42").unwrap(), 42);
        assert_eq!(parse_user_id(" 7 ").unwrap(), 7);
    }

    #[test]
    fn parse_user_id_rejects_garbage() {
        for raw in ["", "abc", "-3", "0", "1.5"] {
            let err = parse_user_id(raw).unwrap_err();
            assert!(matches!(err, EngineError::InvalidInput(_)), "{raw:?}");
        }
    }

    #[test]
    fn parse_recommendation_id_requires_uuid() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_recommendation_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_recommendation_id("1700000000000"),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
