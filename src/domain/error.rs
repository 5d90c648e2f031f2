//! Domain error types.

use chrono::NaiveDateTime;

/// Top-level error type for simtrader.
#[derive(Debug, thiserror::Error)]
pub enum SimtraderError {
    #[error("event source {name} has no first event")]
    EmptySource { name: String },

    #[error("clock rewind: current time {current}, requested {requested}")]
    ClockRewind {
        current: NaiveDateTime,
        requested: NaiveDateTime,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SimtraderError> for std::process::ExitCode {
    fn from(err: &SimtraderError) -> Self {
        let code: u8 = match err {
            SimtraderError::Io(_) => 1,
            SimtraderError::ConfigParse { .. }
            | SimtraderError::ConfigMissing { .. }
            | SimtraderError::ConfigInvalid { .. } => 2,
            SimtraderError::Data { .. } => 3,
            SimtraderError::InvalidParameter { .. } => 4,
            SimtraderError::EmptySource { .. } | SimtraderError::ClockRewind { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_names_the_source() {
        let err = SimtraderError::EmptySource {
            name: "gbm:BHP".to_string(),
        };
        assert_eq!(err.to_string(), "event source gbm:BHP has no first event");
    }

    #[test]
    fn config_missing_message() {
        let err = SimtraderError::ConfigMissing {
            section: "simulation".to_string(),
            key: "start".to_string(),
        };
        assert_eq!(err.to_string(), "missing config key [simulation] start");
    }
}
