//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error into a `ConfigError`, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_openai(config, &mut result);
        Self::validate_poll(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_openai(config: &Config, result: &mut ValidationResult) {
        let openai = &config.openai;

        if !openai.base_url.starts_with("http://") && !openai.base_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "openai.base_url",
                format!("base_url must start with http:// or https://, got '{}'", openai.base_url),
            ));
        }

        if openai.model.is_empty() {
            result.add_error(ValidationError::new("openai.model", "Model cannot be empty"));
        }

        if openai.request_timeout_secs == 0 {
            result.add_warning(ValidationWarning::new(
                "openai.request_timeout_secs",
                "request_timeout_secs is 0, remote calls will not time out",
            ));
        }
    }

    fn validate_poll(config: &Config, result: &mut ValidationResult) {
        if config.poll.interval_ms == 0 {
            result.add_error(ValidationError::new(
                "poll.interval_ms",
                "interval_ms must be greater than 0",
            ));
        }

        if config.poll.timeout_secs == 0 {
            result.add_warning(ValidationWarning::new(
                "poll.timeout_secs",
                "timeout_secs is 0, runs that never finish will be polled forever",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
