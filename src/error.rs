use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConformanceError {
    #[error("Value set '{id}' cannot be found in the library")]
    ValueSetNotFound { id: String },

    #[error("Specification error: {message}")]
    Specification { message: String },

    #[error("Binding location error: {message}")]
    BindingLocation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Runtime error: {message}")]
    Runtime { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConformanceError {
    pub fn value_set_not_found(id: impl Into<String>) -> Self {
        Self::ValueSetNotFound { id: id.into() }
    }

    pub fn specification(message: impl Into<String>) -> Self {
        Self::Specification {
            message: message.into(),
        }
    }

    pub fn binding_location(message: impl Into<String>) -> Self {
        Self::BindingLocation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The bare message carried by the error, without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Specification { message }
            | Self::BindingLocation { message }
            | Self::Configuration { message }
            | Self::Runtime { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConformanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_strips_prefix() {
        let err = ConformanceError::specification("no value set was found");
        assert_eq!(err.detail(), "no value set was found");
        assert_eq!(err.to_string(), "Specification error: no value set was found");
    }

    #[test]
    fn test_not_found_message() {
        let err = ConformanceError::value_set_not_found("HL70001");
        assert_eq!(
            err.detail(),
            "Value set 'HL70001' cannot be found in the library"
        );
    }
}
