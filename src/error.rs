//! Error types and handling for the Skycast application

use thiserror::Error;

/// Main error type for the Skycast application
///
/// Every failure a fetch or lookup can produce carries its classification so
/// callers can choose between retry and "try a different search" messaging.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkycastError {
    /// Missing or rejected provider API key
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Connectivity failures (DNS, refused connections, broken transport)
    #[error("Network error: {message}")]
    Network { message: String },

    /// The provider did not answer within the request timeout
    #[error("Request timed out after {seconds}s")]
    RequestTimeout { seconds: u64 },

    /// 404-class provider response for a place that does not resolve
    #[error("Location not found")]
    LocationNotFound,

    /// Device geolocation permission was denied
    #[error("Geolocation permission denied")]
    GeolocationDenied,

    /// Device geolocation is not available on this system
    #[error("Geolocation unavailable")]
    GeolocationUnavailable,

    /// Device geolocation did not answer in time
    #[error("Geolocation request timed out")]
    GeolocationTimeout,

    /// Any other non-2xx provider response
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },
}

impl SkycastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Whether a user-initiated retry of the same request can succeed.
    ///
    /// Configuration problems need a fixed key, not a retry, and a 404 needs
    /// a different search term.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            SkycastError::Configuration { .. } | SkycastError::LocationNotFound
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycastError::Configuration { .. } => {
                "Weather API key is not configured. Please add SKYCAST_API__API_KEY to your environment."
                    .to_string()
            }
            SkycastError::Network { .. } => {
                "Unable to connect to weather service. Please check your internet connection."
                    .to_string()
            }
            SkycastError::RequestTimeout { .. } => "Request timeout. Please try again.".to_string(),
            SkycastError::LocationNotFound => {
                "Location not found. Please try a different search term.".to_string()
            }
            SkycastError::GeolocationDenied => {
                "Location access denied. Please enter a location manually.".to_string()
            }
            SkycastError::GeolocationUnavailable => {
                "Geolocation is not available on this device.".to_string()
            }
            SkycastError::GeolocationTimeout => {
                "Location request timed out. Please try again.".to_string()
            }
            SkycastError::Provider { status, .. } => {
                format!("Weather service returned an error ({status}). Please try again later.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = SkycastError::config("missing API key");
        assert!(matches!(config_err, SkycastError::Configuration { .. }));

        let net_err = SkycastError::network("connection refused");
        assert!(matches!(net_err, SkycastError::Network { .. }));

        let provider_err = SkycastError::provider(503, "service unavailable");
        assert!(matches!(
            provider_err,
            SkycastError::Provider { status: 503, .. }
        ));
    }

    #[test]
    fn test_user_messages() {
        let config_err = SkycastError::config("test");
        assert!(config_err.user_message().contains("API key"));

        let net_err = SkycastError::network("test");
        assert!(net_err.user_message().contains("Unable to connect"));

        let not_found = SkycastError::LocationNotFound;
        assert!(not_found.user_message().contains("different search term"));
    }

    #[test]
    fn test_retryability() {
        assert!(!SkycastError::config("no key").is_retryable());
        assert!(!SkycastError::LocationNotFound.is_retryable());
        assert!(SkycastError::network("down").is_retryable());
        assert!(SkycastError::RequestTimeout { seconds: 8 }.is_retryable());
        assert!(SkycastError::provider(500, "boom").is_retryable());
    }
}
