//! Widget configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every field has a
//! default, so an empty file (or no file) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ChatError, Result};
use crate::session::ClientIdentity;

/// Root configuration of the assistant widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Base URL the `/chatbot/...` endpoints are resolved against.
    pub api_base_url: String,
    /// Per-request HTTP timeout.
    pub request_timeout_ms: u64,

    pub guest_name: String,
    pub platform: String,
    pub user_agent: String,

    /// Lower bound of the simulated typing delay before a reply is shown.
    pub typing_delay_min_ms: u64,
    /// Upper bound of the simulated typing delay.
    pub typing_delay_max_ms: u64,
    /// Delay before the fallback reply is shown after a failure.
    pub fallback_delay_ms: u64,

    /// Duration of one half of the launcher pulse (grow or shrink).
    pub pulse_phase_ms: u64,
    /// Interval between pulse animation frames.
    pub pulse_frame_ms: u64,

    /// Directory holding the persisted widget state. Platform config dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            request_timeout_ms: 10_000,
            guest_name: "Guest User".to_string(),
            platform: "web".to_string(),
            user_agent: format!("jobchat/{}", env!("CARGO_PKG_VERSION")),
            typing_delay_min_ms: 800,
            typing_delay_max_ms: 1300,
            fallback_delay_ms: 500,
            pulse_phase_ms: 1000,
            pulse_frame_ms: 50,
            storage_dir: None,
            log_filter: "info".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ChatError::config("api_base_url must not be empty"));
        }
        if self.typing_delay_min_ms > self.typing_delay_max_ms {
            return Err(ChatError::config(format!(
                "typing_delay_min_ms ({}) exceeds typing_delay_max_ms ({})",
                self.typing_delay_min_ms, self.typing_delay_max_ms
            )));
        }
        if self.pulse_phase_ms == 0 || self.pulse_frame_ms == 0 {
            return Err(ChatError::config(
                "pulse_phase_ms and pulse_frame_ms must be positive",
            ));
        }
        Ok(())
    }

    pub fn identity(&self) -> ClientIdentity {
        ClientIdentity {
            guest_name: self.guest_name.clone(),
            platform: self.platform.clone(),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn typing_delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.typing_delay_min_ms),
            Duration::from_millis(self.typing_delay_max_ms),
        )
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    pub fn pulse_phase(&self) -> Duration {
        Duration::from_millis(self.pulse_phase_ms)
    }

    pub fn pulse_frame(&self) -> Duration {
        Duration::from_millis(self.pulse_frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WidgetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.typing_delay_range(),
            (Duration::from_millis(800), Duration::from_millis(1300))
        );
        assert_eq!(config.fallback_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: WidgetConfig = toml::from_str(
            r#"
            api_base_url = "https://jobs.example.com/api"
            typing_delay_min_ms = 0
            typing_delay_max_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://jobs.example.com/api");
        assert_eq!(config.typing_delay_max_ms, 0);
        assert_eq!(config.guest_name, "Guest User");
        assert_eq!(config.fallback_delay_ms, 500);
    }

    #[test]
    fn test_inverted_typing_range_is_rejected() {
        let config = WidgetConfig {
            typing_delay_min_ms: 2000,
            typing_delay_max_ms: 100,
            ..WidgetConfig::default()
        };
        assert!(matches!(config.validate(), Err(ChatError::Config(_))));
    }

    #[test]
    fn test_zero_pulse_frame_is_rejected() {
        let config = WidgetConfig {
            pulse_frame_ms: 0,
            ..WidgetConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
