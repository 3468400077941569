//! Wait settings from YAML.

use crate::error::{Result, TarryError};
use crate::run::FlowInfo;
use crate::types::FlowKind;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables used when waits are decoded and activated.
///
/// ```yaml
/// default_dial_limit_seconds: 60
/// default_call_limit_seconds: 7200
/// dial_expiry_grace_seconds: 30
/// messaging_expire_after_minutes: 4320
/// voice_expire_after_minutes: 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaitSettings {
    /// Dial limit for dial waits that don't set one.
    pub default_dial_limit_seconds: u32,

    /// Call limit for dial waits that don't set one.
    pub default_call_limit_seconds: u32,

    /// Added to dial + call limit when computing a dial wait's expiry.
    pub dial_expiry_grace_seconds: u32,

    /// Expiry for messaging flows that don't define one.
    pub messaging_expire_after_minutes: u32,

    /// Expiry for voice flows that don't define one.
    pub voice_expire_after_minutes: u32,
}

fn default_dial_limit_seconds() -> u32 {
    60
}
fn default_call_limit_seconds() -> u32 {
    7200
}
fn default_dial_expiry_grace_seconds() -> u32 {
    30
}
fn default_messaging_expire_after_minutes() -> u32 {
    3 * 24 * 60
}
fn default_voice_expire_after_minutes() -> u32 {
    5
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            default_dial_limit_seconds: default_dial_limit_seconds(),
            default_call_limit_seconds: default_call_limit_seconds(),
            dial_expiry_grace_seconds: default_dial_expiry_grace_seconds(),
            messaging_expire_after_minutes: default_messaging_expire_after_minutes(),
            voice_expire_after_minutes: default_voice_expire_after_minutes(),
        }
    }
}

impl WaitSettings {
    /// Parse and validate settings from a YAML string.
    ///
    /// Missing keys take their default value.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml).map_err(|e| TarryError::Config {
            field: "settings".to_string(),
            cause: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| TarryError::Config {
            field: path.display().to_string(),
            cause: e.to_string(),
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Reject settings no wait could work with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("default_dial_limit_seconds", self.default_dial_limit_seconds),
            ("default_call_limit_seconds", self.default_call_limit_seconds),
            ("messaging_expire_after_minutes", self.messaging_expire_after_minutes),
            ("voice_expire_after_minutes", self.voice_expire_after_minutes),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(TarryError::Config {
                    field: field.to_string(),
                    cause: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    /// How long a run in `flow` may wait before it expires.
    ///
    /// The flow's own value wins; otherwise the fallback for its kind applies.
    /// Offline messaging flows share the messaging fallback.
    pub fn expire_after(&self, flow: &FlowInfo) -> Duration {
        let minutes = match flow.expire_after_minutes {
            Some(minutes) if minutes > 0 => minutes,
            _ => match flow.kind {
                FlowKind::Voice => self.voice_expire_after_minutes,
                FlowKind::Messaging | FlowKind::MessagingOffline => {
                    self.messaging_expire_after_minutes
                }
            },
        };
        Duration::minutes(i64::from(minutes))
    }

    /// How long after activation a dial wait expires.
    pub fn dial_expire_after(&self, dial_limit_seconds: u32, call_limit_seconds: u32) -> Duration {
        Duration::seconds(
            i64::from(dial_limit_seconds)
                + i64::from(call_limit_seconds)
                + i64::from(self.dial_expiry_grace_seconds),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let settings = WaitSettings::default();
        assert_eq!(settings.default_dial_limit_seconds, 60);
        assert_eq!(settings.default_call_limit_seconds, 7200);
        assert_eq!(settings.dial_expire_after(60, 7200), Duration::seconds(7290));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let settings = WaitSettings::from_yaml_str("default_dial_limit_seconds: 30\n").unwrap();
        assert_eq!(settings.default_dial_limit_seconds, 30);
        assert_eq!(settings.default_call_limit_seconds, 7200);
    }

    #[test]
    fn rejects_zero_limits_and_unknown_keys() {
        let err = WaitSettings::from_yaml_str("default_call_limit_seconds: 0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration 'default_call_limit_seconds': must be greater than zero"
        );
        assert!(WaitSettings::from_yaml_str("dial_limit: 3").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "voice_expire_after_minutes: 10").unwrap();
        let settings = WaitSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.voice_expire_after_minutes, 10);

        assert!(matches!(
            WaitSettings::from_file("/nonexistent/tarry.yaml"),
            Err(TarryError::Config { .. })
        ));
    }

    #[test]
    fn expire_after_falls_back_by_flow_kind() {
        let settings = WaitSettings::default();
        let voice = FlowInfo::new("IVR", FlowKind::Voice);
        assert_eq!(settings.expire_after(&voice), Duration::minutes(5));

        let messaging = FlowInfo::new("Survey", FlowKind::Messaging);
        assert_eq!(settings.expire_after(&messaging), Duration::days(3));

        let custom = messaging.with_expire_after_minutes(30);
        assert_eq!(settings.expire_after(&custom), Duration::minutes(30));
    }
}
