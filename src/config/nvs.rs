//! NVS persistence for link overrides with schema versioning.
//!
//! Lets a deployed board change the listener endpoint, mode and sample rate
//! without a reflash. Anything not stored keeps its build-time value.
//! The namespace is provisioned from outside (NVS partition image), the
//! firmware only reads it.
//!
//! # Version History
//!
//! - **v1** (current): remote_host, remote_port, mode, sample_rate

use core::cmp::Ordering;

use super::{LinkConfig, Mode};

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

/// Current NVS schema version for link overrides
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// NVS namespace for link configuration
pub const NVS_NAMESPACE: &str = "voice_link";

/// NVS key for schema version
#[cfg(target_os = "espidf")]
const VERSION_KEY: &str = "schema_ver";

#[cfg(target_os = "espidf")]
const HOST_KEY: &str = "remote_host";
#[cfg(target_os = "espidf")]
const PORT_KEY: &str = "remote_port";
#[cfg(target_os = "espidf")]
const MODE_KEY: &str = "mode";
#[cfg(target_os = "espidf")]
const RATE_KEY: &str = "sample_rate";

/// Longest host name accepted from NVS.
#[cfg(target_os = "espidf")]
const MAX_HOST_LEN: usize = 64;

/// Migration result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationResult {
    /// Nothing stored yet, build-time configuration used as is
    FreshInstall,
    /// Schema up-to-date, overrides applied
    UpToDate,
}

/// NVS operation errors
#[derive(Debug)]
pub enum NvsError {
    /// NVS initialization failed
    #[cfg(target_os = "espidf")]
    InitFailed(EspError),
    /// Schema version too new (downgrade not supported)
    TooNew { stored_version: u32 },
    /// NVS read/write error
    #[cfg(target_os = "espidf")]
    IoError(EspError),
    /// Unsupported migration path
    UnsupportedMigration { from: u32, to: u32 },
    /// Feature not available on this platform
    #[cfg(not(target_os = "espidf"))]
    NotAvailable,
}

#[cfg(target_os = "espidf")]
impl From<EspError> for NvsError {
    fn from(e: EspError) -> Self {
        NvsError::IoError(e)
    }
}

impl core::fmt::Display for NvsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(target_os = "espidf")]
            Self::InitFailed(e) => write!(f, "NVS init failed: {}", e),
            Self::TooNew { stored_version } => {
                write!(f, "stored schema v{} is newer than v{}", stored_version, CURRENT_SCHEMA_VERSION)
            }
            #[cfg(target_os = "espidf")]
            Self::IoError(e) => write!(f, "NVS I/O error: {}", e),
            Self::UnsupportedMigration { from, to } => {
                write!(f, "no migration from v{} to v{}", from, to)
            }
            #[cfg(not(target_os = "espidf"))]
            Self::NotAvailable => f.write_str("NVS not available on this platform"),
        }
    }
}

impl std::error::Error for NvsError {}

/// Values read from NVS. `None` keeps the build-time value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredOverrides {
    pub remote_host: Option<String>,
    pub remote_port: Option<u16>,
    pub mode: Option<Mode>,
    pub sample_rate: Option<u32>,
}

impl StoredOverrides {
    /// Apply to `config`. Empty hosts and zero ports/rates are ignored.
    pub fn apply(&self, config: &mut LinkConfig) {
        if let Some(host) = self.remote_host.as_deref().map(str::trim) {
            if !host.is_empty() {
                config.network.remote_host = host.to_string();
            }
        }
        if let Some(port) = self.remote_port.filter(|p| *p != 0) {
            config.network.remote_port = port;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(rate) = self.sample_rate.filter(|r| *r != 0) {
            config.audio.sample_rate = rate;
        }
    }
}

/// Decide what to do with the stored schema version.
///
/// `Ok(None)` means nothing to load (fresh install).
pub fn check_schema(stored_version: u32) -> Result<Option<MigrationResult>, NvsError> {
    match stored_version.cmp(&CURRENT_SCHEMA_VERSION) {
        Ordering::Equal => Ok(Some(MigrationResult::UpToDate)),
        Ordering::Less if stored_version == 0 => Ok(None),
        Ordering::Less => Err(NvsError::UnsupportedMigration {
            from: stored_version,
            to: CURRENT_SCHEMA_VERSION,
        }),
        Ordering::Greater => Err(NvsError::TooNew { stored_version }),
    }
}

/// Load overrides from NVS into `config`.
#[cfg(target_os = "espidf")]
pub fn load_overrides(
    partition: EspDefaultNvsPartition,
    config: &mut LinkConfig,
) -> Result<MigrationResult, NvsError> {
    let storage = EspNvs::new(partition, NVS_NAMESPACE, true).map_err(NvsError::InitFailed)?;

    let stored_version = storage.get_u32(VERSION_KEY)?.unwrap_or(0);
    let result = match check_schema(stored_version)? {
        Some(result) => result,
        None => return Ok(MigrationResult::FreshInstall),
    };

    read_v1(&storage)?.apply(config);
    Ok(result)
}

/// Stub for non-ESP platforms
#[cfg(not(target_os = "espidf"))]
pub fn load_overrides(_config: &mut LinkConfig) -> Result<MigrationResult, NvsError> {
    Err(NvsError::NotAvailable)
}

// ========================================
// v1 Schema Load
// ========================================

#[cfg(target_os = "espidf")]
fn read_v1(storage: &EspNvs<NvsDefault>) -> Result<StoredOverrides, NvsError> {
    let mut host_buf = [0u8; MAX_HOST_LEN + 1];
    let remote_host = storage.get_str(HOST_KEY, &mut host_buf)?.map(str::to_string);

    Ok(StoredOverrides {
        remote_host,
        remote_port: storage.get_u16(PORT_KEY)?,
        mode: storage.get_u8(MODE_KEY)?.map(Mode::from_u8),
        sample_rate: storage.get_u32(RATE_KEY)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_fresh_install() {
        assert!(matches!(check_schema(0), Ok(None)));
    }

    #[test]
    fn test_schema_current() {
        assert!(matches!(check_schema(1), Ok(Some(MigrationResult::UpToDate))));
    }

    #[test]
    fn test_schema_too_new() {
        assert!(matches!(check_schema(7), Err(NvsError::TooNew { stored_version: 7 })));
    }

    #[test]
    fn test_apply_ignores_empty_values() {
        let mut config = LinkConfig::default();
        let before = config.clone();
        StoredOverrides {
            remote_host: Some("   ".into()),
            remote_port: Some(0),
            mode: None,
            sample_rate: Some(0),
        }
        .apply(&mut config);
        assert_eq!(config, before);
    }

    #[test]
    fn test_apply_overrides_fields() {
        let mut config = LinkConfig::default();
        StoredOverrides {
            remote_host: Some("10.0.0.7".into()),
            remote_port: Some(4000),
            mode: Some(Mode::Stream),
            sample_rate: Some(16_000),
        }
        .apply(&mut config);
        assert_eq!(config.network.remote_host, "10.0.0.7");
        assert_eq!(config.network.remote_port, 4000);
        assert_eq!(config.mode, Mode::Stream);
        assert_eq!(config.audio.sample_rate, 16_000);
    }

    #[test]
    fn test_missing_keys_keep_build_values() {
        let mut config = LinkConfig::default();
        StoredOverrides {
            remote_port: Some(4000),
            ..Default::default()
        }
        .apply(&mut config);

        let mut expected = LinkConfig::default();
        expected.network.remote_port = 4000;
        assert_eq!(config, expected);
    }

    #[test]
    fn test_nvs_namespace_constant() {
        assert_eq!(NVS_NAMESPACE, "voice_link");
    }
}
