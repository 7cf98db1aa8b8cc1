//! Settings store for lgremote.
//!
//! One YAML file (`~/.lgtv.yaml` by default) maps device names to the
//! television's host and paired identity. It is loaded once at startup,
//! merged with `LGTV_<DEVICE>__<FIELD>` environment overrides, and is
//! immutable afterwards. The only write path is
//! [`Settings::persist_client_key`], which updates the file on disk after a
//! first pairing without touching the loaded store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{debug, info};

use lgremote_api::MacAddress;

/// Settings file name, relative to the home directory.
pub const SETTINGS_FILE: &str = ".lgtv.yaml";

/// Prefix for environment overrides, e.g. `LGTV_LIVING_ROOM__HOST`.
const ENV_PREFIX: &str = "LGTV_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("no settings for device '{name}'")]
    NotFound { name: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("settings loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── File entries ────────────────────────────────────────────────────

/// One device entry as written in the YAML file.
#[derive(Debug, Deserialize)]
struct DeviceEntry {
    /// IP address or host name of the television.
    host: String,

    /// Client key issued at pairing. All-digit keys arrive as numbers when
    /// unquoted in YAML or set through the environment.
    #[serde(default, deserialize_with = "key_text")]
    key: Option<String>,

    /// Hardware address; skips neighbour-table lookup on power-on.
    #[serde(default)]
    mac: Option<MacAddress>,

    /// Use `wss://host:3001` instead of `ws://host:3000`.
    #[serde(default)]
    secure: bool,
}

fn key_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<Key>::deserialize(deserializer)?.map(|key| match key {
        Key::Text(text) => text,
        Key::Unsigned(n) => n.to_string(),
        Key::Signed(n) => n.to_string(),
    }))
}

// ── TvSettings ──────────────────────────────────────────────────────

/// Everything needed to reach one television.
#[derive(Debug, Clone)]
pub struct TvSettings {
    /// Device name the entry is keyed by (e.g. `living_room`).
    pub name: String,
    pub host: String,
    /// Paired identity; `None` until the first pairing.
    pub client_key: Option<SecretString>,
    pub mac: Option<MacAddress>,
    pub secure: bool,
}

impl TvSettings {
    fn from_entry(name: String, entry: DeviceEntry) -> Result<Self, ConfigError> {
        let host = entry.host.trim().to_owned();
        if host.is_empty() {
            return Err(ConfigError::Validation {
                field: format!("{name}.host"),
                reason: "must not be empty".into(),
            });
        }
        Ok(Self {
            name,
            host,
            client_key: entry
                .key
                .filter(|key| !key.is_empty())
                .map(SecretString::from),
            mac: entry.mac,
            secure: entry.secure,
        })
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Loaded settings: device name → [`TvSettings`].
#[derive(Debug, Default)]
pub struct Settings {
    path: PathBuf,
    devices: BTreeMap<String, TvSettings>,
}

impl Settings {
    /// Load the settings file at `path`, applying environment overrides.
    ///
    /// A missing file, malformed YAML, or an invalid entry is an error;
    /// callers treat these as fatal at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with_env_prefix(path.as_ref(), ENV_PREFIX)
    }

    fn load_with_env_prefix(path: &Path, env_prefix: &str) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }

        let figment = Figment::new().merge(Yaml::file(path)).merge(
            Env::prefixed(env_prefix)
                .filter(|key| key.as_str().contains("__"))
                .split("__"),
        );
        let entries: BTreeMap<String, DeviceEntry> = figment.extract()?;

        let devices = entries
            .into_iter()
            .map(|(name, entry)| {
                TvSettings::from_entry(name.clone(), entry).map(|settings| (name, settings))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        info!(path = %path.display(), devices = devices.len(), "settings loaded");
        Ok(Self {
            path: path.to_path_buf(),
            devices,
        })
    }

    /// Settings for the named device.
    pub fn get(&self, name: &str) -> Result<&TvSettings, ConfigError> {
        self.devices.get(name).ok_or_else(|| ConfigError::NotFound {
            name: name.to_owned(),
        })
    }

    /// Configured device names, sorted.
    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.devices.keys().map(String::as_str)
    }

    /// File these settings were loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a freshly issued client key into the device's entry on disk.
    ///
    /// The rest of the file is preserved. The loaded store is unchanged;
    /// the key takes effect the next time settings are loaded.
    pub fn persist_client_key(&self, name: &str, key: &SecretString) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(&self.path)?;
        let mut doc: serde_yaml::Value = serde_yaml::from_str(&text)?;

        let entry = doc
            .get_mut(name)
            .and_then(serde_yaml::Value::as_mapping_mut)
            .ok_or_else(|| ConfigError::NotFound {
                name: name.to_owned(),
            })?;
        entry.insert(
            serde_yaml::Value::from("key"),
            serde_yaml::Value::from(key.expose_secret()),
        );

        std::fs::write(&self.path, serde_yaml::to_string(&doc)?)?;
        debug!(device = name, path = %self.path.display(), "client key persisted");
        Ok(())
    }
}

// ── Settings path ───────────────────────────────────────────────────

/// `~/.lgtv.yaml`, falling back to `$HOME` and then the working directory.
pub fn default_path() -> PathBuf {
    BaseDirs::new().map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(SETTINGS_FILE);
            p
        },
        |dirs| dirs.home_dir().join(SETTINGS_FILE),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const TWO_TVS: &str = "\
living_room:
  host: 192.168.1.50
  key: abc123
bedroom:
  host: bedroom-tv.lan
  mac: A8:23:FE:01:02:03
  secure: true
";

    #[test]
    fn loads_devices() {
        let file = write_settings(TWO_TVS);
        let settings = Settings::load(file.path()).unwrap();

        let living = settings.get("living_room").unwrap();
        assert_eq!(living.name, "living_room");
        assert_eq!(living.host, "192.168.1.50");
        assert_eq!(
            living.client_key.as_ref().map(ExposeSecret::expose_secret),
            Some("abc123")
        );
        assert_eq!(living.mac, None);
        assert!(!living.secure);

        let bedroom = settings.get("bedroom").unwrap();
        assert_eq!(bedroom.mac.map(|m| m.to_string()).as_deref(), Some("a8:23:fe:01:02:03"));
        assert!(bedroom.secure);
        assert!(bedroom.client_key.is_none());

        assert_eq!(settings.device_names().collect::<Vec<_>>(), vec!["bedroom", "living_room"]);
        assert_eq!(settings.path(), file.path());
    }

    #[test]
    fn unknown_device_is_not_found() {
        let file = write_settings(TWO_TVS);
        let settings = Settings::load(file.path()).unwrap();

        let err = settings.get("kitchen").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { ref name } if name == "kitchen"));
        assert_eq!(err.to_string(), "no settings for device 'kitchen'");
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn entry_without_host_fails() {
        let file = write_settings("living_room:\n  key: abc123\n");
        assert!(matches!(
            Settings::load(file.path()).unwrap_err(),
            ConfigError::Figment(_)
        ));
    }

    #[test]
    fn blank_host_fails_validation() {
        let file = write_settings("living_room:\n  host: \"  \"\n");
        assert!(matches!(
            Settings::load(file.path()).unwrap_err(),
            ConfigError::Validation { ref field, .. } if field == "living_room.host"
        ));
    }

    #[test]
    fn bad_mac_fails() {
        let file = write_settings("living_room:\n  host: 192.168.1.50\n  mac: not-a-mac\n");
        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn empty_key_means_unpaired() {
        let file = write_settings("living_room:\n  host: 192.168.1.50\n  key: \"\"\n");
        let settings = Settings::load(file.path()).unwrap();
        assert!(settings.get("living_room").unwrap().client_key.is_none());
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("lgtv.yaml", "living_room:\n  host: 192.168.1.50\n")?;
            jail.set_env("LGTVTEST_LIVING_ROOM__HOST", "10.0.0.9");
            jail.set_env("LGTVTEST_UNRELATED", "1");

            let path = jail.directory().join("lgtv.yaml");
            let settings = Settings::load_with_env_prefix(&path, "LGTVTEST_").unwrap();
            assert_eq!(settings.get("living_room").unwrap().host, "10.0.0.9");
            Ok(())
        });
    }

    #[test]
    fn numeric_key_is_read_as_text() {
        let file = write_settings("living_room:\n  host: 192.168.1.50\n  key: 123456\n");
        let settings = Settings::load(file.path()).unwrap();
        let key = settings.get("living_room").unwrap().client_key.as_ref();
        assert_eq!(key.map(ExposeSecret::expose_secret), Some("123456"));
    }

    #[test]
    fn numeric_key_from_env_is_read_as_text() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("lgtv.yaml", "living_room:\n  host: 192.168.1.50\n")?;
            jail.set_env("LGTVTEST_LIVING_ROOM__KEY", "987654");

            let path = jail.directory().join("lgtv.yaml");
            let settings = Settings::load_with_env_prefix(&path, "LGTVTEST_").unwrap();
            let key = settings.get("living_room").unwrap().client_key.as_ref();
            assert_eq!(key.map(ExposeSecret::expose_secret), Some("987654"));
            Ok(())
        });
    }

    #[test]
    fn persist_client_key_updates_file_only() {
        let file = write_settings(TWO_TVS);
        let settings = Settings::load(file.path()).unwrap();

        settings
            .persist_client_key("bedroom", &SecretString::from("new-key".to_owned()))
            .unwrap();

        assert!(settings.get("bedroom").unwrap().client_key.is_none());
        let reloaded = Settings::load(file.path()).unwrap();
        let bedroom = reloaded.get("bedroom").unwrap();
        assert_eq!(
            bedroom.client_key.as_ref().map(ExposeSecret::expose_secret),
            Some("new-key")
        );
        assert!(bedroom.secure);
        assert_eq!(reloaded.get("living_room").unwrap().host, "192.168.1.50");
    }

    #[test]
    fn persist_client_key_for_unknown_device() {
        let file = write_settings(TWO_TVS);
        let settings = Settings::load(file.path()).unwrap();
        let err = settings
            .persist_client_key("kitchen", &SecretString::from("k".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn default_path_ends_with_settings_file() {
        assert!(default_path().ends_with(SETTINGS_FILE));
    }
}
