use crate::consts::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, OVERRIDE_ENV_PREFIX};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::Path;
use std::sync::Arc;

const REDACTED: &str = "********";

/// Everything the charger monitor needs to join the network and talk to its broker.
///
/// Built once at startup and shared behind an `Arc`; there are no setters.
#[derive(Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    hostname: String,
    mqtt_user: String,
    mqtt_pass: String,
    mqtt_server: String,
    mqtt_port: u16,
    wifi_ssid: String,
    wifi_pass: String,
    mqtt_topic: String,
    ota_pass: String,
    mqtt_deepsleep: String,
}

impl DeviceConfig {
    /// Values shipped in `secrets.template.yaml`.
    pub fn template() -> Self {
        DeviceConfig {
            hostname: "espSolarChargerOTA".to_string(),
            mqtt_user: "mqtt_user".to_string(),
            mqtt_pass: "mqtt_password".to_string(),
            mqtt_server: "192.168.1.15".to_string(),
            mqtt_port: 1883,
            wifi_ssid: "wifi_network".to_string(),
            wifi_pass: "wifi_passsword".to_string(),
            mqtt_topic: "epever/state".to_string(),
            ota_pass: "guessme".to_string(),
            mqtt_deepsleep: "epever/deepsleep".to_string(),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Replaces fields with `ESPSOLAR_<FIELD>` values returned by `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_for = |field: &str| format!("{OVERRIDE_ENV_PREFIX}{}", field.to_uppercase());

        for (field, slot) in [
            ("hostname", &mut self.hostname),
            ("mqtt_user", &mut self.mqtt_user),
            ("mqtt_pass", &mut self.mqtt_pass),
            ("mqtt_server", &mut self.mqtt_server),
            ("wifi_ssid", &mut self.wifi_ssid),
            ("wifi_pass", &mut self.wifi_pass),
            ("mqtt_topic", &mut self.mqtt_topic),
            ("ota_pass", &mut self.ota_pass),
            ("mqtt_deepsleep", &mut self.mqtt_deepsleep),
        ] {
            if let Some(value) = lookup(&var_for(field)) {
                debug!("{field} overridden from environment");
                *slot = value;
            }
        }

        let port_var = var_for("mqtt_port");
        if let Some(raw) = lookup(&port_var) {
            self.mqtt_port = raw.trim().parse::<u16>().map_err(|e| ConfigError::Override {
                var: port_var.clone(),
                reason: format!("{raw:?}: {e}"),
            })?;
            debug!("mqtt_port overridden from environment");
        }
        Ok(self)
    }

    /// Empty fields are reported first, in declaration order, then format problems.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("hostname", &self.hostname),
            ("mqtt_user", &self.mqtt_user),
            ("mqtt_pass", &self.mqtt_pass),
            ("mqtt_server", &self.mqtt_server),
            ("wifi_ssid", &self.wifi_ssid),
            ("wifi_pass", &self.wifi_pass),
            ("mqtt_topic", &self.mqtt_topic),
            ("ota_pass", &self.ota_pass),
            ("mqtt_deepsleep", &self.mqtt_deepsleep),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }

        self.check_hostname()?;
        self.broker_ip()?;
        if self.mqtt_port == 0 {
            return Err(ConfigError::InvalidPort(self.mqtt_port));
        }
        check_topic("mqtt_topic", &self.mqtt_topic)?;
        check_topic("mqtt_deepsleep", &self.mqtt_deepsleep)?;
        if self.mqtt_topic == self.mqtt_deepsleep {
            return Err(ConfigError::TopicCollision(self.mqtt_topic.clone()));
        }
        Ok(())
    }

    /// Reads `CONFIG_FILE_PATH` (or `./secrets.yaml`), applies environment
    /// overrides and validates the result.
    pub fn load() -> Result<Arc<Self>, ConfigError> {
        let cfg_file = match std::env::var(CONFIG_PATH_ENV) {
            Ok(s) => s,
            Err(_e) => DEFAULT_CONFIG_PATH.to_string(),
        };
        Self::load_from(cfg_file, |var| std::env::var(var).ok())
    }

    pub fn load_from<P, F>(path: P, lookup: F) -> Result<Arc<Self>, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::from_file(&path)?.with_overrides(lookup)?;
        config.validate()?;
        info!(
            "Loaded config for {} from {}",
            config.hostname,
            path.as_ref().display()
        );
        Ok(Arc::new(config))
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn mqtt_user(&self) -> &str {
        &self.mqtt_user
    }

    pub fn mqtt_pass(&self) -> &str {
        &self.mqtt_pass
    }

    pub fn mqtt_server(&self) -> &str {
        &self.mqtt_server
    }

    pub fn mqtt_port(&self) -> u16 {
        self.mqtt_port
    }

    pub fn wifi_ssid(&self) -> &str {
        &self.wifi_ssid
    }

    pub fn wifi_pass(&self) -> &str {
        &self.wifi_pass
    }

    pub fn mqtt_topic(&self) -> &str {
        &self.mqtt_topic
    }

    pub fn ota_pass(&self) -> &str {
        &self.ota_pass
    }

    pub fn mqtt_deepsleep(&self) -> &str {
        &self.mqtt_deepsleep
    }

    pub fn mqtt_addr(&self) -> Result<SocketAddrV4, ConfigError> {
        Ok(SocketAddrV4::new(self.broker_ip()?, self.mqtt_port))
    }

    /// The hostname is also the MQTT client id, which brokers and rumqttc
    /// refuse when it carries whitespace.
    pub fn check_hostname(&self) -> Result<(), ConfigError> {
        if self.hostname.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidHostname(self.hostname.clone()));
        }
        Ok(())
    }

    fn broker_ip(&self) -> Result<Ipv4Addr, ConfigError> {
        self.mqtt_server
            .parse::<Ipv4Addr>()
            .map_err(|_| ConfigError::InvalidServer(self.mqtt_server.clone()))
    }
}

fn check_topic(field: &'static str, topic: &str) -> Result<(), ConfigError> {
    if let Some(c) = topic.chars().find(|c| matches!(c, '+' | '#' | '\0')) {
        return Err(ConfigError::InvalidTopic {
            field,
            reason: format!("contains {c:?}"),
        });
    }
    Ok(())
}

impl fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("hostname", &self.hostname)
            .field("mqtt_user", &self.mqtt_user)
            .field("mqtt_pass", &REDACTED)
            .field("mqtt_server", &self.mqtt_server)
            .field("mqtt_port", &self.mqtt_port)
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_pass", &REDACTED)
            .field("mqtt_topic", &self.mqtt_topic)
            .field("ota_pass", &REDACTED)
            .field("mqtt_deepsleep", &self.mqtt_deepsleep)
            .finish()
    }
}
