use crate::config::DeviceConfig;
use crate::consts::{MQTT_KEEPALIVE_TIME, MQTT_THREAD_CHANNEL_CAPACITY};
use crate::errors::ConfigError;
use rumqttc::{AsyncClient, EventLoop, MqttOptions};
use std::time::Duration;

pub struct MqttConnection {
    pub client: AsyncClient,
    pub event_loop: EventLoop,
}

/// Broker options for a device: the hostname doubles as the client id.
pub fn mqtt_options(config: &DeviceConfig) -> Result<MqttOptions, ConfigError> {
    config.check_hostname()?;
    if config.hostname().is_empty() {
        return Err(ConfigError::EmptyField("hostname"));
    }
    let mut options = MqttOptions::new(
        config.hostname(),
        config.mqtt_server(),
        config.mqtt_port(),
    );
    options.set_keep_alive(Duration::from_secs(MQTT_KEEPALIVE_TIME));
    options.set_credentials(config.mqtt_user(), config.mqtt_pass());
    Ok(options)
}

impl MqttConnection {
    pub fn new(config: &DeviceConfig) -> Result<MqttConnection, ConfigError> {
        let (client, event_loop) =
            AsyncClient::new(mqtt_options(config)?, MQTT_THREAD_CHANNEL_CAPACITY);
        debug!(
            "mqtt client {} created for {}:{}",
            config.hostname(),
            config.mqtt_server(),
            config.mqtt_port()
        );
        Ok(MqttConnection { client, event_loop })
    }
}
