
pub const CONFIG_PATH_ENV: &str = "CONFIG_FILE_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "./secrets.yaml";
pub const OVERRIDE_ENV_PREFIX: &str = "ESPSOLAR_";

pub const MQTT_KEEPALIVE_TIME: u64 = 5_u64;
pub const MQTT_THREAD_CHANNEL_CAPACITY: usize = 32_usize;
pub const MQTT_DISCONNECT_TIMEOUT_SECS: u64 = 3_u64;

pub const SHUTDOWN_BROADCAST_CAPACITY: usize = 16_usize;
