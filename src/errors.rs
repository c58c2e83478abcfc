use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Can't read config file {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("Couldn't deserialize DeviceConfig: {0}")]
    Parse(String),
    #[error("Field {0} must not be empty")]
    EmptyField(&'static str),
    #[error("hostname {0:?} must not contain whitespace")]
    InvalidHostname(String),
    #[error("mqtt_server must be an IPv4 address, got {0:?}")]
    InvalidServer(String),
    #[error("mqtt_port {0} is not a usable TCP port")]
    InvalidPort(u16),
    #[error("{field} is not a valid publish topic: {reason}")]
    InvalidTopic { field: &'static str, reason: String },
    #[error("mqtt_topic and mqtt_deepsleep both point at {0}")]
    TopicCollision(String),
    #[error("Bad override in {var}: {reason}")]
    Override { var: String, reason: String },
}

#[derive(Error, Clone, Debug)]
pub enum SessionError {
    #[error("Broker connection failed: {0}")]
    Connection(String),
    #[error("Received request for thread exit")]
    ExitingThread,
}
