#[macro_use] extern crate tracing;

use espsolar_config::consts::SHUTDOWN_BROADCAST_CAPACITY;
use espsolar_config::errors::SessionError;
use espsolar_config::mqtt_connection::MqttConnection;
use espsolar_config::mqtt_poll::mqtt_poll_loop;
use espsolar_config::DeviceConfig;
use lazy_static::lazy_static;
use std::process;
use tokio::sync::{broadcast, OnceCell};
use tracing_subscriber::filter::EnvFilter;

lazy_static! {
    static ref SHUTDOWN: OnceCell<bool> = OnceCell::new();
}

#[tokio::main]
pub async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match DeviceConfig::load() {
        Ok(c) => c,
        Err(e) => return die(&e.to_string()),
    };
    info!("Using {:?}", config);
    info!(
        "state topic {}, deep sleep topic {}",
        config.mqtt_topic(),
        config.mqtt_deepsleep()
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(SHUTDOWN_BROADCAST_CAPACITY);
    let handler_tx = shutdown_tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("Received Ctrl-C, communicating to threads to stop");
        let _ = SHUTDOWN.set(true);
        let _ = handler_tx.send(());
    }) {
        warn!("Couldn't install Ctrl-C handler, shutdown will not be graceful: {e}");
    }

    let mqtt_conn = match MqttConnection::new(&config) {
        Ok(m) => m,
        Err(e) => return die(&format!("Couldn't create mqtt connection object: {e}")),
    };
    let mqtt_handler = tokio::task::spawn(mqtt_poll_loop(mqtt_conn, shutdown_rx));

    match mqtt_handler.await {
        Ok(Err(SessionError::ExitingThread)) => info!("MQTT session closed."),
        Ok(Err(e)) => {
            if SHUTDOWN.get().is_none() {
                return die(&e.to_string());
            }
        }
        Ok(Ok(never)) => match never {},
        Err(e) => die(&format!("mqtt task panicked: {e}")),
    }
}

pub fn die(msg: &str) {
    error!("{}", msg);
    process::exit(1);
}
