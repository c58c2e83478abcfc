use crate::consts::MQTT_DISCONNECT_TIMEOUT_SECS;
use crate::errors::SessionError;
use crate::mqtt_connection::MqttConnection;
use rumqttc::{Event, Incoming, Outgoing};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

/// Keeps the broker session alive until a shutdown is broadcast.
///
/// Only ever returns an error: `ExitingThread` on a requested shutdown and
/// `Connection` when the broker drops us. A pending shutdown wins over broker
/// events.
pub async fn mqtt_poll_loop(
    mqtt: MqttConnection,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<Infallible, SessionError> {
    let MqttConnection {
        client,
        mut event_loop,
    } = mqtt;

    loop {
        tokio::select! {
            biased;

            _ = shutdown_rx.recv() => {
                info!("MQTT received shutdown message, exiting thread.");
                match timeout(Duration::from_secs(MQTT_DISCONNECT_TIMEOUT_SECS), client.disconnect()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!("Couldn't send disconnect: {e}"),
                    Err(_e) => warn!("Timeout trying to mqtt disconnect"),
                }
                return Err(SessionError::ExitingThread);
            }
            notification = event_loop.poll() => {
                let event = notification.map_err(|e| {
                    error!("Unable to poll mqtt: {e}");
                    SessionError::Connection(e.to_string())
                })?;
                if log_event(event) {
                    return Err(SessionError::Connection(
                        "broker sent disconnect".to_string(),
                    ));
                }
            }
        }
    }
}

/// Logs a broker event; `true` means the broker closed the session.
fn log_event(event: Event) -> bool {
    match event {
        Event::Incoming(i) => match i {
            Incoming::Disconnect => {
                error!("mqtt disconnect packet received.");
                return true;
            }
            Incoming::ConnAck(_ca) => {
                info!("MQTT connection established.");
            }
            Incoming::PingResp => {
                trace!("Recv MQTT PONG");
            }
            _ => {
                debug!("mqtt incoming packet: {:?}", i);
            }
        },
        Event::Outgoing(o) => match o {
            Outgoing::PingReq => {
                trace!("Sent MQTT PING");
            }
            _ => {
                debug!("outgoing mqtt packet: {:?}", o);
            }
        },
    }
    false
}
