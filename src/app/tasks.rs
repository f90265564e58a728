use std::net::{IpAddr, Ipv4Addr};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::core::{ContentLoader, CoreError, DocumentStore, LoadReport};

/// Number of consecutive ports tried, starting at the configured one.
pub const PORT_PROBE_RANGE: u16 = 100;

pub const BIND_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Binds the first free port in `start..start + PORT_PROBE_RANGE` and keeps
/// the listener open.
pub async fn bind_available_port(start: u16) -> Result<(TcpListener, u16), CoreError> {
    let end = start.saturating_add(PORT_PROBE_RANGE - 1);
    for port in start..=end {
        match TcpListener::bind((BIND_ADDRESS, port)).await {
            Ok(listener) => {
                let port = listener.local_addr().map_or(port, |addr| addr.port());
                if port != start && start != 0 {
                    tracing::info!("Port {} is in use, using port {} instead", start, port);
                }
                return Ok((listener, port));
            }
            Err(e) => tracing::debug!("Port {} unavailable: {}", port, e),
        }
    }
    Err(CoreError::NoAvailablePort { start, end })
}

/// Starts the background content load if any document is still unloaded.
///
/// The returned handle is watched by a second task that logs a panic of the
/// loader instead of letting it vanish silently.
pub fn start_content_loading(store: &DocumentStore) -> Option<JoinHandle<Option<LoadReport>>> {
    if !store.needs_content_loading() {
        return None;
    }

    let handle = ContentLoader::spawn_background(store.clone());
    Some(tokio::spawn(async move {
        match handle.await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Background content loading failed: {}", e);
                None
            }
        }
    }))
}
