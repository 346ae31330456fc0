//! D-Bus connection management and player discovery for MPRIS.

use std::sync::Arc;
use tokio::sync::OnceCell;
use zbus::proxy;

const MPRIS_PREFIX: &str = "org.mpris.MediaPlayer2.";
const PLAYERCTLD: &str = "org.mpris.MediaPlayer2.playerctld";

/// Errors that can occur during MPRIS operations
#[derive(thiserror::Error, Debug)]
pub enum MprisError {
    #[error("D-Bus error: {0}")]
    ZBus(#[from] zbus::Error),
    #[error("D-Bus error: {0}")]
    Fdo(#[from] zbus::fdo::Error),
    #[error("Failed to establish D-Bus connection")]
    NoConnection,
    #[error("No MPRIS player available")]
    NoPlayer,
}

/// Global D-Bus connection singleton
static DBUS_CONNECTION: OnceCell<Arc<zbus::Connection>> = OnceCell::const_new();

/// Get or create a shared D-Bus session connection
pub async fn get_dbus_conn() -> Result<Arc<zbus::Connection>, MprisError> {
    DBUS_CONNECTION
        .get_or_try_init(|| async {
            let conn = zbus::Connection::session()
                .await
                .map_err(|_| MprisError::NoConnection)?;
            Ok(Arc::new(conn))
        })
        .await
        .cloned()
}

/// Proxy interface for playerctld to get active MPRIS players
#[proxy(
    interface = "com.github.altdesktop.playerctld",
    default_service = "org.mpris.MediaPlayer2.playerctld",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait Playerctld {
    #[zbus(property)]
    fn player_names(&self) -> zbus::Result<Vec<String>>;
}

/// Active MPRIS player names, most recently active first.
///
/// Asks playerctld when it is running, otherwise falls back to every
/// `org.mpris.MediaPlayer2.*` name on the session bus.
pub async fn get_active_player_names() -> Result<Vec<String>, MprisError> {
    let conn = get_dbus_conn().await?;

    if let Ok(proxy) = PlayerctldProxy::new(&conn).await
        && let Ok(names) = proxy.player_names().await
    {
        return Ok(names);
    }

    let dbus = zbus::fdo::DBusProxy::new(&conn).await?;
    let names = dbus
        .list_names()
        .await?
        .into_iter()
        .map(|n| n.to_string())
        .filter(|n| n.starts_with(MPRIS_PREFIX) && n.as_str() != PLAYERCTLD)
        .collect();
    Ok(names)
}

/// Check if a player service name should be blocked
///
/// Returns true if the service name (case-insensitive) contains any blocked string.
pub fn is_blocked(service: &str, block_list: &[String]) -> bool {
    let service_lower = service.to_lowercase();
    block_list
        .iter()
        .filter(|blocked| !blocked.is_empty())
        .any(|blocked| service_lower.contains(&blocked.to_lowercase()))
}

/// First candidate that is not blocked.
pub fn pick_player(candidates: &[String], block_list: &[String]) -> Option<String> {
    candidates
        .iter()
        .find(|name| !is_blocked(name, block_list))
        .cloned()
}

/// Resolve the player to talk to: an explicit service wins, otherwise the
/// first active, non-blocked player.
pub async fn resolve_player(explicit: Option<&str>, block_list: &[String]) -> Result<String, MprisError> {
    if let Some(service) = explicit.filter(|s| !s.is_empty()) {
        return Ok(service.to_string());
    }
    let names = get_active_player_names().await?;
    pick_player(&names, block_list).ok_or(MprisError::NoPlayer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_blocked_case_insensitive() {
        let block = names(&["Firefox", "chromium"]);
        assert!(is_blocked("org.mpris.MediaPlayer2.firefox.instance_1_42", &block));
        assert!(is_blocked("org.mpris.MediaPlayer2.Chromium.instance9", &block));
        assert!(!is_blocked("org.mpris.MediaPlayer2.spotify", &block));
    }

    #[test]
    fn test_empty_block_entries_block_nothing() {
        assert!(!is_blocked("org.mpris.MediaPlayer2.spotify", &names(&[""])));
        assert!(!is_blocked("org.mpris.MediaPlayer2.spotify", &[]));
    }

    #[test]
    fn test_pick_player_skips_blocked() {
        let candidates = names(&["org.mpris.MediaPlayer2.firefox", "org.mpris.MediaPlayer2.mpv"]);
        assert_eq!(
            pick_player(&candidates, &names(&["firefox"])),
            Some("org.mpris.MediaPlayer2.mpv".to_string())
        );
        assert_eq!(pick_player(&candidates, &names(&["org.mpris"])), None);
        assert_eq!(pick_player(&[], &[]), None);
    }

    #[tokio::test]
    async fn test_explicit_player_wins() {
        let got = resolve_player(Some("org.mpris.MediaPlayer2.mpv"), &names(&["mpv"])).await;
        assert_eq!(got.ok().as_deref(), Some("org.mpris.MediaPlayer2.mpv"));
    }
}
