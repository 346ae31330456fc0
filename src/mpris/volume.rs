//! Volume querying and control for MPRIS players.

use crate::mpris::connection::{MprisError, get_dbus_conn};
use crate::state::sanitize_progress;
use zbus::proxy;
use zbus::proxy::CacheProperties;

/// MPRIS MediaPlayer2.Player interface proxy, volume only
#[proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait PlayerVolume {
    #[zbus(property)]
    fn volume(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn set_volume(&self, value: f64) -> zbus::Result<()>;
}

async fn player_proxy(service: &str) -> Result<PlayerVolumeProxy<'static>, MprisError> {
    let conn = get_dbus_conn().await?;
    let proxy = PlayerVolumeProxy::builder(&conn)
        .destination(service.to_string())?
        .cache_properties(CacheProperties::No)
        .build()
        .await?;
    Ok(proxy)
}

/// Query the volume of a specific MPRIS player service, mapped into [0, 1].
pub async fn get_volume(service: &str) -> Result<f64, MprisError> {
    if service.is_empty() {
        return Err(MprisError::NoPlayer);
    }
    let proxy = player_proxy(service).await?;
    let raw = proxy.volume().await?;
    Ok(sanitize_progress(raw))
}

/// Set the volume of a specific MPRIS player service.
///
/// MPRIS allows values above 1.0 for amplification; the bar never asks for
/// more than 1.0.
pub async fn set_volume(service: &str, volume: f64) -> Result<(), MprisError> {
    if service.is_empty() {
        return Err(MprisError::NoPlayer);
    }
    let proxy = player_proxy(service).await?;
    proxy.set_volume(sanitize_progress(volume)).await?;
    Ok(())
}
