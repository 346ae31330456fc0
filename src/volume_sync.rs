// volume_sync.rs: Background task pushing committed progress to an MPRIS player

use crate::mpris::{self, MprisError};
use tokio::sync::mpsc;

/// Keep only the newest committed value that is already queued.
pub fn latest_pending(first: f64, commit_rx: &mut mpsc::Receiver<f64>) -> f64 {
    let mut value = first;
    while let Ok(next) = commit_rx.try_recv() {
        value = next;
    }
    value
}

struct Target {
    explicit: Option<String>,
    block: Vec<String>,
    service: Option<String>,
}

impl Target {
    async fn service(&mut self) -> Result<String, MprisError> {
        if let Some(service) = &self.service {
            return Ok(service.clone());
        }
        let service = mpris::resolve_player(self.explicit.as_deref(), &self.block).await?;
        tracing::info!(service = %service, "volume sync target resolved");
        self.service = Some(service.clone());
        Ok(service)
    }

    fn forget(&mut self) {
        self.service = None;
    }

    async fn apply(&mut self, volume: f64) {
        match self.try_apply(volume).await {
            Ok(()) => return,
            Err(e) => tracing::debug!(error = %e, "volume update failed, re-resolving player"),
        }
        // The cached player may have gone away; look it up once more.
        self.forget();
        if let Err(e) = self.try_apply(volume).await {
            tracing::warn!(error = %e, volume, "could not set player volume");
            self.forget();
        }
    }

    async fn try_apply(&mut self, volume: f64) -> Result<(), MprisError> {
        let service = self.service().await?;
        mpris::set_volume(&service, volume).await?;
        tracing::debug!(service = %service, volume, "player volume set");
        Ok(())
    }
}

/// Read the target player's volume to seed the bar. `None` when no player
/// answers.
pub async fn initial_volume(config: &crate::Config) -> Option<f64> {
    let service = match mpris::resolve_player(config.player.as_deref(), &config.block).await {
        Ok(service) => service,
        Err(e) => {
            tracing::info!(error = %e, "no player to seed volume from");
            return None;
        }
    };
    match mpris::get_volume(&service).await {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(service = %service, error = %e, "reading player volume failed");
            None
        }
    }
}

/// Listens for committed progress values and applies them as player volume.
pub async fn listen(
    mut commit_rx: mpsc::Receiver<f64>,
    mut shutdown_rx: mpsc::Receiver<()>,
    config: crate::Config,
) {
    let mut target = Target {
        explicit: config.player.clone(),
        block: config.block.clone(),
        service: None,
    };
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            maybe_value = commit_rx.recv() => {
                let Some(first) = maybe_value else { break };
                let volume = latest_pending(first, &mut commit_rx);
                target.apply(volume).await;
            }
        }
    }
    tracing::debug!("volume sync stopped");
}
