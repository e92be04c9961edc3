//! Background settlement of expired auction lots

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::service::EconomyService;

pub struct AuctionSweeper {
    service: Arc<EconomyService>,
    interval: Duration,
}

impl AuctionSweeper {
    pub fn new(service: Arc<EconomyService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Run one sweep on the blocking pool. Returns the number of lots settled.
    pub async fn sweep_once(&self) -> usize {
        let service = self.service.clone();
        match tokio::task::spawn_blocking(move || service.settle_expired_lots()).await {
            Ok(Ok(settled)) => {
                if !settled.is_empty() {
                    log::info!("Auction sweep settled {} lot(s)", settled.len());
                }
                settled.len()
            }
            Ok(Err(e)) => {
                log::error!("Auction sweep failed: {}", e);
                0
            }
            Err(e) => {
                log::error!("Auction sweep task aborted: {}", e);
                0
            }
        }
    }

    /// Sweep on every tick until `shutdown` flips to true or its sender drops
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            log::info!("Auction sweeper running every {:?}", self.interval);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        self.sweep_once().await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            log::info!("Auction sweeper stopped");
        })
    }
}
