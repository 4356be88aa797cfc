//! Background loop turning refresh notices into coordinator passes

use crate::core::coordinator::Coordinator;
use crate::core::refresher::{RefreshNotice, TimeFrameRefresher};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{debug, error, info};

/// Drains the notice channel shared by every refresher of a coordinator
pub struct CoordinatorRuntime {
    coordinator: Arc<Coordinator>,
    sender: mpsc::UnboundedSender<RefreshNotice>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<RefreshNotice>>>,
    refreshers: Mutex<Vec<Arc<TimeFrameRefresher>>>,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl CoordinatorRuntime {
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            coordinator,
            sender,
            receiver: Mutex::new(Some(receiver)),
            refreshers: Mutex::new(Vec::new()),
            handle: Arc::new(RwLock::new(None)),
        }
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    /// Sender for components reporting completed cycles themselves
    pub fn notices(&self) -> mpsc::UnboundedSender<RefreshNotice> {
        self.sender.clone()
    }

    /// Register a refresher with the coordinator and start its loop
    pub async fn attach(
        &self,
        refresher: Arc<TimeFrameRefresher>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.coordinator
            .register_refresh_controller(refresher.exchange(), refresher.clone())?;
        refresher.start(self.sender.clone()).await;
        self.refreshers.lock().await.push(refresher);
        Ok(())
    }

    /// Start consuming notices. Fails if the runtime was already started.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut receiver = self
            .receiver
            .lock()
            .await
            .take()
            .ok_or("CoordinatorRuntime already started")?;
        let coordinator = self.coordinator.clone();

        let handle = tokio::spawn(async move {
            info!(
                symbol = %coordinator.symbol(),
                "CoordinatorRuntime: started, waiting for refresh notices..."
            );

            while let Some(notice) = receiver.recv().await {
                match coordinator.on_refresh(&notice.exchange, notice.time_frame) {
                    Ok(dispatched) => {
                        debug!(
                            exchange = %notice.exchange,
                            time_frame = %notice.time_frame,
                            refreshed_count = notice.refreshed_count,
                            dispatched = dispatched,
                            "CoordinatorRuntime: processed refresh of {} on {}",
                            notice.time_frame,
                            notice.exchange
                        );
                    }
                    Err(e) => {
                        error!(
                            exchange = %notice.exchange,
                            time_frame = %notice.time_frame,
                            error = %e,
                            "CoordinatorRuntime: failed to process refresh of {} on {}",
                            notice.time_frame,
                            notice.exchange
                        );
                    }
                }
            }

            info!("CoordinatorRuntime: notice channel closed, stopping");
        });

        *self.handle.write().await = Some(handle);
        Ok(())
    }

    /// Stop every attached refresher, then the notice loop
    pub async fn stop(&self) {
        for refresher in self.refreshers.lock().await.drain(..) {
            refresher.stop().await;
        }

        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("CoordinatorRuntime: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
