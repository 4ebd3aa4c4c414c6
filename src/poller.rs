// src/poller.rs
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::fetchers::MetricFetcher;
use crate::render::{self, Renderer};

/// Outcome of one pass over all fetchers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub rendered: usize,
    pub failed: usize,
}

pub struct Poller {
    fetchers: Vec<Box<dyn MetricFetcher>>,
    renderer: Arc<dyn Renderer>,
}

impl Poller {
    pub fn new(fetchers: Vec<Box<dyn MetricFetcher>>, renderer: Arc<dyn Renderer>) -> Self {
        Self { fetchers, renderer }
    }

    /// Show the static dataset before any request completes.
    pub fn initialize(&self) {
        render::initialize(self.renderer.as_ref());
        info!("Page initialized with fallback data");
    }

    /// Run every fetcher once, in order. A failing fetcher never stops the
    /// ones after it, and its region keeps whatever it showed before.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for fetcher in &self.fetchers {
            match fetcher.fetch().await {
                Ok(update) => {
                    debug!("{} → {:?}", fetcher.name(), update);
                    render::apply(self.renderer.as_ref(), &update);
                    report.rendered += 1;
                }
                Err(e) => {
                    warn!("Failed to fetch {}: {}. Keeping displayed value.", fetcher.name(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Poll immediately, then every `period`, until `shutdown` flips to true
    /// or its sender is dropped. A running cycle always finishes.
    pub async fn run(&self, period: Duration, mut shutdown: watch::Receiver<bool>) -> eyre::Result<()> {
        let mut tick = interval(period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Poller started, refreshing every {:?}", period);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let report = self.run_cycle().await;
                    info!(
                        "Cycle complete: {} regions updated, {} fetches failed",
                        report.rendered, report.failed
                    );
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Poller stopped");
        Ok(())
    }

    pub fn spawn(self: Arc<Self>, period: Duration) -> PollerHandle {
        let (stop, stop_rx) = watch::channel(false);
        let task = tokio::spawn(async move { self.run(period, stop_rx).await });
        PollerHandle { stop, task }
    }
}

/// A running poll loop that can be stopped.
pub struct PollerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<eyre::Result<()>>,
}

impl PollerHandle {
    /// The underlying task, for awaiting it alongside other tasks.
    pub fn task_mut(&mut self) -> &mut JoinHandle<eyre::Result<()>> {
        &mut self.task
    }

    /// Signal shutdown and wait for the in-flight cycle to finish.
    pub async fn stop(self) -> eyre::Result<()> {
        let _ = self.stop.send(true);
        self.task.await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::MetricUpdate;
    use crate::render::PageRenderer;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(Option<MetricUpdate>, Arc<AtomicUsize>);

    #[async_trait]
    impl MetricFetcher for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(&self) -> Result<MetricUpdate, FetchError> {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0.clone().ok_or_else(|| FetchError::malformed("down"))
        }
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_text() {
        let calls = Arc::new(AtomicUsize::new(0));
        let renderer = Arc::new(PageRenderer::new("https://x/tx/"));
        let poller = Poller::new(
            vec![
                Box::new(Fixed(None, calls.clone())),
                Box::new(Fixed(Some(MetricUpdate::BlockHeight(20_000_000)), calls.clone())),
            ],
            renderer.clone(),
        );
        poller.initialize();

        let report = poller.run_cycle().await;
        assert_eq!(report, CycleReport { rendered: 1, failed: 1 });
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let page = renderer.snapshot();
        assert_eq!(page.usdc_market_cap, "$55.00B");
        assert_eq!(page.current_block, "20,000,000");
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_loop_ticks_on_period_and_stops() {
        let calls = Arc::new(AtomicUsize::new(0));
        let renderer = Arc::new(PageRenderer::new("https://x/tx/"));
        let poller = Arc::new(Poller::new(
            vec![Box::new(Fixed(Some(MetricUpdate::TotalTransactions(5)), calls.clone()))],
            renderer.clone(),
        ));

        let handle = poller.spawn(Duration::from_millis(10_000));
        tokio::time::sleep(Duration::from_millis(25_000)).await;
        handle.stop().await.unwrap();

        // immediate cycle plus ticks at 10s and 20s
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(renderer.snapshot().total_transactions, "5");
    }
}
