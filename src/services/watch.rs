use anyhow::Result;
use log::{error, info};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};

use super::report::ReportService;
use super::scan::ScanService;
use crate::api::MatchSource;
use crate::notify::Notifier;

/// Runs scan cycles and weekly reports on their schedules until interrupted
///
/// Both jobs share one task, so a cycle and a report never overlap.
pub struct WatchService<S: MatchSource, N: Notifier, R: Notifier> {
    scan: ScanService<S, N>,
    report: ReportService<R>,
    scan_interval: Duration,
    report_interval: Duration,
}

impl<S: MatchSource, N: Notifier, R: Notifier> WatchService<S, N, R> {
    pub fn new(
        scan: ScanService<S, N>,
        report: ReportService<R>,
        scan_interval: Duration,
        report_interval: Duration,
    ) -> Self {
        Self {
            scan,
            report,
            scan_interval,
            report_interval,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!(
            "=== Watching battle logs every {}s ===",
            self.scan_interval.as_secs()
        );

        let mut scan_tick = interval(self.scan_interval);
        scan_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first report is due one full period after start
        let mut report_tick = interval_at(Instant::now() + self.report_interval, self.report_interval);
        report_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = scan_tick.tick() => self.scan_once().await,
                _ = report_tick.tick() => self.report_once().await,
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping");
                    return Ok(());
                }
            }
        }
    }

    async fn scan_once(&mut self) {
        match self.scan.run_cycle().await {
            Ok(report) => info!(
                "Cycle done: {} sessions completed, {} players skipped",
                report.sessions_completed, report.players_skipped
            ),
            Err(e) => error!("Scan cycle failed: {e:#}"),
        }
    }

    async fn report_once(&mut self) {
        if let Err(e) = self.report.run().await {
            error!("Weekly report failed: {e:#}");
        }
    }
}
