//! Build scheduling and report output.

use crate::config::CliConfig;
use probe::{JsonFileSource, MetricsSink, Spy};
use report::Report;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

impl CliConfig {
    /// Validate the configuration, install logging and run the probe.
    pub fn run(self) -> anyhow::Result<()> {
        self.validate()?;
        tracing_subscriber::fmt()
            .with_max_level(self.log_level)
            .with_writer(std::io::stderr)
            .init();

        let spy = Spy::new(self.host_id.clone(), self.host_name())?.with_processes(self.processes);
        let mut source = JsonFileSource::new(&self.connections);
        tracing::info!(
            host_id = %self.host_id,
            processes = self.processes,
            source = %source.path().display(),
            "probe starting"
        );

        if self.once {
            let report = spy.spy(&mut source, &MetricsSink);
            return emit(&mut std::io::stdout().lock(), &report);
        }

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(serve(Arc::new(spy), source, self.interval()))
    }
}

/// A build abandoned at its deadline, kept until its blocking task exits.
#[derive(Debug, Default)]
pub(crate) struct Straggler(Option<JoinHandle<Report>>);

impl Straggler {
    pub(crate) fn park(&mut self, build: JoinHandle<Report>) {
        self.0 = Some(build);
    }

    /// `true` while the abandoned build is still running. Its report, if
    /// any, is dropped once it finishes.
    pub(crate) fn is_running(&mut self) -> bool {
        let running = self.0.as_ref().is_some_and(|build| !build.is_finished());
        if !running {
            self.0 = None;
        }
        running
    }
}

/// One build per `interval` until interrupted. A build that outlives the
/// interval is abandoned and its report discarded; no new build starts
/// until it has exited, so at most one build runs at a time.
async fn serve(spy: Arc<Spy>, source: JsonFileSource, interval: Duration) -> anyhow::Result<()> {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut straggler = Straggler::default();

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("probe stopping");
                return Ok(());
            }
        }

        if straggler.is_running() {
            tracing::warn!("previous build still running, skipping tick");
            continue;
        }

        let spy = Arc::clone(&spy);
        let mut source = source.clone();
        let mut build = tokio::task::spawn_blocking(move || spy.spy(&mut source, &MetricsSink));

        match time::timeout(interval, &mut build).await {
            Ok(Ok(report)) => emit(&mut std::io::stdout().lock(), &report)?,
            Ok(Err(error)) => tracing::error!(%error, "build task failed"),
            Err(_) => {
                tracing::warn!(?interval, "build exceeded interval, discarding");
                straggler.park(build);
            }
        }
    }
}

/// Write `report` as one JSON line.
pub fn emit<W: Write>(out: &mut W, report: &Report) -> anyhow::Result<()> {
    if report.is_empty() {
        tracing::debug!("empty report");
    }
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe::{Connection, NoopSink, StaticSource};

    #[test]
    fn test_emit_writes_one_line() {
        let spy = Spy::new("h1", "web-1").unwrap();
        let report = spy.spy(
            &mut StaticSource::new(vec![Connection::new(
                "10.0.0.1".parse().unwrap(),
                5000,
                "10.0.0.2".parse().unwrap(),
                80,
            )]),
            &NoopSink,
        );

        let mut out = Vec::new();
        emit(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));

        let back: Report = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(back, report);
    }

    #[tokio::test]
    async fn test_straggler_blocks_until_build_exits() {
        let mut straggler = Straggler::default();
        assert!(!straggler.is_running());

        let (release, wait) = std::sync::mpsc::channel::<()>();
        straggler.park(tokio::task::spawn_blocking(move || {
            let _ = wait.recv();
            Report::new()
        }));
        assert!(straggler.is_running());
        assert!(straggler.is_running());

        release.send(()).unwrap();
        for _ in 0..500 {
            if !straggler.is_running() {
                break;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!straggler.is_running());
        assert!(straggler.0.is_none());
    }

    #[test]
    fn test_emit_empty_report() {
        let mut out = Vec::new();
        emit(&mut out, &Report::new()).unwrap();
        let back: Report = serde_json::from_slice(&out).unwrap();
        assert!(back.is_empty());
    }
}
