use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::watch;

use crate::card::model::QualityTier;
use crate::foundation::error::{GlassError, GlassResult};

/// Lines of encoder stderr kept for failure reports.
const STDERR_TAIL_LINES: usize = 40;

/// Wall-clock budget for one encode: `base + duration * tier multiplier`.
pub fn encode_timeout(base_secs: u64, duration_secs: f64, tier: QualityTier) -> Duration {
    let scaled = duration_secs.max(0.0) * tier.timeout_multiplier() as f64;
    Duration::from_secs(base_secs) + Duration::from_secs_f64(scaled)
}

/// Runs the native encoder as a child process bounded by a timeout and an optional
/// cancellation signal. The child is killed on timeout, cancellation, or drop.
#[derive(Clone, Debug)]
pub struct EncoderRunner {
    program: PathBuf,
    timeout: Duration,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl EncoderRunner {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
            cancel_rx: None,
        }
    }

    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn run(&self, args: &[String]) -> GlassResult<()> {
        if let Some(rx) = &self.cancel_rx
            && *rx.borrow()
        {
            return Err(GlassError::Cancelled);
        }

        tracing::debug!(program = %self.program.display(), args = %args.join(" "), "spawning encoder");
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GlassError::encoder_failed(
                    format!("failed to spawn '{}': {e}", self.program.display()),
                    None,
                    None,
                )
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| GlassError::encoder_failed("encoder stderr not captured", None, None))?;
        let drain = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::trace!(target: "glasscard::encoder", "{line}");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            Vec::from(tail).join("\n")
        });

        let mut cancel = self.cancel_rx.clone();
        let cancelled = async {
            match cancel.as_mut() {
                Some(rx) => loop {
                    if *rx.borrow_and_update() {
                        break;
                    }
                    if rx.changed().await.is_err() {
                        // Sender gone: cancellation can no longer happen.
                        std::future::pending::<()>().await;
                    }
                },
                None => std::future::pending::<()>().await,
            }
        };

        let outcome = tokio::select! {
            status = tokio::time::timeout(self.timeout, child.wait()) => match status {
                Ok(Ok(status)) => Ok(status),
                Ok(Err(e)) => Err(GlassError::encoder_failed(
                    format!("failed to wait for encoder: {e}"),
                    None,
                    None,
                )),
                Err(_) => {
                    tracing::warn!(secs = self.timeout.as_secs(), "encoder timed out; killing");
                    let _ = child.kill().await;
                    Err(GlassError::ProcessingTimeout(self.timeout.as_secs()))
                }
            },
            () = cancelled => {
                tracing::info!("encode cancelled; killing encoder");
                let _ = child.kill().await;
                Err(GlassError::Cancelled)
            }
        };

        let status = match outcome {
            Ok(status) => status,
            Err(err) => {
                // Orphaned grandchildren may still hold stderr open.
                drain.abort();
                return Err(err);
            }
        };
        let tail = drain.await.unwrap_or_default();
        if status.success() {
            Ok(())
        } else {
            let tail = tail.trim();
            Err(GlassError::encoder_failed(
                format!("encoder exited with status {status}"),
                (!tail.is_empty()).then(|| tail.to_string()),
                status.code(),
            ))
        }
    }
}

/// Whether `program -version` runs successfully.
pub fn is_available(program: &Path) -> bool {
    std::process::Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/runner.rs"]
mod tests;
