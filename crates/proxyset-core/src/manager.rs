//! Whole-system batches over the five targets.
//!
//! The manager owns one adapter per configuration surface and runs them
//! strictly in order: shell profiles, login environment, APT, desktop,
//! sudoers. A failing adapter never stops the batch; failures are
//! collected and reported together.

use std::sync::Arc;

use serde::Serialize;

use crate::config::ProxyConfig;
use crate::confirm::OverwritePrompt;
use crate::events::{BatchEvent, EventCallback, EventLevel};
use crate::paths::SystemPaths;
use crate::targets::{
    AptTarget, DesktopTarget, LoginEnvTarget, ProxyTarget, ShellProfileTarget, SudoersTarget,
    TargetKind,
};

/// What one target's detect turned up.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// The surface that was checked.
    pub target: TargetKind,
    /// Locations carrying proxy content, empty when the surface is clean.
    pub locations: Vec<String>,
}

/// Results of a whole-system check, one entry per target in batch order.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DetectionReport {
    pub detections: Vec<Detection>,
}

impl DetectionReport {
    /// Whether any target carries proxy content.
    pub fn any_found(&self) -> bool {
        self.detections.iter().any(|d| !d.locations.is_empty())
    }

    /// The targets that carry proxy content.
    pub fn found(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter().filter(|d| !d.locations.is_empty())
    }

    /// Every found location, flattened in batch order.
    pub fn found_locations(&self) -> Vec<String> {
        self.found()
            .flat_map(|d| d.locations.iter().cloned())
            .collect()
    }
}

/// One target's failure inside a batch.
#[derive(Debug, Clone, Serialize)]
pub struct TargetFailure {
    /// The surface that failed.
    pub target: TargetKind,
    /// The rendered error.
    pub message: String,
}

/// How a batch ended.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Every target operation succeeded.
    Completed,
    /// At least one target failed; the others still ran.
    Partial { failures: Vec<TargetFailure> },
    /// The overwrite confirmation was declined; nothing was touched.
    Declined,
}

impl BatchOutcome {
    /// Whether the batch ran to completion without failures.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The collected failures, empty unless the batch was partial.
    pub fn failures(&self) -> &[TargetFailure] {
        match self {
            Self::Partial { failures } => failures,
            _ => &[],
        }
    }
}

/// Runs check/apply/remove batches across all five targets.
pub struct ProxyManager {
    targets: Vec<Box<dyn ProxyTarget>>,
    on_event: Option<EventCallback>,
}

impl ProxyManager {
    /// Manager over the five production targets.
    pub fn new(paths: SystemPaths) -> Self {
        let targets: Vec<Box<dyn ProxyTarget>> = vec![
            Box::new(ShellProfileTarget::new(paths.clone())),
            Box::new(LoginEnvTarget::new(paths.clone())),
            Box::new(AptTarget::new(paths.clone())),
            Box::new(DesktopTarget::new()),
            Box::new(SudoersTarget::new(paths)),
        ];
        Self {
            targets,
            on_event: None,
        }
    }

    /// Manager over a custom target set, in the order given.
    pub fn with_targets(targets: Vec<Box<dyn ProxyTarget>>) -> Self {
        Self {
            targets,
            on_event: None,
        }
    }

    /// Sets the callback receiving progress events.
    pub fn on_event<F>(mut self, callback: F) -> Self
    where
        F: Fn(&BatchEvent) + Send + Sync + 'static,
    {
        self.on_event = Some(Arc::new(callback));
        self
    }

    fn emit(&self, event: BatchEvent) {
        match event.level {
            EventLevel::Debug => tracing::debug!("{}", event.message),
            EventLevel::Info => tracing::info!("{}", event.message),
            EventLevel::Warning => tracing::warn!("{}", event.message),
            EventLevel::Error => tracing::error!("{}", event.message),
        }
        if let Some(ref callback) = self.on_event {
            callback(&event);
        }
    }

    /// Run every target's detect.
    ///
    /// A target whose detect errors is reported clean; the underlying
    /// problem resurfaces as a failure on the next apply or remove.
    pub fn check_all(&self) -> DetectionReport {
        let mut detections = Vec::new();
        for target in &self.targets {
            self.emit(BatchEvent::info(format!("Checking {}...", target.kind())));
            let locations = match target.detect() {
                Ok(locations) => locations,
                Err(e) => {
                    self.emit(BatchEvent::warning(format!(
                        "Could not check {}: {}",
                        target.kind(),
                        e
                    )));
                    Vec::new()
                }
            };
            detections.push(Detection {
                target: target.kind(),
                locations,
            });
        }
        DetectionReport { detections }
    }

    /// Apply the configuration to every target.
    ///
    /// When the pre-scan finds existing settings and the caller has not
    /// confirmed overwriting, the batch ends [`BatchOutcome::Declined`]
    /// with nothing touched.
    pub fn apply_all(&self, config: &ProxyConfig, overwrite_confirmed: bool) -> BatchOutcome {
        self.apply_inner(config, &move |_: &str, _: &str| overwrite_confirmed)
    }

    /// Apply the configuration, asking `prompt` before overwriting.
    ///
    /// The question is only put when the pre-scan finds existing settings;
    /// the detection taken before the prompt also drives the cleanup pass,
    /// so a file edited in between is knowingly not re-validated.
    pub fn apply_with_prompt(
        &self,
        config: &ProxyConfig,
        prompt: &dyn OverwritePrompt,
    ) -> BatchOutcome {
        self.apply_inner(config, prompt)
    }

    fn apply_inner(&self, config: &ProxyConfig, prompt: &dyn OverwritePrompt) -> BatchOutcome {
        let report = self.check_all();
        if report.any_found() {
            self.emit(BatchEvent::warning(format!(
                "Proxy settings were detected in:\n{}",
                report.found_locations().join("\n")
            )));
            let overwrite = prompt.confirm(
                "Confirm Overwrite",
                "Some proxy settings were detected in your system. Do you want to overwrite them?",
            );
            if !overwrite {
                self.emit(BatchEvent::info("No settings were applied."));
                return BatchOutcome::Declined;
            }
            self.emit(BatchEvent::warning("Overwriting settings..."));
        }

        let mut failures = Vec::new();
        for detection in report.found() {
            let Some(target) = self.targets.iter().find(|t| t.kind() == detection.target) else {
                continue;
            };
            self.emit(BatchEvent::info(format!("Removing {}...", detection.target)));
            if let Err(e) = target.remove() {
                failures.push(TargetFailure {
                    target: detection.target,
                    message: e.to_string(),
                });
            }
        }
        for target in &self.targets {
            self.emit(BatchEvent::info(format!("Setting {}...", target.kind())));
            if let Err(e) = target.apply(config) {
                failures.push(TargetFailure {
                    target: target.kind(),
                    message: e.to_string(),
                });
            }
        }
        self.finish("applying", "applied", failures)
    }

    /// Strip proxy settings from every target, detected or not.
    pub fn remove_all(&self) -> BatchOutcome {
        let mut failures = Vec::new();
        for target in &self.targets {
            self.emit(BatchEvent::info(format!("Removing {}...", target.kind())));
            if let Err(e) = target.remove() {
                failures.push(TargetFailure {
                    target: target.kind(),
                    message: e.to_string(),
                });
            }
        }
        self.finish("removing", "removed", failures)
    }

    fn finish(&self, doing: &str, done: &str, failures: Vec<TargetFailure>) -> BatchOutcome {
        if failures.is_empty() {
            self.emit(BatchEvent::info(format!(
                "Proxy settings were successfully {}.",
                done
            )));
            BatchOutcome::Completed
        } else {
            let details: Vec<String> = failures
                .iter()
                .map(|f| format!("{}: {}", f.target, f.message))
                .collect();
            self.emit(BatchEvent::error(format!(
                "The following errors occurred while {} proxy settings:\n{}",
                doing,
                details.join("\n")
            )));
            BatchOutcome::Partial { failures }
        }
    }
}
