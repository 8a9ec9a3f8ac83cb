use tracing::{debug, instrument, trace};

use crate::action::PlaceAction;
use crate::admission::RequirementSink;
use crate::config::DriverConfig;
use crate::error::{ConfigError, PipelineError};
use crate::stage::BoxedStage;

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The per-tick budget was used up; more work remains.
    Progress,
    /// The sink refused the next action. It is held until the next tick.
    Blocked,
    /// Every stage is drained.
    Finished,
}

/// What a tick (or a run of ticks) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub performed: usize,
    pub stages_advanced: usize,
    pub outcome: TickOutcome,
}

impl TickReport {
    fn new() -> Self {
        TickReport {
            performed: 0,
            stages_advanced: 0,
            outcome: TickOutcome::Progress,
        }
    }
}

/// Drives a chain of stages a bounded number of actions at a time.
///
/// The driver owns the current stage and moves to its successor once it has
/// nothing left. An action the sink refuses, or whose perform fails, is held
/// and offered again on the next tick; it is never retried within a tick.
pub struct PipelineDriver<'a, T, S> {
    stage: Option<BoxedStage<'a, T>>,
    pending: Option<PlaceAction<T>>,
    config: DriverConfig,
    sink: S,
    stage_index: usize,
}

impl<'a, T, S: RequirementSink> PipelineDriver<'a, T, S> {
    /// Creates a driver positioned at the start of `stage`.
    ///
    /// Fails if `config` does not pass [`DriverConfig::validate`].
    pub fn new(
        stage: BoxedStage<'a, T>,
        config: DriverConfig,
        sink: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(PipelineDriver {
            stage: Some(stage),
            pending: None,
            config,
            sink,
            stage_index: 0,
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Zero-based index of the stage currently being drained.
    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    /// The held action, if the last tick was blocked or failed.
    pub fn pending(&self) -> Option<&PlaceAction<T>> {
        self.pending.as_ref()
    }

    /// Drops the held action so the next tick moves on.
    pub fn discard_pending(&mut self) -> Option<PlaceAction<T>> {
        self.pending.take()
    }

    pub fn is_finished(&self) -> bool {
        self.stage.is_none() && self.pending.is_none()
    }

    /// Performs up to `actions_per_tick` actions.
    ///
    /// Errors from the stage, the requirement query or the perform are
    /// returned as-is. Actions performed earlier in the same tick stay performed.
    #[instrument(skip(self), fields(stage = self.stage_index))]
    pub fn tick(&mut self) -> Result<TickReport, PipelineError> {
        let mut report = TickReport::new();

        while report.performed < self.config.actions_per_tick {
            let action = match self.pending.take() {
                Some(action) => action,
                None => match self.next_action(&mut report)? {
                    Some(action) => action,
                    None => {
                        report.outcome = TickOutcome::Finished;
                        return Ok(report);
                    }
                },
            };
            let pos = action.pos();

            if self.config.check_requirements {
                let requirements = match action.requirements() {
                    Ok(requirements) => requirements,
                    Err(err) => {
                        self.pending = Some(action);
                        return Err(err.into());
                    }
                };
                if !self.sink.admit(&requirements) {
                    debug!(%pos, "requirements not met, holding action");
                    self.pending = Some(action);
                    report.outcome = TickOutcome::Blocked;
                    return Ok(report);
                }
                if let Err(err) = action.perform() {
                    self.pending = Some(action);
                    return Err(err.into());
                }
                self.sink.consume(&requirements);
            } else if let Err(err) = action.perform() {
                self.pending = Some(action);
                return Err(err.into());
            }

            trace!(%pos, "performed placement");
            report.performed += 1;
        }

        Ok(report)
    }

    /// Ticks until the pipeline finishes or blocks, summing the reports.
    pub fn run_to_completion(&mut self) -> Result<TickReport, PipelineError> {
        let mut total = TickReport::new();
        loop {
            let report = self.tick()?;
            total.performed += report.performed;
            total.stages_advanced += report.stages_advanced;
            if report.outcome != TickOutcome::Progress {
                total.outcome = report.outcome;
                return Ok(total);
            }
        }
    }

    fn next_action(
        &mut self,
        report: &mut TickReport,
    ) -> Result<Option<PlaceAction<T>>, PipelineError> {
        loop {
            let Some(stage) = self.stage.as_mut() else {
                return Ok(None);
            };
            if stage.has_next() {
                match stage.pull() {
                    Ok(action) => return Ok(Some(action)),
                    // Only skipped items were left.
                    Err(PipelineError::Exhausted) => {}
                    Err(err) => return Err(err),
                }
            }
            let successor = stage.successor();
            self.stage = successor;
            if self.stage.is_some() {
                self.stage_index += 1;
                report.stages_advanced += 1;
                debug!(stage = self.stage_index, "advanced to successor stage");
            } else {
                debug!("final stage drained");
            }
        }
    }
}
