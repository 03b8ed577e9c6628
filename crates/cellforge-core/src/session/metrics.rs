use super::Session;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Per-tick record returned by [`Session::tick`]. Doubles as the
/// tick-completed notification a front end re-renders from and as the
/// sample row of a [`RunSummary`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickReport {
    pub tick: usize,
    /// Net resource change this tick, before clamping.
    pub delta: i64,
    /// Balance after the delta was applied and clamped.
    pub resources: u64,
    pub avg_per_second: i64,
    pub births: usize,
    pub deaths: usize,
    pub alive_count: usize,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub final_resources: u64,
    pub final_avg_per_second: i64,
    pub final_alive_count: usize,
    #[serde(default)]
    pub total_births: usize,
    #[serde(default)]
    pub total_deaths: usize,
    pub samples: Vec<TickReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    TooManySteps { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
            ExperimentError::TooManySamples { max, actual } => {
                write!(
                    f,
                    "sample count ({actual}) exceeds supported maximum ({max})"
                )
            }
        }
    }
}

impl Error for ExperimentError {}

impl Session {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Drive `steps` ticks back-to-back, keeping every `sample_every`-th
    /// report (and always the last). Wall-clock pacing is the caller's
    /// business; see [`crate::cadence::TickCadence`].
    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        let births_before = self.total_births;
        let deaths_before = self.total_deaths;
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            let report = self.tick();
            if step % sample_every == 0 || step == steps {
                samples.push(report);
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            final_resources: self.ledger.resources(),
            final_avg_per_second: self.ledger.avg_per_second(),
            final_alive_count: self.grid.alive_count(),
            total_births: self.total_births - births_before,
            total_deaths: self.total_deaths - deaths_before,
            samples,
        })
    }
}
