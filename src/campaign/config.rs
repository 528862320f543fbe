//! Campaign configuration
//!
//! Plain structs with defaults and `with_*` builders. Everything is checked once, while the campaign
//! is still `Idle`; a configuration error means no solver is ever spawned.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use crate::errors::HarnessError;
use crate::instance::{self, DEFAULT_COORDINATE_MAX, MAX_TERMINALS};
use crate::invoker::resolve_binary;
use crate::oracle::{AbnormalExitPolicy, OutcomeComparator};

use super::fixtures::{Fixture, FixtureCatalog};

/// Randomized test matrix: `repetitions` × `[min_terminals, max_terminals]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomMatrix {
    pub repetitions: usize,
    pub min_terminals: usize,
    pub max_terminals: usize,
    /// Inclusive upper bound for generated coordinates.
    pub coordinate_max: u32,
}

impl Default for RandomMatrix {
    fn default() -> Self {
        Self {
            repetitions: 1,
            min_terminals: 1,
            max_terminals: 10,
            coordinate_max: DEFAULT_COORDINATE_MAX,
        }
    }
}

impl RandomMatrix {
    pub fn new(repetitions: usize, min_terminals: usize, max_terminals: usize) -> Self {
        Self {
            repetitions,
            min_terminals,
            max_terminals,
            ..Self::default()
        }
    }

    pub fn with_coordinate_max(mut self, coordinate_max: u32) -> Self {
        self.coordinate_max = coordinate_max;
        self
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.repetitions == 0 {
            return Err(HarnessError::configuration("repetition count must be at least 1"));
        }
        if self.min_terminals == 0 {
            return Err(HarnessError::configuration("minimum terminal count must be at least 1"));
        }
        if self.min_terminals > self.max_terminals {
            return Err(HarnessError::configuration(format!(
                "invalid terminal range: min {} > max {}",
                self.min_terminals, self.max_terminals
            )));
        }
        if self.max_terminals > MAX_TERMINALS {
            return Err(HarnessError::configuration(format!(
                "maximum terminal count {} exceeds the supported {MAX_TERMINALS}",
                self.max_terminals
            )));
        }
        Ok(())
    }

    /// Number of cases in a full, un-halted run, saturating at `usize::MAX`.
    pub fn case_count(&self) -> usize {
        if self.min_terminals > self.max_terminals {
            return 0;
        }
        (self.max_terminals - self.min_terminals)
            .saturating_add(1)
            .saturating_mul(self.repetitions)
    }

    /// `(repetition, terminal_count)` pairs, repetition outermost, zero-based repetition.
    pub fn cases(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let (min, max) = (self.min_terminals, self.max_terminals);
        (0..self.repetitions).flat_map(move |rep| (min..=max).map(move |n| (rep, n)))
    }
}

/// Fixed-answer campaign: one binary against every catalog entry.
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    pub binary: PathBuf,
    pub catalog: FixtureCatalog,
    pub comparator: OutcomeComparator,
}

/// A fixture whose file has been read and validated.
#[derive(Debug, Clone)]
pub struct LoadedFixture {
    pub fixture: Fixture,
    pub terminals: usize,
}

impl FixtureConfig {
    pub fn new(binary: impl Into<PathBuf>, catalog: FixtureCatalog) -> Self {
        Self {
            binary: binary.into(),
            catalog,
            comparator: OutcomeComparator::default(),
        }
    }

    pub fn with_abnormal_exit_policy(mut self, policy: AbnormalExitPolicy) -> Self {
        self.comparator = OutcomeComparator::new(policy);
        self
    }

    /// Validate the binary and read every fixture.
    ///
    /// A missing file or a corrupt count is a fixture-authoring defect and rejects the whole
    /// campaign.
    pub fn load(&self) -> Result<Vec<LoadedFixture>, HarnessError> {
        resolve_binary(&self.binary)?;
        if self.catalog.is_empty() {
            return Err(HarnessError::configuration("no fixtures selected"));
        }

        self.catalog
            .entries()
            .iter()
            .map(|fixture| {
                if !fixture.path.is_file() {
                    return Err(HarnessError::configuration(format!(
                        "fixture `{}` not found at `{}`",
                        fixture.name,
                        fixture.path.display()
                    )));
                }
                let instance = instance::read_fixture(&fixture.path).map_err(|e| match e {
                    HarnessError::Instance(source) => HarnessError::Fixture {
                        name: fixture.name.clone(),
                        source,
                    },
                    HarnessError::Io { path, source } => HarnessError::configuration(format!(
                        "cannot read fixture `{}` at `{}`: {source}",
                        fixture.name,
                        path.display()
                    )),
                    other => other,
                })?;
                Ok(LoadedFixture {
                    fixture: fixture.clone(),
                    terminals: instance.len(),
                })
            })
            .collect()
    }
}

/// Randomized differential campaign: two binaries on freshly generated instances.
#[derive(Debug, Clone)]
pub struct RandomConfig {
    pub first_binary: PathBuf,
    pub second_binary: PathBuf,
    pub matrix: RandomMatrix,
    pub seed: u64,
    /// Shared scratch file, rewritten in place for every case.
    pub instance_file: PathBuf,
    pub comparator: OutcomeComparator,
}

/// Per-process scratch file in the system temp directory.
pub fn default_instance_file() -> PathBuf {
    env::temp_dir().join(format!("solver_oracle_{}.instance", process::id()))
}

impl RandomConfig {
    pub fn new(
        first_binary: impl Into<PathBuf>,
        second_binary: impl Into<PathBuf>,
        matrix: RandomMatrix,
        seed: u64,
    ) -> Self {
        Self {
            first_binary: first_binary.into(),
            second_binary: second_binary.into(),
            matrix,
            seed,
            instance_file: default_instance_file(),
            comparator: OutcomeComparator::default(),
        }
    }

    pub fn with_instance_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.instance_file = path.into();
        self
    }

    pub fn with_abnormal_exit_policy(mut self, policy: AbnormalExitPolicy) -> Self {
        self.comparator = OutcomeComparator::new(policy);
        self
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        resolve_binary(&self.first_binary)?;
        resolve_binary(&self.second_binary)?;
        self.matrix.validate()?;

        let parent = self.instance_file.parent().unwrap_or_else(|| Path::new(""));
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(HarnessError::configuration(format!(
                "directory for instance file `{}` does not exist",
                self.instance_file.display()
            )));
        }
        Ok(())
    }
}
