//! Test campaigns
//!
//! A campaign walks a test matrix, runs the solver(s) on each case, judges the output and reports
//! one line per case.
//!
//! ## State machine
//!
//! `Idle → Running → {Completed, Halted}`
//!
//! - **Fixed-fixture mode** always runs every fixture and ends `Completed`.
//! - **Randomized differential mode** stops at the first case that does not pass and ends
//!   `Halted`; no further solver is spawned.
//!
//! Execution is strictly sequential. In differential mode all cases share one instance file that is
//! rewritten in place; it is only touched after both solvers of the previous case have exited.
//!
//! ## Modules
//!
//! - `config` - campaign configuration and validation
//! - `fixtures` - the fixture catalog
//! - `reporter` - console and JSON reporters

pub mod config;
pub mod fixtures;
pub mod reporter;

use std::fs;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::errors::HarnessError;
use crate::instance::{generate, seeded_rng, write_to_path};
use crate::invoker::SolverInvoker;
use crate::oracle::Verdict;

pub use config::{FixtureConfig, LoadedFixture, RandomConfig, RandomMatrix, default_instance_file};
pub use fixtures::{Fixture, FixtureCatalog};
pub use reporter::{CampaignReporter, ConsoleReporter, JsonReporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignMode {
    Fixtures,
    Differential,
}

impl CampaignMode {
    pub fn name(self) -> &'static str {
        match self {
            CampaignMode::Fixtures => "fixtures",
            CampaignMode::Differential => "differential",
        }
    }

    fn fail_fast(self) -> bool {
        matches!(self, CampaignMode::Differential)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignState {
    Idle,
    Running,
    Completed,
    Halted,
}

impl CampaignState {
    pub fn name(self) -> &'static str {
        match self {
            CampaignState::Idle => "idle",
            CampaignState::Running => "running",
            CampaignState::Completed => "completed",
            CampaignState::Halted => "halted",
        }
    }
}

/// Pass/fail counts. Inconclusive cases count as failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
}

/// One judged case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub id: String,
    pub terminals: Option<usize>,
    pub verdict: Verdict,
}

/// Final state of a campaign, read by reporters and the CLI.
#[derive(Debug, Clone)]
pub struct CampaignOutcome {
    pub mode: CampaignMode,
    pub state: CampaignState,
    pub tally: Tally,
    /// The case that halted a differential campaign.
    pub failure: Option<CaseReport>,
    /// Instance file left on disk for triage after a halt.
    pub retained_instance: Option<PathBuf>,
    pub seed: Option<u64>,
    pub duration: Duration,
}

impl CampaignOutcome {
    pub fn all_passed(&self) -> bool {
        self.state == CampaignState::Completed && self.tally.failed == 0
    }
}

/// Campaign bookkeeping: state, tally and the halt decision.
#[derive(Debug)]
pub struct Campaign {
    mode: CampaignMode,
    state: CampaignState,
    tally: Tally,
    failure: Option<CaseReport>,
    started: Instant,
}

impl Campaign {
    pub fn new(mode: CampaignMode) -> Self {
        Self {
            mode,
            state: CampaignState::Idle,
            tally: Tally::default(),
            failure: None,
            started: Instant::now(),
        }
    }

    pub fn state(&self) -> CampaignState {
        self.state
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn start(&mut self) {
        if self.state == CampaignState::Idle {
            self.state = CampaignState::Running;
            self.started = Instant::now();
        }
    }

    /// Count one case. Breaks when the campaign must not run anything else.
    pub fn record(&mut self, case: CaseReport) -> ControlFlow<()> {
        if self.state != CampaignState::Running {
            return ControlFlow::Break(());
        }
        if case.verdict.is_pass() {
            self.tally.passed += 1;
            return ControlFlow::Continue(());
        }
        self.tally.failed += 1;
        if self.mode.fail_fast() {
            self.failure = Some(case);
            self.state = CampaignState::Halted;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    pub fn finish(mut self) -> CampaignOutcome {
        if self.state == CampaignState::Running {
            self.state = CampaignState::Completed;
        }
        CampaignOutcome {
            mode: self.mode,
            state: self.state,
            tally: self.tally,
            failure: self.failure,
            retained_instance: None,
            seed: None,
            duration: self.started.elapsed(),
        }
    }
}

/// Run one binary against every fixture in the catalog.
#[tracing::instrument(skip_all, fields(binary = %config.binary.display(), fixtures = config.catalog.len()))]
pub fn run_fixtures<I, R>(
    config: &FixtureConfig,
    invoker: &mut I,
    reporter: &mut R,
) -> Result<CampaignOutcome, HarnessError>
where
    I: SolverInvoker + ?Sized,
    R: CampaignReporter + ?Sized,
{
    let plan = config.load()?;

    let mut campaign = Campaign::new(CampaignMode::Fixtures);
    campaign.start();
    reporter.on_campaign_start(CampaignMode::Fixtures, plan.len());

    for entry in &plan {
        let result = invoker.run(&config.binary, &entry.fixture.path);
        let verdict = config.comparator.against_expected(result, &entry.fixture.expected);
        let case = CaseReport {
            id: entry.fixture.name.clone(),
            terminals: Some(entry.terminals),
            verdict,
        };
        reporter.on_case_complete(&case);
        // every fixture is independent ground truth; never stops early
        let _ = campaign.record(case);
    }

    let outcome = campaign.finish();
    tracing::info!(passed = outcome.tally.passed, failed = outcome.tally.failed, "fixture campaign finished");
    reporter.on_campaign_complete(&outcome);
    Ok(outcome)
}

/// Run two binaries on generated instances until the matrix is exhausted or they disagree.
#[tracing::instrument(skip_all, fields(seed = config.seed, cases = tracing::field::Empty))]
pub fn run_differential<I, R>(
    config: &RandomConfig,
    invoker: &mut I,
    reporter: &mut R,
) -> Result<CampaignOutcome, HarnessError>
where
    I: SolverInvoker + ?Sized,
    R: CampaignReporter + ?Sized,
{
    config.validate()?;
    let case_count = config.matrix.case_count();
    tracing::Span::current().record("cases", case_count);

    let mut rng = seeded_rng(config.seed);
    let repetitions = config.matrix.repetitions;

    let mut campaign = Campaign::new(CampaignMode::Differential);
    campaign.start();
    tracing::info!(
        instance_file = %config.instance_file.display(),
        "differential campaign started with seed {}",
        config.seed
    );
    reporter.on_campaign_start(CampaignMode::Differential, case_count);

    for (repetition, terminals) in config.matrix.cases() {
        let instance = generate(&mut rng, terminals, config.matrix.coordinate_max)?;
        write_to_path(&instance, &config.instance_file).map_err(|e| HarnessError::io(&config.instance_file, e))?;

        let first = invoker.run(&config.first_binary, &config.instance_file);
        let second = invoker.run(&config.second_binary, &config.instance_file);
        let case = CaseReport {
            id: format!("rep {}/{}", repetition + 1, repetitions),
            terminals: Some(terminals),
            verdict: config.comparator.between(first, second),
        };
        reporter.on_case_complete(&case);
        if campaign.record(case).is_break() {
            break;
        }
    }

    let mut outcome = campaign.finish();
    outcome.seed = Some(config.seed);
    if outcome.state == CampaignState::Halted {
        tracing::warn!(instance_file = %config.instance_file.display(), "campaign halted on disagreement");
        outcome.retained_instance = Some(config.instance_file.clone());
    } else if let Err(e) = fs::remove_file(&config.instance_file) {
        tracing::debug!(error = %e, "could not remove instance file");
    }
    reporter.on_campaign_complete(&outcome);
    Ok(outcome)
}
