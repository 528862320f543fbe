//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io;
use std::path::{Path, PathBuf};

use crate::campaign::{
    self, CampaignOutcome, CampaignReporter, ConsoleReporter, FixtureCatalog, FixtureConfig, JsonReporter,
    RandomConfig, RandomMatrix,
};
use crate::instance::{MAX_TERMINALS, fresh_seed, generate, seeded_rng, write, write_to_path};
use crate::invoker::ProcessInvoker;

use super::{CliError, CliResult, ExitCode, ReportArgs, ReportFormat};

/// Build the reporter selected on the command line.
fn reporter_for(report: &ReportArgs) -> Box<dyn CampaignReporter> {
    match report.format {
        ReportFormat::Console => Box::new(ConsoleReporter::stdout(report.verbose)),
        ReportFormat::Json => Box::new(JsonReporter::stdout()),
    }
}

fn exit_code_for(outcome: &CampaignOutcome) -> ExitCode {
    if outcome.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// `fixtures`: fixed-answer campaign over the built-in catalog or a manifest.
pub fn run_fixture_campaign(
    binary: &Path,
    fixture_dir: &Path,
    manifest: Option<&Path>,
    filter: Option<&str>,
    report: &ReportArgs,
) -> CliResult<ExitCode> {
    let catalog = match manifest {
        Some(manifest) => FixtureCatalog::from_manifest(manifest)?,
        None => FixtureCatalog::builtin(fixture_dir)?,
    }
    .filtered(filter);

    let config = FixtureConfig::new(binary, catalog).with_abnormal_exit_policy(report.on_abnormal_exit);
    let mut reporter = reporter_for(report);
    let outcome = campaign::run_fixtures(&config, &mut ProcessInvoker::new(), reporter.as_mut())?;
    Ok(exit_code_for(&outcome))
}

/// `random`: differential campaign between two binaries.
pub fn run_random_campaign(
    first: &Path,
    second: &Path,
    matrix: RandomMatrix,
    seed: Option<u64>,
    instance_file: Option<PathBuf>,
    report: &ReportArgs,
) -> CliResult<ExitCode> {
    let seed = seed.unwrap_or_else(|| {
        let seed = fresh_seed();
        tracing::info!("no seed given, using {seed}");
        seed
    });

    let mut config = RandomConfig::new(first, second, matrix, seed).with_abnormal_exit_policy(report.on_abnormal_exit);
    if let Some(path) = instance_file {
        config = config.with_instance_file(path);
    }

    let mut reporter = reporter_for(report);
    let outcome = campaign::run_differential(&config, &mut ProcessInvoker::new(), reporter.as_mut())?;
    Ok(exit_code_for(&outcome))
}

/// `generate`: write one instance to a file or stdout.
pub fn generate_instance(
    terminals: usize,
    coordinate_max: u32,
    seed: Option<u64>,
    output: Option<&Path>,
) -> CliResult<ExitCode> {
    if terminals == 0 {
        return Err(CliError::configuration("terminal count must be at least 1"));
    }
    if terminals > MAX_TERMINALS {
        return Err(CliError::configuration(format!(
            "terminal count {terminals} exceeds the supported {MAX_TERMINALS}"
        )));
    }
    let seed = seed.unwrap_or_else(fresh_seed);
    tracing::info!("generating {terminals} terminal(s) with seed {seed}");

    let instance = generate(&mut seeded_rng(seed), terminals, coordinate_max)
        .map_err(|e| CliError::failure(format!("Error generating instance: {e}")))?;

    match output {
        Some(path) => write_to_path(&instance, path)
            .map_err(|e| CliError::failure(format!("Error writing `{}`: {e}", path.display())))?,
        None => write(&instance, io::stdout().lock())
            .map_err(|e| CliError::failure(format!("Error writing instance: {e}")))?,
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::campaign::{CampaignMode, CampaignState, Tally};
    use crate::instance::parse;

    fn finished(mode: CampaignMode, state: CampaignState, passed: usize, failed: usize) -> CampaignOutcome {
        CampaignOutcome {
            mode,
            state,
            tally: Tally { passed, failed },
            failure: None,
            retained_instance: None,
            seed: None,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn test_exit_codes_follow_outcome() {
        let clean = finished(CampaignMode::Fixtures, CampaignState::Completed, 29, 0);
        assert_eq!(exit_code_for(&clean), ExitCode::SUCCESS);

        let failed_fixture = finished(CampaignMode::Fixtures, CampaignState::Completed, 28, 1);
        assert_eq!(exit_code_for(&failed_fixture), ExitCode::FAILURE);

        let halted = finished(CampaignMode::Differential, CampaignState::Halted, 4, 1);
        assert_eq!(exit_code_for(&halted), ExitCode::FAILURE);
    }

    #[test]
    fn test_generate_to_file_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        generate_instance(5, 999, Some(11), Some(&a)).unwrap();
        generate_instance(5, 999, Some(11), Some(&b)).unwrap();

        let text_a = std::fs::read_to_string(&a).unwrap();
        assert_eq!(text_a, std::fs::read_to_string(&b).unwrap());
        assert_eq!(parse("a", &text_a).unwrap().len(), 5);
    }

    #[test]
    fn test_generate_zero_terminals_rejected() {
        let err = generate_instance(0, 999, Some(1), None).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::CONFIGURATION);
    }

    #[test]
    fn test_generate_huge_count_rejected() {
        let err = generate_instance(99_999_999_999_999, 999, Some(1), None).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::CONFIGURATION);
        assert!(err.message.contains("exceeds the supported"), "{}", err.message);
    }

    #[test]
    fn test_fixture_campaign_missing_dir_is_configuration_error() {
        let report = ReportArgs {
            on_abnormal_exit: Default::default(),
            format: ReportFormat::Console,
            verbose: false,
        };
        let err = run_fixture_campaign(
            Path::new("/no/such/solver"),
            Path::new("/no/such/dir"),
            None,
            None,
            &report,
        )
        .unwrap_err();
        assert_eq!(err.exit_code, ExitCode::CONFIGURATION);
    }
}
