//! Campaign reporting
//!
//! ## CampaignReporter Trait
//!
//! Campaign drivers only decide verdicts; everything a user sees goes through a
//! [`CampaignReporter`]. Every case yields exactly one line.
//!
//! - [`ConsoleReporter`]: human-readable lines plus a summary
//! - [`JsonReporter`]: one JSON object per line, for CI tooling

use std::io::{self, IsTerminal, Write};

use serde_json::json;

use super::{CampaignMode, CampaignOutcome, CampaignState, CaseReport};
use crate::oracle::Verdict;

/// Receives campaign events in order: start, one call per case, finish.
pub trait CampaignReporter {
    fn on_campaign_start(&mut self, _mode: CampaignMode, _planned: usize) {}

    fn on_case_complete(&mut self, case: &CaseReport);

    fn on_campaign_complete(&mut self, outcome: &CampaignOutcome);
}

/// Render one case without colour.
pub fn case_line(mode: CampaignMode, case: &CaseReport) -> String {
    format!(
        "{}: {} {}",
        case_heading(case),
        case.verdict.label(),
        verdict_detail(mode, &case.verdict)
    )
}

/// Case id plus terminal count, everything before the verdict label.
fn case_heading(case: &CaseReport) -> String {
    match case.terminals {
        Some(n) => format!("{} ({n} terminals)", case.id),
        None => case.id.clone(),
    }
}

fn verdict_detail(mode: CampaignMode, verdict: &Verdict) -> String {
    match (mode, verdict) {
        (CampaignMode::Fixtures, Verdict::Pass { value }) => value.clone(),
        (CampaignMode::Differential, Verdict::Pass { value }) => format!("{value} {value}"),
        (CampaignMode::Fixtures, Verdict::Mismatch { left, right }) => {
            format!("expected {left}, got {right}")
        }
        (CampaignMode::Differential, Verdict::Mismatch { left, right }) => {
            format!("first {left}, second {right}")
        }
        (_, Verdict::Inconclusive { reason }) => reason.clone(),
    }
}

/// Render the closing summary without colour.
pub fn summary_line(outcome: &CampaignOutcome) -> String {
    let mut parts = Vec::new();
    if outcome.tally.passed > 0 || outcome.tally.failed == 0 {
        parts.push(format!("{} passed", outcome.tally.passed));
    }
    if outcome.tally.failed > 0 {
        parts.push(format!("{} failed", outcome.tally.failed));
    }
    let mut line = format!("{} in {:.2}s", parts.join(", "), outcome.duration.as_secs_f64());
    if let Some(seed) = outcome.seed {
        line.push_str(&format!(" (seed {seed})"));
    }
    line
}

/// Default console reporter.
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
    verbose: bool,
    mode: CampaignMode,
}

impl ConsoleReporter<io::Stdout> {
    /// Write to stdout, colouring only when it is a terminal.
    pub fn stdout(verbose: bool) -> Self {
        let color = io::stdout().is_terminal();
        Self::new(io::stdout(), color, verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool, verbose: bool) -> Self {
        Self {
            out,
            color,
            verbose,
            mode: CampaignMode::Fixtures,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> CampaignReporter for ConsoleReporter<W> {
    fn on_campaign_start(&mut self, mode: CampaignMode, planned: usize) {
        self.mode = mode;
        if self.verbose {
            let banner = self.paint(&format!("{} campaign: {planned} case(s) planned", mode.name()), "1");
            let _ = writeln!(self.out, "{banner}");
        }
    }

    fn on_case_complete(&mut self, case: &CaseReport) {
        let code = match case.verdict {
            Verdict::Pass { .. } => "32",
            Verdict::Mismatch { .. } => "31",
            Verdict::Inconclusive { .. } => "33",
        };
        let label = self.paint(case.verdict.label(), code);
        let detail = verdict_detail(self.mode, &case.verdict);
        let _ = writeln!(self.out, "{}: {label} {detail}", case_heading(case));
    }

    fn on_campaign_complete(&mut self, outcome: &CampaignOutcome) {
        let _ = writeln!(self.out);
        if let (CampaignState::Halted, Some(failure)) = (outcome.state, &outcome.failure) {
            let halted = self.paint("HALTED", "1;31");
            let _ = writeln!(self.out, "{halted} on {}", case_line(outcome.mode, failure));
            if let Some(path) = &outcome.retained_instance {
                let _ = writeln!(self.out, "failing instance kept at {}", path.display());
            }
        }
        let code = if outcome.all_passed() { "1;32" } else { "1;31" };
        let summary = self.paint(&format!("====== {} ======", summary_line(outcome)), code);
        let _ = writeln!(self.out, "{summary}");
        let _ = self.out.flush();
    }
}

/// Machine-readable reporter: one JSON object per line.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, value: serde_json::Value) {
        let _ = writeln!(self.out, "{value}");
    }
}

impl<W: Write> CampaignReporter for JsonReporter<W> {
    fn on_campaign_start(&mut self, mode: CampaignMode, planned: usize) {
        self.emit(json!({ "event": "start", "mode": mode.name(), "planned": planned }));
    }

    fn on_case_complete(&mut self, case: &CaseReport) {
        let mut value = json!({ "event": "case", "id": case.id, "terminals": case.terminals });
        let fields = match &case.verdict {
            Verdict::Pass { value } => json!({ "verdict": "pass", "value": value }),
            Verdict::Mismatch { left, right } => json!({ "verdict": "mismatch", "left": left, "right": right }),
            Verdict::Inconclusive { reason } => json!({ "verdict": "inconclusive", "reason": reason }),
        };
        if let (Some(obj), serde_json::Value::Object(extra)) = (value.as_object_mut(), fields) {
            obj.extend(extra);
        }
        self.emit(value);
    }

    fn on_campaign_complete(&mut self, outcome: &CampaignOutcome) {
        self.emit(json!({
            "event": "finish",
            "mode": outcome.mode.name(),
            "state": outcome.state.name(),
            "passed": outcome.tally.passed,
            "failed": outcome.tally.failed,
            "seed": outcome.seed,
            "failing_case": outcome.failure.as_ref().map(|c| c.id.clone()),
            "retained_instance": outcome.retained_instance.as_ref().map(|p| p.display().to_string()),
            "duration_ms": outcome.duration.as_millis() as u64,
        }));
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::campaign::Tally;

    fn case(id: &str, terminals: Option<usize>, verdict: Verdict) -> CaseReport {
        CaseReport {
            id: id.to_string(),
            terminals,
            verdict,
        }
    }

    fn outcome(state: CampaignState, passed: usize, failed: usize) -> CampaignOutcome {
        CampaignOutcome {
            mode: CampaignMode::Differential,
            state,
            tally: Tally { passed, failed },
            failure: None,
            retained_instance: None,
            seed: Some(42),
            duration: Duration::from_millis(1250),
        }
    }

    #[test]
    fn test_fixture_lines() {
        let pass = case("i01", Some(3), Verdict::Pass { value: "971".into() });
        insta::assert_snapshot!(case_line(CampaignMode::Fixtures, &pass), @"i01 (3 terminals): PASSED 971");

        let fail = case(
            "i01",
            Some(3),
            Verdict::Mismatch {
                left: "971".into(),
                right: "970".into(),
            },
        );
        insta::assert_snapshot!(
            case_line(CampaignMode::Fixtures, &fail),
            @"i01 (3 terminals): FAILED expected 971, got 970"
        );
    }

    #[test]
    fn test_differential_lines() {
        let pass = case("rep 1/50", Some(7), Verdict::Pass { value: "1234".into() });
        insta::assert_snapshot!(
            case_line(CampaignMode::Differential, &pass),
            @"rep 1/50 (7 terminals): PASSED 1234 1234"
        );

        let odd = case(
            "rep 2/50",
            Some(4),
            Verdict::Inconclusive {
                reason: "second solver: solver exited with status 3 (output: \"\")".into(),
            },
        );
        insta::assert_snapshot!(
            case_line(CampaignMode::Differential, &odd),
            @r#"rep 2/50 (4 terminals): INCONCLUSIVE second solver: solver exited with status 3 (output: "")"#
        );
    }

    #[test]
    fn test_summary_line() {
        insta::assert_snapshot!(
            summary_line(&outcome(CampaignState::Completed, 10, 0)),
            @"10 passed in 1.25s (seed 42)"
        );
        insta::assert_snapshot!(
            summary_line(&outcome(CampaignState::Halted, 3, 1)),
            @"3 passed, 1 failed in 1.25s (seed 42)"
        );
        insta::assert_snapshot!(
            summary_line(&outcome(CampaignState::Halted, 0, 1)),
            @"1 failed in 1.25s (seed 42)"
        );
    }

    #[test]
    fn test_console_reporter_halted_output() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false, false);
        reporter.on_campaign_start(CampaignMode::Differential, 4);
        let failing = case(
            "rep 1/2",
            Some(3),
            Verdict::Mismatch {
                left: "same".into(),
                right: "different".into(),
            },
        );
        reporter.on_case_complete(&failing);

        let mut done = outcome(CampaignState::Halted, 2, 1);
        done.failure = Some(failing);
        done.retained_instance = Some(PathBuf::from("/tmp/inst"));
        reporter.on_campaign_complete(&done);

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "rep 1/2 (3 terminals): FAILED first same, second different");
        assert_eq!(lines[2], "HALTED on rep 1/2 (3 terminals): FAILED first same, second different");
        assert_eq!(lines[3], "failing instance kept at /tmp/inst");
        assert_eq!(lines[4], "====== 2 passed, 1 failed in 1.25s (seed 42) ======");
    }

    #[test]
    fn test_console_reporter_colours_label_only() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true, false);
        reporter.on_case_complete(&case("i02", None, Verdict::Pass { value: "1932".into() }));
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text, "i02: \x1b[32mPASSED\x1b[0m 1932\n");
    }

    #[test]
    fn test_console_reporter_leaves_label_like_ids_alone() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true, false);
        reporter.on_case_complete(&case(
            "PASSED_before",
            Some(2),
            Verdict::Mismatch {
                left: "10".into(),
                right: "11".into(),
            },
        ));
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "PASSED_before (2 terminals): \x1b[31mFAILED\x1b[0m expected 10, got 11\n"
        );
    }

    #[test]
    fn test_json_reporter_events() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.on_campaign_start(CampaignMode::Fixtures, 1);
        reporter.on_case_complete(&case(
            "i01",
            Some(3),
            Verdict::Mismatch {
                left: "971".into(),
                right: "970".into(),
            },
        ));
        reporter.on_campaign_complete(&outcome(CampaignState::Completed, 0, 1));

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let events: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["mode"], "fixtures");
        assert_eq!(events[1]["verdict"], "mismatch");
        assert_eq!(events[1]["left"], "971");
        assert_eq!(events[1]["right"], "970");
        assert_eq!(events[1]["terminals"], 3);
        assert_eq!(events[2]["state"], "completed");
        assert_eq!(events[2]["failed"], 1);
        assert_eq!(events[2]["seed"], 42);
        assert!(events[2]["retained_instance"].is_null());
    }
}
