//! Runs every enabled rule against one document and builds the [`Report`].
//!
//! A run goes `Idle → ContextBuilt → Checking → Reported`, or ends in
//! `Failed` when the document shape is not supported or the budget runs out.
//! A check that errors or panics never aborts the run: it is reported as a
//! single MUST violation of its rule.

mod report;

pub use report::Report;

use crate::config::RulesConfig;
use crate::context::Context;
use crate::error::{LintError, Result};
use crate::pointer::JsonPointer;
use crate::rules::{ActiveRule, Check, Registry};
use crate::violation::{Severity, Violation};
use dashmap::DashMap;
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Worker threads used for checks; 1 runs them in place
    pub jobs: usize,
    /// Wall-clock limit for the whole run
    pub budget: Option<Duration>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            budget: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    ContextBuilt,
    Checking,
    Reported,
    Failed,
}

struct Run {
    phase: RunPhase,
    started: Instant,
}

impl Run {
    fn start() -> Self {
        Self {
            phase: RunPhase::Idle,
            started: Instant::now(),
        }
    }

    fn enter(&mut self, phase: RunPhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, elapsed = ?self.started.elapsed(), "Run phase");
        self.phase = phase;
    }

    fn fail(&mut self, error: LintError) -> LintError {
        self.enter(RunPhase::Failed);
        tracing::error!(%error, "Validation run failed");
        error
    }
}

/// One check of one rule, scheduled for execution
struct Job<'r> {
    rule: &'r ActiveRule,
    check: Check<'r>,
}

pub struct Engine {
    registry: Registry,
    options: EngineOptions,
}

impl Engine {
    pub fn new(registry: Registry, options: EngineOptions) -> Self {
        Self { registry, options }
    }

    /// Discover the built-in rules for `config`
    pub fn from_config(config: &RulesConfig, options: EngineOptions) -> Result<Self> {
        Ok(Self::new(Registry::discover(config)?, options))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Validate a parsed document.
    pub fn validate(&self, document: &Value) -> Result<Report> {
        let mut run = Run::start();
        let context = Context::new(document).map_err(|e| run.fail(e))?;
        run.enter(RunPhase::ContextBuilt);
        self.check(&context, run)
    }

    /// Validate through an already built context.
    pub fn validate_context(&self, context: &Context<'_>) -> Result<Report> {
        let mut run = Run::start();
        run.enter(RunPhase::ContextBuilt);
        self.check(context, run)
    }

    fn check(&self, context: &Context<'_>, mut run: Run) -> Result<Report> {
        run.enter(RunPhase::Checking);
        let deadline = self.options.budget.map(|budget| run.started + budget);

        let jobs: Vec<Job<'_>> = self
            .registry
            .enabled()
            .flat_map(|rule| {
                rule.instance
                    .checks()
                    .into_iter()
                    .map(move |check| Job { rule, check })
            })
            .collect();
        tracing::debug!(checks = jobs.len(), jobs = self.options.jobs, "Running checks");

        let outcome = if self.options.jobs > 1 && jobs.len() > 1 {
            self.run_parallel(context, &jobs, deadline)
        } else {
            self.run_sequential(context, &jobs, deadline)
        };

        // A check that overran the budget voids the run even if it was the last one.
        let violations = match outcome {
            Some(violations) if !past(deadline) => violations,
            _ => {
                let budget = self.options.budget.unwrap_or_default();
                return Err(run.fail(LintError::Timeout(budget)));
            }
        };

        let report = Report::from_violations(violations);
        run.enter(RunPhase::Reported);
        tracing::info!(
            version = %context.version(),
            violations = report.len(),
            elapsed = ?run.started.elapsed(),
            "Validation finished"
        );
        run.enter(RunPhase::Idle);
        Ok(report)
    }

    /// `None` when the deadline passed before all checks ran.
    fn run_sequential(
        &self,
        context: &Context<'_>,
        jobs: &[Job<'_>],
        deadline: Option<Instant>,
    ) -> Option<Vec<Violation>> {
        let mut violations = vec![];
        for job in jobs {
            if past(deadline) {
                return None;
            }
            violations.extend(execute(job, context));
        }
        Some(violations)
    }

    fn run_parallel(
        &self,
        context: &Context<'_>,
        jobs: &[Job<'_>],
        deadline: Option<Instant>,
    ) -> Option<Vec<Violation>> {
        let results: DashMap<usize, Vec<Violation>> = DashMap::new();
        let next = AtomicUsize::new(0);
        let timed_out = AtomicBool::new(false);
        let workers = self.options.jobs.min(jobs.len());

        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    loop {
                        if timed_out.load(Ordering::Relaxed) {
                            break;
                        }
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(job) = jobs.get(index) else {
                            break;
                        };
                        if past(deadline) {
                            timed_out.store(true, Ordering::Relaxed);
                            break;
                        }
                        results.insert(index, execute(job, context));
                    }
                });
            }
        });

        if timed_out.load(Ordering::Relaxed) {
            return None;
        }
        Some(results.into_iter().flat_map(|(_, v)| v).collect())
    }
}

fn past(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

/// Run one check, turning errors and panics into a diagnostic violation.
fn execute(job: &Job<'_>, context: &Context<'_>) -> Vec<Violation> {
    let rule_id = job.rule.id();
    let severity = job.rule.check_severity(job.check.severity);

    let message = match panic::catch_unwind(AssertUnwindSafe(|| job.check.run(context))) {
        Ok(Ok(findings)) => {
            tracing::debug!(rule = rule_id, check = job.check.name, findings = findings.len(), "Check done");
            return findings
                .into_iter()
                .map(|finding| Violation::from_finding(rule_id, severity, finding))
                .collect();
        }
        Ok(Err(error)) => format!("{:#}", error),
        Err(payload) => panic_message(payload.as_ref()),
    };

    let error = LintError::RuleExecution {
        rule_id: rule_id.to_string(),
        message,
    };
    tracing::error!(%error, check = job.check.name, "Check failed");

    vec![Violation::new(
        rule_id,
        Severity::Must,
        format!(
            "Rule '{}' failed unexpectedly in check '{}'; its findings are incomplete",
            rule_id, job.check.name
        ),
        JsonPointer::root(),
    )]
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}
