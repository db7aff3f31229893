//! Purpose: Run the fixture link chain in-process and report per-symbol results.
//! Exports: `Expectations`, `SymbolCheck`, `ChainReport`, `run_chain`, `verify`.
//! Role: Typed front half of the verification; the raw C-ABI entry points keep
//! their abort-on-mismatch behavior.
//! Invariants: `target()` is only entered when its internal assert is known to
//! pass; otherwise the check is recorded as skipped-and-failed.
use libc::c_int;
use serde::Serialize;
use tracing::debug;

use crate::core::error::{Error, ErrorKind};

/// Expected sentinel per exported symbol. Defaults to the documented values;
/// overrides let a harness model a stale consumer without rebuilding fixtures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Expectations {
    pub foo: c_int,
    pub bar: c_int,
    pub target: c_int,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            foo: foo::FOO_SENTINEL,
            bar: bar::BAR_SENTINEL,
            target: target::TARGET_SENTINEL,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SymbolCheck {
    pub symbol: &'static str,
    pub expected: c_int,
    /// `None` when the symbol was never entered.
    pub actual: Option<c_int>,
    pub ok: bool,
}

impl SymbolCheck {
    fn observed(symbol: &'static str, expected: c_int, actual: c_int) -> Self {
        Self {
            symbol,
            expected,
            actual: Some(actual),
            ok: actual == expected,
        }
    }

    fn skipped(symbol: &'static str, expected: c_int) -> Self {
        Self {
            symbol,
            expected,
            actual: None,
            ok: false,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ChainReport {
    pub checks: Vec<SymbolCheck>,
    pub ok: bool,
}

/// Call `foo()`, `bar()`, and `target()` through their exported entry points
/// and compare each return value against the expectation set.
pub fn run_chain(expect: &Expectations) -> ChainReport {
    let mut checks = Vec::with_capacity(3);

    let foo_actual = foo::foo();
    debug!(actual = foo_actual, expected = expect.foo, "checked foo()");
    checks.push(SymbolCheck::observed("foo", expect.foo, foo_actual));

    let bar_actual = bar::bar();
    debug!(actual = bar_actual, expected = expect.bar, "checked bar()");
    checks.push(SymbolCheck::observed("bar", expect.bar, bar_actual));

    // target() aborts the whole process when bar's value is off; record the
    // skip as a failed check so the harness can report a typed error instead.
    match target::check_dependency(bar_actual) {
        Ok(()) => {
            let target_actual = target::target();
            debug!(
                actual = target_actual,
                expected = expect.target,
                "checked target()"
            );
            checks.push(SymbolCheck::observed("target", expect.target, target_actual));
        }
        Err(mismatch) => {
            debug!(%mismatch, "skipping target()");
            checks.push(SymbolCheck::skipped("target", expect.target));
        }
    }

    let ok = checks.iter().all(|check| check.ok);
    ChainReport { checks, ok }
}

/// Contract error naming the first failed symbol, if any.
pub fn verify(report: &ChainReport) -> Result<(), Error> {
    let failed = match report.checks.iter().find(|check| !check.ok) {
        None => return Ok(()),
        Some(check) => check,
    };
    let message = match failed.actual {
        Some(actual) => format!(
            "{}() returned {actual}, expected {}",
            failed.symbol, failed.expected
        ),
        None => format!(
            "{}() not entered: dependency sentinel mismatch",
            failed.symbol
        ),
    };
    Err(Error::new(ErrorKind::Contract)
        .with_message(message)
        .with_symbol(failed.symbol))
}

#[cfg(test)]
mod tests {
    use super::{Expectations, run_chain, verify};
    use crate::core::error::ErrorKind;

    #[test]
    fn default_expectations_all_pass() {
        let report = run_chain(&Expectations::default());
        assert!(report.ok);
        assert_eq!(report.checks.len(), 3);
        let actuals: Vec<_> = report
            .checks
            .iter()
            .map(|check| (check.symbol, check.actual))
            .collect();
        assert_eq!(
            actuals,
            [
                ("foo", Some(123)),
                ("bar", Some(456)),
                ("target", Some(789))
            ]
        );
        assert!(verify(&report).is_ok());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let first = run_chain(&Expectations::default());
        let second = run_chain(&Expectations::default());
        assert_eq!(first.checks, second.checks);
    }

    #[test]
    fn stale_consumer_expectation_fails_bar_and_skips_nothing() {
        // bar() still returns its real sentinel; only the expectation is off.
        let expect = Expectations {
            bar: 457,
            ..Expectations::default()
        };
        let report = run_chain(&expect);
        assert!(!report.ok);

        let bar = &report.checks[1];
        assert_eq!(bar.symbol, "bar");
        assert_eq!(bar.actual, Some(456));
        assert!(!bar.ok);

        // target's own assert condition holds, so it was still entered.
        let target = &report.checks[2];
        assert_eq!(target.actual, Some(789));
        assert!(target.ok);

        let err = verify(&report).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Contract);
        assert_eq!(err.symbol(), Some("bar"));
    }

    #[test]
    fn target_expectation_mismatch_is_a_contract_error() {
        let expect = Expectations {
            target: 790,
            ..Expectations::default()
        };
        let report = run_chain(&expect);
        assert!(!report.ok);
        let err = verify(&report).unwrap_err();
        assert_eq!(err.symbol(), Some("target"));
        assert!(err.to_string().contains("returned 789, expected 790"));
    }
}
