// SPDX-License-Identifier: MIT

//! Diagnostic rendering of intermediate sequence states.

use std::io::Write;

use log::{debug, trace, warn};

use crate::coordinator::{RoundObserver, RoundReport};
use crate::sequence::Sequence;

/// Space-separated rendering of `values`.
pub fn render_sequence(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes the full in-memory sequence, one line per round.
pub struct PrintObserver<W: Write> {
    out: W,
}

impl<W: Write> PrintObserver<W> {
    pub fn new(out: W) -> Self {
        PrintObserver { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RoundObserver for PrintObserver<W> {
    fn on_round(&mut self, _report: &RoundReport, sequence: &Sequence) {
        // Rendering is trace output only; a broken sink must not fail the
        // reduction.
        if let Err(err) = writeln!(self.out, "{}", render_sequence(&sequence.snapshot())) {
            warn!("failed to render round state: {err}");
        }
    }
}

/// Reports rounds through the `log` facade.
#[derive(Debug, Default)]
pub struct LogObserver;

impl RoundObserver for LogObserver {
    fn on_round(&mut self, report: &RoundReport, sequence: &Sequence) {
        debug!(
            "round {} finished, logical size now {}",
            report.round, report.size_after
        );
        if log::log_enabled!(log::Level::Trace) {
            trace!("state: {}", render_sequence(&sequence.snapshot()));
        }
    }
}
