// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use curtain_core::trace::{AssetError, TraceSink, TransitionEvent, Warning};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[phase] region={} {} -> {} at {}ms",
            e.region.index(),
            e.from.as_str(),
            e.to.as_str(),
            e.at.millis(),
        );
    }

    fn on_warning(&mut self, w: &Warning) {
        let _ = writeln!(self.writer, "[warn] region={} {w}", w.region().index());
    }

    fn on_asset_error(&mut self, e: &AssetError) {
        let _ = writeln!(self.writer, "[error] region={} {e}", e.region.index());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curtain_core::region::{Phase, RegionId};
    use curtain_core::time::HostTime;

    #[test]
    fn pretty_print_transition() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_transition(&TransitionEvent {
            region: RegionId(3),
            from: Phase::AwaitingRemoval,
            to: Phase::Removing,
            at: HostTime(120),
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[phase]"), "got: {output}");
        assert!(output.contains("region=3"), "got: {output}");
        assert!(output.contains("awaiting-removal -> removing"), "got: {output}");
        assert!(output.contains("120ms"), "got: {output}");
    }

    #[test]
    fn pretty_print_diagnostics() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_warning(&Warning::UnknownLoader {
            region: RegionId(0),
            name: "dots".to_string(),
        });
        sink.on_asset_error(&AssetError {
            region: RegionId(1),
            url: "/missing.png".to_string(),
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[warn] region=0"), "got: {output}");
        assert!(lines[0].contains("\"dots\""), "got: {output}");
        assert!(lines[1].starts_with("[error] region=1"), "got: {output}");
        assert!(lines[1].ends_with("/missing.png"), "got: {output}");
    }
}
