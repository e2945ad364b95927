// Copyright 2026 the Curtain Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events recorded by a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes
//! [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Each region is its own track (`tid` = region index). Every phase a region
//! passes through becomes a complete (`"X"`) slice; entering
//! [`Phase::Removed`], warnings and asset errors become instant (`"i"`)
//! markers. Warnings and errors carry no timestamp of their own and are placed
//! at the region's most recent transition.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde_json::{Value, json};

use curtain_core::region::{Phase, RegionId};
use curtain_core::time::HostTime;
use curtain_core::trace::Warning;

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Phases still open at the end of the recording are not emitted.
pub fn export(recorded: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut open: BTreeMap<RegionId, (Phase, HostTime)> = BTreeMap::new();
    let mut last_seen: BTreeMap<RegionId, HostTime> = BTreeMap::new();

    for event in recorded {
        match event {
            RecordedEvent::Transition(e) => {
                if let Some((phase, since)) = open.remove(&e.region) {
                    events.push(json!({
                        "ph": "X",
                        "name": phase.as_str(),
                        "cat": "Lifecycle",
                        "ts": ms_to_us(since),
                        "dur": ms_to_us(e.at) - ms_to_us(since),
                        "pid": 0,
                        "tid": e.region.index(),
                    }));
                }
                last_seen.insert(e.region, e.at);
                if e.to.is_terminal() {
                    events.push(json!({
                        "ph": "i",
                        "name": "removed",
                        "cat": "Lifecycle",
                        "ts": ms_to_us(e.at),
                        "pid": 0,
                        "tid": e.region.index(),
                        "s": "t",
                    }));
                } else {
                    open.insert(e.region, (e.to, e.at));
                }
            }
            RecordedEvent::Warning(w) => {
                let region = w.region();
                let (name, args) = match w {
                    Warning::UnknownLoader { name, .. } => {
                        ("UnknownLoader", json!({ "name": name }))
                    }
                    Warning::MissingImageUrl { .. } => ("MissingImageUrl", json!({})),
                    Warning::PreloadFailed { url, .. } => ("PreloadFailed", json!({ "url": url })),
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Warning",
                    "ts": last_seen.get(&region).map_or(0.0, |&t| ms_to_us(t)),
                    "pid": 0,
                    "tid": region.index(),
                    "s": "t",
                    "args": args,
                }));
            }
            RecordedEvent::AssetError(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "AssetError",
                    "cat": "Error",
                    "ts": last_seen.get(&e.region).map_or(0.0, |&t| ms_to_us(t)),
                    "pid": 0,
                    "tid": e.region.index(),
                    "s": "t",
                    "args": {
                        "url": e.url,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ms_to_us(t: HostTime) -> f64 {
    t.millis() as f64 * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use curtain_core::trace::{AssetError, TraceSink, TransitionEvent};

    fn step(sink: &mut RecorderSink, region: u32, from: Phase, to: Phase, at: u64) {
        sink.on_transition(&TransitionEvent {
            region: RegionId(region),
            from,
            to,
            at: HostTime(at),
        });
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        step(&mut rec, 0, Phase::Pending, Phase::Built, 0);
        step(&mut rec, 0, Phase::Built, Phase::AwaitingRemoval, 0);
        step(&mut rec, 0, Phase::AwaitingRemoval, Phase::Removing, 100);
        step(&mut rec, 0, Phase::Removing, Phase::Removed, 600);

        let mut out = Vec::new();
        export(rec.events(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["ph"], "X");
        assert_eq!(parsed[0]["name"], "built");
        assert_eq!(parsed[0]["dur"], 0.0);

        assert_eq!(parsed[1]["name"], "awaiting-removal");
        assert_eq!(parsed[1]["dur"], 100_000.0);

        assert_eq!(parsed[2]["name"], "removing");
        assert_eq!(parsed[2]["ts"], 100_000.0);
        assert_eq!(parsed[2]["dur"], 500_000.0);

        assert_eq!(parsed[3]["ph"], "i");
        assert_eq!(parsed[3]["name"], "removed");
    }

    #[test]
    fn diagnostics_land_on_their_region_track() {
        let mut rec = RecorderSink::new();
        step(&mut rec, 2, Phase::Pending, Phase::Preloading, 7);
        rec.on_warning(&Warning::PreloadFailed {
            region: RegionId(2),
            url: "/logo.png".to_string(),
        });
        rec.on_asset_error(&AssetError {
            region: RegionId(4),
            url: "/other.png".to_string(),
        });

        let mut out = Vec::new();
        export(rec.events(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();

        // The open preloading span is not emitted.
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["name"], "PreloadFailed");
        assert_eq!(parsed[0]["tid"], 2);
        assert_eq!(parsed[0]["ts"], 7000.0);
        assert_eq!(parsed[0]["args"]["url"], "/logo.png");
        assert_eq!(parsed[1]["cat"], "Error");
        assert_eq!(parsed[1]["ts"], 0.0);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
