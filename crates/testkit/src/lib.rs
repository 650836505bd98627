#![warn(missing_docs)]
//! Sampling and recording helpers for provider tests and the CLI recorder.

use anyhow::Result;
use glam::DVec3;
use mdfx_core::SimTick;
use mdfx_providers::{Provider, ProviderDocument, ScalarNode, VectorNode};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Value of one field at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampleValue {
    /// Scalar field.
    Scalar(f64),
    /// Vector field as `[x, y, z]`.
    Vector([f64; 3]),
}

impl From<f64> for SampleValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<DVec3> for SampleValue {
    fn from(value: DVec3) -> Self {
        Self::Vector(value.to_array())
    }
}

/// One sampled field, as written to a JSONL log.
#[derive(Debug, Serialize)]
pub struct SampleRecord<'a> {
    /// Tick the value belongs to.
    pub tick: SimTick,
    /// Field name inside the document.
    pub field: &'a str,
    /// Sampled value.
    pub value: SampleValue,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append a record to the log.
    pub fn write(&mut self, record: &SampleRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }

    /// Append one record per field of `document` at its current tick.
    pub fn write_document(&mut self, document: &ProviderDocument) -> Result<()> {
        let tick = document.tick();
        for (field, node) in document.scalars() {
            self.write(&SampleRecord {
                tick,
                field,
                value: node.value().into(),
            })?;
        }
        for (field, node) in document.vectors() {
            self.write(&SampleRecord {
                tick,
                field,
                value: node.value().into(),
            })?;
        }
        Ok(())
    }
}

/// Refresh `provider` `ticks` times, collecting the value after each refresh.
pub fn sample<P: Provider>(provider: &mut P, ticks: usize) -> Vec<P::Output> {
    (0..ticks)
        .map(|_| {
            provider.refresh();
            provider.value()
        })
        .collect()
}

/// [`sample`] for scalar nodes.
pub fn sample_scalar(node: &mut ScalarNode, ticks: usize) -> Vec<f64> {
    sample(node, ticks)
}

/// [`sample`] for vector nodes.
pub fn sample_vector(node: &mut VectorNode, ticks: usize) -> Vec<DVec3> {
    sample(node, ticks)
}

/// Panic unless both sequences have the same length and agree within `tolerance`.
#[track_caller]
pub fn assert_close(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch: {actual:?} vs {expected:?}"
    );
    for (index, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "sample {index}: {a} != {e} (tolerance {tolerance})"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdfx_providers::ScalarGenerator;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn sample_collects_post_refresh_values() {
        let mut node: ScalarNode = ScalarGenerator::cycle(
            ScalarNode::constant(0.0),
            ScalarNode::constant(1.0),
            ScalarNode::constant(4.0),
            0.0,
        )
        .into();
        assert_close(&sample_scalar(&mut node, 4), &[0.25, 0.5, 0.75, 0.0], 1e-9);
    }

    #[test]
    fn jsonl_sink_writes_one_line_per_record() {
        let path = std::env::temp_dir().join(format!(
            "mdfx-samples-{}.jsonl",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write(&SampleRecord {
            tick: SimTick(3),
            field: "size",
            value: SampleValue::Scalar(1.5),
        })
        .expect("write succeeds");
        sink.write(&SampleRecord {
            tick: SimTick(3),
            field: "offset",
            value: DVec3::new(0.0, 1.0, 0.0).into(),
        })
        .expect("write succeeds");
        drop(sink);

        let contents = fs::read_to_string(&path).expect("file readable");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"tick":3,"field":"size","value":1.5}"#);
        assert_eq!(lines[1], r#"{"tick":3,"field":"offset","value":[0.0,1.0,0.0]}"#);
    }
}
