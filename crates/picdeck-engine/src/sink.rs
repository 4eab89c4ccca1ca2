//! Render sinks: where a built simulation goes.

use std::fs;
use std::path::PathBuf;

use picdeck_core::Value;

use crate::config::BuildError;

/// Receives the validated mapping of a built simulation, typically to hand
/// it to a code generator.
pub trait RenderSink {
    /// Store `rendered` under `file_name`.
    fn accept(&mut self, file_name: &str, rendered: &Value) -> Result<(), BuildError>;
}

/// Writes the mapping as pretty-printed JSON into a directory.
#[derive(Clone, Debug)]
pub struct JsonFileSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonFileSink {
    /// Sink writing into `dir`; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl RenderSink for JsonFileSink {
    fn accept(&mut self, file_name: &str, rendered: &Value) -> Result<(), BuildError> {
        let path = self.dir.join(file_name);
        let output_err = |reason: String| BuildError::Output {
            path: path.clone(),
            reason,
        };
        fs::create_dir_all(&self.dir).map_err(|e| output_err(e.to_string()))?;
        let text = serde_json::to_string_pretty(rendered).map_err(|e| output_err(e.to_string()))?;
        fs::write(&path, text).map_err(|e| output_err(e.to_string()))?;
        tracing::info!(path = %path.display(), "simulation written");
        self.written.push(path);
        Ok(())
    }
}

/// Keeps rendered mappings in memory. Useful for dry runs.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    outputs: Vec<(String, Value)>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted mappings with their file names, in order.
    pub fn outputs(&self) -> &[(String, Value)] {
        &self.outputs
    }

    /// The most recently accepted mapping.
    pub fn last(&self) -> Option<&Value> {
        self.outputs.last().map(|(_, v)| v)
    }
}

impl RenderSink for MemorySink {
    fn accept(&mut self, file_name: &str, rendered: &Value) -> Result<(), BuildError> {
        self.outputs.push((file_name.to_string(), rendered.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.accept("a.json", &json!({"n": 1})).unwrap();
        sink.accept("b.json", &json!({"n": 2})).unwrap();
        assert_eq!(sink.outputs()[0].0, "a.json");
        assert_eq!(sink.last(), Some(&json!({"n": 2})));
    }

    #[test]
    fn json_file_sink_round_trips() {
        let dir = std::env::temp_dir().join(format!("picdeck-sink-{}", std::process::id()));
        let mut sink = JsonFileSink::new(&dir);
        sink.accept("sim.json", &json!({"delta_t_si": 1e-17})).unwrap();
        let text = std::fs::read_to_string(dir.join("sim.json")).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back["delta_t_si"], json!(1e-17));
        assert_eq!(sink.written().len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
