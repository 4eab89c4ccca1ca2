//! Time step selections for periodic diagnostics.

use std::fmt;

use picdeck_core::render::encode;
use picdeck_core::{RenderContext, RenderError, RenderedObject, ValidationError, Value};
use serde::Serialize;

/// One `start:stop:step` range. Open bounds mean "from the first step" and
/// "until the last step".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StepRange {
    start: Option<u64>,
    stop: Option<u64>,
    step: u64,
}

impl StepRange {
    /// Range `start..stop` (stop exclusive) every `step` steps.
    pub fn new(start: Option<u64>, stop: Option<u64>, step: u64) -> Result<Self, ValidationError> {
        if step == 0 {
            return Err(ValidationError::out_of_range("step", 0.0, ">= 1"));
        }
        if let (Some(a), Some(b)) = (start, stop) {
            if a > b {
                return Err(ValidationError::invalid(
                    "stop",
                    format!("range {a}:{b} ends before it starts"),
                ));
            }
        }
        Ok(Self { start, stop, step })
    }

    /// Whether `step_index` is selected.
    pub fn contains(&self, step_index: u64) -> bool {
        let start = self.start.unwrap_or(0);
        step_index >= start
            && self.stop.is_none_or(|stop| step_index < stop)
            && (step_index - start) % self.step == 0
    }
}

impl fmt::Display for StepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        f.write_str(":")?;
        if let Some(stop) = self.stop {
            write!(f, "{stop}")?;
        }
        write!(f, ":{}", self.step)
    }
}

/// Union of step ranges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimeStepSpec {
    specs: Vec<StepRange>,
}

impl TimeStepSpec {
    /// Union of `ranges`; must not be empty.
    pub fn new(ranges: impl IntoIterator<Item = StepRange>) -> Result<Self, ValidationError> {
        let specs: Vec<StepRange> = ranges.into_iter().collect();
        if specs.is_empty() {
            return Err(ValidationError::invalid("specs", "at least one range is required"));
        }
        Ok(Self { specs })
    }

    /// Every `period` steps, starting at step zero.
    pub fn every(period: u64) -> Result<Self, ValidationError> {
        Self::new([StepRange::new(None, None, period)?])
    }

    /// Whether `step_index` is selected by any range.
    pub fn contains(&self, step_index: u64) -> bool {
        self.specs.iter().any(|r| r.contains(step_index))
    }

    /// The ranges in declaration order.
    pub fn ranges(&self) -> &[StepRange] {
        &self.specs
    }
}

/// Comma-separated `start:stop:step` notation of the backend.
impl fmt::Display for TimeStepSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.specs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{r}")?;
        }
        Ok(())
    }
}

impl RenderedObject for TimeStepSpec {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:time_step_spec"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}
