//! Diagnostics and output plugins.

use picdeck_core::{
    check, tagged_group, Map, RenderContext, RenderError, RenderedObject, ValidationError, Value,
};
use picdeck_species::SpeciesRef;
use serde::Serialize;
use serde_json::json;

use crate::solver::Axis;
use crate::timestep::TimeStepSpec;

// ── PhaseSpace ─────────────────────────────────────────────────────

/// Momentum component binned by [`PhaseSpace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentumComponent {
    /// p_x.
    Px,
    /// p_y.
    Py,
    /// p_z.
    Pz,
}

/// 2D histogram of one spatial coordinate against one momentum component.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseSpace {
    species: SpeciesRef,
    period: TimeStepSpec,
    spatial_coordinate: Axis,
    momentum_coordinate: MomentumComponent,
    min_momentum: f64,
    max_momentum: f64,
}

impl PhaseSpace {
    /// Phase space of `species`; momenta are in m_species * c.
    ///
    /// Rejects `min_momentum >= max_momentum`.
    pub fn new(
        species: SpeciesRef,
        period: TimeStepSpec,
        spatial_coordinate: Axis,
        momentum_coordinate: MomentumComponent,
        min_momentum: f64,
        max_momentum: f64,
    ) -> Result<Self, ValidationError> {
        check::finite("min_momentum", min_momentum)?;
        check::finite("max_momentum", max_momentum)?;
        if min_momentum >= max_momentum {
            return Err(ValidationError::invalid(
                "min_momentum",
                format!("min_momentum {min_momentum} must be below max_momentum {max_momentum}"),
            ));
        }
        Ok(Self {
            species,
            period,
            spatial_coordinate,
            momentum_coordinate,
            min_momentum,
            max_momentum,
        })
    }
}

impl RenderedObject for PhaseSpace {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:plugin.phase_space"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({
            "species": self.species.name,
            "period": self.period.render(ctx)?,
            "spatial_coordinate": self.spatial_coordinate,
            "momentum_coordinate": self.momentum_coordinate,
            "min_momentum": self.min_momentum,
            "max_momentum": self.max_momentum,
        }))
    }
}

// ── EnergyHistogram ────────────────────────────────────────────────

/// Histogram of kinetic energies.
#[derive(Clone, Debug, PartialEq)]
pub struct EnergyHistogram {
    species: SpeciesRef,
    period: TimeStepSpec,
    bin_count: u32,
    min_energy_kev: f64,
    max_energy_kev: f64,
}

impl EnergyHistogram {
    /// `bin_count` bins between `min_energy_kev` and `max_energy_kev`.
    pub fn new(
        species: SpeciesRef,
        period: TimeStepSpec,
        bin_count: u32,
        min_energy_kev: f64,
        max_energy_kev: f64,
    ) -> Result<Self, ValidationError> {
        if bin_count == 0 {
            return Err(ValidationError::out_of_range("bin_count", 0.0, ">= 1"));
        }
        check::non_negative("min_energy_kev", min_energy_kev)?;
        check::positive("max_energy_kev", max_energy_kev)?;
        if min_energy_kev >= max_energy_kev {
            return Err(ValidationError::invalid(
                "min_energy_kev",
                format!("min_energy_kev {min_energy_kev} must be below max_energy_kev {max_energy_kev}"),
            ));
        }
        Ok(Self {
            species,
            period,
            bin_count,
            min_energy_kev,
            max_energy_kev,
        })
    }
}

impl RenderedObject for EnergyHistogram {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:plugin.energy_histogram"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({
            "species": self.species.name,
            "period": self.period.render(ctx)?,
            "bin_count": self.bin_count,
            "min_energy_kev": self.min_energy_kev,
            "max_energy_kev": self.max_energy_kev,
        }))
    }
}

// ── MacroParticleCount ─────────────────────────────────────────────

/// Number of macro-particles of a species.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroParticleCount {
    /// Counted species.
    pub species: SpeciesRef,
    /// When to count.
    pub period: TimeStepSpec,
}

impl RenderedObject for MacroParticleCount {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:plugin.macro_particle_count"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({
            "species": self.species.name,
            "period": self.period.render(ctx)?,
        }))
    }
}

// ── Checkpoint ─────────────────────────────────────────────────────

/// Restartable snapshots, by step or by wall-clock period.
#[derive(Clone, Debug, PartialEq)]
pub struct Checkpoint {
    period: Option<TimeStepSpec>,
    time_period_minutes: Option<u32>,
    directory: Option<String>,
}

impl Checkpoint {
    /// At least one of `period` and `time_period_minutes` is required.
    pub fn new(
        period: Option<TimeStepSpec>,
        time_period_minutes: Option<u32>,
        directory: Option<String>,
    ) -> Result<Self, ValidationError> {
        if period.is_none() && time_period_minutes.is_none() {
            return Err(ValidationError::invalid(
                "period",
                "either a step period or a time period is required",
            ));
        }
        if time_period_minutes == Some(0) {
            return Err(ValidationError::out_of_range("time_period_minutes", 0.0, ">= 1"));
        }
        if let Some(dir) = &directory {
            if dir.trim().is_empty() {
                return Err(ValidationError::invalid("directory", "must not be blank"));
            }
        }
        Ok(Self {
            period,
            time_period_minutes,
            directory,
        })
    }
}

impl RenderedObject for Checkpoint {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:plugin.checkpoint"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        let period = match &self.period {
            Some(p) => p.render(ctx)?,
            None => Value::Null,
        };
        Ok(json!({
            "period": period,
            "time_period_minutes": self.time_period_minutes,
            "directory": self.directory,
        }))
    }
}

// ── OpenPmd ────────────────────────────────────────────────────────

/// File format of [`OpenPmd`] output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenPmdExtension {
    /// ADIOS2 BP.
    Bp,
    /// HDF5.
    H5,
}

/// Field and particle dumps in openPMD format.
///
/// A backend configuration, if given, is written as a side file while
/// rendering; the mapping references the file by name only.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenPmd {
    period: TimeStepSpec,
    file: String,
    extension: OpenPmdExtension,
    backend_config: Option<Map<String, Value>>,
}

impl OpenPmd {
    /// Dump every step in `period` into `<file>_%T.<extension>`; `file`
    /// must be an identifier.
    pub fn new(
        period: TimeStepSpec,
        file: impl Into<String>,
        extension: OpenPmdExtension,
    ) -> Result<Self, ValidationError> {
        let file = file.into();
        check::identifier("file", &file)?;
        Ok(Self {
            period,
            file,
            extension,
            backend_config: None,
        })
    }

    /// Attach a backend configuration (e.g. ADIOS2 engine parameters).
    pub fn with_backend_config(mut self, config: Map<String, Value>) -> Self {
        self.backend_config = Some(config);
        self
    }

    /// Name of the side file holding the backend configuration.
    pub fn config_file_name(&self) -> Option<String> {
        self.backend_config
            .as_ref()
            .map(|_| format!("openPMD_config_{}.json", self.file))
    }
}

impl RenderedObject for OpenPmd {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:plugin.openpmd"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        let config_file = self.config_file_name();
        if let (Some(name), Some(config)) = (&config_file, &self.backend_config) {
            match ctx.side_files() {
                Some(sink) => {
                    sink.write_json(name, &Value::Object(config.clone()))?;
                }
                None => tracing::debug!(file = %name, "side files disabled; backend config not written"),
            }
        }
        Ok(json!({
            "period": self.period.render(ctx)?,
            "file": self.file,
            "extension": self.extension,
            "config_file": config_file,
        }))
    }
}

// ── Plugin group ───────────────────────────────────────────────────

tagged_group! {
    /// Any diagnostic or output plugin.
    #[derive(Clone, Debug, PartialEq)]
    pub enum Plugin: "urn:picdeck:plugin" {
        /// See [`PhaseSpace`].
        "phase_space" => PhaseSpace(PhaseSpace),
        /// See [`EnergyHistogram`].
        "energy_histogram" => EnergyHistogram(EnergyHistogram),
        /// See [`MacroParticleCount`].
        "macro_particle_count" => MacroParticleCount(MacroParticleCount),
        /// See [`Checkpoint`].
        "checkpoint" => Checkpoint(Checkpoint),
        /// See [`OpenPmd`].
        "openpmd" => OpenPmd(OpenPmd),
    }
}

impl Plugin {
    /// Species the plugin observes, if any.
    pub fn species(&self) -> Option<&SpeciesRef> {
        match self {
            Self::PhaseSpace(p) => Some(&p.species),
            Self::EnergyHistogram(p) => Some(&p.species),
            Self::MacroParticleCount(p) => Some(&p.species),
            Self::Checkpoint(_) | Self::OpenPmd(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picdeck_core::SpeciesId;

    fn electrons() -> SpeciesRef {
        SpeciesRef {
            id: SpeciesId(0),
            name: "electron".to_string(),
        }
    }

    fn every(n: u64) -> TimeStepSpec {
        TimeStepSpec::every(n).unwrap()
    }

    #[test]
    fn phase_space_bounds_must_be_ordered() {
        let make = |min, max| {
            PhaseSpace::new(electrons(), every(100), Axis::Y, MomentumComponent::Py, min, max)
        };
        assert!(make(-1.0, 1.0).is_ok());
        match make(2.0, 1.0) {
            Err(ValidationError::InvalidArgument { parameter, .. }) => {
                assert_eq!(parameter, "min_momentum");
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
        assert!(make(1.0, 1.0).is_err());
    }

    #[test]
    fn energy_histogram_bounds() {
        assert!(EnergyHistogram::new(electrons(), every(10), 1024, 0.0, 1e3).is_ok());
        assert!(EnergyHistogram::new(electrons(), every(10), 0, 0.0, 1e3).is_err());
        assert!(EnergyHistogram::new(electrons(), every(10), 16, 5.0, 5.0).is_err());
    }

    #[test]
    fn checkpoint_needs_some_period() {
        assert!(Checkpoint::new(None, None, None).is_err());
        assert!(Checkpoint::new(None, Some(30), None).is_ok());
        assert!(Checkpoint::new(Some(every(1000)), None, Some(" ".to_string())).is_err());
    }

    #[test]
    fn openpmd_names_its_side_file() {
        let plain = OpenPmd::new(every(100), "simData", OpenPmdExtension::Bp).unwrap();
        assert_eq!(plain.config_file_name(), None);
        let configured = plain.with_backend_config(Map::new());
        assert_eq!(
            configured.config_file_name().as_deref(),
            Some("openPMD_config_simData.json")
        );
        assert!(OpenPmd::new(every(100), "sim/data", OpenPmdExtension::H5).is_err());
    }

    #[test]
    fn plugin_species() {
        let count = Plugin::from(MacroParticleCount {
            species: electrons(),
            period: every(1),
        });
        assert_eq!(count.species().map(|s| s.name.as_str()), Some("electron"));
        let cp = Plugin::from(Checkpoint::new(None, Some(5), None).unwrap());
        assert!(cp.species().is_none());
    }
}
