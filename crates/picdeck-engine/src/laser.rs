//! Laser pulses injected through a Huygens surface.

use picdeck_core::render::encode;
use picdeck_core::{check, units, RenderContext, RenderError, RenderedObject, ValidationError, Value};
use serde::Serialize;

/// Tolerance for the orthogonality of propagation and polarization.
const ORTHOGONALITY_TOLERANCE: f64 = 1e-9;

/// Peak field strength, as normalized vector potential or in V/m.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Amplitude {
    /// Normalized vector potential a0.
    A0(f64),
    /// Peak electric field, V/m.
    E0Si(f64),
}

/// Polarization of the pulse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarizationType {
    /// Linear along the polarization direction.
    Linear,
    /// Circular in the plane normal to propagation.
    Circular,
}

/// Parameters of a [`GaussianLaser`].
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianLaserParams {
    /// Central wavelength, m.
    pub wavelength_si: f64,
    /// Beam waist (1/e^2 intensity radius) at focus, m.
    pub waist_si: f64,
    /// Pulse duration (sigma of the intensity envelope), s.
    pub duration_si: f64,
    /// Focus position, m.
    pub focus_position_si: [f64; 3],
    /// Position of the pulse maximum at t = 0, m.
    pub centroid_position_si: [f64; 3],
    /// Unit propagation direction.
    pub propagation_direction: [f64; 3],
    /// Unit polarization direction, normal to propagation.
    pub polarization_direction: [f64; 3],
    /// Polarization type.
    pub polarization_type: PolarizationType,
    /// Peak amplitude.
    pub amplitude: Amplitude,
    /// Carrier-envelope phase, rad.
    pub phase: f64,
    /// Laguerre mode amplitudes; the first is the fundamental mode.
    pub laguerre_modes: Vec<f64>,
    /// Laguerre mode phases, one per mode.
    pub laguerre_phases: Vec<f64>,
    /// Huygens surface distance from the lower and upper boundary per
    /// axis, in cells. Lower entries are positive, upper entries negative.
    pub huygens_surface_positions: [[i32; 2]; 3],
}

impl GaussianLaserParams {
    /// Fundamental-mode linearly polarized pulse propagating along +y,
    /// polarized along x, focused at `focus_position_si`.
    pub fn along_y(
        wavelength_si: f64,
        waist_si: f64,
        duration_si: f64,
        focus_position_si: [f64; 3],
        amplitude: Amplitude,
    ) -> Self {
        Self {
            wavelength_si,
            waist_si,
            duration_si,
            focus_position_si,
            centroid_position_si: [focus_position_si[0], 0.0, focus_position_si[2]],
            propagation_direction: [0.0, 1.0, 0.0],
            polarization_direction: [1.0, 0.0, 0.0],
            polarization_type: PolarizationType::Linear,
            amplitude,
            phase: 0.0,
            laguerre_modes: vec![1.0],
            laguerre_phases: vec![0.0],
            huygens_surface_positions: [[16, -16], [16, -16], [16, -16]],
        }
    }
}

/// Gaussian laser pulse, validated at construction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GaussianLaser {
    wave_length_si: f64,
    waist_si: f64,
    pulse_duration_si: f64,
    focus_pos_si: [f64; 3],
    centroid_pos_si: [f64; 3],
    propagation_direction: [f64; 3],
    polarization_direction: [f64; 3],
    polarization_type: PolarizationType,
    #[serde(rename = "E0_si")]
    e0_si: f64,
    phi0: f64,
    laguerre_modes: Vec<f64>,
    laguerre_phases: Vec<f64>,
    huygens_surface_positions: [[i32; 2]; 3],
}

impl GaussianLaser {
    /// Validate `params` and build the pulse. An `A0` amplitude is
    /// converted to a field strength using the wavelength.
    pub fn new(params: GaussianLaserParams) -> Result<Self, ValidationError> {
        let wavelength = check::positive("wavelength_si", params.wavelength_si)?;
        check::positive("waist_si", params.waist_si)?;
        check::positive("duration_si", params.duration_si)?;
        for i in 0..3 {
            check::finite("focus_position_si", params.focus_position_si[i])?;
            check::finite("centroid_position_si", params.centroid_position_si[i])?;
        }
        let propagation = check::normalized("propagation_direction", params.propagation_direction)?;
        let polarization =
            check::normalized("polarization_direction", params.polarization_direction)?;
        if check::dot(propagation, polarization).abs() > ORTHOGONALITY_TOLERANCE {
            return Err(ValidationError::invalid(
                "polarization_direction",
                "must be orthogonal to the propagation direction",
            ));
        }

        let e0_si = match params.amplitude {
            Amplitude::A0(a0) => units::a0_to_e0(check::positive("a0", a0)?, wavelength),
            Amplitude::E0Si(e0) => check::positive("E0_si", e0)?,
        };
        check::finite("phase", params.phase)?;

        if params.laguerre_modes.is_empty() {
            return Err(ValidationError::invalid("laguerre_modes", "at least one mode is required"));
        }
        if params.laguerre_modes.len() != params.laguerre_phases.len() {
            return Err(ValidationError::invalid(
                "laguerre_phases",
                format!(
                    "{} phases given for {} modes",
                    params.laguerre_phases.len(),
                    params.laguerre_modes.len()
                ),
            ));
        }
        for (&m, &p) in params.laguerre_modes.iter().zip(&params.laguerre_phases) {
            check::finite("laguerre_modes", m)?;
            check::finite("laguerre_phases", p)?;
        }

        for [lower, upper] in params.huygens_surface_positions {
            if lower <= 0 || upper >= 0 {
                return Err(ValidationError::invalid(
                    "huygens_surface_positions",
                    format!("[{lower}, {upper}] must be [positive, negative] cell offsets"),
                ));
            }
        }

        Ok(Self {
            wave_length_si: wavelength,
            waist_si: params.waist_si,
            pulse_duration_si: params.duration_si,
            focus_pos_si: params.focus_position_si,
            centroid_pos_si: params.centroid_position_si,
            propagation_direction: propagation,
            polarization_direction: polarization,
            polarization_type: params.polarization_type,
            e0_si,
            phi0: params.phase,
            laguerre_modes: params.laguerre_modes,
            laguerre_phases: params.laguerre_phases,
            huygens_surface_positions: params.huygens_surface_positions,
        })
    }

    /// Peak field strength, V/m.
    pub fn e0_si(&self) -> f64 {
        self.e0_si
    }

    /// Normalized vector potential.
    pub fn a0(&self) -> f64 {
        units::e0_to_a0(self.e0_si, self.wave_length_si)
    }
}

impl RenderedObject for GaussianLaser {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:laser.gaussian"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}
