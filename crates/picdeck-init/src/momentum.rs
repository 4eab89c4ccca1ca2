//! Momentum distributions applied by
//! [`SimpleMomentum`](crate::operation::SimpleMomentum).

use picdeck_core::render::encode;
use picdeck_core::{check, RenderContext, RenderError, RenderedObject, ValidationError, Value};
use serde::Serialize;

/// Isotropic thermal spread.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Temperature {
    temperature_kev: f64,
}

impl Temperature {
    /// Temperature in keV; must be finite and not negative.
    pub fn new(temperature_kev: f64) -> Result<Self, ValidationError> {
        check::non_negative("temperature_kev", temperature_kev)?;
        Ok(Self { temperature_kev })
    }

    /// Temperature, keV.
    pub fn temperature_kev(&self) -> f64 {
        self.temperature_kev
    }
}

impl RenderedObject for Temperature {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.momentum.temperature"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}

/// Directed drift with a common Lorentz factor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Drift {
    direction_normalized: [f64; 3],
    gamma: f64,
}

impl Drift {
    /// Drift along the unit vector `direction` with Lorentz factor
    /// `gamma >= 1`.
    pub fn new(direction: [f64; 3], gamma: f64) -> Result<Self, ValidationError> {
        let direction_normalized = check::normalized("direction_normalized", direction)?;
        if !(gamma.is_finite() && gamma >= 1.0) {
            return Err(ValidationError::out_of_range("gamma", gamma, "finite and >= 1"));
        }
        Ok(Self {
            direction_normalized,
            gamma,
        })
    }

    /// Drift from a velocity vector in m/s.
    pub fn from_velocity(velocity_si: [f64; 3]) -> Result<Self, ValidationError> {
        let speed = check::dot(velocity_si, velocity_si).sqrt();
        check::positive("|velocity_si|", speed)?;
        let beta = speed / picdeck_core::units::SPEED_OF_LIGHT;
        if beta >= 1.0 {
            return Err(ValidationError::out_of_range(
                "|velocity_si|",
                speed,
                "below the speed of light",
            ));
        }
        let direction = velocity_si.map(|c| c / speed);
        Self::new(direction, 1.0 / (1.0 - beta * beta).sqrt())
    }

    /// Unit drift direction.
    pub fn direction(&self) -> [f64; 3] {
        self.direction_normalized
    }

    /// Lorentz factor.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl RenderedObject for Drift {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.momentum.drift"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_rejects_negative() {
        assert!(Temperature::new(0.0).is_ok());
        assert!(Temperature::new(-1.0).is_err());
    }

    #[test]
    fn drift_checks_direction_and_gamma() {
        assert!(Drift::new([0.0, 1.0, 0.0], 1.0).is_ok());
        assert!(Drift::new([0.0, 2.0, 0.0], 1.5).is_err());
        assert!(Drift::new([0.0, 1.0, 0.0], 0.5).is_err());
    }

    #[test]
    fn drift_from_velocity() {
        let c = picdeck_core::units::SPEED_OF_LIGHT;
        let d = Drift::from_velocity([0.0, 0.6 * c, 0.0]).unwrap();
        assert!((d.gamma() - 1.25).abs() < 1e-12);
        assert!((d.direction()[1] - 1.0).abs() < 1e-12);
        assert!(Drift::from_velocity([c, 0.0, 0.0]).is_err());
        assert!(Drift::from_velocity([0.0, 0.0, 0.0]).is_err());
    }
}
