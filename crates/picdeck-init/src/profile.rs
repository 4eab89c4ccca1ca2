//! Density profiles.
//!
//! The profile shapes are evaluated by the backend; here they are plain
//! parameter records validated eagerly via `validate()`.

use picdeck_core::render::encode;
use picdeck_core::{
    check, tagged_group, RenderContext, RenderError, RenderedObject, ValidationError, Value,
};
use serde::Serialize;
use serde_json::json;

/// Exponential plasma ramp in front of or behind a target.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExponentialRamp {
    /// Scale length of the exponential, m.
    pub scale_length_si: f64,
    /// Distance after which the ramp is cut to zero, m.
    pub cutoff_si: f64,
}

impl ExponentialRamp {
    /// Validate both lengths.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check::positive("scale_length_si", self.scale_length_si)?;
        check::non_negative("cutoff_si", self.cutoff_si)?;
        Ok(())
    }
}

impl RenderedObject for ExponentialRamp {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.profile.exponential_ramp"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}

fn render_ramp(ramp: Option<&ExponentialRamp>, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
    match ramp {
        Some(r) => r.render(ctx),
        None => Ok(Value::Null),
    }
}

/// Constant density everywhere.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Uniform {
    /// Number density, 1/m^3.
    pub density_si: f64,
}

impl Uniform {
    /// A validated uniform profile.
    pub fn new(density_si: f64) -> Result<Self, ValidationError> {
        let profile = Self { density_si };
        profile.validate()?;
        Ok(profile)
    }

    /// Density must be finite and positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check::positive("density_si", self.density_si).map(drop)
    }
}

impl RenderedObject for Uniform {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.profile.uniform"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}

/// Slab of constant density along y, with optional exponential ramps.
#[derive(Clone, Debug, PartialEq)]
pub struct Foil {
    /// Number density inside the foil, 1/m^3.
    pub density_si: f64,
    /// Position of the front surface along y, m.
    pub y_value_front_foil_si: f64,
    /// Foil thickness, m.
    pub thickness_foil_si: f64,
    /// Ramp before the front surface.
    pub pre_foil_plasma_ramp: Option<ExponentialRamp>,
    /// Ramp behind the rear surface.
    pub post_foil_plasma_ramp: Option<ExponentialRamp>,
}

impl Foil {
    /// Check density, lengths and ramps.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check::positive("density_si", self.density_si)?;
        check::non_negative("y_value_front_foil_si", self.y_value_front_foil_si)?;
        check::positive("thickness_foil_si", self.thickness_foil_si)?;
        if let Some(ramp) = &self.pre_foil_plasma_ramp {
            ramp.validate()?;
        }
        if let Some(ramp) = &self.post_foil_plasma_ramp {
            ramp.validate()?;
        }
        Ok(())
    }
}

impl RenderedObject for Foil {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.profile.foil"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({
            "density_si": self.density_si,
            "y_value_front_foil_si": self.y_value_front_foil_si,
            "thickness_foil_si": self.thickness_foil_si,
            "pre_foil_plasma_ramp": render_ramp(self.pre_foil_plasma_ramp.as_ref(), ctx)?,
            "post_foil_plasma_ramp": render_ramp(self.post_foil_plasma_ramp.as_ref(), ctx)?,
        }))
    }
}

/// Gas jet: plateau between two centers with super-Gaussian flanks along y.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Gaussian {
    /// Peak number density, 1/m^3.
    pub density_si: f64,
    /// Start of the plateau, m.
    pub center_front_si: f64,
    /// End of the plateau, m.
    pub center_rear_si: f64,
    /// Width of the front flank, m.
    pub sigma_front_si: f64,
    /// Width of the rear flank, m.
    pub sigma_rear_si: f64,
    /// Exponent of the flanks.
    pub power: f64,
    /// Prefactor inside the exponent; must be negative.
    pub factor: f64,
    /// Cells kept empty at the front of the volume.
    pub vacuum_cells_front: u32,
}

impl Gaussian {
    /// Check density, ordering of the centers and flank parameters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check::positive("density_si", self.density_si)?;
        check::finite("center_front_si", self.center_front_si)?;
        check::finite("center_rear_si", self.center_rear_si)?;
        if self.center_front_si > self.center_rear_si {
            return Err(ValidationError::invalid(
                "center_front_si",
                format!(
                    "front center {} lies behind rear center {}",
                    self.center_front_si, self.center_rear_si
                ),
            ));
        }
        check::positive("sigma_front_si", self.sigma_front_si)?;
        check::positive("sigma_rear_si", self.sigma_rear_si)?;
        check::positive("power", self.power)?;
        if !(self.factor.is_finite() && self.factor < 0.0) {
            return Err(ValidationError::out_of_range(
                "factor",
                self.factor,
                "finite and < 0",
            ));
        }
        Ok(())
    }
}

impl RenderedObject for Gaussian {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.profile.gaussian"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        encode(self.schema_id(), self)
    }
}

/// Cylinder of constant density with an optional radial ramp.
#[derive(Clone, Debug, PartialEq)]
pub struct Cylinder {
    /// Number density inside the cylinder, 1/m^3.
    pub density_si: f64,
    /// A point on the cylinder axis, m.
    pub center_position_si: [f64; 3],
    /// Cylinder radius, m.
    pub radius_si: f64,
    /// Unit vector along the axis.
    pub cylinder_axis: [f64; 3],
    /// Ramp outside the radius.
    pub pre_plasma_ramp: Option<ExponentialRamp>,
}

impl Cylinder {
    /// Check density, geometry and ramp.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check::positive("density_si", self.density_si)?;
        for (i, c) in self.center_position_si.iter().enumerate() {
            check::finite(&format!("center_position_si[{i}]"), *c)?;
        }
        check::positive("radius_si", self.radius_si)?;
        check::normalized("cylinder_axis", self.cylinder_axis)?;
        if let Some(ramp) = &self.pre_plasma_ramp {
            ramp.validate()?;
        }
        Ok(())
    }
}

impl RenderedObject for Cylinder {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.profile.cylinder"
    }

    fn serialize(&self, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({
            "density_si": self.density_si,
            "center_position_si": self.center_position_si,
            "radius_si": self.radius_si,
            "cylinder_axis": self.cylinder_axis,
            "pre_plasma_ramp": render_ramp(self.pre_plasma_ramp.as_ref(), ctx)?,
        }))
    }
}

/// Density given as a backend expression of `x`, `y`, `z` (SI units).
#[derive(Clone, Debug, PartialEq)]
pub struct FreeFormula {
    /// Expression body returning the number density in 1/m^3.
    pub expression: String,
}

impl FreeFormula {
    /// The expression must not be blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.expression.trim().is_empty() {
            return Err(ValidationError::invalid("expression", "must not be empty"));
        }
        Ok(())
    }
}

impl RenderedObject for FreeFormula {
    fn schema_id(&self) -> &'static str {
        "urn:picdeck:init.profile.free_formula"
    }

    fn serialize(&self, _ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
        Ok(json!({ "function_body": self.expression }))
    }
}

tagged_group! {
    /// Any density profile.
    #[derive(Clone, Debug, PartialEq)]
    pub enum DensityProfile: "urn:picdeck:init.profile" {
        /// See [`Uniform`].
        "uniform" => Uniform(Uniform),
        /// See [`Foil`].
        "foil" => Foil(Foil),
        /// See [`Gaussian`].
        "gaussian" => Gaussian(Gaussian),
        /// See [`Cylinder`].
        "cylinder" => Cylinder(Cylinder),
        /// See [`FreeFormula`].
        "free_formula" => FreeFormula(FreeFormula),
    }
}

impl DensityProfile {
    /// Validate the active variant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Uniform(p) => p.validate(),
            Self::Foil(p) => p.validate(),
            Self::Gaussian(p) => p.validate(),
            Self::Cylinder(p) => p.validate(),
            Self::FreeFormula(p) => p.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foil() -> Foil {
        Foil {
            density_si: 1e27,
            y_value_front_foil_si: 5e-6,
            thickness_foil_si: 1e-6,
            pre_foil_plasma_ramp: Some(ExponentialRamp {
                scale_length_si: 1e-7,
                cutoff_si: 5e-7,
            }),
            post_foil_plasma_ramp: None,
        }
    }

    #[test]
    fn uniform_rejects_bad_density() {
        assert!(Uniform::new(42.17).is_ok());
        assert!(Uniform::new(0.0).is_err());
        assert!(Uniform::new(-1.0).is_err());
        assert!(Uniform::new(f64::INFINITY).is_err());
    }

    #[test]
    fn foil_checks_ramps() {
        assert!(foil().validate().is_ok());
        let mut bad = foil();
        bad.post_foil_plasma_ramp = Some(ExponentialRamp {
            scale_length_si: 0.0,
            cutoff_si: 1.0,
        });
        assert!(bad.validate().is_err());
    }

    #[test]
    fn gaussian_centers_ordered() {
        let mut g = Gaussian {
            density_si: 1e25,
            center_front_si: 1e-5,
            center_rear_si: 2e-5,
            sigma_front_si: 1e-6,
            sigma_rear_si: 1e-6,
            power: 2.0,
            factor: -1.0,
            vacuum_cells_front: 50,
        };
        assert!(g.validate().is_ok());
        g.center_front_si = 3e-5;
        assert!(g.validate().is_err());
        g.center_front_si = 1e-5;
        g.factor = 1.0;
        assert!(g.validate().is_err());
    }

    #[test]
    fn cylinder_axis_normalized() {
        let mut c = Cylinder {
            density_si: 1e25,
            center_position_si: [0.0, 1e-5, 0.0],
            radius_si: 1e-6,
            cylinder_axis: [0.0, 0.0, 1.0],
            pre_plasma_ramp: None,
        };
        assert!(c.validate().is_ok());
        c.cylinder_axis = [0.0, 1.0, 1.0];
        assert!(c.validate().is_err());
    }

    #[test]
    fn group_dispatches_validation() {
        let p = DensityProfile::from(FreeFormula {
            expression: "  ".to_string(),
        });
        assert!(p.validate().is_err());
        assert!(DensityProfile::from(foil()).validate().is_ok());
    }
}
