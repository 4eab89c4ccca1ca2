//! Physical constants (SI, CODATA 2018) and unit conversions.
//!
//! Conversions are pure functions of their arguments.

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Elementary charge, C.
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Electron rest mass, kg.
pub const ELECTRON_MASS: f64 = 9.109_383_701_5e-31;

/// Unified atomic mass unit, kg.
pub const ATOMIC_MASS_UNIT: f64 = 1.660_539_066_60e-27;

/// Vacuum permittivity, F/m.
pub const EPSILON_0: f64 = 8.854_187_812_8e-12;

/// Angular frequency of light with the given vacuum wavelength.
pub fn angular_frequency(wavelength_si: f64) -> f64 {
    2.0 * std::f64::consts::PI * SPEED_OF_LIGHT / wavelength_si
}

/// Peak field amplitude `E0` (V/m) for a normalized vector potential `a0`.
pub fn a0_to_e0(a0: f64, wavelength_si: f64) -> f64 {
    a0 * ELECTRON_MASS * SPEED_OF_LIGHT * angular_frequency(wavelength_si) / ELEMENTARY_CHARGE
}

/// Inverse of [`a0_to_e0`].
pub fn e0_to_a0(e0: f64, wavelength_si: f64) -> f64 {
    e0 * ELEMENTARY_CHARGE / (ELECTRON_MASS * SPEED_OF_LIGHT * angular_frequency(wavelength_si))
}

/// Gaussian pulse: intensity FWHM duration to the field-envelope `sigma`.
///
/// The field envelope `exp(-t^2 / (2 sigma^2))` squared gives the intensity
/// profile whose FWHM is `2 sqrt(ln 2) sigma`.
pub fn fwhm_to_sigma(fwhm: f64) -> f64 {
    fwhm / (2.0 * std::f64::consts::LN_2.sqrt())
}

/// Thermal energy in keV to temperature in eV.
pub fn kev_to_ev(kev: f64) -> f64 {
    kev * 1e3
}
