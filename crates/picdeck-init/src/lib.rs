//! Particle initialization for picdeck.
//!
//! Declarers ([`Placement`], [`NotPlacedDeclaration`], [`ChargeState`],
//! [`Ionization`]) register requirements on species and on the operation
//! list held by an [`InitManager`]. Sealing and finalizing the manager
//! yields an [`InitPlan`]: species in dependency order plus the resolved
//! operations that fill them at step zero.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod declare;
pub mod error;
pub mod intent;
pub mod manager;
pub mod momentum;
pub mod operation;
pub mod plan;
pub mod profile;

pub use declare::{ChargeState, Declarer, Ionization, NotPlacedDeclaration, Placement};
pub use error::InitError;
pub use intent::{SetChargeStateIntent, SimpleDensityIntent, SimpleMomentumIntent};
pub use manager::InitManager;
pub use momentum::{Drift, Temperature};
pub use operation::{
    NotPlaced, Operation, OperationRequirement, SetChargeState, SimpleDensity, SimpleMomentum,
};
pub use plan::InitPlan;
pub use profile::{Cylinder, DensityProfile, ExponentialRamp, FreeFormula, Foil, Gaussian, Uniform};
