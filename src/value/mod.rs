//! Downstream value for the provider, C&I operators, and the financed system.

pub mod ci;
pub mod payback;
pub mod rep;

pub use ci::{CiCase, CiInputs, ci_value};
pub use payback::{PaybackInputs, PaybackResult, payback};
pub use rep::{HomeownerAnnual, RepInputs, RepValue, rep_value};
