//! Savings calculations for the clinic automation comparison.
//!
//! This module provides the calculation logic, organized by the stages of the
//! model: automation adjustments, the visit funnel, and the calculator that
//! ties both projections together.

pub mod adjustments;
pub mod calculator;
pub mod common;
pub mod funnel;

pub use adjustments::{Adjustment, OperatingState, apply_adjustments, enabled_adjustments};
pub use calculator::{SavingsCalculator, compute};
pub use funnel::{FunnelLines, VisitFunnel};
