//! # Capstack Math
//!
//! Numerical utilities for the Capstack debt structuring library.
//!
//! This crate provides:
//!
//! - **Bounds**: Box constraints on individual optimization variables
//! - **Gradients**: Bound-aware finite-difference gradients
//! - **Optimization**: Projected gradient descent with Armijo backtracking
//!
//! ## Design Philosophy
//!
//! - **Fallible Objectives**: Objective functions return `Result`, so domain
//!   errors raised mid-search reach the caller unchanged
//! - **Hard Bounds**: Every trial point is projected onto the box before it is
//!   evaluated; the objective never sees an infeasible point
//! - **Honest Termination**: Non-convergence is reported in the result, never
//!   disguised as a solution

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod optimization;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::optimization::{
        numerical_gradient, projected_gradient, Bounds, OptimizationConfig, OptimizationResult,
    };
}

pub use error::{MathError, MathResult};
