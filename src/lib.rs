//! Mutual information between two continuous variables, estimated by adaptive
//! partitioning of their joint rank plane (Darbellay and Vajda, 1999).
//!
//! ```
//! use adaptive_mi::MutualInformationAdaptive;
//!
//! let x = (0..200).map(|i| i as f64 * 0.1).collect::<Vec<_>>();
//! let y = x.iter().map(|x| x.exp()).collect::<Vec<_>>();
//!
//! let estimator = MutualInformationAdaptive::new(&y, false, 6.0)?;
//! let mi = estimator.mut_inf(&x, false)?;
//! assert!(mi > 1.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub use adaptive::{AdaptiveOptions, EstimateError, FitError, MutualInformationAdaptive};
pub use partition::{Cell, Partitioning};
pub use range::RankRange;
pub use rank::{RankError, Ranks};

pub mod adaptive;
pub mod engine;
pub mod independence;
pub mod partition;
pub mod rank;
pub mod rectangle;
pub mod table;

mod functions;
mod range;
