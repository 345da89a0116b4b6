//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use deadres_core::prelude::*;
//! ```

// Builder API
pub use crate::builder::{AnalysisOutcome, AnalysisResult, Deadres, SkipReason};

// Core value types
pub use crate::category::CategorySet;
pub use crate::declarations::DeclarationMap;
pub use crate::error::{DeadresError, DeadresResult};
pub use crate::identifier::{ReferenceSet, ResourceId};
pub use crate::reconcile::UnusedReport;

// Configuration
pub use crate::config::{load_config, DeadresConfig};

// Output
pub use crate::report::{print_json, print_plain};
