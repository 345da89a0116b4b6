//! deadres-core: unused generated-resource detection for Android-style projects
//!
//! A build generates one `R.java` that declares a constant for every resource,
//! grouped by category (`R.string.app_name`, `R.drawable.icon`, ...). Program
//! source and XML markup refer to a subset of them. This library reports the
//! declared constants nothing refers to, so the resources behind them can be
//! deleted.
//!
//! # Pipeline
//!
//! ```text
//!  R.java ──► declarations ─────────────────────────┐
//!                                                   ▼
//!  src/**.java ──► scan ──► source ──┐         reconcile ──► report
//!  res/**.xml  ──► scan ──► markup ──┼─► refs ──────┘
//!  AndroidManifest.xml ──► manifest ─┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use deadres_core::prelude::*;
//!
//! match Deadres::new("/path/to/app").analyze()? {
//!     AnalysisOutcome::Completed(result) => print_plain(&result.report),
//!     AnalysisOutcome::Skipped(reason) => eprintln!("{}", reason),
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`declarations`]: `R.java` parsing into a [`DeclarationMap`]
//! - [`scan`]: recursive file discovery by suffix
//! - [`source`]: `R.<category>.<name>` extraction from program source
//! - [`markup`]: `@<category>/<name>` extraction from XML
//! - [`manifest`]: manifest references and package identity
//! - [`reconcile`]: declared minus referenced, plain rendering
//! - [`builder`]: fluent configuration and the full run
//! - [`error`]: typed error handling
//!
//! The heuristics are textual. Names built at runtime (`getIdentifier`),
//! references inside block comments, and resources used only through
//! reflection are not understood, so the report is a list of candidates to
//! review rather than a guarantee.

pub mod builder;
pub mod category;
pub mod config;
pub mod declarations;
pub mod error;
pub mod identifier;
pub mod logging;
pub mod manifest;
pub mod markup;
pub mod prelude;
pub mod reconcile;
pub mod report;
pub mod scan;
pub mod source;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{DeadresError, DeadresResult, IoResultExt};

// Builder API
pub use builder::{
    AnalysisOutcome, AnalysisResult, Deadres, ScanStats, SkipReason, APK_PACKAGING,
    DECLARATIONS_FILE_NAME,
};

// Value types
pub use category::{CategorySet, DEFAULT_CATEGORIES, IGNORED_CATEGORY};
pub use identifier::{ReferenceSet, ResourceId};

// Configuration
pub use config::{load_config, DeadresConfig, OutputConfig, CONFIG_FILE_NAME};

// Declarations
pub use declarations::{parse_declarations, parse_declarations_str, DeclarationMap};

// Logging
pub use logging::{init_logging, LogFormat};

// Extraction
pub use manifest::{
    extract_manifest_references, read_manifest_info, read_manifest_info_str, ManifestInfo,
    MANIFEST_FILE_NAME,
};
pub use markup::{
    extract_from_markup_str, extract_markup_file, extract_markup_references, reference_from_value,
};
pub use source::{
    extract_from_source_line, extract_from_source_str, extract_source_file,
    extract_source_references,
};

// Reconciliation and reporting
pub use reconcile::{find_unused, render_plain, UnusedReport};
pub use report::{print_json, print_plain, render_json};

// File scanning
pub use scan::{gather_files, gather_files_with_excludes, locate_file};
