//! Builder pattern API for deadres analysis.
//!
//! Provides a fluent interface for configuring and running one analysis:
//!
//! ```rust,ignore
//! use deadres_core::prelude::*;
//!
//! let outcome = Deadres::new("/path/to/app")
//!     .source_dir("java")
//!     .ignore_patterns([r"^R\.string\.abc_"])
//!     .analyze()?;
//!
//! if let AnalysisOutcome::Completed(result) = outcome {
//!     print_plain(&result.report);
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::category::CategorySet;
use crate::config::DeadresConfig;
use crate::declarations::parse_declarations;
use crate::error::{DeadresError, DeadresResult};
use crate::manifest::{extract_manifest_references, read_manifest_info, MANIFEST_FILE_NAME};
use crate::markup::extract_markup_references;
use crate::reconcile::{find_unused, UnusedReport};
use crate::scan::{gather_files_with_excludes, locate_file};
use crate::source::extract_source_references;

/// Packaging kind that gets analysed; anything else is skipped.
pub const APK_PACKAGING: &str = "apk";

/// Generated declarations file name looked up when none is configured.
pub const DECLARATIONS_FILE_NAME: &str = "R.java";

const DEFAULT_SOURCE_DIR: &str = "src";
const DEFAULT_RESOURCE_DIR: &str = "res";
const DEFAULT_SOURCE_SUFFIX: &str = ".java";
const DEFAULT_MARKUP_SUFFIX: &str = ".xml";

/// Builder for configuring unused-resource analysis.
#[derive(Debug, Clone)]
pub struct Deadres {
    /// Project root; relative paths below resolve against it
    root: PathBuf,

    /// Generated R.java (located under root when unset)
    declarations: Option<PathBuf>,

    /// Program source root
    source_dir: PathBuf,

    /// Resource markup root
    resource_dir: PathBuf,

    /// Application manifest (located under root when unset)
    manifest: Option<PathBuf>,

    source_suffix: String,
    markup_suffix: String,

    /// Categories both extractors recognize
    categories: CategorySet,

    /// Regexes over `R.<category>.<name>` removed from the report
    ignored_patterns: Vec<String>,

    /// Directory names pruned while scanning
    excluded_dirs: Vec<String>,

    /// Project packaging kind
    packaging: String,
}

impl Deadres {
    /// Create a new analysis builder for the given project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            declarations: None,
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            resource_dir: PathBuf::from(DEFAULT_RESOURCE_DIR),
            manifest: None,
            source_suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
            markup_suffix: DEFAULT_MARKUP_SUFFIX.to_string(),
            categories: CategorySet::default(),
            ignored_patterns: Vec::new(),
            excluded_dirs: Vec::new(),
            packaging: APK_PACKAGING.to_string(),
        }
    }

    /// Apply every value set in a `deadres.toml`.
    pub fn with_config(mut self, cfg: &DeadresConfig) -> Self {
        if let Some(p) = &cfg.declarations {
            self.declarations = Some(p.clone());
        }
        if let Some(p) = &cfg.source_dir {
            self.source_dir = p.clone();
        }
        if let Some(p) = &cfg.resource_dir {
            self.resource_dir = p.clone();
        }
        if let Some(p) = &cfg.manifest {
            self.manifest = Some(p.clone());
        }
        if let Some(s) = &cfg.source_suffix {
            self.source_suffix = s.clone();
        }
        if let Some(s) = &cfg.markup_suffix {
            self.markup_suffix = s.clone();
        }
        if let Some(p) = &cfg.packaging {
            self.packaging = p.clone();
        }
        if let Some(c) = &cfg.categories {
            self.categories = c.clone();
        }
        if let Some(patterns) = &cfg.ignore {
            self.ignored_patterns.extend(patterns.iter().cloned());
        }
        if let Some(dirs) = &cfg.exclude_dirs {
            self.excluded_dirs.extend(dirs.iter().cloned());
        }
        self
    }

    /// Use this declarations file instead of searching for `R.java`.
    pub fn declarations_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.declarations = Some(path.into());
        self
    }

    /// Program source root to scan.
    pub fn source_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_dir = path.into();
        self
    }

    /// Resource markup root to scan.
    pub fn resource_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource_dir = path.into();
        self
    }

    /// Use this manifest instead of searching for `AndroidManifest.xml`.
    pub fn manifest_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = Some(path.into());
        self
    }

    pub fn source_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.source_suffix = suffix.into();
        self
    }

    pub fn markup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.markup_suffix = suffix.into();
        self
    }

    /// Replace the recognized category set.
    pub fn categories(mut self, categories: CategorySet) -> Self {
        self.categories = categories;
        self
    }

    /// Add regular expressions for identifiers to leave out of the report.
    pub fn ignore_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add directory names to prune while scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Project packaging kind; only `apk` projects are analysed.
    pub fn packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    /// Run the analysis.
    ///
    /// Returns `Skipped` for non-apk packaging and instrumentation-only
    /// projects. Only a missing or malformed declarations file (or an
    /// invalid ignore pattern) is an error; unreadable source and markup
    /// files are logged and left out.
    pub fn analyze(&self) -> DeadresResult<AnalysisOutcome> {
        // 1. Packaging gate
        if self.packaging != APK_PACKAGING {
            info!(packaging = %self.packaging, "not packaging \"apk\", skipping");
            return Ok(AnalysisOutcome::Skipped(SkipReason::NotApkPackaging {
                packaging: self.packaging.clone(),
            }));
        }

        let ignored = self.compile_ignored()?;

        // 2. Instrumentation gate
        let manifest = self.manifest_path();
        if let Some(path) = &manifest {
            match read_manifest_info(path) {
                Ok(info) if info.is_instrumentation_only() => {
                    info!(
                        package = ?info.package,
                        target_package = ?info.target_package,
                        "instrumentation test project, skipping"
                    );
                    return Ok(AnalysisOutcome::Skipped(SkipReason::InstrumentationProject {
                        package: info.package,
                        target_package: info.target_package.unwrap_or_default(),
                    }));
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "could not read manifest identity"),
            }
        } else {
            warn!(root = %self.root.display(), "no {} found", MANIFEST_FILE_NAME);
        }

        // 3. Declarations
        let declarations = self.declarations_path()?;
        let declared = parse_declarations(&declarations)?;

        info!("looking for unused resources");
        let excludes: Vec<&str> = self.excluded_dirs.iter().map(String::as_str).collect();

        // 4. References
        let source_files =
            gather_files_with_excludes(&self.resolve(&self.source_dir), &self.source_suffix, &excludes);
        let mut referenced = extract_source_references(&source_files, &self.categories);
        let source_references = referenced.len();

        let markup_files = gather_files_with_excludes(
            &self.resolve(&self.resource_dir),
            &self.markup_suffix,
            &excludes,
        );
        referenced.extend(extract_markup_references(&markup_files, &self.categories));
        let with_markup = referenced.len();

        if let Some(path) = &manifest {
            referenced.extend(extract_manifest_references(path, &self.categories));
        }

        debug!(
            source_files = source_files.len(),
            markup_files = markup_files.len(),
            references = referenced.len(),
            "collected references"
        );

        // 5. Reconcile
        let mut report = find_unused(&declared, &referenced);
        if !ignored.is_empty() {
            report.retain(|id| {
                let qualified = id.to_string();
                !ignored.iter().any(|re| re.is_match(&qualified))
            });
        }

        info!(unused = report.total(), "found unused resources");

        let stats = ScanStats {
            declared: declared.declared_count(),
            source_files: source_files.len(),
            markup_files: markup_files.len(),
            manifest_scanned: manifest.is_some(),
            source_references,
            markup_references: with_markup - source_references,
            total_references: referenced.len(),
        };

        Ok(AnalysisOutcome::Completed(AnalysisResult {
            root: self.root.clone(),
            declarations,
            manifest,
            report,
            stats,
        }))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn declarations_path(&self) -> DeadresResult<PathBuf> {
        match &self.declarations {
            Some(p) => Ok(self.resolve(p)),
            None => locate_file(&self.root, DECLARATIONS_FILE_NAME).ok_or_else(|| {
                DeadresError::DeclarationsNotFound {
                    root: self.root.clone(),
                }
            }),
        }
    }

    /// Explicit manifest, else `<root>/AndroidManifest.xml`, else the first
    /// one found under the root.
    fn manifest_path(&self) -> Option<PathBuf> {
        if let Some(p) = &self.manifest {
            return Some(self.resolve(p));
        }
        let conventional = self.root.join(MANIFEST_FILE_NAME);
        if conventional.is_file() {
            return Some(conventional);
        }
        locate_file(&self.root, MANIFEST_FILE_NAME)
    }

    fn compile_ignored(&self) -> DeadresResult<Vec<Regex>> {
        self.ignored_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    DeadresError::invalid_argument(format!("ignore pattern `{}`: {}", p, e))
                })
            })
            .collect()
    }
}

/// Why an analysis did not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Library, parent or other non-apk project
    NotApkPackaging { packaging: String },
    /// Manifest instruments another package
    InstrumentationProject {
        package: Option<String>,
        target_package: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApkPackaging { packaging } => {
                write!(f, "Not packaging \"apk\" (packaging is \"{}\") - skipping", packaging)
            }
            Self::InstrumentationProject { target_package, .. } => write!(
                f,
                "Instrumentation test project for {} - skipping",
                target_package
            ),
        }
    }
}

/// Result of calling [`Deadres::analyze`].
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Skipped(SkipReason),
    Completed(AnalysisResult),
}

impl AnalysisOutcome {
    /// The report, if the analysis ran.
    pub fn report(&self) -> Option<&UnusedReport> {
        match self {
            Self::Completed(result) => Some(&result.report),
            Self::Skipped(_) => None,
        }
    }
}

/// Result of a completed analysis.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Root path that was analyzed
    pub root: PathBuf,

    /// Declarations file that was parsed
    pub declarations: PathBuf,

    /// Manifest that was scanned, if any
    pub manifest: Option<PathBuf>,

    /// Unused identifiers after ignore patterns
    pub report: UnusedReport,

    pub stats: ScanStats,
}

impl AnalysisResult {
    /// Check if any unused resource was found.
    pub fn has_unused(&self) -> bool {
        !self.report.is_empty()
    }

    /// Get percentage of declared identifiers that are unused.
    pub fn unused_percentage(&self) -> f64 {
        if self.stats.declared == 0 {
            0.0
        } else {
            (self.report.total() as f64 / self.stats.declared as f64) * 100.0
        }
    }
}

/// Counters collected during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Declared identifiers, `id` included
    pub declared: usize,
    pub source_files: usize,
    pub markup_files: usize,
    pub manifest_scanned: bool,
    /// Distinct references found in program source
    pub source_references: usize,
    /// Distinct references first seen in markup
    pub markup_references: usize,
    pub total_references: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    const R_JAVA: &str = "\
package com.example.app;
public final class R {
    public static final class drawable {
        public static final int icon=0x7f020000;
    }
    public static final class id {
        public static final int btn1=0x7f050000;
    }
    public static final class string {
        public static final int app_name=0x7f040000;
        public static final int unused_label=0x7f040001;
    }
}
";

    fn create_test_project() -> PathBuf {
        // Use unique dir name to avoid conflicts with concurrent tests
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "deadres_builder_test_{}_{}",
            std::process::id(),
            id
        ));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }

        fs::create_dir_all(dir.join("gen/com/example/app")).expect("Failed to create gen dir");
        fs::create_dir_all(dir.join("src/com/example/app")).expect("Failed to create src dir");
        fs::create_dir_all(dir.join("res/layout")).expect("Failed to create res dir");

        fs::write(dir.join("gen/com/example/app/R.java"), R_JAVA).expect("Failed to write R.java");
        fs::write(
            dir.join("src/com/example/app/Main.java"),
            "class Main { void f() { setTitle(R.string.app_name); } }",
        )
        .expect("Failed to write Main.java");
        fs::write(
            dir.join("AndroidManifest.xml"),
            r#"<manifest package="com.example.app"><application android:icon="@drawable/icon"/></manifest>"#,
        )
        .expect("Failed to write manifest");

        dir
    }

    fn completed(outcome: AnalysisOutcome) -> AnalysisResult {
        match outcome {
            AnalysisOutcome::Completed(result) => result,
            AnalysisOutcome::Skipped(reason) => panic!("unexpected skip: {}", reason),
        }
    }

    #[test]
    fn test_builder_basic() {
        let dir = create_test_project();

        let result = completed(Deadres::new(&dir).analyze().unwrap());

        assert_eq!(
            result.report.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
            vec!["R.string.unused_label"]
        );
        assert_eq!(result.declarations, dir.join("gen/com/example/app/R.java"));
        assert_eq!(result.manifest, Some(dir.join("AndroidManifest.xml")));
        assert_eq!(result.stats.declared, 4);
        assert_eq!(result.stats.source_files, 1);
        assert_eq!(result.stats.markup_files, 0);
        assert!(result.has_unused());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_builder_ignore_patterns() {
        let dir = create_test_project();

        let result = completed(
            Deadres::new(&dir)
                .ignore_patterns([r"^R\.string\.unused_"])
                .analyze()
                .unwrap(),
        );
        assert!(result.report.is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let dir = create_test_project();
        let err = Deadres::new(&dir).ignore_patterns(["("]).analyze().unwrap_err();
        assert!(matches!(err, DeadresError::InvalidArgument { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_non_apk_skipped() {
        let dir = create_test_project();
        let outcome = Deadres::new(&dir).packaging("aar").analyze().unwrap();
        assert!(matches!(
            outcome,
            AnalysisOutcome::Skipped(SkipReason::NotApkPackaging { .. })
        ));
        assert!(outcome.report().is_none());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_instrumentation_project_skipped() {
        let dir = create_test_project();
        fs::write(
            dir.join("AndroidManifest.xml"),
            r#"<manifest package="com.example.app.test">
<instrumentation android:targetPackage="com.example.app"/></manifest>"#,
        )
        .unwrap();

        let outcome = Deadres::new(&dir).analyze().unwrap();
        match outcome {
            AnalysisOutcome::Skipped(SkipReason::InstrumentationProject { target_package, .. }) => {
                assert_eq!(target_package, "com.example.app");
            }
            other => panic!("expected instrumentation skip, got {:?}", other),
        }

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_nested_manifest_discovered() {
        let dir = create_test_project();
        fs::remove_file(dir.join("AndroidManifest.xml")).unwrap();
        fs::create_dir_all(dir.join("src/main")).unwrap();
        fs::write(
            dir.join("src/main/AndroidManifest.xml"),
            r#"<manifest package="com.example.app"><application android:icon="@drawable/icon"/></manifest>"#,
        )
        .unwrap();

        let result = completed(Deadres::new(&dir).analyze().unwrap());
        assert_eq!(result.manifest, Some(dir.join("src/main/AndroidManifest.xml")));
        assert!(result.stats.manifest_scanned);
        assert_eq!(
            result.report.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
            vec!["R.string.unused_label"]
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_manifest_still_analyzed() {
        let dir = create_test_project();
        fs::write(
            dir.join("AndroidManifest.xml"),
            r#"<manifest package="com.example.app"><application android:icon="@drawable/icon"></manifest>"#,
        )
        .unwrap();

        let result = completed(Deadres::new(&dir).analyze().unwrap());
        assert!(result.stats.manifest_scanned);
        assert_eq!(
            result.report.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
            vec!["R.drawable.icon", "R.string.unused_label"]
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_declarations() {
        let dir = create_test_project();
        fs::remove_file(dir.join("gen/com/example/app/R.java")).unwrap();

        let err = Deadres::new(&dir).analyze().unwrap_err();
        assert!(matches!(err, DeadresError::DeclarationsNotFound { .. }));

        let err = Deadres::new(&dir)
            .declarations_file("gen/R.java")
            .analyze()
            .unwrap_err();
        assert!(matches!(err, DeadresError::Io { .. }));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_with_config() {
        let dir = create_test_project();
        let cfg: DeadresConfig = toml::from_str(
            r#"
categories = ["drawable"]
ignore = ["icon"]
"#,
        )
        .unwrap();

        let result = completed(Deadres::new(&dir).with_config(&cfg).analyze().unwrap());
        // string references are no longer recognized
        assert_eq!(result.report.total(), 2);
        assert!(result.report.names("drawable").is_none());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::NotApkPackaging {
            packaging: "pom".into(),
        };
        assert!(reason.to_string().contains("\"pom\""));
    }

    #[test]
    fn test_unused_percentage() {
        let result = AnalysisResult {
            root: PathBuf::from("/test"),
            declarations: PathBuf::from("/test/R.java"),
            manifest: None,
            report: UnusedReport::default(),
            stats: ScanStats {
                declared: 10,
                ..ScanStats::default()
            },
        };
        assert!(!result.has_unused());
        assert!(result.unused_percentage().abs() < 0.01);
    }
}
