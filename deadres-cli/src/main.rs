//! deadres CLI - finds R.java constants no source or resource file refers to.
//!
//! Features:
//! - Automatic R.java and AndroidManifest.xml discovery
//! - Skips non-apk and instrumentation-test projects
//! - Optional deadres.toml configuration, overridden by flags
//! - Plain or JSON report on stdout, logs on stderr

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

use deadres_core::{
    init_logging, load_config, print_json, print_plain, AnalysisOutcome, CategorySet, Deadres,
    DeadresConfig, LogFormat,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Unused Android resource detector")]
pub struct Cli {
    /// Path to the root of the Android project
    #[arg(default_value = ".")]
    path: String,

    /// Generated R.java to read (searched under PATH by default)
    #[arg(long, value_name = "FILE")]
    declarations: Option<PathBuf>,

    /// Program source directory (default: src)
    #[arg(long, value_name = "DIR")]
    source_dir: Option<PathBuf>,

    /// Resource directory (default: res)
    #[arg(long, value_name = "DIR")]
    resource_dir: Option<PathBuf>,

    /// AndroidManifest.xml to read (searched under PATH by default)
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Suffix of program source files (default: .java)
    #[arg(long)]
    source_suffix: Option<String>,

    /// Suffix of markup files (default: .xml)
    #[arg(long)]
    markup_suffix: Option<String>,

    /// Project packaging; only "apk" projects are analysed
    #[arg(long)]
    packaging: Option<String>,

    /// Resource categories to recognize, comma-separated or repeated (replaces the default set)
    #[arg(long = "category", value_delimiter = ',')]
    categories: Vec<String>,

    /// Regular expression over R.<category>.<name> to leave out of the report (repeatable)
    #[arg(long, action = ArgAction::Append)]
    ignore: Vec<String>,

    /// Directory names to skip while scanning, comma-separated or repeated
    #[arg(long, value_delimiter = ',')]
    exclude_dir: Vec<String>,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Exit with code 1 when unused resources are found
    #[arg(long)]
    fail_on_unused: bool,

    /// Write logs as JSON instead of human-readable lines
    #[arg(long)]
    log_json: bool,
}

/// Builds the analysis from config first, then lets flags override it.
fn build_analysis(root: &Path, cli: &Cli, config: Option<&DeadresConfig>) -> Deadres {
    let mut analysis = Deadres::new(root);
    if let Some(cfg) = config {
        analysis = analysis.with_config(cfg);
    }

    if let Some(p) = &cli.declarations {
        analysis = analysis.declarations_file(p);
    }
    if let Some(p) = &cli.source_dir {
        analysis = analysis.source_dir(p);
    }
    if let Some(p) = &cli.resource_dir {
        analysis = analysis.resource_dir(p);
    }
    if let Some(p) = &cli.manifest {
        analysis = analysis.manifest_file(p);
    }
    if let Some(s) = &cli.source_suffix {
        analysis = analysis.source_suffix(s);
    }
    if let Some(s) = &cli.markup_suffix {
        analysis = analysis.markup_suffix(s);
    }
    if let Some(p) = &cli.packaging {
        analysis = analysis.packaging(p);
    }
    if !cli.categories.is_empty() {
        analysis = analysis.categories(CategorySet::new(cli.categories.iter().cloned()));
    }

    analysis
        .ignore_patterns(cli.ignore.iter().cloned())
        .exclude_dirs(cli.exclude_dir.iter().cloned())
}

/// JSON output is chosen by `--json` or `[output] format = "json"`.
fn wants_json(cli: &Cli, config: Option<&DeadresConfig>) -> bool {
    cli.json || config.is_some_and(DeadresConfig::wants_json)
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deadres internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 101.");
    }));

    let cli = Cli::parse();

    init_logging(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Human
    });

    let root = Path::new(&cli.path);
    if !root.is_dir() {
        anyhow::bail!("Project path is not a directory: {}", cli.path);
    }

    let config = load_config(root)
        .with_context(|| format!("Failed to load configuration from {}", cli.path))?;

    let analysis = build_analysis(root, &cli, config.as_ref());
    let outcome = analysis
        .analyze()
        .with_context(|| format!("Unused resource analysis failed for {}", cli.path))?;

    match outcome {
        AnalysisOutcome::Skipped(reason) => {
            eprintln!("{}", reason);
            Ok(())
        }
        AnalysisOutcome::Completed(result) => {
            if wants_json(&cli, config.as_ref()) {
                print_json(&result.report);
            } else {
                print_plain(&result.report);
            }

            if cli.fail_on_unused && result.has_unused() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir()
            .join("deadres_cli_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir).ok();
        }
        fs::create_dir_all(&temp_dir).unwrap();
        temp_dir
    }

    fn create_project(name: &str) -> PathBuf {
        let dir = create_temp_dir(name);
        create_file(
            &dir.join("gen/R.java"),
            "public final class R {\n\
             public static final class string {\n\
             public static final int used=0x7f040000;\n\
             public static final int unused=0x7f040001;\n\
             }\n\
             }\n",
        );
        create_file(&dir.join("src/Main.java"), "setTitle(R.string.used);");
        dir
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("deadres").chain(args.iter().copied())).unwrap()
    }

    // --- argument parsing TESTS ---

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.path, ".");
        assert!(!cli.json);
        assert!(cli.categories.is_empty());
        assert!(cli.packaging.is_none());
    }

    #[test]
    fn test_multi_value_flags() {
        let cli = parse(&[
            "app",
            "--category",
            "string,drawable",
            "--category",
            "menu",
            "--ignore",
            "^R\\.raw\\.",
            "--ignore",
            "^R\\.(a|b),c$",
        ]);
        assert_eq!(cli.path, "app");
        assert_eq!(cli.categories, vec!["string", "drawable", "menu"]);
        assert_eq!(cli.ignore, vec!["^R\\.raw\\.", "^R\\.(a|b),c$"]);
    }

    #[test]
    fn test_path_after_list_flags() {
        let cli = parse(&["--category", "string", "myapp"]);
        assert_eq!(cli.path, "myapp");
        assert_eq!(cli.categories, vec!["string"]);

        let cli = parse(&["--ignore", "^R\\.raw\\.", "--exclude-dir", "build,out", "myapp"]);
        assert_eq!(cli.path, "myapp");
        assert_eq!(cli.ignore, vec!["^R\\.raw\\."]);
        assert_eq!(cli.exclude_dir, vec!["build", "out"]);
    }

    // --- build_analysis TESTS ---

    #[test]
    fn test_build_analysis_runs() {
        let dir = create_project("runs");
        let cli = parse(&[]);

        let outcome = build_analysis(&dir, &cli, None).analyze().unwrap();
        let ids: Vec<String> = outcome.report().unwrap().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["R.string.unused"]);
    }

    #[test]
    fn test_flags_override_config() {
        let dir = create_project("override");
        let config: DeadresConfig = toml_config("packaging = \"aar\"\n");

        let cli = parse(&["--packaging", "apk"]);
        let outcome = build_analysis(&dir, &cli, Some(&config)).analyze().unwrap();
        assert!(matches!(outcome, AnalysisOutcome::Completed(_)));

        let cli = parse(&[]);
        let outcome = build_analysis(&dir, &cli, Some(&config)).analyze().unwrap();
        assert!(matches!(outcome, AnalysisOutcome::Skipped(_)));
    }

    #[test]
    fn test_config_loaded_from_root() {
        let dir = create_project("config");
        create_file(
            &dir.join("deadres.toml"),
            "ignore = ['^R\\.string\\.unused$']\n\n[output]\nformat = \"json\"\n",
        );

        let config = load_config(&dir).unwrap();
        let cli = parse(&[]);
        assert!(wants_json(&cli, config.as_ref()));

        let outcome = build_analysis(&dir, &cli, config.as_ref()).analyze().unwrap();
        assert!(outcome.report().unwrap().is_empty());
    }

    #[test]
    fn test_wants_json_flag() {
        assert!(wants_json(&parse(&["--json"]), None));
        assert!(!wants_json(&parse(&[]), None));
    }

    fn toml_config(text: &str) -> DeadresConfig {
        let dir = create_temp_dir("toml");
        create_file(&dir.join("deadres.toml"), text);
        load_config(&dir).unwrap().unwrap()
    }
}
