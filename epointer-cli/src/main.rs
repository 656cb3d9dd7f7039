//! epointer CLI - generates `Pointer()` accessors for Go enumerated types.
//!
//! Features:
//! - Directory or explicit file list as input
//! - Build tag selection (`-tags`), also read from epointer.toml
//! - Writes `epointer_gen.go` next to the package unless told otherwise
//! - Listing mode showing which constants landed on which type

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use epointer_core::{
    init_structured_logging, load_config, log_error, log_info, log_warn, print_json, print_plain,
    resolve_patterns, Epointer, EpointerConfig,
};

/// Long flags also accepted with a single dash.
const SINGLE_DASH_LONG: &[&str] = &["output", "tags"];

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generates Pointer() accessors for Go enumerated types"
)]
pub struct Cli {
    /// Package directory, or a list of .go files from one directory
    patterns: Vec<String>,

    /// Output file name; default <dir>/epointer_gen.go
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Comma-separated list of build tags to apply
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,

    /// Print the generated code instead of writing it
    #[arg(long)]
    stdout: bool,

    /// List the types and constants that would get accessors
    #[arg(long)]
    list: bool,

    /// Output the listing in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] epointer internal error: {}", info);
        eprintln!("[PANIC] No output file was written.");
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let args: Vec<String> = std::env::args().collect();
    let result = run(&args);
    if let Err(e) = &result {
        log_error(&format!("{:#}", e));
    }
    result
}

fn run(args: &[String]) -> Result<()> {
    let cli = Cli::parse_from(normalize_args(args));
    let invocation = args.iter().skip(1).cloned().collect::<Vec<_>>().join(" ");

    let (dir, _) = resolve_patterns(&cli.patterns)?;
    let cfg = load_config(&dir)
        .with_context(|| format!("Failed to load config from {}", dir.display()))?
        .unwrap_or_default();

    let mut builder = Epointer::new(cli.patterns.clone())
        .tags(effective_tags(&cli, &cfg))
        .invocation(invocation);
    if let Some(output) = output_path(&cli, &cfg, &dir) {
        builder = builder.output(output);
    }

    if cli.list {
        let generation = builder.generate()?;
        if cli.json || cfg.wants_json() {
            print_json(&generation.package, &generation.groups);
        } else {
            print_plain(&generation.package, &generation.groups);
        }
        return Ok(());
    }

    if cli.stdout {
        let generation = builder.generate()?;
        print!("{}", generation.source);
        return Ok(());
    }

    let generation = builder.write()?;
    if !generation.has_methods() {
        log_warn(&format!(
            "no constants of named types in package {}; {} has no methods",
            generation.package,
            generation.output_path.display()
        ));
    }
    log_info(&format!(
        "{} accessor(s) for package {} in {}",
        generation.groups.len(),
        generation.package,
        generation.output_path.display()
    ));
    Ok(())
}

/// Accepts the single-dash long flags `-output` and `-tags` (also in
/// `-flag=value` form) by rewriting them to their `--` spelling.
fn normalize_args(args: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut options_done = false;
    for (i, arg) in args.iter().enumerate() {
        if i == 0 || options_done {
            out.push(arg.clone());
            continue;
        }
        if arg == "--" {
            options_done = true;
            out.push(arg.clone());
            continue;
        }
        let rewritten = SINGLE_DASH_LONG.iter().find_map(|flag| {
            let rest = arg.strip_prefix('-')?.strip_prefix(flag)?;
            (rest.is_empty() || rest.starts_with('=')).then(|| format!("--{}{}", flag, rest))
        });
        out.push(rewritten.unwrap_or_else(|| arg.clone()));
    }
    out
}

/// Tags from the command line win over tags from the config file.
fn effective_tags(cli: &Cli, cfg: &EpointerConfig) -> Vec<String> {
    match &cli.tags {
        Some(tags) => split_tags(tags),
        None => cfg.tags().to_vec(),
    }
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Explicit `--output` as given; a configured file is relative to the package.
fn output_path(cli: &Cli, cfg: &EpointerConfig, dir: &Path) -> Option<PathBuf> {
    if let Some(output) = &cli.output {
        return Some(PathBuf::from(output));
    }
    cfg.output_file().map(|file| dir.join(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use epointer_core::OutputConfig;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("epointer").chain(args.iter().copied())).unwrap()
    }

    fn cfg_with(tags: &[&str], file: Option<&str>) -> EpointerConfig {
        EpointerConfig {
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
            output: Some(OutputConfig {
                file: file.map(String::from),
                format: None,
            }),
        }
    }

    #[test]
    fn test_parse_flags() {
        let cli = cli(&["-o", "out.go", "-t", "a,b", "--stdout", "pkg"]);
        assert_eq!(cli.output.as_deref(), Some("out.go"));
        assert_eq!(cli.tags.as_deref(), Some("a,b"));
        assert!(cli.stdout);
        assert_eq!(cli.patterns, vec!["pkg"]);
    }

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("epointer")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_single_dash_long_flags() {
        let cli = Cli::try_parse_from(normalize_args(&args(&["-tags", "tag", "."]))).unwrap();
        assert_eq!(cli.tags.as_deref(), Some("tag"));
        assert_eq!(cli.patterns, vec!["."]);

        let cli = Cli::try_parse_from(normalize_args(&args(&["-output", "x.go", "a.go"]))).unwrap();
        assert_eq!(cli.output.as_deref(), Some("x.go"));
        assert_eq!(cli.patterns, vec!["a.go"]);

        let cli = Cli::try_parse_from(normalize_args(&args(&["-output=y.go", "-tags=a,b"]))).unwrap();
        assert_eq!(cli.output.as_deref(), Some("y.go"));
        assert_eq!(cli.tags.as_deref(), Some("a,b"));
    }

    #[test]
    fn test_normalize_leaves_other_args() {
        let given = args(&["-o", "z.go", "-outputs", "--", "-tags"]);
        assert_eq!(normalize_args(&given), given);
    }

    #[test]
    fn test_no_patterns() {
        let cli = cli(&[]);
        assert!(cli.patterns.is_empty());
        assert!(!cli.list);
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags("tag, linux,,"), vec!["tag", "linux"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn test_cli_tags_override_config() {
        let cfg = cfg_with(&["fromcfg"], None);
        assert_eq!(effective_tags(&cli(&["--tags", "x"]), &cfg), vec!["x"]);
        assert_eq!(effective_tags(&cli(&[]), &cfg), vec!["fromcfg"]);
    }

    #[test]
    fn test_output_path_precedence() {
        let dir = Path::new("/pkg");
        let cfg = cfg_with(&[], Some("ptr_gen.go"));
        assert_eq!(
            output_path(&cli(&["-o", "x.go"]), &cfg, dir),
            Some(PathBuf::from("x.go"))
        );
        assert_eq!(
            output_path(&cli(&[]), &cfg, dir),
            Some(PathBuf::from("/pkg/ptr_gen.go"))
        );
        assert_eq!(output_path(&cli(&[]), &EpointerConfig::default(), dir), None);
    }
}
