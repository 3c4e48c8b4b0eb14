//! Minimal CLI: component facts → (shape | bound props)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;

use crate::facts::ComponentFacts;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer prop shapes from component analysis dumps and emit them as literals, or bind abstract props
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// build each component's prop shape and print it
    Shape(ShapeOut),
    /// build each component's prop shape and bind abstract values into its props literal
    Bind(BindOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /data/components)
    #[arg(long)]
    json_pointer: Option<String>,

    /// expand undeclared nested reads into nested shapes (overrides each dump's `deepAccessors`)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    deep_accessors: Option<bool>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum ShapeFormat {
    /// object literal, as spliced into emitted code
    #[default]
    Js,
    /// plain-data JSON keyed by component name
    Json,
}

#[derive(clap::Parser, Debug)]
struct ShapeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[arg(long, value_enum, default_value_t = ShapeFormat::Js)]
    format: ShapeFormat,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct BindOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// binding root name (overrides each dump's `prefix`; default `props`)
    #[arg(long)]
    prefix: Option<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<ComponentFacts>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut components = Vec::new();
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read {}", source_path.display()))?;
            let facts = crate::facts::load_facts(&source, self.json_pointer.as_deref())
                .with_context(|| format!("failed to decode {}", source_path.display()))?;
            tracing::debug!(path = %source_path.display(), components = facts.len(), "loaded facts");
            components.extend(facts);
        }
        Ok(components)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Shape(target) => {
                let settings = &target.input_settings;
                let components = settings.load()?;
                let output = match target.format {
                    ShapeFormat::Js => {
                        process(&components, |facts| Ok(facts.shape_listing(settings.deep_accessors)?))?.concat()
                    }
                    ShapeFormat::Json => render_shape_entries(&components, settings.deep_accessors)?,
                };
                write_output(target.out.as_deref(), &output)
            }
            Command::Bind(target) => {
                let settings = &target.input_settings;
                let components = settings.load()?;
                let rendered = process(&components, |facts| {
                    Ok(facts.bind_listing(settings.deep_accessors, target.prefix.as_deref())?)
                })?;
                write_output(target.out.as_deref(), &rendered.concat())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// JSON array of `{name, shape}` objects, one per component in input order.
fn render_shape_entries(components: &[ComponentFacts], deep_accessors: Option<bool>) -> Result<String> {
    let entries = process(components, |facts| Ok(facts.shape_entry(deep_accessors)?))?;
    Ok(serde_json::to_string_pretty(&entries)? + "\n")
}

/// Run `apply` over every component in parallel, keeping input order.
/// Every failure is reported; the command fails if any component did.
fn process<'a, T, F>(components: &'a [ComponentFacts], apply: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&'a ComponentFacts) -> Result<T> + Sync,
{
    let results: Vec<Result<T>> = components.par_iter().map(&apply).collect();
    let mut out = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (facts, result) in components.iter().zip(results) {
        match result {
            Ok(value) => out.push(value),
            Err(error) => {
                failed += 1;
                eprintln!("{} component `{}`: {error:#}", "error:".red().bold(), facts.name);
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} components failed", components.len());
    }
    Ok(out)
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(anyhow!("glob pattern matched no files: {pattern}"));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
