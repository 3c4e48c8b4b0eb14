//! Snapshot runner: for every `<stem>.json` facts file under the fixtures
//! directory, compare the shape listing against `<stem>.shape.js`, the plain-data
//! shapes against `<stem>.shape.json` and the bound props listing against
//! `<stem>.bind.js` (each only when present).
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use prop_shape::facts::{ComponentFacts, load_facts};

type Render = fn(&[ComponentFacts]) -> Result<String>;

const SNAPSHOTS: [(&str, Render); 3] = [
    ("shape.js", render_shapes),
    ("shape.json", render_shape_entries),
    ("bind.js", render_bound),
];

fn render_shapes(components: &[ComponentFacts]) -> Result<String> {
    let mut out = String::new();
    for facts in components {
        out.push_str(&facts.shape_listing(None)?);
    }
    Ok(out)
}

fn render_shape_entries(components: &[ComponentFacts]) -> Result<String> {
    let entries = components
        .iter()
        .map(|facts| facts.shape_entry(None))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::to_string_pretty(&entries)? + "\n")
}

fn render_bound(components: &[ComponentFacts]) -> Result<String> {
    let mut out = String::new();
    for facts in components {
        out.push_str(&facts.bind_listing(None, None)?);
    }
    Ok(out)
}

#[derive(Debug, Default)]
struct Tally {
    passed: usize,
    failed: Vec<PathBuf>,
}

fn run(root: &Path) -> Result<Tally> {
    let pattern = root.join("*.json");
    let mut tally = Tally::default();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry?;
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let components = load_facts(&source, None)
            .with_context(|| format!("failed to decode {}", path.display()))?;

        for (suffix, render) in SNAPSHOTS {
            let snapshot = path.with_extension(suffix);
            if !snapshot.exists() {
                continue;
            }
            let expected = std::fs::read_to_string(&snapshot)?;
            let actual = render(&components)?;
            if actual == expected {
                println!("{} {}", "PASS".green().bold(), snapshot.display());
                tally.passed += 1;
            } else {
                println!("{} {}", "FAIL".red().bold(), snapshot.display());
                println!("{}\n{expected}", "--- expected".dimmed());
                println!("{}\n{actual}", "+++ actual".dimmed());
                tally.failed.push(snapshot);
            }
        }
    }
    Ok(tally)
}

fn default_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("fixtures")
}

fn main() -> Result<()> {
    let root = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(default_root);
    let tally = run(&root)?;
    println!(
        "{} passed, {} failed",
        tally.passed.to_string().green(),
        tally.failed.len().to_string().red()
    );
    if !tally.failed.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_match_snapshots() {
        let tally = run(&default_root()).unwrap();
        assert!(tally.passed >= 5, "expected the bundled fixtures, got {tally:?}");
        assert!(tally.failed.is_empty(), "snapshot mismatches: {:?}", tally.failed);
    }
}
