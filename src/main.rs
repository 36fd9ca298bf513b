use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use tasnifoh::{
    bundles, derive_from_csv, keywords, load_nodes, read_poi_csv, resolve_pois,
    resolve_pois_direct, save_nodes, validate, ImportReport, PoiResolution,
};

#[derive(Parser)]
#[command(name = "tasnifoh")]
#[command(about = "Batch tools for the bilingual POI category taxonomy")]
#[command(version)]
struct Cli {
    /// Directory holding categories.json and the generated outputs
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import POIs from a CSV export, reconciling category names against the taxonomy
    Import {
        /// Path to the POI CSV
        csv: PathBuf,

        /// Match against the taxonomy as given instead of letting the CSV create nodes
        #[arg(long)]
        no_authoritative: bool,
    },

    /// Expand per-category search keywords from the static synonym tables
    ExpandKeywords {
        /// Categories file to read (default: <data-dir>/categories.json)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Where to write the expanded file (default: overwrite the input)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Expand keyword bundles (synonym groups + phrase templates)
    ExpandBundles,

    /// Prune keywords that share nothing with their category name
    ValidateKeywords {
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            csv,
            no_authoritative,
        } => run_import(&cli.data_dir, &csv, !no_authoritative),
        Commands::ExpandKeywords { input, output } => {
            run_expand_keywords(&cli.data_dir, input, output)
        }
        Commands::ExpandBundles => run_expand_bundles(&cli.data_dir),
        Commands::ValidateKeywords { input, output } => {
            run_validate_keywords(&cli.data_dir, input, output)
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn run_import(data_dir: &Path, csv_path: &Path, authoritative: bool) -> Result<()> {
    if !csv_path.exists() {
        bail!("CSV not found: {}", csv_path.display());
    }

    let categories_path = data_dir.join("categories.json");
    println!("📂 Loading taxonomy from {}...", categories_path.display());
    let taxonomy = load_nodes(&categories_path)?;
    println!("✓ Loaded {} categories", taxonomy.len());

    let rows = read_poi_csv(csv_path)?;
    println!("✓ Parsed {} CSV rows", rows.len());

    let pois_path = data_dir.join("pois.json");
    let report_path = data_dir.join("pois_import_report.json");

    if authoritative {
        let reconciliation = derive_from_csv(&rows, taxonomy);
        let resolution = resolve_pois(&rows, &reconciliation);
        let touched = reconciliation.touched_nodes();
        let report = ImportReport::new(
            resolution.counters.clone(),
            reconciliation.dual_matches.clone(),
            resolution.unmatched,
        );

        // All processing done in memory; now write everything at once
        save_nodes(&data_dir.join("categories_from_csv.json"), &touched)?;
        save_nodes(&data_dir.join("categories_merged.json"), &reconciliation.nodes)?;
        write_json(&pois_path, &resolution.pois)?;
        write_json(&report_path, &report)?;

        println!(
            "✓ Merged taxonomy: {} nodes ({} touched by this CSV)",
            reconciliation.nodes.len(),
            touched.len()
        );
        if !report.dual_matches.is_empty() {
            println!(
                "⚠ {} category pairs matched different nodes by English vs Arabic name (see report)",
                report.dual_matches.len()
            );
        }
        print_import_summary(&report, &pois_path, &report_path)?;
    } else {
        let PoiResolution {
            pois,
            unmatched,
            counters,
        } = resolve_pois_direct(&rows, &taxonomy);
        let report = ImportReport::new(counters, Vec::new(), unmatched);

        write_json(&pois_path, &pois)?;
        write_json(&report_path, &report)?;

        print_import_summary(&report, &pois_path, &report_path)?;
    }

    Ok(())
}

fn print_import_summary(report: &ImportReport, pois_path: &Path, report_path: &Path) -> Result<()> {
    println!("Imported: {}", serde_json::to_string(&report.summary)?);
    println!("Output: {}", pois_path.display());
    println!("Report: {}", report_path.display());
    Ok(())
}

fn run_expand_keywords(
    data_dir: &Path,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| data_dir.join("categories.json"));
    let output = output.unwrap_or_else(|| input.clone());

    let mut nodes = load_nodes(&input)?;
    println!("Processing {} categories...", nodes.len());

    keywords::expand_all(&mut nodes);

    save_nodes(&output, &nodes)?;
    println!("✓ Updated {} categories: {}", nodes.len(), output.display());
    Ok(())
}

fn run_expand_bundles(data_dir: &Path) -> Result<()> {
    // Prefer the merged taxonomy from the last import when it exists
    let merged = data_dir.join("categories_merged.json");
    let source = if merged.exists() {
        merged
    } else {
        data_dir.join("categories.json")
    };

    let mut nodes = load_nodes(&source)?;
    let stats = bundles::expand_all(&mut nodes);

    let output = data_dir.join("categories_bundled.json");
    let report_path = data_dir.join("bundles_report.json");
    save_nodes(&output, &nodes)?;
    write_json(
        &report_path,
        &serde_json::json!({
            "source": source.display().to_string(),
            "output": output.display().to_string(),
            "ar_before": stats.ar_before,
            "ar_after": stats.ar_after,
            "en_before": stats.en_before,
            "en_after": stats.en_after,
        }),
    )?;

    println!("Source: {}", source.display());
    println!("Output: {}", output.display());
    println!("Report: {}", report_path.display());
    println!(
        "AR: {} -> {} (diff: {})",
        stats.ar_before,
        stats.ar_after,
        stats.ar_after as i64 - stats.ar_before as i64
    );
    println!(
        "EN: {} -> {} (diff: {})",
        stats.en_before,
        stats.en_after,
        stats.en_after as i64 - stats.en_before as i64
    );
    Ok(())
}

fn run_validate_keywords(
    data_dir: &Path,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| data_dir.join("categories.json"));
    let output = output.unwrap_or_else(|| data_dir.join("categories_validated.json"));

    let mut nodes = load_nodes(&input)?;
    println!("Checking keywords for {} categories...", nodes.len());

    let outcome = validate::validate_all(&mut nodes);

    save_nodes(&output, &nodes)?;

    let stats = &outcome.stats;
    println!("Arabic keywords:   kept {}, removed {}", stats.kept_ar, stats.removed_ar);
    println!("English keywords:  kept {}, removed {}", stats.kept_en, stats.removed_en);

    if !outcome.issues.is_empty() {
        println!(
            "⚠ {} categories lost more than half their Arabic keywords:",
            outcome.issues.len()
        );
        for issue in outcome.issues.iter().take(5) {
            println!("  id {} - {}", issue.id, issue.name_ar);
            println!("    removed: {}", issue.removed.join(", "));
            if issue.kept.is_empty() {
                println!("    kept: (none)");
            } else {
                println!("    kept: {}", issue.kept.join(", "));
            }
        }
    }

    println!("✓ Written to {}", output.display());
    Ok(())
}
