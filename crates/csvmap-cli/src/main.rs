//! csvmap CLI
//!
//! Command-line tool for mapping CSV columns onto a target schema, previewing
//! the mapped rows, and exporting them.

use clap::{Parser, Subcommand, ValueEnum};
use csvmap_core::{
    encode_json, parse_csv, transform, write_csv, MappingConfig, OutputRow, RuleEntry,
    SourceTable, DEFAULT_EXPORT_NAME,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "csvmap")]
#[command(about = "Map CSV columns onto a target schema", long_about = None)]
#[command(version)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and display a single CSV file
    Inspect {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Create a mapping file for a target schema
    CreateMapping {
        /// Target columns (comma-separated)
        #[arg(short, long)]
        schema: String,

        /// Output path for the mapping file
        #[arg(short, long)]
        output: PathBuf,

        /// Rules to set (target:source_columns:action)
        #[arg(short, long)]
        rule: Vec<String>,
    },

    /// Show the mapped rows
    Preview {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Path to mapping file (JSON)
        #[arg(short, long)]
        mapping: PathBuf,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Export the mapped rows to a file
    Export {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Path to mapping file (JSON)
        #[arg(short, long)]
        mapping: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Output file path
        #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG overrides the level chosen by --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> csvmap_core::Result<()> {
    match command {
        Commands::Inspect { file } => cmd_inspect(&file),
        Commands::CreateMapping { schema, output, rule } => {
            cmd_create_mapping(&schema, &output, &rule)
        }
        Commands::Preview {
            file,
            mapping,
            limit,
        } => cmd_preview(&file, &mapping, limit),
        Commands::Export {
            file,
            mapping,
            format,
            output,
        } => cmd_export(&file, &mapping, format, &output),
    }
}

fn cmd_inspect(file: &Path) -> csvmap_core::Result<()> {
    let table = parse_csv(file)?;

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    println!("{}", table.headers.join("\t"));
    println!("{}", "-".repeat(table.headers.len() * 12));

    for row in table.rows.iter().take(10) {
        let values: Vec<&str> = table
            .headers
            .iter()
            .map(|h| row.get(h).unwrap_or(""))
            .collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > 10 {
        println!("... ({} more rows)", table.row_count() - 10);
    }

    Ok(())
}

fn cmd_create_mapping(schema: &str, output: &Path, rules: &[String]) -> csvmap_core::Result<()> {
    let config = build_mapping(schema, rules)?;

    config.save(output)?;
    println!("Created mapping file: {}", output.display());
    println!("Target columns: {}", config.schema.join(", "));
    println!("Rules: {}", config.rules.len());
    println!();
    println!("Edit the file to fill in source columns, then run:");
    println!(
        "  csvmap preview --file <data.csv> --mapping {}",
        output.display()
    );

    Ok(())
}

/// Default rules for the schema, with each `target:columns:action` spec
/// replacing the rule for its target (or appended when the target is new)
fn build_mapping(schema: &str, specs: &[String]) -> csvmap_core::Result<MappingConfig> {
    let mut config = MappingConfig::from_schema_str(schema);

    for spec in specs {
        let entry = RuleEntry::parse_spec(spec)?;
        match config
            .rules
            .iter_mut()
            .find(|r| r.target_column == entry.target_column)
        {
            Some(existing) => *existing = entry,
            None => config.rules.push(entry),
        }
    }

    Ok(config)
}

fn cmd_preview(file: &Path, mapping: &Path, limit: Option<usize>) -> csvmap_core::Result<()> {
    let (table, config) = load_inputs(file, mapping)?;
    let rows = transform(&table.rows, &config.rules());

    let columns: Vec<String> = if config.schema.is_empty() {
        rows.first()
            .map(|r| r.columns().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    } else {
        config.schema.clone()
    };

    println!("{}", columns.join("\t"));
    println!("{}", "-".repeat(columns.len() * 12));

    let row_limit = limit.unwrap_or(rows.len());
    for row in rows.iter().take(row_limit) {
        println!("{}", format_row(row, &columns));
    }

    if rows.len() > row_limit {
        println!("... ({} more rows)", rows.len() - row_limit);
    }

    Ok(())
}

fn cmd_export(
    file: &Path,
    mapping: &Path,
    format: Format,
    output: &Path,
) -> csvmap_core::Result<()> {
    let (table, config) = load_inputs(file, mapping)?;
    let rows = transform(&table.rows, &config.rules());

    match format {
        Format::Csv => {
            write_csv(output, &rows)?;
        }
        Format::Json => {
            fs::write(output, encode_json(&rows)?)?;
        }
    }

    println!(
        "Exported {} rows (from {} source rows) to {}",
        rows.len(),
        table.row_count(),
        output.display()
    );

    Ok(())
}

/// Load the CSV and mapping file, warning about rules that cannot resolve
fn load_inputs(file: &Path, mapping: &Path) -> csvmap_core::Result<(SourceTable, MappingConfig)> {
    let table = parse_csv(file)?;
    let config = MappingConfig::load(mapping)?;

    for column in config.unmapped_columns() {
        tracing::warn!(column, "target column has no mapping rule");
    }
    for target in config.unknown_targets() {
        tracing::warn!(rule_target = target, "mapping rule targets a column outside the schema");
    }
    for rule in config.rules() {
        for source in rule.source_columns.iter().filter(|c| !table.has_column(c)) {
            tracing::warn!(
                rule_target = %rule.target_column,
                source = %source,
                "source column not found in CSV header"
            );
        }
    }

    tracing::info!(
        rows = table.row_count(),
        rules = config.rules.len(),
        "loaded inputs"
    );

    Ok((table, config))
}

fn format_row(row: &OutputRow, columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| row.get(c).unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use csvmap_core::{Action, MappingRule, SourceRow};

    fn output_row(pairs: &[(&str, &str)]) -> OutputRow {
        let row: SourceRow = pairs.iter().copied().collect();
        let rules: Vec<MappingRule> = pairs
            .iter()
            .map(|(k, _)| MappingRule::new(*k, k, Action::Normal))
            .collect();
        transform(&[row], &rules).remove(0)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_defaults() {
        let cli = Cli::parse_from(["csvmap", "export", "-f", "in.csv", "-m", "map.json"]);
        match cli.command {
            Commands::Export { format, output, .. } => {
                assert_eq!(format, Format::Csv);
                assert_eq!(output, PathBuf::from(DEFAULT_EXPORT_NAME));
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn test_build_mapping_replaces_and_appends() {
        let specs = vec![
            "department:dept1,dept2:separate".to_string(),
            "extra:notes".to_string(),
        ];
        let config = build_mapping("full_name,department", &specs).unwrap();

        assert_eq!(config.rules.len(), 3);
        assert_eq!(config.rules[0], RuleEntry::for_target("full_name"));
        assert_eq!(config.rules[1].action, Action::Separate);
        assert_eq!(config.rules[1].source_columns, "dept1,dept2");
        assert_eq!(config.rules[2].target_column, "extra");
    }

    #[test]
    fn test_build_mapping_rejects_unknown_action() {
        let specs = vec!["a:x:explode".to_string()];
        assert!(build_mapping("a", &specs).is_err());
    }

    #[test]
    fn test_format_row_follows_columns() {
        let row = output_row(&[("a", "1"), ("b", "2")]);
        let columns = vec!["b".to_string(), "missing".to_string(), "a".to_string()];
        assert_eq!(format_row(&row, &columns), "2\t\t1");
    }
}
