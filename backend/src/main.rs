//! Edusuite CLI - convert ERP exports into Edusuite import tables
//!
//! # Main Commands
//!
//! ```bash
//! edusuite convert programs curriculum.csv        # writes converted_programs.csv
//! edusuite convert graduate-grades grades.csv -o - # CSV on stdout
//! edusuite convert cleaning-equivalency eq.csv --confirm --report report.json
//! edusuite serve                                   # HTTP server (port 3000)
//! ```
//!
//! # Inspection Commands
//!
//! ```bash
//! edusuite parse input.csv    # Parsed records as JSON
//! edusuite kinds              # Available conversions
//! edusuite rules              # Effective rules as JSON
//! ```

use clap::{Parser, Subcommand};
use edusuite::api::logs::LOG_BROADCASTER;
use edusuite::{
    convert_file, read_table_file, write_csv, ConvertOptions, ParseOptions, RecordKind, Rules,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "edusuite")]
#[command(about = "Convert ERP academic-records exports into Edusuite import tables", long_about = None)]
struct Cli {
    /// Silence progress logs on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV export as the given kind
    Convert {
        /// Conversion kind (see `edusuite kinds`)
        kind: RecordKind,

        /// Input CSV file
        input: PathBuf,

        /// Output CSV file, `-` for stdout (default: the kind's file name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the structured report as JSON
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Remove flagged equivalency rows
        #[arg(long)]
        confirm: bool,

        /// Rules file (default: $EDUSUITE_RULES or built-in rules)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Input encoding (auto-detect if not specified)
        #[arg(short, long)]
        encoding: Option<String>,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// Parse a CSV file and output JSON records
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Input encoding (auto-detect if not specified)
        #[arg(short, long)]
        encoding: Option<String>,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available conversions
    Kinds,

    /// Print the effective rules as JSON
    Rules {
        /// Rules file (default: $EDUSUITE_RULES or built-in rules)
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Rules file (default: $EDUSUITE_RULES or built-in rules)
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOG_BROADCASTER.set_quiet(cli.quiet);

    let result = match cli.command {
        Commands::Convert {
            kind,
            input,
            output,
            report,
            confirm,
            rules,
            encoding,
            delimiter,
        } => cmd_convert(
            kind,
            &input,
            output.as_deref(),
            report.as_deref(),
            confirm,
            rules.as_deref(),
            ParseOptions { encoding, delimiter },
        ),

        Commands::Parse {
            input,
            encoding,
            delimiter,
            output,
        } => cmd_parse(&input, ParseOptions { encoding, delimiter }, output.as_deref()),

        Commands::Kinds => cmd_kinds(),

        Commands::Rules { rules } => cmd_rules(rules.as_deref()),

        Commands::Serve { port, rules } => cmd_serve(port, rules.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_rules(path: Option<&Path>) -> Result<Rules, Box<dyn std::error::Error>> {
    let rules = match path {
        Some(p) => Rules::from_file(p)?,
        None => Rules::from_env()?,
    };
    Ok(rules)
}

fn cmd_convert(
    kind: RecordKind,
    input: &Path,
    output: Option<&Path>,
    report: Option<&Path>,
    confirm: bool,
    rules: Option<&Path>,
    parse: ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let rules = load_rules(rules)?;
    let options = ConvertOptions { confirm };

    if kind.is_gated() && !confirm {
        eprintln!("ℹ️  Flagged rows are reported only; pass --confirm to remove them");
    }

    let conversion = convert_file(kind, input, &rules, &options, &parse)?;

    let csv = write_csv(&conversion.table)?;
    let default_output = PathBuf::from(&conversion.file_name);
    write_output(&csv, Some(output.unwrap_or(default_output.as_path())))?;

    if let Some(path) = report {
        let json = serde_json::to_string_pretty(&conversion.report)?;
        fs::write(path, json)?;
        eprintln!("💾 Report written to: {}", path.display());
    }

    let messages = conversion.report.messages();
    if conversion.report.is_clean() {
        eprintln!("\n✨ Done: {} rows, nothing to report", conversion.table.len());
    } else {
        eprintln!("\n📊 Report ({} finding(s)):", messages.len());
        for message in &messages {
            eprintln!("   - {}", message);
        }
    }

    Ok(())
}

fn cmd_parse(
    input: &Path,
    parse: ParseOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let explicit_delimiter = parse.delimiter.is_some();
    let parsed = read_table_file(input, &parse)?;

    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(parsed.delimiter),
        if explicit_delimiter { "" } else { " (auto-detected)" }
    );
    eprintln!("   Columns: {}", parsed.table.columns.join(", "));
    eprintln!("✅ Parsed {} records", parsed.table.len());

    let json = serde_json::to_string_pretty(&parsed.table.to_json_records())?;
    write_output(&format!("{}\n", json), output)?;

    Ok(())
}

fn cmd_kinds() -> Result<(), Box<dyn std::error::Error>> {
    for kind in RecordKind::ALL {
        let gate = if kind.is_gated() { " [--confirm]" } else { "" };
        println!("{:<26} {:<38} {}{}", kind.name(), kind.file_name(), kind.description(), gate);
    }
    Ok(())
}

fn cmd_rules(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", load_rules(path)?.to_json()?);
    Ok(())
}

async fn cmd_serve(port: u16, rules: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let rules = load_rules(rules)?;
    edusuite::server::start_server(port, rules).await
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

/// `None` and `-` write to stdout.
fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        _ => {
            print!("{}", content);
        }
    }
    Ok(())
}
