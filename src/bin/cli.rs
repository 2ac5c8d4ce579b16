use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use maskcheck::error::MaskCheckError;
use maskcheck::{
    archive, mask, mode_for, validate_formats, verify_contact_presence, verify_erasure,
    CustomerRecord, ExportExtractor, FieldKind, SourceExtractor, VerifyProfile,
};

#[derive(Parser)]
#[command(name = "maskcheck")]
#[command(about = "PII masking and cross-channel consistency checks for customer exports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a verification profile (YAML)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an export archive and check every row against policy
    Inspect {
        /// Path to the downloaded export archive (zip)
        archive: PathBuf,

        /// Workbook passphrase (overrides the profile)
        #[arg(long, env = "MASKCHECK_PASSPHRASE")]
        passphrase: Option<String>,

        /// Artifact name prefix (overrides the profile)
        #[arg(long)]
        prefix: Option<String>,

        /// Skip the artifact file-name check
        #[arg(long)]
        skip_name_check: bool,
    },

    /// Apply the masking policy to a single value
    Mask {
        /// Field name, e.g. last_name, email, phone, date_of_birth
        field: FieldKind,

        /// Raw value to mask
        value: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("maskcheck=debug,info")
    } else {
        EnvFilter::new("maskcheck=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(clean) => {
            if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{} {}", "✗ Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool, MaskCheckError> {
    let profile = match &cli.profile {
        Some(path) => VerifyProfile::load(path)?,
        None => VerifyProfile::default(),
    };

    match cli.command {
        Commands::Inspect {
            archive,
            passphrase,
            prefix,
            skip_name_check,
        } => cmd_inspect(&profile, &archive, passphrase, prefix, skip_name_check),

        Commands::Mask { field, value } => {
            let masked = mask(&value, mode_for(field))?;
            println!("{}", masked);
            Ok(true)
        }
    }
}

fn cmd_inspect(
    profile: &VerifyProfile,
    path: &PathBuf,
    passphrase: Option<String>,
    prefix: Option<String>,
    skip_name_check: bool,
) -> Result<bool, MaskCheckError> {
    let passphrase = passphrase.unwrap_or_else(|| profile.passphrase.clone());
    let prefix = prefix.unwrap_or_else(|| profile.product_prefix.clone());

    let decoded = archive::decode(path, &passphrase)?;

    if skip_name_check {
        info!("artifact name check skipped");
    } else {
        archive::validate_artifact_name(&decoded.file_name, &prefix)?;
        println!("{} artifact name matches {}_export_YYYY-MM-DD.zip", "✓".green(), prefix);
    }

    println!("{} sha256 {}", "✓".green(), decoded.sha256);

    let extractor = ExportExtractor::new(decoded.headers())?;
    println!("{} header row matches the export schema ({} columns)", "✓".green(), decoded.headers().len());

    let mut rows = 0usize;
    let mut violations = 0usize;
    for cells in decoded.rows() {
        rows += 1;
        let row = extractor.row_from_cells(cells);
        let record = extractor.extract(&row)?;
        violations += report_record(rows, &record);
    }

    if rows == 0 {
        println!("{}", "  (no data rows)".dimmed());
    }

    if violations == 0 {
        println!("\n{} {} rows checked, no violations", "✓".green(), rows);
        Ok(true)
    } else {
        println!(
            "\n{} {} rows checked, {} violations",
            "✗".red(),
            rows,
            violations
        );
        Ok(false)
    }
}

fn report_record(row_no: usize, record: &CustomerRecord) -> usize {
    let mut count = 0;

    let id = record
        .vespisti_id
        .as_present()
        .unwrap_or("<unknown>")
        .to_string();

    for violation in validate_formats(record) {
        println!(
            "  {} row {} ({}): {} {:?}: {}",
            "✗".red(),
            row_no,
            id,
            violation.field,
            violation.value,
            violation.reason
        );
        count += 1;
    }

    if let Err(err) = verify_erasure(record) {
        println!("  {} row {} ({}): {}", "✗".red(), row_no, id, err);
        count += 1;
    }

    if let Err(err) = verify_contact_presence(record) {
        println!("  {} row {} ({}): {}", "✗".red(), row_no, id, err);
        count += 1;
    }

    count
}
