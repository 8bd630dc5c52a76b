//! metsocr CLI - OCR post-processing for METS documents

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use metsocr::render::{self, naming, DocumentRecord, JsonFormat};
use metsocr::{
    clean_text, document_paths, parse_manifest_file_with_options, AggregateOptions, CleanOptions,
    CommandEngine, DocumentAggregator, FilterStats, Manifest, MissingImagePolicy, OcrEngine,
    PageResult, ParseOptions, SidecarEngine, TextCleaner, DEFAULT_IMAGE_EXTENSIONS, IMAGES_DIR, MANIFEST_FILE,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "metsocr")]
#[command(version)]
#[command(about = "OCR METS-described documents and filter scan artifacts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run OCR over a document directory (mets.xml + images/)
    Process {
        /// Document directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output directory (default: results/mets_<id>_<timestamp>)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// OCR command, `{image}` is replaced by the image path
        #[arg(long, env = "METSOCR_ENGINE", value_name = "CMD")]
        engine_cmd: Option<String>,

        /// Read precomputed transcripts from a directory instead of running OCR
        /// (takes precedence over --engine-cmd)
        #[arg(long, value_name = "DIR")]
        sidecar: Option<PathBuf>,

        /// Worker threads (0 = one per CPU)
        #[arg(long, env = "METSOCR_THREADS", default_value_t = 0)]
        threads: usize,

        /// Process pages one after another
        #[arg(long)]
        sequential: bool,

        /// Skip malformed page nodes in the manifest
        #[arg(long)]
        lenient: bool,

        /// Record pages without an image as failed instead of omitting them
        #[arg(long)]
        record_missing: bool,

        /// Collapse runs of blank lines in cleaned text
        #[arg(long)]
        collapse_blank_lines: bool,

        /// Normalize text to NFC before cleaning
        #[arg(long)]
        normalize_unicode: bool,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Re-apply the artifact filter to an existing OCR record
    Clean {
        /// OCR record (<id>_ocr.json)
        #[arg(value_name = "JSON")]
        input: PathBuf,

        /// Collapse runs of blank lines in cleaned text
        #[arg(long)]
        collapse_blank_lines: bool,
    },

    /// Filter artifacts from a text file and show statistics
    Filter {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file for the cleaned text (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Collapse runs of blank lines
        #[arg(long)]
        collapse_blank_lines: bool,
    },

    /// Show manifest information
    Info {
        /// Document directory or mets.xml file
        #[arg(value_name = "PATH")]
        input: PathBuf,

        /// Print the parsed manifest as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

struct ProcessArgs {
    dir: PathBuf,
    output: Option<PathBuf>,
    engine_cmd: Option<String>,
    sidecar: Option<PathBuf>,
    threads: usize,
    sequential: bool,
    lenient: bool,
    record_missing: bool,
    collapse_blank_lines: bool,
    normalize_unicode: bool,
    compact: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            dir,
            output,
            engine_cmd,
            sidecar,
            threads,
            sequential,
            lenient,
            record_missing,
            collapse_blank_lines,
            normalize_unicode,
            compact,
        } => cmd_process(ProcessArgs {
            dir,
            output,
            engine_cmd,
            sidecar,
            threads,
            sequential,
            lenient,
            record_missing,
            collapse_blank_lines,
            normalize_unicode,
            compact,
        }),
        Commands::Clean {
            input,
            collapse_blank_lines,
        } => cmd_clean(&input, collapse_blank_lines),
        Commands::Filter {
            input,
            output,
            collapse_blank_lines,
        } => cmd_filter(&input, output.as_deref(), collapse_blank_lines),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_engine(
    engine_cmd: Option<&str>,
    sidecar: Option<&Path>,
) -> Result<Box<dyn OcrEngine>, Box<dyn std::error::Error>> {
    if let Some(dir) = sidecar {
        return Ok(Box::new(SidecarEngine::new(dir)));
    }

    match engine_cmd.and_then(CommandEngine::parse) {
        Some(engine) => Ok(Box::new(engine)),
        None => Err(
            "no OCR engine configured (use --engine-cmd, METSOCR_ENGINE or --sidecar)".into(),
        ),
    }
}

fn cmd_process(args: ProcessArgs) -> CliResult {
    let engine = build_engine(args.engine_cmd.as_deref(), args.sidecar.as_deref())?;

    let parse_options = if args.lenient {
        ParseOptions::new().lenient()
    } else {
        ParseOptions::new()
    };
    let (manifest_path, images_dir) = document_paths(&args.dir)?;
    let manifest = parse_manifest_file_with_options(&manifest_path, parse_options)?;

    let object_id = naming::object_id(&args.dir);
    let title = manifest.metadata.title.clone().unwrap_or_else(|| "N/A".to_string());

    println!("{}", "METS OCR".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Document".bold(), title);
    println!("{}: {}", "Object".bold(), object_id);
    println!("{}: {}", "Pages".bold(), manifest.page_count());
    println!("{}: {}", "Engine".bold(), engine.name());
    println!();

    let mut options = AggregateOptions::new()
        .with_threads(args.threads)
        .with_clean_options(
            CleanOptions::new()
                .with_preserve_structure(!args.collapse_blank_lines)
                .with_unicode_normalization(args.normalize_unicode),
        );
    if args.sequential {
        options = options.sequential();
    }
    if args.record_missing {
        options = options.record_missing_images();
    }

    let pb = ProgressBar::new(expected_pages(&manifest, &images_dir, &options) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("template is compile-time constant")
            .progress_chars("#>-"),
    );

    let doc = DocumentAggregator::new(options).aggregate_with_progress(
        manifest,
        &images_dir,
        engine.as_ref(),
        |page: &PageResult| {
            pb.set_message(page.file_id.clone());
            pb.inc(1);
        },
    )?;
    pb.finish_with_message("Done!");

    let output_dir = match args.output {
        Some(dir) => dir,
        None => {
            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
            naming::default_output_dir(Path::new("."), &object_id, &timestamp)
        }
    };
    fs::create_dir_all(&output_dir)?;
    log::debug!("Writing results to {}", output_dir.display());

    let format = if args.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let record = DocumentRecord::from(&doc);
    let json_name = naming::json_file_name(&object_id, false);
    let text_name = naming::text_file_name(&object_id, false);
    fs::write(output_dir.join(&json_name), render::to_json(&record, format)?)?;
    fs::write(output_dir.join(&text_name), render::to_text(&record))?;

    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), doc.total_pages());
    println!("{}: {}", "Successful".bold(), doc.successful_count().to_string().green());
    if doc.failed_count() > 0 {
        println!("{}: {}", "Failed".bold(), doc.failed_count().to_string().red());
        for page in doc.pages().iter().filter(|p| !p.is_success()) {
            println!(
                "  {} page {}: {}",
                "✗".red(),
                page.order,
                page.error().unwrap_or_default()
            );
        }
    } else {
        println!("{}: 0", "Failed".bold());
    }
    println!("{}: {}", "Filtered chars".bold(), doc.filtered_total());
    println!("{}: {:.1}s", "OCR time".bold(), doc.elapsed_total());

    println!("\n{} {}", "Output files:".green().bold(), output_dir.display());
    println!("  {} {}", "├─".dimmed(), json_name);
    println!("  {} {}", "└─".dimmed(), text_name);

    Ok(())
}

/// Number of pages the aggregator will report, given its missing-image policy.
fn expected_pages(manifest: &Manifest, images_dir: &Path, options: &AggregateOptions) -> usize {
    match options.missing_image {
        MissingImagePolicy::RecordFailure => manifest.page_count(),
        MissingImagePolicy::Omit => manifest
            .pages
            .iter()
            .filter(|p| metsocr::locate_image(images_dir, &p.file_id, &options.extensions).is_some())
            .count(),
    }
}

fn cmd_clean(input: &Path, collapse_blank_lines: bool) -> CliResult {
    if !input.is_file() {
        return Err(format!("File not found: {}", input.display()).into());
    }

    let record = DocumentRecord::read(input)?;

    println!("{}", "Cleaning OCR results".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Input".bold(), input.display());
    println!("{}: {}", "Document".bold(), record.title().unwrap_or("N/A"));
    println!("{}: {}", "Pages".bold(), record.total_pages);
    println!();

    let cleaner =
        TextCleaner::new(CleanOptions::new().with_preserve_structure(!collapse_blank_lines));
    let originals: Vec<Option<String>> = record.pages.iter().map(|p| p.text.clone()).collect();
    let cleaned = record.recleaned(&cleaner);
    let mut total = FilterStats::default();

    for (page, original_text) in cleaned.pages.iter().zip(&originals) {
        if let (Some(before), Some(after)) = (original_text, &page.text) {
            total.merge(&FilterStats::compute(before, after));
        }

        let original = page.original_characters.unwrap_or(0);
        let kept = page.cleaned_characters.unwrap_or(0);
        let filtered = page.filtered.unwrap_or(0);

        if filtered > 0 {
            let percent = if original > 0 {
                filtered as f64 / original as f64 * 100.0
            } else {
                0.0
            };
            println!(
                "Page {}: {} → {} chars ({} filtered, {:.1}%)",
                page.page, original, kept, filtered, percent
            );
        } else {
            println!("Page {}: {} chars (no filtering)", page.page, kept);
        }
    }

    println!();
    println!("{}", "Total".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", total);
    println!("Removed share:   {:.1}%", total.removed_percent());

    let (json_path, text_path) = naming::cleaned_paths(input);
    fs::write(&json_path, render::to_json(&cleaned, JsonFormat::Pretty)?)?;
    fs::write(&text_path, render::to_text(&cleaned))?;

    println!("\n{}", "Cleaning complete".green().bold());
    println!("  {} {}", "├─".dimmed(), json_path.display());
    println!("  {} {}", "└─".dimmed(), text_path.display());

    Ok(())
}

fn cmd_filter(input: &Path, output: Option<&Path>, collapse_blank_lines: bool) -> CliResult {
    let original = fs::read_to_string(input)?;
    let cleaned = clean_text(&original, !collapse_blank_lines);
    let stats = FilterStats::compute(&original, &cleaned);

    eprintln!("{}", "Filtering statistics".cyan().bold());
    eprintln!("{}", "─".repeat(40).dimmed());
    eprintln!("{}", stats);
    eprintln!("Removed share:   {:.1}%", stats.removed_percent());

    if let Some(path) = output {
        fs::write(path, &cleaned)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", cleaned);
    }

    Ok(())
}

/// Resolve a document directory or manifest path to the manifest file.
fn resolve_manifest(input: &Path) -> PathBuf {
    if input.is_dir() {
        input.join(MANIFEST_FILE)
    } else {
        input.to_path_buf()
    }
}

fn count_images(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    metsocr::detect::has_image_extension(&entry.path(), DEFAULT_IMAGE_EXTENSIONS)
                })
                .count()
        })
        .unwrap_or(0)
}

fn cmd_info(input: &Path, json: bool) -> CliResult {
    let manifest_path = resolve_manifest(input);
    let manifest = parse_manifest_file_with_options(&manifest_path, ParseOptions::new().lenient())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }
    let metadata = &manifest.metadata;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Manifest".bold(), manifest_path.display());

    let fields = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Signature", &metadata.signature),
        ("Language", &metadata.language),
        ("Owner", &metadata.owner),
        ("URN", &metadata.urn),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label.bold(), value);
        }
    }

    println!();
    println!("{}", "Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), manifest.page_count());
    println!("{}: {}", "Logical sections".bold(), manifest.logical_sections.len());
    println!("{}: {}", "Links".bold(), manifest.logical_to_physical.link_count());
    for section in &manifest.logical_sections {
        let orders = section_pages(&manifest, &section.id);
        if !orders.is_empty() {
            let orders: Vec<String> = orders.iter().map(u32::to_string).collect();
            println!(
                "  {} {} ({}): pages {}",
                "•".dimmed(),
                section.id,
                section.section_type,
                orders.join(", ")
            );
        }
    }

    let images_dir = manifest_path
        .parent()
        .map(|parent| parent.join(IMAGES_DIR))
        .filter(|dir| dir.is_dir());

    if let Some(images_dir) = images_dir {
        let located = manifest
            .pages
            .iter()
            .filter(|p| {
                metsocr::locate_image(&images_dir, &p.file_id, DEFAULT_IMAGE_EXTENSIONS).is_some()
            })
            .count();
        println!("{}: {}", "Image files".bold(), count_images(&images_dir));
        println!(
            "{}: {}/{}",
            "Pages with image".bold(),
            located,
            manifest.page_count()
        );
    } else {
        println!("{}: {}", "Images".bold(), "no images/ directory".yellow());
    }

    Ok(())
}

/// Page orders linked to a logical section.
fn section_pages(manifest: &Manifest, section_id: &str) -> Vec<u32> {
    manifest
        .logical_to_physical
        .get(section_id)
        .unwrap_or_default()
        .iter()
        .filter_map(|physical_id| manifest.page(physical_id))
        .map(|page| page.order)
        .collect()
}

fn cmd_version() {
    println!("{} {}", "metsocr".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("OCR post-processing for METS-described documents");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_manifest(dir.path()), dir.path().join("mets.xml"));

        let file = dir.path().join("other.xml");
        fs::write(&file, "<mets/>").unwrap();
        assert_eq!(resolve_manifest(&file), file);
    }

    #[test]
    fn test_count_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("IMG.1.jpg"), b"jpeg").unwrap();
        fs::write(dir.path().join("IMG.2.TIF"), b"tiff").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        assert_eq!(count_images(dir.path()), 2);
        assert_eq!(count_images(&dir.path().join("missing")), 0);
    }

    #[test]
    fn test_build_engine_requires_source() {
        assert!(build_engine(None, None).is_err());
        assert!(build_engine(Some("   "), None).is_err());

        let engine = build_engine(Some("tesseract {image} -"), None).unwrap();
        assert_eq!(engine.name(), "tesseract");

        let engine = build_engine(None, Some(Path::new("transcripts"))).unwrap();
        assert_eq!(engine.name(), "sidecar");
    }

    #[test]
    fn test_cli_parses_process() {
        let cli = Cli::try_parse_from([
            "metsocr",
            "process",
            "o_szd.151",
            "--engine-cmd",
            "cat",
            "--threads",
            "2",
            "--record-missing",
        ])
        .unwrap();

        match cli.command {
            Commands::Process {
                dir,
                threads,
                record_missing,
                engine_cmd,
                ..
            } => {
                assert_eq!(dir, PathBuf::from("o_szd.151"));
                assert_eq!(threads, 2);
                assert!(record_missing);
                assert_eq!(engine_cmd.as_deref(), Some("cat"));
            }
            _ => panic!("expected process command"),
        }
    }

    #[test]
    fn test_sidecar_overrides_engine_env() {
        std::env::set_var("METSOCR_ENGINE", "tesseract {image} -");
        let cli = Cli::try_parse_from(["metsocr", "process", "doc", "--sidecar", "transcripts"])
            .unwrap();
        std::env::remove_var("METSOCR_ENGINE");

        match cli.command {
            Commands::Process {
                engine_cmd,
                sidecar,
                ..
            } => {
                assert_eq!(engine_cmd.as_deref(), Some("tesseract {image} -"));
                let engine = build_engine(engine_cmd.as_deref(), sidecar.as_deref()).unwrap();
                assert_eq!(engine.name(), "sidecar");
            }
            _ => panic!("expected process command"),
        }
    }

    fn fixture_manifest() -> Manifest {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/fixtures/mets.xml");
        metsocr::parse_manifest_file(path).unwrap()
    }

    #[test]
    fn test_section_pages() {
        let manifest = fixture_manifest();
        assert_eq!(section_pages(&manifest, "U.2"), vec![3]);
        assert!(section_pages(&manifest, "LOG_UNKNOWN").is_empty());
    }

    #[test]
    fn test_expected_pages_follows_policy() {
        let manifest = fixture_manifest();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("IMG.1.jpg"), b"jpeg").unwrap();
        fs::write(dir.path().join("IMG.3.png"), b"png").unwrap();

        let omit = AggregateOptions::new();
        assert_eq!(expected_pages(&manifest, dir.path(), &omit), 2);

        let record = AggregateOptions::new().record_missing_images();
        assert_eq!(expected_pages(&manifest, dir.path(), &record), 3);
    }
}
