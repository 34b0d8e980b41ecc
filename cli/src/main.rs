//! abbyyocr CLI - FineReader OCR XML extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use abbyyocr::{
    parse_file_with_options, Document, ExtractOptions, JsonFormat, PageBreak, PageSelection,
    ParseOptions,
};

#[derive(Parser)]
#[command(name = "abbyyocr")]
#[command(version)]
#[command(about = "Extract text and structure from ABBYY FineReader OCR XML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the full text of an export
    Text {
        /// Input FineReader XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Separate pages with a form feed instead of a blank line
        #[arg(long)]
        form_feed: bool,

        /// Text placed between the cells of a table row
        #[arg(long, value_name = "SEP", env = "ABBYYOCR_CELL_SEPARATOR")]
        cell_separator: Option<String>,

        /// Skip malformed nodes instead of failing
        #[arg(long)]
        lenient: bool,

        /// Render pages on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Convert an export to JSON
    Json {
        /// Input FineReader XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Skip malformed nodes instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Show document information
    Info {
        /// Input FineReader XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract text from every export in a directory
    Batch {
        /// Directory containing FineReader XML files
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (defaults to the input directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Separate pages with a form feed instead of a blank line
        #[arg(long)]
        form_feed: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Text {
            input,
            output,
            pages,
            form_feed,
            cell_separator,
            lenient,
            sequential,
        }) => cmd_text(
            &input,
            output.as_deref(),
            pages.as_deref(),
            form_feed,
            cell_separator,
            lenient,
            sequential,
        ),
        Some(Commands::Json {
            input,
            output,
            compact,
            lenient,
        }) => cmd_json(&input, output.as_deref(), compact, lenient),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Batch {
            input,
            output,
            form_feed,
        }) => cmd_batch(&input, output.as_deref(), form_feed),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: abbyyocr <COMMAND> <FILE>".yellow());
            println!("       abbyyocr --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_options(lenient: bool) -> ParseOptions {
    if lenient {
        ParseOptions::new().lenient()
    } else {
        ParseOptions::new()
    }
}

fn page_break(form_feed: bool) -> PageBreak {
    if form_feed {
        PageBreak::FormFeed
    } else {
        PageBreak::BlankLine
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    form_feed: bool,
    cell_separator: Option<String>,
    lenient: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let page_selection = match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };

    let doc = parse_file_with_options(input, parse_options(lenient))?;
    warn_on_mismatch(&doc);

    let mut options = ExtractOptions::new()
        .with_pages(page_selection)
        .with_page_break(page_break(form_feed))
        .with_parallel(!sequential);
    if let Some(sep) = cell_separator {
        options = options.with_cell_separator(sep);
    }

    let text = abbyyocr::render::to_text(&doc, &options)?;
    write_output(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, parse_options(lenient))?;
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let mut json = abbyyocr::render::to_json(&doc, format)?;
    json.push('\n');
    write_output(output, &json)
}

fn warn_on_mismatch(doc: &Document) {
    if let Some(mismatch) = doc.structural_mismatch() {
        eprintln!("{}: {}", "Warning".yellow().bold(), mismatch);
    }
}

fn cmd_info(input: &Path, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Show whatever survives even if some nodes are malformed
    let doc = parse_file_with_options(input, ParseOptions::new().lenient())?;

    if as_json {
        let pages: Vec<_> = doc
            .pages
            .iter()
            .map(|p| {
                serde_json::json!({
                    "number": p.number,
                    "width": p.width,
                    "height": p.height,
                    "resolution": p.resolution,
                    "blocks": p.block_count(),
                })
            })
            .collect();
        let summary = serde_json::json!({
            "file": input.display().to_string(),
            "variant": doc.variant,
            "page_count": doc.page_count,
            "parsed_pages": doc.parsed_page_count(),
            "language": doc.language,
            "languages": doc.languages,
            "producer": doc.producer,
            "pages": pages,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Schema".bold(), doc.variant);
    println!("{}: {}", "Pages".bold(), doc.page_count);
    println!("{}: {}", "Parsed pages".bold(), doc.parsed_page_count());
    if let Some(ref language) = doc.language {
        println!("{}: {}", "Language".bold(), language);
    }
    if let Some(ref languages) = doc.languages {
        println!("{}: {}", "Languages".bold(), languages);
    }
    if let Some(ref producer) = doc.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    warn_on_mismatch(&doc);

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in &doc.pages {
        println!(
            "  {:>4}  {}x{} @ {} dpi  {} blocks ({} text, {} table, {} picture)  {} lines",
            page.number,
            page.width,
            page.height,
            page.resolution,
            page.block_count(),
            page.text_blocks().len(),
            page.table_blocks().len(),
            page.picture_blocks().len(),
            page.lines().count(),
        );
    }

    Ok(())
}

fn is_xml_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("xml"))
            .unwrap_or(false)
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    form_feed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.unwrap_or(input).to_path_buf();
    fs::create_dir_all(&output_dir)?;

    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_xml_file(path))
        .collect();
    files.sort();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let options = ExtractOptions::new().with_page_break(page_break(form_feed));
    let mut failed = Vec::new();

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name.clone());

        let result = parse_file_with_options(path, ParseOptions::new().lenient())
            .and_then(|doc| abbyyocr::render::to_text(&doc, &options));
        match result {
            Ok(text) => {
                let mut target = output_dir.join(&name);
                target.set_extension("txt");
                fs::write(&target, text)?;
            }
            Err(e) => {
                log::warn!("Failed to extract {}: {}", path.display(), e);
                failed.push((name, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} exports extracted to {}",
        "Done!".green().bold(),
        files.len() - failed.len(),
        files.len(),
        output_dir.display()
    );
    for (name, e) in &failed {
        println!("  {} {}: {}", "✗".red(), name, e);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "abbyyocr".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("FineReader 6 (schema v1) and FineReader 8 (schema v2) OCR XML");
}
