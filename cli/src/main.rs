//! pdf2word CLI - PDF to Word conversion tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2word::render::{section_to_json, to_json, to_text};
use pdf2word::{
    ConvertOptions, Converter, Error, JsonFormat, LayoutOptions, LopdfBackend, PdfBackend,
    SectionMode,
};

#[derive(Parser)]
#[command(name = "pdf2word")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert PDF documents to Word (.docx) with layout reconstruction", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output .docx file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF to .docx
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to the input name with .docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document password
        #[arg(long, env = "PDF2WORD_PASSWORD")]
        password: Option<String>,

        /// Reconstruct pages in parallel
        #[arg(long)]
        parallel: bool,

        /// Section layout of the output
        #[arg(long, value_enum, default_value = "per-page")]
        sections: SectionLayout,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Dump the reconstructed document model as JSON
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only dump this page (1-indexed)
        #[arg(long)]
        page: Option<u32>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Print reconstructed text instead of JSON
        #[arg(long, conflicts_with = "compact")]
        text: bool,

        /// Document password
        #[arg(long, env = "PDF2WORD_PASSWORD")]
        password: Option<String>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Document password
        #[arg(long, env = "PDF2WORD_PASSWORD")]
        password: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Clone)]
struct LayoutArgs {
    /// Same-line Y tolerance in points
    #[arg(long)]
    line_tolerance: Option<f32>,

    /// Line gap factor that starts a new paragraph
    #[arg(long)]
    paragraph_gap: Option<f32>,

    /// Font size ratio above the page median that marks a heading
    #[arg(long)]
    heading_ratio: Option<f32>,

    /// Detect centered and right-aligned paragraphs
    #[arg(long)]
    detect_alignment: bool,
}

impl LayoutArgs {
    fn to_options(&self) -> LayoutOptions {
        let mut options = LayoutOptions::new().with_alignment_detection(self.detect_alignment);
        if let Some(v) = self.line_tolerance {
            options = options.with_line_tolerance(v);
        }
        if let Some(v) = self.paragraph_gap {
            options = options.with_paragraph_gap_factor(v);
        }
        if let Some(v) = self.heading_ratio {
            options = options.with_heading_ratio(v);
        }
        options
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SectionLayout {
    /// One section per source page
    PerPage,
    /// A single section with page breaks
    Continuous,
}

impl From<SectionLayout> for SectionMode {
    fn from(layout: SectionLayout) -> Self {
        match layout {
            SectionLayout::PerPage => SectionMode::PerPage,
            SectionLayout::Continuous => SectionMode::Continuous,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            password,
            parallel,
            sections,
            layout,
        }) => {
            let mut options = ConvertOptions::new()
                .with_layout(layout.to_options())
                .with_parallel(parallel)
                .with_section_mode(sections.into());
            if let Some(pw) = password {
                options = options.with_password(pw);
            }
            cmd_convert(&input, output.as_deref(), options)
        }
        Some(Commands::Inspect {
            input,
            page,
            compact,
            text,
            password,
            layout,
        }) => {
            let mut options = ConvertOptions::new().with_layout(layout.to_options());
            if let Some(pw) = password {
                options = options.with_password(pw);
            }
            cmd_inspect(&input, page, compact, text, options)
        }
        Some(Commands::Info { input, password }) => cmd_info(&input, password.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), ConvertOptions::default())
            } else {
                println!("{}", "Usage: pdf2word <FILE> [OUTPUT]".yellow());
                println!("       pdf2word --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        if let Some(err) = e.downcast_ref::<Error>() {
            eprintln!("{}", err.guidance().dimmed());
        }
        std::process::exit(1);
    }
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("docx")
}

fn file_name(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    options: ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));
    let data = fs::read(input)?;
    log::debug!("converting {} ({} bytes) to {}", input.display(), data.len(), output.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let converter = Converter::new(options);
    let result = converter.convert_detailed(&data, &file_name(input), |p| {
        pb.set_position(p.percent as u64);
        pb.set_message(p.message.clone());
    });

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            pb.abandon_with_message("Failed".to_string());
            return Err(e.into());
        }
    };

    fs::write(&output, &result.data)?;
    pb.finish_with_message("Done!");

    let stats = &result.stats;
    println!("\n{} {}", "Saved to".green().bold(), output.display());
    println!("  {} {} pages", "├─".dimmed(), stats.page_count);
    println!("  {} {} paragraphs", "├─".dimmed(), stats.paragraph_count);
    println!("  {} {} headings", "├─".dimmed(), stats.heading_count);
    println!("  {} {} list items", "├─".dimmed(), stats.list_item_count);
    if stats.empty_page_count > 0 {
        println!(
            "  {} {}",
            "└─".dimmed(),
            format!("{} pages without extractable text", stats.empty_page_count).yellow()
        );
    } else {
        println!("  {} {} words", "└─".dimmed(), stats.word_count);
    }

    Ok(())
}

fn cmd_inspect(
    input: &Path,
    page: Option<u32>,
    compact: bool,
    text: bool,
    options: ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let doc = Converter::new(options).convert_document(&data, &file_name(input), |_| {})?;

    if text {
        println!("{}", to_text(&doc));
        return Ok(());
    }

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = match page {
        Some(n) => {
            let section = doc
                .get_section(n)
                .ok_or(Error::PageOutOfRange(n, doc.metadata.page_count))?;
            section_to_json(section, format)?
        }
        None => to_json(&doc, format)?,
    };
    println!("{}", json);

    Ok(())
}

fn cmd_info(input: &Path, password: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let backend = LopdfBackend::load_file(input, password)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), backend.version());
    println!("{}: {}", "Pages".bold(), backend.page_count());
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if backend.is_encrypted() { "Yes" } else { "No" }
    );
    if let Some(title) = backend.title() {
        println!("{}: {}", "Title".bold(), title);
    }

    if backend.page_count() > 0 {
        let size = backend.page_viewport(1)?;
        println!(
            "{}: {:.0} x {:.0} pt",
            "Page 1 size".bold(),
            size.width,
            size.height
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf2word".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF to Word conversion tool");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/iyulab/pdf2word".dimmed()
    );
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_extension() {
        assert_eq!(
            default_output(Path::new("docs/report.pdf")),
            PathBuf::from("docs/report.docx")
        );
    }

    #[test]
    fn test_layout_args_override() {
        let args = LayoutArgs {
            line_tolerance: Some(5.0),
            paragraph_gap: None,
            heading_ratio: Some(1.5),
            detect_alignment: true,
        };
        let options = args.to_options();
        assert_eq!(options.line_tolerance, 5.0);
        assert_eq!(options.heading_ratio, 1.5);
        assert_eq!(options.paragraph_gap_factor, 1.4);
        assert!(options.detect_alignment);
    }

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "pdf2word",
            "convert",
            "in.pdf",
            "-o",
            "out.docx",
            "--parallel",
            "--sections",
            "continuous",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Convert {
                parallel, sections, ..
            }) => {
                assert!(parallel);
                assert!(sections == SectionLayout::Continuous);
            }
            _ => panic!("expected convert"),
        }
    }
}
