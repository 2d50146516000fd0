//! docpage CLI - DOCX/PDF to page-builder JSON converter

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docpage::convert::{IMAGES_DIR, PAGE_JSON};
use docpage::render::{to_json, to_json_value, TreeBuilder};
use docpage::{
    parse_nodes_json, validate_tree_json, ConversionStats, ConvertOptions, ConverterRegistry,
    DistributionStrategy, JsonFormat, LayoutRegistry, ParseOptions, DEFAULT_LAYOUT,
};

#[derive(Parser)]
#[command(name = "docpage")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert DOCX and PDF documents into page-builder JSON", long_about = None)]
struct Cli {
    /// Input DOCX or PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to page.json plus an images/ folder
    Convert {
        /// Input DOCX or PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Print or save the tree JSON only
    Json {
        /// Input DOCX or PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Skip image extraction (image widgets get placeholders)
        #[arg(long)]
        no_images: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Build a tree from a JSON array of content nodes
    Build {
        /// Node JSON file
        #[arg(value_name = "NODES")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Check a tree JSON file before import
    Validate {
        /// Tree JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show element statistics
        #[arg(long)]
        stats: bool,
    },

    /// List layouts, strategies and templates
    Layouts,

    /// Show document information
    Info {
        /// Input DOCX or PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert many documents, one output folder each
    Batch {
        /// Input files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output root directory
        #[arg(short, long, value_name = "DIR", default_value = "docpage_output")]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show version information
    Version,
}

/// Layout and rendering flags shared by the converting commands.
#[derive(Args, Clone)]
struct LayoutArgs {
    /// Layout name (see `docpage layouts`)
    #[arg(short, long, default_value = DEFAULT_LAYOUT)]
    layout: String,

    /// Distribution strategy
    #[arg(short, long, value_enum, default_value = "auto")]
    strategy: StrategyArg,

    /// Template (overrides layout and strategy)
    #[arg(short, long)]
    template: Option<String>,

    /// Public URL the images/ folder will be served from
    #[arg(long, env = "DOCPAGE_BASE_URL")]
    base_url: Option<String>,

    /// Page title
    #[arg(long)]
    title: Option<String>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

impl LayoutArgs {
    fn to_options(&self, layouts: &LayoutRegistry) -> ConvertOptions {
        let mut options = ConvertOptions::new()
            .with_layout(&self.layout)
            .with_strategy(self.strategy.into())
            .with_format(if self.compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            });

        if let Some(ref template) = self.template {
            options = options.with_template(template, layouts);
        }
        if let Some(ref url) = self.base_url {
            options = options.with_base_url(url);
        }
        if let Some(ref title) = self.title {
            options.tree = options.tree.with_title(title);
        }
        if layouts.get(&options.layout).is_none() {
            eprintln!(
                "{} unknown layout '{}', using {}",
                "Warning:".yellow(),
                options.layout,
                DEFAULT_LAYOUT
            );
        }
        options
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Title and introduction in the main column, the rest balanced
    Auto,
    /// Fill columns one after another
    Sequential,
    /// Round-robin across columns
    Alternating,
    /// Same number of elements per column
    Balanced,
}

impl From<StrategyArg> for DistributionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => DistributionStrategy::Auto,
            StrategyArg::Sequential => DistributionStrategy::Sequential,
            StrategyArg::Alternating => DistributionStrategy::Alternating,
            StrategyArg::Balanced => DistributionStrategy::Balanced,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            layout,
        }) => cmd_convert(&input, output.as_deref(), &layout),
        Some(Commands::Json {
            input,
            output,
            no_images,
            layout,
        }) => cmd_json(&input, output.as_deref(), no_images, &layout),
        Some(Commands::Build {
            input,
            output,
            layout,
        }) => cmd_build(&input, output.as_deref(), &layout),
        Some(Commands::Validate { input, stats }) => cmd_validate(&input, stats),
        Some(Commands::Layouts) => {
            cmd_layouts();
            Ok(())
        }
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Batch {
            inputs,
            output,
            layout,
        }) => cmd_batch(&inputs, &output, &layout),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &cli.layout)
            } else {
                println!("{}", "Usage: docpage <FILE> [OUTPUT]".yellow());
                println!("       docpage --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    args: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let registry = ConverterRegistry::with_defaults();
    let options = args
        .to_options(registry.layouts())
        .with_image_dir(output_dir.join(IMAGES_DIR))
        .with_stats(true);
    log::debug!(
        "layout={} strategy={} output={}",
        options.layout,
        options.strategy,
        output_dir.display()
    );

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Extracting structure and images...");
    let document = registry.extract(input, &options.parse)?;
    pb.inc(1);

    pb.set_message("Building page tree...");
    let tree = registry.build_tree(&document, &options);
    let json = to_json(&tree, options.json_format)?;
    pb.inc(1);

    pb.set_message("Writing page.json...");
    fs::write(output_dir.join(PAGE_JSON), &json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    let stats = ConversionStats::from_document(&document);
    println!("\n{}", "Output files:".green().bold());
    println!("  {} {}", "├─".dimmed(), PAGE_JSON);
    println!(
        "  {} {}/ ({} images)",
        "└─".dimmed(),
        IMAGES_DIR,
        stats.resolved_image_count
    );
    println!();
    println!(
        "{} {} nodes ({} headings, {} paragraphs, {} images) in {} columns",
        "Converted".green(),
        stats.node_count,
        stats.heading_count,
        stats.paragraph_count,
        stats.image_count,
        tree.column_count()
    );
    if stats.unresolved_image_count() > 0 {
        println!(
            "{} {} images could not be decoded and use placeholders",
            "Note:".yellow(),
            stats.unresolved_image_count()
        );
    }
    if options.tree.base_media_url.is_none() && stats.image_count > 0 {
        println!(
            "{} no --base-url given; upload images/ and rerun with it to fill image URLs",
            "Note:".yellow()
        );
    }

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    no_images: bool,
    args: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ConverterRegistry::with_defaults();
    let mut options = args.to_options(registry.layouts());
    if no_images {
        options.parse = options.parse.without_images();
    }

    let result = registry.convert(input, &options)?;
    if !no_images && !result.document.images.is_empty() {
        eprintln!(
            "{} images written to {}",
            "Note:".yellow(),
            result.image_dir().display()
        );
    }

    write_or_print(output, &result.content)
}

fn cmd_build(
    input: &Path,
    output: Option<&Path>,
    args: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let layouts = LayoutRegistry::builtin();
    let options = args.to_options(&layouts);

    let nodes = parse_nodes_json(&fs::read_to_string(input)?)?;
    if nodes.is_empty() {
        return Err(docpage::Error::EmptyDocument.into());
    }

    let layout = layouts.resolve(&options.layout);
    let tree = TreeBuilder::new(options.tree.clone()).build_from_nodes(
        &nodes,
        &BTreeMap::new(),
        &layout,
        options.strategy,
        None,
    );

    write_or_print(output, &to_json(&tree, options.json_format)?)
}

fn cmd_validate(input: &Path, show_stats: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("{} {}", "Validating".cyan(), input.display());
    println!("{}", "─".repeat(40).dimmed());

    let report = validate_tree_json(&fs::read_to_string(input)?);

    for error in &report.errors {
        println!("  {} {}", "error:".red().bold(), error);
    }
    for warning in &report.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }

    if show_stats {
        println!();
        println!("{}: {}", "Sections".bold(), report.stats.section_count);
        println!("{}: {}", "Widgets".bold(), report.stats.widget_count);
        for (widget_type, count) in &report.stats.widget_types {
            println!("  - {}: {}", widget_type, count);
        }
    }

    println!("{}", "─".repeat(40).dimmed());
    if report.is_valid() {
        println!("{}", "Valid: ready for import".green().bold());
        Ok(())
    } else {
        Err(format!("{} validation errors", report.errors.len()).into())
    }
}

fn cmd_layouts() {
    let registry = LayoutRegistry::builtin();

    println!("{}", "Layouts".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for layout in registry.layouts() {
        println!(
            "  {:<28} {:<12} {}",
            layout.name.bold(),
            layout.width_summary(),
            layout.description.dimmed()
        );
    }

    println!();
    println!("{}", "Strategies".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for strategy in DistributionStrategy::ALL {
        println!(
            "  {:<28} {}",
            strategy.name().bold(),
            strategy.description().dimmed()
        );
    }

    println!();
    println!("{}", "Templates".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for template in registry.templates() {
        println!(
            "  {:<28} {} + {}",
            template.name.bold(),
            template.layout,
            template.strategy
        );
    }
}

fn cmd_info(input: &Path, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let format = docpage::detect_format_from_path(input)?;

    // Structure only; nothing is written to disk.
    let options = ParseOptions::new().without_images();
    let document = ConverterRegistry::with_defaults().extract(input, &options)?;
    let stats = ConversionStats::from_document(&document);

    if as_json {
        println!("{}", to_json_value(&stats, JsonFormat::Pretty)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    if let Some(pages) = document.metadata.page_count {
        println!("{}: {}", "Pages".bold(), pages);
    }
    if let Some(ref title) = document.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Nodes".bold(), stats.node_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_root: &Path,
    args: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ConverterRegistry::with_defaults();
    let options = args.to_options(registry.layouts());
    log::debug!("Batch of {} documents into {}", inputs.len(), output_root.display());

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Converting {} documents...", inputs.len()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let items = registry.convert_batch(inputs, &options, output_root);
    pb.finish_and_clear();

    let mut failed = 0;
    for item in &items {
        match &item.result {
            Ok(result) => println!(
                "{} {} -> {} ({} widgets)",
                "OK".green().bold(),
                item.path.display(),
                item.output_dir.display(),
                result.tree.widget_count()
            ),
            Err(e) => {
                failed += 1;
                println!("{} {}: {}", "FAIL".red().bold(), item.path.display(), e);
            }
        }
    }

    println!(
        "\n{} {} converted, {} failed",
        "Done!".green().bold(),
        items.len() - failed,
        failed
    );

    if failed > 0 {
        Err(format!("{} of {} documents failed", failed, items.len()).into())
    } else {
        Ok(())
    }
}

fn cmd_version() {
    println!("{} {}", "docpage".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("DOCX/PDF to page-builder JSON converter");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docpage".dimmed());
    println!("License: MIT");
}
