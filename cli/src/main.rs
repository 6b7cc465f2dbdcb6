//! xlfill CLI - fill Excel templates from the command line
//!
//! Renders `.xlsx` templates with text and image placeholders.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xlfill::{Placeholder, PlaceholderToken, RenderOptions, Renderer, TemplateData};

/// Fill Excel templates with text and images
#[derive(Parser)]
#[command(
    name = "xlfill",
    author = "iyulab",
    version,
    about = "Fill Excel templates with text and images",
    long_about = "xlfill - Excel template filler.\n\n\
                  Replaces ${NAME} placeholders with text and ${NAME:WxH} cells with images."
)]
struct Cli {
    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template to a new workbook
    Render {
        /// Template file path
        template: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// JSON file with a flat object of placeholder values
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Text value (KEY=VALUE), may be repeated
        #[arg(long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,

        /// Image file for an image placeholder (KEY=PATH), may be repeated
        #[arg(long = "image", value_name = "KEY=PATH")]
        images: Vec<String>,

        /// Declare embedded images by their detected format instead of JPEG
        #[arg(long)]
        detect_image_format: bool,

        /// Pixel density for image sizes
        #[arg(long, default_value = "72")]
        dpi: u32,
    },

    /// List the placeholders in a template
    #[command(visible_alias = "ls")]
    Placeholders {
        /// Template file path
        template: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Render {
            template,
            output,
            data,
            values,
            images,
            detect_image_format,
            dpi,
        } => {
            let mut template_data = match data {
                Some(path) => load_data_file(&path)?,
                None => TemplateData::new(),
            };
            for pair in &values {
                let (key, value) = split_pair(pair)?;
                template_data.insert(key, value);
            }
            for pair in &images {
                let (key, path) = split_pair(pair)?;
                let bytes = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
                template_data.insert(key, bytes);
            }

            let pb = create_spinner("Rendering template...");

            let options = RenderOptions::new()
                .with_detect_image_format(detect_image_format)
                .with_pixels_per_inch(dpi);
            let rendered = Renderer::with_options(options).render(&template, &mut template_data)?;

            pb.set_message("Writing output...");
            fs::write(&output, rendered)?;
            pb.finish_and_clear();

            println!(
                "{} Rendered {} to {}",
                "✓".green().bold(),
                template.display(),
                output.display()
            );
        }

        Commands::Placeholders { template, json } => {
            let placeholders = xlfill::inspect_template(&template)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&placeholders)?);
            } else {
                print_placeholders(&template, &placeholders);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Read a flat JSON object of strings, numbers and booleans.
fn load_data_file(path: &Path) -> Result<TemplateData, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let serde_json::Value::Object(map) = value else {
        return Err(xlfill::Error::InvalidData("data file must hold a JSON object".into()).into());
    };

    let mut data = TemplateData::new();
    for (key, value) in map {
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Null => String::new(),
            _ => {
                return Err(xlfill::Error::InvalidData(format!(
                    "value of '{key}' must be a string, number or boolean"
                ))
                .into())
            }
        };
        data.insert(key, text);
    }
    Ok(data)
}

fn split_pair(pair: &str) -> Result<(&str, &str), xlfill::Error> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(xlfill::Error::InvalidData(format!(
            "expected KEY=VALUE, got '{pair}'"
        ))),
    }
}

fn print_placeholders(template: &Path, placeholders: &[Placeholder]) {
    println!("{}", "Template Placeholders".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        template.file_name().unwrap_or_default().to_string_lossy()
    );

    if placeholders.is_empty() {
        println!("{} No placeholders found", "!".yellow().bold());
        return;
    }

    for placeholder in placeholders {
        match &placeholder.token {
            PlaceholderToken::Text { name } => {
                println!("  [{:>4}] {} {}", placeholder.index, "text ".blue(), name);
            }
            PlaceholderToken::Image { key, params, size } => {
                let size = match size {
                    Some(size) => size.to_string(),
                    None => format!("{} (invalid size)", params.join(":")).red().to_string(),
                };
                println!(
                    "  [{:>4}] {} {} {}",
                    placeholder.index,
                    "image".magenta(),
                    key,
                    size
                );
            }
        }
    }
    println!("{}: {}", "Total".bold(), placeholders.len());
}

fn print_version() {
    println!("{} {}", "xlfill".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Excel template filler");
    println!();
    println!("Supported formats: XLSX, XLSM, XLTX, XLTM");
    println!("Repository: https://github.com/iyulab/xlfill");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
