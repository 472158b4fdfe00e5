use crate::utils::{Aligner, GenomicRegion, Result};
use clap::{ArgAction, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="posom",
          version=&**FULL_VERSION,
          about="Somatic indel calling from tumour/healthy BAM pairs",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Count indel-supporting alignments in the healthy and tumour samples")]
    Extract(ExtractArgs),
    #[clap(about = "Select the posterior threshold and classify somatic calls")]
    Finalize(FinalizeArgs),
}

#[derive(Parser, Debug)]
#[command(arg_required_else_help(true))]
pub struct ExtractArgs {
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "candidates")]
    #[clap(help = "VCF file with candidate somatic indels")]
    #[clap(value_name = "VCF")]
    #[arg(value_parser = check_file_exists)]
    pub candidates_path: PathBuf,

    #[clap(required = true)]
    #[clap(long = "healthy")]
    #[clap(help = "Sorted and indexed BAM file of the healthy/control sample")]
    #[clap(value_name = "HEALTHY_BAM")]
    #[arg(value_parser = check_file_exists)]
    pub healthy_path: PathBuf,

    #[clap(required = true)]
    #[clap(long = "tumour")]
    #[clap(help = "Sorted and indexed BAM file of the tumour/case sample")]
    #[clap(value_name = "TUMOUR_BAM")]
    #[arg(value_parser = check_file_exists)]
    pub tumour_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output observations file (gzip-compressed if it ends in .gz)")]
    #[clap(value_name = "OUTPUT")]
    #[arg(value_parser = check_output_path)]
    pub output_path: PathBuf,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(help_heading("Matching"))]
    #[clap(short = 'a')]
    #[clap(long = "aligner")]
    #[clap(value_name = "ALIGNER")]
    #[clap(help = "Aligner used for the BAM files (bwa or default)")]
    #[clap(default_value = "default")]
    pub aligner: Aligner,

    #[clap(help_heading("Matching"))]
    #[clap(long = "len-tol-del")]
    #[clap(value_name = "BASES")]
    #[clap(help = "Maximum deletion length difference (default aligner)")]
    #[clap(default_value = "20")]
    pub len_tol_del: u32,

    #[clap(help_heading("Matching"))]
    #[clap(long = "len-tol-ins")]
    #[clap(value_name = "BASES")]
    #[clap(help = "Maximum insertion length difference (default aligner)")]
    #[clap(default_value = "20")]
    pub len_tol_ins: u32,

    #[clap(help_heading("Matching"))]
    #[clap(long = "centerpoint-tol-del")]
    #[clap(value_name = "BASES")]
    #[clap(help = "Maximum deletion centerpoint distance (default aligner)")]
    #[clap(default_value = "50")]
    pub centerpoint_tol_del: u32,

    #[clap(help_heading("Matching"))]
    #[clap(long = "centerpoint-tol-ins")]
    #[clap(value_name = "BASES")]
    #[clap(help = "Maximum insertion centerpoint distance (default aligner)")]
    #[clap(default_value = "50")]
    pub centerpoint_tol_ins: u32,

    #[clap(help_heading("Filtering"))]
    #[clap(long = "deletions-only")]
    #[clap(help = "Only process deletions")]
    #[clap(conflicts_with = "insertions_only")]
    pub deletions_only: bool,

    #[clap(help_heading("Filtering"))]
    #[clap(long = "insertions-only")]
    #[clap(help = "Only process insertions")]
    pub insertions_only: bool,

    #[clap(help_heading("Filtering"))]
    #[clap(long = "min-len")]
    #[clap(value_name = "LENGTH")]
    #[clap(help = "Minimum indel length")]
    #[arg(value_parser = positive_length)]
    pub min_len: Option<i64>,

    #[clap(help_heading("Filtering"))]
    #[clap(long = "max-len")]
    #[clap(value_name = "LENGTH")]
    #[clap(help = "Maximum indel length")]
    #[arg(value_parser = positive_length)]
    pub max_len: Option<i64>,

    #[clap(help_heading("Filtering"))]
    #[clap(long = "region")]
    #[clap(value_name = "REGION")]
    #[clap(help = "Only process candidates in this region (chrom:start-end)")]
    #[arg(value_parser = GenomicRegion::from_string)]
    pub region: Option<GenomicRegion>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "search-range")]
    #[clap(value_name = "BASES")]
    #[clap(help = "Bases on either side of a candidate searched for alignments")]
    #[clap(default_value = "5000")]
    pub search_range: u32,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "primary-only")]
    #[clap(help = "Ignore secondary and supplementary alignments")]
    pub primary_only: bool,
}

#[derive(Parser, Debug)]
#[command(arg_required_else_help(true))]
pub struct FinalizeArgs {
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "calls")]
    #[clap(help = "Calls file produced by the somatic caller")]
    #[clap(value_name = "CALLS")]
    #[arg(value_parser = check_file_exists)]
    pub calls_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output file with classified calls")]
    #[clap(value_name = "OUTPUT")]
    #[arg(value_parser = check_output_path)]
    pub output_path: PathBuf,

    #[clap(short = 'b')]
    #[clap(long = "beta")]
    #[clap(value_name = "BETA")]
    #[clap(help = "Beta of the F-score metric (>1 favours recall, <1 precision)")]
    #[clap(default_value = "1.0")]
    #[arg(value_parser = ensure_positive_float)]
    pub beta: f64,

    #[clap(long = "somatic-only")]
    #[clap(help = "Only output calls classified as somatic")]
    pub somatic_only: bool,

    #[clap(help_heading("VCF output"))]
    #[clap(long = "vcf")]
    #[clap(help = "Candidate VCF the calls were made from")]
    #[clap(value_name = "VCF")]
    #[clap(requires = "vcf_output_path")]
    #[arg(value_parser = check_file_exists)]
    pub vcf_path: Option<PathBuf>,

    #[clap(help_heading("VCF output"))]
    #[clap(long = "vcf-output")]
    #[clap(help = "Output VCF with annotated somatic calls")]
    #[clap(value_name = "SOMATIC_VCF")]
    #[clap(requires = "vcf_path")]
    #[arg(value_parser = check_output_path)]
    pub vcf_output_path: Option<PathBuf>,

    #[clap(help_heading("VCF output"))]
    #[clap(short = 's')]
    #[clap(long = "source")]
    #[clap(value_name = "SOURCE")]
    #[clap(help = "Source recorded in the VCF header")]
    #[clap(default_value = "POSOM")]
    pub source: String,
}

/// Log level for the number of `-v` flags given.
fn verbosity_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Cyan,
    }
}

pub fn init_verbose(args: &Cli) {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let mut style = buf.style();
            style.set_color(level_color(record.level()));
            // Worker threads are named posom-<i>; the main thread logs without a tag
            let thread = std::thread::current();
            let tag = thread
                .name()
                .filter(|name| name.starts_with("posom-"))
                .map(|name| format!(" ({})", name))
                .unwrap_or_default();
            writeln!(
                buf,
                "{} [{}]{} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(record.level()),
                tag,
                record.args()
            )
        })
        .filter_level(verbosity_filter(args.verbosity))
        .init();
}

fn check_output_path(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(path.to_path_buf())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn positive_length(s: &str) -> Result<i64> {
    let value: i64 = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid length", s))?;
    if value >= 1 {
        Ok(value)
    } else {
        Err("Length must be at least 1".into())
    }
}

fn ensure_positive_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("The value must be positive, got: {}", value))
    }
}
