use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "web-insight")]
#[command(about = "Scrape a web page, analyze its text and write a PDF report")]
#[command(version)]
pub struct Args {
    /// Page URL to analyze (http or https)
    pub url: String,

    /// Directory for ai_analysis_report.pdf (overrides OUTPUT_DIR)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Optional TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print page and analysis as JSON instead of panels
    #[arg(long)]
    pub json: bool,
}
