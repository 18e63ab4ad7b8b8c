use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::Parser;

pub const DEFAULT_INPUT: &str = "mobile_phone_prices.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "mobile_outputs";
pub const FIGURES_SUBDIR: &str = "figures";
pub const CLEANED_FILE: &str = "cleaned_mobile_data.csv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const DEFAULT_BINS: usize = 10;

// ---------------------------------------------------------------------------
// PipelineConfig – everything the driver needs, passed in explicitly
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub figure_dir: PathBuf,
    /// Histogram bins for the price distribution chart.
    pub bins: usize,
    /// Open the interactive viewer once every stage has run.
    pub show: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let output_dir = PathBuf::from(DEFAULT_OUTPUT_DIR);
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            figure_dir: output_dir.join(FIGURES_SUBDIR),
            output_dir,
            bins: DEFAULT_BINS,
            show: false,
        }
    }
}

impl PipelineConfig {
    /// Where the persister writes the cleaned table.
    pub fn cleaned_path(&self) -> PathBuf {
        self.output_dir.join(CLEANED_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE)
    }
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "mobile-prices")]
#[command(about = "Clean, summarise and chart a table of mobile phone listings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Input file (comma-delimited, header row)
    #[arg(short, long, env = "MOBILE_PRICES_INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory for the cleaned table and summary
    #[arg(short, long, env = "MOBILE_PRICES_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Directory for chart images (defaults to <output-dir>/figures)
    #[arg(long, env = "MOBILE_PRICES_FIGURE_DIR")]
    pub figure_dir: Option<PathBuf>,

    /// Histogram bins for the price distribution
    #[arg(long, env = "MOBILE_PRICES_BINS", default_value_t = DEFAULT_BINS,
          value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub bins: usize,

    /// Show the charts in a window after the run
    #[arg(long, env = "MOBILE_PRICES_SHOW")]
    pub show: bool,
}

impl From<Cli> for PipelineConfig {
    fn from(cli: Cli) -> Self {
        let figure_dir = cli
            .figure_dir
            .unwrap_or_else(|| cli.output_dir.join(FIGURES_SUBDIR));
        PipelineConfig {
            input_path: cli.input,
            output_dir: cli.output_dir,
            figure_dir,
            bins: cli.bins,
            show: cli.show,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<PipelineConfig, clap::Error> {
        let argv = std::iter::once("mobile-prices").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(PipelineConfig::from)
    }

    #[test]
    fn no_flags_gives_fixed_paths() {
        let cfg = parse(&[]).unwrap();
        assert_eq!(cfg, PipelineConfig::default());
        assert_eq!(
            cfg.cleaned_path(),
            PathBuf::from("mobile_outputs/cleaned_mobile_data.csv")
        );
        assert_eq!(cfg.figure_dir, PathBuf::from("mobile_outputs/figures"));
    }

    #[test]
    fn figure_dir_follows_output_dir() {
        let cfg = parse(&["--output-dir", "out", "--input", "phones.csv"]).unwrap();
        assert_eq!(cfg.figure_dir, PathBuf::from("out/figures"));
        assert_eq!(cfg.input_path, PathBuf::from("phones.csv"));

        let cfg = parse(&["--figure-dir", "charts"]).unwrap();
        assert_eq!(cfg.figure_dir, PathBuf::from("charts"));
    }

    #[test]
    fn zero_bins_is_rejected() {
        assert!(parse(&["--bins", "0"]).is_err());
        assert_eq!(parse(&["--bins", "25"]).unwrap().bins, 25);
    }
}
