//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use wms_core::Platform;
use wms_observability::LogFormat;

pub const DEFAULT_CATALOG: &str = "WMS-04-02.xlsx";

#[derive(Debug, Parser)]
#[command(name = "wms")]
#[command(about = "Map marketplace sales exports onto master SKUs and project stock")]
#[command(version)]
pub struct Cli {
    /// Master workbook with inventory, mapping and combo sheets
    #[arg(long, global = true, env = "WMS_CATALOG", default_value = DEFAULT_CATALOG)]
    pub catalog: PathBuf,

    /// SQLite database for persistent stock (e.g. sqlite://wms.db)
    #[arg(long, global = true, env = "WMS_DATABASE_URL")]
    pub database: Option<String>,

    #[arg(long, global = true, env = "WMS_LOG_FORMAT", value_enum, default_value_t = LogFormatArg::Json)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Pretty => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one marketplace SKU
    Resolve {
        #[arg(long, value_parser = parse_platform)]
        platform: Platform,
        #[arg(long)]
        sku: String,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
    },
    /// Ingest sales files (or folders of them) and report per-row errors
    Ingest {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Push outgoing quantities into the product store
        #[arg(long)]
        apply: bool,
        /// Write `<stem>_Mapped_Enhanced.csv` files here
        #[arg(long)]
        mapped_dir: Option<PathBuf>,
    },
    /// Sales summary and projected stock
    Report {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Answer a canned question over the given sales files
    Ask {
        question: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn parse_platform(raw: &str) -> Result<Platform, String> {
    raw.parse::<Platform>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        let cli = Cli::try_parse_from(["wms", "report", "sales.csv"]).unwrap();
        assert!(matches!(cli.command, Command::Report { top: 10, .. }));
        assert_eq!(cli.log_format, LogFormatArg::Json);
    }

    #[test]
    fn resolve_parses_platform_case_insensitively() {
        let cli = Cli::try_parse_from([
            "wms", "--catalog", "master.xlsx", "resolve", "--platform", "FLIPKART", "--sku", "X1",
            "--qty", "3",
        ])
        .unwrap();
        assert_eq!(cli.catalog, PathBuf::from("master.xlsx"));
        match cli.command {
            Command::Resolve { platform, sku, qty } => {
                assert_eq!(platform, Platform::Flipkart);
                assert_eq!(sku, "X1");
                assert_eq!(qty, 3);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_platform_is_a_usage_error() {
        assert!(Cli::try_parse_from(["wms", "resolve", "--platform", "ebay", "--sku", "X"]).is_err());
    }

    #[test]
    fn ingest_requires_a_path() {
        assert!(Cli::try_parse_from(["wms", "ingest", "--apply"]).is_err());
    }
}
