//! annotree - export ebook highlights in reading order

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use annotree::export::ExportFormat;
use annotree::{Library, build_library, load_dump};

#[derive(Parser)]
#[command(name = "annotree")]
#[command(version, about = "Export ebook highlights in reading order", long_about = None)]
#[command(after_help = "EXAMPLES:
    annotree dump.json                      Fetch into dump.json if missing, print CSV
    annotree dump.json --export org         Print an Org-mode outline
    annotree dump.json --epub-id 9781492052586 --export raw_xml
                                            Show the rebuilt tree of one book")]
struct Cli {
    /// JSON dump of API responses; fetched and written first if it does not exist
    #[arg(value_name = "JSON_DUMP")]
    json_dump: PathBuf,

    /// Cookie string, or a file containing it, for fetching the dump
    #[arg(long, default_value = "cookies")]
    cookies: String,

    /// Export format: csv, raw_xml or org
    #[arg(long, default_value = "csv")]
    export: ExportFormat,

    /// Only export this book (ISBN13 without hyphens); may be repeated
    #[arg(long = "epub-id", value_name = "ID")]
    epub_id: Vec<String>,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> annotree::Result<()> {
    if !cli.json_dump.exists() {
        fetch_dump(&cli.json_dump, &cli.cookies)?;
    }

    let pages = load_dump(&cli.json_dump)?;
    let mut library = Library::from_pages(pages)?;
    library.retain_books(&cli.epub_id);

    let forest = build_library(&library);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    cli.export.export(&forest, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(feature = "fetch")]
fn fetch_dump(path: &Path, cookies: &str) -> annotree::Result<()> {
    use annotree::fetch::{FetchConfig, Fetcher, load_cookies};

    let cookies = load_cookies(cookies)?;
    let pages = Fetcher::new(FetchConfig::default(), &cookies)?.fetch_all()?;
    annotree::write_dump(path, &pages)
}

#[cfg(not(feature = "fetch"))]
fn fetch_dump(path: &Path, _cookies: &str) -> annotree::Result<()> {
    Err(annotree::Error::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist and fetching is disabled", path.display()),
    )))
}
