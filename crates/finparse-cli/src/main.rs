mod commands;
mod output;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "finparse",
    version,
    about = "Extract and normalize financial and office documents into JSON"
)]
struct Cli {
    /// Directory of documents to parse (searched recursively)
    #[arg(short, long, value_name = "DIR")]
    input: PathBuf,

    /// JSON file the parsed records are written to
    #[arg(short, long, value_name = "FILE", default_value = "parsed_docs.json")]
    output: PathBuf,

    /// Skip OCR for scanned PDFs and images
    #[arg(long)]
    disable_ocr: bool,

    /// JSON file with parser option overrides
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// OCR languages, joined with '+' (e.g. chi_sim+eng)
    #[arg(long, value_name = "LANGS")]
    ocr_lang: Option<String>,

    /// Summary printed after the run: table (default), json or none
    #[arg(short, long, default_value = "table")]
    summary: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = commands::batch::run(commands::batch::BatchArgs {
        input: cli.input,
        output: cli.output,
        disable_ocr: cli.disable_ocr,
        config: cli.config,
        ocr_lang: cli.ocr_lang,
        summary: cli.summary,
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
