use finparse_core::config::{load_options, ParseOptions};
use finparse_core::error::DocparseError;
use finparse_core::DocumentParser;
use std::path::PathBuf;

use crate::output;

pub struct BatchArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub disable_ocr: bool,
    pub config: Option<PathBuf>,
    pub ocr_lang: Option<String>,
    pub summary: String,
}

pub fn run(args: BatchArgs) -> Result<(), DocparseError> {
    if !args.input.is_dir() {
        return Err(DocparseError::FileNotFound(args.input));
    }

    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => ParseOptions::default(),
    };
    if args.disable_ocr {
        options.enable_ocr = false;
    }
    if let Some(langs) = &args.ocr_lang {
        options.set_languages(langs);
    }

    eprintln!("Input directory: {}", args.input.display());
    eprintln!("Output file: {}", args.output.display());
    eprintln!(
        "OCR: {}",
        if options.enable_ocr { "enabled" } else { "disabled" }
    );

    let parser = DocumentParser::new(options);
    let outcome = parser.batch_parse(&args.input, &args.output)?;

    match args.summary.as_str() {
        "json" => output::json::print(&outcome.documents)?,
        "none" => {}
        _ => output::table::print(&outcome.documents),
    }

    eprintln!(
        "Parsed {} document(s), {} with errors",
        outcome.documents.len(),
        outcome.error_count()
    );
    match outcome.save_error {
        Some(e) => Err(e),
        None => {
            eprintln!("Results written to {}", outcome.output.display());
            Ok(())
        }
    }
}
