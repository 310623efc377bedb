//! Terminal output, grounded on `riptide-cli::output`'s print_* helpers but
//! trimmed to plain stdio (no `colored`/`comfy_table`, which this CLI has no
//! use for — its surface is a single JSON blob or a short text summary).

use lynxget_types::FetchResult;

pub fn print_json(result: &FetchResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize result: {err}"),
    }
}

pub fn print_text(result: &FetchResult) {
    if let Some(title) = &result.title {
        println!("{title}");
        println!();
    }
    if let Some(text) = &result.text_content {
        println!("{text}");
    } else if let Some(error) = &result.error {
        eprintln!("error: {error}");
        if let Some(hint) = &result.hint {
            eprintln!("hint: {hint}");
        }
    }
}

pub fn print_detections(result: &FetchResult) {
    match serde_json::to_string_pretty(&result.antibot) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize antibot detections: {err}"),
    }
}

pub fn print_progress(quiet: bool, message: &str) {
    if !quiet {
        eprintln!("{message}");
    }
}
