use plagai_scanner_lib::api::preprocess_file;
use plagai_scanner_lib::models::Language;
use plagai_scanner_lib::services::file_parser::file_extension;
use plagai_scanner_lib::services::text_processor::{count_words, preview, MAX_MANUAL_WORDS};
use serde::Serialize;

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin extract_document -- <path.pdf|docx|odt> [--lines <n>] [--lang pt|en|es] [--out <json_path>]\n\nNotes:\n  - Prints a per-line preview of the extracted text and its word count.\n  - Errors are shown in the --lang language (default pt)."
        );
        return Ok(());
    }

    let path = args[1].clone();
    let lines_n: usize = parse_arg_value(&args, "--lines")
        .and_then(|s| s.parse().ok())
        .unwrap_or(40);
    let language: Language = parse_arg_value(&args, "--lang")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or_default();
    let out_path = parse_arg_value(&args, "--out");

    let bytes = std::fs::read(&path).map_err(|e| format!("read file failed: {}", e))?;
    let file_name = std::path::Path::new(&path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let text = preprocess_file(file_name.clone(), bytes, language).await?;
    let words = count_words(&text);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    println!("File: {}", path);
    println!("Format: {}", file_extension(&file_name));
    println!("Extracted: {} chars ({} bytes)", text.chars().count(), text.len());
    println!(
        "Words: {}{}",
        words,
        if words > MAX_MANUAL_WORDS {
            " (over the manual-entry limit; allowed for files)"
        } else {
            ""
        }
    );
    println!();

    println!("Non-empty lines: {}", lines.len());
    for (i, line) in lines.iter().take(lines_n).enumerate() {
        println!(
            "[L{:04}] chars={}  {}",
            i,
            line.chars().count(),
            preview(line, 120)
        );
    }
    if lines.len() > lines_n {
        println!("... ({} more lines)", lines.len() - lines_n);
    }

    if let Some(out_path) = out_path {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output {
            file: String,
            format: String,
            extracted_chars: usize,
            extracted_bytes: usize,
            words: usize,
            text: String,
        }

        let out = Output {
            file: path.clone(),
            format: file_extension(&file_name),
            extracted_chars: text.chars().count(),
            extracted_bytes: text.len(),
            words,
            text,
        };

        let json = serde_json::to_string_pretty(&out).map_err(|e| e.to_string())?;
        std::fs::write(&out_path, json).map_err(|e| format!("write out failed: {}", e))?;
        println!();
        println!("Wrote JSON: {}", out_path);
    }

    Ok(())
}
