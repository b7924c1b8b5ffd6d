use dbf_reader::{DbfReader, DbfValue};
use encoding_rs::{Encoding, WINDOWS_1252};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-dbf-file> [--encoding <LABEL>]", args[0]);
        std::process::exit(1);
    }

    let dbf_path = &args[1];
    let mut encoding: &'static Encoding = WINDOWS_1252;
    // Parse --encoding argument
    if let Some(encoding_idx) = args.iter().position(|arg| arg == "--encoding") {
        if let Some(label) = args.get(encoding_idx + 1) {
            match Encoding::for_label(label.as_bytes()) {
                Some(e) => encoding = e,
                None => {
                    eprintln!("ERROR: Unknown encoding label: {}", label);
                    std::process::exit(1);
                }
            }
        } else {
            eprintln!("ERROR: --encoding flag requires an argument.");
            std::process::exit(1);
        }
    }

    println!("Reading DBF file: {}", dbf_path);
    println!("{}", "=".repeat(60));

    let file = match std::fs::File::open(dbf_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("ERROR: Cannot open {}: {}", dbf_path, e);
            std::process::exit(1);
        }
    };

    match DbfReader::with_encoding(file, encoding) {
        Ok(mut reader) => {
            let header = reader.header();
            println!("\nTable Information:");
            println!("  Signature byte: {:#04x}", header.signature());
            println!("  Last update: {}", header.last_update());
            println!("  Declared records: {}", header.record_count());
            println!("  Header length: {} bytes", header.header_length());
            println!("  Record length: {} bytes", header.record_length());
            println!("  Encoding: {}", reader.encoding().name());

            println!("\nFields:");
            for field in header.fields() {
                println!(
                    "  {:<11} {:<9} offset {:>4}, length {:>3}, decimals {}",
                    field.name, field.field_type, field.offset, field.length, field.decimal_count
                );
            }

            println!("\nSample Rows (first 10):");
            let mut shown = 0usize;
            for (i, result) in reader.rows().take(10).enumerate() {
                match result {
                    Ok(row) => {
                        let cells: Vec<String> = row
                            .header()
                            .fields()
                            .iter()
                            .zip(row.values())
                            .map(|(field, value)| format!("{}={}", field.name, render(value)))
                            .collect();
                        println!("  {}. {}", i + 1, cells.join(", "));
                        shown += 1;
                    }
                    Err(e) => {
                        eprintln!("  {}. ERROR: {}", i + 1, e);
                    }
                }
            }
            if shown == 0 {
                println!("  (no active records)");
            }
        }
        Err(e) => {
            eprintln!("\nERROR: Failed to read DBF file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}

fn render(value: &DbfValue) -> String {
    match value {
        DbfValue::Character(bytes) => {
            format!("{:?}", String::from_utf8_lossy(bytes).trim_end())
        }
        DbfValue::Date(date) => date.to_string(),
        DbfValue::Float(Some(v)) => v.to_string(),
        DbfValue::Numeric(Some(v)) => v.to_string(),
        DbfValue::Memo(Some(link)) => format!("memo#{}", link),
        DbfValue::Logical(v) => v.to_string(),
        DbfValue::Float(None) | DbfValue::Numeric(None) | DbfValue::Memo(None) => {
            "<absent>".to_string()
        }
        DbfValue::Null => "<null>".to_string(),
    }
}
