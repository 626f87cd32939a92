use pdx_reader::paradox::codec::text::parse_encoding;
use pdx_reader::{Calendar, CalendarReform, DecodeOptions, ParadoxReader, TextEncoding};
use std::env;
use std::process;

const USAGE: &str =
    "<file.db> [--strict] [--encoding <LABEL> | --code-page] [--reform <papal|british|YYYY-MM-DD>]";

fn usage_error(program: &str, message: &str) -> ! {
    eprintln!("ERROR: {}", message);
    eprintln!("Usage: {} {}", program, USAGE);
    process::exit(2);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("pdx-reader");

    let mut path: Option<&str> = None;
    let mut options = DecodeOptions::default();
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--strict" => options = options.strict(),
            "--code-page" => {
                options = options.with_text_encoding(TextEncoding::HeaderCodePage)
            }
            "--encoding" => {
                let Some(label) = rest.next() else {
                    usage_error(program, "--encoding flag requires an argument.");
                };
                match parse_encoding(label) {
                    Some(encoding) => options = options.with_encoding(encoding),
                    None => usage_error(program, &format!("Unknown encoding label '{}'", label)),
                }
            }
            "--reform" => {
                let Some(value) = rest.next() else {
                    usage_error(program, "--reform flag requires an argument.");
                };
                options = match value.as_str() {
                    "papal" => options.with_calendar(Calendar::new(CalendarReform::PAPAL)),
                    "british" => options.with_calendar(Calendar::new(CalendarReform::BRITISH)),
                    date => {
                        let parts: Vec<i32> = date.split('-').filter_map(|p| p.parse().ok()).collect();
                        let &[year, month, day] = parts.as_slice() else {
                            usage_error(program, &format!("Invalid reform date '{}'", date));
                        };
                        match options.with_reform_date(year, month, day) {
                            Ok(options) => options,
                            Err(e) => usage_error(program, &e.to_string()),
                        }
                    }
                };
            }
            flag if flag.starts_with("--") => usage_error(program, &format!("Unknown flag '{}'", flag)),
            file if path.is_none() => path = Some(file),
            extra => usage_error(program, &format!("Unexpected argument '{}'", extra)),
        }
    }
    let Some(path) = path else {
        usage_error(program, "missing table path");
    };

    let result = ParadoxReader::open(path, options).and_then(ParadoxReader::into_table);
    match result {
        Ok(decoded) => {
            let table = &decoded.table;
            // Row-major over every record slot, header row first.
            for record in 1..=table.last_slot() {
                for field in 1..=table.num_fields() {
                    println!("{}", table.cell(field, record).unwrap_or_default());
                }
            }
            if let Some(truncation) = table.truncation() {
                eprintln!(
                    "WARNING: file ends inside block {}; {} of {} records decoded",
                    truncation.block,
                    truncation.decoded_records,
                    table.declared_records()
                );
            }
        }
        Err(e) => {
            eprintln!("ERROR: Failed to read Paradox table {}", path);
            eprintln!("  {}", e);
            process::exit(1);
        }
    }
}
