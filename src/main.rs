//! risk-insight-engine CLI
//!
//! Compute a risk snapshot for a trading book from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Snapshot a book stored as JSON
//! risk-insight-engine snapshot --input book.json --price 4500
//!
//! # Output as JSON with a narrower sweep
//! risk-insight-engine snapshot --input book.json --price 4500 --range 50 --step 10 --format json
//!
//! # Generate a random book for testing
//! risk-insight-engine generate --positions 20 --price 4500
//! ```

use risk_insight_engine::core::book::PositionBook;
use risk_insight_engine::engine::{EngineConfig, RiskEngine};
use risk_insight_engine::greeks::sensitivity::UnsupportedInstrumentPolicy;
use risk_insight_engine::scenario::curve::CurveParams;
use risk_insight_engine::simulation::random_book::{generate_random_book, BookConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"risk-insight-engine — derivatives risk and insight engine

USAGE:
    risk-insight-engine <COMMAND> [OPTIONS]

COMMANDS:
    snapshot    Compute Greeks, scenario curve and insights for a book
    generate    Generate a random book (for testing)
    help        Show this message

OPTIONS (snapshot):
    --input <FILE>          Path to JSON book file
    --price <PRICE>         Reference price of the underlying
    --range <N>             Curve half-width in price units (default: 150)
    --step <N>              Curve step in price units (default: 5)
    --format <FORMAT>       Output format: text (default) or json
    --degrade-unsupported   Treat instruments without a model as linear

OPTIONS (generate):
    --positions <N>     Number of positions (default: 10)
    --price <PRICE>     Reference price strikes are scattered around (default: 4500)
    --output <FILE>     Write to file instead of stdout

Set RUST_LOG=debug for engine diagnostics.

EXAMPLES:
    risk-insight-engine snapshot --input book.json --price 4500
    risk-insight-engine snapshot --input book.json --price 4500 --format json
    risk-insight-engine generate --positions 25 --output book.json"#
    );
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str, what: &str) -> &'a str {
    args.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, what);
        process::exit(1);
    })
}

fn parse_value<T: std::str::FromStr>(raw: &str, flag: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid value for {}: '{}'", flag, raw);
        process::exit(1);
    })
}

fn load_book(path: &str) -> PositionBook {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "positions": [
    {{ "id": "ES-C-4500", "instrumentType": "Call", "underlyingStrike": 4500,
       "premium": 100, "quantity": 10, "isLong": true, "impliedVolatilityPct": 15 }}
  ]
}}"#
        );
        process::exit(1);
    })
}

fn cmd_snapshot(args: &[String]) {
    let mut input_path = None;
    let mut price = None;
    let mut params = CurveParams::default();
    let mut format = "text".to_string();
    let mut policy = UnsupportedInstrumentPolicy::Reject;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(next_value(args, i, "--input", "a file path").to_string());
            }
            "--price" => {
                i += 1;
                price = Some(parse_value::<f64>(next_value(args, i, "--price", "a number"), "--price"));
            }
            "--range" => {
                i += 1;
                params.range = parse_value(next_value(args, i, "--range", "a number"), "--range");
            }
            "--step" => {
                i += 1;
                params.step = parse_value(next_value(args, i, "--step", "a number"), "--step");
            }
            "--format" => {
                i += 1;
                format = next_value(args, i, "--format", "'text' or 'json'").to_string();
            }
            "--degrade-unsupported" => policy = UnsupportedInstrumentPolicy::TreatAsLinear,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    let price = price.unwrap_or_else(|| {
        eprintln!("Error: --price <PRICE> is required");
        process::exit(1);
    });

    let book = load_book(&path);
    let violations = book.violations();
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("Error: {}", violation);
        }
        process::exit(1);
    }

    let engine = RiskEngine::new(EngineConfig {
        curve: params,
        unsupported_instruments: policy,
    });
    let snapshot = engine
        .compute_snapshot(book.positions(), price)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if format == "json" {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Positions: {} ({} long, {} short)", book.len(), book.long_count(), book.short_count());
        for (instrument, count) in book.count_by_instrument() {
            println!("  {:<18} {}", instrument, count);
        }
        println!();
        println!("{}", snapshot);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = BookConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--positions" => {
                i += 1;
                config.position_count =
                    parse_value(next_value(args, i, "--positions", "a number"), "--positions");
            }
            "--price" => {
                i += 1;
                config.reference_price =
                    parse_value(next_value(args, i, "--price", "a number"), "--price");
            }
            "--output" => {
                i += 1;
                output_path = Some(next_value(args, i, "--output", "a file path").to_string());
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let book = generate_random_book(&config);
    let json = serde_json::to_string_pretty(&book).unwrap_or_else(|e| {
        eprintln!("Error serializing book: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} positions → {}", book.len(), path);
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "snapshot" => cmd_snapshot(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
