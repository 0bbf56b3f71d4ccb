// ✈️ ATSE Pricing CLI
//
//   atse-pricing import <dir>                      load reference JSON/CSV into SQLite
//   atse-pricing stats                             record counts per family
//   atse-pricing match <request.json>              retailer rules per fare
//   atse-pricing convert <amount> <from> <to> [yyyy-mm-dd] [location]
//   atse-pricing tax <request.json>                taxes for a fare path
//   atse-pricing rbd <request.json>                booking codes per fare
//   atse-pricing fbr <request.json>                fare by rule creation

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use atse_pricing::{
    count_records, import_directory, init_tracing, load_reference_tables, run_booking_codes,
    run_convert, run_fare_by_rule, run_match, run_taxes, setup_database, Agent,
    BookingCodeRequest, ConversionApplication, ConvertRequest, EngineConfig, FareByRuleRequest,
    MatchRequest, RecordFamily, SharedData, TaxRequest,
};

fn main() -> Result<()> {
    let config = EngineConfig::from_env();
    init_tracing(&config);

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("import") => {
            let dir = args.get(2).context("Usage: atse-pricing import <dir>")?;
            run_import(&config, Path::new(dir))
        }
        Some("stats") => run_stats(&config),
        Some("match") => {
            let file = args.get(2).context("Usage: atse-pricing match <request.json>")?;
            run_match_file(&config, Path::new(file))
        }
        Some("convert") => run_convert_args(&config, &args[2..]),
        Some("tax") => {
            let file = args.get(2).context("Usage: atse-pricing tax <request.json>")?;
            run_tax_file(&config, Path::new(file))
        }
        Some("rbd") => {
            let file = args.get(2).context("Usage: atse-pricing rbd <request.json>")?;
            run_booking_code_file(&config, Path::new(file))
        }
        Some("fbr") => {
            let file = args.get(2).context("Usage: atse-pricing fbr <request.json>")?;
            run_fare_by_rule_file(&config, Path::new(file))
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("✈️  ATSE Pricing Engine v{}", atse_pricing::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  import <dir>                 Load <table>.json and bsrs.csv files");
    println!("  stats                        Show stored record counts");
    println!("  match <request.json>         Match fare retailer rules");
    println!("  convert <amt> <from> <to> [date] [location]");
    println!("  tax <request.json>           Calculate taxes for a fare path");
    println!("  rbd <request.json>           Validate booking codes per fare");
    println!("  fbr <request.json>           Create fare by rule fares");
}

fn open_database(config: &EngineConfig) -> Result<Connection> {
    let conn = Connection::open(&config.db_path)
        .with_context(|| format!("Failed to open database: {:?}", config.db_path))?;
    setup_database(&conn)?;
    Ok(conn)
}

fn shared_tables(config: &EngineConfig) -> Result<SharedData> {
    let conn = open_database(config)?;
    let tables = load_reference_tables(&conn)?;
    Ok(Arc::new(tables))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// IMPORT / STATS
// ============================================================================

fn run_import(config: &EngineConfig, dir: &Path) -> Result<()> {
    println!("🗄️  Reference Import - {:?} → {:?}", dir, config.db_path);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let conn = open_database(config)?;
    let summary = import_directory(&conn, dir)?;

    println!("✓ Files imported: {}", summary.files_imported);
    println!("✓ Files skipped (already imported): {}", summary.files_skipped);
    println!("✓ Records inserted: {}", summary.records_inserted);

    Ok(())
}

fn run_stats(config: &EngineConfig) -> Result<()> {
    println!("📊 Reference Records - {:?}", config.db_path);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let conn = open_database(config)?;
    for family in RecordFamily::ALL {
        let count = count_records(&conn, family)?;
        if count > 0 {
            println!("  {:<32} {}", family.table_name(), count);
        }
    }

    Ok(())
}

// ============================================================================
// ENGINE COMMANDS
// ============================================================================

fn run_match_file(config: &EngineConfig, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let mut request: MatchRequest = serde_json::from_str(&content).context("Failed to parse match request")?;
    if request.diagnostic.is_none() && config.diagnostic {
        request.diagnostic = Some(String::new());
    }

    let response = run_match(shared_tables(config)?, request, config.icer_active)?;

    for line in &response.diagnostic {
        println!("{}", line);
    }
    info!("Trx {}: {} fares matched", response.trx_id, response.matches.len());
    print_json(&response.matches)
}

fn run_convert_args(config: &EngineConfig, args: &[String]) -> Result<()> {
    if args.len() < 3 {
        bail!("Usage: atse-pricing convert <amount> <from> <to> [yyyy-mm-dd] [location]");
    }

    let amount: f64 = args[0]
        .parse()
        .with_context(|| format!("Invalid amount: {}", args[0]))?;
    let ticket_date = match args.get(3) {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .with_context(|| format!("Invalid date: {}", value))?,
        None => Local::now().date_naive(),
    };
    let location = args.get(4).map(String::as_str).unwrap_or("JFK");

    let request = ConvertRequest {
        agent: Agent::new("", "", location, &args[1]),
        ticket_date,
        amount,
        from: args[1].clone(),
        to: args[2].clone(),
        application: ConversionApplication::Pricing,
        no_rounding: false,
    };

    let results = run_convert(shared_tables(config)?, request, config.icer_active)?;

    println!(
        "💱 {:.2} {} = {:.2} {}",
        results.source_amount, results.source_currency, results.converted_amount, results.target_currency
    );
    print_json(&results)
}

fn run_tax_file(config: &EngineConfig, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let request: TaxRequest = serde_json::from_str(&content).context("Failed to parse tax request")?;

    let response = run_taxes(shared_tables(config)?, request, config.icer_active)?;

    println!("🧾 Taxes: {:.2} {}", response.total(), response.payment_currency);
    print_json(&response)
}

fn run_booking_code_file(config: &EngineConfig, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let request: BookingCodeRequest =
        serde_json::from_str(&content).context("Failed to parse booking code request")?;

    let results = run_booking_codes(shared_tables(config)?, request, config.icer_active)?;

    for result in &results {
        let mark = if result.valid { "✓" } else { "✗" };
        println!("{} {:<12} {:?}", mark, result.fare_class, result.aggregate);
    }
    print_json(&results)
}

fn run_fare_by_rule_file(config: &EngineConfig, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let request: FareByRuleRequest =
        serde_json::from_str(&content).context("Failed to parse fare by rule request")?;

    let response = run_fare_by_rule(shared_tables(config)?, request, config.icer_active)?;

    if !response.app_applies {
        println!("⚠️  Record 8 does not apply to this market");
    }
    info!("Trx {}: {} fares created", response.trx_id, response.fares.len());
    print_json(&response.fares)
}
