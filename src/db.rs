// 🗄️ Reference Store - SQLite persistence for reference records
//
// One table per record family. Rows are JSON payloads keyed by item number or
// currency pair, deduplicated by a SHA-256 idempotency hash. Every insert and
// every imported file is recorded (events table, import log).

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::entities::{
    AirlineAllianceCarrierInfo, BankerSellRate, BaseFareRule, Currency, CustomerSecurityHandshakeInfo,
    EffectivePeriod, FareByRuleItemInfo, FareFocusAccountCdInfo, FareFocusBookingCodeInfo,
    FareFocusCarrierInfo, FareFocusDaytimeApplInfo, FareFocusDisplayCatTypeInfo, FareFocusFareClassInfo,
    FareFocusLocationPairInfo, FareFocusPsgTypeInfo, FareFocusRuleCodeInfo, FareFocusSecurityInfo,
    FareRetailerCalcInfo, FareRetailerResultingFareAttrInfo, FareRetailerRuleInfo,
    FareRetailerRuleLookupInfo, Loc, NationInfo, NucInfo, TaxCodeReg, VendorTypeInfo, ZoneInfo,
};
use crate::tables::ReferenceTables;

// ============================================================================
// RECORD FAMILIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordFamily {
    Handshake,
    Lookup,
    RetailerRule,
    Security,
    AccountCd,
    PsgType,
    RuleCode,
    Carrier,
    FareClass,
    BookingCode,
    LocationPair,
    DisplayCatType,
    DaytimeAppl,
    RetailerCalc,
    ResultingFareAttr,
    Alliance,
    Currency,
    Nuc,
    Bsr,
    Nation,
    Loc,
    Zone,
    VendorType,
    FareByRuleItem,
    BaseFareRule,
    TaxCode,
}

impl RecordFamily {
    pub const ALL: [RecordFamily; 26] = [
        RecordFamily::Handshake,
        RecordFamily::Lookup,
        RecordFamily::RetailerRule,
        RecordFamily::Security,
        RecordFamily::AccountCd,
        RecordFamily::PsgType,
        RecordFamily::RuleCode,
        RecordFamily::Carrier,
        RecordFamily::FareClass,
        RecordFamily::BookingCode,
        RecordFamily::LocationPair,
        RecordFamily::DisplayCatType,
        RecordFamily::DaytimeAppl,
        RecordFamily::RetailerCalc,
        RecordFamily::ResultingFareAttr,
        RecordFamily::Alliance,
        RecordFamily::Currency,
        RecordFamily::Nuc,
        RecordFamily::Bsr,
        RecordFamily::Nation,
        RecordFamily::Loc,
        RecordFamily::Zone,
        RecordFamily::VendorType,
        RecordFamily::FareByRuleItem,
        RecordFamily::BaseFareRule,
        RecordFamily::TaxCode,
    ];

    /// SQLite table name; also the JSON import file stem
    pub fn table_name(&self) -> &'static str {
        match self {
            RecordFamily::Handshake => "security_handshakes",
            RecordFamily::Lookup => "retailer_rule_lookups",
            RecordFamily::RetailerRule => "retailer_rules",
            RecordFamily::Security => "fare_focus_securities",
            RecordFamily::AccountCd => "fare_focus_account_cds",
            RecordFamily::PsgType => "fare_focus_psg_types",
            RecordFamily::RuleCode => "fare_focus_rule_codes",
            RecordFamily::Carrier => "fare_focus_carriers",
            RecordFamily::FareClass => "fare_focus_fare_classes",
            RecordFamily::BookingCode => "fare_focus_booking_codes",
            RecordFamily::LocationPair => "fare_focus_location_pairs",
            RecordFamily::DisplayCatType => "fare_focus_display_cat_types",
            RecordFamily::DaytimeAppl => "fare_focus_daytime_appls",
            RecordFamily::RetailerCalc => "retailer_calcs",
            RecordFamily::ResultingFareAttr => "resulting_fare_attrs",
            RecordFamily::Alliance => "alliance_carriers",
            RecordFamily::Currency => "currencies",
            RecordFamily::Nuc => "nucs",
            RecordFamily::Bsr => "bsrs",
            RecordFamily::Nation => "nations",
            RecordFamily::Loc => "locs",
            RecordFamily::Zone => "zones",
            RecordFamily::VendorType => "vendor_types",
            RecordFamily::FareByRuleItem => "fare_by_rule_items",
            RecordFamily::BaseFareRule => "base_fare_rules",
            RecordFamily::TaxCode => "tax_codes",
        }
    }

    pub fn from_table_name(name: &str) -> Option<RecordFamily> {
        RecordFamily::ALL.into_iter().find(|f| f.table_name() == name)
    }
}

/// A reference row that can be stored, keyed and loaded into the tables
pub trait ReferenceRecord: Serialize + DeserializeOwned {
    const FAMILY: RecordFamily;

    fn record_key(&self) -> String;

    fn register(self, tables: &ReferenceTables);
}

macro_rules! reference_record {
    ($ty:ty, $family:ident, $register:ident, |$r:ident| $key:expr) => {
        impl ReferenceRecord for $ty {
            const FAMILY: RecordFamily = RecordFamily::$family;

            fn record_key(&self) -> String {
                let $r = self;
                $key
            }

            fn register(self, tables: &ReferenceTables) {
                tables.$register(self)
            }
        }
    };
}

reference_record!(CustomerSecurityHandshakeInfo, Handshake, register_handshake, |r| format!("{}/{}", r.product_cd, r.pcc));
reference_record!(FareRetailerRuleLookupInfo, Lookup, register_lookup, |r| format!(
    "{}/{}/{}",
    r.application_type, r.source_pcc, r.pcc
));
reference_record!(FareRetailerRuleInfo, RetailerRule, register_rule, |r| r.fare_retailer_rule_id.to_string());
reference_record!(FareFocusSecurityInfo, Security, register_security, |r| r.security_item_no.to_string());
reference_record!(FareFocusAccountCdInfo, AccountCd, register_account_cd, |r| r.account_cd_item_no.to_string());
reference_record!(FareFocusPsgTypeInfo, PsgType, register_psg_type, |r| r.psg_type_item_no.to_string());
reference_record!(FareFocusRuleCodeInfo, RuleCode, register_rule_code, |r| r.rule_cd_item_no.to_string());
reference_record!(FareFocusCarrierInfo, Carrier, register_carrier, |r| r.carrier_item_no.to_string());
reference_record!(FareFocusFareClassInfo, FareClass, register_fare_class, |r| r.fare_class_item_no.to_string());
reference_record!(FareFocusBookingCodeInfo, BookingCode, register_booking_code, |r| r.booking_cd_item_no.to_string());
reference_record!(FareFocusLocationPairInfo, LocationPair, register_location_pair, |r| r
    .location_pair_item_no
    .to_string());
reference_record!(FareFocusDisplayCatTypeInfo, DisplayCatType, register_display_cat_type, |r| r
    .display_cat_type_item_no
    .to_string());
reference_record!(FareFocusDaytimeApplInfo, DaytimeAppl, register_daytime_appl, |r| r
    .day_time_appl_item_no
    .to_string());
reference_record!(FareRetailerCalcInfo, RetailerCalc, register_calc, |r| r.fare_retailer_calc_item_no.to_string());
reference_record!(FareRetailerResultingFareAttrInfo, ResultingFareAttr, register_resulting_fare_attr, |r| r
    .resulting_fare_attr_item_no
    .to_string());
reference_record!(AirlineAllianceCarrierInfo, Alliance, register_alliance, |r| format!(
    "{}/{}",
    r.carrier, r.generic_alliance_code
));
reference_record!(Currency, Currency, register_currency, |r| r.code.clone());
reference_record!(NucInfo, Nuc, register_nuc, |r| r.cur.clone());
reference_record!(BankerSellRate, Bsr, register_bsr, |r| format!("{}/{}", r.prime_cur, r.cur));
reference_record!(NationInfo, Nation, register_nation, |r| r.nation.clone());
reference_record!(Loc, Loc, register_loc, |r| r.code.clone());
reference_record!(ZoneInfo, Zone, register_zone, |r| r.zone.clone());
reference_record!(VendorTypeInfo, VendorType, register_vendor_type, |r| r.vendor.clone());
reference_record!(FareByRuleItemInfo, FareByRuleItem, register_fare_by_rule_item, |r| format!(
    "{}/{}",
    r.vendor, r.item_no
));
reference_record!(BaseFareRule, BaseFareRule, register_base_fare_rule, |r| format!(
    "{}/{}/{}",
    r.vendor, r.item_no, r.seq_no
));
reference_record!(TaxCodeReg, TaxCode, register_tax_code, |r| format!("{}/{}", r.tax_code, r.seq_no));

// ============================================================================
// EVENTS
// ============================================================================

/// Audit trail entry
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

/// Insert event into audit trail
pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (
            event_id, timestamp, event_type, entity_type, entity_id, data, actor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            event.entity_type,
            event.entity_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

/// Get events for a specific entity, newest first
pub fn get_events_for_entity(conn: &Connection, entity_type: &str, entity_id: &str) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY timestamp DESC, id DESC",
    )?;

    let events = stmt
        .query_map(params![entity_type, entity_id], |row| {
            let timestamp_str: String = row.get(1)?;
            let data_json: String = row.get(5)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?
                    .with_timezone(&Utc),
                event_type: row.get(2)?,
                entity_type: row.get(3)?,
                entity_id: row.get(4)?,
                data: serde_json::from_str(&data_json).map_err(|_| rusqlite::Error::InvalidQuery)?,
                actor: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    for family in RecordFamily::ALL {
        let table = family.table_name();
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    idempotency_hash TEXT UNIQUE NOT NULL,
                    record_key TEXT NOT NULL,
                    payload TEXT NOT NULL,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                )"
            ),
            [],
        )
        .with_context(|| format!("Failed to create table {}", table))?;

        conn.execute(
            &format!("CREATE INDEX IF NOT EXISTS idx_{table}_key ON {table}(record_key)"),
            [],
        )?;
    }

    // ==========================================================================
    // Events Table (audit trail)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Import Log (file-level idempotency)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS import_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_hash TEXT UNIQUE NOT NULL,
            source_file TEXT NOT NULL,
            family TEXT NOT NULL,
            record_count INTEGER NOT NULL,
            imported_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// RECORDS
// ============================================================================

/// SHA-256 over family + payload (deduplication, not identity)
pub fn compute_idempotency_hash(family: RecordFamily, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(family.table_name());
    hasher.update(payload);
    format!("{:x}", hasher.finalize())
}

/// Insert records, skipping exact duplicates. Returns the number inserted.
pub fn insert_records<T: ReferenceRecord>(conn: &Connection, records: &[T]) -> Result<usize> {
    let table = T::FAMILY.table_name();
    let mut inserted = 0;
    let mut duplicates = 0;

    for record in records {
        let payload = serde_json::to_string(record)?;
        let hash = compute_idempotency_hash(T::FAMILY, &payload);
        let key = record.record_key();

        let result = conn.execute(
            &format!("INSERT INTO {table} (idempotency_hash, record_key, payload) VALUES (?1, ?2, ?3)"),
            params![hash, key, payload],
        );

        match result {
            Ok(_) => {
                inserted += 1;

                let event = Event::new(
                    "record_added",
                    table,
                    &key,
                    serde_json::json!({ "hash": hash }),
                    "reference_importer",
                );
                if let Err(err) = insert_event(conn, &event) {
                    warn!("Failed to log event for {} {}: {}", table, key, err);
                }
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                duplicates += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to insert into {}", table)),
        }
    }

    debug!("{}: inserted {}, skipped duplicates {}", table, inserted, duplicates);

    Ok(inserted)
}

/// All records of a family in insertion order
pub fn load_records<T: ReferenceRecord>(conn: &Connection) -> Result<Vec<T>> {
    let table = T::FAMILY.table_name();
    let mut stmt = conn.prepare(&format!("SELECT payload FROM {table} ORDER BY id"))?;

    let payloads = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    payloads
        .iter()
        .map(|payload| {
            serde_json::from_str(payload).with_context(|| format!("Corrupt payload in {}", table))
        })
        .collect()
}

/// Records of a family with the given key
pub fn find_records<T: ReferenceRecord>(conn: &Connection, key: &str) -> Result<Vec<T>> {
    let table = T::FAMILY.table_name();
    let mut stmt = conn.prepare(&format!(
        "SELECT payload FROM {table} WHERE record_key = ?1 ORDER BY id"
    ))?;

    let payloads = stmt
        .query_map(params![key], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    payloads
        .iter()
        .map(|payload| serde_json::from_str(payload).context("Corrupt payload"))
        .collect()
}

pub fn count_records(conn: &Connection, family: RecordFamily) -> Result<i64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", family.table_name()),
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn register_all<T: ReferenceRecord>(conn: &Connection, tables: &ReferenceTables) -> Result<usize> {
    let records = load_records::<T>(conn)?;
    let count = records.len();
    for record in records {
        record.register(tables);
    }
    Ok(count)
}

/// Defaults overlaid with every stored record
pub fn load_reference_tables(conn: &Connection) -> Result<ReferenceTables> {
    let tables = ReferenceTables::with_defaults();
    let mut total = 0;

    total += register_all::<CustomerSecurityHandshakeInfo>(conn, &tables)?;
    total += register_all::<FareRetailerRuleLookupInfo>(conn, &tables)?;
    total += register_all::<FareRetailerRuleInfo>(conn, &tables)?;
    total += register_all::<FareFocusSecurityInfo>(conn, &tables)?;
    total += register_all::<FareFocusAccountCdInfo>(conn, &tables)?;
    total += register_all::<FareFocusPsgTypeInfo>(conn, &tables)?;
    total += register_all::<FareFocusRuleCodeInfo>(conn, &tables)?;
    total += register_all::<FareFocusCarrierInfo>(conn, &tables)?;
    total += register_all::<FareFocusFareClassInfo>(conn, &tables)?;
    total += register_all::<FareFocusBookingCodeInfo>(conn, &tables)?;
    total += register_all::<FareFocusLocationPairInfo>(conn, &tables)?;
    total += register_all::<FareFocusDisplayCatTypeInfo>(conn, &tables)?;
    total += register_all::<FareFocusDaytimeApplInfo>(conn, &tables)?;
    total += register_all::<FareRetailerCalcInfo>(conn, &tables)?;
    total += register_all::<FareRetailerResultingFareAttrInfo>(conn, &tables)?;
    total += register_all::<AirlineAllianceCarrierInfo>(conn, &tables)?;
    total += register_all::<Currency>(conn, &tables)?;
    total += register_all::<NucInfo>(conn, &tables)?;
    total += register_all::<BankerSellRate>(conn, &tables)?;
    total += register_all::<NationInfo>(conn, &tables)?;
    total += register_all::<Loc>(conn, &tables)?;
    total += register_all::<ZoneInfo>(conn, &tables)?;
    total += register_all::<VendorTypeInfo>(conn, &tables)?;
    total += register_all::<FareByRuleItemInfo>(conn, &tables)?;
    total += register_all::<BaseFareRule>(conn, &tables)?;
    total += register_all::<TaxCodeReg>(conn, &tables)?;

    info!("Loaded {} stored reference records", total);

    Ok(tables)
}

// ============================================================================
// IMPORT
// ============================================================================

/// BSR CSV row: prime_cur,cur,rate,rate_no_dec,rate_type,effective,discontinue
#[derive(Debug, Deserialize)]
struct BsrCsvRow {
    prime_cur: String,
    cur: String,
    rate: f64,
    #[serde(default)]
    rate_no_dec: Option<u8>,
    #[serde(default)]
    rate_type: Option<char>,
    #[serde(default)]
    effective: Option<NaiveDate>,
    #[serde(default)]
    discontinue: Option<NaiveDate>,
}

impl From<BsrCsvRow> for BankerSellRate {
    fn from(row: BsrCsvRow) -> Self {
        let mut bsr = BankerSellRate::new(&row.prime_cur, &row.cur, row.rate);
        if let Some(no_dec) = row.rate_no_dec {
            bsr.rate_no_dec = no_dec;
        }
        if let Some(rate_type) = row.rate_type {
            bsr.rate_type = rate_type;
        }
        bsr.period = EffectivePeriod::new(row.effective.unwrap_or(NaiveDate::MIN), row.discontinue);
        bsr
    }
}

pub fn load_bsr_csv<R: std::io::Read>(reader: R) -> Result<Vec<BankerSellRate>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rates = Vec::new();

    for result in rdr.deserialize() {
        let row: BsrCsvRow = result.context("Failed to deserialize BSR row")?;
        rates.push(row.into());
    }

    Ok(rates)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub files_imported: usize,
    pub files_skipped: usize,
    pub records_inserted: usize,
}

fn file_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

fn already_imported(conn: &Connection, hash: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM import_log WHERE file_hash = ?1", params![hash], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn log_import(conn: &Connection, hash: &str, source: &str, family: RecordFamily, count: usize) -> Result<()> {
    conn.execute(
        "INSERT INTO import_log (file_hash, source_file, family, record_count, imported_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![hash, source, family.table_name(), count as i64, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn insert_json<T: ReferenceRecord>(conn: &Connection, content: &str) -> Result<usize> {
    let records: Vec<T> = serde_json::from_str(content)
        .with_context(|| format!("Invalid {} JSON", T::FAMILY.table_name()))?;
    insert_records(conn, &records)
}

/// Parse a JSON array of the family's records and store it
pub fn import_json(conn: &Connection, family: RecordFamily, content: &str) -> Result<usize> {
    match family {
        RecordFamily::Handshake => insert_json::<CustomerSecurityHandshakeInfo>(conn, content),
        RecordFamily::Lookup => insert_json::<FareRetailerRuleLookupInfo>(conn, content),
        RecordFamily::RetailerRule => insert_json::<FareRetailerRuleInfo>(conn, content),
        RecordFamily::Security => insert_json::<FareFocusSecurityInfo>(conn, content),
        RecordFamily::AccountCd => insert_json::<FareFocusAccountCdInfo>(conn, content),
        RecordFamily::PsgType => insert_json::<FareFocusPsgTypeInfo>(conn, content),
        RecordFamily::RuleCode => insert_json::<FareFocusRuleCodeInfo>(conn, content),
        RecordFamily::Carrier => insert_json::<FareFocusCarrierInfo>(conn, content),
        RecordFamily::FareClass => insert_json::<FareFocusFareClassInfo>(conn, content),
        RecordFamily::BookingCode => insert_json::<FareFocusBookingCodeInfo>(conn, content),
        RecordFamily::LocationPair => insert_json::<FareFocusLocationPairInfo>(conn, content),
        RecordFamily::DisplayCatType => insert_json::<FareFocusDisplayCatTypeInfo>(conn, content),
        RecordFamily::DaytimeAppl => insert_json::<FareFocusDaytimeApplInfo>(conn, content),
        RecordFamily::RetailerCalc => insert_json::<FareRetailerCalcInfo>(conn, content),
        RecordFamily::ResultingFareAttr => insert_json::<FareRetailerResultingFareAttrInfo>(conn, content),
        RecordFamily::Alliance => insert_json::<AirlineAllianceCarrierInfo>(conn, content),
        RecordFamily::Currency => insert_json::<Currency>(conn, content),
        RecordFamily::Nuc => insert_json::<NucInfo>(conn, content),
        RecordFamily::Bsr => insert_json::<BankerSellRate>(conn, content),
        RecordFamily::Nation => insert_json::<NationInfo>(conn, content),
        RecordFamily::Loc => insert_json::<Loc>(conn, content),
        RecordFamily::Zone => insert_json::<ZoneInfo>(conn, content),
        RecordFamily::VendorType => insert_json::<VendorTypeInfo>(conn, content),
        RecordFamily::FareByRuleItem => insert_json::<FareByRuleItemInfo>(conn, content),
        RecordFamily::BaseFareRule => insert_json::<BaseFareRule>(conn, content),
        RecordFamily::TaxCode => insert_json::<TaxCodeReg>(conn, content),
    }
}

/// Import `<table_name>.json` files and `bsrs.csv` from a directory.
/// A file whose content hash is already in the import log is skipped.
pub fn import_directory(conn: &Connection, dir: &Path) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();
        let (Some(stem), Some(ext)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|s| s.to_str()),
        ) else {
            continue;
        };

        let Some(family) = RecordFamily::from_table_name(stem) else {
            debug!("Skipping unrecognised file {}", path.display());
            continue;
        };

        let content = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let hash = file_hash(&content);
        let source = path.display().to_string();

        if already_imported(conn, &hash)? {
            info!("Already imported: {}", source);
            summary.files_skipped += 1;
            continue;
        }

        let inserted = match (family, ext) {
            (RecordFamily::Bsr, "csv") => insert_records(conn, &load_bsr_csv(content.as_slice())?)?,
            (_, "json") => {
                let text = String::from_utf8(content).with_context(|| format!("{} is not UTF-8", source))?;
                import_json(conn, family, &text)?
            }
            _ => {
                debug!("Skipping {} (unsupported format)", source);
                continue;
            }
        };

        log_import(conn, &hash, &source, family, inserted)?;
        info!("Imported {} records from {}", inserted, source);

        summary.files_imported += 1;
        summary.records_inserted += inserted;
    }

    Ok(summary)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{FareInd, LocKey, LocType, RoundingRule};
    use crate::tables::DataHandle;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_twice_is_idempotent() {
        let conn = conn();
        let rates = vec![
            BankerSellRate::new("USD", "SGD", 1.35),
            BankerSellRate::new("SGD", "USD", 0.74),
        ];

        assert_eq!(insert_records(&conn, &rates).unwrap(), 2);
        assert_eq!(insert_records(&conn, &rates).unwrap(), 0);
        assert_eq!(count_records(&conn, RecordFamily::Bsr).unwrap(), 2);
    }

    #[test]
    fn test_idempotency_hash_depends_on_family() {
        let a = compute_idempotency_hash(RecordFamily::Bsr, "{}");
        let b = compute_idempotency_hash(RecordFamily::Nuc, "{}");

        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_eq!(a, compute_idempotency_hash(RecordFamily::Bsr, "{}"));
    }

    #[test]
    fn test_event_logged_per_insert() {
        let conn = conn();
        insert_records(&conn, &[NucInfo::new("SGD", 1.35, 1.0, RoundingRule::Nearest)]).unwrap();

        let events = get_events_for_entity(&conn, "nucs", "SGD").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "record_added");
        assert_eq!(events[0].actor, "reference_importer");
    }

    #[test]
    fn test_find_records_by_key() {
        let conn = conn();
        let items = vec![
            FareByRuleItemInfo::new(100, FareInd::Calculated, 50.0),
            FareByRuleItemInfo::new(200, FareInd::SelectHighest, 75.0),
        ];
        insert_records(&conn, &items).unwrap();

        let found: Vec<FareByRuleItemInfo> = find_records(&conn, "ATP/200").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].percent, 75.0);
    }

    #[test]
    fn test_load_reference_tables_overlays_defaults() {
        let conn = conn();
        insert_records(&conn, &[BankerSellRate::new("USD", "SGD", 1.35)]).unwrap();
        insert_records(&conn, &[NucInfo::new("SGD", 1.35, 1.0, RoundingRule::Nearest)]).unwrap();

        let tables = load_reference_tables(&conn).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert_eq!(tables.get_bsr("USD", "SGD", date).map(|b| b.rate), Some(1.35));
        assert!(tables.get_nuc("SGD", date).is_some());
        assert!(tables.get_nuc("USD", date).is_some());
    }

    #[test]
    fn test_zones_and_vendor_types_load_into_tables() {
        let conn = conn();
        assert_eq!(
            import_json(&conn, RecordFamily::Zone, r#"[{"zone": "901", "members": [{"loc_type": "N", "loc": "JP"}]}]"#)
                .unwrap(),
            1
        );
        assert_eq!(
            import_json(&conn, RecordFamily::VendorType, r#"[{"vendor": "5KAD", "vendor_type": "T"}]"#).unwrap(),
            1
        );
        assert_eq!(RecordFamily::from_table_name("zones"), Some(RecordFamily::Zone));
        assert_eq!(RecordFamily::from_table_name("vendor_types"), Some(RecordFamily::VendorType));

        let tables = load_reference_tables(&conn).unwrap();
        let zone = LocKey::new(LocType::Zone, "901");

        assert!(tables.is_in_loc("NRT", &zone));
        assert!(!tables.is_in_loc("LHR", &zone));
        assert_eq!(tables.get_vendor_type("5KAD"), Some('T'));
        assert_eq!(tables.get_vendor_type("ATP"), Some('P'));
    }

    #[test]
    fn test_load_bsr_csv() {
        let data = "prime_cur,cur,rate,rate_no_dec,rate_type,effective,discontinue\n\
                    USD,SGD,1.35,4,B,2024-01-01,\n\
                    SGD,USD,0.74,,,,2024-12-31\n";

        let rates = load_bsr_csv(data.as_bytes()).unwrap();

        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].rate_no_dec, 4);
        assert_eq!(rates[0].period.effective, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rates[0].period.discontinue, None);
        assert_eq!(rates[1].rate_type, 'B');
        assert_eq!(rates[1].period.discontinue, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_import_json_rejects_bad_payload() {
        let conn = conn();
        assert!(import_json(&conn, RecordFamily::Nuc, "{\"not\": \"an array\"}").is_err());
        assert_eq!(
            import_json(&conn, RecordFamily::Currency, r#"[{"code": "SGD", "no_dec": 2}]"#).unwrap(),
            1
        );
    }

    #[test]
    fn test_import_directory_skips_seen_files() {
        let dir = std::env::temp_dir().join(format!("atse-import-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("currencies.json"), r#"[{"code": "SGD", "no_dec": 2, "nation": "SG"}]"#).unwrap();
        fs::write(dir.join("bsrs.csv"), "prime_cur,cur,rate,rate_no_dec,rate_type,effective,discontinue\nUSD,SGD,1.35,,,,\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let conn = conn();
        let first = import_directory(&conn, &dir).unwrap();
        let second = import_directory(&conn, &dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(first.files_imported, 2);
        assert_eq!(first.records_inserted, 2);
        assert_eq!(second.files_imported, 0);
        assert_eq!(second.files_skipped, 2);
    }
}
