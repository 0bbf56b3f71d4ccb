// ATSE Pricing Engine - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod error;
pub mod entities;       // Reference rows and transaction-scoped records
pub mod tables;         // DataHandle + in-memory reference tables
pub mod trx;            // Pricing transaction
pub mod diagnostic;     // Retailer rule diagnostics
pub mod rule_util;      // Shared fare/rule matchers
pub mod retailer;       // Fare retailer rule validation
pub mod booking_code;   // Booking code validation
pub mod fare_by_rule;   // Category 25 fare creation
pub mod currency;       // NUC/BSR conversion
pub mod taxes;          // Tax calculation
pub mod db;             // SQLite reference store
pub mod service;        // JSON entry points for CLI + API

// Re-export commonly used types
pub use config::{init_tracing, EngineConfig};
pub use error::{PricingError, PricingResult};
pub use tables::{DataHandle, ReferenceTables};
pub use trx::{Agent, PricingRequest, PricingTrx};
pub use diagnostic::{Diagnostic, DisplayDetail};
pub use retailer::{FareRetailerRuleContext, FareRetailerRuleValidator, StatusFRRuleValidation};
pub use booking_code::{check_segment_status, FareBookingCodeValidator, StatusReturnType};
pub use fare_by_rule::FareByRuleController;
pub use currency::{
    BsrCollectionResults, BsrConverter, ConversionApplication, ConversionRequest,
    CurrencyConversionFacade, Money, NucConverter,
};
pub use taxes::{FarePath, FareUsage, TaxItem, TaxProcessor, TaxResponse};
pub use db::{
    Event, ImportSummary, RecordFamily, ReferenceRecord,
    setup_database, insert_records, load_records, find_records, count_records,
    load_reference_tables, import_directory, import_json, insert_event, get_events_for_entity,
};
pub use service::{
    BookingCodeRequest, BookingCodeResult, ConvertRequest, FareByRuleRequest, FareByRuleResponse,
    MatchRequest, MatchResponse, FareMatch, TaxRequest, SharedData,
    run_booking_codes, run_convert, run_fare_by_rule, run_match, run_taxes,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
