// 🛎️ Service Layer - JSON request/response shapes shared by the CLI and the API server
//
// Each entry point builds a PricingTrx over the shared reference tables and
// runs one engine operation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::booking_code::{check_segment_status, FareBookingCodeValidator, StatusReturnType};
use crate::currency::{BsrCollectionResults, ConversionApplication, ConversionRequest, CurrencyConversionFacade, Money};
use crate::diagnostic::Diagnostic;
use crate::entities::{BookingCodeStatus, Fare, FareByRuleApp, FareMarket, PaxTypeFare, SegmentStatus};
use crate::error::{PricingError, PricingResult};
use crate::fare_by_rule::FareByRuleController;
use crate::retailer::{FareRetailerRuleContext, FareRetailerRuleValidator};
use crate::tables::DataHandle;
use crate::taxes::{FarePath, TaxProcessor, TaxResponse};
use crate::trx::{Agent, PricingRequest, PricingTrx};

pub type SharedData = Arc<dyn DataHandle + Send + Sync>;

fn default_application_type() -> char {
    'N'
}

// ============================================================================
// RETAILER MATCH
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub agent: Agent,
    pub request: PricingRequest,
    pub market: FareMarket,
    pub fares: Vec<Fare>,

    /// 'N' net, 'R' selling, 'S' adjusted selling
    #[serde(default = "default_application_type")]
    pub application_type: char,

    /// Diagnostic parameters, e.g. "DD=ALL/FM=NYCLON"
    #[serde(default)]
    pub diagnostic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareMatch {
    pub fare_class: String,
    pub carrier: String,
    pub contexts: Vec<FareRetailerRuleContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub trx_id: String,
    pub matches: Vec<FareMatch>,
    pub diagnostic: Vec<String>,
}

/// Retailer rules matching each fare of the request
pub fn run_match(data: SharedData, req: MatchRequest, icer_active: bool) -> PricingResult<MatchResponse> {
    let diagnostic = match req.diagnostic.as_deref() {
        Some(params) => Diagnostic::parse(params)?,
        None => Diagnostic::off(),
    };
    let trx = PricingTrx::new(req.agent, req.request, data)
        .with_diagnostic(diagnostic)
        .with_icer(icer_active);

    let mut validator = FareRetailerRuleValidator::new(&trx);
    let product_cd = trx.request.product_cd.clone();
    let lookups = validator.get_lookup_all_sources(&req.market, &product_cd, req.application_type);

    let matches = req
        .fares
        .into_iter()
        .map(|fare| {
            let ptf = PaxTypeFare::new(fare);
            let contexts = validator.validate(&ptf, &req.market, req.application_type, &lookups);
            FareMatch {
                fare_class: ptf.fare.fare_class.clone(),
                carrier: ptf.fare.carrier.clone(),
                contexts,
            }
        })
        .collect();

    Ok(MatchResponse {
        trx_id: trx.id.clone(),
        matches,
        diagnostic: validator.into_diagnostic().lines().to_vec(),
    })
}

// ============================================================================
// BOOKING CODES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCodeRequest {
    pub agent: Agent,
    pub request: PricingRequest,
    pub market: FareMarket,
    pub fares: Vec<Fare>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCodeResult {
    pub fare_class: String,
    pub valid: bool,
    pub aggregate: StatusReturnType,
    pub booking_code_status: BookingCodeStatus,
    pub segment_status: Vec<SegmentStatus>,
}

/// Prime booking codes of each fare against the booked (or offered) classes
pub fn run_booking_codes(data: SharedData, req: BookingCodeRequest, icer_active: bool) -> PricingResult<Vec<BookingCodeResult>> {
    if req.market.travel_segs.is_empty() {
        return Err(PricingError::InvalidInput("Fare market has no travel segments".to_string()));
    }

    let trx = PricingTrx::new(req.agent, req.request, data).with_icer(icer_active);
    let validator = FareBookingCodeValidator::new(&trx, &req.market);

    Ok(req
        .fares
        .into_iter()
        .map(|fare| {
            let mut ptf = PaxTypeFare::new(fare);
            let valid = validator.validate_fare(&mut ptf);
            BookingCodeResult {
                fare_class: ptf.fare.fare_class.clone(),
                valid,
                aggregate: check_segment_status(&ptf, &req.market),
                booking_code_status: ptf.booking_code_status,
                segment_status: ptf.segment_status,
            }
        })
        .collect())
}

// ============================================================================
// FARE BY RULE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareByRuleRequest {
    pub agent: Agent,
    pub request: PricingRequest,
    pub market: FareMarket,

    /// Record 8
    pub app: FareByRuleApp,

    /// Record 3 item number, read from the reference tables under the app's vendor
    pub item_no: u64,

    /// Base fares of the market
    #[serde(default)]
    pub fares: Vec<Fare>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareByRuleResponse {
    pub trx_id: String,
    pub app_applies: bool,
    pub fares: Vec<PaxTypeFare>,
}

/// Fares created by one fare-by-rule record 8 / record 3 pair
pub fn run_fare_by_rule(data: SharedData, req: FareByRuleRequest, icer_active: bool) -> PricingResult<FareByRuleResponse> {
    let trx = PricingTrx::new(req.agent, req.request, data).with_icer(icer_active);
    let controller = FareByRuleController::new(&trx, &req.market);

    if !controller.app_matches_market(&req.app) {
        return Ok(FareByRuleResponse {
            trx_id: trx.id.clone(),
            app_applies: false,
            fares: Vec::new(),
        });
    }

    let item = trx
        .data()
        .get_fare_by_rule_item(&req.app.vendor, req.item_no, trx.ticket_date())
        .ok_or_else(|| {
            PricingError::InvalidInput(format!("Fare by rule item {}/{} not found", req.app.vendor, req.item_no))
        })?;

    let base_fares: Vec<PaxTypeFare> = req.fares.into_iter().map(PaxTypeFare::new).collect();
    let fares = controller.process(&req.app, &item, &base_fares)?;

    Ok(FareByRuleResponse {
        trx_id: trx.id.clone(),
        app_applies: true,
        fares,
    })
}

// ============================================================================
// CURRENCY CONVERSION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub agent: Agent,
    pub ticket_date: NaiveDate,
    pub amount: f64,
    pub from: String,
    pub to: String,

    #[serde(default)]
    pub application: ConversionApplication,

    #[serde(default)]
    pub no_rounding: bool,
}

pub fn run_convert(data: SharedData, req: ConvertRequest, icer_active: bool) -> PricingResult<BsrCollectionResults> {
    let trx = PricingTrx::new(req.agent, PricingRequest::new(req.ticket_date), data).with_icer(icer_active);

    let mut conversion = ConversionRequest::new(Money::new(req.amount, &req.from), &req.to, req.ticket_date);
    conversion.application = req.application;
    conversion.round = !req.no_rounding;

    CurrencyConversionFacade::new(&trx).convert_with_results(&conversion)
}

// ============================================================================
// TAXES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRequest {
    pub agent: Agent,
    pub request: PricingRequest,
    pub fare_path: FarePath,
}

pub fn run_taxes(data: SharedData, req: TaxRequest, icer_active: bool) -> PricingResult<TaxResponse> {
    let trx = PricingTrx::new(req.agent, req.request, data).with_icer(icer_active);
    TaxProcessor::new(&trx).process(&req.fare_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{FareByRuleItemInfo, FareInd, TaxCodeReg, TravelSeg};
    use crate::tables::ReferenceTables;

    fn data(tables: ReferenceTables) -> SharedData {
        Arc::new(tables)
    }

    fn match_request_json() -> serde_json::Value {
        serde_json::json!({
            "agent": {"branch_pcc": "B2C3", "location": "DFW", "currency": "USD"},
            "request": {"ticket_date": "2024-06-01"},
            "market": {
                "origin": "JFK",
                "destination": "LHR",
                "governing_carrier": "BA",
                "geo_travel_type": "International",
                "travel_segs": []
            },
            "fares": [{
                "vendor": "ATP",
                "carrier": "BA",
                "market1": "NYC",
                "market2": "LON",
                "fare_class": "YOWUS",
                "fare_tariff": 1,
                "rule_number": "2000",
                "fare_type": "XEX",
                "currency": "USD",
                "amount": 800.0,
                "nuc_amount": 800.0,
                "owrt": "1",
                "directionality": "F",
                "tariff_category": "Public",
                "global_direction": "AT",
                "prime_booking_codes": ["Y"],
                "cabin": "Y",
                "industry": false
            }]
        })
    }

    #[test]
    fn test_match_without_handshake_returns_empty_contexts() {
        let req: MatchRequest = serde_json::from_value(match_request_json()).unwrap();
        assert_eq!(req.application_type, 'N');

        let response = run_match(data(ReferenceTables::with_defaults()), req, true).unwrap();

        assert_eq!(response.matches.len(), 1);
        assert_eq!(response.matches[0].fare_class, "YOWUS");
        assert!(response.matches[0].contexts.is_empty());
        assert!(response.diagnostic.is_empty());
    }

    #[test]
    fn test_match_collects_diagnostic_when_requested() {
        let mut json = match_request_json();
        json["diagnostic"] = serde_json::json!("DD=LOOKUP");
        let req: MatchRequest = serde_json::from_value(json).unwrap();

        let response = run_match(data(ReferenceTables::with_defaults()), req, true).unwrap();

        assert!(response
            .diagnostic
            .iter()
            .any(|line| line == "SECURITY HANDSHAKE NOT FOUND FOR PCC B2C3"));
    }

    #[test]
    fn test_match_rejects_bad_diagnostic() {
        let mut json = match_request_json();
        json["diagnostic"] = serde_json::json!("DD=NOPE");
        let req: MatchRequest = serde_json::from_value(json).unwrap();

        assert!(run_match(data(ReferenceTables::with_defaults()), req, true).is_err());
    }

    #[test]
    fn test_convert_same_currency() {
        let req: ConvertRequest = serde_json::from_value(serde_json::json!({
            "agent": {"branch_pcc": "B2C3", "location": "JFK", "currency": "USD"},
            "ticket_date": "2024-06-01",
            "amount": 125.0,
            "from": "USD",
            "to": "USD"
        }))
        .unwrap();

        let results = run_convert(data(ReferenceTables::with_defaults()), req, true).unwrap();
        assert_eq!(results.converted_amount, 125.0);
    }

    #[test]
    fn test_convert_to_nuc() {
        let req = ConvertRequest {
            agent: Agent::new("B2C3", "", "LHR", "GBP"),
            ticket_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            amount: 79.0,
            from: "GBP".to_string(),
            to: "NUC".to_string(),
            application: ConversionApplication::Pricing,
            no_rounding: false,
        };

        let results = run_convert(data(ReferenceTables::with_defaults()), req, true).unwrap();
        assert!((results.converted_amount - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_taxes_through_service() {
        let tables = ReferenceTables::with_defaults();
        tables.register_tax_code(TaxCodeReg::percentage("US1", "US", 0.075));

        let req: TaxRequest = serde_json::from_value(serde_json::json!({
            "agent": {"branch_pcc": "B2C3", "location": "JFK", "currency": "USD"},
            "request": {"ticket_date": "2024-06-01"},
            "fare_path": {
                "currency": "USD",
                "validating_carrier": "AA",
                "travel_segs": [
                    serde_json::to_value(TravelSeg::air(
                        "JFK", "LAX", "AA", "Y", NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
                    )).unwrap()
                ],
                "fare_usages": [{"fare_amount": 300.0, "start_seg": 0, "end_seg": 0}]
            }
        }))
        .unwrap();

        let response = run_taxes(data(tables), req, true).unwrap();

        assert_eq!(response.find("US1").len(), 1);
        assert_eq!(response.find("US1")[0].tax_amount, 22.5);
    }

    fn market_json(booking_code: &str) -> serde_json::Value {
        serde_json::json!({
            "origin": "JFK",
            "destination": "LHR",
            "board_multi_city": "NYC",
            "off_multi_city": "LON",
            "governing_carrier": "BA",
            "geo_travel_type": "International",
            "travel_segs": [{
                "origin": "JFK",
                "destination": "LHR",
                "carrier": "BA",
                "booking_code": booking_code,
                "booked_cabin": "Y",
                "departure_date": "2024-07-01"
            }]
        })
    }

    fn fare_json(fare_class: &str, prime: &str, amount: f64) -> serde_json::Value {
        let mut fare = match_request_json()["fares"][0].clone();
        fare["fare_class"] = serde_json::json!(fare_class);
        fare["prime_booking_codes"] = serde_json::json!([prime]);
        fare["amount"] = serde_json::json!(amount);
        fare["nuc_amount"] = serde_json::json!(amount);
        fare
    }

    #[test]
    fn test_booking_codes_per_fare() {
        let req: BookingCodeRequest = serde_json::from_value(serde_json::json!({
            "agent": {"branch_pcc": "B2C3", "location": "DFW", "currency": "USD"},
            "request": {"ticket_date": "2024-06-01"},
            "market": market_json("Y"),
            "fares": [fare_json("YOWUS", "Y", 800.0), fare_json("JOWUS", "J", 2400.0)]
        }))
        .unwrap();

        let results = run_booking_codes(data(ReferenceTables::with_defaults()), req, true).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].fare_class, "YOWUS");
        assert!(results[0].valid);
        assert_eq!(results[0].aggregate, StatusReturnType::Pass);
        assert!(results[0].booking_code_status.is_set(BookingCodeStatus::PASS));
        assert_eq!(results[0].segment_status.len(), 1);

        assert!(!results[1].valid);
        assert_eq!(results[1].aggregate, StatusReturnType::Fail);
        assert!(results[1].booking_code_status.is_set(BookingCodeStatus::FAIL));
    }

    #[test]
    fn test_booking_codes_reject_empty_market() {
        let mut market = market_json("Y");
        market["travel_segs"] = serde_json::json!([]);
        let req: BookingCodeRequest = serde_json::from_value(serde_json::json!({
            "agent": {"branch_pcc": "B2C3", "location": "DFW", "currency": "USD"},
            "request": {"ticket_date": "2024-06-01"},
            "market": market,
            "fares": [fare_json("YOWUS", "Y", 800.0)]
        }))
        .unwrap();

        assert!(matches!(
            run_booking_codes(data(ReferenceTables::with_defaults()), req, true),
            Err(PricingError::InvalidInput(_))
        ));
    }

    fn fare_by_rule_json(market1: &str) -> serde_json::Value {
        serde_json::json!({
            "agent": {"branch_pcc": "B2C3", "location": "DFW", "currency": "USD"},
            "request": {"ticket_date": "2024-06-01"},
            "market": market_json("Y"),
            "app": {
                "vendor": "ATP",
                "carrier": "BA",
                "rule_tariff": 25,
                "rule_no": "FB01",
                "account_code": "CORP1",
                "market1": market1,
                "market2": "LON"
            },
            "item_no": 100,
            "fares": [fare_json("YOWUS", "Y", 1000.0), fare_json("BOWUS", "B", 700.0)]
        })
    }

    fn fare_by_rule_tables() -> ReferenceTables {
        let tables = ReferenceTables::with_defaults();
        let mut item = FareByRuleItemInfo::new(100, FareInd::Calculated, 50.0);
        item.base_fare_class = "Y-".to_string();
        tables.register_fare_by_rule_item(item);
        tables
    }

    #[test]
    fn test_fare_by_rule_creates_calculated_fares() {
        let req: FareByRuleRequest = serde_json::from_value(fare_by_rule_json("NYC")).unwrap();

        let response = run_fare_by_rule(data(fare_by_rule_tables()), req, true).unwrap();

        assert!(response.app_applies);
        assert_eq!(response.fares.len(), 1);
        assert!(response.fares[0].fare_by_rule);
        assert_eq!(response.fares[0].fare.amount, 500.0);
    }

    #[test]
    fn test_fare_by_rule_other_market_creates_nothing() {
        let req: FareByRuleRequest = serde_json::from_value(fare_by_rule_json("PAR")).unwrap();

        let response = run_fare_by_rule(data(fare_by_rule_tables()), req, true).unwrap();

        assert!(!response.app_applies);
        assert!(response.fares.is_empty());
    }

    #[test]
    fn test_fare_by_rule_unknown_item() {
        let mut json = fare_by_rule_json("NYC");
        json["item_no"] = serde_json::json!(404);
        let req: FareByRuleRequest = serde_json::from_value(json).unwrap();

        assert!(matches!(
            run_fare_by_rule(data(fare_by_rule_tables()), req, true),
            Err(PricingError::InvalidInput(_))
        ));
    }
}
