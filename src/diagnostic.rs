// 🔍 Diagnostics - fare retailer rule trace collector
//
// Parsed from a request string such as "DD=ALL/FM=NYCLON/RL=2000/FC=Y/AP=NET/ID=7".
// DD picks what is printed; the other keys filter which fares and rules are traced.

use serde::{Deserialize, Serialize};

use crate::entities::{FareMarket, FareRetailerRuleInfo, FareRetailerRuleLookupInfo, PaxTypeFare};
use crate::error::{PricingError, PricingResult};

// ============================================================================
// DISPLAY DETAIL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayDetail {
    /// Rule summary and status for every evaluated rule
    Info,
    /// Full rule detail and status for every evaluated rule
    All,
    /// Passing rules only, or a single "no rule matched" line
    Short,
    /// Source PCC and lookup resolution
    Lookup,
}

impl DisplayDetail {
    pub fn from_str(value: &str) -> Option<DisplayDetail> {
        match value {
            "INFO" => Some(DisplayDetail::Info),
            "ALL" => Some(DisplayDetail::All),
            "SHORT" => Some(DisplayDetail::Short),
            "LOOKUP" => Some(DisplayDetail::Lookup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DisplayDetail::Info => "INFO",
            DisplayDetail::All => "ALL",
            DisplayDetail::Short => "SHORT",
            DisplayDetail::Lookup => "LOOKUP",
        }
    }
}

impl Default for DisplayDetail {
    fn default() -> Self {
        DisplayDetail::Info
    }
}

// ============================================================================
// COLLECTOR
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostic {
    pub active: bool,
    pub detail: DisplayDetail,

    /// Board + off city ("NYCLON")
    pub fare_market: Option<String>,
    pub rule_number: Option<String>,
    pub fare_class: Option<String>,

    /// NET, SEL or ADJ
    pub application: Option<String>,

    /// Fare retailer rule id
    pub identification: Option<String>,

    /// Application filter currently suppresses output
    #[serde(skip)]
    suspended: bool,

    lines: Vec<String>,
}

impl Diagnostic {
    /// Inactive collector
    pub fn off() -> Self {
        Diagnostic::default()
    }

    /// Parse "KEY=VALUE/KEY=VALUE" parameters and activate
    pub fn parse(params: &str) -> PricingResult<Self> {
        let mut diag = Diagnostic {
            active: true,
            ..Diagnostic::default()
        };

        for param in params.split('/').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = param
                .split_once('=')
                .ok_or_else(|| PricingError::InvalidInput(format!("Bad diagnostic parameter: {}", param)))?;

            match key {
                "DD" => {
                    diag.detail = DisplayDetail::from_str(value).ok_or_else(|| {
                        PricingError::InvalidInput(format!("Unknown display detail: {}", value))
                    })?
                }
                "FM" => {
                    if value.len() != 6 {
                        return Err(PricingError::InvalidInput(format!(
                            "Fare market filter must be 6 characters: {}",
                            value
                        )));
                    }
                    diag.fare_market = Some(value.to_string());
                }
                "RL" => diag.rule_number = Some(value.to_string()),
                "FC" => diag.fare_class = Some(value.to_string()),
                "AP" => diag.application = Some(value.to_string()),
                "ID" => diag.identification = Some(value.to_string()),
                _ => {
                    return Err(PricingError::InvalidInput(format!(
                        "Unknown diagnostic parameter: {}",
                        key
                    )))
                }
            }
        }

        Ok(diag)
    }

    pub fn is_active(&self) -> bool {
        self.active && !self.suspended
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    pub fn add(&mut self, line: impl Into<String>) {
        if self.is_active() {
            self.lines.push(line.into());
        }
    }

    // ========================================================================
    // FILTERS
    // ========================================================================

    /// Fare market filter: board/off city against market points or multi-cities
    pub fn matches_fare_market(&self, market: &FareMarket) -> bool {
        let Some(filter) = self.fare_market.as_deref() else {
            return true;
        };
        let (board, off) = filter.split_at(3);

        (market.origin == board || market.board_multi_city == board)
            && (market.destination == off || market.off_multi_city == off)
    }

    /// Rule number / fare class filters
    pub fn matches_fare(&self, ptf: &PaxTypeFare) -> bool {
        if let Some(rule) = self.rule_number.as_deref() {
            if rule != ptf.fare.rule_number {
                return false;
            }
        }
        if let Some(fare_class) = self.fare_class.as_deref() {
            if fare_class != ptf.fare.fare_class {
                return false;
            }
        }
        true
    }

    /// Suspend output unless the application type filter names this application
    pub fn apply_application_filter(&mut self, application_type: char) {
        let Some(filter) = self.application.as_deref() else {
            return;
        };

        let matched = matches!(
            (filter, application_type),
            ("NET", 'N') | ("NET", 'D') | ("SEL", 'R') | ("ADJ", 'S')
        );
        self.suspended = !matched;
    }

    fn matches_identification(&self, rule: &FareRetailerRuleInfo) -> bool {
        match self.identification.as_deref() {
            Some(id) => id == rule.fare_retailer_rule_id.to_string(),
            None => true,
        }
    }

    // ========================================================================
    // PRINTING
    // ========================================================================

    pub fn print_fare(&mut self, ptf: &PaxTypeFare) {
        let line = format!(
            "{} {}-{} {} R{} T{} {:.2} {}",
            ptf.fare.carrier,
            ptf.fare.market1,
            ptf.fare.market2,
            ptf.fare.fare_class,
            ptf.fare.rule_number,
            ptf.fare.fare_tariff,
            ptf.fare.amount,
            ptf.fare.currency
        );
        self.add(line);
    }

    pub fn print_lookup_header(&mut self, lookup: &FareRetailerRuleLookupInfo) {
        if matches!(self.detail, DisplayDetail::Info | DisplayDetail::Short) {
            return;
        }
        let line = format!(
            "LOOKUP APPL {} SOURCE PCC {} PCC {} RULES {}",
            lookup.application_type,
            lookup.source_pcc,
            lookup.pcc,
            lookup.rule_ids.len()
        );
        self.add(line);
    }

    pub fn print_security_handshake_not_found(&mut self, pcc: &str) {
        if self.detail == DisplayDetail::Lookup {
            self.add(format!("SECURITY HANDSHAKE NOT FOUND FOR PCC {}", pcc));
        }
    }

    pub fn print_source_pcc(&mut self, source_pcc: &str, pcc: &str) {
        if self.detail == DisplayDetail::Lookup {
            self.add(format!("SOURCE PCC {} FOR PCC {}", source_pcc, pcc));
        }
    }

    /// One evaluated rule with its status code
    pub fn print_rule(&mut self, rule: &FareRetailerRuleInfo, status: &str, passed: bool) {
        match self.detail {
            DisplayDetail::Short if !passed => {}
            DisplayDetail::Info | DisplayDetail::All => {
                if !self.matches_identification(rule) {
                    return;
                }
                let mut line = format!(
                    "RULE ID {} SEQ {} SOURCE PCC {} VENDOR {}",
                    rule.fare_retailer_rule_id, rule.rule_seq_no, rule.source_pcc, rule.vendor
                );
                if self.detail == DisplayDetail::All {
                    line.push_str(&format!(
                        " TARIFF {} FARE TYPE {} OWRT {} DISPLAY {}",
                        rule.rule_tariff, rule.fare_type, rule.owrt, rule.display_cat_type
                    ));
                }
                self.add(line);
                self.add(format!("  STATUS {}", status));
            }
            _ => {
                let line = format!(
                    "RULE ID {} SEQ {} {}",
                    rule.fare_retailer_rule_id, rule.rule_seq_no, status
                );
                self.add(line);
            }
        }
    }

    pub fn print_status(&mut self, status: &str) {
        self.add(format!("STATUS {}", status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{GeoTravelType, FareRetailerRuleInfo};

    #[test]
    fn test_parse_parameters() {
        let diag = Diagnostic::parse("DD=ALL/FM=NYCLON/RL=2000/AP=NET/ID=7").unwrap();

        assert!(diag.is_active());
        assert_eq!(diag.detail, DisplayDetail::All);
        assert_eq!(diag.fare_market.as_deref(), Some("NYCLON"));
        assert_eq!(diag.rule_number.as_deref(), Some("2000"));
        assert_eq!(diag.identification.as_deref(), Some("7"));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Diagnostic::parse("DD=VERBOSE").is_err());
        assert!(Diagnostic::parse("FM=NYC").is_err());
        assert!(Diagnostic::parse("XX=1").is_err());
        assert!(Diagnostic::parse("DD").is_err());
    }

    #[test]
    fn test_fare_market_filter_uses_multi_city() {
        let diag = Diagnostic::parse("FM=NYCLON").unwrap();
        let market = FareMarket::new("JFK", "LHR", "BA", GeoTravelType::International, vec![])
            .with_multi_cities("NYC", "LON");
        let other = FareMarket::new("JFK", "CDG", "AF", GeoTravelType::International, vec![])
            .with_multi_cities("NYC", "PAR");

        assert!(diag.matches_fare_market(&market));
        assert!(!diag.matches_fare_market(&other));
        assert!(Diagnostic::off().matches_fare_market(&other));
    }

    #[test]
    fn test_application_filter_suspends_output() {
        let mut diag = Diagnostic::parse("AP=SEL").unwrap();

        diag.apply_application_filter('N');
        diag.add("hidden");
        assert!(diag.lines().is_empty());

        diag.apply_application_filter('R');
        diag.add("shown");
        assert_eq!(diag.lines(), ["shown".to_string()]);
    }

    #[test]
    fn test_short_prints_only_passing_rules() {
        let mut diag = Diagnostic::parse("DD=SHORT").unwrap();
        let rule = FareRetailerRuleInfo::open(7, 10, "A0B1", "ATP");

        diag.print_rule(&rule, "FAIL_FR_VENDOR", false);
        assert!(diag.lines().is_empty());

        diag.print_rule(&rule, "PASS_FR", true);
        assert_eq!(diag.lines().len(), 1);
        assert!(diag.output().contains("PASS_FR"));
    }

    #[test]
    fn test_identification_filter() {
        let mut diag = Diagnostic::parse("DD=INFO/ID=8").unwrap();

        diag.print_rule(&FareRetailerRuleInfo::open(7, 10, "A0B1", "ATP"), "PASS_FR", true);
        assert!(diag.lines().is_empty());

        diag.print_rule(&FareRetailerRuleInfo::open(8, 10, "A0B1", "ATP"), "PASS_FR", true);
        assert_eq!(diag.lines().len(), 2);
    }

    #[test]
    fn test_inactive_collects_nothing() {
        let mut diag = Diagnostic::off();
        diag.add("line");
        assert!(diag.output().is_empty());
    }
}
