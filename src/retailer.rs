// 🏪 Fare Retailer Rule Validator - which retailer rule applies to a fare
//
// 1. Resolve source PCCs through the customer security handshake (branch PCC,
//    then home PCC) and collect their rule lookups.
// 2. For each lookup, walk its rules in sequence order and run the predicate
//    chain. The first rule passing every predicate wins for that lookup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostic::{Diagnostic, DisplayDetail};
use crate::entities::{
    is_alliance_code, Directionality, FareFocusSecurityInfo, FareMarket, FareRetailerCalcInfo,
    FareRetailerResultingFareAttrInfo, FareRetailerRuleInfo, FareRetailerRuleLookupId,
    FareRetailerRuleLookupInfo, GeoTravelType, LocKey, LocType, PaxTypeFare, PseudoCityType,
    TariffCategory,
};
use crate::rule_util;
use crate::tables::{DataHandle, SMF_VENDOR_TYPE};
use crate::trx::PricingTrx;

/// Vendor code of carrier-filed data usable across SMF vendors
pub const DFF_VENDOR: &str = "DFF";

/// Carrier code of industry fares
pub const INDUSTRY_CARRIER: &str = "YY";

// ============================================================================
// VALIDATION STATUS
// ============================================================================

/// Outcome of one rule: pass, or the first predicate that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFRRuleValidation {
    PassFr,
    FailFrSecurity,
    FailFrAccountCd,
    FailFrPassengerTypeCode,
    FailFrVendor,
    FailFrRuleTariff,
    FailFrRule,
    FailFrCarrier,
    FailFrFareType,
    FailFrPublicPrivate,
    FailFrBookingCode,
    FailFrMatchTravelDateRangeX5,
    FailFrGeo,
    FailFrDirectionality,
    FailFrExcludeGeo,
    FailFrFareClass,
    FailFrExcludeFareClass,
    FailFrMatchOwrt,
    FailFrCat35DisplayType,
    FailFrExcludeDct,
    FailFrMatchRetailerCode,
    /// No rule of any lookup matched
    FailFrAll,
}

impl StatusFRRuleValidation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFRRuleValidation::PassFr => "PASS_FR",
            StatusFRRuleValidation::FailFrSecurity => "FAIL_FR_SECURITY",
            StatusFRRuleValidation::FailFrAccountCd => "FAIL_FR_ACCOUNTCD",
            StatusFRRuleValidation::FailFrPassengerTypeCode => "FAIL_FR_PASSENGERTYPECODE",
            StatusFRRuleValidation::FailFrVendor => "FAIL_FR_VENDOR",
            StatusFRRuleValidation::FailFrRuleTariff => "FAIL_FR_RULE_TARIFF",
            StatusFRRuleValidation::FailFrRule => "FAIL_FR_RULE",
            StatusFRRuleValidation::FailFrCarrier => "FAIL_FR_CARRIER",
            StatusFRRuleValidation::FailFrFareType => "FAIL_FR_FARE_TYPE",
            StatusFRRuleValidation::FailFrPublicPrivate => "FAIL_FR_PUBLIC_PRIVATE",
            StatusFRRuleValidation::FailFrBookingCode => "FAIL_FR_BOOKING_CODE",
            StatusFRRuleValidation::FailFrMatchTravelDateRangeX5 => "FAIL_FR_MATCH_TRAVEL_DATE_RANGE_X5",
            StatusFRRuleValidation::FailFrGeo => "FAIL_FR_GEO",
            StatusFRRuleValidation::FailFrDirectionality => "FAIL_FR_DIRECTIONALITY",
            StatusFRRuleValidation::FailFrExcludeGeo => "FAIL_FR_EXCLUDE_GEO",
            StatusFRRuleValidation::FailFrFareClass => "FAIL_FR_FARE_CLASS",
            StatusFRRuleValidation::FailFrExcludeFareClass => "FAIL_FR_EXCLUDE_FARE_CLASS",
            StatusFRRuleValidation::FailFrMatchOwrt => "FAIL_FR_MATCH_OWRT",
            StatusFRRuleValidation::FailFrCat35DisplayType => "FAIL_FR_CAT35_DISPLAY_TYPE",
            StatusFRRuleValidation::FailFrExcludeDct => "FAIL_FR_EXCLUDE_DCT",
            StatusFRRuleValidation::FailFrMatchRetailerCode => "FAIL_FR_MATCH_RETAILERCODE",
            StatusFRRuleValidation::FailFrAll => "FAIL_FR_ALL",
        }
    }

    pub fn is_pass(&self) -> bool {
        *self == StatusFRRuleValidation::PassFr
    }
}

// ============================================================================
// MATCHED RULE CONTEXT
// ============================================================================

/// A matched rule with the tables it points at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareRetailerRuleContext {
    pub source_pcc: String,
    pub rule: FareRetailerRuleInfo,
    pub calc: Option<FareRetailerCalcInfo>,
    pub resulting_fare_attr: Option<FareRetailerResultingFareAttrInfo>,
    pub security: Option<FareFocusSecurityInfo>,
}

// ============================================================================
// LOOKUP MERGE
// ============================================================================

/// Merge two rule id lists ordered by sequence number; equal sequence numbers keep the first
fn merge_rule_ids(
    first: &[FareRetailerRuleLookupId],
    second: &[FareRetailerRuleLookupId],
) -> Vec<FareRetailerRuleLookupId> {
    let mut merged: Vec<FareRetailerRuleLookupId> = first.iter().chain(second).copied().collect();
    // Stable: on ties the entry from `first` stays ahead
    merged.sort_by_key(|id| id.rule_seq_no);
    merged.dedup_by_key(|id| id.rule_seq_no);
    merged
}

/// Merge home-PCC lookups into branch-PCC lookups.
/// Same source PCC: rule lists merged. Unmatched home lookups are appended.
pub fn merge_lookups(
    branch: Vec<FareRetailerRuleLookupInfo>,
    home: Vec<FareRetailerRuleLookupInfo>,
) -> Vec<FareRetailerRuleLookupInfo> {
    if branch.is_empty() {
        return home;
    }

    let mut matched_home = vec![false; home.len()];
    let mut merged = Vec::with_capacity(branch.len() + home.len());

    for lookup in branch {
        match home.iter().position(|h| h.source_pcc == lookup.source_pcc) {
            Some(pos) => {
                matched_home[pos] = true;
                let rule_ids = merge_rule_ids(&lookup.rule_ids, &home[pos].rule_ids);
                merged.push(FareRetailerRuleLookupInfo { rule_ids, ..lookup });
            }
            None => merged.push(lookup),
        }
    }

    merged.extend(
        home.into_iter()
            .zip(matched_home)
            .filter(|(_, matched)| !matched)
            .map(|(lookup, _)| lookup),
    );

    merged
}

// ============================================================================
// PASSENGER TYPE GROUPS
// ============================================================================

fn is_adult(pax_type: &str) -> bool {
    matches!(pax_type, "" | "ADT" | "SRC" | "MIL" | "GOV" | "STU" | "YTH" | "JCB" | "NEG")
}

fn is_child(pax_type: &str) -> bool {
    if matches!(pax_type, "CNN" | "CHD" | "JNN" | "UNN") {
        return true;
    }
    // Child with age: C05, C11
    pax_type.len() == 3
        && pax_type.starts_with('C')
        && pax_type[1..].chars().all(|c| c.is_ascii_digit())
}

fn is_infant(pax_type: &str) -> bool {
    matches!(pax_type, "INF" | "INS" | "JNF" | "JNS")
}

// ============================================================================
// VALIDATOR
// ============================================================================

pub struct FareRetailerRuleValidator<'a> {
    trx: &'a PricingTrx,
    adjusted_ticket_date: NaiveDate,
    diag: Diagnostic,
}

impl<'a> FareRetailerRuleValidator<'a> {
    pub fn new(trx: &'a PricingTrx) -> Self {
        FareRetailerRuleValidator {
            trx,
            adjusted_ticket_date: trx.ticket_date(),
            diag: trx.diagnostic.clone(),
        }
    }

    fn data(&self) -> &'a dyn DataHandle {
        self.trx.data()
    }

    /// Diagnostic output collected so far
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diag
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        self.diag
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    /// Rule lookups visible to the agent: branch PCC sources merged with home PCC sources
    pub fn get_lookup_all_sources(
        &mut self,
        market: &FareMarket,
        product_cd: &str,
        application_type: char,
    ) -> Vec<FareRetailerRuleLookupInfo> {
        self.diag.apply_application_filter(application_type);

        let trx = self.trx;
        let agent = &trx.agent;
        let mut lookups = self.get_lookup_sources(&agent.branch_pcc, product_cd, application_type);

        if agent.has_distinct_home() {
            let home = self.get_lookup_sources(&agent.home_pcc, product_cd, application_type);
            if !home.is_empty() {
                lookups = merge_lookups(lookups, home);
            }
        }

        if self.diag.detail == DisplayDetail::Lookup {
            for lookup in &lookups {
                self.diag.print_lookup_header(lookup);
            }
        }

        debug!(
            "{} rule lookups for {} market {}-{} (appl {})",
            lookups.len(),
            agent.branch_pcc,
            market.origin,
            market.destination,
            application_type
        );

        lookups
    }

    fn get_lookup_sources(
        &mut self,
        pcc: &str,
        product_cd: &str,
        application_type: char,
    ) -> Vec<FareRetailerRuleLookupInfo> {
        let handshakes = self
            .data()
            .get_customer_security_handshake(product_cd, pcc, self.adjusted_ticket_date);

        if handshakes.is_empty() {
            self.diag.print_security_handshake_not_found(pcc);
            return Vec::new();
        }

        let mut lookups = Vec::new();
        for handshake in handshakes {
            self.diag.print_source_pcc(&handshake.security_target_pcc, pcc);
            if let Some(lookup) = self.data().get_fare_retailer_rule_lookup(
                application_type,
                &handshake.security_target_pcc,
                pcc,
            ) {
                lookups.push(lookup);
            }
        }
        lookups
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// First matching rule of every lookup. Empty = no retailer rule applies.
    pub fn validate(
        &mut self,
        ptf: &PaxTypeFare,
        market: &FareMarket,
        application_type: char,
        lookups: &[FareRetailerRuleLookupInfo],
    ) -> Vec<FareRetailerRuleContext> {
        let mut contexts = Vec::new();

        if self.diag.is_active() {
            if !self.diag.matches_fare_market(market) {
                return contexts;
            }
            self.diag.apply_application_filter(application_type);
            if !self.diag.matches_fare(ptf) {
                return contexts;
            }
            self.diag.print_fare(ptf);
        }

        let date = self.adjusted_ticket_date;

        for lookup in lookups {
            self.diag.print_lookup_header(lookup);

            for id in &lookup.rule_ids {
                let Some(rule) = self.data().get_fare_retailer_rule(id.fare_retailer_rule_id, date) else {
                    continue;
                };
                let security = self.data().get_fare_focus_security(rule.security_item_no, date);

                if self.is_fare_retailer_rule_match(ptf, market, &rule, security.as_ref()) {
                    contexts.push(FareRetailerRuleContext {
                        source_pcc: lookup.source_pcc.clone(),
                        calc: self.data().get_fare_retailer_calc(rule.fare_retailer_calc_item_no, date),
                        resulting_fare_attr: self
                            .data()
                            .get_resulting_fare_attr(rule.resulting_fare_attr_item_no, date),
                        rule,
                        security,
                    });
                    break;
                }
            }
        }

        if contexts.is_empty() && self.diag.detail == DisplayDetail::Short {
            self.diag.print_status(StatusFRRuleValidation::FailFrAll.as_str());
        }

        contexts
    }

    /// Lookups plus validation in one call
    pub fn match_fare(
        &mut self,
        ptf: &PaxTypeFare,
        market: &FareMarket,
        application_type: char,
    ) -> Vec<FareRetailerRuleContext> {
        let product_cd = self.trx.request.product_cd.clone();
        let lookups = self.get_lookup_all_sources(market, &product_cd, application_type);
        self.validate(ptf, market, application_type, &lookups)
    }

    /// Run the predicate chain and record the result in diagnostics
    pub fn is_fare_retailer_rule_match(
        &mut self,
        ptf: &PaxTypeFare,
        market: &FareMarket,
        rule: &FareRetailerRuleInfo,
        security: Option<&FareFocusSecurityInfo>,
    ) -> bool {
        let status = self.rule_status(ptf, market, rule, security);

        debug!(
            "rule {} seq {}: {}",
            rule.fare_retailer_rule_id,
            rule.rule_seq_no,
            status.as_str()
        );
        self.diag.print_rule(rule, status.as_str(), status.is_pass());

        status.is_pass()
    }

    /// First failing predicate, in fixed order
    pub fn rule_status(
        &self,
        ptf: &PaxTypeFare,
        market: &FareMarket,
        rule: &FareRetailerRuleInfo,
        security: Option<&FareFocusSecurityInfo>,
    ) -> StatusFRRuleValidation {
        use StatusFRRuleValidation::*;

        if !self.match_security(security) {
            FailFrSecurity
        } else if !self.match_account_code(rule.account_cd_item_no, ptf) {
            FailFrAccountCd
        } else if !self.match_passenger_type_code(rule.psg_type_item_no, ptf) {
            FailFrPassengerTypeCode
        } else if !self.match_vendor(&rule.vendor, ptf.vendor()) {
            FailFrVendor
        } else if !match_rule_tariff(rule.rule_tariff, ptf.fare.fare_tariff) {
            FailFrRuleTariff
        } else if !self.match_rule(rule.rule_cd_item_no, &ptf.fare.rule_number) {
            FailFrRule
        } else if !self.match_carriers(rule.carrier_item_no, ptf) {
            FailFrCarrier
        } else if !rule_util::match_generic_fare_type(&rule.fare_type, &ptf.fare.fare_type) {
            FailFrFareType
        } else if !match_public_private_ind(rule.public_private_ind, ptf.fare.tariff_category) {
            FailFrPublicPrivate
        } else if !self.match_booking_code(rule.booking_cd_item_no, ptf) {
            FailFrBookingCode
        } else if !self.match_travel_range_x5(rule.travel_day_time_appl_item_no, market) {
            FailFrMatchTravelDateRangeX5
        } else if !self.match_geo(&rule.loc1, &rule.loc2, ptf, false) {
            FailFrGeo
        } else if !self.match_directionality(rule, ptf, market.geo_travel_type) {
            FailFrDirectionality
        } else if self.match_exclude_geo(rule.location_pair_exclude_item_no, ptf) {
            FailFrExcludeGeo
        } else if !self.match_fare_class(rule.fare_class_item_no, ptf, false) {
            FailFrFareClass
        } else if self.match_fare_class(rule.fare_class_exclude_item_no, ptf, true) {
            FailFrExcludeFareClass
        } else if !rule_util::match_owrt(rule.owrt, ptf.fare.owrt) {
            FailFrMatchOwrt
        } else if !rule_util::match_cat35_type(rule.display_cat_type, ptf.fare.display_cat_type) {
            FailFrCat35DisplayType
        } else if self.match_exclude_display_cat_type(rule.display_cat_type_exclude_item_no, ptf) {
            FailFrExcludeDct
        } else if !self.trx.request.is_match_retailer_code(&rule.fare_retailer_code) {
            FailFrMatchRetailerCode
        } else {
            PassFr
        }
    }

    // ========================================================================
    // PREDICATES
    // ========================================================================

    fn match_security(&self, security: Option<&FareFocusSecurityInfo>) -> bool {
        let Some(security) = security else {
            return false;
        };
        let agent = &self.trx.agent;

        security.details.iter().any(|detail| match detail.pseudo_city_type {
            PseudoCityType::TravelAgency => detail.pseudo_city == agent.branch_pcc,
            PseudoCityType::HomeTravelAgency => {
                detail.pseudo_city == agent.home_pcc || detail.pseudo_city == agent.branch_pcc
            }
        })
    }

    fn match_account_code(&self, item_no: u64, ptf: &PaxTypeFare) -> bool {
        if item_no == 0 {
            return true;
        }

        let account_code = ptf.account_code().unwrap_or("");
        match self
            .data()
            .get_fare_focus_account_cd(item_no, self.adjusted_ticket_date)
        {
            None => true,
            Some(info) if info.account_codes.is_empty() => true,
            Some(info) => info.account_codes.iter().any(|code| code == account_code),
        }
    }

    fn match_passenger_type_code(&self, item_no: u64, ptf: &PaxTypeFare) -> bool {
        if item_no == 0 {
            return true;
        }

        let Some(info) = self
            .data()
            .get_fare_focus_psg_type(item_no, self.adjusted_ticket_date)
        else {
            return false;
        };

        let pax_type = ptf.pax_type.as_str();
        info.psg_types.iter().any(|item| {
            item == pax_type
                || (pax_type.is_empty() && (item == "ADT" || item == "*A"))
                || (is_adult(pax_type) && item == "*A")
                || (is_child(pax_type) && item == "*C")
                || (is_infant(pax_type) && item == "*I")
        })
    }

    fn match_vendor(&self, rule_vendor: &str, fare_vendor: &str) -> bool {
        if rule_vendor == fare_vendor {
            return true;
        }
        rule_vendor == DFF_VENDOR && self.data().get_vendor_type(fare_vendor) == Some(SMF_VENDOR_TYPE)
    }

    fn match_rule(&self, item_no: u64, rule_number: &str) -> bool {
        if item_no == 0 {
            return true;
        }

        let rows = self
            .data()
            .get_fare_focus_rule_code(item_no, self.adjusted_ticket_date);
        match rows.first() {
            None => true,
            Some(first) => first.rule_codes.iter().any(|code| code == rule_number),
        }
    }

    fn match_carriers(&self, item_no: u64, ptf: &PaxTypeFare) -> bool {
        if item_no == 0 {
            return true;
        }

        let Some(info) = self
            .data()
            .get_fare_focus_carrier(item_no, self.adjusted_ticket_date)
        else {
            return true;
        };

        let fare_carrier = if ptf.fare.industry {
            INDUSTRY_CARRIER
        } else {
            ptf.carrier()
        };

        info.carriers.iter().any(|rule_carrier| {
            if is_alliance_code(rule_carrier) {
                self.data()
                    .get_airline_alliance_carrier(fare_carrier)
                    .first()
                    .map(|alliance| &alliance.generic_alliance_code == rule_carrier)
                    .unwrap_or(false)
            } else {
                rule_carrier == fare_carrier
            }
        })
    }

    fn match_booking_code(&self, item_no: u64, ptf: &PaxTypeFare) -> bool {
        if item_no == 0 {
            return true;
        }

        let Some(info) = self
            .data()
            .get_fare_focus_booking_code(item_no, self.adjusted_ticket_date)
        else {
            return false;
        };

        let primes = &ptf.fare.prime_booking_codes;
        if primes.is_empty() {
            return false;
        }

        primes
            .iter()
            .any(|prime| info.booking_codes.iter().any(|code| code == prime))
    }

    fn match_travel_range_x5(&self, item_no: u64, market: &FareMarket) -> bool {
        if item_no == 0 {
            return true;
        }

        let Some(info) = self
            .data()
            .get_fare_focus_daytime_appl(item_no, self.adjusted_ticket_date)
        else {
            return false;
        };

        let Some(travel_date) = market.travel_date() else {
            return false;
        };
        info.details.iter().any(|detail| detail.contains(travel_date))
    }

    fn match_location(&self, key: &LocKey, market: &str) -> bool {
        key.is_null() || self.data().is_in_loc(market, key)
    }

    fn match_geo(&self, loc1: &LocKey, loc2: &LocKey, ptf: &PaxTypeFare, matching_exclude: bool) -> bool {
        if loc1.is_null() && loc2.is_null() {
            return !matching_exclude;
        }
        if (!loc1.is_null() && !valid_geo_type(loc1.loc_type))
            || (!loc2.is_null() && !valid_geo_type(loc2.loc_type))
        {
            return matching_exclude;
        }

        let orig = &ptf.fare.market1;
        let dest = &ptf.fare.market2;

        (self.match_location(loc1, orig) && self.match_location(loc2, dest))
            || (self.match_location(loc2, orig) && self.match_location(loc1, dest))
    }

    fn match_directionality(&self, rule: &FareRetailerRuleInfo, ptf: &PaxTypeFare, geo: GeoTravelType) -> bool {
        if rule.directionality == ' ' || rule.directionality == 'B' || rule.loc1.is_null() {
            return true;
        }

        match geo {
            GeoTravelType::Domestic | GeoTravelType::Transborder => {
                let city_involved = rule.loc1.loc_type == LocType::City
                    || (!rule.loc2.is_null() && rule.loc2.loc_type == LocType::City);
                if !city_involved {
                    return true;
                }
                ptf.fare.directionality == Directionality::Both
                    || self.is_valid_fare_directionality(ptf, rule)
            }
            GeoTravelType::International | GeoTravelType::ForeignDomestic => {
                self.is_valid_fare_directionality(ptf, rule)
            }
        }
    }

    /// loc1 against the fare's origin for FROM fares, destination for TO fares
    fn is_valid_fare_directionality(&self, ptf: &PaxTypeFare, rule: &FareRetailerRuleInfo) -> bool {
        let mut from = ptf.fare.directionality != Directionality::To;
        if ptf.reversed {
            from = !from;
        }

        if from {
            self.match_location(&rule.loc1, &ptf.fare.market1)
        } else {
            self.match_location(&rule.loc1, &ptf.fare.market2)
        }
    }

    fn match_exclude_geo(&self, item_no: u64, ptf: &PaxTypeFare) -> bool {
        if item_no == 0 {
            return false;
        }

        self.data()
            .get_fare_focus_location_pair(item_no, self.adjusted_ticket_date)
            .map(|info| {
                info.pairs
                    .iter()
                    .any(|pair| self.match_geo(&pair.loc1, &pair.loc2, ptf, true))
            })
            .unwrap_or(false)
    }

    fn match_fare_class(&self, item_no: u64, ptf: &PaxTypeFare, matching_exclude: bool) -> bool {
        if item_no == 0 {
            return !matching_exclude;
        }

        let Some(info) = self
            .data()
            .get_fare_focus_fare_class(item_no, self.adjusted_ticket_date)
        else {
            return false;
        };

        let fare_basis = ptf.fare_basis();
        info.fare_classes.iter().any(|expr| {
            rule_util::validate_match_expression(expr)
                && rule_util::match_fare_class_expression(expr, fare_basis)
        })
    }

    fn match_exclude_display_cat_type(&self, item_no: u64, ptf: &PaxTypeFare) -> bool {
        if item_no == 0 {
            return false;
        }

        self.data()
            .get_fare_focus_display_cat_type(item_no, self.adjusted_ticket_date)
            .map(|info| info.display_cat_types.contains(&ptf.fare.display_cat_type))
            .unwrap_or(false)
    }
}

fn match_rule_tariff(rule_tariff: u32, fare_tariff: u32) -> bool {
    rule_tariff == 0 || rule_tariff == fare_tariff
}

fn match_public_private_ind(indicator: char, category: TariffCategory) -> bool {
    match indicator {
        ' ' => true,
        'P' => category == TariffCategory::Public,
        'V' => category == TariffCategory::Private,
        _ => false,
    }
}

/// Geographic scopes allowed on a retailer rule
fn valid_geo_type(loc_type: LocType) -> bool {
    matches!(
        loc_type,
        LocType::Area | LocType::Nation | LocType::Zone | LocType::City | LocType::Group
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        CabinType, CustomerSecurityHandshakeInfo, EffectivePeriod, Fare, FareFocusAccountCdInfo,
        FareFocusBookingCodeInfo, FareFocusCarrierInfo, FareFocusDaytimeApplDetail,
        FareFocusDaytimeApplInfo, FareFocusDisplayCatTypeInfo, FareFocusFareClassInfo,
        FareFocusLocationPairInfo, FareFocusPsgTypeInfo, FareFocusRuleCodeInfo,
        FareFocusSecurityDetail, LocationPair, Owrt, TravelSeg, VendorTypeInfo,
    };
    use crate::tables::ReferenceTables;
    use crate::trx::{Agent, PricingRequest};
    use std::sync::Arc;

    const SECURITY_ITEM: u64 = 900;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fare() -> Fare {
        Fare {
            vendor: "ATP".to_string(),
            carrier: "BA".to_string(),
            market1: "NYC".to_string(),
            market2: "LON".to_string(),
            fare_class: "YOWUS".to_string(),
            fare_tariff: 1,
            rule_number: "2000".to_string(),
            fare_type: "XEX".to_string(),
            currency: "USD".to_string(),
            amount: 800.0,
            nuc_amount: 800.0,
            owrt: Owrt::OneWayMayBeDoubled,
            directionality: Directionality::From,
            tariff_category: TariffCategory::Public,
            global_direction: "AT".to_string(),
            display_cat_type: ' ',
            prime_booking_codes: vec!["Y".to_string(), "B".to_string()],
            cabin: CabinType::Economy,
            industry: false,
        }
    }

    fn market() -> FareMarket {
        FareMarket::new(
            "JFK",
            "LHR",
            "BA",
            GeoTravelType::International,
            vec![TravelSeg::air("JFK", "LHR", "BA", "Y", date(2024, 7, 10))],
        )
        .with_multi_cities("NYC", "LON")
    }

    fn tables() -> ReferenceTables {
        let tables = ReferenceTables::with_defaults();
        tables.register_security(FareFocusSecurityInfo {
            security_item_no: SECURITY_ITEM,
            period: EffectivePeriod::always(),
            details: vec![FareFocusSecurityDetail {
                pseudo_city_type: PseudoCityType::TravelAgency,
                pseudo_city: "B2C3".to_string(),
            }],
        });
        tables
    }

    fn trx_with(tables: ReferenceTables) -> PricingTrx {
        PricingTrx::new(
            Agent::new("B2C3", "A0B1", "DFW", "USD"),
            PricingRequest::new(date(2024, 6, 1)),
            Arc::new(tables),
        )
    }

    fn rule(id: u64, seq: u64) -> FareRetailerRuleInfo {
        let mut rule = FareRetailerRuleInfo::open(id, seq, "S1S1", "ATP");
        rule.security_item_no = SECURITY_ITEM;
        rule
    }

    fn status(trx: &PricingTrx, rule: &FareRetailerRuleInfo, ptf: &PaxTypeFare) -> StatusFRRuleValidation {
        let validator = FareRetailerRuleValidator::new(trx);
        let security = trx
            .data()
            .get_fare_focus_security(rule.security_item_no, trx.ticket_date());
        validator.rule_status(ptf, &market(), rule, security.as_ref())
    }

    fn lookup(source_pcc: &str, ids: &[(u64, u64)]) -> FareRetailerRuleLookupInfo {
        FareRetailerRuleLookupInfo {
            application_type: 'N',
            source_pcc: source_pcc.to_string(),
            pcc: "B2C3".to_string(),
            rule_ids: ids
                .iter()
                .map(|(id, seq)| FareRetailerRuleLookupId::new(*id, *seq))
                .collect(),
        }
    }

    // ------------------------------------------------------------------------
    // merge
    // ------------------------------------------------------------------------

    #[test]
    fn test_merge_lookups_orders_and_dedups() {
        let branch = vec![lookup("S1S1", &[(1, 10), (3, 30)]), lookup("S2S2", &[(5, 5)])];
        let home = vec![lookup("S1S1", &[(2, 20), (9, 30)]), lookup("S3S3", &[(7, 1)])];

        let merged = merge_lookups(branch, home);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].source_pcc, "S1S1");
        assert_eq!(
            merged[0].rule_ids,
            vec![
                FareRetailerRuleLookupId::new(1, 10),
                FareRetailerRuleLookupId::new(2, 20),
                FareRetailerRuleLookupId::new(3, 30),
            ]
        );
        assert_eq!(merged[1].source_pcc, "S2S2");
        assert_eq!(merged[2].source_pcc, "S3S3");
    }

    #[test]
    fn test_merge_lookups_empty_branch_takes_home() {
        let merged = merge_lookups(Vec::new(), vec![lookup("S3S3", &[(7, 1)])]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source_pcc, "S3S3");
    }

    #[test]
    fn test_lookup_all_sources_uses_home_pcc() {
        let tables = tables();
        for (pcc, target) in [("B2C3", "S1S1"), ("A0B1", "S1S1"), ("A0B1", "S3S3")] {
            tables.register_handshake(CustomerSecurityHandshakeInfo {
                pcc: pcc.to_string(),
                product_cd: "FF".to_string(),
                security_target_pcc: target.to_string(),
                period: EffectivePeriod::always(),
            });
        }
        tables.register_lookup(lookup("S1S1", &[(1, 10)]));
        let mut home = lookup("S1S1", &[(2, 5)]);
        home.pcc = "A0B1".to_string();
        tables.register_lookup(home);
        let mut other = lookup("S3S3", &[(7, 1)]);
        other.pcc = "A0B1".to_string();
        tables.register_lookup(other);

        let trx = trx_with(tables);
        let mut validator = FareRetailerRuleValidator::new(&trx);
        let lookups = validator.get_lookup_all_sources(&market(), "FF", 'N');

        assert_eq!(lookups.len(), 2);
        assert_eq!(
            lookups[0].rule_ids,
            vec![FareRetailerRuleLookupId::new(2, 5), FareRetailerRuleLookupId::new(1, 10)]
        );
        assert_eq!(lookups[1].source_pcc, "S3S3");
    }

    #[test]
    fn test_lookup_without_handshake_is_empty() {
        let trx = trx_with(tables());
        let mut validator = FareRetailerRuleValidator::new(&trx);
        assert!(validator.get_lookup_all_sources(&market(), "FF", 'N').is_empty());
    }

    // ------------------------------------------------------------------------
    // predicate chain
    // ------------------------------------------------------------------------

    #[test]
    fn test_open_rule_passes() {
        let trx = trx_with(tables());
        let ptf = PaxTypeFare::new(fare());
        assert_eq!(status(&trx, &rule(1, 10), &ptf), StatusFRRuleValidation::PassFr);
    }

    #[test]
    fn test_security_required() {
        let trx = trx_with(tables());
        let ptf = PaxTypeFare::new(fare());

        let mut no_security = rule(1, 10);
        no_security.security_item_no = 0;
        assert_eq!(status(&trx, &no_security, &ptf), StatusFRRuleValidation::FailFrSecurity);
    }

    #[test]
    fn test_home_agency_security_matches_home_pcc() {
        let tables = tables();
        tables.register_security(FareFocusSecurityInfo {
            security_item_no: 901,
            period: EffectivePeriod::always(),
            details: vec![FareFocusSecurityDetail {
                pseudo_city_type: PseudoCityType::HomeTravelAgency,
                pseudo_city: "A0B1".to_string(),
            }],
        });
        let trx = trx_with(tables);

        let mut home = rule(1, 10);
        home.security_item_no = 901;
        assert!(status(&trx, &home, &PaxTypeFare::new(fare())).is_pass());
    }

    #[test]
    fn test_account_code() {
        let tables = tables();
        tables.register_account_cd(FareFocusAccountCdInfo {
            account_cd_item_no: 10,
            period: EffectivePeriod::always(),
            account_codes: vec!["CORP1".to_string()],
        });
        let trx = trx_with(tables);

        let mut r = rule(1, 10);
        r.account_cd_item_no = 10;

        let mut ptf = PaxTypeFare::new(fare());
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrAccountCd);

        ptf.cat1_account_code = Some("CORP1".to_string());
        assert!(status(&trx, &r, &ptf).is_pass());

        // Missing table passes
        r.account_cd_item_no = 11;
        ptf.cat1_account_code = None;
        assert!(status(&trx, &r, &ptf).is_pass());
    }

    #[test]
    fn test_passenger_type_groups() {
        let tables = tables();
        tables.register_psg_type(FareFocusPsgTypeInfo {
            psg_type_item_no: 20,
            period: EffectivePeriod::always(),
            psg_types: vec!["*C".to_string()],
        });
        let trx = trx_with(tables);

        let mut r = rule(1, 10);
        r.psg_type_item_no = 20;

        let mut ptf = PaxTypeFare::new(fare());
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrPassengerTypeCode);

        ptf.pax_type = "CNN".to_string();
        assert!(status(&trx, &r, &ptf).is_pass());

        ptf.pax_type = "C05".to_string();
        assert!(status(&trx, &r, &ptf).is_pass());

        r.psg_type_item_no = 21;
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrPassengerTypeCode);
    }

    #[test]
    fn test_vendor_dff_against_smf() {
        let tables = tables();
        tables.register_vendor_type(VendorTypeInfo::new("5KAD", SMF_VENDOR_TYPE));
        let trx = trx_with(tables);

        let mut dff = rule(1, 10);
        dff.vendor = DFF_VENDOR.to_string();

        let mut ptf = PaxTypeFare::new(fare());
        assert_eq!(status(&trx, &dff, &ptf), StatusFRRuleValidation::FailFrVendor);

        ptf.fare.vendor = "5KAD".to_string();
        assert!(status(&trx, &dff, &ptf).is_pass());
    }

    #[test]
    fn test_tariff_and_rule_code() {
        let tables = tables();
        tables.register_rule_code(FareFocusRuleCodeInfo {
            rule_cd_item_no: 30,
            period: EffectivePeriod::always(),
            rule_codes: vec!["3000".to_string()],
        });
        let trx = trx_with(tables);
        let ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.rule_tariff = 8;
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrRuleTariff);

        r.rule_tariff = 1;
        r.rule_cd_item_no = 30;
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrRule);

        // Empty rule code table passes
        r.rule_cd_item_no = 31;
        assert!(status(&trx, &r, &ptf).is_pass());
    }

    #[test]
    fn test_carrier_and_alliance() {
        let tables = tables();
        tables.register_carrier(FareFocusCarrierInfo {
            carrier_item_no: 40,
            period: EffectivePeriod::always(),
            carriers: vec!["*O".to_string()],
        });
        tables.register_carrier(FareFocusCarrierInfo {
            carrier_item_no: 41,
            period: EffectivePeriod::always(),
            carriers: vec!["YY".to_string()],
        });
        let trx = trx_with(tables);

        let mut r = rule(1, 10);
        r.carrier_item_no = 40;

        let mut ptf = PaxTypeFare::new(fare());
        assert!(status(&trx, &r, &ptf).is_pass());

        ptf.fare.carrier = "LH".to_string();
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrCarrier);

        r.carrier_item_no = 41;
        ptf.fare.industry = true;
        assert!(status(&trx, &r, &ptf).is_pass());
    }

    #[test]
    fn test_fare_type_and_public_private() {
        let trx = trx_with(tables());
        let mut ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.fare_type = "*B".to_string();
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrFareType);

        r.fare_type = "*Y".to_string();
        r.public_private_ind = 'V';
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrPublicPrivate);

        ptf.fare.tariff_category = TariffCategory::Private;
        assert!(status(&trx, &r, &ptf).is_pass());
    }

    #[test]
    fn test_booking_code() {
        let tables = tables();
        tables.register_booking_code(FareFocusBookingCodeInfo {
            booking_cd_item_no: 50,
            period: EffectivePeriod::always(),
            booking_codes: vec!["B".to_string(), "M".to_string()],
        });
        let trx = trx_with(tables);

        let mut r = rule(1, 10);
        r.booking_cd_item_no = 50;

        let mut ptf = PaxTypeFare::new(fare());
        assert!(status(&trx, &r, &ptf).is_pass());

        ptf.fare.prime_booking_codes.clear();
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrBookingCode);

        r.booking_cd_item_no = 51;
        ptf.fare.prime_booking_codes.push("B".to_string());
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrBookingCode);
    }

    #[test]
    fn test_travel_date_range() {
        let tables = tables();
        tables.register_daytime_appl(FareFocusDaytimeApplInfo {
            day_time_appl_item_no: 60,
            period: EffectivePeriod::always(),
            details: vec![FareFocusDaytimeApplDetail {
                start_date: Some(date(2024, 8, 1)),
                stop_date: Some(date(2024, 8, 31)),
            }],
        });
        tables.register_daytime_appl(FareFocusDaytimeApplInfo {
            day_time_appl_item_no: 61,
            period: EffectivePeriod::always(),
            details: vec![FareFocusDaytimeApplDetail {
                start_date: Some(date(2024, 7, 1)),
                stop_date: None,
            }],
        });
        let trx = trx_with(tables);
        let ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.travel_day_time_appl_item_no = 60;
        assert_eq!(
            status(&trx, &r, &ptf),
            StatusFRRuleValidation::FailFrMatchTravelDateRangeX5
        );

        r.travel_day_time_appl_item_no = 61;
        assert!(status(&trx, &r, &ptf).is_pass());

        // No segments, no travel date
        let mut empty = market();
        empty.travel_segs.clear();
        let security = trx.data().get_fare_focus_security(r.security_item_no, trx.ticket_date());
        assert_eq!(
            FareRetailerRuleValidator::new(&trx).rule_status(&ptf, &empty, &r, security.as_ref()),
            StatusFRRuleValidation::FailFrMatchTravelDateRangeX5
        );
    }

    #[test]
    fn test_geo_either_direction() {
        let trx = trx_with(tables());
        let ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.loc1 = LocKey::new(LocType::Zone, "210");
        r.loc2 = LocKey::new(LocType::Nation, "US");
        assert!(status(&trx, &r, &ptf).is_pass());

        r.loc2 = LocKey::new(LocType::Nation, "JP");
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrGeo);

        // State scope is not allowed on a retailer rule
        r.loc1 = LocKey::new(LocType::State, "NY");
        r.loc2 = LocKey::null();
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrGeo);
    }

    #[test]
    fn test_directionality_international() {
        let trx = trx_with(tables());
        let mut ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.directionality = 'F';
        r.loc1 = LocKey::new(LocType::Nation, "US");
        assert!(status(&trx, &r, &ptf).is_pass());

        r.loc1 = LocKey::new(LocType::Nation, "GB");
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrDirectionality);

        // Reversed FROM fare is travelled from market2
        ptf.reversed = true;
        assert!(status(&trx, &r, &ptf).is_pass());
    }

    #[test]
    fn test_directionality_domestic_needs_city() {
        let trx = trx_with(tables());
        let mut ptf = PaxTypeFare::new(fare());
        ptf.fare.market1 = "NYC".to_string();
        ptf.fare.market2 = "LAX".to_string();

        let validator = FareRetailerRuleValidator::new(&trx);

        let mut r = rule(1, 10);
        r.directionality = 'F';
        r.loc1 = LocKey::new(LocType::Nation, "CA");
        assert!(validator.match_directionality(&r, &ptf, GeoTravelType::Domestic));

        r.loc1 = LocKey::new(LocType::City, "LAX");
        assert!(!validator.match_directionality(&r, &ptf, GeoTravelType::Domestic));

        ptf.fare.directionality = Directionality::Both;
        assert!(validator.match_directionality(&r, &ptf, GeoTravelType::Domestic));
    }

    #[test]
    fn test_exclude_geo() {
        let tables = tables();
        tables.register_location_pair(FareFocusLocationPairInfo {
            location_pair_item_no: 70,
            period: EffectivePeriod::always(),
            pairs: vec![LocationPair {
                loc1: LocKey::new(LocType::Area, "2"),
                loc2: LocKey::null(),
            }],
        });
        let trx = trx_with(tables);
        let ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.location_pair_exclude_item_no = 70;
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrExcludeGeo);

        r.location_pair_exclude_item_no = 71;
        assert!(status(&trx, &r, &ptf).is_pass());
    }

    #[test]
    fn test_fare_class_and_exclude() {
        let tables = tables();
        tables.register_fare_class(FareFocusFareClassInfo {
            fare_class_item_no: 80,
            period: EffectivePeriod::always(),
            fare_classes: vec!["-".to_string(), "Y-".to_string()],
        });
        tables.register_fare_class(FareFocusFareClassInfo {
            fare_class_item_no: 81,
            period: EffectivePeriod::always(),
            fare_classes: vec!["-US".to_string()],
        });
        let trx = trx_with(tables);
        let ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.fare_class_item_no = 80;
        assert!(status(&trx, &r, &ptf).is_pass());

        r.fare_class_exclude_item_no = 81;
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrExcludeFareClass);

        r.fare_class_exclude_item_no = 0;
        r.fare_class_item_no = 82;
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrFareClass);
    }

    #[test]
    fn test_missing_exclude_fare_class_table_excludes_nothing() {
        let trx = trx_with(tables());
        let ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.fare_class_exclude_item_no = 9999;
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::PassFr);
    }

    #[test]
    fn test_owrt_display_type_and_exclude_dct() {
        let tables = tables();
        tables.register_display_cat_type(FareFocusDisplayCatTypeInfo {
            display_cat_type_item_no: 90,
            period: EffectivePeriod::always(),
            display_cat_types: vec!['L'],
        });
        let trx = trx_with(tables);
        let mut ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.owrt = '2';
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrMatchOwrt);

        r.owrt = 'X';
        r.display_cat_type = 'Q';
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrCat35DisplayType);

        ptf.fare.display_cat_type = 'L';
        assert!(status(&trx, &r, &ptf).is_pass());

        r.display_cat_type_exclude_item_no = 90;
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrExcludeDct);
    }

    #[test]
    fn test_retailer_code() {
        let mut trx = trx_with(tables());
        let ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.fare_retailer_code = "RC1".to_string();
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrMatchRetailerCode);

        trx.request.fare_retailer_codes.push("RC1".to_string());
        assert!(status(&trx, &r, &ptf).is_pass());
    }

    #[test]
    fn test_first_failure_reported() {
        let trx = trx_with(tables());
        let ptf = PaxTypeFare::new(fare());

        let mut r = rule(1, 10);
        r.vendor = "SITA".to_string();
        r.owrt = '2';
        assert_eq!(status(&trx, &r, &ptf), StatusFRRuleValidation::FailFrVendor);
    }

    // ------------------------------------------------------------------------
    // validate
    // ------------------------------------------------------------------------

    #[test]
    fn test_validate_first_match_per_lookup() {
        let tables = tables();
        let mut failing = rule(1, 10);
        failing.rule_tariff = 99;
        tables.register_rule(failing);
        let mut first = rule(2, 20);
        first.fare_retailer_calc_item_no = 500;
        tables.register_rule(first);
        tables.register_rule(rule(3, 30));
        tables.register_rule(rule(4, 5));
        tables.register_calc(FareRetailerCalcInfo {
            fare_retailer_calc_item_no: 500,
            period: EffectivePeriod::always(),
            details: Vec::new(),
        });
        let trx = trx_with(tables);

        let lookups = vec![
            lookup("S1S1", &[(1, 10), (2, 20), (3, 30)]),
            lookup("S2S2", &[(99, 1), (4, 5)]),
        ];

        let mut validator = FareRetailerRuleValidator::new(&trx);
        let contexts = validator.validate(&PaxTypeFare::new(fare()), &market(), 'N', &lookups);

        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].source_pcc, "S1S1");
        assert_eq!(contexts[0].rule.fare_retailer_rule_id, 2);
        assert!(contexts[0].calc.is_some());
        assert!(contexts[0].security.is_some());
        assert_eq!(contexts[1].rule.fare_retailer_rule_id, 4);
        assert!(contexts[1].calc.is_none());
    }

    #[test]
    fn test_validate_no_match_short_diagnostic() {
        let tables = tables();
        let mut failing = rule(1, 10);
        failing.owrt = '2';
        tables.register_rule(failing);
        let trx = trx_with(tables).with_diagnostic(Diagnostic::parse("DD=SHORT").unwrap());

        let mut validator = FareRetailerRuleValidator::new(&trx);
        let contexts = validator.validate(
            &PaxTypeFare::new(fare()),
            &market(),
            'N',
            &[lookup("S1S1", &[(1, 10)])],
        );

        assert!(contexts.is_empty());
        assert!(validator.diagnostic().output().contains("FAIL_FR_ALL"));
    }

    #[test]
    fn test_validate_all_diagnostic_records_failures() {
        let tables = tables();
        let mut failing = rule(1, 10);
        failing.owrt = '2';
        tables.register_rule(failing);
        tables.register_rule(rule(2, 20));
        let trx = trx_with(tables).with_diagnostic(Diagnostic::parse("DD=ALL").unwrap());

        let mut validator = FareRetailerRuleValidator::new(&trx);
        let contexts = validator.validate(
            &PaxTypeFare::new(fare()),
            &market(),
            'N',
            &[lookup("S1S1", &[(1, 10), (2, 20)])],
        );

        assert_eq!(contexts.len(), 1);
        let output = validator.into_diagnostic().output();
        assert!(output.contains("FAIL_FR_MATCH_OWRT"));
        assert!(output.contains("PASS_FR"));
    }

    #[test]
    fn test_diagnostic_fare_market_filter_skips_fare() {
        let tables = tables();
        tables.register_rule(rule(1, 10));
        let trx = trx_with(tables).with_diagnostic(Diagnostic::parse("FM=PARLON").unwrap());

        let mut validator = FareRetailerRuleValidator::new(&trx);
        let contexts = validator.validate(
            &PaxTypeFare::new(fare()),
            &market(),
            'N',
            &[lookup("S1S1", &[(1, 10)])],
        );
        assert!(contexts.is_empty());
    }

    #[test]
    fn test_match_fare_end_to_end() {
        let tables = tables();
        tables.register_handshake(CustomerSecurityHandshakeInfo {
            pcc: "B2C3".to_string(),
            product_cd: "FF".to_string(),
            security_target_pcc: "S1S1".to_string(),
            period: EffectivePeriod::always(),
        });
        tables.register_lookup(lookup("S1S1", &[(1, 10)]));
        tables.register_rule(rule(1, 10));
        let trx = trx_with(tables);

        let mut validator = FareRetailerRuleValidator::new(&trx);
        let contexts = validator.match_fare(&PaxTypeFare::new(fare()), &market(), 'N');
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].rule.source_pcc, "S1S1");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(StatusFRRuleValidation::PassFr.as_str(), "PASS_FR");
        assert_eq!(StatusFRRuleValidation::FailFrExcludeDct.as_str(), "FAIL_FR_EXCLUDE_DCT");
        assert!(!StatusFRRuleValidation::FailFrAll.is_pass());
    }
}
