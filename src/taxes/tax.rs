// 🧾 Tax - shared validate / create / round flow
//
// A TaxCalculator specializes one step of the flow (itinerary check, taxable
// fare, or the whole application). Amounts leave here in the payment currency.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::currency::{round, ConversionApplication, CurrencyConversionFacade, Money};
use crate::entities::{Loc, RoundingRule, TaxCodeReg, TaxType, TravelSeg};
use crate::error::PricingResult;
use crate::trx::PricingTrx;

// ============================================================================
// FARE PATH
// ============================================================================

/// One priced fare component over a contiguous range of travel segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareUsage {
    /// Amount in the fare path currency
    pub fare_amount: f64,

    /// Inclusive segment index range
    pub start_seg: usize,
    pub end_seg: usize,
}

impl FareUsage {
    pub fn new(fare_amount: f64, start_seg: usize, end_seg: usize) -> Self {
        FareUsage {
            fare_amount,
            start_seg,
            end_seg,
        }
    }

    pub fn segments<'a>(&self, fare_path: &'a FarePath) -> &'a [TravelSeg] {
        let end = (self.end_seg + 1).min(fare_path.travel_segs.len());
        let start = self.start_seg.min(end);
        &fare_path.travel_segs[start..end]
    }
}

/// Priced itinerary handed to tax calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarePath {
    /// Calculation currency of the fare amounts (NUC or a local currency)
    pub currency: String,

    pub validating_carrier: String,

    pub travel_segs: Vec<TravelSeg>,

    pub fare_usages: Vec<FareUsage>,
}

impl FarePath {
    pub fn total_amount(&self) -> f64 {
        self.fare_usages.iter().map(|fu| fu.fare_amount).sum()
    }

    pub fn last_seg_index(&self) -> usize {
        self.travel_segs.len().saturating_sub(1)
    }
}

// ============================================================================
// RESULTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxItem {
    pub tax_code: String,
    pub nation: String,
    pub tax_type: TaxType,

    /// Amount in `payment_currency`
    pub tax_amount: f64,
    pub payment_currency: String,

    /// Taxable fare in the payment currency (0 for fixed taxes)
    pub taxable_fare: f64,

    pub seg_start: usize,
    pub seg_end: usize,

    pub rounding_unit: f64,
    pub rounding_rule: RoundingRule,
    pub special_rounded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxResponse {
    pub payment_currency: String,
    pub items: Vec<TaxItem>,
}

impl TaxResponse {
    pub fn new(payment_currency: &str) -> Self {
        TaxResponse {
            payment_currency: payment_currency.to_string(),
            items: Vec::new(),
        }
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.tax_amount).sum()
    }

    pub fn find(&self, tax_code: &str) -> Vec<&TaxItem> {
        self.items.iter().filter(|item| item.tax_code == tax_code).collect()
    }
}

// ============================================================================
// CALCULATION STATE
// ============================================================================

/// Working amounts for one tax code application
#[derive(Debug, Clone, PartialEq)]
pub struct TaxCalculation {
    pub payment_currency: String,
    pub tax_amount: f64,
    pub taxable_fare: f64,
    pub seg_start: usize,
    pub seg_end: usize,
    pub rounding_unit: f64,
    pub rounding_rule: RoundingRule,
    pub special_rounded: bool,
}

impl TaxCalculation {
    pub fn into_item(self, reg: &TaxCodeReg) -> TaxItem {
        TaxItem {
            tax_code: reg.tax_code.clone(),
            nation: reg.nation.clone(),
            tax_type: reg.tax_type,
            tax_amount: self.tax_amount,
            payment_currency: self.payment_currency,
            taxable_fare: self.taxable_fare,
            seg_start: self.seg_start,
            seg_end: self.seg_end,
            rounding_unit: self.rounding_unit,
            rounding_rule: self.rounding_rule,
            special_rounded: self.special_rounded,
        }
    }
}

// ============================================================================
// SHARED STEPS
// ============================================================================

pub(crate) fn loc_of(trx: &PricingTrx, code: &str) -> Option<Loc> {
    trx.data().get_loc(code)
}

pub(crate) fn nation_of(trx: &PricingTrx, code: &str) -> String {
    loc_of(trx, code).map(|loc| loc.nation).unwrap_or_default()
}

/// Both ends of the segment lie in `nation`
pub(crate) fn seg_within(trx: &PricingTrx, seg: &TravelSeg, nation: &str) -> bool {
    nation_of(trx, &seg.origin) == nation && nation_of(trx, &seg.destination) == nation
}

pub(crate) fn seg_miles(trx: &PricingTrx, seg: &TravelSeg) -> u32 {
    trx.data().miles(&seg.origin, &seg.destination)
}

/// Fare usages prorated by the miles flown inside `nation`, with the covered segment range.
/// Usages wholly inside count in full; None when nothing is flown inside.
pub(crate) fn prorated_domestic_fare(trx: &PricingTrx, fare_path: &FarePath, nation: &str) -> Option<(f64, usize, usize)> {
    let mut taxable = 0.0;
    let mut range: Option<(usize, usize)> = None;

    for usage in &fare_path.fare_usages {
        let mut total_miles = 0u32;
        let mut domestic_miles = 0u32;

        for (offset, seg) in usage.segments(fare_path).iter().enumerate() {
            let miles = seg_miles(trx, seg);
            total_miles += miles;
            if seg_within(trx, seg, nation) {
                domestic_miles += miles;
                let idx = usage.start_seg + offset;
                range = Some(match range {
                    Some((start, end)) => (start.min(idx), end.max(idx)),
                    None => (idx, idx),
                });
            }
        }

        if domestic_miles == 0 || total_miles == 0 {
            continue;
        }
        if domestic_miles == total_miles {
            taxable += usage.fare_amount;
        } else {
            taxable += usage.fare_amount * domestic_miles as f64 / total_miles as f64;
        }
    }

    range.map(|(start, end)| (taxable, start, end))
}

/// Itinerary touches the taxing nation
pub fn touches_nation(trx: &PricingTrx, fare_path: &FarePath, nation: &str) -> bool {
    fare_path
        .travel_segs
        .iter()
        .any(|seg| nation_of(trx, &seg.origin) == nation || nation_of(trx, &seg.destination) == nation)
}

/// Journey origin and point of sale restrictions, plus carrier exemptions
pub fn validate_restrictions(trx: &PricingTrx, fare_path: &FarePath, reg: &TaxCodeReg) -> bool {
    if reg.is_exempt(&fare_path.validating_carrier) {
        debug!("{} exempt for carrier {}", reg.tax_code, fare_path.validating_carrier);
        return false;
    }

    if !reg.origin_loc.is_null() {
        let Some(first) = fare_path.travel_segs.first() else {
            return false;
        };
        if !trx.data().is_in_loc(&first.origin, &reg.origin_loc) {
            return false;
        }
    }

    if !reg.pos_loc.is_null() && !trx.data().is_in_loc(&trx.agent.location, &reg.pos_loc) {
        return false;
    }

    true
}

/// Fare path amount into the payment currency (unrounded)
pub fn fare_in_payment_currency(trx: &PricingTrx, amount: f64, currency: &str) -> PricingResult<f64> {
    let payment = trx.payment_currency();
    if currency == payment || amount == 0.0 {
        return Ok(amount);
    }
    let facade = CurrencyConversionFacade::new(trx);
    let converted = facade.convert(&Money::new(amount, currency), payment, ConversionApplication::Taxes, false)?;
    Ok(converted.amount)
}

/// Fixed tax amount into the payment currency (unrounded)
pub fn fixed_in_payment_currency(trx: &PricingTrx, amount: f64, tax_cur: &str) -> PricingResult<f64> {
    let payment = trx.payment_currency();
    if tax_cur == payment || tax_cur.is_empty() {
        return Ok(amount);
    }
    let facade = CurrencyConversionFacade::new(trx);
    facade
        .convert(&Money::new(amount, tax_cur), payment, ConversionApplication::Taxes, false)
        .map(|money| money.amount)
        .map_err(|err| {
            warn!("Currency conversion failed for fixed tax {} {}: {}", amount, tax_cur, err);
            err
        })
}

/// Raw tax amount: percentage of the taxable fare, or the converted fixed amount.
/// `taxable_fare` is in the payment currency.
pub fn tax_create(
    trx: &PricingTrx,
    reg: &TaxCodeReg,
    taxable_fare: f64,
    seg_start: usize,
    seg_end: usize,
) -> PricingResult<TaxCalculation> {
    let mut calc = TaxCalculation {
        payment_currency: trx.payment_currency().to_string(),
        tax_amount: reg.tax_amt,
        taxable_fare: 0.0,
        seg_start,
        seg_end,
        rounding_unit: reg.taxcd_round_unit,
        rounding_rule: reg.taxcd_round_rule,
        special_rounded: false,
    };

    if reg.tax_amt == 0.0 {
        return Ok(calc);
    }

    match reg.tax_type {
        TaxType::Percentage => {
            calc.taxable_fare = taxable_fare;
            calc.tax_amount = taxable_fare * reg.tax_amt;
        }
        TaxType::Fixed => {
            calc.tax_amount = fixed_in_payment_currency(trx, reg.tax_amt, &reg.tax_cur)?;
        }
    }

    Ok(calc)
}

/// Round per the tax code, the special domestic rule, or the point-of-sale nation
pub fn do_tax_round(trx: &PricingTrx, reg: &TaxCodeReg, calc: &mut TaxCalculation) {
    calc.rounding_unit = reg.taxcd_round_unit;
    calc.rounding_rule = reg.taxcd_round_rule;
    calc.special_rounded = false;

    let pos_nation = trx.pos_nation();

    if reg.spcl_tax_rounding {
        if reg.nation == pos_nation {
            calc.rounding_unit = 0.01;
            calc.rounding_rule = RoundingRule::Nearest;
            calc.special_rounded = true;
        } else {
            calc.rounding_rule = RoundingRule::Empty;
        }
    }

    if reg.tax_cur == calc.payment_currency
        && reg.tax_type == TaxType::Fixed
        && calc.rounding_rule == RoundingRule::Empty
    {
        return;
    }

    let foreign_tax_cur = !reg.tax_cur.is_empty() && reg.tax_cur != calc.payment_currency;
    if !calc.special_rounded && (foreign_tax_cur || calc.rounding_rule == RoundingRule::Empty) {
        match trx.data().get_nation(&pos_nation) {
            Some(nation) => {
                calc.rounding_unit = nation.tax_round_unit;
                calc.rounding_rule = nation.tax_round_rule;
            }
            None => {
                warn!("No tax rounding data for nation '{}', {} left unrounded", pos_nation, reg.tax_code);
                return;
            }
        }
    }

    calc.tax_amount = round(calc.tax_amount, calc.rounding_unit, calc.rounding_rule);
}

// ============================================================================
// CALCULATOR TRAIT
// ============================================================================

/// Per tax code behavior. Defaults give the generic tax.
pub trait TaxCalculator {
    /// Itinerary qualifies for the tax
    fn validate_itin(&self, trx: &PricingTrx, fare_path: &FarePath, reg: &TaxCodeReg) -> bool {
        touches_nation(trx, fare_path, &reg.nation)
    }

    /// Taxable fare in the fare path currency with the segment range it covers.
    /// None = nothing taxable.
    fn taxable_fare(&self, _trx: &PricingTrx, fare_path: &FarePath, _reg: &TaxCodeReg) -> Option<(f64, usize, usize)> {
        Some((fare_path.total_amount(), 0, fare_path.last_seg_index()))
    }

    fn apply(&self, trx: &PricingTrx, fare_path: &FarePath, reg: &TaxCodeReg) -> PricingResult<Vec<TaxItem>> {
        if !self.validate_itin(trx, fare_path, reg) || !validate_restrictions(trx, fare_path, reg) {
            return Ok(Vec::new());
        }

        let Some((fare, seg_start, seg_end)) = self.taxable_fare(trx, fare_path, reg) else {
            debug!("{}: no taxable fare", reg.tax_code);
            return Ok(Vec::new());
        };

        let taxable = match reg.tax_type {
            TaxType::Percentage => fare_in_payment_currency(trx, fare, &fare_path.currency)?,
            TaxType::Fixed => 0.0,
        };

        let mut calc = tax_create(trx, reg, taxable, seg_start, seg_end)?;
        do_tax_round(trx, reg, &mut calc);

        if calc.tax_amount == 0.0 {
            return Ok(Vec::new());
        }

        Ok(vec![calc.into_item(reg)])
    }
}

/// Any tax code without a specialization
pub struct GenericTax;

impl TaxCalculator for GenericTax {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::entities::{LocKey, LocType};
    use crate::tables::ReferenceTables;
    use crate::trx::{Agent, PricingRequest};
    use chrono::NaiveDate;
    use std::sync::Arc;

    pub(crate) fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    pub(crate) fn trx_at(location: &str, currency: &str, tables: ReferenceTables) -> PricingTrx {
        PricingTrx::new(
            Agent::new("B2C3", "", location, currency),
            PricingRequest::new(date()),
            Arc::new(tables),
        )
    }

    pub(crate) fn seg(origin: &str, destination: &str) -> TravelSeg {
        TravelSeg::air(origin, destination, "AA", "Y", NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
    }

    pub(crate) fn fare_path(currency: &str, segs: Vec<TravelSeg>, usages: Vec<FareUsage>) -> FarePath {
        FarePath {
            currency: currency.to_string(),
            validating_carrier: "AA".to_string(),
            travel_segs: segs,
            fare_usages: usages,
        }
    }

    #[test]
    fn test_generic_percentage_tax() {
        let trx = trx_at("LHR", "GBP", ReferenceTables::with_defaults());
        let path = fare_path("GBP", vec![seg("LHR", "JFK")], vec![FareUsage::new(500.0, 0, 0)]);
        let reg = TaxCodeReg::percentage("GB", "GB", 0.10);

        let items = GenericTax.apply(&trx, &path, &reg).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tax_amount, 50.0);
        assert_eq!(items[0].taxable_fare, 500.0);
        assert_eq!(items[0].payment_currency, "GBP");
    }

    #[test]
    fn test_generic_tax_skips_other_nation() {
        let trx = trx_at("LHR", "GBP", ReferenceTables::with_defaults());
        let path = fare_path("GBP", vec![seg("JFK", "LAX")], vec![FareUsage::new(500.0, 0, 0)]);
        let reg = TaxCodeReg::percentage("GB", "GB", 0.10);

        assert!(GenericTax.apply(&trx, &path, &reg).unwrap().is_empty());
    }

    #[test]
    fn test_fixed_tax_in_payment_currency_not_rounded() {
        let trx = trx_at("JFK", "USD", ReferenceTables::with_defaults());
        let path = fare_path("USD", vec![seg("JFK", "LHR")], vec![FareUsage::new(800.0, 0, 0)]);
        let reg = TaxCodeReg::fixed("XY", "US", 7.005, "USD");

        let items = GenericTax.apply(&trx, &path, &reg).unwrap();
        assert_eq!(items[0].tax_amount, 7.005);
        assert_eq!(items[0].taxable_fare, 0.0);
    }

    #[test]
    fn test_special_domestic_rounding() {
        let trx = trx_at("JFK", "USD", ReferenceTables::with_defaults());
        let mut reg = TaxCodeReg::percentage("US1", "US", 0.075).with_rounding(1.0, RoundingRule::Up);
        reg.spcl_tax_rounding = true;

        let mut calc = tax_create(&trx, &reg, 333.33, 0, 0).unwrap();
        do_tax_round(&trx, &reg, &mut calc);

        assert!(calc.special_rounded);
        assert_eq!(calc.rounding_unit, 0.01);
        assert_eq!(calc.tax_amount, 25.0);
    }

    #[test]
    fn test_special_rounding_outside_nation_uses_pos_nation() {
        let trx = trx_at("NRT", "JPY", ReferenceTables::with_defaults());
        let mut reg = TaxCodeReg::percentage("US1", "US", 0.075).with_rounding(1.0, RoundingRule::Up);
        reg.spcl_tax_rounding = true;

        let mut calc = tax_create(&trx, &reg, 10010.0, 0, 0).unwrap();
        do_tax_round(&trx, &reg, &mut calc);

        assert!(!calc.special_rounded);
        assert_eq!(calc.rounding_rule, RoundingRule::Down);
        assert_eq!(calc.tax_amount, 750.0);
    }

    #[test]
    fn test_exempt_carrier_and_origin_restriction() {
        let trx = trx_at("LHR", "GBP", ReferenceTables::with_defaults());
        let path = fare_path("GBP", vec![seg("LHR", "JFK")], vec![FareUsage::new(500.0, 0, 0)]);

        let mut exempt = TaxCodeReg::percentage("GB", "GB", 0.10);
        exempt.exempt_carriers.push("AA".to_string());
        assert!(!validate_restrictions(&trx, &path, &exempt));

        let mut from_us = TaxCodeReg::percentage("GB", "GB", 0.10);
        from_us.origin_loc = LocKey::new(LocType::Nation, "US");
        assert!(!validate_restrictions(&trx, &path, &from_us));

        from_us.origin_loc = LocKey::new(LocType::Nation, "GB");
        assert!(validate_restrictions(&trx, &path, &from_us));
    }

    #[test]
    fn test_response_totals() {
        let mut response = TaxResponse::new("USD");
        let trx = trx_at("JFK", "USD", ReferenceTables::with_defaults());
        let reg = TaxCodeReg::fixed("XY", "US", 5.0, "USD");
        response.items.push(tax_create(&trx, &reg, 0.0, 0, 0).unwrap().into_item(&reg));
        response.items.push(tax_create(&trx, &reg, 0.0, 1, 1).unwrap().into_item(&reg));

        assert_eq!(response.total(), 10.0);
        assert_eq!(response.find("XY").len(), 2);
        assert!(response.find("US1").is_empty());
    }
}
