// 💱 Currency Conversion - NUC and banker sell rate conversion, rounding
//
// NUC: amounts divide by the NUC factor into NUC and multiply back out.
// BSR: direct rate between two currencies. With ICER rates the lookup is
// always source -> target. Without ICER the prime currency is the sales
// currency when it is the source, else the target; a missing pair is bridged
// through the point-of-sale nation's conversion currency.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entities::{decimals_of, BankerSellRate, RoundingRule, NUC};
use crate::error::{PricingError, PricingResult};
use crate::tables::DataHandle;
use crate::trx::PricingTrx;

// ============================================================================
// MONEY + ROUNDING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

impl Money {
    pub fn new(amount: f64, currency: &str) -> Self {
        Money {
            amount,
            currency: currency.to_string(),
        }
    }
}

const EPSILON: f64 = 1e-9;

fn to_decimals(amount: f64, decimals: u8) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (amount * scale).round() / scale
}

/// Round `amount` to a multiple of `factor` per `rule`. A zero factor leaves it alone.
pub fn round(amount: f64, factor: f64, rule: RoundingRule) -> f64 {
    if factor <= 0.0 {
        return amount;
    }

    let units = amount / factor;
    let rounded_units = match rule {
        RoundingRule::Up => (units - EPSILON).ceil(),
        RoundingRule::Down => (units + EPSILON).floor(),
        RoundingRule::Nearest => (units + 0.5 + EPSILON).floor(),
        RoundingRule::None | RoundingRule::Empty => return amount,
    };

    to_decimals(rounded_units * factor, decimals_of(factor))
}

/// Truncate to two decimals (NUC amounts)
pub fn truncate_nuc(amount: f64) -> f64 {
    ((amount + EPSILON) * 100.0).floor() / 100.0
}

// ============================================================================
// NUC CONVERTER
// ============================================================================

pub struct NucConverter<'a> {
    data: &'a dyn DataHandle,
}

impl<'a> NucConverter<'a> {
    pub fn new(data: &'a dyn DataHandle) -> Self {
        NucConverter { data }
    }

    /// Currency amount into NUC, truncated to 0.01
    pub fn to_nuc(&self, amount: f64, currency: &str, date: NaiveDate) -> PricingResult<f64> {
        if currency == NUC {
            return Ok(amount);
        }
        let nuc = self
            .data
            .get_nuc(currency, date)
            .ok_or_else(|| PricingError::NucNotFound(currency.to_string()))?;
        if nuc.nuc_factor <= 0.0 {
            return Err(PricingError::NucNotFound(currency.to_string()));
        }
        Ok(truncate_nuc(amount / nuc.nuc_factor))
    }

    /// NUC amount into a currency, rounded by its NUC rounding rule when asked
    pub fn from_nuc(&self, amount: f64, currency: &str, date: NaiveDate, do_round: bool) -> PricingResult<f64> {
        if currency == NUC {
            return Ok(amount);
        }
        let nuc = self
            .data
            .get_nuc(currency, date)
            .ok_or_else(|| PricingError::NucNotFound(currency.to_string()))?;

        let converted = amount * nuc.nuc_factor;
        if do_round {
            Ok(round(converted, nuc.rounding_factor, nuc.rounding_rule))
        } else {
            Ok(converted)
        }
    }

    pub fn convert(
        &self,
        amount: f64,
        source: &str,
        target: &str,
        date: NaiveDate,
        do_round: bool,
    ) -> PricingResult<f64> {
        if source == target {
            return Ok(amount);
        }
        let nuc = self.to_nuc(amount, source, date)?;
        self.from_nuc(nuc, target, date, do_round)
    }
}

// ============================================================================
// BSR CONVERTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionApplication {
    Pricing,
    Taxes,
}

impl Default for ConversionApplication {
    fn default() -> Self {
        ConversionApplication::Pricing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateOperation {
    Multiply,
    Divide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub source: Money,
    pub target_currency: String,
    pub ticket_date: NaiveDate,
    #[serde(default)]
    pub application: ConversionApplication,
    /// Apply the target currency's rounding
    #[serde(default = "default_true")]
    pub round: bool,
}

fn default_true() -> bool {
    true
}

impl ConversionRequest {
    pub fn new(source: Money, target_currency: &str, ticket_date: NaiveDate) -> Self {
        ConversionRequest {
            source,
            target_currency: target_currency.to_string(),
            ticket_date,
            application: ConversionApplication::Pricing,
            round: true,
        }
    }

    pub fn for_taxes(mut self) -> Self {
        self.application = ConversionApplication::Taxes;
        self.round = false;
        self
    }

    pub fn unrounded(mut self) -> Self {
        self.round = false;
        self
    }
}

/// Everything a BSR conversion used, for display and audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BsrCollectionResults {
    pub source_amount: f64,
    pub source_currency: String,
    pub target_currency: String,

    pub converted_amount: f64,
    pub converted_amount_unrounded: f64,

    pub exchange_rate1: f64,
    pub rate_type1: char,
    pub operation1: RateOperation,

    /// Set when the conversion was bridged through a second currency
    pub intermediate_currency: Option<String>,
    pub exchange_rate2: Option<f64>,
    pub operation2: Option<RateOperation>,

    /// Reciprocal of the applied rate for tax displays
    pub tax_reciprocal_rate: Option<f64>,

    pub rate_overridden: bool,

    pub rounding_factor: f64,
    pub rounding_rule: RoundingRule,
}

impl BsrCollectionResults {
    fn identity(request: &ConversionRequest) -> Self {
        BsrCollectionResults {
            source_amount: request.source.amount,
            source_currency: request.source.currency.clone(),
            target_currency: request.target_currency.clone(),
            converted_amount: request.source.amount,
            converted_amount_unrounded: request.source.amount,
            exchange_rate1: 1.0,
            rate_type1: ' ',
            operation1: RateOperation::Multiply,
            intermediate_currency: None,
            exchange_rate2: None,
            operation2: None,
            tax_reciprocal_rate: None,
            rate_overridden: false,
            rounding_factor: 0.0,
            rounding_rule: RoundingRule::None,
        }
    }
}

/// One rate leg: the rate row and how it applies
struct RateLeg {
    rate: f64,
    rate_type: char,
    operation: RateOperation,
}

impl RateLeg {
    fn apply(&self, amount: f64) -> f64 {
        match self.operation {
            RateOperation::Multiply => amount * self.rate,
            RateOperation::Divide => amount / self.rate,
        }
    }
}

pub struct BsrConverter<'a> {
    trx: &'a PricingTrx,
}

impl<'a> BsrConverter<'a> {
    pub fn new(trx: &'a PricingTrx) -> Self {
        BsrConverter { trx }
    }

    fn data(&self) -> &'a dyn DataHandle {
        self.trx.data()
    }

    pub fn convert(&self, request: &ConversionRequest) -> PricingResult<BsrCollectionResults> {
        let source = request.source.currency.as_str();
        let target = request.target_currency.as_str();

        if source == NUC {
            if target == NUC {
                return Err(PricingError::InvalidInput(
                    "BSR conversion from NUC into NUC".to_string(),
                ));
            }
            let amount = NucConverter::new(self.data()).from_nuc(
                request.source.amount,
                target,
                request.ticket_date,
                self.should_round(request),
            )?;
            let mut results = BsrCollectionResults::identity(request);
            results.converted_amount = amount;
            results.converted_amount_unrounded = amount;
            return Ok(results);
        }

        if source == target {
            return Ok(BsrCollectionResults::identity(request));
        }

        let override_rate = self.override_rate(request)?;

        let mut results = if self.trx.icer_active {
            self.convert_icer(request, override_rate)?
        } else {
            self.convert_bank_rate(request, override_rate)?
        };

        if request.application == ConversionApplication::Taxes && results.exchange_rate1 > 0.0 {
            results.tax_reciprocal_rate = Some(1.0 / results.exchange_rate1);
        }

        self.apply_rounding(request, &mut results);

        debug!(
            "BSR {:.2} {} -> {:.2} {} rate {} ({:?})",
            request.source.amount,
            source,
            results.converted_amount,
            target,
            results.exchange_rate1,
            results.operation1
        );

        Ok(results)
    }

    fn should_round(&self, request: &ConversionRequest) -> bool {
        request.round && !self.trx.request.no_rounding
    }

    /// Rate override from the request. Never applies to tax conversions.
    fn override_rate(&self, request: &ConversionRequest) -> PricingResult<Option<f64>> {
        if request.application == ConversionApplication::Taxes {
            return Ok(None);
        }

        let req = &self.trx.request;
        let sales = self.trx.agent.currency.as_str();
        let first = req.rate_amount_override;
        let second = req.second_rate_amount_override;
        let specified = req
            .currency_override
            .as_deref()
            .filter(|c| !c.is_empty());

        if first > 0.0 && second > 0.0 && specified == Some(sales) {
            return Err(PricingError::DoubleOverride(sales.to_string()));
        }

        // Second leg (out of a non-sales currency into the requested one) takes the second override
        let use_second = second > 0.0
            && specified.is_some()
            && request.source.currency != sales;

        if use_second {
            Ok(Some(second))
        } else if first > 0.0 {
            Ok(Some(first))
        } else {
            Ok(None)
        }
    }

    fn convert_icer(&self, request: &ConversionRequest, override_rate: Option<f64>) -> PricingResult<BsrCollectionResults> {
        let source = &request.source.currency;
        let target = &request.target_currency;

        let leg = match override_rate {
            Some(rate) => RateLeg {
                rate,
                rate_type: 'B',
                operation: RateOperation::Multiply,
            },
            None => {
                let bsr = self
                    .usable_bsr(source, target, request.ticket_date)
                    .ok_or_else(|| rate_not_found(source, target))?;
                RateLeg {
                    rate: bsr.rate,
                    rate_type: bsr.rate_type,
                    operation: RateOperation::Multiply,
                }
            }
        };

        Ok(self.single_leg_results(request, leg, override_rate.is_some()))
    }

    fn convert_bank_rate(
        &self,
        request: &ConversionRequest,
        override_rate: Option<f64>,
    ) -> PricingResult<BsrCollectionResults> {
        let source = request.source.currency.as_str();
        let target = request.target_currency.as_str();
        let sales = self.trx.agent.currency.as_str();

        let (prime, cur, operation) = if sales == source {
            (source, target, RateOperation::Multiply)
        } else {
            (target, source, RateOperation::Divide)
        };

        if let Some(rate) = override_rate {
            let leg = RateLeg {
                rate,
                rate_type: 'B',
                operation,
            };
            return Ok(self.single_leg_results(request, leg, true));
        }

        if let Some(bsr) = self.usable_bsr(prime, cur, request.ticket_date) {
            let leg = RateLeg {
                rate: bsr.rate,
                rate_type: bsr.rate_type,
                operation,
            };
            return Ok(self.single_leg_results(request, leg, false));
        }

        self.convert_through_intermediate(request)
    }

    /// Two legs through the point-of-sale nation's conversion currency
    fn convert_through_intermediate(&self, request: &ConversionRequest) -> PricingResult<BsrCollectionResults> {
        let source = request.source.currency.as_str();
        let target = request.target_currency.as_str();
        let date = request.ticket_date;

        let intermediate = self
            .data()
            .get_nation(&self.trx.pos_nation())
            .and_then(|nation| nation.conversion_currency)
            .filter(|cur| cur != source && cur != target)
            .ok_or_else(|| rate_not_found(source, target))?;

        let first = self
            .find_leg(source, &intermediate, date)
            .ok_or_else(|| rate_not_found(source, &intermediate))?;
        let second = self
            .find_leg(&intermediate, target, date)
            .ok_or_else(|| rate_not_found(&intermediate, target))?;

        let amount = second.apply(first.apply(request.source.amount));

        let mut results = BsrCollectionResults::identity(request);
        results.converted_amount = amount;
        results.converted_amount_unrounded = amount;
        results.exchange_rate1 = first.rate;
        results.rate_type1 = first.rate_type;
        results.operation1 = first.operation;
        results.intermediate_currency = Some(intermediate);
        results.exchange_rate2 = Some(second.rate);
        results.operation2 = Some(second.operation);
        Ok(results)
    }

    /// Either direction of a currency pair
    fn find_leg(&self, from: &str, to: &str, date: NaiveDate) -> Option<RateLeg> {
        let leg = |bsr: BankerSellRate, operation| RateLeg {
            rate: bsr.rate,
            rate_type: bsr.rate_type,
            operation,
        };

        self.usable_bsr(from, to, date)
            .map(|bsr| leg(bsr, RateOperation::Multiply))
            .or_else(|| {
                self.usable_bsr(to, from, date)
                    .map(|bsr| leg(bsr, RateOperation::Divide))
            })
    }

    /// BSR row with a positive rate; zero or negative rates count as missing
    fn usable_bsr(&self, prime: &str, cur: &str, date: NaiveDate) -> Option<BankerSellRate> {
        let bsr = self.data().get_bsr(prime, cur, date)?;
        if bsr.rate <= 0.0 {
            warn!("Ignoring non-positive BSR {} -> {}: {}", prime, cur, bsr.rate);
            return None;
        }
        Some(bsr)
    }

    fn single_leg_results(&self, request: &ConversionRequest, leg: RateLeg, overridden: bool) -> BsrCollectionResults {
        let amount = leg.apply(request.source.amount);

        let mut results = BsrCollectionResults::identity(request);
        results.converted_amount = amount;
        results.converted_amount_unrounded = amount;
        results.exchange_rate1 = leg.rate;
        results.rate_type1 = leg.rate_type;
        results.operation1 = leg.operation;
        results.rate_overridden = overridden;
        results
    }

    fn apply_rounding(&self, request: &ConversionRequest, results: &mut BsrCollectionResults) {
        if !self.should_round(request) {
            return;
        }

        match self.data().get_nuc(&request.target_currency, request.ticket_date) {
            Some(nuc) => {
                results.rounding_factor = nuc.rounding_factor;
                results.rounding_rule = nuc.rounding_rule;
                results.converted_amount = round(results.converted_amount, nuc.rounding_factor, nuc.rounding_rule);
            }
            None => {
                warn!("No rounding data for {}, amount left unrounded", request.target_currency);
            }
        }
    }
}

fn rate_not_found(from: &str, to: &str) -> PricingError {
    PricingError::RateNotFound {
        from: from.to_string(),
        to: to.to_string(),
    }
}

// ============================================================================
// FACADE
// ============================================================================

/// Picks the NUC or BSR path for a conversion
pub struct CurrencyConversionFacade<'a> {
    trx: &'a PricingTrx,
}

impl<'a> CurrencyConversionFacade<'a> {
    pub fn new(trx: &'a PricingTrx) -> Self {
        CurrencyConversionFacade { trx }
    }

    pub fn convert(&self, source: &Money, target: &str, application: ConversionApplication, do_round: bool) -> PricingResult<Money> {
        let mut request = ConversionRequest::new(source.clone(), target, self.trx.ticket_date());
        request.application = application;
        request.round = do_round;

        let results = self.convert_with_results(&request)?;
        Ok(Money::new(results.converted_amount, target))
    }

    pub fn convert_with_results(&self, request: &ConversionRequest) -> PricingResult<BsrCollectionResults> {
        let source = request.source.currency.as_str();
        let target = request.target_currency.as_str();

        if source == target {
            return Ok(BsrCollectionResults::identity(request));
        }

        let outcome = if target == NUC {
            NucConverter::new(self.trx.data())
                .to_nuc(request.source.amount, source, request.ticket_date)
                .map(|amount| {
                    let mut results = BsrCollectionResults::identity(request);
                    results.converted_amount = amount;
                    results.converted_amount_unrounded = amount;
                    results
                })
        } else {
            BsrConverter::new(self.trx).convert(request)
        };

        outcome.map_err(|err| {
            warn!("Currency conversion {} -> {} failed: {}", source, target, err);
            err
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NationInfo;
    use crate::tables::ReferenceTables;
    use crate::trx::{Agent, PricingRequest};
    use std::sync::Arc;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn trx_with(tables: ReferenceTables, sales: &str, location: &str) -> PricingTrx {
        PricingTrx::new(
            Agent::new("B2C3", "", location, sales),
            PricingRequest::new(date()),
            Arc::new(tables),
        )
    }

    fn trx(sales: &str) -> PricingTrx {
        trx_with(ReferenceTables::with_defaults(), sales, "DFW")
    }

    fn request(amount: f64, from: &str, to: &str) -> ConversionRequest {
        ConversionRequest::new(Money::new(amount, from), to, date())
    }

    #[test]
    fn test_round_rules() {
        assert_eq!(round(123.456, 0.01, RoundingRule::Nearest), 123.46);
        assert_eq!(round(123.451, 0.1, RoundingRule::Up), 123.5);
        assert_eq!(round(123.49, 1.0, RoundingRule::Down), 123.0);
        assert_eq!(round(12_350.0, 100.0, RoundingRule::Nearest), 12_400.0);
        assert_eq!(round(12_301.0, 100.0, RoundingRule::Up), 12_400.0);
        assert_eq!(round(12.345, 0.01, RoundingRule::None), 12.345);
        assert_eq!(round(12.345, 0.0, RoundingRule::Nearest), 12.345);
        // Exact multiples stay put
        assert_eq!(round(1.1, 0.1, RoundingRule::Up), 1.1);
    }

    #[test]
    fn test_nuc_round_trip() {
        let tables = ReferenceTables::with_defaults();
        let nuc = NucConverter::new(&tables);

        assert_eq!(nuc.to_nuc(1000.0, "EUR", date()).unwrap(), 1086.95);
        assert_eq!(nuc.from_nuc(100.0, "JPY", date(), true).unwrap(), 15_000.0);
        assert_eq!(nuc.from_nuc(100.07, "JPY", date(), true).unwrap(), 15_100.0);
        assert_eq!(nuc.from_nuc(100.07, "JPY", date(), false).unwrap(), 100.07 * 150.0);
        assert!(matches!(
            nuc.to_nuc(10.0, "XXX", date()),
            Err(PricingError::NucNotFound(_))
        ));
    }

    #[test]
    fn test_icer_multiplies_and_rounds() {
        let trx = trx("USD");
        let results = BsrConverter::new(&trx).convert(&request(100.0, "USD", "EUR")).unwrap();

        assert_eq!(results.converted_amount, 92.0);
        assert_eq!(results.exchange_rate1, 0.92);
        assert_eq!(results.rate_type1, 'B');
        assert_eq!(results.rounding_rule, RoundingRule::Nearest);
    }

    #[test]
    fn test_same_currency_is_noop() {
        let trx = trx("USD");
        let results = BsrConverter::new(&trx).convert(&request(123.45, "EUR", "EUR")).unwrap();
        assert_eq!(results.converted_amount, 123.45);
        assert_eq!(results.exchange_rate1, 1.0);
    }

    #[test]
    fn test_missing_rate_errors() {
        let trx = trx("USD");
        let err = BsrConverter::new(&trx)
            .convert(&request(100.0, "THB", "GBP"))
            .unwrap_err();
        assert_eq!(
            err,
            PricingError::RateNotFound {
                from: "THB".to_string(),
                to: "GBP".to_string()
            }
        );
    }

    #[test]
    fn test_nuc_source_rejects_nuc_target() {
        let trx = trx("USD");
        assert!(BsrConverter::new(&trx).convert(&request(10.0, NUC, NUC)).is_err());

        let results = BsrConverter::new(&trx).convert(&request(10.0, NUC, "CAD")).unwrap();
        assert_eq!(results.converted_amount, 14.0);
    }

    #[test]
    fn test_bank_rate_divides_when_sales_is_target() {
        let trx = trx("USD").with_icer(false);
        let results = BsrConverter::new(&trx)
            .convert(&request(92.0, "EUR", "USD").unrounded())
            .unwrap();

        assert_eq!(results.operation1, RateOperation::Divide);
        assert!((results.converted_amount - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_rate_is_not_found() {
        let tables = ReferenceTables::with_defaults();
        tables.register_bsr(BankerSellRate::new("USD", "EUR", 0.0));

        let trx = trx_with(tables, "USD", "DFW").with_icer(false);
        let err = BsrConverter::new(&trx)
            .convert(&request(92.0, "EUR", "USD"))
            .unwrap_err();

        assert!(matches!(err, PricingError::RateNotFound { .. }));
    }

    #[test]
    fn test_bank_rate_bridges_through_conversion_currency() {
        let tables = ReferenceTables::with_defaults();
        tables.register_bsr(BankerSellRate::new("USD", "THB", 36.0));
        let mut info = NationInfo::new("TH", "THB", 1.0, RoundingRule::Nearest);
        info.conversion_currency = Some("USD".to_string());
        tables.register_nation(info);

        let trx = trx_with(tables, "THB", "BKK").with_icer(false);
        let results = BsrConverter::new(&trx)
            .convert(&request(100.0, "EUR", "THB").unrounded())
            .unwrap();

        assert_eq!(results.intermediate_currency.as_deref(), Some("USD"));
        assert!((results.converted_amount - 100.0 * 1.087 * 36.0).abs() < 1e-6);
    }

    #[test]
    fn test_rate_override_skipped_for_taxes() {
        let mut trx = trx("USD");
        trx.request.rate_amount_override = 0.5;

        let priced = BsrConverter::new(&trx).convert(&request(100.0, "USD", "EUR")).unwrap();
        assert_eq!(priced.converted_amount, 50.0);
        assert!(priced.rate_overridden);

        let taxed = BsrConverter::new(&trx)
            .convert(&request(100.0, "USD", "EUR").for_taxes())
            .unwrap();
        assert_eq!(taxed.converted_amount, 92.0);
        assert!((taxed.tax_reciprocal_rate.unwrap() - 1.0 / 0.92).abs() < 1e-9);
    }

    #[test]
    fn test_double_override_with_sales_currency() {
        let mut trx = trx("USD");
        trx.request.rate_amount_override = 0.9;
        trx.request.second_rate_amount_override = 1.1;
        trx.request.currency_override = Some("USD".to_string());

        assert_eq!(
            BsrConverter::new(&trx).convert(&request(100.0, "USD", "EUR")),
            Err(PricingError::DoubleOverride("USD".to_string()))
        );
    }

    #[test]
    fn test_no_rounding_request() {
        let mut trx = trx("USD");
        trx.request.no_rounding = true;

        let results = BsrConverter::new(&trx).convert(&request(100.5, "USD", "JPY")).unwrap();
        assert_eq!(results.converted_amount, 15_075.0);
        assert_eq!(results.rounding_rule, RoundingRule::None);
    }

    #[test]
    fn test_facade_routes_to_nuc() {
        let trx = trx("USD");
        let facade = CurrencyConversionFacade::new(&trx);

        let nuc = facade
            .convert(&Money::new(790.0, "GBP"), NUC, ConversionApplication::Pricing, true)
            .unwrap();
        assert_eq!(nuc, Money::new(1000.0, NUC));

        let eur = facade
            .convert(&Money::new(100.0, "USD"), "EUR", ConversionApplication::Pricing, true)
            .unwrap();
        assert_eq!(eur.amount, 92.0);
    }
}
