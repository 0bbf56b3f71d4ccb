// 🏗️ Fare By Rule - cat 25 fare creation
//
// Specified indicators (S K E F) build a new fare in the item currency.
// Calculated indicators select base fares through table 989 (or the record 3
// selectors when no table is filed), apply the percent / specified amounts,
// then enforce the min/max range.

use tracing::{debug, warn};

use crate::currency::NucConverter;
use crate::entities::{
    BaseFareRule, CabinType, Directionality, Fare, FareByRuleApp, FareByRuleItemInfo, FareInd,
    FareMarket, Owrt, PaxTypeFare, TariffCategory, ANY_GLOBAL_DIRECTION, BLANK_CURRENCY,
};
use crate::error::{PricingError, PricingResult};
use crate::rule_util;
use crate::trx::PricingTrx;

// ============================================================================
// AMOUNT CALCULATION
// ============================================================================

/// Specified amount in the base fare's currency (first or second specified currency)
fn specified_amount(currency: &str, item: &FareByRuleItemInfo) -> f64 {
    if item.specified_cur1 == currency {
        item.specified_fare_amt1
    } else if item.specified_cur2 == currency {
        item.specified_fare_amt2
    } else {
        0.0
    }
}

/// Specified amounts must be filed in the base fare's currency
pub fn match_specified_currency(base: &PaxTypeFare, item: &FareByRuleItemInfo) -> bool {
    base.fare.currency == item.specified_cur1 || base.fare.currency == item.specified_cur2
}

fn percent_of(amount: f64, percent: f64) -> f64 {
    amount * percent / 100.0
}

/// Resulting amount in the base fare's currency
pub fn calculate_fare_amount(base: &PaxTypeFare, item: &FareByRuleItemInfo) -> PricingResult<f64> {
    if item.specified_cur1 == BLANK_CURRENCY && item.specified_fare_amt1 == 0.0 && item.specified_fare_amt2 == 0.0 {
        return Ok(0.0);
    }

    let indicator = item
        .indicator()
        .ok_or(PricingError::UnknownFareIndicator(item.fare_ind))?;

    let base_amount = base.fare.amount;
    let currency = base.fare.currency.as_str();

    let needs_specified = matches!(
        indicator,
        FareInd::AddSpecifiedToCalculated
            | FareInd::SubtractSpecifiedFromCalculated
            | FareInd::AddSpecifiedToBaseCalcPercentage
            | FareInd::SubtractSpecifiedFromBaseCalcPercentage
    );
    if needs_specified && !match_specified_currency(base, item) {
        return Err(PricingError::InvalidInput(format!(
            "Specified amount not filed in base fare currency {}",
            currency
        )));
    }

    let specified = specified_amount(currency, item);

    let amount = match indicator {
        FareInd::Calculated | FareInd::CreateRtFromOw | FareInd::SelectHighest | FareInd::SelectLowest => {
            percent_of(base_amount, item.percent)
        }
        FareInd::AddSpecifiedToCalculated => percent_of(base_amount, item.percent) + specified,
        FareInd::SubtractSpecifiedFromCalculated => (percent_of(base_amount, item.percent) - specified).max(0.0),
        FareInd::AddSpecifiedToBaseCalcPercentage => percent_of(base_amount + specified, item.percent),
        FareInd::SubtractSpecifiedFromBaseCalcPercentage => {
            percent_of((base_amount - specified).max(0.0), item.percent)
        }
        FareInd::Specified | FareInd::SpecifiedK | FareInd::SpecifiedE | FareInd::SpecifiedF => {
            return Err(PricingError::UnknownFareIndicator(item.fare_ind));
        }
    };

    if amount < 0.0 {
        warn!("Fare by rule item {} creates negative amount {:.2}", item.item_no, amount);
        return Err(PricingError::NegativeFare(amount));
    }

    Ok(amount)
}

// ============================================================================
// MIN / MAX RANGE
// ============================================================================

/// Apply the record 3 range to a calculated amount in `currency`.
/// None = the fare falls outside the range (or the range is filed in another currency).
pub fn ensure_min_max_range(amount: f64, currency: &str, item: &FareByRuleItemInfo) -> Option<f64> {
    match item.indicator() {
        Some(FareInd::SelectHighest) => ensure_highest(amount, currency, item),
        Some(FareInd::SelectLowest) => ensure_lowest(amount, currency, item),
        _ => ensure_within(amount, currency, item),
    }
}

fn ensure_highest(amount: f64, currency: &str, item: &FareByRuleItemInfo) -> Option<f64> {
    if item.specified_cur1.is_empty() && item.cur1.is_empty() {
        return Some(amount);
    }

    let mut min = 0.0;
    if !item.cur1.is_empty() {
        min = if item.cur1 == currency {
            item.min_fare_amt1
        } else if item.cur2 == currency {
            item.min_fare_amt2
        } else {
            return None;
        };
    }

    if !item.specified_cur1.is_empty() {
        let specified = if item.specified_cur1 == currency {
            item.specified_fare_amt1
        } else if item.specified_cur2 == currency {
            item.specified_fare_amt2
        } else {
            return None;
        };
        if specified > min {
            min = specified;
        }
    }

    if min != 0.0 && amount < min {
        Some(min)
    } else {
        Some(amount)
    }
}

fn ensure_lowest(amount: f64, currency: &str, item: &FareByRuleItemInfo) -> Option<f64> {
    if item.specified_cur1.is_empty() && item.cur1.is_empty() {
        return Some(amount);
    }

    let mut max = 0.0;
    if !item.cur1.is_empty() {
        max = if item.cur1 == currency {
            item.max_fare_amt1
        } else if item.cur2 == currency {
            item.max_fare_amt2
        } else {
            return None;
        };
    }

    let mut zero_found = false;
    if !item.specified_cur1.is_empty() {
        let specified = if item.specified_cur1 == currency {
            item.specified_fare_amt1
        } else if item.specified_cur2 == currency {
            item.specified_fare_amt2
        } else {
            return None;
        };
        if max == 0.0 || max > specified {
            max = specified;
            zero_found = specified == 0.0;
        }
    }

    if (max != 0.0 && amount > max) || zero_found {
        Some(max)
    } else {
        Some(amount)
    }
}

fn ensure_within(amount: f64, currency: &str, item: &FareByRuleItemInfo) -> Option<f64> {
    if item.min_fare_amt1 == 0.0 && item.max_fare_amt1 == 0.0 {
        return Some(amount);
    }

    let (min, max) = if item.cur1 == currency {
        (item.min_fare_amt1, item.max_fare_amt1)
    } else if item.cur2 == currency {
        (item.min_fare_amt2, item.max_fare_amt2)
    } else {
        return None;
    };

    if (min != 0.0 && amount < min) || (max != 0.0 && amount > max) {
        None
    } else {
        Some(amount)
    }
}

// ============================================================================
// TABLE 989 BASE FARE SELECTION
// ============================================================================

fn markets_match(rule: &BaseFareRule, fare: &Fare) -> bool {
    let point = |filed: &str, market: &str| filed.is_empty() || filed == market;

    (point(&rule.market1, &fare.market1) && point(&rule.market2, &fare.market2))
        || (point(&rule.market1, &fare.market2) && point(&rule.market2, &fare.market1))
}

/// Base fare against one table 989 row
pub fn match_base_fare_rule(base: &PaxTypeFare, rule: &BaseFareRule) -> bool {
    let fare = &base.fare;

    if rule.base_rule_tariff == 0 {
        // Any public tariff
        if fare.tariff_category == TariffCategory::Private {
            return false;
        }
    } else if rule.base_rule_tariff != fare.fare_tariff {
        return false;
    }

    if !rule.base_rule_no.is_empty() && rule.base_rule_no != fare.rule_number {
        return false;
    }
    if !rule.carrier.is_empty() && rule.carrier != fare.carrier {
        return false;
    }
    if rule.base_owrt != ' ' && rule.base_owrt != fare.owrt.code() {
        return false;
    }
    if rule.base_global_dir != ANY_GLOBAL_DIRECTION
        && !rule.base_global_dir.is_empty()
        && rule.base_global_dir != fare.global_direction
    {
        return false;
    }
    if !rule.base_psg_type.is_empty() && rule.base_psg_type != base.pax_type {
        return false;
    }
    if !markets_match(rule, fare) {
        return false;
    }
    if !rule.base_fare_class.is_empty()
        && !rule_util::match_fare_class_expression(&rule.base_fare_class, fare.fare_basis())
    {
        return false;
    }

    rule_util::match_fare_type(&rule.base_fare_type, &fare.fare_type)
}

/// Base fare against the record 3 selectors used when no table 989 is filed
fn match_record3_selectors(base: &PaxTypeFare, item: &FareByRuleItemInfo, app: &FareByRuleApp) -> bool {
    let fare = &base.fare;
    let carrier = if item.carrier.is_empty() { &app.carrier } else { &item.carrier };

    if carrier != &fare.carrier {
        return false;
    }
    if item.rule_tariff > 0 && item.rule_tariff as u32 != fare.fare_tariff {
        return false;
    }
    if !item.base_fare_class.is_empty()
        && !rule_util::match_fare_class_expression(&item.base_fare_class, fare.fare_basis())
    {
        return false;
    }
    rule_util::match_fare_type(&item.base_fare_type, &fare.fare_type)
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct FareByRuleController<'a> {
    trx: &'a PricingTrx,
    market: &'a FareMarket,
}

impl<'a> FareByRuleController<'a> {
    pub fn new(trx: &'a PricingTrx, market: &'a FareMarket) -> Self {
        FareByRuleController { trx, market }
    }

    /// Record 8 applies to this market: markets (either direction) and effective date
    pub fn app_matches_market(&self, app: &FareByRuleApp) -> bool {
        if !app.period.is_effective(self.trx.ticket_date()) {
            return false;
        }

        let board = &self.market.board_multi_city;
        let off = &self.market.off_multi_city;
        let point = |filed: &str, market: &str| filed.is_empty() || filed == market;

        (point(&app.market1, board) && point(&app.market2, off))
            || (point(&app.market1, off) && point(&app.market2, board))
    }

    /// Base fares of the market the item may be built on
    pub fn select_base_fares<'f>(
        &self,
        item: &FareByRuleItemInfo,
        app: &FareByRuleApp,
        fares: &'f [PaxTypeFare],
    ) -> Vec<&'f PaxTypeFare> {
        let candidates = fares.iter().filter(|ptf| !ptf.fare_by_rule);

        if item.base_table_item_no == 0 {
            return candidates
                .filter(|ptf| match_record3_selectors(ptf, item, app))
                .collect();
        }

        let rules = self
            .trx
            .data()
            .get_base_fare_rules(&item.vendor, item.base_table_item_no, self.trx.ticket_date());
        if rules.is_empty() {
            debug!("Table 989 item {} not found", item.base_table_item_no);
            return Vec::new();
        }

        candidates
            .filter(|ptf| rules.iter().any(|rule| match_base_fare_rule(ptf, rule)))
            .collect()
    }

    /// Create fares for one record 8 / record 3 pair
    pub fn process(
        &self,
        app: &FareByRuleApp,
        item: &FareByRuleItemInfo,
        fares: &[PaxTypeFare],
    ) -> PricingResult<Vec<PaxTypeFare>> {
        let indicator = item
            .indicator()
            .ok_or(PricingError::UnknownFareIndicator(item.fare_ind))?;

        if indicator.is_specified() {
            return Ok(vec![self.create_specified_fare(item, app)?]);
        }

        let mut created = Vec::new();
        for base in self.select_base_fares(item, app, fares) {
            let amount = match calculate_fare_amount(base, item) {
                Ok(amount) => amount,
                Err(err) => {
                    debug!("Base fare {} skipped: {}", base.fare.fare_class, err);
                    continue;
                }
            };

            let Some(amount) = ensure_min_max_range(amount, &base.fare.currency, item) else {
                debug!("Base fare {} outside min/max range", base.fare.fare_class);
                continue;
            };

            created.push(self.create_calculated_fare(base, item, app, amount)?);
        }

        debug!(
            "Fare by rule {} {} item {}: {} fares",
            app.carrier,
            app.rule_no,
            item.item_no,
            created.len()
        );

        Ok(created)
    }

    fn nuc_amount(&self, amount: f64, currency: &str) -> PricingResult<f64> {
        NucConverter::new(self.trx.data()).to_nuc(amount, currency, self.trx.ticket_date())
    }

    /// New fare for S/K/E/F in the item currency (second currency when it is the market's)
    pub fn create_specified_fare(&self, item: &FareByRuleItemInfo, app: &FareByRuleApp) -> PricingResult<PaxTypeFare> {
        let market_currency = self
            .trx
            .data()
            .get_loc(&self.market.origin)
            .and_then(|loc| self.trx.data().get_nation(&loc.nation))
            .map(|nation| nation.primary_currency);

        let (amount, currency) = match market_currency {
            Some(cur) if !item.specified_cur2.is_empty() && item.specified_cur2 == cur => {
                (item.specified_fare_amt2, item.specified_cur2.clone())
            }
            _ => (item.specified_fare_amt1, item.specified_cur1.clone()),
        };

        if currency.is_empty() || currency == BLANK_CURRENCY {
            return Err(PricingError::InvalidInput(format!(
                "Specified fare item {} has no currency",
                item.item_no
            )));
        }
        if amount < 0.0 {
            return Err(PricingError::NegativeFare(amount));
        }

        let owrt = Owrt::from_code(item.result_owrt).unwrap_or(Owrt::OneWayMayBeDoubled);
        let fare = Fare {
            vendor: app.vendor.clone(),
            carrier: app.carrier.clone(),
            market1: self.market.board_multi_city.clone(),
            market2: self.market.off_multi_city.clone(),
            fare_class: with_designator(&item.result_fare_class, &item.tkt_designator),
            fare_tariff: app.rule_tariff,
            rule_number: app.rule_no.clone(),
            fare_type: item.result_fare_type.clone(),
            nuc_amount: self.nuc_amount(amount, &currency)?,
            currency,
            amount,
            owrt,
            directionality: Directionality::Both,
            tariff_category: TariffCategory::Private,
            global_direction: if item.result_global_dir.is_empty() {
                ANY_GLOBAL_DIRECTION.to_string()
            } else {
                item.result_global_dir.clone()
            },
            display_cat_type: item.result_display_cat_type,
            prime_booking_codes: item.booking_codes.clone(),
            cabin: CabinType::Economy,
            industry: app.carrier == "YY",
        };

        let mut ptf = PaxTypeFare::new(fare);
        self.mark_fare_by_rule(&mut ptf, item, app);
        Ok(ptf)
    }

    /// Copy of the base fare with the new amount and the record 3 overrides
    pub fn create_calculated_fare(
        &self,
        base: &PaxTypeFare,
        item: &FareByRuleItemInfo,
        app: &FareByRuleApp,
        amount: f64,
    ) -> PricingResult<PaxTypeFare> {
        let mut ptf = base.clone();
        let fare = &mut ptf.fare;

        fare.nuc_amount = self.nuc_amount(amount, &fare.currency)?;
        fare.amount = amount;
        fare.fare_tariff = app.rule_tariff;
        fare.rule_number = app.rule_no.clone();

        if !item.result_fare_class.is_empty() {
            fare.fare_class = item.result_fare_class.clone();
        }
        if !item.tkt_designator.is_empty() {
            fare.fare_class = with_designator(fare.fare_basis(), &item.tkt_designator);
        }
        if !item.result_fare_type.is_empty() {
            fare.fare_type = item.result_fare_type.clone();
        }
        if let Some(owrt) = Owrt::from_code(item.result_owrt) {
            fare.owrt = owrt;
        }
        if item.result_display_cat_type != ' ' {
            fare.display_cat_type = item.result_display_cat_type;
        }
        if !item.result_global_dir.is_empty() {
            fare.global_direction = item.result_global_dir.clone();
        }
        if !item.booking_codes.is_empty() {
            fare.prime_booking_codes = item.booking_codes.clone();
        }

        self.mark_fare_by_rule(&mut ptf, item, app);
        Ok(ptf)
    }

    fn mark_fare_by_rule(&self, ptf: &mut PaxTypeFare, item: &FareByRuleItemInfo, app: &FareByRuleApp) {
        ptf.fare_by_rule = true;
        ptf.booking_code_status = Default::default();
        ptf.segment_status.clear();
        if !app.account_code.is_empty() {
            ptf.fbr_account_code = Some(app.account_code.clone());
        }
        if !item.pax_type.is_empty() {
            ptf.pax_type = item.pax_type.clone();
        } else if !app.pax_type.is_empty() {
            ptf.pax_type = app.pax_type.clone();
        }
    }
}

fn with_designator(fare_class: &str, designator: &str) -> String {
    if designator.is_empty() {
        fare_class.to_string()
    } else {
        format!("{}/{}", fare_class, designator)
    }
}

// ============================================================================
// TESTS
// ============================================================================
