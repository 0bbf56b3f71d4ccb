// 🇺🇸 US Taxes - US1 transportation tax, US2 international arrival/departure tax

use chrono::NaiveDate;
use tracing::debug;

use super::tax::{
    do_tax_round, fixed_in_payment_currency, loc_of, prorated_domestic_fare, seg_within, tax_create,
    validate_restrictions, FarePath, TaxCalculation, TaxCalculator, TaxItem,
};
use crate::currency::round;
use crate::entities::{Loc, RoundingRule, TaxCodeReg};
use crate::error::PricingResult;
use crate::trx::PricingTrx;

const US: &str = "US";

// ============================================================================
// US1
// ============================================================================

/// Percentage tax on travel within the US. Fare components leaving the US are
/// prorated by the miles flown inside it.
pub struct TaxUS1;

impl TaxCalculator for TaxUS1 {
    fn validate_itin(&self, trx: &PricingTrx, fare_path: &FarePath, _reg: &TaxCodeReg) -> bool {
        fare_path.travel_segs.iter().any(|seg| seg.air && seg_within(trx, seg, US))
    }

    fn taxable_fare(&self, trx: &PricingTrx, fare_path: &FarePath, _reg: &TaxCodeReg) -> Option<(f64, usize, usize)> {
        prorated_domestic_fare(trx, fare_path, US)
    }
}

// ============================================================================
// US2
// ============================================================================

/// Half US2 rounds up to 0.1 from this ticketing date, down before it
fn half_rounding_change_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2010, 1, 1)
}

fn is_alaska_or_hawaii(loc: &Loc) -> bool {
    loc.is_alaska() || loc.is_hawaii()
}

/// Fixed tax per US border crossing. Travel between Alaska/Hawaii and the rest
/// of the US is charged half.
pub struct TaxUS2;

enum Us2Charge {
    Full,
    Half,
}

impl TaxUS2 {
    fn charge_for(origin: &Loc, destination: &Loc) -> Option<Us2Charge> {
        let origin_us = origin.is_us();
        let destination_us = destination.is_us();

        if origin_us != destination_us {
            return Some(Us2Charge::Full);
        }
        if origin_us
            && (is_alaska_or_hawaii(origin) || is_alaska_or_hawaii(destination))
            && origin.state != destination.state
        {
            return Some(Us2Charge::Half);
        }
        None
    }

    /// Half the filed amount rounded to 0.1 in the tax currency, then converted
    pub fn half_tax_amount(trx: &PricingTrx, reg: &TaxCodeReg) -> PricingResult<f64> {
        let rule = match half_rounding_change_date() {
            Some(change) if trx.ticket_date() < change => RoundingRule::Down,
            _ => RoundingRule::Up,
        };

        let mut half = reg.tax_amt / 2.0;
        let rounded = round(half, 0.1, rule);
        if rounded != 0.0 {
            half = rounded;
        }

        fixed_in_payment_currency(trx, half, &reg.tax_cur)
    }

    fn half_calculation(trx: &PricingTrx, reg: &TaxCodeReg, seg: usize) -> PricingResult<TaxCalculation> {
        let mut calc = tax_create(trx, reg, 0.0, seg, seg)?;
        calc.tax_amount = Self::half_tax_amount(trx, reg)?;
        Ok(calc)
    }
}

impl TaxCalculator for TaxUS2 {
    fn apply(&self, trx: &PricingTrx, fare_path: &FarePath, reg: &TaxCodeReg) -> PricingResult<Vec<TaxItem>> {
        if !validate_restrictions(trx, fare_path, reg) {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();

        for (idx, seg) in fare_path.travel_segs.iter().enumerate() {
            if !seg.air {
                continue;
            }
            let (Some(origin), Some(destination)) = (loc_of(trx, &seg.origin), loc_of(trx, &seg.destination)) else {
                debug!("US2: unknown point on segment {}-{}", seg.origin, seg.destination);
                continue;
            };

            let mut calc = match Self::charge_for(&origin, &destination) {
                Some(Us2Charge::Full) => tax_create(trx, reg, 0.0, idx, idx)?,
                Some(Us2Charge::Half) => Self::half_calculation(trx, reg, idx)?,
                None => continue,
            };

            do_tax_round(trx, reg, &mut calc);
            if calc.tax_amount != 0.0 {
                items.push(calc.into_item(reg));
            }
        }

        Ok(items)
    }
}
