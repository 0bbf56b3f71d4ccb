// 🇯🇵 JP1 - Japan domestic passenger tax

use super::tax::{seg_within, FarePath, TaxCalculator};
use crate::entities::TaxCodeReg;
use crate::trx::PricingTrx;

const JP: &str = "JP";

/// Percentage tax on fare components flown wholly within Japan
pub struct TaxJP1;

impl TaxCalculator for TaxJP1 {
    fn validate_itin(&self, trx: &PricingTrx, fare_path: &FarePath, _reg: &TaxCodeReg) -> bool {
        fare_path.travel_segs.iter().any(|seg| seg.air && seg_within(trx, seg, JP))
    }

    fn taxable_fare(&self, trx: &PricingTrx, fare_path: &FarePath, _reg: &TaxCodeReg) -> Option<(f64, usize, usize)> {
        let mut taxable = 0.0;
        let mut range: Option<(usize, usize)> = None;

        for usage in &fare_path.fare_usages {
            let segs = usage.segments(fare_path);
            if segs.is_empty() || !segs.iter().all(|seg| !seg.air || seg_within(trx, seg, JP)) {
                continue;
            }

            taxable += usage.fare_amount;
            range = Some(match range {
                Some((start, end)) => (start.min(usage.start_seg), end.max(usage.end_seg)),
                None => (usage.start_seg, usage.end_seg),
            });
        }

        range.map(|(start, end)| (taxable, start, end))
    }
}
