// 🧮 Tax Processor - runs every effective tax code against a fare path

use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::d8::TaxD8;
use super::jp::TaxJP1;
use super::tax::{touches_nation, FarePath, GenericTax, TaxCalculator, TaxResponse};
use super::us::{TaxUS1, TaxUS2};
use crate::error::{PricingError, PricingResult};
use crate::trx::PricingTrx;

/// Specialization for a tax code, generic behavior otherwise
pub fn calculator_for(tax_code: &str) -> Box<dyn TaxCalculator> {
    match tax_code {
        "US1" => Box::new(TaxUS1),
        "US2" => Box::new(TaxUS2),
        "JP1" => Box::new(TaxJP1),
        "D8" => Box::new(TaxD8),
        _ => Box::new(GenericTax),
    }
}

pub struct TaxProcessor<'a> {
    trx: &'a PricingTrx,
}

impl<'a> TaxProcessor<'a> {
    pub fn new(trx: &'a PricingTrx) -> Self {
        TaxProcessor { trx }
    }

    /// Tax items for the fare path. The first sequence of a tax code that
    /// produces items wins; later sequences of the same code are skipped.
    pub fn process(&self, fare_path: &FarePath) -> PricingResult<TaxResponse> {
        if fare_path.travel_segs.is_empty() {
            return Err(PricingError::InvalidInput("Fare path has no travel segments".to_string()));
        }

        let mut regs = self.trx.data().get_tax_codes(self.trx.ticket_date());
        regs.sort_by(|a, b| a.tax_code.cmp(&b.tax_code).then(a.seq_no.cmp(&b.seq_no)));

        let mut response = TaxResponse::new(self.trx.payment_currency());
        let mut applied: HashSet<String> = HashSet::new();

        for reg in &regs {
            if applied.contains(&reg.tax_code) {
                continue;
            }
            if !touches_nation(self.trx, fare_path, &reg.nation) {
                continue;
            }

            match calculator_for(&reg.tax_code).apply(self.trx, fare_path, reg) {
                Ok(items) if items.is_empty() => {
                    debug!("{} seq {} not applicable", reg.tax_code, reg.seq_no);
                }
                Ok(items) => {
                    applied.insert(reg.tax_code.clone());
                    response.items.extend(items);
                }
                Err(err) => {
                    warn!("{} seq {} skipped: {}", reg.tax_code, reg.seq_no, err);
                }
            }
        }

        info!(
            "Trx {}: {} tax items, total {:.2} {}",
            self.trx.id,
            response.items.len(),
            response.total(),
            response.payment_currency
        );

        Ok(response)
    }
}
