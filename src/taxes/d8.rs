// 🇲🇾 D8 - Malaysia domestic tax

use super::tax::{prorated_domestic_fare, seg_within, FarePath, TaxCalculator};
use crate::entities::TaxCodeReg;
use crate::trx::PricingTrx;

const MY: &str = "MY";

/// Percentage tax on domestic Malaysian segments. Components mixing domestic
/// and international travel are taxed on domestic miles over total miles.
pub struct TaxD8;

impl TaxCalculator for TaxD8 {
    fn validate_itin(&self, trx: &PricingTrx, fare_path: &FarePath, _reg: &TaxCodeReg) -> bool {
        fare_path.travel_segs.iter().any(|seg| seg.air && seg_within(trx, seg, MY))
    }

    fn taxable_fare(&self, trx: &PricingTrx, fare_path: &FarePath, _reg: &TaxCodeReg) -> Option<(f64, usize, usize)> {
        prorated_domestic_fare(trx, fare_path, MY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxes::tax::tests::{fare_path, seg, trx_at};
    use crate::taxes::tax::FareUsage;
    use crate::tables::ReferenceTables;

    #[test]
    fn test_d8_domestic() {
        let trx = trx_at("KUL", "MYR", ReferenceTables::with_defaults());
        let path = fare_path("MYR", vec![seg("KUL", "PEN")], vec![FareUsage::new(200.0, 0, 0)]);
        let reg = TaxCodeReg::percentage("D8", "MY", 0.06);

        let items = TaxD8.apply(&trx, &path, &reg).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tax_amount, 12.0);
    }

    #[test]
    fn test_d8_prorated_by_domestic_miles() {
        let trx = trx_at("KUL", "MYR", ReferenceTables::with_defaults());
        let path = fare_path(
            "MYR",
            vec![seg("PEN", "KUL"), seg("KUL", "SIN")],
            vec![FareUsage::new(500.0, 0, 1)],
        );
        let reg = TaxCodeReg::percentage("D8", "MY", 0.06);

        let domestic = trx.data().miles("PEN", "KUL") as f64;
        let total = domestic + trx.data().miles("KUL", "SIN") as f64;
        let expected = 500.0 * domestic / total * 0.06;

        let items = TaxD8.apply(&trx, &path, &reg).unwrap();

        assert_eq!(items.len(), 1);
        assert!((items[0].tax_amount - expected).abs() < 0.01);
        assert!(items[0].taxable_fare < 500.0);
    }

    #[test]
    fn test_d8_international_only() {
        let trx = trx_at("KUL", "MYR", ReferenceTables::with_defaults());
        let path = fare_path("MYR", vec![seg("KUL", "SIN")], vec![FareUsage::new(300.0, 0, 0)]);
        let reg = TaxCodeReg::percentage("D8", "MY", 0.06);

        assert!(TaxD8.apply(&trx, &path, &reg).unwrap().is_empty());
    }
}
