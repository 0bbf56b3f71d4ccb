// 🧾 Tax Code Records - one registration per tax code / sequence

use serde::{Deserialize, Serialize};

use super::currency::RoundingRule;
use super::loc::LocKey;
use super::EffectivePeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxType {
    /// `tax_amt` is a fraction of the taxable fare (0.075 = 7.5%)
    #[serde(rename = "P")]
    Percentage,
    /// `tax_amt` is an amount in `tax_cur`
    #[serde(rename = "F")]
    Fixed,
}

impl TaxType {
    pub fn code(&self) -> char {
        match self {
            TaxType::Percentage => 'P',
            TaxType::Fixed => 'F',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCodeReg {
    pub tax_code: String,

    #[serde(default)]
    pub seq_no: u64,

    /// Nation levying the tax
    pub nation: String,

    pub tax_type: TaxType,
    pub tax_amt: f64,

    /// Currency of a fixed tax
    #[serde(default)]
    pub tax_cur: String,

    #[serde(default)]
    pub taxcd_round_unit: f64,
    #[serde(default)]
    pub taxcd_round_rule: RoundingRule,

    /// Round to 0.01 nearest when sold inside the taxing nation
    #[serde(default)]
    pub spcl_tax_rounding: bool,

    /// Validating carriers that do not collect the tax
    #[serde(default)]
    pub exempt_carriers: Vec<String>,

    /// Journey origin restriction (null = any)
    #[serde(default)]
    pub origin_loc: LocKey,

    /// Point-of-sale restriction (null = any)
    #[serde(default)]
    pub pos_loc: LocKey,

    #[serde(default)]
    pub period: EffectivePeriod,
}

impl TaxCodeReg {
    pub fn percentage(tax_code: &str, nation: &str, tax_amt: f64) -> Self {
        TaxCodeReg {
            tax_code: tax_code.to_string(),
            seq_no: 1,
            nation: nation.to_string(),
            tax_type: TaxType::Percentage,
            tax_amt,
            tax_cur: String::new(),
            taxcd_round_unit: 0.0,
            taxcd_round_rule: RoundingRule::Empty,
            spcl_tax_rounding: false,
            exempt_carriers: Vec::new(),
            origin_loc: LocKey::null(),
            pos_loc: LocKey::null(),
            period: EffectivePeriod::always(),
        }
    }

    pub fn fixed(tax_code: &str, nation: &str, tax_amt: f64, tax_cur: &str) -> Self {
        TaxCodeReg {
            tax_type: TaxType::Fixed,
            tax_cur: tax_cur.to_string(),
            ..TaxCodeReg::percentage(tax_code, nation, tax_amt)
        }
    }

    pub fn with_rounding(mut self, unit: f64, rule: RoundingRule) -> Self {
        self.taxcd_round_unit = unit;
        self.taxcd_round_rule = rule;
        self
    }

    pub fn is_exempt(&self, carrier: &str) -> bool {
        self.exempt_carriers.iter().any(|c| c == carrier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_tax_defaults() {
        let reg = TaxCodeReg::fixed("US2", "US", 21.10, "USD");
        assert_eq!(reg.tax_type, TaxType::Fixed);
        assert_eq!(reg.tax_cur, "USD");
        assert_eq!(reg.taxcd_round_rule, RoundingRule::Empty);
        assert!(reg.origin_loc.is_null());
    }

    #[test]
    fn test_exempt_carriers() {
        let mut reg = TaxCodeReg::percentage("US1", "US", 0.075);
        reg.exempt_carriers.push("XX".to_string());

        assert!(reg.is_exempt("XX"));
        assert!(!reg.is_exempt("AA"));
    }

    #[test]
    fn test_deserialize_tax_type_code() {
        let json = r#"{"tax_code": "JP1", "nation": "JP", "tax_type": "P", "tax_amt": 0.1}"#;
        let reg: TaxCodeReg = serde_json::from_str(json).unwrap();
        assert_eq!(reg.tax_type.code(), 'P');
        assert_eq!(reg.seq_no, 0);
    }
}
