// 💱 Currency Records - currencies, NUC rates, banker sell rates, nations

use serde::{Deserialize, Serialize};

use super::EffectivePeriod;

/// Neutral Unit of Construction pseudo-currency
pub const NUC: &str = "NUC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingRule {
    Up,
    Down,
    Nearest,
    /// Explicitly no rounding
    None,
    /// Not filed (callers fall back to another source)
    Empty,
}

impl RoundingRule {
    pub fn as_str(&self) -> &str {
        match self {
            RoundingRule::Up => "UP",
            RoundingRule::Down => "DOWN",
            RoundingRule::Nearest => "NEAREST",
            RoundingRule::None => "NONE",
            RoundingRule::Empty => "EMPTY",
        }
    }
}

impl Default for RoundingRule {
    fn default() -> Self {
        RoundingRule::Empty
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,

    /// Number of decimals published for the currency
    pub no_dec: u8,

    #[serde(default)]
    pub nation: String,

    #[serde(default)]
    pub period: EffectivePeriod,
}

impl Currency {
    pub fn new(code: &str, no_dec: u8, nation: &str) -> Self {
        Currency {
            code: code.to_string(),
            no_dec,
            nation: nation.to_string(),
            period: EffectivePeriod::always(),
        }
    }
}

/// NUC rate and fare rounding for one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NucInfo {
    pub cur: String,

    /// Units of `cur` per NUC
    pub nuc_factor: f64,

    #[serde(default)]
    pub nuc_factor_no_dec: u8,

    pub rounding_factor: f64,

    #[serde(default)]
    pub rounding_factor_no_dec: u8,

    pub rounding_rule: RoundingRule,

    #[serde(default)]
    pub period: EffectivePeriod,
}

impl NucInfo {
    pub fn new(cur: &str, nuc_factor: f64, rounding_factor: f64, rounding_rule: RoundingRule) -> Self {
        NucInfo {
            cur: cur.to_string(),
            nuc_factor,
            nuc_factor_no_dec: 6,
            rounding_factor,
            rounding_factor_no_dec: decimals_of(rounding_factor),
            rounding_rule,
            period: EffectivePeriod::always(),
        }
    }
}

/// Direct exchange rate: 1 unit of `prime_cur` = `rate` units of `cur`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankerSellRate {
    pub prime_cur: String,
    pub cur: String,
    pub rate: f64,

    #[serde(default)]
    pub rate_no_dec: u8,

    /// 'B' bank rate, 'I' ICER rate
    #[serde(default = "default_rate_type")]
    pub rate_type: char,

    #[serde(default)]
    pub period: EffectivePeriod,
}

fn default_rate_type() -> char {
    'B'
}

impl BankerSellRate {
    pub fn new(prime_cur: &str, cur: &str, rate: f64) -> Self {
        BankerSellRate {
            prime_cur: prime_cur.to_string(),
            cur: cur.to_string(),
            rate,
            rate_no_dec: 6,
            rate_type: default_rate_type(),
            period: EffectivePeriod::always(),
        }
    }
}

/// Nation-level currency and tax rounding data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationInfo {
    pub nation: String,
    pub primary_currency: String,

    /// Intermediate currency used when no direct BSR exists
    #[serde(default)]
    pub conversion_currency: Option<String>,

    #[serde(default)]
    pub tax_round_unit: f64,

    #[serde(default)]
    pub tax_round_rule: RoundingRule,
}

impl NationInfo {
    pub fn new(nation: &str, primary_currency: &str, tax_round_unit: f64, tax_round_rule: RoundingRule) -> Self {
        NationInfo {
            nation: nation.to_string(),
            primary_currency: primary_currency.to_string(),
            conversion_currency: None,
            tax_round_unit,
            tax_round_rule,
        }
    }
}

/// Decimal places implied by a rounding factor (0.01 -> 2, 1 -> 0, 10 -> 0)
pub fn decimals_of(factor: f64) -> u8 {
    let mut decimals = 0u8;
    let mut scaled = factor;
    while decimals < 9 && (scaled - scaled.round()).abs() > 1e-9 {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}
