// 🧮 Fare By Rule Records - record 8 application, record 3 cat 25 item, table 989

use serde::{Deserialize, Serialize};

use super::EffectivePeriod;

fn blank() -> char {
    ' '
}

/// Currency code meaning "no specified amount"
pub const BLANK_CURRENCY: &str = "***";

/// Global direction meaning "any"
pub const ANY_GLOBAL_DIRECTION: &str = "ZZ";

// ============================================================================
// FARE INDICATOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FareInd {
    Specified,
    SpecifiedK,
    SpecifiedE,
    SpecifiedF,
    Calculated,
    CreateRtFromOw,
    SelectHighest,
    SelectLowest,
    AddSpecifiedToCalculated,
    SubtractSpecifiedFromCalculated,
    AddSpecifiedToBaseCalcPercentage,
    SubtractSpecifiedFromBaseCalcPercentage,
}

impl FareInd {
    pub fn from_code(code: char) -> Option<FareInd> {
        match code {
            'S' => Some(FareInd::Specified),
            'K' => Some(FareInd::SpecifiedK),
            'E' => Some(FareInd::SpecifiedE),
            'F' => Some(FareInd::SpecifiedF),
            'C' => Some(FareInd::Calculated),
            'R' => Some(FareInd::CreateRtFromOw),
            'H' => Some(FareInd::SelectHighest),
            'L' => Some(FareInd::SelectLowest),
            'A' => Some(FareInd::AddSpecifiedToCalculated),
            'M' => Some(FareInd::SubtractSpecifiedFromCalculated),
            'B' => Some(FareInd::AddSpecifiedToBaseCalcPercentage),
            'D' => Some(FareInd::SubtractSpecifiedFromBaseCalcPercentage),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            FareInd::Specified => 'S',
            FareInd::SpecifiedK => 'K',
            FareInd::SpecifiedE => 'E',
            FareInd::SpecifiedF => 'F',
            FareInd::Calculated => 'C',
            FareInd::CreateRtFromOw => 'R',
            FareInd::SelectHighest => 'H',
            FareInd::SelectLowest => 'L',
            FareInd::AddSpecifiedToCalculated => 'A',
            FareInd::SubtractSpecifiedFromCalculated => 'M',
            FareInd::AddSpecifiedToBaseCalcPercentage => 'B',
            FareInd::SubtractSpecifiedFromBaseCalcPercentage => 'D',
        }
    }

    pub fn is_specified(&self) -> bool {
        matches!(
            self,
            FareInd::Specified | FareInd::SpecifiedK | FareInd::SpecifiedE | FareInd::SpecifiedF
        )
    }
}

// ============================================================================
// RECORD 3 CAT 25 ITEM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareByRuleItemInfo {
    pub item_no: u64,
    pub vendor: String,

    #[serde(default)]
    pub period: EffectivePeriod,

    /// Raw fare indicator (see FareInd)
    pub fare_ind: char,

    /// Percent of the base fare (100 = unchanged)
    #[serde(default)]
    pub percent: f64,

    #[serde(default)]
    pub specified_fare_amt1: f64,
    #[serde(default)]
    pub specified_cur1: String,
    #[serde(default)]
    pub specified_fare_amt2: f64,
    #[serde(default)]
    pub specified_cur2: String,

    #[serde(default)]
    pub min_fare_amt1: f64,
    #[serde(default)]
    pub max_fare_amt1: f64,
    #[serde(default)]
    pub cur1: String,
    #[serde(default)]
    pub min_fare_amt2: f64,
    #[serde(default)]
    pub max_fare_amt2: f64,
    #[serde(default)]
    pub cur2: String,

    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub rule_tariff: i32,
    #[serde(default)]
    pub base_fare_class: String,
    #[serde(default)]
    pub base_fare_type: String,

    /// Table 989 item holding base fare selectors
    #[serde(default)]
    pub base_table_item_no: u64,

    // Resulting fare overrides (blank = inherit from base)
    #[serde(default)]
    pub result_fare_class: String,
    #[serde(default)]
    pub result_fare_type: String,
    #[serde(default = "blank")]
    pub result_owrt: char,
    #[serde(default = "blank")]
    pub result_display_cat_type: char,
    #[serde(default)]
    pub result_global_dir: String,
    #[serde(default)]
    pub booking_codes: Vec<String>,

    #[serde(default)]
    pub tkt_designator: String,
    #[serde(default)]
    pub pax_type: String,
}

impl FareByRuleItemInfo {
    pub fn new(item_no: u64, fare_ind: FareInd, percent: f64) -> Self {
        FareByRuleItemInfo {
            item_no,
            vendor: "ATP".to_string(),
            period: EffectivePeriod::always(),
            fare_ind: fare_ind.code(),
            percent,
            specified_fare_amt1: 0.0,
            specified_cur1: String::new(),
            specified_fare_amt2: 0.0,
            specified_cur2: String::new(),
            min_fare_amt1: 0.0,
            max_fare_amt1: 0.0,
            cur1: String::new(),
            min_fare_amt2: 0.0,
            max_fare_amt2: 0.0,
            cur2: String::new(),
            carrier: String::new(),
            rule_tariff: 0,
            base_fare_class: String::new(),
            base_fare_type: String::new(),
            base_table_item_no: 0,
            result_fare_class: String::new(),
            result_fare_type: String::new(),
            result_owrt: ' ',
            result_display_cat_type: ' ',
            result_global_dir: String::new(),
            booking_codes: Vec::new(),
            tkt_designator: String::new(),
            pax_type: String::new(),
        }
    }

    pub fn with_specified(mut self, amount: f64, currency: &str) -> Self {
        self.specified_fare_amt1 = amount;
        self.specified_cur1 = currency.to_string();
        self
    }

    pub fn with_second_specified(mut self, amount: f64, currency: &str) -> Self {
        self.specified_fare_amt2 = amount;
        self.specified_cur2 = currency.to_string();
        self
    }

    pub fn with_range(mut self, min: f64, max: f64, currency: &str) -> Self {
        self.min_fare_amt1 = min;
        self.max_fare_amt1 = max;
        self.cur1 = currency.to_string();
        self
    }

    pub fn indicator(&self) -> Option<FareInd> {
        FareInd::from_code(self.fare_ind)
    }
}

// ============================================================================
// RECORD 8 APPLICATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareByRuleApp {
    pub vendor: String,
    pub carrier: String,
    pub rule_tariff: u32,
    pub rule_no: String,

    #[serde(default)]
    pub account_code: String,
    #[serde(default)]
    pub pax_type: String,

    #[serde(default)]
    pub market1: String,
    #[serde(default)]
    pub market2: String,

    #[serde(default)]
    pub period: EffectivePeriod,
}

// ============================================================================
// TABLE 989 - BASE FARE SELECTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseFareRule {
    pub vendor: String,
    pub item_no: u64,
    pub seq_no: u64,

    #[serde(default)]
    pub period: EffectivePeriod,

    #[serde(default)]
    pub market1: String,
    #[serde(default)]
    pub market2: String,

    #[serde(default)]
    pub carrier: String,

    /// 0 = any public tariff
    #[serde(default)]
    pub base_rule_tariff: u32,
    #[serde(default)]
    pub base_rule_no: String,

    #[serde(default)]
    pub base_fare_class: String,
    #[serde(default)]
    pub base_fare_type: String,

    #[serde(default = "blank")]
    pub base_owrt: char,

    /// "ZZ" = any
    #[serde(default = "any_global_direction")]
    pub base_global_dir: String,

    #[serde(default)]
    pub base_psg_type: String,
}

fn any_global_direction() -> String {
    ANY_GLOBAL_DIRECTION.to_string()
}
