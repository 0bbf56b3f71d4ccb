// 🏪 Fare Retailer Records - rules, lookups, handshakes and fare-focus item tables
//
// Item tables are referenced from a rule by item number; item number 0 on a
// rule means "no restriction".

use serde::{Deserialize, Serialize};

use super::loc::LocKey;
use super::EffectivePeriod;

fn blank() -> char {
    ' '
}

// ============================================================================
// RULE + LOOKUP
// ============================================================================

/// One fare-retailer rule (the "what applies" row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareRetailerRuleInfo {
    pub fare_retailer_rule_id: u64,
    pub rule_seq_no: u64,

    #[serde(default)]
    pub period: EffectivePeriod,

    /// 'N' net, 'R' selling, 'S' adjusted selling, 'D' cat 25 responsive
    pub application_type: char,

    pub source_pcc: String,
    pub vendor: String,

    #[serde(default)]
    pub security_item_no: u64,
    #[serde(default)]
    pub account_cd_item_no: u64,
    #[serde(default)]
    pub psg_type_item_no: u64,
    #[serde(default)]
    pub rule_tariff: u32,
    #[serde(default)]
    pub rule_cd_item_no: u64,
    #[serde(default)]
    pub carrier_item_no: u64,
    #[serde(default)]
    pub fare_type: String,

    /// ' ' any, 'P' public, 'V' private
    #[serde(default = "blank")]
    pub public_private_ind: char,

    #[serde(default)]
    pub booking_cd_item_no: u64,
    #[serde(default)]
    pub travel_day_time_appl_item_no: u64,

    #[serde(default)]
    pub loc1: LocKey,
    #[serde(default)]
    pub loc2: LocKey,

    /// ' ' blank, 'F' from loc1, 'T' to loc1, 'B' both
    #[serde(default = "blank")]
    pub directionality: char,

    #[serde(default)]
    pub location_pair_exclude_item_no: u64,
    #[serde(default)]
    pub fare_class_item_no: u64,
    #[serde(default)]
    pub fare_class_exclude_item_no: u64,

    /// ' ' any, '1' / '2' / '3', 'X' any one-way
    #[serde(default = "blank")]
    pub owrt: char,

    /// ' ' any, 'L' / 'T' / 'Q'
    #[serde(default = "blank")]
    pub display_cat_type: char,

    #[serde(default)]
    pub display_cat_type_exclude_item_no: u64,

    #[serde(default)]
    pub fare_retailer_code: String,

    #[serde(default)]
    pub fare_retailer_calc_item_no: u64,
    #[serde(default)]
    pub resulting_fare_attr_item_no: u64,
}

impl FareRetailerRuleInfo {
    /// Rule with every restriction open
    pub fn open(rule_id: u64, rule_seq_no: u64, source_pcc: &str, vendor: &str) -> Self {
        FareRetailerRuleInfo {
            fare_retailer_rule_id: rule_id,
            rule_seq_no,
            period: EffectivePeriod::always(),
            application_type: 'N',
            source_pcc: source_pcc.to_string(),
            vendor: vendor.to_string(),
            security_item_no: 0,
            account_cd_item_no: 0,
            psg_type_item_no: 0,
            rule_tariff: 0,
            rule_cd_item_no: 0,
            carrier_item_no: 0,
            fare_type: String::new(),
            public_private_ind: ' ',
            booking_cd_item_no: 0,
            travel_day_time_appl_item_no: 0,
            loc1: LocKey::null(),
            loc2: LocKey::null(),
            directionality: ' ',
            location_pair_exclude_item_no: 0,
            fare_class_item_no: 0,
            fare_class_exclude_item_no: 0,
            owrt: ' ',
            display_cat_type: ' ',
            display_cat_type_exclude_item_no: 0,
            fare_retailer_code: String::new(),
            fare_retailer_calc_item_no: 0,
            resulting_fare_attr_item_no: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareRetailerRuleLookupId {
    pub fare_retailer_rule_id: u64,
    pub rule_seq_no: u64,
}

impl FareRetailerRuleLookupId {
    pub fn new(fare_retailer_rule_id: u64, rule_seq_no: u64) -> Self {
        FareRetailerRuleLookupId {
            fare_retailer_rule_id,
            rule_seq_no,
        }
    }
}

/// Rules a source PCC publishes to one agency PCC, ordered by sequence number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareRetailerRuleLookupInfo {
    pub application_type: char,
    pub source_pcc: String,
    pub pcc: String,
    pub rule_ids: Vec<FareRetailerRuleLookupId>,
}

// ============================================================================
// SECURITY
// ============================================================================

/// Customer security handshake: which source PCCs an agency may see for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSecurityHandshakeInfo {
    /// Agency PCC the handshake is filed for
    pub pcc: String,
    pub product_cd: String,
    pub security_target_pcc: String,

    #[serde(default)]
    pub period: EffectivePeriod,
}

/// Vendor type ('P' public, 'T' carrier-filed SMF data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTypeInfo {
    pub vendor: String,
    pub vendor_type: char,
}

impl VendorTypeInfo {
    pub fn new(vendor: &str, vendor_type: char) -> Self {
        VendorTypeInfo {
            vendor: vendor.to_string(),
            vendor_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PseudoCityType {
    /// Branch agency ('T')
    #[serde(rename = "T")]
    TravelAgency,
    /// Home agency ('U')
    #[serde(rename = "U")]
    HomeTravelAgency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusSecurityDetail {
    pub pseudo_city_type: PseudoCityType,
    pub pseudo_city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusSecurityInfo {
    pub security_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    pub details: Vec<FareFocusSecurityDetail>,
}

// ============================================================================
// FARE FOCUS ITEM TABLES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusAccountCdInfo {
    pub account_cd_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    pub account_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusPsgTypeInfo {
    pub psg_type_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    pub psg_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusRuleCodeInfo {
    pub rule_cd_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    pub rule_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusCarrierInfo {
    pub carrier_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    /// Carrier codes or alliance codes (*A, *O, *S)
    pub carriers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusFareClassInfo {
    pub fare_class_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    /// Fare class expressions ("Y-", "B?OW")
    pub fare_classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusBookingCodeInfo {
    pub booking_cd_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    pub booking_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPair {
    #[serde(default)]
    pub loc1: LocKey,
    #[serde(default)]
    pub loc2: LocKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusLocationPairInfo {
    pub location_pair_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    pub pairs: Vec<LocationPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusDisplayCatTypeInfo {
    pub display_cat_type_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    pub display_cat_types: Vec<char>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusDaytimeApplDetail {
    #[serde(default)]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub stop_date: Option<chrono::NaiveDate>,
}

impl FareFocusDaytimeApplDetail {
    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(stop) = self.stop_date {
            if date > stop {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareFocusDaytimeApplInfo {
    pub day_time_appl_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    pub details: Vec<FareFocusDaytimeApplDetail>,
}

// ============================================================================
// RESULT TABLES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareRetailerCalcDetail {
    /// 'C' calculated percent, 'A' add amount, 'M' markup, 'S' specified
    pub calc_type: char,
    #[serde(default)]
    pub percent: f64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareRetailerCalcInfo {
    pub fare_retailer_calc_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    pub details: Vec<FareRetailerCalcDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareRetailerResultingFareAttrInfo {
    pub resulting_fare_attr_item_no: u64,
    #[serde(default)]
    pub period: EffectivePeriod,
    #[serde(default = "blank")]
    pub redistribute_ind: char,
    #[serde(default = "blank")]
    pub update_ind: char,
    #[serde(default = "blank")]
    pub sell_ind: char,
    #[serde(default = "blank")]
    pub ticket_ind: char,
    #[serde(default)]
    pub ticket_designator: String,
    #[serde(default)]
    pub account_cd: String,
}

/// Carrier membership in a generic alliance (*A Star, *O oneworld, *S SkyTeam)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineAllianceCarrierInfo {
    pub carrier: String,
    pub generic_alliance_code: String,
    #[serde(default)]
    pub alliance_name: String,
}

impl AirlineAllianceCarrierInfo {
    pub fn new(carrier: &str, generic_alliance_code: &str, alliance_name: &str) -> Self {
        AirlineAllianceCarrierInfo {
            carrier: carrier.to_string(),
            generic_alliance_code: generic_alliance_code.to_string(),
            alliance_name: alliance_name.to_string(),
        }
    }
}

pub fn is_alliance_code(code: &str) -> bool {
    code.len() == 2 && code.starts_with('*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_rule_deserializes_with_defaults() {
        let json = r#"{
            "fare_retailer_rule_id": 7,
            "rule_seq_no": 100,
            "application_type": "N",
            "source_pcc": "A0B1",
            "vendor": "ATP",
            "owrt": "X"
        }"#;

        let rule: FareRetailerRuleInfo = serde_json::from_str(json).unwrap();
        assert_eq!(rule.fare_retailer_rule_id, 7);
        assert_eq!(rule.owrt, 'X');
        assert_eq!(rule.public_private_ind, ' ');
        assert!(rule.loc1.is_null());
        assert_eq!(rule.security_item_no, 0);
    }

    #[test]
    fn test_daytime_detail_contains() {
        let detail = FareFocusDaytimeApplDetail {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            stop_date: None,
        };

        assert!(!detail.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(detail.contains(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }

    #[test]
    fn test_alliance_code() {
        assert!(is_alliance_code("*A"));
        assert!(!is_alliance_code("AA"));
        assert!(!is_alliance_code("*"));
    }
}
