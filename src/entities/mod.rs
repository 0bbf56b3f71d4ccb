// Entity Models - reference data rows and transaction-scoped records
//
// Each dated reference row carries an EffectivePeriod. Lookups filter on the
// (adjusted) ticket date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod currency;
pub mod fare;
pub mod fbr;
pub mod loc;
pub mod retailer;
pub mod tax_code;

pub use currency::{decimals_of, BankerSellRate, Currency, NationInfo, NucInfo, RoundingRule, NUC};
pub use fare::{
    BookingCodeStatus, CabinType, ClassOfService, Directionality, Fare, FareMarket, Owrt,
    PaxTypeFare, SegmentStatus, SegmentStatusBits, TariffCategory, TravelSeg,
};
pub use fbr::{
    BaseFareRule, FareByRuleApp, FareByRuleItemInfo, FareInd, ANY_GLOBAL_DIRECTION, BLANK_CURRENCY,
};
pub use loc::{GeoTravelType, Loc, LocKey, LocTable, LocType, ZoneInfo};
pub use retailer::{
    is_alliance_code, AirlineAllianceCarrierInfo, CustomerSecurityHandshakeInfo,
    FareFocusAccountCdInfo, FareFocusBookingCodeInfo, FareFocusCarrierInfo,
    FareFocusDaytimeApplDetail, FareFocusDaytimeApplInfo, FareFocusDisplayCatTypeInfo,
    FareFocusFareClassInfo, FareFocusLocationPairInfo, FareFocusPsgTypeInfo,
    FareFocusRuleCodeInfo, FareFocusSecurityDetail, FareFocusSecurityInfo, FareRetailerCalcDetail,
    FareRetailerCalcInfo, FareRetailerResultingFareAttrInfo, FareRetailerRuleInfo,
    FareRetailerRuleLookupId, FareRetailerRuleLookupInfo, LocationPair, PseudoCityType, VendorTypeInfo,
};
pub use tax_code::{TaxCodeReg, TaxType};

// ============================================================================
// EFFECTIVE PERIOD
// ============================================================================

/// Effective / discontinue window of a reference row (both ends inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePeriod {
    pub effective: NaiveDate,

    /// None = open ended
    #[serde(default)]
    pub discontinue: Option<NaiveDate>,
}

impl EffectivePeriod {
    pub fn new(effective: NaiveDate, discontinue: Option<NaiveDate>) -> Self {
        EffectivePeriod {
            effective,
            discontinue,
        }
    }

    /// Period that is always in effect
    pub fn always() -> Self {
        EffectivePeriod {
            effective: NaiveDate::MIN,
            discontinue: None,
        }
    }

    pub fn is_effective(&self, date: NaiveDate) -> bool {
        if date < self.effective {
            return false;
        }

        match self.discontinue {
            Some(disc) => date <= disc,
            None => true,
        }
    }
}

impl Default for EffectivePeriod {
    fn default() -> Self {
        Self::always()
    }
}
