// 🎫 Fares - published fares, paxtype fares, fare markets and travel segments
//
// Booking-code status lives on the PaxTypeFare (one fare-level bit set plus
// one SegmentStatus per travel segment of its market).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::loc::GeoTravelType;

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Directionality {
    #[serde(rename = "F")]
    From,
    #[serde(rename = "T")]
    To,
    #[serde(rename = "B")]
    Both,
}

impl Directionality {
    pub fn code(&self) -> char {
        match self {
            Directionality::From => 'F',
            Directionality::To => 'T',
            Directionality::Both => 'B',
        }
    }
}

impl Default for Directionality {
    fn default() -> Self {
        Directionality::Both
    }
}

/// One-way / round-trip indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owrt {
    #[serde(rename = "1")]
    OneWayMayBeDoubled,
    #[serde(rename = "2")]
    RoundTripMayNotBeHalved,
    #[serde(rename = "3")]
    OneWayMayNotBeDoubled,
}

impl Owrt {
    pub fn code(&self) -> char {
        match self {
            Owrt::OneWayMayBeDoubled => '1',
            Owrt::RoundTripMayNotBeHalved => '2',
            Owrt::OneWayMayNotBeDoubled => '3',
        }
    }

    pub fn from_code(code: char) -> Option<Owrt> {
        match code {
            '1' => Some(Owrt::OneWayMayBeDoubled),
            '2' => Some(Owrt::RoundTripMayNotBeHalved),
            '3' => Some(Owrt::OneWayMayNotBeDoubled),
            _ => None,
        }
    }

    pub fn is_one_way(&self) -> bool {
        !matches!(self, Owrt::RoundTripMayNotBeHalved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TariffCategory {
    Public,
    Private,
}

impl TariffCategory {
    pub fn as_str(&self) -> &str {
        match self {
            TariffCategory::Public => "public",
            TariffCategory::Private => "private",
        }
    }
}

impl Default for TariffCategory {
    fn default() -> Self {
        TariffCategory::Public
    }
}

/// Cabin, ordered from the most premium to economy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CabinType {
    #[serde(rename = "R")]
    PremiumFirst,
    #[serde(rename = "F")]
    First,
    #[serde(rename = "J")]
    PremiumBusiness,
    #[serde(rename = "C")]
    Business,
    #[serde(rename = "W")]
    PremiumEconomy,
    #[serde(rename = "Y")]
    Economy,
}

impl CabinType {
    pub fn code(&self) -> char {
        match self {
            CabinType::PremiumFirst => 'R',
            CabinType::First => 'F',
            CabinType::PremiumBusiness => 'J',
            CabinType::Business => 'C',
            CabinType::PremiumEconomy => 'W',
            CabinType::Economy => 'Y',
        }
    }
}

impl Default for CabinType {
    fn default() -> Self {
        CabinType::Economy
    }
}

// ============================================================================
// STATUS BIT SETS
// ============================================================================

macro_rules! status_bits {
    ($name:ident { $($flag:ident = $bit:expr),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            $(pub const $flag: u32 = 1 << $bit;)*

            pub fn new() -> Self {
                $name(0)
            }

            pub fn with(flag: u32) -> Self {
                $name(flag)
            }

            pub fn set(&mut self, flag: u32, on: bool) {
                if on {
                    self.0 |= flag;
                } else {
                    self.0 &= !flag;
                }
            }

            pub fn is_set(&self, flag: u32) -> bool {
                self.0 & flag != 0
            }

            pub fn is_null(&self) -> bool {
                self.0 == 0
            }

            pub fn set_null(&mut self) {
                self.0 = 0;
            }

            pub fn bits(&self) -> u32 {
                self.0
            }
        }
    };
}

status_bits!(BookingCodeStatus {
    NOT_YET_PROCESSED = 0,
    PASS = 1,
    FAIL = 2,
    MIXED = 3,
    PASS_LOCAL_AVAIL = 4,
    NOMATCH = 5,
});

status_bits!(SegmentStatusBits {
    NOT_YET_PROCESSED = 0,
    PASS = 1,
    FAIL = 2,
    NOMATCH = 3,
    SURFACE = 4,
    REBOOKED = 5,
    NEED_REVALIDATION = 6,
    NOT_AVAILABLE = 7,
    NOT_OFFERED = 8,
});

/// Booking-code outcome for one travel segment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentStatus {
    pub status: SegmentStatusBits,

    #[serde(default)]
    pub rebook_code: Option<String>,

    #[serde(default)]
    pub rebook_cabin: Option<CabinType>,
}

impl SegmentStatus {
    pub fn with(flag: u32) -> Self {
        SegmentStatus {
            status: SegmentStatusBits::with(flag),
            rebook_code: None,
            rebook_cabin: None,
        }
    }
}

// ============================================================================
// TRAVEL SEGMENTS
// ============================================================================

/// Offered class of service with remaining seats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassOfService {
    pub booking_code: String,
    pub num_seats: u16,
    pub cabin: CabinType,
}

impl ClassOfService {
    pub fn new(booking_code: &str, num_seats: u16, cabin: CabinType) -> Self {
        ClassOfService {
            booking_code: booking_code.to_string(),
            num_seats,
            cabin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelSeg {
    pub origin: String,
    pub destination: String,

    /// Marketing carrier (empty on surface segments)
    #[serde(default)]
    pub carrier: String,

    #[serde(default)]
    pub booking_code: String,

    #[serde(default)]
    pub booked_cabin: CabinType,

    pub departure_date: NaiveDate,

    /// false = surface / arunk
    #[serde(default = "default_true")]
    pub air: bool,

    /// Availability for this segment
    #[serde(default)]
    pub classes_of_service: Vec<ClassOfService>,
}

fn default_true() -> bool {
    true
}

impl TravelSeg {
    pub fn air(
        origin: &str,
        destination: &str,
        carrier: &str,
        booking_code: &str,
        departure_date: NaiveDate,
    ) -> Self {
        TravelSeg {
            origin: origin.to_string(),
            destination: destination.to_string(),
            carrier: carrier.to_string(),
            booking_code: booking_code.to_string(),
            booked_cabin: CabinType::Economy,
            departure_date,
            air: true,
            classes_of_service: Vec::new(),
        }
    }

    pub fn surface(origin: &str, destination: &str, departure_date: NaiveDate) -> Self {
        TravelSeg {
            origin: origin.to_string(),
            destination: destination.to_string(),
            carrier: String::new(),
            booking_code: String::new(),
            booked_cabin: CabinType::Economy,
            departure_date,
            air: false,
            classes_of_service: Vec::new(),
        }
    }

    pub fn with_cabin(mut self, cabin: CabinType) -> Self {
        self.booked_cabin = cabin;
        self
    }

    pub fn with_availability(mut self, classes: Vec<ClassOfService>) -> Self {
        self.classes_of_service = classes;
        self
    }
}

// ============================================================================
// FARE MARKET
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareMarket {
    pub origin: String,
    pub destination: String,

    /// Multi-airport city codes of the end points
    #[serde(default)]
    pub board_multi_city: String,
    #[serde(default)]
    pub off_multi_city: String,

    pub governing_carrier: String,

    pub geo_travel_type: GeoTravelType,

    pub travel_segs: Vec<TravelSeg>,
}

impl FareMarket {
    pub fn new(
        origin: &str,
        destination: &str,
        governing_carrier: &str,
        geo_travel_type: GeoTravelType,
        travel_segs: Vec<TravelSeg>,
    ) -> Self {
        FareMarket {
            origin: origin.to_string(),
            destination: destination.to_string(),
            board_multi_city: origin.to_string(),
            off_multi_city: destination.to_string(),
            governing_carrier: governing_carrier.to_string(),
            geo_travel_type,
            travel_segs,
        }
    }

    pub fn with_multi_cities(mut self, board: &str, off: &str) -> Self {
        self.board_multi_city = board.to_string();
        self.off_multi_city = off.to_string();
        self
    }

    /// Departure date of the first segment
    pub fn travel_date(&self) -> Option<NaiveDate> {
        self.travel_segs.first().map(|seg| seg.departure_date)
    }

    pub fn is_domestic_or_transborder(&self) -> bool {
        matches!(
            self.geo_travel_type,
            GeoTravelType::Domestic | GeoTravelType::Transborder
        )
    }
}

// ============================================================================
// FARE
// ============================================================================

/// Published (record 1) fare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    pub vendor: String,
    pub carrier: String,
    pub market1: String,
    pub market2: String,

    /// Fare class, optionally followed by "/ticket designator"
    pub fare_class: String,

    #[serde(default)]
    pub fare_tariff: u32,

    #[serde(default)]
    pub rule_number: String,

    /// ATPCO fare type ("XEX", "BU", "EU"...)
    #[serde(default)]
    pub fare_type: String,

    pub currency: String,

    /// Amount in `currency`
    pub amount: f64,

    #[serde(default)]
    pub nuc_amount: f64,

    pub owrt: Owrt,

    #[serde(default)]
    pub directionality: Directionality,

    #[serde(default)]
    pub tariff_category: TariffCategory,

    #[serde(default)]
    pub global_direction: String,

    /// Cat 35 display type (' ' when not a negotiated fare)
    #[serde(default = "default_blank")]
    pub display_cat_type: char,

    /// Record 1 prime booking codes
    #[serde(default)]
    pub prime_booking_codes: Vec<String>,

    #[serde(default)]
    pub cabin: CabinType,

    /// Industry (YY) fare
    #[serde(default)]
    pub industry: bool,
}

fn default_blank() -> char {
    ' '
}

impl Fare {
    /// Fare basis without ticket designator
    pub fn fare_basis(&self) -> &str {
        match self.fare_class.find('/') {
            Some(pos) => &self.fare_class[..pos],
            None => &self.fare_class,
        }
    }

    pub fn is_public(&self) -> bool {
        self.tariff_category == TariffCategory::Public
    }
}

// ============================================================================
// PAX TYPE FARE
// ============================================================================

/// A fare as seen by one passenger type, carrying its validation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaxTypeFare {
    pub fare: Fare,

    /// Passenger type the fare class application names (empty = adult)
    #[serde(default)]
    pub pax_type: String,

    /// Record 8 account code when created by a fare-by-rule
    #[serde(default)]
    pub fbr_account_code: Option<String>,

    /// Cat 1 eligibility account code
    #[serde(default)]
    pub cat1_account_code: Option<String>,

    /// Account code matched during rule validation
    #[serde(default)]
    pub matched_account_code: Option<String>,

    #[serde(default)]
    pub fare_by_rule: bool,

    /// Fare is used against the direction it was filed in
    #[serde(default)]
    pub reversed: bool,

    /// Valid for command pricing (WPQ)
    #[serde(default)]
    pub cmd_pricing: bool,

    #[serde(default)]
    pub booking_code_status: BookingCodeStatus,

    #[serde(default)]
    pub segment_status: Vec<SegmentStatus>,
}

impl PaxTypeFare {
    pub fn new(fare: Fare) -> Self {
        PaxTypeFare {
            fare,
            pax_type: String::new(),
            fbr_account_code: None,
            cat1_account_code: None,
            matched_account_code: None,
            fare_by_rule: false,
            reversed: false,
            cmd_pricing: false,
            booking_code_status: BookingCodeStatus::with(BookingCodeStatus::NOT_YET_PROCESSED),
            segment_status: Vec::new(),
        }
    }

    /// Account code in priority order: FBR record 8, Cat 1, matched
    pub fn account_code(&self) -> Option<&str> {
        [
            &self.fbr_account_code,
            &self.cat1_account_code,
            &self.matched_account_code,
        ]
        .into_iter()
        .flatten()
        .map(|code| code.as_str())
        .find(|code| !code.is_empty())
    }

    pub fn carrier(&self) -> &str {
        &self.fare.carrier
    }

    pub fn vendor(&self) -> &str {
        &self.fare.vendor
    }

    pub fn fare_basis(&self) -> &str {
        self.fare.fare_basis()
    }

    /// Market origin as travelled (swapped for reversed fares)
    pub fn travel_origin(&self) -> &str {
        if self.reversed {
            &self.fare.market2
        } else {
            &self.fare.market1
        }
    }

    /// Reset segment statuses for the market: air segments pending, surface marked
    pub fn init_segment_status(&mut self, market: &FareMarket) {
        self.segment_status = market
            .travel_segs
            .iter()
            .map(|seg| {
                if seg.air {
                    SegmentStatus::with(SegmentStatusBits::NOT_YET_PROCESSED)
                } else {
                    SegmentStatus::with(SegmentStatusBits::SURFACE)
                }
            })
            .collect();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fare() -> Fare {
        Fare {
            vendor: "ATP".to_string(),
            carrier: "AA".to_string(),
            market1: "NYC".to_string(),
            market2: "LON".to_string(),
            fare_class: "YOWUS/CH".to_string(),
            fare_tariff: 1,
            rule_number: "2000".to_string(),
            fare_type: "EU".to_string(),
            currency: "USD".to_string(),
            amount: 500.0,
            nuc_amount: 500.0,
            owrt: Owrt::OneWayMayBeDoubled,
            directionality: Directionality::From,
            tariff_category: TariffCategory::Public,
            global_direction: "AT".to_string(),
            display_cat_type: ' ',
            prime_booking_codes: vec!["Y".to_string()],
            cabin: CabinType::Economy,
            industry: false,
        }
    }

    #[test]
    fn test_fare_basis_strips_designator() {
        let fare = sample_fare();
        assert_eq!(fare.fare_basis(), "YOWUS");
    }

    #[test]
    fn test_account_code_priority() {
        let mut ptf = PaxTypeFare::new(sample_fare());
        assert_eq!(ptf.account_code(), None);

        ptf.matched_account_code = Some("MATCHED".to_string());
        assert_eq!(ptf.account_code(), Some("MATCHED"));

        ptf.cat1_account_code = Some("CAT1".to_string());
        assert_eq!(ptf.account_code(), Some("CAT1"));

        ptf.fbr_account_code = Some("FBR".to_string());
        assert_eq!(ptf.account_code(), Some("FBR"));
    }

    #[test]
    fn test_status_bits() {
        let mut status = BookingCodeStatus::new();
        assert!(status.is_null());

        status.set(BookingCodeStatus::PASS, true);
        status.set(BookingCodeStatus::PASS_LOCAL_AVAIL, true);
        assert!(status.is_set(BookingCodeStatus::PASS));
        assert!(!status.is_set(BookingCodeStatus::FAIL));

        status.set(BookingCodeStatus::PASS, false);
        assert!(!status.is_set(BookingCodeStatus::PASS));
        assert!(status.is_set(BookingCodeStatus::PASS_LOCAL_AVAIL));
    }

    #[test]
    fn test_cabin_ordering() {
        assert!(CabinType::First < CabinType::Business);
        assert!(CabinType::Business < CabinType::Economy);
    }

    #[test]
    fn test_init_segment_status() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let market = FareMarket::new(
            "JFK",
            "LAX",
            "AA",
            GeoTravelType::Domestic,
            vec![
                TravelSeg::air("JFK", "ORD", "AA", "Y", date),
                TravelSeg::surface("ORD", "MDW", date),
                TravelSeg::air("MDW", "LAX", "AA", "Y", date),
            ],
        );

        let mut ptf = PaxTypeFare::new(sample_fare());
        ptf.init_segment_status(&market);

        assert_eq!(ptf.segment_status.len(), 3);
        assert!(ptf.segment_status[0]
            .status
            .is_set(SegmentStatusBits::NOT_YET_PROCESSED));
        assert!(ptf.segment_status[1].status.is_set(SegmentStatusBits::SURFACE));
    }

    #[test]
    fn test_owrt_codes() {
        assert_eq!(Owrt::from_code('2'), Some(Owrt::RoundTripMayNotBeHalved));
        assert!(Owrt::OneWayMayNotBeDoubled.is_one_way());
        assert!(!Owrt::RoundTripMayNotBeHalved.is_one_way());
    }
}
