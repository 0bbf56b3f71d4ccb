// 🌍 Locations - airports, cities and the geography used by rule matching
//
// A LocKey names a geographic scope (area, nation, city, zone...). The
// LocTable answers "is this market inside that scope?".

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// LOC TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocType {
    #[serde(rename = "A")]
    Area,
    #[serde(rename = "*")]
    SubArea,
    #[serde(rename = "N")]
    Nation,
    #[serde(rename = "S")]
    State,
    #[serde(rename = "C")]
    City,
    #[serde(rename = "P")]
    Airport,
    #[serde(rename = "Z")]
    Zone,
    #[serde(rename = "G")]
    Group,
}

impl LocType {
    pub fn code(&self) -> char {
        match self {
            LocType::Area => 'A',
            LocType::SubArea => '*',
            LocType::Nation => 'N',
            LocType::State => 'S',
            LocType::City => 'C',
            LocType::Airport => 'P',
            LocType::Zone => 'Z',
            LocType::Group => 'G',
        }
    }

    pub fn from_code(code: char) -> Option<LocType> {
        match code {
            'A' => Some(LocType::Area),
            '*' => Some(LocType::SubArea),
            'N' => Some(LocType::Nation),
            'S' => Some(LocType::State),
            'C' => Some(LocType::City),
            'P' => Some(LocType::Airport),
            'Z' => Some(LocType::Zone),
            'G' => Some(LocType::Group),
            _ => None,
        }
    }
}

// ============================================================================
// LOC KEY
// ============================================================================

/// Geographic scope on a rule. An empty `loc` is a null key (matches anything).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocKey {
    pub loc_type: LocType,
    #[serde(default)]
    pub loc: String,
}

impl LocKey {
    pub fn new(loc_type: LocType, loc: &str) -> Self {
        LocKey {
            loc_type,
            loc: loc.to_string(),
        }
    }

    pub fn null() -> Self {
        LocKey {
            loc_type: LocType::City,
            loc: String::new(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.loc.is_empty()
    }
}

impl Default for LocKey {
    fn default() -> Self {
        Self::null()
    }
}

// ============================================================================
// ZONE
// ============================================================================

/// User-defined zone: a named list of member locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneInfo {
    pub zone: String,
    pub members: Vec<LocKey>,
}

impl ZoneInfo {
    pub fn new(zone: &str, members: Vec<LocKey>) -> Self {
        ZoneInfo {
            zone: zone.to_string(),
            members,
        }
    }
}

// ============================================================================
// LOC
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loc {
    /// Airport (or city) code
    pub code: String,

    /// Multi-airport city this point belongs to (NYC for JFK)
    pub city: String,

    /// ISO nation code
    pub nation: String,

    #[serde(default)]
    pub state: Option<String>,

    /// IATA traffic conference area ("1", "2", "3")
    pub area: String,

    pub sub_area: String,

    pub latitude: f64,
    pub longitude: f64,

    /// US/CA/MX buffer zone point
    #[serde(default)]
    pub buffer_zone: bool,
}

impl Loc {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code: &str,
        city: &str,
        nation: &str,
        state: Option<&str>,
        area: &str,
        sub_area: &str,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Loc {
            code: code.to_string(),
            city: city.to_string(),
            nation: nation.to_string(),
            state: state.map(|s| s.to_string()),
            area: area.to_string(),
            sub_area: sub_area.to_string(),
            latitude,
            longitude,
            buffer_zone: false,
        }
    }

    pub fn with_buffer_zone(mut self) -> Self {
        self.buffer_zone = true;
        self
    }

    pub fn is_us(&self) -> bool {
        self.nation == "US"
    }

    /// US territory that is not part of the 50 states (PR, VI, GU...)
    pub fn is_us_territory_only(&self) -> bool {
        matches!(self.nation.as_str(), "PR" | "VI" | "GU" | "AS" | "MP")
    }

    pub fn is_canada(&self) -> bool {
        self.nation == "CA"
    }

    pub fn is_mexico(&self) -> bool {
        self.nation == "MX"
    }

    pub fn is_alaska(&self) -> bool {
        self.is_us() && self.state.as_deref() == Some("AK")
    }

    pub fn is_hawaii(&self) -> bool {
        self.is_us() && self.state.as_deref() == Some("HI")
    }

    /// Great-circle distance in statute miles
    pub fn miles_to(&self, other: &Loc) -> u32 {
        const EARTH_RADIUS_MILES: f64 = 3958.8;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        (EARTH_RADIUS_MILES * c).round() as u32
    }
}

// ============================================================================
// GEO TRAVEL TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoTravelType {
    /// Within the US or within Canada
    Domestic,
    /// Between the US and Canada
    Transborder,
    /// Within one nation other than US/CA
    ForeignDomestic,
    International,
}

impl GeoTravelType {
    /// Classify travel over the given points
    pub fn classify<'a, I>(points: I) -> GeoTravelType
    where
        I: IntoIterator<Item = &'a Loc>,
    {
        let mut nations: Vec<&str> = Vec::new();
        for loc in points {
            let nation = if loc.is_us_territory_only() {
                "US"
            } else {
                loc.nation.as_str()
            };
            if !nations.contains(&nation) {
                nations.push(nation);
            }
        }

        match nations.as_slice() {
            [] => GeoTravelType::International,
            [single] if *single == "US" || *single == "CA" => GeoTravelType::Domestic,
            [_] => GeoTravelType::ForeignDomestic,
            pair if pair.len() == 2 && pair.contains(&"US") && pair.contains(&"CA") => {
                GeoTravelType::Transborder
            }
            _ => GeoTravelType::International,
        }
    }
}

// ============================================================================
// LOC TABLE
// ============================================================================

/// Location table plus zone / group definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocTable {
    locs: HashMap<String, Loc>,

    /// Zone or group code -> member scopes
    zones: HashMap<String, Vec<LocKey>>,
}

impl LocTable {
    pub fn new() -> Self {
        LocTable::default()
    }

    /// Table seeded with the airports used by fixtures and demos
    pub fn with_defaults() -> Self {
        let mut table = LocTable::new();
        table.register_default_locs();
        table
    }

    fn register_default_locs(&mut self) {
        // North America
        self.add(Loc::new("JFK", "NYC", "US", Some("NY"), "1", "11", 40.6398, -73.7789));
        self.add(Loc::new("LGA", "NYC", "US", Some("NY"), "1", "11", 40.7772, -73.8726));
        self.add(Loc::new("ORD", "CHI", "US", Some("IL"), "1", "11", 41.9786, -87.9048));
        self.add(Loc::new("DFW", "DFW", "US", Some("TX"), "1", "11", 32.8968, -97.0380));
        self.add(Loc::new("LAX", "LAX", "US", Some("CA"), "1", "11", 33.9425, -118.4081));
        self.add(Loc::new("SFO", "SFO", "US", Some("CA"), "1", "11", 37.6190, -122.3749));
        self.add(Loc::new("MIA", "MIA", "US", Some("FL"), "1", "11", 25.7932, -80.2906));
        self.add(Loc::new("SEA", "SEA", "US", Some("WA"), "1", "11", 47.4490, -122.3093));
        self.add(Loc::new("HNL", "HNL", "US", Some("HI"), "1", "11", 21.3187, -157.9225));
        self.add(Loc::new("ANC", "ANC", "US", Some("AK"), "1", "11", 61.1744, -149.9964));
        self.add(Loc::new("SJU", "SJU", "PR", None, "1", "11", 18.4394, -66.0018));
        self.add(Loc::new("YYZ", "YTO", "CA", Some("ON"), "1", "11", 43.6772, -79.6306));
        self.add(Loc::new("YVR", "YVR", "CA", Some("BC"), "1", "11", 49.1939, -123.1844));
        self.add(Loc::new("YUL", "YMQ", "CA", Some("QC"), "1", "11", 45.4706, -73.7408));
        self.add(Loc::new("YYC", "YYC", "CA", Some("AB"), "1", "11", 51.1139, -114.0203).with_buffer_zone());
        self.add(Loc::new("MEX", "MEX", "MX", None, "1", "11", 19.4363, -99.0721));
        self.add(Loc::new("SDQ", "SDQ", "DO", None, "1", "12", 18.4297, -69.6689));
        self.add(Loc::new("PUJ", "PUJ", "DO", None, "1", "12", 18.5674, -68.3634));
        self.add(Loc::new("STI", "STI", "DO", None, "1", "12", 19.4061, -70.6047));
        // Europe
        self.add(Loc::new("LHR", "LON", "GB", None, "2", "21", 51.4700, -0.4543));
        self.add(Loc::new("FRA", "FRA", "DE", None, "2", "21", 50.0379, 8.5622));
        self.add(Loc::new("CDG", "PAR", "FR", None, "2", "21", 49.0097, 2.5479));
        self.add(Loc::new("MAD", "MAD", "ES", None, "2", "21", 40.4983, -3.5676));
        // Asia
        self.add(Loc::new("NRT", "TYO", "JP", None, "3", "31", 35.7720, 140.3929));
        self.add(Loc::new("HND", "TYO", "JP", None, "3", "31", 35.5494, 139.7798));
        self.add(Loc::new("KIX", "OSA", "JP", None, "3", "31", 34.4347, 135.2440));
        self.add(Loc::new("CTS", "SPK", "JP", None, "3", "31", 42.7752, 141.6923));
        self.add(Loc::new("PNH", "PNH", "KH", None, "3", "32", 11.5466, 104.8441));
        self.add(Loc::new("REP", "REP", "KH", None, "3", "32", 13.4107, 103.8128));
        self.add(Loc::new("BKK", "BKK", "TH", None, "3", "32", 13.6900, 100.7501));
        self.add(Loc::new("KUL", "KUL", "MY", None, "3", "32", 2.7456, 101.7099));
        self.add(Loc::new("PEN", "PEN", "MY", None, "3", "32", 5.2971, 100.2769));
        self.add(Loc::new("BKI", "BKI", "MY", None, "3", "32", 5.9372, 116.0515));
        self.add(Loc::new("SIN", "SIN", "SG", None, "3", "32", 1.3644, 103.9915));

        // Zone 210: western Europe sample
        self.add_zone(
            "210",
            vec![
                LocKey::new(LocType::Nation, "GB"),
                LocKey::new(LocType::Nation, "DE"),
                LocKey::new(LocType::Nation, "FR"),
                LocKey::new(LocType::Nation, "ES"),
            ],
        );
    }

    pub fn add(&mut self, loc: Loc) {
        self.locs.insert(loc.code.clone(), loc);
    }

    pub fn add_zone(&mut self, code: &str, members: Vec<LocKey>) {
        self.zones.insert(code.to_string(), members);
    }

    pub fn get(&self, code: &str) -> Option<&Loc> {
        self.locs.get(code)
    }

    /// Resolve an airport code or a multi-airport city code
    pub fn resolve(&self, code: &str) -> Option<&Loc> {
        self.locs
            .get(code)
            .or_else(|| self.locs.values().find(|l| l.city == code))
    }

    pub fn count(&self) -> usize {
        self.locs.len()
    }

    pub fn all(&self) -> Vec<Loc> {
        let mut locs: Vec<Loc> = self.locs.values().cloned().collect();
        locs.sort_by(|a, b| a.code.cmp(&b.code));
        locs
    }

    pub fn zones(&self) -> &HashMap<String, Vec<LocKey>> {
        &self.zones
    }

    /// Is the market (airport or city code) inside the scope?
    pub fn is_in_loc(&self, market: &str, key: &LocKey) -> bool {
        if key.is_null() {
            return true;
        }

        match self.resolve(market) {
            Some(loc) => self.loc_in_key(loc, market, key, 0),
            None => {
                // Unknown point: only a literal city/airport match can apply
                matches!(key.loc_type, LocType::City | LocType::Airport) && key.loc == market
            }
        }
    }

    fn loc_in_key(&self, loc: &Loc, market: &str, key: &LocKey, depth: u8) -> bool {
        match key.loc_type {
            LocType::Area => loc.area == key.loc,
            LocType::SubArea => loc.sub_area == key.loc,
            LocType::Nation => loc.nation == key.loc,
            LocType::State => loc.state.as_deref() == Some(key.loc.as_str()),
            LocType::City => loc.city == key.loc || loc.code == key.loc || market == key.loc,
            LocType::Airport => loc.code == key.loc,
            LocType::Zone | LocType::Group => {
                // Zones never nest more than once
                if depth > 1 {
                    return false;
                }
                self.zones
                    .get(&key.loc)
                    .map(|members| {
                        members
                            .iter()
                            .any(|member| self.loc_in_key(loc, market, member, depth + 1))
                    })
                    .unwrap_or(false)
            }
        }
    }

    /// Mileage between two points, 0 when either is unknown
    pub fn miles(&self, from: &str, to: &str) -> u32 {
        match (self.resolve(from), self.resolve(to)) {
            (Some(a), Some(b)) => a.miles_to(b),
            _ => 0,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loc_type_codes() {
        assert_eq!(LocType::from_code('N'), Some(LocType::Nation));
        assert_eq!(LocType::Zone.code(), 'Z');
        assert_eq!(LocType::from_code('Q'), None);
    }

    #[test]
    fn test_is_in_loc_nation_and_city() {
        let table = LocTable::with_defaults();

        assert!(table.is_in_loc("JFK", &LocKey::new(LocType::Nation, "US")));
        assert!(table.is_in_loc("JFK", &LocKey::new(LocType::City, "NYC")));
        assert!(table.is_in_loc("NYC", &LocKey::new(LocType::City, "NYC")));
        assert!(!table.is_in_loc("LHR", &LocKey::new(LocType::Nation, "US")));
        assert!(table.is_in_loc("LHR", &LocKey::new(LocType::Area, "2")));
        assert!(table.is_in_loc("LAX", &LocKey::new(LocType::State, "CA")));
    }

    #[test]
    fn test_is_in_loc_zone() {
        let table = LocTable::with_defaults();
        let zone = LocKey::new(LocType::Zone, "210");

        assert!(table.is_in_loc("FRA", &zone));
        assert!(table.is_in_loc("MAD", &zone));
        assert!(!table.is_in_loc("NRT", &zone));
    }

    #[test]
    fn test_null_key_matches_anything() {
        let table = LocTable::with_defaults();
        assert!(table.is_in_loc("XXX", &LocKey::null()));
    }

    #[test]
    fn test_geo_travel_type() {
        let table = LocTable::with_defaults();
        let jfk = table.get("JFK").unwrap();
        let lax = table.get("LAX").unwrap();
        let yyz = table.get("YYZ").unwrap();
        let nrt = table.get("NRT").unwrap();
        let kix = table.get("KIX").unwrap();
        let lhr = table.get("LHR").unwrap();

        assert_eq!(GeoTravelType::classify([jfk, lax]), GeoTravelType::Domestic);
        assert_eq!(GeoTravelType::classify([jfk, yyz]), GeoTravelType::Transborder);
        assert_eq!(GeoTravelType::classify([nrt, kix]), GeoTravelType::ForeignDomestic);
        assert_eq!(GeoTravelType::classify([jfk, lhr]), GeoTravelType::International);
    }

    #[test]
    fn test_miles() {
        let table = LocTable::with_defaults();
        let miles = table.miles("JFK", "LAX");

        // Published great-circle distance is 2475 miles
        assert!(miles > 2440 && miles < 2500, "got {}", miles);
        assert_eq!(table.miles("JFK", "???"), 0);
    }

    #[test]
    fn test_alaska_hawaii() {
        let table = LocTable::with_defaults();
        assert!(table.get("HNL").unwrap().is_hawaii());
        assert!(table.get("ANC").unwrap().is_alaska());
        assert!(!table.get("LAX").unwrap().is_hawaii());
        assert!(table.get("SJU").unwrap().is_us_territory_only());
    }
}
