// 📚 Reference Tables - date-aware access to every record family
//
// DataHandle is the read seam used by the validators. ReferenceTables is the
// in-memory implementation: one RwLock-guarded store that can be seeded with
// defaults, filled from SQLite (see db.rs) or from fixtures in tests.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::entities::{
    AirlineAllianceCarrierInfo, BankerSellRate, BaseFareRule, Currency,
    CustomerSecurityHandshakeInfo, EffectivePeriod, FareByRuleItemInfo, FareFocusAccountCdInfo,
    FareFocusBookingCodeInfo, FareFocusCarrierInfo, FareFocusDaytimeApplInfo,
    FareFocusDisplayCatTypeInfo, FareFocusFareClassInfo, FareFocusLocationPairInfo,
    FareFocusPsgTypeInfo, FareFocusRuleCodeInfo, FareFocusSecurityInfo, FareRetailerCalcInfo,
    FareRetailerResultingFareAttrInfo, FareRetailerRuleInfo, FareRetailerRuleLookupInfo, Loc,
    LocKey, LocTable, NationInfo, NucInfo, RoundingRule, TaxCodeReg, VendorTypeInfo, ZoneInfo,
};

/// Vendor type of carrier-filed private (SMF) data
pub const SMF_VENDOR_TYPE: char = 'T';

// ============================================================================
// DATED ROWS
// ============================================================================

/// Rows with an effective / discontinue window
pub trait Dated {
    fn period(&self) -> &EffectivePeriod;
}

macro_rules! impl_dated {
    ($($ty:ty),* $(,)?) => {
        $(impl Dated for $ty {
            fn period(&self) -> &EffectivePeriod {
                &self.period
            }
        })*
    };
}

impl_dated!(
    FareRetailerRuleInfo,
    CustomerSecurityHandshakeInfo,
    FareFocusSecurityInfo,
    FareFocusAccountCdInfo,
    FareFocusPsgTypeInfo,
    FareFocusRuleCodeInfo,
    FareFocusCarrierInfo,
    FareFocusFareClassInfo,
    FareFocusBookingCodeInfo,
    FareFocusLocationPairInfo,
    FareFocusDisplayCatTypeInfo,
    FareFocusDaytimeApplInfo,
    FareRetailerCalcInfo,
    FareRetailerResultingFareAttrInfo,
    Currency,
    NucInfo,
    BankerSellRate,
    FareByRuleItemInfo,
    BaseFareRule,
    TaxCodeReg,
);

/// First row of `rows` effective on `date`
fn effective<T: Dated + Clone>(rows: Option<&Vec<T>>, date: NaiveDate) -> Option<T> {
    rows?
        .iter()
        .find(|row| row.period().is_effective(date))
        .cloned()
}

// ============================================================================
// DATA HANDLE
// ============================================================================

/// Read access to reference data as of a date
pub trait DataHandle {
    // Fare retailer
    fn get_customer_security_handshake(
        &self,
        product_cd: &str,
        pcc: &str,
        date: NaiveDate,
    ) -> Vec<CustomerSecurityHandshakeInfo>;

    fn get_fare_retailer_rule_lookup(
        &self,
        application_type: char,
        source_pcc: &str,
        pcc: &str,
    ) -> Option<FareRetailerRuleLookupInfo>;

    fn get_fare_retailer_rule(&self, rule_id: u64, date: NaiveDate) -> Option<FareRetailerRuleInfo>;

    fn get_fare_focus_security(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusSecurityInfo>;
    fn get_fare_focus_account_cd(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusAccountCdInfo>;
    fn get_fare_focus_psg_type(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusPsgTypeInfo>;
    fn get_fare_focus_rule_code(&self, item_no: u64, date: NaiveDate) -> Vec<FareFocusRuleCodeInfo>;
    fn get_fare_focus_carrier(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusCarrierInfo>;
    fn get_fare_focus_fare_class(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusFareClassInfo>;
    fn get_fare_focus_booking_code(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusBookingCodeInfo>;
    fn get_fare_focus_location_pair(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusLocationPairInfo>;
    fn get_fare_focus_display_cat_type(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusDisplayCatTypeInfo>;
    fn get_fare_focus_daytime_appl(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusDaytimeApplInfo>;
    fn get_fare_retailer_calc(&self, item_no: u64, date: NaiveDate) -> Option<FareRetailerCalcInfo>;
    fn get_resulting_fare_attr(&self, item_no: u64, date: NaiveDate) -> Option<FareRetailerResultingFareAttrInfo>;

    fn get_airline_alliance_carrier(&self, carrier: &str) -> Vec<AirlineAllianceCarrierInfo>;
    fn get_vendor_type(&self, vendor: &str) -> Option<char>;

    // Currency
    fn get_currency(&self, code: &str, date: NaiveDate) -> Option<Currency>;
    fn get_nuc(&self, cur: &str, date: NaiveDate) -> Option<NucInfo>;
    fn get_bsr(&self, prime_cur: &str, cur: &str, date: NaiveDate) -> Option<BankerSellRate>;
    fn get_nation(&self, nation: &str) -> Option<NationInfo>;

    // Geography
    fn get_loc(&self, code: &str) -> Option<Loc>;
    fn is_in_loc(&self, market: &str, key: &LocKey) -> bool;
    fn miles(&self, from: &str, to: &str) -> u32;

    // Fare by rule
    fn get_fare_by_rule_item(&self, vendor: &str, item_no: u64, date: NaiveDate) -> Option<FareByRuleItemInfo>;
    fn get_base_fare_rules(&self, vendor: &str, item_no: u64, date: NaiveDate) -> Vec<BaseFareRule>;

    // Taxes
    fn get_tax_codes(&self, date: NaiveDate) -> Vec<TaxCodeReg>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Default)]
struct Store {
    handshakes: Vec<CustomerSecurityHandshakeInfo>,
    lookups: Vec<FareRetailerRuleLookupInfo>,
    rules: HashMap<u64, Vec<FareRetailerRuleInfo>>,
    securities: HashMap<u64, Vec<FareFocusSecurityInfo>>,
    account_cds: HashMap<u64, Vec<FareFocusAccountCdInfo>>,
    psg_types: HashMap<u64, Vec<FareFocusPsgTypeInfo>>,
    rule_codes: HashMap<u64, Vec<FareFocusRuleCodeInfo>>,
    carriers: HashMap<u64, Vec<FareFocusCarrierInfo>>,
    fare_classes: HashMap<u64, Vec<FareFocusFareClassInfo>>,
    booking_codes: HashMap<u64, Vec<FareFocusBookingCodeInfo>>,
    location_pairs: HashMap<u64, Vec<FareFocusLocationPairInfo>>,
    display_cat_types: HashMap<u64, Vec<FareFocusDisplayCatTypeInfo>>,
    daytime_appls: HashMap<u64, Vec<FareFocusDaytimeApplInfo>>,
    calcs: HashMap<u64, Vec<FareRetailerCalcInfo>>,
    resulting_attrs: HashMap<u64, Vec<FareRetailerResultingFareAttrInfo>>,
    alliances: HashMap<String, Vec<AirlineAllianceCarrierInfo>>,
    vendor_types: HashMap<String, char>,
    currencies: HashMap<String, Vec<Currency>>,
    nucs: HashMap<String, Vec<NucInfo>>,
    bsrs: HashMap<String, Vec<BankerSellRate>>,
    nations: HashMap<String, NationInfo>,
    locs: LocTable,
    fbr_items: HashMap<(String, u64), Vec<FareByRuleItemInfo>>,
    base_fare_rules: HashMap<(String, u64), Vec<BaseFareRule>>,
    tax_codes: Vec<TaxCodeReg>,
}

/// Shared, lock-guarded reference data
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    store: Arc<RwLock<Store>>,
}

impl ReferenceTables {
    /// Empty tables
    pub fn new() -> Self {
        ReferenceTables {
            store: Arc::new(RwLock::new(Store::default())),
        }
    }

    /// Tables seeded with locations, currencies, rates, nations and alliances
    pub fn with_defaults() -> Self {
        let tables = ReferenceTables::new();
        tables.register_defaults();
        tables
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    fn register_defaults(&self) {
        {
            let mut store = self.write();
            store.locs = LocTable::with_defaults();
        }

        // Currencies: code, decimals, nation
        for (code, no_dec, nation) in [
            ("USD", 2, "US"),
            ("CAD", 2, "CA"),
            ("MXN", 2, "MX"),
            ("EUR", 2, "DE"),
            ("GBP", 2, "GB"),
            ("JPY", 0, "JP"),
            ("KHR", 0, "KH"),
            ("MYR", 2, "MY"),
            ("THB", 2, "TH"),
        ] {
            self.register_currency(Currency::new(code, no_dec, nation));
        }

        // NUC rates: units per NUC, fare rounding unit and rule
        for (cur, factor, unit, rule) in [
            ("USD", 1.0, 1.0, RoundingRule::Nearest),
            ("CAD", 1.36, 1.0, RoundingRule::Nearest),
            ("MXN", 17.0, 1.0, RoundingRule::Nearest),
            ("EUR", 0.92, 1.0, RoundingRule::Nearest),
            ("GBP", 0.79, 1.0, RoundingRule::Nearest),
            ("JPY", 150.0, 100.0, RoundingRule::Up),
            ("KHR", 4100.0, 100.0, RoundingRule::Nearest),
            ("MYR", 4.7, 1.0, RoundingRule::Nearest),
            ("THB", 36.0, 5.0, RoundingRule::Nearest),
        ] {
            self.register_nuc(NucInfo::new(cur, factor, unit, rule));
        }

        for (prime, cur, rate) in [
            ("USD", "EUR", 0.92),
            ("USD", "GBP", 0.79),
            ("USD", "JPY", 150.0),
            ("USD", "CAD", 1.36),
            ("USD", "MYR", 4.7),
            ("USD", "KHR", 4100.0),
            ("EUR", "USD", 1.087),
            ("EUR", "GBP", 0.86),
            ("GBP", "USD", 1.27),
            ("JPY", "USD", 0.0067),
            ("CAD", "USD", 0.735),
            ("MYR", "USD", 0.213),
        ] {
            self.register_bsr(BankerSellRate::new(prime, cur, rate));
        }

        for (nation, cur, unit, rule, conversion) in [
            ("US", "USD", 0.01, RoundingRule::Nearest, None),
            ("CA", "CAD", 0.01, RoundingRule::Nearest, None),
            ("MX", "MXN", 0.01, RoundingRule::Nearest, None),
            ("GB", "GBP", 0.01, RoundingRule::Nearest, None),
            ("DE", "EUR", 0.01, RoundingRule::Nearest, None),
            ("FR", "EUR", 0.01, RoundingRule::Nearest, None),
            ("ES", "EUR", 0.01, RoundingRule::Nearest, None),
            ("JP", "JPY", 1.0, RoundingRule::Down, None),
            ("KH", "KHR", 100.0, RoundingRule::Nearest, Some("USD")),
            ("MY", "MYR", 0.01, RoundingRule::Nearest, None),
            ("TH", "THB", 1.0, RoundingRule::Nearest, None),
        ] {
            let mut info = NationInfo::new(nation, cur, unit, rule);
            info.conversion_currency = conversion.map(|c: &str| c.to_string());
            self.register_nation(info);
        }

        for (carrier, code, name) in [
            ("AA", "*O", "ONEWORLD"),
            ("BA", "*O", "ONEWORLD"),
            ("JL", "*O", "ONEWORLD"),
            ("UA", "*A", "STAR ALLIANCE"),
            ("LH", "*A", "STAR ALLIANCE"),
            ("NH", "*A", "STAR ALLIANCE"),
            ("AC", "*A", "STAR ALLIANCE"),
            ("DL", "*S", "SKYTEAM"),
            ("AF", "*S", "SKYTEAM"),
        ] {
            self.register_alliance(AirlineAllianceCarrierInfo::new(carrier, code, name));
        }

        self.register_vendor_type(VendorTypeInfo::new("ATP", 'P'));
        self.register_vendor_type(VendorTypeInfo::new("SITA", 'P'));
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    pub fn register_handshake(&self, info: CustomerSecurityHandshakeInfo) {
        self.write().handshakes.push(info);
    }

    pub fn register_lookup(&self, info: FareRetailerRuleLookupInfo) {
        let mut store = self.write();
        store.lookups.retain(|l| {
            !(l.application_type == info.application_type
                && l.source_pcc == info.source_pcc
                && l.pcc == info.pcc)
        });
        store.lookups.push(info);
    }

    pub fn register_rule(&self, rule: FareRetailerRuleInfo) {
        self.write()
            .rules
            .entry(rule.fare_retailer_rule_id)
            .or_default()
            .push(rule);
    }

    pub fn register_security(&self, info: FareFocusSecurityInfo) {
        self.write()
            .securities
            .entry(info.security_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_account_cd(&self, info: FareFocusAccountCdInfo) {
        self.write()
            .account_cds
            .entry(info.account_cd_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_psg_type(&self, info: FareFocusPsgTypeInfo) {
        self.write()
            .psg_types
            .entry(info.psg_type_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_rule_code(&self, info: FareFocusRuleCodeInfo) {
        self.write()
            .rule_codes
            .entry(info.rule_cd_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_carrier(&self, info: FareFocusCarrierInfo) {
        self.write()
            .carriers
            .entry(info.carrier_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_fare_class(&self, info: FareFocusFareClassInfo) {
        self.write()
            .fare_classes
            .entry(info.fare_class_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_booking_code(&self, info: FareFocusBookingCodeInfo) {
        self.write()
            .booking_codes
            .entry(info.booking_cd_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_location_pair(&self, info: FareFocusLocationPairInfo) {
        self.write()
            .location_pairs
            .entry(info.location_pair_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_display_cat_type(&self, info: FareFocusDisplayCatTypeInfo) {
        self.write()
            .display_cat_types
            .entry(info.display_cat_type_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_daytime_appl(&self, info: FareFocusDaytimeApplInfo) {
        self.write()
            .daytime_appls
            .entry(info.day_time_appl_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_calc(&self, info: FareRetailerCalcInfo) {
        self.write()
            .calcs
            .entry(info.fare_retailer_calc_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_resulting_fare_attr(&self, info: FareRetailerResultingFareAttrInfo) {
        self.write()
            .resulting_attrs
            .entry(info.resulting_fare_attr_item_no)
            .or_default()
            .push(info);
    }

    pub fn register_alliance(&self, info: AirlineAllianceCarrierInfo) {
        self.write()
            .alliances
            .entry(info.carrier.clone())
            .or_default()
            .push(info);
    }

    pub fn register_vendor_type(&self, info: VendorTypeInfo) {
        self.write().vendor_types.insert(info.vendor, info.vendor_type);
    }

    pub fn register_currency(&self, currency: Currency) {
        self.write()
            .currencies
            .entry(currency.code.clone())
            .or_default()
            .push(currency);
    }

    pub fn register_nuc(&self, nuc: NucInfo) {
        let mut store = self.write();
        let rows = store.nucs.entry(nuc.cur.clone()).or_default();
        // Newest registration wins for the same period
        rows.retain(|row| row.period != nuc.period);
        rows.insert(0, nuc);
    }

    pub fn register_bsr(&self, bsr: BankerSellRate) {
        let mut store = self.write();
        let rows = store.bsrs.entry(bsr.prime_cur.clone()).or_default();
        rows.retain(|row| !(row.cur == bsr.cur && row.period == bsr.period));
        rows.insert(0, bsr);
    }

    pub fn register_nation(&self, info: NationInfo) {
        self.write().nations.insert(info.nation.clone(), info);
    }

    pub fn register_loc(&self, loc: Loc) {
        self.write().locs.add(loc);
    }

    pub fn register_zone(&self, info: ZoneInfo) {
        self.write().locs.add_zone(&info.zone, info.members);
    }

    pub fn register_fare_by_rule_item(&self, item: FareByRuleItemInfo) {
        self.write()
            .fbr_items
            .entry((item.vendor.clone(), item.item_no))
            .or_default()
            .push(item);
    }

    pub fn register_base_fare_rule(&self, rule: BaseFareRule) {
        let mut store = self.write();
        let rows = store
            .base_fare_rules
            .entry((rule.vendor.clone(), rule.item_no))
            .or_default();
        rows.push(rule);
        rows.sort_by_key(|r| r.seq_no);
    }

    pub fn register_tax_code(&self, reg: TaxCodeReg) {
        let mut store = self.write();
        store.tax_codes.push(reg);
        store
            .tax_codes
            .sort_by(|a, b| a.tax_code.cmp(&b.tax_code).then(a.seq_no.cmp(&b.seq_no)));
    }

    // ========================================================================
    // STATS
    // ========================================================================

    pub fn rule_count(&self) -> usize {
        self.read().rules.values().map(|rows| rows.len()).sum()
    }

    pub fn loc_count(&self) -> usize {
        self.read().locs.count()
    }

    pub fn bsr_count(&self) -> usize {
        self.read().bsrs.values().map(|rows| rows.len()).sum()
    }

    pub fn tax_code_count(&self) -> usize {
        self.read().tax_codes.len()
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl DataHandle for ReferenceTables {
    fn get_customer_security_handshake(
        &self,
        product_cd: &str,
        pcc: &str,
        date: NaiveDate,
    ) -> Vec<CustomerSecurityHandshakeInfo> {
        self.read()
            .handshakes
            .iter()
            .filter(|h| h.product_cd == product_cd && h.pcc == pcc && h.period.is_effective(date))
            .cloned()
            .collect()
    }

    fn get_fare_retailer_rule_lookup(
        &self,
        application_type: char,
        source_pcc: &str,
        pcc: &str,
    ) -> Option<FareRetailerRuleLookupInfo> {
        self.read()
            .lookups
            .iter()
            .find(|l| {
                l.application_type == application_type && l.source_pcc == source_pcc && l.pcc == pcc
            })
            .cloned()
    }

    fn get_fare_retailer_rule(&self, rule_id: u64, date: NaiveDate) -> Option<FareRetailerRuleInfo> {
        effective(self.read().rules.get(&rule_id), date)
    }

    fn get_fare_focus_security(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusSecurityInfo> {
        effective(self.read().securities.get(&item_no), date)
    }

    fn get_fare_focus_account_cd(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusAccountCdInfo> {
        effective(self.read().account_cds.get(&item_no), date)
    }

    fn get_fare_focus_psg_type(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusPsgTypeInfo> {
        effective(self.read().psg_types.get(&item_no), date)
    }

    fn get_fare_focus_rule_code(&self, item_no: u64, date: NaiveDate) -> Vec<FareFocusRuleCodeInfo> {
        self.read()
            .rule_codes
            .get(&item_no)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.period.is_effective(date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_fare_focus_carrier(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusCarrierInfo> {
        effective(self.read().carriers.get(&item_no), date)
    }

    fn get_fare_focus_fare_class(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusFareClassInfo> {
        effective(self.read().fare_classes.get(&item_no), date)
    }

    fn get_fare_focus_booking_code(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusBookingCodeInfo> {
        effective(self.read().booking_codes.get(&item_no), date)
    }

    fn get_fare_focus_location_pair(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusLocationPairInfo> {
        effective(self.read().location_pairs.get(&item_no), date)
    }

    fn get_fare_focus_display_cat_type(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusDisplayCatTypeInfo> {
        effective(self.read().display_cat_types.get(&item_no), date)
    }

    fn get_fare_focus_daytime_appl(&self, item_no: u64, date: NaiveDate) -> Option<FareFocusDaytimeApplInfo> {
        effective(self.read().daytime_appls.get(&item_no), date)
    }

    fn get_fare_retailer_calc(&self, item_no: u64, date: NaiveDate) -> Option<FareRetailerCalcInfo> {
        effective(self.read().calcs.get(&item_no), date)
    }

    fn get_resulting_fare_attr(&self, item_no: u64, date: NaiveDate) -> Option<FareRetailerResultingFareAttrInfo> {
        effective(self.read().resulting_attrs.get(&item_no), date)
    }

    fn get_airline_alliance_carrier(&self, carrier: &str) -> Vec<AirlineAllianceCarrierInfo> {
        self.read()
            .alliances
            .get(carrier)
            .cloned()
            .unwrap_or_default()
    }

    fn get_vendor_type(&self, vendor: &str) -> Option<char> {
        self.read().vendor_types.get(vendor).copied()
    }

    fn get_currency(&self, code: &str, date: NaiveDate) -> Option<Currency> {
        effective(self.read().currencies.get(code), date)
    }

    fn get_nuc(&self, cur: &str, date: NaiveDate) -> Option<NucInfo> {
        effective(self.read().nucs.get(cur), date)
    }

    fn get_bsr(&self, prime_cur: &str, cur: &str, date: NaiveDate) -> Option<BankerSellRate> {
        self.read().bsrs.get(prime_cur).and_then(|rows| {
            rows.iter()
                .find(|row| row.cur == cur && row.period.is_effective(date))
                .cloned()
        })
    }

    fn get_nation(&self, nation: &str) -> Option<NationInfo> {
        self.read().nations.get(nation).cloned()
    }

    fn get_loc(&self, code: &str) -> Option<Loc> {
        self.read().locs.resolve(code).cloned()
    }

    fn is_in_loc(&self, market: &str, key: &LocKey) -> bool {
        self.read().locs.is_in_loc(market, key)
    }

    fn miles(&self, from: &str, to: &str) -> u32 {
        self.read().locs.miles(from, to)
    }

    fn get_fare_by_rule_item(&self, vendor: &str, item_no: u64, date: NaiveDate) -> Option<FareByRuleItemInfo> {
        effective(
            self.read().fbr_items.get(&(vendor.to_string(), item_no)),
            date,
        )
    }

    fn get_base_fare_rules(&self, vendor: &str, item_no: u64, date: NaiveDate) -> Vec<BaseFareRule> {
        self.read()
            .base_fare_rules
            .get(&(vendor.to_string(), item_no))
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.period.is_effective(date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_tax_codes(&self, date: NaiveDate) -> Vec<TaxCodeReg> {
        self.read()
            .tax_codes
            .iter()
            .filter(|reg| reg.period.is_effective(date))
            .cloned()
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
