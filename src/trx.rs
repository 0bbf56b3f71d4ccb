// 🧳 Pricing Transaction - agent, request options and shared reference data
//
// Everything a validator needs for one pricing request. Owned by the caller;
// validators borrow it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::diagnostic::Diagnostic;
use crate::tables::DataHandle;

// ============================================================================
// AGENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Branch travel agency PCC
    pub branch_pcc: String,

    /// Home (main) travel agency PCC
    #[serde(default)]
    pub home_pcc: String,

    /// Agent location (airport or city code)
    pub location: String,

    /// Agent (sales) currency
    pub currency: String,
}

impl Agent {
    pub fn new(branch_pcc: &str, home_pcc: &str, location: &str, currency: &str) -> Self {
        Agent {
            branch_pcc: branch_pcc.to_string(),
            home_pcc: home_pcc.to_string(),
            location: location.to_string(),
            currency: currency.to_string(),
        }
    }

    /// Home PCC differs from the branch PCC
    pub fn has_distinct_home(&self) -> bool {
        !self.home_pcc.is_empty() && self.home_pcc != self.branch_pcc
    }
}

// ============================================================================
// REQUEST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub ticket_date: NaiveDate,

    /// Requested payment currency (WPM)
    #[serde(default)]
    pub currency_override: Option<String>,

    /// BSR rate overrides (0 = none)
    #[serde(default)]
    pub rate_amount_override: f64,
    #[serde(default)]
    pub second_rate_amount_override: f64,

    /// Fare retailer codes named on the request
    #[serde(default)]
    pub fare_retailer_codes: Vec<String>,

    /// Low fare search with rebooking (WPNC)
    #[serde(default)]
    pub low_fare_requested: bool,

    #[serde(default = "default_pax_count")]
    pub pax_count: u16,

    /// Leave converted amounts unrounded
    #[serde(default)]
    pub no_rounding: bool,

    /// Customer security handshake product code
    #[serde(default = "default_product_cd")]
    pub product_cd: String,
}

fn default_pax_count() -> u16 {
    1
}

fn default_product_cd() -> String {
    "FF".to_string()
}

impl PricingRequest {
    pub fn new(ticket_date: NaiveDate) -> Self {
        PricingRequest {
            ticket_date,
            currency_override: None,
            rate_amount_override: 0.0,
            second_rate_amount_override: 0.0,
            fare_retailer_codes: Vec::new(),
            low_fare_requested: false,
            pax_count: default_pax_count(),
            no_rounding: false,
            product_cd: default_product_cd(),
        }
    }

    /// Retailer code on a rule matches the request.
    /// A blank rule code matches only when the request names none.
    pub fn is_match_retailer_code(&self, code: &str) -> bool {
        if code.trim().is_empty() {
            return self.fare_retailer_codes.is_empty();
        }
        self.fare_retailer_codes.iter().any(|c| c == code)
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

pub struct PricingTrx {
    pub id: String,
    pub agent: Agent,
    pub request: PricingRequest,

    /// ICER rates: BSR conversions always use source -> target directly
    pub icer_active: bool,

    pub diagnostic: Diagnostic,

    data: Arc<dyn DataHandle + Send + Sync>,
}

impl PricingTrx {
    pub fn new(agent: Agent, request: PricingRequest, data: Arc<dyn DataHandle + Send + Sync>) -> Self {
        PricingTrx {
            id: Uuid::new_v4().to_string(),
            agent,
            request,
            icer_active: true,
            diagnostic: Diagnostic::off(),
            data,
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostic = diagnostic;
        self
    }

    pub fn with_icer(mut self, icer_active: bool) -> Self {
        self.icer_active = icer_active;
        self
    }

    pub fn data(&self) -> &dyn DataHandle {
        self.data.as_ref()
    }

    pub fn ticket_date(&self) -> NaiveDate {
        self.request.ticket_date
    }

    /// Payment currency: override if requested, else the agent currency
    pub fn payment_currency(&self) -> &str {
        self.request
            .currency_override
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.agent.currency)
    }

    /// Nation of the point of sale ("" when the agent location is unknown)
    pub fn pos_nation(&self) -> String {
        self.data()
            .get_loc(&self.agent.location)
            .map(|loc| loc.nation)
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for PricingTrx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingTrx")
            .field("id", &self.id)
            .field("agent", &self.agent)
            .field("request", &self.request)
            .field("icer_active", &self.icer_active)
            .finish()
    }
}
