// 🎟️ Booking Code Validator - fare prime RBDs against booked segments
//
// WP   : the booked code must be one of the fare's prime booking codes.
// WPNC : any prime code offered with enough seats in the booked cabin or a
//        more premium one passes, and the segment is marked for rebooking.
// Segments flown by another carrier fall back to convention 1 (cabin check).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{
    BookingCodeStatus, FareMarket, PaxTypeFare, SegmentStatus, SegmentStatusBits, TravelSeg,
};
use crate::trx::PricingTrx;

// ============================================================================
// SEGMENT AGGREGATE
// ============================================================================

/// Combination of segment statuses across the fare market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusReturnType {
    Pass,
    Fail,
    Mixed,
    NoMatchNotProcessed,
    SomePassSomeFailNoMatchNotProcessed,
    SomePassNoneFailNoMatchNotProcessed,
    NonePassSomeFailNoMatchNotProcessed,
}

/// Collapse the per-segment statuses of an already validated fare.
/// Surface segments are ignored.
pub fn check_segment_status(ptf: &PaxTypeFare, market: &FareMarket) -> StatusReturnType {
    if ptf.segment_status.len() != market.travel_segs.len() {
        debug!(
            "segment status size {} does not match {} travel segments",
            ptf.segment_status.len(),
            market.travel_segs.len()
        );
        return StatusReturnType::Fail;
    }

    let mut seg_pass = false;
    let mut seg_fail = false;
    let mut seg_no_match = false;

    for (seg, status) in market.travel_segs.iter().zip(&ptf.segment_status) {
        if !seg.air {
            continue;
        }

        let bits = status.status;
        if bits.is_set(SegmentStatusBits::PASS) {
            seg_pass = true;
        } else if bits.is_null()
            || bits.is_set(SegmentStatusBits::NOMATCH)
            || bits.is_set(SegmentStatusBits::NOT_YET_PROCESSED)
        {
            seg_no_match = true;
        } else if bits.is_set(SegmentStatusBits::NEED_REVALIDATION) {
            // Forces MIXED
            if seg_pass {
                seg_fail = true;
            } else if seg_fail {
                seg_pass = true;
            } else {
                seg_pass = true;
                seg_fail = true;
            }
        } else {
            seg_fail = true;
        }
    }

    match (seg_pass, seg_fail, seg_no_match) {
        (true, true, true) => StatusReturnType::SomePassSomeFailNoMatchNotProcessed,
        (true, true, false) => StatusReturnType::Mixed,
        (true, false, true) => StatusReturnType::SomePassNoneFailNoMatchNotProcessed,
        (true, false, false) => StatusReturnType::Pass,
        (false, true, true) => StatusReturnType::NonePassSomeFailNoMatchNotProcessed,
        (false, true, false) => StatusReturnType::Fail,
        (false, false, _) => StatusReturnType::NoMatchNotProcessed,
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

pub struct FareBookingCodeValidator<'a> {
    trx: &'a PricingTrx,
    market: &'a FareMarket,
}

impl<'a> FareBookingCodeValidator<'a> {
    pub fn new(trx: &'a PricingTrx, market: &'a FareMarket) -> Self {
        FareBookingCodeValidator { trx, market }
    }

    /// Validate every air segment and set the fare's booking code status.
    /// Returns true when the fare is still usable (PASS or PASS_LOCAL_AVAIL, or MIXED off domestic markets).
    pub fn validate_fare(&self, ptf: &mut PaxTypeFare) -> bool {
        ptf.init_segment_status(self.market);

        if ptf.cmd_pricing {
            for (seg, status) in self.market.travel_segs.iter().zip(ptf.segment_status.iter_mut()) {
                if seg.air {
                    *status = SegmentStatus::with(SegmentStatusBits::PASS);
                }
            }
            ptf.booking_code_status = BookingCodeStatus::with(BookingCodeStatus::PASS);
            return true;
        }

        let mut used_availability = false;
        for (i, seg) in self.market.travel_segs.iter().enumerate() {
            if !seg.air {
                continue;
            }

            let status = if seg.carrier != ptf.carrier() {
                self.validate_convention1(ptf, seg)
            } else if self.trx.request.low_fare_requested && !seg.classes_of_service.is_empty() {
                used_availability = true;
                self.validate_with_availability(ptf, seg)
            } else {
                self.validate_booked(ptf, seg)
            };

            if let Some(slot) = ptf.segment_status.get_mut(i) {
                *slot = status;
            }
        }

        let aggregate = check_segment_status(ptf, self.market);
        self.set_fare_status(ptf, aggregate, used_availability);

        debug!(
            "{} {} booking code status {:?} ({:?})",
            ptf.carrier(),
            ptf.fare.fare_class,
            ptf.booking_code_status,
            aggregate
        );

        ptf.booking_code_status.is_set(BookingCodeStatus::PASS)
            || ptf.booking_code_status.is_set(BookingCodeStatus::PASS_LOCAL_AVAIL)
            || ptf.booking_code_status.is_set(BookingCodeStatus::MIXED)
    }

    /// Fare-level status from the segment aggregate
    pub fn set_fare_status(&self, ptf: &mut PaxTypeFare, aggregate: StatusReturnType, used_availability: bool) {
        let domestic = self.market.is_domestic_or_transborder();

        let flag = match aggregate {
            StatusReturnType::Pass if used_availability => BookingCodeStatus::PASS_LOCAL_AVAIL,
            StatusReturnType::Pass => BookingCodeStatus::PASS,
            StatusReturnType::Mixed if domestic => BookingCodeStatus::FAIL,
            StatusReturnType::Mixed => BookingCodeStatus::MIXED,
            StatusReturnType::Fail
            | StatusReturnType::SomePassSomeFailNoMatchNotProcessed
            | StatusReturnType::NonePassSomeFailNoMatchNotProcessed => BookingCodeStatus::FAIL,
            StatusReturnType::SomePassNoneFailNoMatchNotProcessed
            | StatusReturnType::NoMatchNotProcessed => BookingCodeStatus::NOMATCH,
        };

        ptf.booking_code_status = BookingCodeStatus::with(flag);
    }

    // ========================================================================
    // SEGMENT CHECKS
    // ========================================================================

    fn is_prime(ptf: &PaxTypeFare, booking_code: &str) -> bool {
        ptf.fare
            .prime_booking_codes
            .iter()
            .any(|code| code == booking_code)
    }

    /// WP: booked code against the prime codes
    fn validate_booked(&self, ptf: &PaxTypeFare, seg: &TravelSeg) -> SegmentStatus {
        if Self::is_prime(ptf, &seg.booking_code) {
            SegmentStatus::with(SegmentStatusBits::PASS)
        } else {
            SegmentStatus::with(SegmentStatusBits::FAIL)
        }
    }

    /// WPNC: first prime code offered with enough seats in an allowed cabin
    fn validate_with_availability(&self, ptf: &PaxTypeFare, seg: &TravelSeg) -> SegmentStatus {
        let seats = self.trx.request.pax_count;

        let offered: Vec<_> = seg
            .classes_of_service
            .iter()
            .filter(|cos| Self::is_prime(ptf, &cos.booking_code) && cos.cabin <= seg.booked_cabin)
            .collect();

        if offered.is_empty() {
            let mut status = SegmentStatus::with(SegmentStatusBits::FAIL);
            status.status.set(SegmentStatusBits::NOT_OFFERED, true);
            return status;
        }

        // Booked class first, then the order availability lists them
        let chosen = offered
            .iter()
            .find(|cos| cos.booking_code == seg.booking_code && cos.num_seats >= seats)
            .or_else(|| offered.iter().find(|cos| cos.num_seats >= seats));

        match chosen {
            Some(cos) if cos.booking_code == seg.booking_code => SegmentStatus::with(SegmentStatusBits::PASS),
            Some(cos) => {
                let mut status = SegmentStatus::with(SegmentStatusBits::PASS);
                status.status.set(SegmentStatusBits::REBOOKED, true);
                status.rebook_code = Some(cos.booking_code.clone());
                status.rebook_cabin = Some(cos.cabin);
                status
            }
            None => {
                let mut status = SegmentStatus::with(SegmentStatusBits::FAIL);
                status.status.set(SegmentStatusBits::NOT_AVAILABLE, true);
                status
            }
        }
    }

    /// Convention 1: another carrier's segment passes on matching cabin
    fn validate_convention1(&self, ptf: &PaxTypeFare, seg: &TravelSeg) -> SegmentStatus {
        if seg.booked_cabin == ptf.fare.cabin {
            SegmentStatus::with(SegmentStatusBits::PASS)
        } else {
            SegmentStatus::with(SegmentStatusBits::NOMATCH)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
