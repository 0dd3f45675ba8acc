// Copyright 2025 Cowboy AI, LLC.

//! Weight entitlements and the day counts derived from them

use crate::domain::{Miles, Pound};
use crate::errors::{ShipmentError, ShipmentResult};
use crate::validation::ValidationErrors;
use serde::{Deserialize, Serialize};

/// Pay grade of a service member, persisted as the literal in `serde(rename)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "ACADEMY_CADET")]
    AcademyCadet,
    #[serde(rename = "AVIATION_CADET")]
    AviationCadet,
    #[serde(rename = "E_1")]
    E1,
    #[serde(rename = "E_2")]
    E2,
    #[serde(rename = "E_3")]
    E3,
    #[serde(rename = "E_4")]
    E4,
    #[serde(rename = "E_5")]
    E5,
    #[serde(rename = "E_6")]
    E6,
    #[serde(rename = "E_7")]
    E7,
    #[serde(rename = "E_8")]
    E8,
    #[serde(rename = "E_9")]
    E9,
    #[serde(rename = "MIDSHIPMAN")]
    Midshipman,
    #[serde(rename = "O_1")]
    O1,
    #[serde(rename = "O_2")]
    O2,
    #[serde(rename = "O_3")]
    O3,
    #[serde(rename = "O_4")]
    O4,
    #[serde(rename = "O_5")]
    O5,
    #[serde(rename = "O_6")]
    O6,
    #[serde(rename = "O_7")]
    O7,
    #[serde(rename = "O_8")]
    O8,
    #[serde(rename = "O_9")]
    O9,
    #[serde(rename = "O_10")]
    O10,
    #[serde(rename = "W_1")]
    W1,
    #[serde(rename = "W_2")]
    W2,
    #[serde(rename = "W_3")]
    W3,
    #[serde(rename = "W_4")]
    W4,
    #[serde(rename = "W_5")]
    W5,
    #[serde(rename = "CIVILIAN_EMPLOYEE")]
    CivilianEmployee,
}

/// Source of entitlement weights and the day counts they imply.
///
/// Implementations must be deterministic and free of side effects.
pub trait EntitlementCalculator: Send + Sync {
    /// Maximum weight moved at government expense
    fn entitlement_weight(
        &self,
        rank: Rank,
        has_dependents: bool,
        spouse_has_pro_gear: bool,
    ) -> Pound;

    /// Workdays needed to pack a shipment of `weight`
    fn pack_days(&self, weight: Pound) -> u32;

    /// Calendar days a shipment of `weight` spends on the road for `distance`
    fn transit_days(&self, weight: Pound, distance: Miles) -> ShipmentResult<u32>;
}

/// Allowances for one rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightAllotment {
    /// Household goods weight for the member alone
    pub total_weight_self: i64,
    /// Household goods weight when the member has dependents
    pub total_weight_self_plus_dependents: i64,
    /// Member's professional gear
    pub pro_gear_weight: i64,
    /// Spouse's professional gear
    pub pro_gear_weight_spouse: i64,
}

const fn allotment(self_only: i64, with_dependents: i64) -> WeightAllotment {
    WeightAllotment {
        total_weight_self: self_only,
        total_weight_self_plus_dependents: with_dependents,
        pro_gear_weight: 2000,
        pro_gear_weight_spouse: 500,
    }
}

const ACADEMY: WeightAllotment = WeightAllotment {
    total_weight_self: 350,
    total_weight_self_plus_dependents: 350,
    pro_gear_weight: 0,
    pro_gear_weight_spouse: 0,
};

/// Shipments lighter than this use the light-shipment transit schedule
const LIGHT_SHIPMENT_LIMIT: Pound = Pound(1000);

/// Upper mileage bound of each band with regular and light transit days
const TRANSIT_TABLE: [(u32, u32, u32); 15] = [
    (250, 6, 12),
    (500, 9, 15),
    (750, 11, 17),
    (1000, 13, 19),
    (1250, 15, 21),
    (1500, 17, 23),
    (1750, 19, 25),
    (2000, 21, 27),
    (2250, 23, 29),
    (2500, 24, 30),
    (2750, 26, 32),
    (3000, 27, 33),
    (3250, 29, 35),
    (3500, 30, 36),
    (3800, 32, 38),
];

/// Standard weight allowance tables
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEntitlements;

impl StandardEntitlements {
    /// Allowances for a rank
    pub fn allotment(rank: Rank) -> WeightAllotment {
        use Rank::*;
        match rank {
            AcademyCadet | Midshipman => ACADEMY,
            AviationCadet => allotment(7000, 8000),
            E1 | E2 | E3 | E4 => allotment(5000, 8000),
            E5 => allotment(7000, 9000),
            E6 => allotment(8000, 11000),
            E7 => allotment(11000, 13000),
            E8 => allotment(12000, 14000),
            E9 => allotment(13000, 15000),
            O1 | W1 => allotment(10000, 12000),
            O2 | W2 => allotment(12500, 13500),
            O3 | W3 => allotment(13000, 14500),
            O4 | W4 => allotment(14000, 17000),
            O5 | W5 => allotment(16000, 17500),
            O6 | O7 | O8 | O9 | O10 | CivilianEmployee => allotment(18000, 18000),
        }
    }
}

impl EntitlementCalculator for StandardEntitlements {
    fn entitlement_weight(
        &self,
        rank: Rank,
        has_dependents: bool,
        spouse_has_pro_gear: bool,
    ) -> Pound {
        let allotment = Self::allotment(rank);
        let household = if has_dependents {
            allotment.total_weight_self_plus_dependents
        } else {
            allotment.total_weight_self
        };
        let spouse_pro_gear = if has_dependents && spouse_has_pro_gear {
            allotment.pro_gear_weight_spouse
        } else {
            0
        };
        Pound(household) + Pound(allotment.pro_gear_weight) + Pound(spouse_pro_gear)
    }

    fn pack_days(&self, weight: Pound) -> u32 {
        match weight.value() {
            w if w < 4000 => 1,
            w if w < 8000 => 2,
            _ => 3,
        }
    }

    fn transit_days(&self, weight: Pound, distance: Miles) -> ShipmentResult<u32> {
        let mut errors = ValidationErrors::new();
        if weight.is_negative() {
            errors.add("weight", format!("{} is less than zero", weight.value()));
        }
        if distance.value() == 0 {
            errors.add("transit_distance", "must be greater than zero");
        }
        errors.into_result()?;

        let light = weight < LIGHT_SHIPMENT_LIMIT;
        TRANSIT_TABLE
            .iter()
            .find(|(max_miles, _, _)| distance.value() <= *max_miles)
            .map(|&(_, regular, light_days)| if light { light_days } else { regular })
            .ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.add(
                    "transit_distance",
                    format!("{distance} is beyond the transit schedule"),
                );
                ShipmentError::Validation(errors)
            })
    }
}

/// Refuse a weight estimate above the entitlement
pub fn validate_weight_estimate(estimate: Pound, entitlement: Pound) -> ShipmentResult<()> {
    if estimate > entitlement {
        return Err(ShipmentError::EntitlementExceeded {
            estimate: estimate.value(),
            entitlement: entitlement.value(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Rank::E1, false, false, 7000 ; "junior enlisted alone")]
    #[test_case(Rank::E1, true, false, 10000 ; "junior enlisted with dependents")]
    #[test_case(Rank::E1, true, true, 10500 ; "spouse pro gear counted")]
    #[test_case(Rank::E1, false, true, 7000 ; "spouse pro gear needs dependents")]
    #[test_case(Rank::O4, true, true, 19500 ; "field grade officer")]
    #[test_case(Rank::Midshipman, true, true, 350 ; "academy has no pro gear")]
    fn test_entitlement_weight(rank: Rank, deps: bool, spouse: bool, expected: i64) {
        assert_eq!(
            StandardEntitlements.entitlement_weight(rank, deps, spouse),
            Pound(expected)
        );
    }

    #[test_case(0, 1)]
    #[test_case(3999, 1)]
    #[test_case(4000, 2)]
    #[test_case(7999, 2)]
    #[test_case(8000, 3)]
    #[test_case(18000, 3)]
    fn test_pack_days(weight: i64, expected: u32) {
        assert_eq!(StandardEntitlements.pack_days(Pound(weight)), expected);
    }

    #[test_case(8000, 1, 6 ; "shortest band")]
    #[test_case(8000, 250, 6 ; "band upper bound inclusive")]
    #[test_case(8000, 251, 9 ; "next band")]
    #[test_case(999, 251, 15 ; "light shipment")]
    #[test_case(8000, 3800, 32 ; "longest band")]
    fn test_transit_days(weight: i64, miles: u32, expected: u32) {
        assert_eq!(
            StandardEntitlements
                .transit_days(Pound(weight), Miles(miles))
                .unwrap(),
            expected
        );
    }

    #[test]
    fn test_transit_days_rejects_out_of_table_input() {
        let err = StandardEntitlements
            .transit_days(Pound(-1), Miles(0))
            .unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert!(errors.get("weight").is_some());
        assert!(errors.get("transit_distance").is_some());

        let err = StandardEntitlements
            .transit_days(Pound(5000), Miles(3801))
            .unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_validate_weight_estimate() {
        assert!(validate_weight_estimate(Pound(8000), Pound(8000)).is_ok());
        let err = validate_weight_estimate(Pound(8001), Pound(8000)).unwrap_err();
        assert!(matches!(
            err,
            ShipmentError::EntitlementExceeded {
                estimate: 8001,
                entitlement: 8000
            }
        ));
    }

    #[test]
    fn test_rank_literals() {
        assert_eq!(serde_json::to_string(&Rank::O10).unwrap(), "\"O_10\"");
        assert_eq!(
            serde_json::from_str::<Rank>("\"CIVILIAN_EMPLOYEE\"").unwrap(),
            Rank::CivilianEmployee
        );
    }
}
