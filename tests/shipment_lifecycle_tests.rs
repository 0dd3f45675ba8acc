//! Shipment status machine properties

use proptest::prelude::*;
use shipment_lifecycle::{
    AggregateRoot, MoveId, Shipment, ShipmentError, ShipmentResult, ShipmentStatus,
    ShipmentTransition, StateTransition, Transition,
};
use test_case::test_case;

const HAPPY_PATH: [ShipmentTransition; 7] = [
    ShipmentTransition::Submit,
    ShipmentTransition::Award,
    ShipmentTransition::Accept,
    ShipmentTransition::Approve,
    ShipmentTransition::Begin,
    ShipmentTransition::Deliver,
    ShipmentTransition::Complete,
];

fn apply(
    shipment: &mut Shipment,
    op: ShipmentTransition,
) -> ShipmentResult<StateTransition<ShipmentStatus>> {
    match op {
        ShipmentTransition::Submit => shipment.submit(),
        ShipmentTransition::Award => shipment.award(),
        ShipmentTransition::Accept => shipment.accept(),
        ShipmentTransition::Approve => shipment.approve(),
        ShipmentTransition::Begin => shipment.begin(),
        ShipmentTransition::Deliver => shipment.deliver(),
        ShipmentTransition::Complete => shipment.complete(),
    }
}

/// Drive a fresh shipment along the happy path until it reaches `status`
fn shipment_in(status: ShipmentStatus) -> Shipment {
    let mut shipment = Shipment::new(MoveId::new());
    for op in HAPPY_PATH {
        if shipment.status() == status {
            break;
        }
        apply(&mut shipment, op).unwrap();
    }
    assert_eq!(shipment.status(), status);
    shipment
}

#[test]
fn full_lifecycle_runs_once_from_draft() {
    let mut shipment = Shipment::new(MoveId::new());
    assert_eq!(shipment.status(), ShipmentStatus::Draft);

    for op in HAPPY_PATH {
        let transition = apply(&mut shipment, op).unwrap();
        assert_eq!(transition.to, op.target());
    }
    assert_eq!(shipment.status(), ShipmentStatus::Completed);
    assert_eq!(shipment.version(), 7);

    // A completed shipment accepts nothing further
    for op in ShipmentTransition::ALL {
        assert!(apply(&mut shipment, *op).unwrap_err().is_invalid_transition());
    }
}

#[test]
fn approve_on_submitted_is_rejected() {
    let mut shipment = shipment_in(ShipmentStatus::Submitted);
    let err = shipment.approve().unwrap_err();
    match err {
        ShipmentError::InvalidTransition { operation, from, .. } => {
            assert_eq!(operation, "approve");
            assert_eq!(from, "SUBMITTED");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test_case(ShipmentStatus::Draft, true)]
#[test_case(ShipmentStatus::Submitted, false)]
#[test_case(ShipmentStatus::Awarded, true)]
#[test_case(ShipmentStatus::Accepted, false)]
#[test_case(ShipmentStatus::Approved, false)]
#[test_case(ShipmentStatus::InTransit, false)]
#[test_case(ShipmentStatus::Delivered, false)]
#[test_case(ShipmentStatus::Completed, false)]
fn submit_allowed_only_from_draft_and_awarded(status: ShipmentStatus, allowed: bool) {
    let mut shipment = shipment_in(status);
    assert_eq!(shipment.submit().is_ok(), allowed);
}

fn any_transition() -> impl Strategy<Value = ShipmentTransition> {
    proptest::sample::select(ShipmentTransition::ALL.to_vec())
}

proptest! {
    /// Any operation sequence either follows the table or leaves the record untouched
    #[test]
    fn operations_follow_the_table(ops in proptest::collection::vec(any_transition(), 0..24)) {
        let mut shipment = Shipment::new(MoveId::new());
        for op in ops {
            let before = shipment.clone();
            let permitted = op.permits(&before.status());
            match apply(&mut shipment, op) {
                Ok(transition) => {
                    prop_assert!(permitted);
                    prop_assert_eq!(transition.from, before.status());
                    prop_assert_eq!(shipment.status(), op.target());
                    prop_assert_eq!(shipment.version(), before.version() + 1);
                }
                Err(err) => {
                    prop_assert!(!permitted);
                    prop_assert!(err.is_invalid_transition());
                    prop_assert_eq!(&shipment, &before);
                }
            }
        }
    }

    /// Skipping a step of the happy path always fails
    #[test]
    fn skipped_steps_never_succeed(stop in 0usize..7, skip in 1usize..7) {
        let target = stop + skip;
        prop_assume!(target < HAPPY_PATH.len());
        let mut shipment = Shipment::new(MoveId::new());
        for op in &HAPPY_PATH[..stop] {
            apply(&mut shipment, *op).unwrap();
        }
        let before = shipment.clone();
        prop_assert!(apply(&mut shipment, HAPPY_PATH[target]).is_err());
        prop_assert_eq!(&shipment, &before);
    }
}
