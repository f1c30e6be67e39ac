use brokermap_core::{AddressEntry, FailureKind};

use super::*;

const SESSION: SessionId = SessionId(7);

fn tagged(ordinal: usize, outcome: GeocodeOutcome) -> TaggedResult {
    TaggedResult {
        session: SESSION,
        result: GeocodeResult {
            ordinal,
            query: AddressEntry::new(format!("{ordinal} Test St"), "2024-01-01"),
            outcome,
        },
    }
}

fn mixed_results() -> Vec<TaggedResult> {
    vec![
        tagged(0, GeocodeOutcome::resolved(40.0, -75.0)),
        tagged(1, GeocodeOutcome::Empty),
        tagged(2, GeocodeOutcome::failed(FailureKind::Transport, "connection reset")),
        tagged(3, GeocodeOutcome::resolved(41.0, -76.0)),
    ]
}

/// Heap's algorithm; small enough for 4 elements.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut [T], out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.to_vec());
            return;
        }
        for i in 0..k {
            heap(k - 1, items, out);
            let j = if k % 2 == 0 { i } else { 0 };
            items.swap(j, k - 1);
        }
    }
    let mut items = items.to_vec();
    let mut out = Vec::new();
    heap(items.len(), &mut items, &mut out);
    out
}

#[test]
fn completion_fires_once_for_every_arrival_order() {
    let orders = permutations(&mixed_results());
    assert_eq!(orders.len(), 24);

    for order in orders {
        let mut state = WorkflowState::new(SESSION, 4);
        let mut completions = Vec::new();
        for result in order {
            if let Step::Recorded {
                completion: Some(c),
                ..
            } = state.apply(result)
            {
                completions.push(c);
            }
        }
        assert_eq!(completions, vec![Completion::Fit]);
        assert_eq!(state.attempted(), 4);
        assert_eq!(state.resolved(), 2);
        assert_eq!(state.empty(), 1);
        assert_eq!(state.failed(), 1);
        assert!(state.is_complete());
    }
}

#[test]
fn failures_still_count_as_attempted() {
    let mut state = WorkflowState::new(SESSION, 2);
    let first = state.apply(tagged(
        0,
        GeocodeOutcome::failed(FailureKind::Status, "HTTP 500"),
    ));
    assert!(matches!(
        first,
        Step::Recorded {
            marker: None,
            completion: None,
            ..
        }
    ));
    let last = state.apply(tagged(1, GeocodeOutcome::Empty));
    assert!(matches!(
        last,
        Step::Recorded {
            completion: Some(Completion::NothingResolved),
            ..
        }
    ));
    assert!(state.markers().is_empty());
}

#[test]
fn stale_session_results_are_ignored() {
    let mut state = WorkflowState::new(SessionId(8), 1);
    let step = state.apply(tagged(0, GeocodeOutcome::resolved(40.0, -75.0)));
    assert_eq!(
        step,
        Step::Ignored {
            ordinal: 0,
            reason: IgnoreReason::StaleSession
        }
    );
    assert_eq!(state.attempted(), 0);
    assert!(state.markers().is_empty());
}

#[test]
fn duplicate_ordinal_is_counted_once() {
    let mut state = WorkflowState::new(SESSION, 2);
    state.apply(tagged(0, GeocodeOutcome::resolved(40.0, -75.0)));
    let again = state.apply(tagged(0, GeocodeOutcome::resolved(40.0, -75.0)));
    assert_eq!(
        again,
        Step::Ignored {
            ordinal: 0,
            reason: IgnoreReason::Duplicate
        }
    );
    assert_eq!(state.attempted(), 1);
    assert_eq!(state.markers().len(), 1);
    assert!(!state.is_complete());
}

#[test]
fn out_of_range_ordinal_is_ignored() {
    let mut state = WorkflowState::new(SESSION, 1);
    let step = state.apply(tagged(5, GeocodeOutcome::Empty));
    assert!(matches!(
        step,
        Step::Ignored {
            reason: IgnoreReason::UnknownOrdinal,
            ..
        }
    ));
}

#[test]
fn invalid_resolved_coordinates_behave_like_empty() {
    let mut state = WorkflowState::new(SESSION, 1);
    let step = state.apply(tagged(0, GeocodeOutcome::resolved(f64::NAN, -75.0)));
    assert!(matches!(
        step,
        Step::Recorded {
            marker: None,
            completion: Some(Completion::NothingResolved),
            ..
        }
    ));
    assert_eq!(state.empty(), 1);
}

#[test]
fn marker_label_comes_from_address_and_date() {
    let mut state = WorkflowState::new(SESSION, 1);
    state.apply(tagged(0, GeocodeOutcome::resolved(40.0, -75.0)));
    assert_eq!(state.markers()[0].label, "0 Test St (2024-01-01)");
    assert_eq!(
        state.resolved_coordinates(),
        vec![Coordinates::new(40.0, -75.0)]
    );
}
