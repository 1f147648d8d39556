// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::check::SimulatedDelay;
use async_trait::async_trait;
use gk_core::{DelayRange, EntityError, FakeClock, RecordingSink, RegistryError};
use std::collections::HashSet;
use std::sync::Mutex;
use yare::parameterized;

fn block(names: &[&str]) -> Vec<Entity> {
    names.iter().map(|n| Entity::new(*n)).collect()
}

fn ids(entities: &[Entity]) -> Vec<EntityId> {
    entities.iter().map(|e| e.id.clone()).collect()
}

fn worker(
    gate: usize,
    names: &[&str],
    registry: &Arc<Registry>,
    check: Arc<dyn AdmissionCheck>,
    sink: &RecordingSink,
) -> AdmissionWorker<RecordingSink, FakeClock> {
    AdmissionWorker::new(
        GateId(gate),
        block(names),
        Arc::clone(registry),
        check,
        Arc::new(sink.clone()),
        FakeClock::new(),
    )
}

fn no_delay() -> Arc<dyn AdmissionCheck> {
    Arc::new(SimulatedDelay::new(DelayRange::zero()))
}

/// Installs "mallory" at the gate while selected entities are processing
struct Intruder {
    registry: Arc<Registry>,
    targets: HashSet<EntityId>,
}

#[async_trait]
impl AdmissionCheck for Intruder {
    async fn check(&self, gate: GateId, entity: &Entity) {
        if self.targets.contains(&entity.id) {
            self.registry
                .try_occupy(gate, &EntityId::from("mallory"))
                .unwrap();
        }
    }
}

/// Releases the gate on the entity's behalf while it is processing
struct Janitor {
    registry: Arc<Registry>,
}

#[async_trait]
impl AdmissionCheck for Janitor {
    async fn check(&self, gate: GateId, entity: &Entity) {
        self.registry.release(gate, &entity.id).unwrap();
    }
}

/// Records who the registry shows at the gate during processing
struct Observer {
    registry: Arc<Registry>,
    seen: Mutex<Vec<(EntityId, Option<EntityId>)>>,
}

#[async_trait]
impl AdmissionCheck for Observer {
    async fn check(&self, gate: GateId, entity: &Entity) {
        let occupant = self.registry.try_read(gate).unwrap();
        self.seen.lock().unwrap().push((entity.id.clone(), occupant));
    }
}

/// Aborts the run while the first entity is processing
struct AbortAfterFirst {
    abort: AbortSignal,
}

#[async_trait]
impl AdmissionCheck for AbortAfterFirst {
    async fn check(&self, _gate: GateId, _entity: &Entity) {
        self.abort.abort();
    }
}

#[tokio::test]
async fn admits_block_in_order_and_leaves_gate_empty() {
    let registry = Arc::new(Registry::new(2).unwrap());
    let sink = RecordingSink::new();

    let outcome = worker(1, &["a", "b", "c"], &registry, no_delay(), &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.gate, GateId(1));
    assert_eq!(
        ids(&outcome.admitted),
        vec![EntityId::from("a"), EntityId::from("b"), EntityId::from("c")]
    );
    assert!(outcome.admitted.iter().all(|e| e.gate() == Some(GateId(1))));
    assert!(outcome.displaced.is_empty());
    assert!(outcome.evicted.is_empty());
    assert_eq!(outcome.processed(), 3);
    assert_eq!(registry.count(), 0);

    let names: Vec<_> = sink.events().iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec![
            "entity:admitted",
            "entity:admitted",
            "entity:admitted",
            "worker:admission:finished"
        ]
    );
}

#[tokio::test]
async fn admission_timestamp_comes_from_clock() {
    let registry = Arc::new(Registry::new(1).unwrap());
    let sink = RecordingSink::new();
    let clock = FakeClock::new();

    let outcome = AdmissionWorker::new(
        GateId(0),
        block(&["a"]),
        Arc::clone(&registry),
        no_delay(),
        Arc::new(sink.clone()),
        clock.clone(),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(outcome.admitted[0].admitted_at(), Some(clock.utc_now()));
    assert_eq!(
        sink.named("entity:admitted"),
        vec![Event::EntityAdmitted {
            gate: GateId(0),
            entity: EntityId::from("a"),
            admitted_at: clock.utc_now(),
        }]
    );
}

#[tokio::test]
async fn gate_is_held_while_check_runs() {
    let registry = Arc::new(Registry::new(1).unwrap());
    let sink = RecordingSink::new();
    let observer = Arc::new(Observer {
        registry: Arc::clone(&registry),
        seen: Mutex::new(Vec::new()),
    });

    worker(0, &["a", "b"], &registry, observer.clone(), &sink)
        .run()
        .await
        .unwrap();

    let seen = observer.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (EntityId::from("a"), Some(EntityId::from("a"))),
            (EntityId::from("b"), Some(EntityId::from("b"))),
        ]
    );
}

#[tokio::test]
async fn occupied_gate_reports_eviction_and_continues() {
    let registry = Arc::new(Registry::new(1).unwrap());
    registry
        .try_occupy(GateId(0), &EntityId::from("intruder"))
        .unwrap();
    let sink = RecordingSink::new();

    let outcome = worker(0, &["b"], &registry, no_delay(), &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.evicted, vec![EntityId::from("intruder")]);
    assert_eq!(ids(&outcome.admitted), vec![EntityId::from("b")]);
    assert_eq!(
        sink.named("gate:evicted"),
        vec![Event::GateEvicted {
            gate: GateId(0),
            evicted: EntityId::from("intruder"),
            by: EntityId::from("b"),
        }]
    );
    assert_eq!(registry.count(), 0);
}

#[tokio::test]
async fn overwritten_gate_reports_displacement_with_actual_occupant() {
    let registry = Arc::new(Registry::new(1).unwrap());
    let sink = RecordingSink::new();
    let intruder = Arc::new(Intruder {
        registry: Arc::clone(&registry),
        targets: [EntityId::from("a")].into_iter().collect(),
    });

    let outcome = worker(0, &["a", "b"], &registry, intruder, &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(ids(&outcome.displaced), vec![EntityId::from("a")]);
    assert_eq!(outcome.displaced[0].gate(), Some(GateId(0)));
    assert_eq!(ids(&outcome.admitted), vec![EntityId::from("b")]);
    assert_eq!(outcome.evicted, vec![EntityId::from("mallory")]);
    assert_eq!(
        sink.named("entity:displaced"),
        vec![Event::EntityDisplaced {
            gate: GateId(0),
            entity: EntityId::from("a"),
            current: Some(EntityId::from("mallory")),
        }]
    );
    assert_eq!(registry.count(), 0);
}

#[tokio::test]
async fn emptied_gate_reports_displacement_with_no_occupant() {
    let registry = Arc::new(Registry::new(1).unwrap());
    let sink = RecordingSink::new();
    let janitor = Arc::new(Janitor {
        registry: Arc::clone(&registry),
    });

    let outcome = worker(0, &["a"], &registry, janitor, &sink)
        .run()
        .await
        .unwrap();

    assert!(outcome.admitted.is_empty());
    assert_eq!(
        sink.named("entity:displaced"),
        vec![Event::EntityDisplaced {
            gate: GateId(0),
            entity: EntityId::from("a"),
            current: None,
        }]
    );
}

#[tokio::test]
async fn double_stamp_is_an_invariant_violation() {
    let registry = Arc::new(Registry::new(1).unwrap());
    let sink = RecordingSink::new();
    let mut stamped = Entity::new("a");
    stamped
        .stamp(GateId(0), FakeClock::new().utc_now())
        .unwrap();

    let err = AdmissionWorker::new(
        GateId(0),
        vec![stamped],
        Arc::clone(&registry),
        no_delay(),
        Arc::new(sink.clone()),
        FakeClock::new(),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AdmissionError::Invariant {
            gate: GateId(0),
            source: EntityError::AlreadyStamped { .. }
        }
    ));
    assert!(sink.named("worker:admission:finished").is_empty());
    // The failed entity does not keep the gate
    assert_eq!(registry.count(), 0);
}

#[tokio::test]
async fn out_of_range_gate_is_registry_misuse() {
    let registry = Arc::new(Registry::new(1).unwrap());
    let sink = RecordingSink::new();

    let err = worker(5, &["a"], &registry, no_delay(), &sink)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.gate(), GateId(5));
    assert!(matches!(
        err,
        AdmissionError::Registry {
            source: RegistryError::GateOutOfRange { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn aborted_worker_abandons_whole_block() {
    let registry = Arc::new(Registry::new(1).unwrap());
    let sink = RecordingSink::new();
    let abort = AbortSignal::new();
    abort.abort();

    let outcome = worker(0, &["a", "b"], &registry, no_delay(), &sink)
        .with_abort(abort)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.processed(), 0);
    assert_eq!(
        outcome.abandoned,
        vec![EntityId::from("a"), EntityId::from("b")]
    );
    assert_eq!(sink.named("entity:abandoned").len(), 2);
}

#[tokio::test]
async fn abort_takes_effect_between_entities() {
    let registry = Arc::new(Registry::new(1).unwrap());
    let sink = RecordingSink::new();
    let abort = AbortSignal::new();
    let check = Arc::new(AbortAfterFirst {
        abort: abort.clone(),
    });

    let outcome = worker(0, &["a", "b", "c"], &registry, check, &sink)
        .with_abort(abort)
        .run()
        .await
        .unwrap();

    // The entity in flight finishes; the rest are abandoned
    assert_eq!(ids(&outcome.admitted), vec![EntityId::from("a")]);
    assert_eq!(
        outcome.abandoned,
        vec![EntityId::from("b"), EntityId::from("c")]
    );
    assert_eq!(registry.count(), 0);
}

#[parameterized(
    nobody_intrudes = { &[], 0, 0, 0 },
    first_entity_intruded = { &["a"], 1, 1, 0 },
    last_entity_intruded = { &["c"], 1, 0, 1 },
    every_entity_intruded = { &["a", "b", "c"], 3, 2, 1 },
)]
#[test_macro(tokio::test)]
async fn intrusions_shape_the_outcome(
    targets: &[&str],
    displaced: usize,
    evicted: usize,
    left_occupied: usize,
) {
    let registry = Arc::new(Registry::new(1).unwrap());
    let sink = RecordingSink::new();
    let intruder = Intruder {
        registry: Arc::clone(&registry),
        targets: targets.iter().map(|t| EntityId::from(*t)).collect(),
    };

    let outcome = worker(0, &["a", "b", "c"], &registry, Arc::new(intruder), &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.displaced.len(), displaced);
    assert_eq!(outcome.admitted.len(), 3 - displaced);
    assert_eq!(outcome.evicted.len(), evicted);
    assert_eq!(outcome.processed(), 3);
    assert_eq!(registry.count(), left_occupied);
    assert_eq!(sink.named("entity:displaced").len(), displaced);
    assert_eq!(sink.named("gate:evicted").len(), evicted);
}

#[tokio::test]
async fn outcome_serializes_for_hosts() {
    let registry = Arc::new(Registry::new(1).unwrap());
    let sink = RecordingSink::new();

    let outcome = worker(0, &["a"], &registry, no_delay(), &sink)
        .run()
        .await
        .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["gate"], 0);
    assert_eq!(json["admitted"][0]["id"], "a");
    assert_eq!(json["admitted"][0]["admission"]["gate"], 0);
    assert!(json["displaced"].as_array().unwrap().is_empty());
}
