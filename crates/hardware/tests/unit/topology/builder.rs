//! # Cluster Builder Tests
//!
//! Core id and socket id allocation, and cluster validation.

use clustertopo_core::TopologyError;
use clustertopo_core::common::{Frequency, Voltage};
use clustertopo_core::cpu::{CoreModelRegistry, MemoryMode};
use clustertopo_core::topology::TopologyBuilder;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::harness::{CPU_FREQ, CPU_VOLTAGE};

#[test]
fn test_build_allocates_contiguous_ids() {
    let model = TopologyBuilder::default().resolve_core_model("minor").unwrap();
    let cluster = TopologyBuilder::build_cluster(model, 4, CPU_FREQ, CPU_VOLTAGE, 3, 2).unwrap();

    assert_eq!(cluster.core_count(), 4);
    assert_eq!(cluster.first_core_id(), 3);
    assert_eq!(cluster.core_ids().collect::<Vec<_>>(), vec![3, 4, 5, 6]);
    assert_eq!(cluster.socket_id(), 2);
    assert_eq!(cluster.clock_frequency(), CPU_FREQ);
    assert_eq!(cluster.voltage(), CPU_VOLTAGE);
    assert_eq!(cluster.memory_mode(), MemoryMode::Timing);
    assert_eq!(cluster.core_model().identifier, "minor");
}

#[test]
fn test_zero_cores_rejected() {
    let model = TopologyBuilder::default().resolve_core_model("atomic").unwrap();
    let err = TopologyBuilder::build_cluster(model, 0, CPU_FREQ, CPU_VOLTAGE, 0, 0).unwrap_err();
    assert!(matches!(err, TopologyError::InvalidTopology { .. }));
}

#[test]
fn test_zero_clock_or_voltage_rejected() {
    let builder = TopologyBuilder::default();
    let model = builder.resolve_core_model("minor").unwrap();

    assert!(
        TopologyBuilder::build_cluster(model.clone(), 1, Frequency::from_hz(0), CPU_VOLTAGE, 0, 0).is_err()
    );
    assert!(
        TopologyBuilder::build_cluster(model, 1, CPU_FREQ, Voltage::from_millivolts(0), 0, 0).is_err()
    );
}

#[test]
fn test_id_space_overflow_rejected() {
    let model = TopologyBuilder::default().resolve_core_model("atomic").unwrap();
    let err = TopologyBuilder::build_cluster(model, 2, CPU_FREQ, CPU_VOLTAGE, usize::MAX, 0).unwrap_err();
    assert_eq!(err, TopologyError::invalid("core id space exhausted"));
}

#[test]
fn test_unknown_model_from_builder() {
    let builder = TopologyBuilder::new(CoreModelRegistry::default());
    assert_eq!(
        builder.resolve_core_model("o3"),
        Err(TopologyError::UnknownCoreModel {
            identifier: "o3".to_owned()
        })
    );
}

#[test]
fn test_build_is_side_effect_free() {
    let builder = TopologyBuilder::default();
    let model = builder.resolve_core_model("hpi").unwrap();
    let first = TopologyBuilder::build_cluster(model.clone(), 2, CPU_FREQ, CPU_VOLTAGE, 0, 0).unwrap();
    let second = TopologyBuilder::build_cluster(model, 2, CPU_FREQ, CPU_VOLTAGE, 0, 0).unwrap();
    assert_eq!(first, second);
    assert_eq!(builder.registry().len(), 3);
}

proptest! {
    #[test]
    fn prop_ids_are_the_requested_range(
        cores in 1usize..64,
        existing_cores in 0usize..10_000,
        existing_clusters in 0usize..100,
    ) {
        let model = TopologyBuilder::default().resolve_core_model("minor").unwrap();
        let cluster = TopologyBuilder::build_cluster(
            model, cores, CPU_FREQ, CPU_VOLTAGE, existing_cores, existing_clusters,
        ).unwrap();

        let ids: Vec<usize> = cluster.core_ids().collect();
        prop_assert_eq!(ids.len(), cores);
        prop_assert_eq!(ids.first().copied(), Some(existing_cores));
        prop_assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
        prop_assert_eq!(cluster.socket_id(), existing_clusters);
    }
}
