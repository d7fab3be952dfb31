//! # Configuration Tests
//!
//! Defaults, JSON deserialization, file loading, and the full build pipeline.

use std::io::Write;

use clustertopo_core::TopologyError;
use clustertopo_core::cache::{CacheLevelOverride, CacheProfile};
use clustertopo_core::common::{ByteSize, Frequency, Voltage};
use clustertopo_core::config::{ClusterConfig, Config, ConfigError, SystemConfig};
use clustertopo_core::soc::MemoryType;
use clustertopo_core::topology::Attachment;
use pretty_assertions::assert_eq;

use crate::common::harness::{init_tracing, workloads};

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.profile, CacheProfile::Baseline);
    assert_eq!(config.clusters, vec![ClusterConfig::default()]);
    assert!(config.core_models.is_empty());
}

#[test]
fn test_system_config_defaults() {
    let system = SystemConfig::default();
    assert_eq!(system.clock, Frequency::from_ghz(1));
    assert_eq!(system.voltage, Voltage::from_millivolts(3300));
    assert_eq!(system.mem_type, MemoryType::Ddr3_1600_8x8);
    assert_eq!(system.mem_size, ByteSize::from_gib(2));
}

#[test]
fn test_cluster_config_defaults() {
    let cluster = ClusterConfig::default();
    assert_eq!(cluster.cpu, "minor");
    assert_eq!(cluster.num_cores, 1);
    assert_eq!(cluster.cpu_freq, Frequency::from_ghz(4));
    assert_eq!(cluster.cpu_voltage, Voltage::from_millivolts(1200));
}

#[test]
fn test_empty_json_is_default() {
    assert_eq!(Config::from_json_str("{}").unwrap(), Config::default());
}

#[test]
fn test_partial_cluster_fills_defaults() {
    let config = Config::from_json_str(r#"{ "clusters": [ { "cpu": "atomic" }, { "num_cores": 2 } ] }"#).unwrap();

    assert_eq!(config.clusters.len(), 2);
    assert_eq!(config.clusters[0].cpu, "atomic");
    assert_eq!(config.clusters[0].num_cores, 1);
    assert_eq!(config.clusters[1].cpu, "minor");
    assert_eq!(config.clusters[1].cpu_freq, Frequency::from_ghz(4));
}

#[test]
fn test_invalid_json_rejected() {
    assert!(matches!(Config::from_json_str("{"), Err(ConfigError::Json(_))));
    assert!(matches!(Config::from_json_str(r#"{ "clustres": [] }"#), Err(ConfigError::Json(_))));
    assert!(matches!(
        Config::from_json_str(r#"{ "system": { "clock": "fast" } }"#),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        Config::from_json_str(r#"{ "profile": "turbo" }"#),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "profile": "prefetch-writeback", "system": {{ "mem_size": "1GB" }},
            "clusters": [ {{ "cpu": "hpi", "num_cores": 2, "cpu_freq": "2GHz" }} ] }}"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.profile, CacheProfile::PrefetchWriteback);
    assert_eq!(config.system.mem_size, ByteSize::from_gib(1));
    assert_eq!(config.clusters[0].cpu_freq, Frequency::from_ghz(2));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    match Config::load(&path) {
        Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_build_plan_default() {
    init_tracing();
    let plan = Config::default().build_plan(workloads(1)).unwrap();

    assert_eq!(plan.topology().total_cores(), 1);
    assert_eq!(plan.memory().kind, MemoryType::Ddr3_1600_8x8);
    let cluster = &plan.topology().clusters()[0];
    assert_eq!(cluster.spec().core_model().identifier, "minor");
    assert_eq!(cluster.wiring().shape(), Attachment::L2Port);
}

#[test]
fn test_build_plan_workload_mismatch() {
    let config = Config::from_json_str(r#"{ "clusters": [ { "num_cores": 2 } ] }"#).unwrap();
    match config.build_plan(workloads(1)) {
        Err(ConfigError::Topology(err)) => {
            assert_eq!(err, TopologyError::WorkloadCountMismatch { cores: 2, workloads: 1 });
        }
        other => panic!("expected workload mismatch, got {other:?}"),
    }
}

#[test]
fn test_build_with_custom_core_model() {
    init_tracing();
    let config = Config::from_json_str(
        r#"{
            "core_models": {
                "minor-l1-only": { "kind": "minor", "l2": "disabled" }
            },
            "clusters": [
                { "cpu": "minor-l1-only", "num_cores": 2 },
                { "cpu": "minor", "num_cores": 1 }
            ]
        }"#,
    )
    .unwrap();

    let topology = config.build_topology().unwrap();
    assert_eq!(topology.total_cores(), 3);
    assert_eq!(topology.clusters()[0].wiring().shape(), Attachment::L1Ports);
    assert_eq!(topology.clusters()[1].wiring().shape(), Attachment::L2Port);
}

#[test]
fn test_custom_model_null_level_is_dropped() {
    let config = Config::from_json_str(
        r#"{
            "clusters": [ { "cpu": "minor-no-l2" } ],
            "core_models": { "minor-no-l2": { "kind": "minor", "l2": null } }
        }"#,
    )
    .unwrap();

    assert_eq!(config.core_models["minor-no-l2"].l2, CacheLevelOverride::Disabled);
    assert_eq!(config.core_models["minor-no-l2"].l1d, CacheLevelOverride::Inherit);

    let topology = config.build_topology().unwrap();
    assert_eq!(topology.clusters()[0].wiring().shape(), Attachment::L1Ports);
    assert!(topology.clusters()[0].spec().core_model().l2_cache.is_none());
}

#[test]
fn test_custom_model_cannot_shadow_builtin() {
    let config = Config::from_json_str(r#"{ "core_models": { "hpi": { "kind": "minor" } } }"#).unwrap();
    assert_eq!(
        config.registry().unwrap_err(),
        TopologyError::DuplicateCoreModel {
            identifier: "hpi".to_owned()
        }
    );
}

#[test]
fn test_unknown_cluster_model() {
    let config = Config::from_json_str(r#"{ "clusters": [ { "cpu": "o3" } ] }"#).unwrap();
    assert_eq!(
        config.build_topology(),
        Err(TopologyError::UnknownCoreModel {
            identifier: "o3".to_owned()
        })
    );
}

#[test]
fn test_no_clusters_fails() {
    let config = Config::from_json_str(r#"{ "clusters": [] }"#).unwrap();
    assert!(matches!(config.build_topology(), Err(TopologyError::InvalidTopology { .. })));
}

#[test]
fn test_config_serializes_back() {
    let config = Config::default();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(Config::from_json_str(&json).unwrap(), config);
}
