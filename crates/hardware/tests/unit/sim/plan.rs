//! # System Plan Tests
//!
//! Plan assembly from a configuration and its JSON export.

use clustertopo_core::TopologyError;
use clustertopo_core::common::{ByteSize, Frequency, Voltage};
use clustertopo_core::cpu::MemoryMode;
use clustertopo_core::sim::SystemPlan;
use clustertopo_core::soc::{ClockDomain, MemorySpec, MemoryType};
use pretty_assertions::assert_eq;

use crate::common::harness::{single_cluster, workloads};

fn system_clock() -> ClockDomain {
    ClockDomain::new(Frequency::from_ghz(1), Voltage::from_millivolts(3300))
}

#[test]
fn test_plan_assembles_all_parts() {
    let memory = MemorySpec::new(MemoryType::Ddr3_1600_8x8, ByteSize::from_gib(2));
    let plan = SystemPlan::new(system_clock(), memory, single_cluster("minor", 2), workloads(2)).unwrap();

    assert_eq!(plan.system_clock(), system_clock());
    assert_eq!(plan.memory().range.start, 0);
    assert_eq!(plan.memory().range.size, ByteSize::from_gib(2));
    assert_eq!(plan.memory_mode(), MemoryMode::Timing);
    assert_eq!(plan.topology().total_cores(), 2);
    assert_eq!(plan.bindings().len(), 2);
}

#[test]
fn test_plan_rejects_mismatched_workloads() {
    let memory = MemorySpec::new(MemoryType::default(), ByteSize::from_gib(2));
    let err = SystemPlan::new(system_clock(), memory, single_cluster("minor", 2), workloads(1)).unwrap_err();
    assert_eq!(err, TopologyError::WorkloadCountMismatch { cores: 2, workloads: 1 });
}

#[test]
fn test_plan_rejects_empty_memory_and_dead_clock() {
    let empty = MemorySpec::new(MemoryType::default(), ByteSize::from_bytes(0));
    assert!(SystemPlan::new(system_clock(), empty, single_cluster("atomic", 1), workloads(1)).is_err());

    let memory = MemorySpec::new(MemoryType::default(), ByteSize::from_gib(2));
    let dead = ClockDomain::new(Frequency::from_hz(0), Voltage::from_millivolts(3300));
    assert!(SystemPlan::new(dead, memory, single_cluster("atomic", 1), workloads(1)).is_err());
}

#[test]
fn test_plan_json_export() {
    let memory = MemorySpec::new(MemoryType::Lpddr3_1600_1x32, ByteSize::from_mib(512));
    let plan = SystemPlan::new(system_clock(), memory, single_cluster("minor", 1), workloads(1)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();

    assert_eq!(json["system_clock"]["frequency"], "1GHz");
    assert_eq!(json["system_clock"]["voltage"], "3.3V");
    assert_eq!(json["memory"]["kind"], "LPDDR3_1600_1x32");
    assert_eq!(json["memory"]["range"]["size"], "512MB");
    assert_eq!(json["memory_mode"], "timing");

    let cluster = &json["topology"]["clusters"][0];
    assert_eq!(cluster["spec"]["core_model"]["kind"], "minor");
    assert_eq!(cluster["spec"]["clock_domain"]["frequency"], "4GHz");
    assert_eq!(cluster["wiring"]["shape"], "shared_l2");
    assert_eq!(cluster["wiring"]["l2"]["size"], "1MB");
    assert_eq!(cluster["wiring"]["l2_bus"]["width_bytes"], 64);

    assert_eq!(json["bindings"][0]["core_id"], 0);
    assert_eq!(json["bindings"][0]["workload"]["pid"], 100);
}
