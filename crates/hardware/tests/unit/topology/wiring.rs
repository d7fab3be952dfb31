//! # Wiring Tests
//!
//! The three attachment shapes and their port connections.

use clustertopo_core::TopologyError;
use clustertopo_core::cache::{CacheLevelOverride, CacheProfile};
use clustertopo_core::cpu::{CoreKind, CoreModelRegistry, CustomCoreModel};
use clustertopo_core::topology::{
    Attachment, ClusterSpec, Connection, Port, TopologyBuilder, WiringPlan, wire_memory_hierarchy,
};
use pretty_assertions::assert_eq;

use crate::common::harness::{CPU_FREQ, CPU_VOLTAGE};

fn cluster(builder: &TopologyBuilder, model: &str, cores: usize, first_core: usize) -> ClusterSpec {
    let model = builder.resolve_core_model(model).unwrap();
    TopologyBuilder::build_cluster(model, cores, CPU_FREQ, CPU_VOLTAGE, first_core, 0).unwrap()
}

fn conn(from: Port, to: Port) -> Connection {
    Connection { from, to }
}

#[test]
fn test_atomic_wires_directly() {
    let spec = cluster(&TopologyBuilder::default(), "atomic", 1, 0);
    let plan = wire_memory_hierarchy(&spec).unwrap();

    assert_eq!(plan, WiringPlan::Direct { cores: vec![0] });
    assert_eq!(plan.shape(), Attachment::CorePorts);
    assert!(plan.is_cacheless());
    assert_eq!(plan.cache_count(), 0);
    assert_eq!(plan.connections(), vec![
        conn(Port::CoreIcache(0), Port::MemBus),
        conn(Port::CoreDcache(0), Port::MemBus),
    ]);
}

#[test]
fn test_minor_two_cores_share_one_l2() {
    let spec = cluster(&TopologyBuilder::default(), "minor", 2, 0);
    let plan = wire_memory_hierarchy(&spec).unwrap();

    assert_eq!(plan.shape(), Attachment::L2Port);
    assert_eq!(plan.core_ids(), vec![0, 1]);
    assert_eq!(plan.core_caches().len(), 2);
    assert_eq!(plan.cache_count(), 5);
    assert_eq!(plan.system_ports(), vec![Port::L2MemSide]);

    let templates = CacheProfile::Baseline.templates(CoreKind::Minor);
    for core in plan.core_caches() {
        assert_eq!(Some(core.l1i), templates.l1i);
        assert_eq!(Some(core.l1d), templates.l1d);
    }
    assert_eq!(plan.l2().copied(), templates.l2);

    let WiringPlan::SharedL2 { l2_bus, .. } = &plan else {
        panic!("expected shared L2, got {plan:?}");
    };
    assert_eq!(l2_bus.width_bytes, 64);
    assert_eq!(l2_bus.clock, CPU_FREQ);

    assert_eq!(plan.connections(), vec![
        conn(Port::CoreIcache(0), Port::L1iCpuSide(0)),
        conn(Port::CoreDcache(0), Port::L1dCpuSide(0)),
        conn(Port::L1iMemSide(0), Port::L2BusCpuSide),
        conn(Port::L1dMemSide(0), Port::L2BusCpuSide),
        conn(Port::CoreIcache(1), Port::L1iCpuSide(1)),
        conn(Port::CoreDcache(1), Port::L1dCpuSide(1)),
        conn(Port::L1iMemSide(1), Port::L2BusCpuSide),
        conn(Port::L1dMemSide(1), Port::L2BusCpuSide),
        conn(Port::L2BusMemSide, Port::L2CpuSide),
        conn(Port::L2MemSide, Port::MemBus),
    ]);
}

#[test]
fn test_timing_without_l2_attaches_l1s() {
    let mut registry = CoreModelRegistry::default();
    let no_l2 = CustomCoreModel {
        kind: CoreKind::Minor,
        l1i: CacheLevelOverride::Inherit,
        l1d: CacheLevelOverride::Inherit,
        l2: CacheLevelOverride::Disabled,
    };
    registry.register_custom("minor-no-l2", &no_l2).unwrap();
    let builder = TopologyBuilder::new(registry);

    let plan = wire_memory_hierarchy(&cluster(&builder, "minor-no-l2", 2, 4)).unwrap();

    assert_eq!(plan.shape(), Attachment::L1Ports);
    assert_eq!(plan.l2(), None);
    assert_eq!(plan.cache_count(), 4);
    assert_eq!(plan.system_ports(), vec![
        Port::L1iMemSide(4),
        Port::L1dMemSide(4),
        Port::L1iMemSide(5),
        Port::L1dMemSide(5),
    ]);
}

#[test]
fn test_shapes_never_mix() {
    let builder = TopologyBuilder::default();
    for (model, cores) in [("atomic", 3), ("minor", 3), ("hpi", 1)] {
        let plan = wire_memory_hierarchy(&cluster(&builder, model, cores, 0)).unwrap();
        let outward = plan.system_ports();
        let expected = match plan.shape() {
            Attachment::CorePorts => outward.iter().all(|p| matches!(p, Port::CoreIcache(_) | Port::CoreDcache(_))),
            Attachment::L1Ports => outward.iter().all(|p| matches!(p, Port::L1iMemSide(_) | Port::L1dMemSide(_))),
            Attachment::L2Port => outward == [Port::L2MemSide],
        };
        assert!(expected, "{model}: {outward:?}");
    }
}

#[test]
fn test_wiring_is_idempotent() {
    let spec = cluster(&TopologyBuilder::default(), "hpi", 3, 0);
    let first = wire_memory_hierarchy(&spec).unwrap();
    let second = TopologyBuilder::wire_memory_hierarchy(&spec).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.connections(), second.connections());
}

#[test]
fn test_core_private_caches_are_independent() {
    let spec = cluster(&TopologyBuilder::default(), "minor", 2, 0);
    let mut plan = wire_memory_hierarchy(&spec).unwrap();
    let WiringPlan::SharedL2 { cores, .. } = &mut plan else {
        panic!("expected shared L2");
    };
    cores[0].l1d.mshrs = 99;
    assert_eq!(cores[1].l1d.mshrs, 4);
}

#[test]
fn test_timing_model_without_l1_fails_wiring() {
    let builder = TopologyBuilder::default();
    let mut model = builder.resolve_core_model("minor").unwrap();
    model.l1_instruction_cache = None;
    let spec = TopologyBuilder::build_cluster(model, 1, CPU_FREQ, CPU_VOLTAGE, 0, 0).unwrap();

    assert!(matches!(
        wire_memory_hierarchy(&spec),
        Err(TopologyError::InvalidTopology { .. })
    ));
}

#[test]
fn test_port_names() {
    assert_eq!(Port::CoreIcache(3).to_string(), "cpu3.icache_port");
    assert_eq!(Port::L1dMemSide(0).to_string(), "cpu0.l1d.mem_side");
    assert_eq!(Port::L2MemSide.to_string(), "l2.mem_side");
    assert_eq!(
        conn(Port::L2MemSide, Port::MemBus).to_string(),
        "l2.mem_side -> membus.cpu_side_ports"
    );
    assert_eq!(Attachment::L2Port.to_string(), "cluster L2 outward port");
}
