//! # Workload Tests
//!
//! Process construction and one-to-one core binding.

use std::path::{Path, PathBuf};

use clustertopo_core::TopologyError;
use clustertopo_core::sim::{FIRST_PID, Workload, bind_workloads};
use pretty_assertions::assert_eq;

use crate::common::harness::{single_cluster, workloads};

#[test]
fn test_pids_follow_command_order() {
    let loads = Workload::from_commands(
        Path::new("/work"),
        vec![
            vec!["bin/qsort".to_owned(), "1000".to_owned()],
            vec!["bin/fft".to_owned()],
        ],
    )
    .unwrap();

    assert_eq!(loads.len(), 2);
    assert_eq!((loads[0].pid, loads[1].pid), (FIRST_PID, FIRST_PID + 1));
    assert_eq!(loads[0].executable(), "bin/qsort");
    assert_eq!(loads[0].argv, vec!["bin/qsort", "1000"]);
    assert_eq!(loads[1].cwd, PathBuf::from("/work"));
}

#[test]
fn test_empty_command_rejected() {
    let err = Workload::from_commands(Path::new("/"), vec![vec!["bin/a".to_owned()], vec![]]).unwrap_err();
    assert!(matches!(err, TopologyError::InvalidWorkload { index: 1, .. }));

    let blank = Workload::new(0, "/", vec![" ".to_owned()]).unwrap_err();
    assert!(matches!(blank, TopologyError::InvalidWorkload { index: 0, .. }));
}

#[test]
fn test_binding_pairs_cores_in_order() {
    let topology = single_cluster("minor", 3);
    let bindings = bind_workloads(&topology, workloads(3)).unwrap();

    let pairs: Vec<(usize, u32)> = bindings.iter().map(|b| (b.core_id, b.workload.pid)).collect();
    assert_eq!(pairs, vec![(0, 100), (1, 101), (2, 102)]);
    assert_eq!(bindings[2].workload.executable(), "bin/w2");
}

#[test]
fn test_too_few_workloads() {
    let topology = single_cluster("minor", 2);
    let err = bind_workloads(&topology, workloads(1)).unwrap_err();

    assert_eq!(err, TopologyError::WorkloadCountMismatch { cores: 2, workloads: 1 });
    assert_eq!(
        err.to_string(),
        "number of cores (2) doesn't match number of workloads (1)"
    );
}

#[test]
fn test_too_many_workloads() {
    let topology = single_cluster("atomic", 1);
    assert_eq!(
        bind_workloads(&topology, workloads(2)),
        Err(TopologyError::WorkloadCountMismatch { cores: 1, workloads: 2 })
    );
}
