//! Integration tests: the lattice only grows, and its serialized view
//! records every declared inclusion.

use subset_lattice::{Manifold, Named, SubsetKind};

#[test]
fn inclusions_survive_later_registrations() {
    let m = Manifold::new(2, "M");
    let a = m.subset("A", None).unwrap();
    let b = m.subset("B", None).unwrap();
    b.declare_superset(&a).unwrap();

    for i in 0..5 {
        let extra = m.subset(format!("X{i}"), None).unwrap();
        extra.declare_superset(&b).unwrap();
    }

    assert!(b.is_subset_of(&a).unwrap());
    assert_eq!(b.subsets().unwrap().len(), 5);
    assert_eq!(a.subsets().unwrap().len(), 6);
}

#[test]
fn queries_leave_the_lattice_untouched() {
    let m = Manifold::new(2, "M");
    let a = m.subset("A", None).unwrap();
    let closure = a.closure(None, None).unwrap();
    let before = m.fingerprint().unwrap();

    assert!(closure.is_closed().unwrap());
    assert!(a.is_subset_of(&closure).unwrap());
    assert_eq!(closure.closure(None, None).unwrap(), closure);
    closure.supersets().unwrap();

    assert_eq!(m.fingerprint().unwrap(), before);
}

#[test]
fn duplicate_names_are_distinct_subsets() {
    let m = Manifold::new(1, "M");
    let first = m.subset("A", None).unwrap();
    let second = m.subset("A", None).unwrap();
    assert_ne!(first, second);
    assert_eq!(first.name(), second.name());
    assert_eq!(m.find("A").unwrap().unwrap(), first);
}

#[test]
fn snapshot_of_a_closure() {
    let m = Manifold::new(2, "M");
    let a = m.subset("A", None).unwrap();
    let closure = a.closure(None, Some(r"\bar{A}")).unwrap();
    assert_eq!(closure.kind().unwrap(), SubsetKind::Closure { of: a.id() });

    insta::assert_json_snapshot!(m.snapshot().unwrap(), @r###"
    [
      {
        "id": 0,
        "name": "M",
        "latexName": "M",
        "kind": "whole",
        "supersets": []
      },
      {
        "id": 1,
        "name": "A",
        "latexName": "A",
        "kind": "plain",
        "supersets": [
          0,
          2
        ]
      },
      {
        "id": 2,
        "name": "cl_A",
        "latexName": "\\bar{A}",
        "kind": {
          "closure": {
            "of": 1
          }
        },
        "supersets": [
          0
        ]
      }
    ]
    "###);
}
