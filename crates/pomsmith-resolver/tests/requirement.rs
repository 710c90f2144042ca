use std::cell::Cell;

use pomsmith_resolver::range::VersionRange;
use pomsmith_resolver::requirement::{Constraint, Requirement, RequirementChain};
use pomsmith_util::errors::PomsmithError;

fn available() -> Result<Vec<String>, PomsmithError> {
    Ok((1..=10).map(|v| v.to_string()).collect())
}

fn req(expression: &str) -> Requirement {
    Requirement::parse(expression).unwrap()
}

#[test]
fn range_set() {
    let chain = RequirementChain::from_requirement(req("[1,11)"), 0);
    assert_eq!(chain.resolve(available).unwrap(), "10");
}

#[test]
fn multiple_soft_requirements() {
    let chain = RequirementChain::from_requirement(req("1"), 1).add(req("2"));
    assert_eq!(chain.resolve(available).unwrap(), "1");
}

#[test]
fn soft_requirement_then_hard_requirement() {
    let chain = RequirementChain::from_requirement(req("1"), 1).add(req("[1,11]"));
    assert_eq!(chain.constraints()[1].depth, 2);
    assert_eq!(chain.resolve(available).unwrap(), "10");
}

#[test]
fn hard_requirement_then_soft_requirement() {
    let chain = RequirementChain::from_requirement(req("[1,11]"), 1).add(req("1"));
    assert_eq!(chain.resolve(available).unwrap(), "10");
}

#[test]
fn nearest_range_wins() {
    let chain = RequirementChain::from_requirement(req("[1,2]"), 1).add(req("[9,10]"));
    assert_eq!(chain.resolve(available).unwrap(), "2");
}

#[test]
fn soft_only_chain_never_fetches_catalog() {
    let fetched = Cell::new(false);
    let chain = RequirementChain::from_requirement(req("3.1"), 0)
        .add(req("4.0"))
        .add(req("5.0"));
    let version = chain
        .resolve(|| {
            fetched.set(true);
            available()
        })
        .unwrap();
    assert_eq!(version, "3.1");
    assert!(!fetched.get());
}

#[test]
fn hard_chain_fetches_catalog_once() {
    let fetches = Cell::new(0);
    let chain = RequirementChain::from_requirement(req("[1,5)"), 0)
        .add(req("[2,3]"))
        .add(req("7"));
    let version = chain
        .resolve(|| {
            fetches.set(fetches.get() + 1);
            available()
        })
        .unwrap();
    assert_eq!(version, "4");
    assert_eq!(fetches.get(), 1);
}

#[test]
fn nearest_hard_wins_regardless_of_append_order() {
    let near = || Constraint::new(req("[1,2]"), 1);
    let far = || Constraint::new(req("[9,10]"), 2);
    let forward = RequirementChain::from_constraints(vec![near(), far()]);
    let reversed = RequirementChain::from_constraints(vec![far(), near()]);
    assert_eq!(forward.resolve(available).unwrap(), "2");
    assert_eq!(reversed.resolve(available).unwrap(), "2");
}

#[test]
fn hard_depth_tie_goes_to_earliest() {
    let chain = RequirementChain::from_constraints(vec![
        Constraint::new(req("[3,4]"), 1),
        Constraint::new(req("[7,8]"), 1),
    ]);
    assert_eq!(chain.resolve(available).unwrap(), "4");
}

#[test]
fn soft_depth_tie_goes_to_earliest() {
    let chain = RequirementChain::from_constraints(vec![
        Constraint::new(req("2"), 3),
        Constraint::new(req("1"), 3),
        Constraint::new(req("9"), 4),
    ]);
    assert_eq!(chain.resolve(available).unwrap(), "2");
}

#[test]
fn hard_never_yields_soft_literal() {
    let chain = RequirementChain::from_requirement(req("0.5"), 0).add(req("[2,3)"));
    assert_eq!(chain.resolve(available).unwrap(), "2");
}

#[test]
fn unsatisfiable_range_without_fallback_fails() {
    let chain = RequirementChain::from_requirement(req("[20,30)"), 0).for_target("org.example:lib");
    match chain.resolve(available) {
        Err(PomsmithError::NoSatisfyingVersion { coordinate, range }) => {
            assert_eq!(coordinate, "org.example:lib");
            assert_eq!(range, "[20,30)");
        }
        other => panic!("expected NoSatisfyingVersion, got {other:?}"),
    }
}

#[test]
fn unsatisfiable_range_uses_fallback_literal() {
    let range = VersionRange::parse("[20,30)").unwrap();
    let chain = RequirementChain::from_requirement(
        Requirement::hard(range).with_fallback(Some("20.1".to_string())),
        0,
    );
    assert_eq!(chain.resolve(available).unwrap(), "20.1");
}

#[test]
fn empty_chain_is_invalid() {
    let chain = RequirementChain::from_constraints(Vec::new());
    assert!(chain.is_empty());
    assert!(matches!(
        chain.resolve(available),
        Err(PomsmithError::InvalidChain)
    ));
}

#[test]
fn catalog_errors_propagate() {
    let chain = RequirementChain::from_requirement(req("[1,2]"), 0);
    let result = chain.resolve(|| {
        Err(PomsmithError::Network {
            message: "offline".to_string(),
        })
    });
    assert!(matches!(result, Err(PomsmithError::Network { .. })));
}
