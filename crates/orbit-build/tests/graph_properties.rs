//! Properties of graph expansion and execution

mod common;

use common::{detached, labels, RecordingRunner};
use orbit_build::{Action, TargetId, TargetStatus};
use proptest::prelude::*;
use rstest::rstest;

fn any_action() -> impl Strategy<Value = Action> {
    prop::sample::select(Action::ALL.to_vec())
}

fn registry_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("pkg{}", i)).collect()
}

fn expected_chain(action: Action) -> Vec<Action> {
    match action {
        Action::FetchDependencies => vec![Action::FetchDependencies],
        Action::Build => vec![Action::FetchDependencies, Action::Build],
        Action::BuildRelease => vec![Action::FetchDependencies, Action::BuildRelease],
        Action::Test => vec![Action::FetchDependencies, Action::Build, Action::Test],
        Action::Lint => vec![Action::FetchDependencies, Action::Build, Action::Lint],
        Action::Clean => vec![Action::Clean],
        Action::DeepClean => vec![Action::DeepClean],
    }
}

#[rstest]
#[case(Action::Build, Action::FetchDependencies)]
#[case(Action::BuildRelease, Action::FetchDependencies)]
#[case(Action::Test, Action::Build)]
#[case(Action::Lint, Action::Build)]
fn test_prerequisite_precedes_requested_target(#[case] action: Action, #[case] prereq: Action) {
    let orbit = detached(&["A"]);
    let graph = orbit.plan(action.name(), &["A"]).unwrap();
    let order = labels(graph.execution_order().unwrap().into_iter().map(|t| &t.id));

    let requested = order.iter().position(|l| *l == format!("{}(A)", action)).unwrap();
    let before = order.iter().position(|l| *l == format!("{}(A)", prereq)).unwrap();
    assert!(before < requested, "{:?}", order);
}

proptest! {
    #[test]
    fn bootstrap_appears_at_most_once(action in any_action(), n in 0usize..8) {
        let names = registry_names(n);
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let orbit = detached(&refs);
        let runner = RecordingRunner::new();

        let report = orbit.run::<&str>(action.name(), &[], &runner).unwrap();
        let bootstraps = report
            .executed()
            .into_iter()
            .filter(|id| **id == TargetId::Bootstrap)
            .count();

        let needs_fetch = expected_chain(action).contains(&Action::FetchDependencies);
        prop_assert_eq!(bootstraps, usize::from(needs_fetch && n > 0));
        prop_assert_eq!(
            runner.commands().iter().filter(|c| *c == "install-hex").count(),
            usize::from(needs_fetch && n > 0)
        );
    }

    #[test]
    fn expansion_is_deterministic(action in any_action(), n in 0usize..6) {
        let names = registry_names(n);
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let orbit = detached(&refs);

        let first = orbit.plan::<&str>(action.name(), &[]).unwrap();
        let second = orbit.plan::<&str>(action.name(), &[]).unwrap();
        let first = labels(first.execution_order().unwrap().into_iter().map(|t| &t.id));
        let second = labels(second.execution_order().unwrap().into_iter().map(|t| &t.id));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_package_gets_its_full_chain(action in any_action(), n in 1usize..6) {
        let names = registry_names(n);
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let orbit = detached(&refs);

        let graph = orbit.plan::<&str>(action.name(), &[]).unwrap();
        for name in &names {
            for step in expected_chain(action) {
                let id = TargetId::package(step, orbit_build::Package::new(name.clone()));
                prop_assert!(graph.contains(&id), "missing {}", id);
            }
        }

        // per-package targets + bootstrap + deep-clean extras
        let per_package = expected_chain(action).len() * n;
        let extras = match action {
            Action::Clean => 0,
            Action::DeepClean => 2,
            _ => 1,
        };
        prop_assert_eq!(graph.len(), per_package + extras);
    }

    #[test]
    fn failure_at_k_stops_everything_after(
        action in any_action(),
        n in 1usize..5,
        pick in any::<prop::sample::Index>(),
    ) {
        let names = registry_names(n);
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let orbit = detached(&refs);

        let graph = orbit.plan::<&str>(action.name(), &[]).unwrap();
        let commands: Vec<String> = graph
            .execution_order()
            .unwrap()
            .into_iter()
            .filter_map(|t| match &t.step {
                orbit_build::Step::Command(spec) => Some(spec.command.clone()),
                _ => None,
            })
            .collect();
        let failing = pick.get(&commands).clone();
        let runner = RecordingRunner::new().failing_on(&failing);

        let report = orbit.executor(&runner).run(&graph).unwrap();

        let k = report
            .targets
            .iter()
            .position(|t| matches!(t.status, TargetStatus::Failed { .. }))
            .unwrap();
        prop_assert!(report.targets[..k].iter().all(|t| t.status == TargetStatus::Succeeded));
        prop_assert!(report.targets[k + 1..].iter().all(|t| t.status == TargetStatus::NotRun));
        let recorded = runner.commands();
        prop_assert_eq!(recorded.last(), Some(&failing));
    }
}
