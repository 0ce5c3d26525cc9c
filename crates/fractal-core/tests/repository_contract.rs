//! Repository façade contract tests.
//!
//! Every query goes through `StubEvaluator`, so these check the exact
//! expression paths sent to the flake and how its output is decoded.

use fractal_core::domain::validation::CountsMismatch;
use fractal_core::{
    ExpressionRoots, Repository, RepositoryError, ResourceValidation, ValidationCounts,
    ValidationResult, ValidationType,
};
use nix_flake::fakes::StubEvaluator;
use nix_flake::NixError;

const SUCCESS_PAYLOAD: &str = r#"{"resources": {"pod/a": {"type": "success", "message": "ok"}}, "counts": {"success": 1, "warning": 0, "error": 0}}"#;
const ERROR_PAYLOAD: &str = r#"{"resources": {"pod/b": {"type": "error", "message": "bad"}}, "counts": {"success": 0, "warning": 0, "error": 1}}"#;

fn clusters_stub() -> StubEvaluator {
    StubEvaluator::new()
        .with_json(
            "kube._app.clusters",
            r#"{"prod": {"region": "eu-west-1", "nodes": 5}, "staging": {"region": "us-east-1"}}"#,
        )
        .with_json(
            "kube._app.clusters.prod",
            r#"{"region": "eu-west-1", "nodes": 5}"#,
        )
        .with_json(
            "kube._app.clusters.staging",
            r#"{"region": "us-east-1"}"#,
        )
}

// ===========================================================================
// Cluster properties
// ===========================================================================

#[test]
fn single_and_all_cluster_properties_agree() {
    let repo = Repository::new(clusters_stub());

    let all = repo.get_clusters_properties().unwrap();
    assert_eq!(all.len(), 2);

    for name in ["prod", "staging"] {
        let single = repo.get_cluster_properties(name).unwrap();
        assert_eq!(all[name], single, "cluster {name}");
    }

    assert_eq!(
        repo.evaluator().calls(),
        vec![
            "kube._app.clusters",
            "kube._app.clusters.prod",
            "kube._app.clusters.staging"
        ]
    );
}

#[test]
fn missing_cluster_is_evaluation_error() {
    let repo = Repository::new(clusters_stub());

    let err = repo.get_cluster_properties("nope").unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Evaluation {
            source: NixError::EvalFailed { .. },
            ..
        }
    ));
    assert_eq!(err.expression(), "kube._app.clusters.nope");
}

#[test]
fn non_object_properties_are_decode_error() {
    let stub = StubEvaluator::new().with_json("kube._app.clusters.prod", r#""just a string""#);
    let repo = Repository::new(stub);

    let err = repo.get_cluster_properties("prod").unwrap_err();
    assert!(matches!(err, RepositoryError::Decode { .. }));
}

// ===========================================================================
// Manifests
// ===========================================================================

#[test]
fn manifests_keep_declaration_order() {
    let stub = StubEvaluator::new().with_json(
        "kube.clusters.prod.manifests",
        r#"[
            {"apiVersion": "v1", "kind": "Namespace", "metadata": {"name": "apps"}},
            {"apiVersion": "apps/v1", "kind": "Deployment", "metadata": {"name": "web", "namespace": "apps"}},
            {"apiVersion": "v1", "kind": "Service", "metadata": {"name": "web", "namespace": "apps"}}
        ]"#,
    );
    let repo = Repository::new(stub);

    let manifests = repo.get_cluster_manifests("prod").unwrap();
    let names: Vec<_> = manifests.iter().map(|m| m.display_name()).collect();

    assert_eq!(names, vec!["namespace/apps", "deployment/web", "service/web"]);
}

#[test]
fn manifests_that_are_not_objects_are_decode_error() {
    let stub = StubEvaluator::new().with_json("kube.clusters.prod.manifests", "[1, 2, 3]");
    let repo = Repository::new(stub);

    let err = repo.get_cluster_manifests("prod").unwrap_err();
    assert!(matches!(err, RepositoryError::Decode { .. }));
    assert_eq!(err.expression(), "kube.clusters.prod.manifests");
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn validate_cluster_returns_exact_structure() {
    let stub = StubEvaluator::new().with_json("kube.clusters.prod.validation", SUCCESS_PAYLOAD);
    let repo = Repository::new(stub);

    let result = repo.validate_cluster("prod").unwrap();

    let expected: ValidationResult = [(
        "pod/a".to_string(),
        ResourceValidation::new(ValidationType::Success, "ok"),
    )]
    .into_iter()
    .collect();
    assert_eq!(result, expected);
    assert_eq!(
        result.counts(),
        ValidationCounts {
            success: 1,
            warning: 0,
            error: 0
        }
    );
    assert!(!result.has_errors());
}

#[test]
fn validate_cluster_with_error_entry_is_data_not_failure() {
    let stub = StubEvaluator::new().with_json("kube.clusters.prod.validation", ERROR_PAYLOAD);
    let repo = Repository::new(stub);

    let result = repo.validate_cluster("prod").unwrap();
    assert!(result.has_errors());
    assert_eq!(result.status(), ValidationType::Error);
}

#[test]
fn validate_cluster_propagates_evaluation_error() {
    let stub = StubEvaluator::new().with_failure(
        "kube.clusters.prod.validation",
        "error: assertion failed at validation.nix:12",
    );
    let repo = Repository::new(stub);

    match repo.validate_cluster("prod").unwrap_err() {
        RepositoryError::Evaluation { expression, source } => {
            assert_eq!(expression, "kube.clusters.prod.validation");
            assert!(source.to_string().contains("assertion failed"));
        }
        other => panic!("expected evaluation error, got {other:?}"),
    }
}

#[test]
fn malformed_bytes_are_decode_error() {
    let stub = StubEvaluator::new().with_bytes("kube.clusters.prod.validation", b"{not json");
    let repo = Repository::new(stub);

    let err = repo.validate_cluster("prod").unwrap_err();
    assert!(matches!(err, RepositoryError::Decode { .. }));
}

#[test]
fn inconsistent_counts_are_decode_error() {
    let stub = StubEvaluator::new().with_json(
        "kube.clusters.prod.validation",
        r#"{"resources": {"pod/a": {"type": "warning", "message": "w"}}, "counts": {"success": 1, "warning": 0, "error": 0}}"#,
    );
    let repo = Repository::new(stub);

    let err = repo.validate_cluster("prod").unwrap_err();
    match err {
        RepositoryError::Decode { source, .. } => {
            let expected = CountsMismatch {
                declared: ValidationCounts {
                    success: 1,
                    warning: 0,
                    error: 0,
                },
                tallied: ValidationCounts {
                    success: 0,
                    warning: 1,
                    error: 0,
                },
            };
            assert!(source.to_string().contains(&expected.to_string()), "{source}");
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn counts_match_entries_for_decoded_results() {
    let payload = r#"{
        "resources": {
            "a": {"type": "success", "message": ""},
            "b": {"type": "success", "message": ""},
            "c": {"type": "warning", "message": ""},
            "d": {"type": "error", "message": ""},
            "e": {"type": "error", "message": ""}
        },
        "counts": {"success": 2, "warning": 1, "error": 2}
    }"#;
    let repo = Repository::new(StubEvaluator::new().with_json("kube.clusters.x.validation", payload));

    let result = repo.validate_cluster("x").unwrap();
    let counts = result.counts();

    assert_eq!(counts.total(), result.len());
    assert_eq!(counts, ValidationCounts::tally(result.resources().values()));
}

#[test]
fn pretty_json_round_trip() {
    let repo = Repository::new(
        StubEvaluator::new().with_json("kube.clusters.prod.validation", ERROR_PAYLOAD),
    );
    let result = repo.validate_cluster("prod").unwrap();

    let pretty = serde_json::to_string_pretty(&result).unwrap();
    let decoded: ValidationResult = serde_json::from_str(&pretty).unwrap();

    assert_eq!(decoded, result);
}

// ===========================================================================
// Expression paths
// ===========================================================================

#[test]
fn custom_roots_and_quoted_cluster_names() {
    let roots = ExpressionRoots {
        properties: "infra.meta".to_string(),
        resources: "infra".to_string(),
    };
    let stub = StubEvaluator::new()
        .with_json(r#"infra.meta.clusters."eu.prod""#, "{}")
        .with_json(r#"infra.clusters."eu.prod".validation"#, SUCCESS_PAYLOAD);
    let repo = Repository::with_roots(stub, roots);

    repo.get_cluster_properties("eu.prod").unwrap();
    repo.validate_cluster("eu.prod").unwrap();

    assert_eq!(
        repo.evaluator().calls(),
        vec![
            r#"infra.meta.clusters."eu.prod""#,
            r#"infra.clusters."eu.prod".validation"#
        ]
    );
}

#[test]
fn dollar_and_backslash_reach_the_flake_verbatim() {
    let stub = StubEvaluator::new().with_json(r#"kube.clusters."a$b\c".validation"#, SUCCESS_PAYLOAD);
    let repo = Repository::new(stub);

    repo.validate_cluster(r"a$b\c").unwrap();

    assert_eq!(
        repo.evaluator().calls(),
        vec![r#"kube.clusters."a$b\c".validation"#]
    );
}

#[test]
fn cluster_names_with_double_quotes_never_reach_the_flake() {
    let repo = Repository::new(StubEvaluator::new());

    let err = repo.validate_cluster(r#"eu"prod"#).unwrap_err();

    match &err {
        RepositoryError::Evaluation {
            source: NixError::InvalidAttrName(name),
            ..
        } => assert_eq!(name, r#"eu"prod"#),
        other => panic!("expected invalid attribute name, got {other:?}"),
    }
    assert_eq!(err.expression(), r#"kube.clusters.eu"prod.validation"#);
    assert!(repo.evaluator().calls().is_empty());
}

#[test]
fn clones_share_the_evaluator() {
    let repo = Repository::new(clusters_stub());
    let clone = repo.clone();

    clone.get_clusters_properties().unwrap();

    assert_eq!(repo.evaluator().calls(), vec!["kube._app.clusters"]);
}
