use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

#[allow(deprecated)]
fn policy_cmd() -> Command {
    Command::cargo_bin("annotations-policy").unwrap()
}

fn run(verb: &str, input: &Value) -> Value {
    let output = policy_cmd()
        .arg(verb)
        .write_stdin(serde_json::to_vec(input).unwrap())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).unwrap()
}

fn envelope(settings: Value, annotations: Value) -> Value {
    json!({
        "request": {
            "uid": "1299d386-525b-4032-98ae-1949f69f9cfc",
            "kind": {"group": "", "version": "v1", "kind": "Service"},
            "name": "test",
            "namespace": "default",
            "operation": "CREATE",
            "object": {
                "apiVersion": "v1",
                "kind": "Service",
                "metadata": {"name": "test", "namespace": "default", "annotations": annotations},
                "spec": {"ports": [{"port": 80}]}
            }
        },
        "settings": settings
    })
}

#[test]
fn help_subcommand_is_a_usage_error() {
    policy_cmd()
        .arg("help")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn help_and_version_flags_stay_off_stdout() {
    for flag in ["--help", "--version"] {
        policy_cmd()
            .arg(flag)
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::is_empty().not());
    }
}

#[test]
fn validate_settings_accepts_consistent_rules() {
    let out = run(
        "validate-settings",
        &json!({"requiredAnnotations": {"cc-center": "marketing"}, "forbiddenAnnotations": []}),
    );
    assert_eq!(out, json!({"valid": true}));
}

#[test]
fn validate_settings_reports_conflicts() {
    let out = run(
        "validate-settings",
        &json!({"requiredAnnotations": {"cc-center": "marketing"}, "forbiddenAnnotations": ["cc-center"]}),
    );

    assert_eq!(out["valid"], false);
    assert!(out["message"].as_str().unwrap().contains("cc-center"));
}

#[test]
fn validate_settings_answers_garbage_with_invalid() {
    policy_cmd()
        .arg("validate-settings")
        .write_stdin("{not json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""valid":false"#))
        .stdout(predicate::str::contains("cannot parse settings"));
}

#[test]
fn validate_mutates_missing_annotation() {
    let out = run(
        "validate",
        &envelope(json!({"requiredAnnotations": {"cc-center": "marketing"}}), json!({})),
    );

    assert_eq!(out["accepted"], true);
    assert_eq!(
        out["mutated_object"]["metadata"]["annotations"],
        json!({"cc-center": "marketing"})
    );
    assert_eq!(out["mutated_object"]["spec"], json!({"ports": [{"port": 80}]}));
}

#[test]
fn validate_rejects_forbidden_annotation() {
    let out = run(
        "validate",
        &envelope(
            json!({"requiredAnnotations": {"cc-center": "marketing"}, "forbiddenAnnotations": ["team"]}),
            json!({"team": "x"}),
        ),
    );

    assert_eq!(
        out,
        json!({
            "accepted": false,
            "message": "the following annotations are forbidden: team",
            "code": 400
        })
    );
}

#[test]
fn validate_accepts_compliant_object() {
    let out = run(
        "validate",
        &envelope(
            json!({"requiredAnnotations": {"cc-center": "marketing"}}),
            json!({"cc-center": "marketing"}),
        ),
    );
    assert_eq!(out, json!({"accepted": true}));
}

#[test]
fn logs_stay_off_stdout() {
    let output = policy_cmd()
        .args(["--log-level", "trace", "validate"])
        .write_stdin(
            serde_json::to_vec(&envelope(json!({"forbiddenAnnotations": ["team"]}), json!({"team": "x"})))
                .unwrap(),
        )
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let out: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(out["code"], 400);
}

#[test]
fn debug_logs_carry_request_identity_and_decision() {
    let input = json!({
        "request": {
            "uid": "7c3a0f1e-2b4d-4e5f-8a9b-0c1d2e3f4a5b",
            "operation": "UPDATE",
            "object": {
                "kind": "ConfigMap",
                "metadata": {"name": "from-object", "annotations": {}}
            }
        },
        "settings": {"requiredAnnotations": {"cc-center": "marketing"}}
    });

    let stderr = policy_cmd()
        .args(["--log-level", "debug", "--log-format", "json", "validate"])
        .env_remove("RUST_LOG")
        .write_stdin(serde_json::to_vec(&input).unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""mutated_object""#))
        .get_output()
        .stderr
        .clone();

    let stderr = String::from_utf8(stderr).unwrap();
    assert!(stderr.contains("UPDATE"), "{stderr}");
    assert!(stderr.contains("from-object"), "{stderr}");
    assert!(stderr.contains("ConfigMap"), "{stderr}");
    assert!(stderr.contains("admission decided"), "{stderr}");
    assert!(stderr.contains(r#""mutated":true"#), "{stderr}");
}

#[test]
fn unknown_verb_is_a_usage_error() {
    policy_cmd()
        .arg("mutate")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn missing_verb_is_a_usage_error() {
    policy_cmd()
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn extra_arguments_are_a_usage_error() {
    policy_cmd()
        .args(["validate", "extra"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}
