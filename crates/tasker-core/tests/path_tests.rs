use std::fs;

use rstest::rstest;
use tasker_core::{ProjectIdentifier, TaskIdentifier};

#[rstest]
#[case("")]
#[case("bad\0path")]
#[case("nested/\0/path")]
fn test_unusable_paths_are_invalid(#[case] path: &str) {
    let err = ProjectIdentifier::resolve(path, None).unwrap_err();
    assert_eq!(err.category(), "invalid path");
}

#[rstest]
#[case("project.json")]
#[case("./project.json")]
#[case("sub/../project.json")]
#[case("./sub/.././project.json")]
fn test_spellings_collapse_to_one_identifier(#[case] spelling: &str) {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("project.json"), "{}").unwrap();

    let reference = ProjectIdentifier::resolve("project.json", Some(dir.path())).unwrap();
    let spelled = ProjectIdentifier::resolve(spelling, Some(dir.path())).unwrap();
    assert_eq!(reference, spelled);
}

#[test]
fn test_absolute_and_relative_forms_agree() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("project.json"), "{}").unwrap();

    let relative = ProjectIdentifier::resolve("project.json", Some(dir.path())).unwrap();
    let absolute_text = dir.path().join("project.json").display().to_string();
    let absolute = ProjectIdentifier::resolve(&absolute_text, None).unwrap();
    assert_eq!(relative, absolute);
}

#[test]
fn test_task_identifiers_differ_by_project_or_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.json"), "{}").unwrap();
    fs::write(dir.path().join("b.json"), "{}").unwrap();

    let first = TaskIdentifier::resolve("a.json", Some(dir.path()), "build").unwrap();
    let same = TaskIdentifier::resolve("./a.json", Some(dir.path()), "build").unwrap();
    let other_project = TaskIdentifier::resolve("b.json", Some(dir.path()), "build").unwrap();
    let other_name = TaskIdentifier::resolve("a.json", Some(dir.path()), "test").unwrap();

    assert_eq!(first, same);
    assert_ne!(first, other_project);
    assert_ne!(first, other_name);
}
