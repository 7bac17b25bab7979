use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn recipebook(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("recipebook").unwrap();
    cmd.env("RECIPEBOOK_DATA_DIR", data_dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_empty_list_shows_hint() {
    let temp_dir = tempfile::tempdir().unwrap();
    recipebook(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Click the + button"));
}

#[test]
fn test_add_list_delete() {
    let temp_dir = tempfile::tempdir().unwrap();

    recipebook(temp_dir.path())
        .args(["add", "Toast", "-i", "bread", "-i", "butter", "-s", "toast it"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Toast"))
        .stdout(predicate::str::contains("bread, butter"));

    assert!(temp_dir.path().join("recipes.json").exists());

    recipebook(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1."))
        .stdout(predicate::str::contains("Toast"));

    recipebook(temp_dir.path())
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ingredients"))
        .stdout(predicate::str::contains("1. toast it"));

    recipebook(temp_dir.path())
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted Toast"));

    recipebook(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Toast").not());
}

#[test]
fn test_edit_replaces_ingredients() {
    let temp_dir = tempfile::tempdir().unwrap();

    recipebook(temp_dir.path())
        .args(["add", "Tea", "-i", "water"])
        .assert()
        .success();

    recipebook(temp_dir.path())
        .args(["edit", "1", "--name", "Green tea", "-i", "water", "-i", "matcha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Green tea"))
        .stdout(predicate::str::contains("water, matcha"));
}

#[test]
fn test_add_with_photo() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = temp_dir.path().join("toast.png");
    std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

    recipebook(temp_dir.path())
        .args(["add", "Toast", "--photo"])
        .arg(&image)
        .assert()
        .success();

    let stored = std::fs::read_to_string(temp_dir.path().join("recipes.json")).unwrap();
    assert!(stored.contains("image/png"));
}

#[test]
fn test_blank_name_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    recipebook(temp_dir.path())
        .args(["add", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name is required"));
}

#[test]
fn test_unknown_recipe_reference() {
    let temp_dir = tempfile::tempdir().unwrap();
    recipebook(temp_dir.path())
        .args(["show", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No recipe matches '3'"));
}

#[test]
fn test_config_file_in_data_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("recipebook.toml"),
        "store_file = \"book.json\"\n",
    )
    .unwrap();

    recipebook(temp_dir.path())
        .args(["add", "Soup"])
        .assert()
        .success();
    assert!(temp_dir.path().join("book.json").exists());
}
