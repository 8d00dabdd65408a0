//! Extension loader integration tests
//! Run with: cargo test --test extension_loader_test

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use krypton_bot::application::errors::ExtensionError;
use krypton_bot::domain::entities::{Command, CommandRegistry};
use krypton_bot::extensions::Extension;
use krypton_bot::infrastructure::extensions::{ExtensionCatalog, ExtensionLoader, LoadOutcome, LoadReport};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn outcome<'a>(reports: &'a [LoadReport], id: &str) -> &'a LoadOutcome {
    &reports
        .iter()
        .find(|r| r.identifier == id)
        .unwrap_or_else(|| panic!("no report for {}", id))
        .outcome
}

/// Directory with two good extensions, one unknown, one malformed and noise
fn mixed_directory() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "general.yaml", "description: everyday commands\n");
    write(dir.path(), "fun.yaml", "");
    write(dir.path(), "music.yaml", "");
    write(dir.path(), "broken.yaml", "enabled: [nope");
    write(dir.path(), "README.md", "not an extension");
    write(dir.path(), "fun.yaml.bak", "");
    fs::create_dir(dir.path().join("nested.yaml")).unwrap();
    dir
}

#[test]
fn test_one_attempt_per_descriptor() {
    let dir = mixed_directory();
    let loader = ExtensionLoader::new(dir.path(), ExtensionCatalog::builtin());

    let scanned: BTreeSet<String> = loader.scan().collect();
    let expected: BTreeSet<String> = ["broken", "fun", "general", "music"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(scanned, expected);

    let mut registry = CommandRegistry::new();
    let reports = loader.load_all(&mut registry);
    assert_eq!(reports.len(), 4);
}

#[test]
fn test_failures_do_not_stop_the_scan() {
    let dir = mixed_directory();
    let loader = ExtensionLoader::new(dir.path(), ExtensionCatalog::builtin());
    let mut registry = CommandRegistry::new();

    let reports = loader.load_all(&mut registry);

    assert_eq!(outcome(&reports, "general"), &LoadOutcome::Loaded);
    assert_eq!(outcome(&reports, "fun"), &LoadOutcome::Loaded);
    assert_eq!(
        outcome(&reports, "music"),
        &LoadOutcome::Failed(ExtensionError::NotFound("music".to_string()))
    );
    assert!(matches!(
        outcome(&reports, "broken"),
        LoadOutcome::Failed(ExtensionError::Descriptor(_))
    ));

    assert!(registry.find("ping").is_some());
    assert!(registry.find("flip").is_some());
    assert_eq!(registry.extensions().len(), 2);
}

#[test]
fn test_scan_is_repeatable() {
    let dir = mixed_directory();
    let loader = ExtensionLoader::new(dir.path(), ExtensionCatalog::builtin());

    let first: BTreeSet<String> = loader.scan().collect();
    let second: BTreeSet<String> = loader.scan().collect();
    assert_eq!(first, second);
}

#[test]
fn test_second_load_reports_already_loaded() {
    let dir = mixed_directory();
    let loader = ExtensionLoader::new(dir.path(), ExtensionCatalog::builtin());
    let mut registry = CommandRegistry::new();

    loader.load_all(&mut registry);
    let commands_before = registry.len();
    let reports = loader.load_all(&mut registry);

    assert_eq!(
        outcome(&reports, "general"),
        &LoadOutcome::Failed(ExtensionError::AlreadyLoaded("general".to_string()))
    );
    assert_eq!(
        outcome(&reports, "fun"),
        &LoadOutcome::Failed(ExtensionError::AlreadyLoaded("fun".to_string()))
    );
    assert!(reports.iter().all(|r| !r.is_loaded()));
    assert_eq!(registry.len(), commands_before);
}

#[test]
fn test_disabled_descriptor_is_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "owner.yaml", "enabled: false\n");
    write(dir.path(), "general.yaml", "enabled: true\n");
    let loader = ExtensionLoader::new(dir.path(), ExtensionCatalog::builtin());
    let mut registry = CommandRegistry::new();

    let reports = loader.load_all(&mut registry);

    assert_eq!(outcome(&reports, "owner"), &LoadOutcome::Skipped);
    assert_eq!(outcome(&reports, "general"), &LoadOutcome::Loaded);
    assert!(registry.find("shutdown").is_none());
    assert!(!registry.is_extension_loaded("owner"));
}

#[test]
fn test_missing_directory_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let loader = ExtensionLoader::new(dir.path().join("absent"), ExtensionCatalog::builtin());
    let mut registry = CommandRegistry::new();

    assert!(loader.load_all(&mut registry).is_empty());
    assert!(registry.is_empty());
}

struct Echo;

impl Extension for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Claims a name another extension already uses"
    }

    fn commands(&self) -> Result<Vec<Command>, ExtensionError> {
        Ok(vec![
            Command::new("echo"),
            Command::new("pong").with_aliases(vec!["PING".to_string()]),
        ])
    }
}

fn echo() -> Box<dyn Extension> {
    Box::new(Echo)
}

#[test]
fn test_command_name_collision_installs_nothing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "general.yaml", "");
    write(dir.path(), "echo.yaml", "");

    let mut catalog = ExtensionCatalog::builtin();
    catalog.register("echo", echo).unwrap();
    let loader = ExtensionLoader::new(dir.path(), catalog);

    let mut registry = CommandRegistry::new();
    assert_eq!(loader.load("general", &mut registry), Ok(LoadOutcome::Loaded));

    let result = loader.load("echo", &mut registry);
    assert!(matches!(
        result,
        Err(ExtensionError::DuplicateCommand { ref command, .. }) if command == "ping"
    ));
    assert!(registry.find("echo").is_none());
    assert!(!registry.is_extension_loaded("echo"));
}

struct Faulty;

impl Extension for Faulty {
    fn name(&self) -> &str {
        "faulty"
    }

    fn description(&self) -> &str {
        "Fails during setup"
    }

    fn commands(&self) -> Result<Vec<Command>, ExtensionError> {
        Err(ExtensionError::Setup("missing API key".to_string()))
    }
}

fn faulty() -> Box<dyn Extension> {
    Box::new(Faulty)
}

#[test]
fn test_setup_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "faulty.yaml", "");
    write(dir.path(), "fun.yaml", "");

    let mut catalog = ExtensionCatalog::builtin();
    catalog.register("faulty", faulty).unwrap();
    let loader = ExtensionLoader::new(dir.path(), catalog);
    let mut registry = CommandRegistry::new();

    let reports = loader.load_all(&mut registry);

    assert_eq!(
        outcome(&reports, "faulty"),
        &LoadOutcome::Failed(ExtensionError::Setup("missing API key".to_string()))
    );
    assert_eq!(outcome(&reports, "fun"), &LoadOutcome::Loaded);
    assert!(!registry.is_extension_loaded("faulty"));
}
