//! Integration tests for package manager detection.
//!
//! These verify that n detects the package manager from the packageManager
//! field and from lockfiles, walking up from the working directory.

use std::fs;

use n_pm::cache::PmCache;
use n_pm::package::{detect, load_workspaces, DetectionSource, Detector, PackageManager};

use crate::integration::fixtures::{
    create_pnpm_monorepo, create_project, create_project_with_lockfile,
    create_project_with_package_manager, standard_scripts, LockfileType,
};

// ==================== Lock File Detection ====================

#[tokio::test]
async fn test_detect_from_each_lockfile() {
    let cases = [
        (LockfileType::Npm, PackageManager::Npm),
        (LockfileType::Yarn, PackageManager::Yarn),
        (LockfileType::Pnpm, PackageManager::Pnpm),
        (LockfileType::Bun, PackageManager::Bun),
        (LockfileType::Deno, PackageManager::Deno),
    ];

    for (lock, expected) in cases {
        let project = create_project_with_lockfile(&standard_scripts(), lock);
        let detection = detect(project.path()).await.unwrap();
        assert_eq!(detection.manager, expected, "{lock:?}");
        assert_eq!(
            detection.source,
            DetectionSource::LockFile(project.path().join(lock.filename()))
        );
    }
}

#[tokio::test]
async fn test_lockfile_priority_in_one_directory() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Npm);
    fs::write(project.path().join("bun.lockb"), "").unwrap();
    fs::write(project.path().join("yarn.lock"), "").unwrap();

    let detection = detect(project.path()).await.unwrap();
    assert_eq!(detection.manager, PackageManager::Bun);
}

#[tokio::test]
async fn test_package_manager_field_beats_lockfile() {
    let project = create_project_with_package_manager("yarn@4.1.0");
    fs::write(project.path().join("pnpm-lock.yaml"), "").unwrap();

    let detection = detect(project.path()).await.unwrap();
    assert_eq!(detection.manager, PackageManager::Yarn);
    assert!(matches!(
        detection.source,
        DetectionSource::PackageManagerField(_)
    ));
}

#[tokio::test]
async fn test_unknown_package_manager_field_falls_back_to_lockfile() {
    let project = create_project_with_package_manager("cargo@1.0.0");
    fs::write(project.path().join("pnpm-lock.yaml"), "").unwrap();

    let detection = detect(project.path()).await.unwrap();
    assert_eq!(detection.manager, PackageManager::Pnpm);
}

// ==================== Upward Walk ====================

#[tokio::test]
async fn test_walks_up_to_parent_lockfile() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Pnpm);
    let nested = project.path().join("packages/ui/src");
    fs::create_dir_all(&nested).unwrap();

    let detection = detect(&nested).await.unwrap();
    assert_eq!(detection.manager, PackageManager::Pnpm);
    assert_eq!(detection.found_in(), Some(project.path()));
}

#[tokio::test]
async fn test_nearest_directory_wins() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Pnpm);
    let child = project.path().join("legacy");
    fs::create_dir_all(&child).unwrap();
    fs::write(child.join("yarn.lock"), "").unwrap();

    let detection = detect(&child).await.unwrap();
    assert_eq!(detection.manager, PackageManager::Yarn);
}

#[tokio::test]
async fn test_malformed_manifest_is_skipped() {
    let project = create_project_with_lockfile(&[], LockfileType::Bun);
    fs::write(project.path().join("package.json"), "{ not json").unwrap();

    let detection = detect(project.path()).await.unwrap();
    assert_eq!(detection.manager, PackageManager::Bun);
}

// ==================== Persisted Cache ====================

#[tokio::test]
async fn test_cache_survives_lockfile_removal() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Yarn);
    let cache_home = tempfile::TempDir::new().unwrap();
    let cache_file = cache_home.path().join("n/pm-cache.json");

    let mut detector = Detector::with_store(PmCache::empty(&cache_file));
    let first = detector.detect(project.path()).await.unwrap();
    assert_eq!(first.manager, PackageManager::Yarn);
    assert!(cache_file.is_file());

    fs::remove_file(project.path().join("yarn.lock")).unwrap();

    let mut detector = Detector::with_store(PmCache::load_from(&cache_file).unwrap());
    let second = detector.detect(project.path()).await.unwrap();
    assert_eq!(second.manager, PackageManager::Yarn);
    assert_eq!(second.source, DetectionSource::Cache);
}

#[tokio::test]
async fn test_forget_drops_cached_entry() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Yarn);
    let cache_home = tempfile::TempDir::new().unwrap();
    let cache_file = cache_home.path().join("pm-cache.json");

    let mut detector = Detector::with_store(PmCache::empty(&cache_file));
    detector.detect(project.path()).await.unwrap();
    detector.forget(project.path());

    let store = detector.store_mut().unwrap();
    assert_eq!(store.get(project.path()), None);
}

// ==================== Workspaces ====================

#[tokio::test]
async fn test_pnpm_workspaces_in_pattern_order() {
    let project = create_pnpm_monorepo();
    let root = project.path();

    let workspaces = load_workspaces(PackageManager::Pnpm, root).await;
    let labels: Vec<String> = workspaces.iter().map(|w| w.label(root)).collect();

    assert_eq!(labels, vec!["", "packages/ui", "apps/web"]);
    assert!(workspaces[0].is_root());
}

#[tokio::test]
async fn test_workspace_negation_excludes() {
    let project = create_pnpm_monorepo();
    let root = project.path();
    fs::write(
        root.join("pnpm-workspace.yaml"),
        "packages:\n  - 'packages/*'\n  - 'apps/*'\n  - '!apps/web'\n",
    )
    .unwrap();

    let workspaces = load_workspaces(PackageManager::Pnpm, root).await;
    assert_eq!(workspaces.len(), 2);
}

#[tokio::test]
async fn test_non_pnpm_has_only_root() {
    let project = create_project(&standard_scripts());

    let workspaces = load_workspaces(PackageManager::Npm, project.path()).await;
    assert_eq!(workspaces.len(), 1);
}
