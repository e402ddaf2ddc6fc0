mod common;

use std::path::{Path, PathBuf};

use common::{TestResult, WORKDIR, workspace_fs};
use invoicebot::artifacts::{
    ArtifactPattern, ArtifactSnapshot, collect_matching_files, compute_file_digest,
    verify_artifacts,
};
use invoicebot::fs::FileSystem;
use invoicebot::fs::mock::MockFileSystem;
use invoicebot::types::MultipleArtifactPolicy;

fn work() -> &'static Path {
    Path::new(WORKDIR)
}

#[test]
fn pattern_matches_relative_paths() -> TestResult {
    let flat = ArtifactPattern::new("invoice_*.docx")?;
    assert!(flat.matches("invoice_january_2025.docx"));
    assert!(!flat.matches("invoice_january_2025.pdf"));
    assert!(!flat.matches("template.docx"));

    assert!(!flat.matches("invoice_drafts/notes.docx"));
    assert!(!flat.matches("archive/invoice_january_2024.docx"));

    let nested = ArtifactPattern::new("out/**/*.pdf")?;
    assert!(nested.matches("out/2025/invoice.pdf"));
    assert!(!nested.matches("invoice.pdf"));
    Ok(())
}

#[test]
fn invalid_pattern_is_an_error() {
    let err = ArtifactPattern::new("invoice_[.docx").unwrap_err();
    assert!(format!("{err:#}").contains("invalid glob pattern"));
}

#[test]
fn collect_walks_subdirectories_in_sorted_order() -> TestResult {
    let fs = workspace_fs();
    fs.add_file("/work/out/b/invoice.pdf", b"b".to_vec());
    fs.add_file("/work/out/a/invoice.pdf", b"a".to_vec());
    fs.add_file("/work/out/readme.txt", b"x".to_vec());

    let pattern = ArtifactPattern::new("out/**/*.pdf")?;
    let files = collect_matching_files(&fs, work(), &pattern)?;
    assert_eq!(
        files,
        vec![
            PathBuf::from("/work/out/a/invoice.pdf"),
            PathBuf::from("/work/out/b/invoice.pdf"),
        ]
    );
    Ok(())
}

#[test]
fn star_does_not_reach_into_subdirectories() -> TestResult {
    let fs = workspace_fs();
    fs.add_file("/work/invoice_drafts/notes.docx", b"draft".to_vec());
    fs.add_file("/work/archive/invoice_january_2024.docx", b"old".to_vec());

    let pattern = ArtifactPattern::new("invoice_*.docx")?;
    assert!(collect_matching_files(&fs, work(), &pattern)?.is_empty());

    fs.add_file("/work/invoice_january_2025.docx", b"jan".to_vec());
    assert_eq!(
        collect_matching_files(&fs, work(), &pattern)?,
        vec![PathBuf::from("/work/invoice_january_2025.docx")]
    );
    Ok(())
}

#[test]
fn file_in_matching_named_directory_is_not_an_artifact() -> TestResult {
    let fs = workspace_fs();
    let pattern = ArtifactPattern::new("invoice_*.docx")?;
    let before = ArtifactSnapshot::capture(&fs, work(), &pattern)?;
    fs.add_file("/work/invoice_drafts/notes.docx", b"draft".to_vec());
    let after = ArtifactSnapshot::capture(&fs, work(), &pattern)?;

    assert!(after.is_empty());
    let err = verify_artifacts(&fs, &pattern, &before, &after, MultipleArtifactPolicy::AttachAll)
        .unwrap_err();
    assert!(err.to_string().contains("no file matching"));
    Ok(())
}

#[test]
fn digest_is_blake3_of_the_content() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/work/invoice.docx", b"hello".to_vec());

    let (digest, size) = compute_file_digest(&fs, Path::new("/work/invoice.docx"))?;
    assert_eq!(size, 5);
    assert_eq!(digest, blake3::hash(b"hello").to_hex().to_string());
    Ok(())
}

#[test]
fn snapshot_detects_new_and_rewritten_files() -> TestResult {
    let fs = workspace_fs();
    fs.add_file("/work/invoice_december_2024.docx", b"dec".to_vec());
    fs.add_file("/work/invoice_november_2024.docx", b"nov".to_vec());
    let pattern = ArtifactPattern::new("invoice_*.docx")?;

    let before = ArtifactSnapshot::capture(&fs, work(), &pattern)?;
    assert_eq!(before.len(), 2);

    fs.add_file("/work/invoice_january_2025.docx", b"jan".to_vec());
    fs.add_file("/work/invoice_december_2024.docx", b"dec v2".to_vec());
    let after = ArtifactSnapshot::capture(&fs, work(), &pattern)?;

    let fresh: Vec<PathBuf> = after
        .fresh_since(&before)
        .into_iter()
        .map(|(p, _)| p)
        .collect();
    assert_eq!(
        fresh,
        vec![
            PathBuf::from("/work/invoice_december_2024.docx"),
            PathBuf::from("/work/invoice_january_2025.docx"),
        ]
    );
    Ok(())
}

#[test]
fn nothing_fresh_is_an_error_naming_the_pattern() -> TestResult {
    let fs = workspace_fs();
    fs.add_file("/work/invoice_december_2024.docx", b"dec".to_vec());
    let pattern = ArtifactPattern::new("invoice_*.docx")?;

    let before = ArtifactSnapshot::capture(&fs, work(), &pattern)?;
    let after = ArtifactSnapshot::capture(&fs, work(), &pattern)?;
    let err = verify_artifacts(&fs, &pattern, &before, &after, MultipleArtifactPolicy::AttachAll)
        .unwrap_err();
    assert!(err.to_string().contains("no file matching 'invoice_*.docx'"));
    Ok(())
}

#[test]
fn multiple_fresh_files_follow_the_policy() -> TestResult {
    let pattern = ArtifactPattern::new("invoice_*.docx")?;
    let setup = || {
        let fs = workspace_fs();
        let before = ArtifactSnapshot::capture(&fs, work(), &pattern).unwrap();
        fs.add_file("/work/invoice_january_2025.docx", b"jan".to_vec());
        fs.add_file("/work/invoice_february_2025.docx", b"feb".to_vec());
        let after = ArtifactSnapshot::capture(&fs, work(), &pattern).unwrap();
        (fs, before, after)
    };

    let (fs, before, after) = setup();
    let all = verify_artifacts(&fs, &pattern, &before, &after, MultipleArtifactPolicy::AttachAll)?;
    let names: Vec<&str> = all.iter().map(|a| a.file_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["invoice_february_2025.docx", "invoice_january_2025.docx"]
    );

    let (fs, before, after) = setup();
    let latest = verify_artifacts(&fs, &pattern, &before, &after, MultipleArtifactPolicy::Latest)?;
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].file_name, "invoice_february_2025.docx");

    let (fs, before, after) = setup();
    let err = verify_artifacts(&fs, &pattern, &before, &after, MultipleArtifactPolicy::Error)
        .unwrap_err();
    assert!(err.to_string().contains("produced 2 files"));
    Ok(())
}

#[test]
fn empty_artifact_is_rejected() -> TestResult {
    let fs = workspace_fs();
    let pattern = ArtifactPattern::new("invoice_*.docx")?;
    let before = ArtifactSnapshot::capture(&fs, work(), &pattern)?;
    fs.add_file("/work/invoice_january_2025.docx", Vec::new());
    let after = ArtifactSnapshot::capture(&fs, work(), &pattern)?;

    let err = verify_artifacts(&fs, &pattern, &before, &after, MultipleArtifactPolicy::AttachAll)
        .unwrap_err();
    assert!(err.to_string().contains("is empty"));
    Ok(())
}

#[test]
fn verified_artifact_carries_size_and_digest() -> TestResult {
    let fs = workspace_fs();
    let pattern = ArtifactPattern::new("invoice_*.docx")?;
    let before = ArtifactSnapshot::capture(&fs, work(), &pattern)?;
    fs.add_file("/work/invoice_january_2025.docx", b"PK\x03\x04".to_vec());
    let after = ArtifactSnapshot::capture(&fs, work(), &pattern)?;

    let artifacts =
        verify_artifacts(&fs, &pattern, &before, &after, MultipleArtifactPolicy::AttachAll)?;
    let artifact = &artifacts[0];
    assert_eq!(artifact.size, 4);
    assert_eq!(artifact.digest.len(), 64);
    assert_eq!(
        artifact.modified,
        fs.modified(Path::new("/work/invoice_january_2025.docx"))?
    );
    Ok(())
}

#[test]
fn mock_fs_reports_missing_files() {
    let fs = MockFileSystem::new();
    assert!(!fs.exists(Path::new("/nope")));
    assert!(fs.read(Path::new("/nope")).is_err());
    assert!(fs.read_dir(Path::new("/nope")).is_err());
}
