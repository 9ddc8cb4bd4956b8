//! Records the git commit and enabled features for `backend_version`.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

const SHORT_SHA_LEN: usize = 8;

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let git_dir = find_git_dir(&manifest_dir);

    if let Some(git_dir) = &git_dir {
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("refs").display());
        println!(
            "cargo:rerun-if-changed={}",
            git_dir.join("packed-refs").display()
        );
    }

    let sha = git_dir
        .as_deref()
        .and_then(sha_from_files)
        .or_else(|| sha_from_command(&manifest_dir))
        .map_or_else(
            || "unknown".to_owned(),
            |sha| sha.chars().take(SHORT_SHA_LEN).collect(),
        );
    println!("cargo:rustc-env=DMS_GIT_SHA={sha}");

    let mut features: Vec<String> = std::env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_")
                .map(|n| n.to_lowercase().replace('_', "-"))
        })
        .collect();
    features.sort();
    let features = if features.is_empty() {
        "none".to_owned()
    } else {
        features.join(",")
    };
    println!("cargo:rustc-env=DMS_CRATE_FEATURES={features}");
}

fn find_git_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".git"))
        .find(|dir| dir.join("HEAD").is_file())
}

fn sha_from_files(git_dir: &Path) -> Option<String> {
    let head = std::fs::read_to_string(git_dir.join("HEAD")).ok()?;
    let head = head.trim();
    let Some(head_ref) = head.strip_prefix("ref: ") else {
        // Detached HEAD
        return valid_sha(head);
    };

    if let Ok(sha) = std::fs::read_to_string(git_dir.join(head_ref)) {
        return valid_sha(sha.trim());
    }

    // Ref may only exist in packed-refs, as `<sha> <ref>` lines
    let packed = std::fs::read_to_string(git_dir.join("packed-refs")).ok()?;
    packed
        .lines()
        .filter_map(|line| line.split_once(' '))
        .find(|(_, name)| *name == head_ref)
        .and_then(|(sha, _)| valid_sha(sha))
}

fn sha_from_command(dir: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    valid_sha(String::from_utf8(output.stdout).ok()?.trim())
}

fn valid_sha(sha: &str) -> Option<String> {
    (sha.len() >= SHORT_SHA_LEN && sha.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| sha.to_owned())
}
