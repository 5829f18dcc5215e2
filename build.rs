//! Build script: validates the bundled sample community snapshot at compile time.

use std::path::PathBuf;

fn main() {
    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR set by Cargo");
    let snapshot_path: PathBuf = [&manifest_dir, "data", "sample-community.json"]
        .iter()
        .collect();
    println!("cargo:rerun-if-changed={}", snapshot_path.display());

    let json = std::fs::read_to_string(&snapshot_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read {}: {}. sample-community.json must exist and be valid.",
            snapshot_path.display(),
            e
        )
    });

    #[derive(serde::Deserialize)]
    #[allow(dead_code)]
    #[serde(rename_all = "camelCase")]
    struct SamplePost {
        id: String,
        author_id: String,
        author: String,
        created_at: String,
    }
    #[derive(serde::Deserialize)]
    #[allow(dead_code)]
    struct SampleMember {
        id: String,
        name: String,
    }
    #[derive(serde::Deserialize)]
    #[allow(dead_code)]
    struct SampleSnapshot {
        posts: Vec<SamplePost>,
        members: Vec<SampleMember>,
    }

    let sample: SampleSnapshot = serde_json::from_str(&json).unwrap_or_else(|e| {
        panic!(
            "sample-community.json is invalid: {}. Fix the file and rebuild.",
            e
        )
    });
    for post in &sample.posts {
        if !sample.members.iter().any(|m| m.id == post.author_id) {
            panic!(
                "sample-community.json: post {} has unknown author {}",
                post.id, post.author_id
            );
        }
    }
}
