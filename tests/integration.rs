//! End-to-end pipeline runs against temporary libraries, with a fake fetcher
//! standing in for yt-dlp.

use anyhow::Result;
use async_trait::async_trait;
use playshelf::fetcher::{FetchSummary, MediaFetcher, PlaylistRequest};
use playshelf::organizer::{LibraryLayout, LibraryOrganizer};
use playshelf::pipeline::{Pipeline, Stage, StageProgress};
use playshelf::utils::{LibrarySettings, ParsePolicy, PlayshelfError};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Writes a fixed set of files, like yt-dlp would
struct FakeFetcher {
    files: Vec<&'static str>,
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn fetch_playlist(
        &self,
        _request: &PlaylistRequest,
        work_dir: &Path,
    ) -> Result<FetchSummary> {
        let mut summary = FetchSummary::default();
        for name in &self.files {
            tokio::fs::write(work_dir.join(name), name.as_bytes()).await?;
            if name.ends_with(".mp3") {
                summary.produced.push(name.to_string());
            }
        }
        Ok(summary)
    }
}

fn pipeline_in(root: &Path, settings: LibrarySettings, files: Vec<&'static str>) -> Pipeline {
    let organizer = LibraryOrganizer::new(LibraryLayout::new(root, settings));
    Pipeline::new(organizer).with_fetcher(Arc::new(FakeFetcher { files }))
}

fn request() -> PlaylistRequest {
    PlaylistRequest::from_input("PLtest", "https://www.youtube.com/playlist?list=").unwrap()
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).expect("read file")
}

#[tokio::test]
async fn end_to_end_continues_archive_numbering() {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path();
    std::fs::create_dir(root.join("audio")).unwrap();
    std::fs::write(root.join("audio/0.mp3"), b"old0").unwrap();
    std::fs::write(root.join("audio/3.mp3"), b"old3").unwrap();

    let pipeline = pipeline_in(
        root,
        LibrarySettings::default(),
        vec!["A-B.mp3", "C-D.mp3", "A-B.webp"],
    );
    let report = pipeline
        .run(&request(), "Road Trip", None)
        .await
        .expect("pipeline run");

    let plan = report.plan.expect("plan");
    assert_eq!(plan.start_index, 4);
    assert_eq!(plan.indexes(), vec![4, 5]);

    assert_eq!(
        read(root.join("artist_title_names.txt")),
        "4\nB\nA\nRoad Trip\n\n5\nD\nC\nRoad Trip\n\n"
    );
    assert_eq!(read(root.join("playlist.txt")), "4\n5\n");

    assert_eq!(read(root.join("audio/4.mp3")), "A-B.mp3");
    assert_eq!(read(root.join("audio/5.mp3")), "C-D.mp3");
    assert_eq!(read(root.join("audio/0.mp3")), "old0");
    assert_eq!(read(root.join("covers/4.jpg")), "A-B.webp");
    assert!(!root.join("covers/5.jpg").exists());
    assert!(!root.join("A-B.mp3").exists());
    assert_eq!(report.fetch.expect("fetch").produced.len(), 2);
}

#[tokio::test]
async fn unmatched_thumbnail_goes_to_albums() {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path();

    let pipeline = pipeline_in(
        root,
        LibrarySettings::default(),
        vec!["Song-Artist.mp3", "Song-Artist.webp", "Playlist Cover.webp"],
    );
    let report = pipeline.run(&request(), "Mix", None).await.expect("run");

    assert_eq!(report.albums, vec!["Playlist Cover.jpg"]);
    assert!(root.join("albums/Playlist Cover.jpg").exists());
    assert!(root.join("covers/0.jpg").exists());
    assert!(root.join("audio/0.mp3").exists());
    assert_eq!(std::fs::read_dir(root.join("covers")).unwrap().count(), 1);
}

#[tokio::test]
async fn second_run_appends_after_first_batch() {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path();

    pipeline_in(root, LibrarySettings::default(), vec!["One-X.mp3", "Two-Y.mp3"])
        .run(&request(), "First", None)
        .await
        .expect("first run");
    pipeline_in(root, LibrarySettings::default(), vec!["Three-Z.mp3"])
        .run(&request(), "Second", None)
        .await
        .expect("second run");

    assert_eq!(read(root.join("audio/2.mp3")), "Three-Z.mp3");
    assert_eq!(read(root.join("playlist.txt")), "2\n");
    assert_eq!(read(root.join("artist_title_names.txt")), "2\nZ\nThree\nSecond\n\n");
}

#[tokio::test]
async fn organize_without_new_tracks_keeps_manifests() {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path();

    let pipeline = pipeline_in(root, LibrarySettings::default(), vec!["A-B.mp3"]);
    pipeline.run(&request(), "Mix", None).await.expect("run");
    let manifest = read(root.join("artist_title_names.txt"));

    let report = pipeline.organize("Other", None).await.expect("organize");
    assert!(report.plan.expect("plan").is_empty());
    assert!(report.manifests.is_none());
    assert_eq!(read(root.join("artist_title_names.txt")), manifest);
}

#[tokio::test]
async fn leftover_indexed_track_keeps_its_index() {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path();
    std::fs::create_dir(root.join("audio")).unwrap();
    std::fs::write(root.join("0.mp3"), b"interrupted").unwrap();
    std::fs::write(root.join("A-B.mp3"), b"new").unwrap();

    let pipeline = pipeline_in(root, LibrarySettings::default(), vec![]);
    let report = pipeline.organize("Mix", None).await.expect("organize");

    assert_eq!(report.plan.expect("plan").indexes(), vec![1]);
    assert_eq!(read(root.join("artist_title_names.txt")), "1\nB\nA\nMix\n\n");
    assert_eq!(read(root.join("audio/0.mp3")), "interrupted");
    assert_eq!(read(root.join("audio/1.mp3")), "new");
}

#[tokio::test]
async fn thumbnail_next_to_existing_cover_is_left_alone() {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path();
    for name in ["Song-Artist.mp3", "Song-Artist.webp", "Song-Artist.jpg"] {
        std::fs::write(root.join(name), name).unwrap();
    }
    let pipeline = pipeline_in(root, LibrarySettings::default(), vec![]);

    let dry = pipeline.organizer().plan("Mix").await.expect("plan");
    let report = pipeline.organize("Mix", None).await.expect("organize");

    assert_eq!(report.plan.expect("plan"), dry);
    assert!(report.albums.is_empty());
    assert_eq!(read(root.join("covers/0.jpg")), "Song-Artist.jpg");
    assert_eq!(read(root.join("Song-Artist.webp")), "Song-Artist.webp");
}

#[tokio::test]
async fn progress_is_reported_for_every_stage() {
    let temp = TempDir::new().expect("temp dir");
    let (tx, mut rx) = tokio::sync::mpsc::channel::<StageProgress>(16);

    pipeline_in(temp.path(), LibrarySettings::default(), vec!["A-B.mp3", "A-B.webp"])
        .run(&request(), "Mix", Some(tx))
        .await
        .expect("run");

    let mut stages = Vec::new();
    while let Some(progress) = rx.recv().await {
        stages.push(progress.stage);
    }
    assert_eq!(stages, Stage::ALL.to_vec());
}

#[tokio::test]
async fn strict_policy_stops_before_renaming() {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path();
    let mut settings = LibrarySettings::default();
    settings.parse_policy = ParsePolicy::Strict;

    let err = pipeline_in(root, settings, vec!["Good-Name.mp3", "NoDelimiter.mp3"])
        .run(&request(), "Mix", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PlayshelfError>(),
        Some(PlayshelfError::MalformedTrackName(name)) if name == "NoDelimiter"
    ));
    assert!(root.join("Good-Name.mp3").exists());
    assert!(!root.join("artist_title_names.txt").exists());
}

#[tokio::test]
async fn run_without_fetcher_fails() {
    let temp = TempDir::new().expect("temp dir");
    let organizer =
        LibraryOrganizer::new(LibraryLayout::new(temp.path(), LibrarySettings::default()));
    assert!(Pipeline::new(organizer)
        .run(&request(), "Mix", None)
        .await
        .is_err());
}
