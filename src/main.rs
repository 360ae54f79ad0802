//! playshelf - playlist audio archiver
//!
//! Downloads a playlist's audio and thumbnails with yt-dlp, then files the
//! tracks into an index-numbered archive with a name manifest.

use anyhow::{Context, Result};
use clap::Parser;
use path_absolutize::Absolutize;
use playshelf::fetcher::{PlaylistRequest, YtDlpFetcher};
use playshelf::organizer::{BatchPlan, LibraryLayout, LibraryOrganizer};
use playshelf::pipeline::{Pipeline, PipelineReport, StageProgress};
use playshelf::utils::AppSettings;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(name = "playshelf", version, about = "Download a playlist and file it into an indexed audio archive")]
struct Args {
    /// Playlist ID or URL (prompted when omitted)
    #[arg(long)]
    playlist: Option<String>,

    /// Playlist label written to the manifest (prompted when omitted)
    #[arg(long)]
    label: Option<String>,

    /// Library root (defaults to the current directory)
    #[arg(long, short = 'C')]
    dir: Option<PathBuf>,

    /// Settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Organize files already in the library root without fetching
    #[arg(long)]
    skip_fetch: bool,

    /// Print the batch plan and exit without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .init();

    let settings = AppSettings::load(args.config.as_deref())?;
    settings.validate()?;

    let root = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let root = root
        .absolutize()
        .context("Failed to resolve library root")?
        .into_owned();

    let organizer = LibraryOrganizer::new(LibraryLayout::new(root, settings.library.clone()));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run(args, settings, organizer))
}

async fn run(args: Args, settings: AppSettings, organizer: LibraryOrganizer) -> Result<()> {
    let fetch = !args.skip_fetch && !args.dry_run;

    let request = if fetch {
        let input = match args.playlist {
            Some(p) => p,
            None => prompt("Enter the playlist ID: ")?,
        };
        Some(PlaylistRequest::from_input(
            &input,
            &settings.fetcher.playlist_url_prefix,
        )?)
    } else {
        None
    };
    let label = match args.label {
        Some(l) => l,
        None => prompt("Enter the playlist name: ")?,
    };

    if args.dry_run {
        let plan = organizer.plan(&label).await?;
        print_plan(&plan);
        return Ok(());
    }

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<StageProgress>(16);
    let reporter = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            println!("{} ({} files)", progress.stage.completion_message(), progress.files);
        }
    });

    let outcome = match request {
        Some(request) => {
            let fetcher = Arc::new(YtDlpFetcher::new(settings.fetcher.clone())?);
            Pipeline::new(organizer)
                .with_fetcher(fetcher)
                .run(&request, &label, Some(progress_tx))
                .await
        }
        None => {
            Pipeline::new(organizer)
                .organize(&label, Some(progress_tx))
                .await
        }
    };

    // The sender is gone once the pipeline returns; wait for the last lines
    let _ = reporter.await;

    print_summary(&outcome?);
    Ok(())
}

fn prompt(question: &str) -> Result<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_plan(plan: &BatchPlan) {
    if plan.is_empty() {
        println!("Nothing to organize (next index {})", plan.start_index);
        return;
    }
    for track in &plan.tracks {
        let cover = track.cover.as_deref().unwrap_or("no cover");
        println!(
            "{:>5}  {}  [{}]  ({})",
            track.index,
            track.original_name,
            track.segments.join(" / "),
            cover
        );
    }
}

fn print_summary(report: &PipelineReport) {
    let tracks = report.plan.as_ref().map_or(0, BatchPlan::len);
    println!(
        "Archived {} tracks, {} covers, {} album images",
        tracks,
        report.archived_covers.len(),
        report.albums.len()
    );
    if let Some(paths) = &report.manifests {
        println!("Manifest: {}", paths.names.display());
        println!("Playlist: {}", paths.playlist.display());
    }
}
