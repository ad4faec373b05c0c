//! Main entry point for the uvd CLI

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uvd::cli::{Args, OutputFormatter, StdinPrompter};
use uvd::{MediaMode, Orchestrator, Selection, Session, SessionState, YtDlp};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args)?;
    info!("Starting uvd with args: {:?}", args);

    // Initialize output formatter
    let formatter = Arc::new(OutputFormatter::new(args.verbosity_level()));

    // Configure the extractor
    let mut extractor = YtDlp::new().with_binary(&args.yt_dlp);
    if let Some(location) = &args.ffmpeg_location {
        extractor = extractor.with_ffmpeg_location(location);
    }

    // Configure the orchestrator and its progress callback
    let mut orchestrator = Orchestrator::new(Arc::new(extractor)).with_work_dir(&args.work_dir);
    if !args.no_progress {
        let formatter_clone = formatter.clone();
        orchestrator = orchestrator.with_progress(move |progress| {
            formatter_clone.update_progress(&progress);
        });
    }
    let session = Session::new(orchestrator);

    // A URL on the command line runs one cycle; otherwise keep prompting
    if let Some(url) = &args.url {
        let ok = run_cycle(&session, &args, &formatter, url, None).await?;
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let mut prompter = StdinPrompter::stdin();
    while let Some(url) = prompter.url().await? {
        if let Err(e) = run_cycle(&session, &args, &formatter, &url, Some(&mut prompter)).await {
            formatter.error(&format!("{:#}", e));
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Run one pass of the flow for `url`; returns whether it ended successfully
///
/// With a prompter the download options are asked for after the metadata is
/// shown, using the flags as defaults.
async fn run_cycle(
    session: &Session,
    args: &Args,
    formatter: &OutputFormatter,
    url: &str,
    prompter: Option<&mut StdinPrompter>,
) -> anyhow::Result<bool> {
    let start_time = Instant::now();

    let state = SessionState::Idle.submit_url(url)?;
    if matches!(state, SessionState::Idle) {
        formatter.info("Enter a video URL to begin.");
        return Ok(false);
    }

    formatter.info("Fetching video details...");
    let state = session.fetch(state).await?;
    match &state {
        SessionState::MetadataShown { metadata, .. } => {
            formatter.print_video_info(metadata);
            if args.list_formats {
                for format in &metadata.formats {
                    formatter.print_format_info(format);
                }
            }
        }
        SessionState::Error(err) => {
            formatter.error(&err.user_message());
            return Ok(false);
        }
        other => anyhow::bail!("unexpected state after fetch: {}", other.name()),
    }

    if args.info {
        return Ok(true);
    }

    let Some((mode, resolution, bitrate)) = download_options(args, prompter).await? else {
        return Ok(false);
    };
    let state = state.choose(mode, Some(resolution.as_str()), Some(bitrate.as_str()))?;
    match &state {
        SessionState::Downloading { request, .. } => {
            let label = match request.selection {
                Selection::Video(resolution) => format!("Video {}", resolution),
                Selection::Audio(bitrate) => format!("Audio {}", bitrate),
            };
            formatter.print_download_start(&label);
        }
        SessionState::Error(err) => {
            formatter.error(&err.user_message());
            formatter.debug(&err.detail());
            return Ok(false);
        }
        other => anyhow::bail!("unexpected state after choosing options: {}", other.name()),
    }

    if !args.no_progress {
        formatter.start_progress();
    }
    let state = session.download(state).await;
    formatter.finish_progress();

    match state? {
        SessionState::ResultReady(artifact) => {
            let saved_to = artifact
                .save_to(&args.output)
                .await
                .with_context(|| format!("saving {} to {}", artifact.file_name, args.output.display()))?;
            debug!(path = %saved_to.display(), "Artifact saved");
            formatter.print_saved(&artifact, &saved_to, start_time.elapsed());
            Ok(true)
        }
        SessionState::Error(err) => {
            formatter.error(&err.user_message());
            formatter.debug(&err.detail());
            Ok(false)
        }
        other => anyhow::bail!("unexpected state after download: {}", other.name()),
    }
}

/// Mode, resolution and bitrate from the flags, or from prompts when interactive
///
/// `None` when input ended while prompting.
async fn download_options(
    args: &Args,
    prompter: Option<&mut StdinPrompter>,
) -> anyhow::Result<Option<(MediaMode, String, String)>> {
    let Some(prompter) = prompter else {
        return Ok(Some((args.media_mode(), args.resolution.clone(), args.bitrate.clone())));
    };

    let Some(mode) = prompter.mode(args.media_mode()).await? else {
        return Ok(None);
    };
    let options = match mode {
        MediaMode::Video => prompter
            .resolution(&args.resolution)
            .await?
            .map(|resolution| (mode, resolution, args.bitrate.clone())),
        MediaMode::Audio => prompter
            .bitrate(&args.bitrate)
            .await?
            .map(|bitrate| (mode, args.resolution.clone(), bitrate)),
    };
    Ok(options)
}

/// Initialize logging system
fn init_logging(args: &Args) -> anyhow::Result<()> {
    // RUST_LOG wins over the verbosity flags
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .context("initializing logging")?;

    Ok(())
}
