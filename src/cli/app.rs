//! Main app runner for one-shot report composition

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::fs;
use tokio::time::{interval, Duration as TokioDuration, Instant};

use crate::application::ports::{CaptureError, ConfigStore};
use crate::application::{ExportDispatcher, ReportSession};
use crate::domain::config::AppConfig;
use crate::domain::media::{MediaMimeType, MediaResource};
use crate::domain::report::EnvironmentInfo;
use crate::infrastructure::captioning::GeminiCaptionerFactory;
use crate::infrastructure::capture::CpalCaptureSource;
use crate::infrastructure::config::XdgConfigStore;
use crate::infrastructure::export::{DocxEncoder, PdfEncoder, TextEncoder};
use crate::infrastructure::preview::TempFilePreviewRegistry;

use super::args::ComposeOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run one compose-and-export pass
pub async fn run_compose(options: ComposeOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let mut session = build_session(&options);

    // Text section
    match resolve_text(&options).await {
        Ok(Some(text)) => session.set_text(text),
        Ok(None) => {}
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    // Audio: either a recorded take or an uploaded file
    if let Some(duration) = options.record {
        if let Err(e) = record_audio(&mut session, &mut presenter, duration.as_millis()).await {
            // Capture problems degrade the report, they don't abort it
            presenter.warn(&e);
        }
    } else if let Some(path) = &options.audio {
        match load_audio(path).await {
            Ok(resource) => {
                presenter.info(&format!(
                    "Attached audio: {} ({})",
                    resource.filename().unwrap_or("-"),
                    resource.human_readable_size()
                ));
                if let Err(e) = session.upload_audio(resource) {
                    presenter.error(&e.to_string());
                    return ExitCode::from(EXIT_ERROR);
                }
            }
            Err(e) => {
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    // Image
    if let Some(path) = &options.image {
        match load_image(path).await {
            Ok(resource) => {
                presenter.info(&format!(
                    "Attached image: {} ({})",
                    resource.filename().unwrap_or("-"),
                    resource.human_readable_size()
                ));
                if let Err(e) = session.upload_image(resource) {
                    presenter.error(&e.to_string());
                    return ExitCode::from(EXIT_ERROR);
                }
            }
            Err(e) => {
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    // Caption
    if options.caption {
        presenter.start_spinner("Captioning image...");
        match session.caption_image().await {
            Ok(text) => presenter.spinner_success(&format!("Caption: {}", text)),
            Err(e) => {
                // The report still composes with the caption placeholder
                presenter.spinner_fail(&e.to_string());
            }
        }
    }

    // Compose and print the report
    let body = session.build().body().to_string();
    presenter.output(&body);

    // Export
    let artifact = match session.export(options.format) {
        Ok(artifact) => artifact,
        Err(e) => {
            presenter.error(&e.to_string());
            session.reset().await;
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let target = options.output_dir.join(&artifact.filename);
    if let Err(e) = write_artifact(&options.output_dir, &target, &artifact.bytes).await {
        presenter.error(&e);
        session.reset().await;
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.success(&format!("Report written to {}", target.display()));

    session.reset().await;
    ExitCode::from(EXIT_SUCCESS)
}

/// Wire up the session with the production adapters
fn build_session(options: &ComposeOptions) -> ReportSession {
    let dispatcher = ExportDispatcher::new(
        Box::new(TextEncoder),
        Box::new(PdfEncoder),
        Box::new(DocxEncoder),
    );

    ReportSession::new(
        Arc::new(TempFilePreviewRegistry::new()),
        Arc::new(CpalCaptureSource::new()),
        Box::new(GeminiCaptionerFactory::new(
            options.api_key.clone().unwrap_or_default(),
            options.model.clone(),
        )),
        dispatcher,
        EnvironmentInfo::detect(),
    )
}

/// Resolve the text section from --text or --text-file
async fn resolve_text(options: &ComposeOptions) -> Result<Option<String>, String> {
    if let Some(text) = &options.text {
        return Ok(Some(text.clone()));
    }
    if let Some(path) = &options.text_file {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read text file {}: {}", path.display(), e))?;
        return Ok(Some(text));
    }
    Ok(None)
}

/// Record from the default input device for a fixed duration
async fn record_audio(
    session: &mut ReportSession,
    presenter: &mut Presenter,
    duration_ms: u64,
) -> Result<(), String> {
    if !session.capture_supported() {
        return Err(CaptureError::Unsupported.to_string());
    }

    presenter.start_spinner("Recording...");
    if let Err(e) = session.start_recording().await {
        presenter.stop_spinner();
        return Err(match e {
            crate::application::SessionError::Capture(CaptureError::PermissionDenied) => {
                "Capture access denied. Please grant microphone permission.".to_string()
            }
            other => other.to_string(),
        });
    }

    let start = Instant::now();
    let mut ticker = interval(TokioDuration::from_millis(100));
    loop {
        ticker.tick().await;
        let elapsed = start.elapsed().as_millis() as u64;
        if elapsed >= duration_ms {
            break;
        }
        presenter.update_recording_progress(elapsed, duration_ms);
    }

    match session.stop_recording().await {
        Ok(Some(resource)) => {
            presenter.spinner_success(&format!(
                "Recording complete ({})",
                resource.human_readable_size()
            ));
            Ok(())
        }
        Ok(None) => {
            presenter.stop_spinner();
            Ok(())
        }
        Err(e) => {
            presenter.stop_spinner();
            Err(e.to_string())
        }
    }
}

/// Read an audio file into a media resource
async fn load_audio(path: &Path) -> Result<MediaResource, String> {
    let data = fs::read(path)
        .await
        .map_err(|e| format!("Failed to read audio file {}: {}", path.display(), e))?;

    Ok(MediaResource::with_filename(
        data,
        MediaMimeType::audio_from_path(path),
        file_name(path),
    ))
}

/// Read an image file into a media resource
async fn load_image(path: &Path) -> Result<MediaResource, String> {
    let data = fs::read(path)
        .await
        .map_err(|e| format!("Failed to read image file {}: {}", path.display(), e))?;

    Ok(MediaResource::with_filename(
        data,
        MediaMimeType::image_from_path(path),
        file_name(path),
    ))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Write the exported artifact, creating the output directory if needed
async fn write_artifact(dir: &Path, target: &Path, bytes: &[u8]) -> Result<(), String> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("Failed to create output directory {}: {}", dir.display(), e))?;

    fs::write(target, bytes)
        .await
        .map_err(|e| format!("Failed to write {}: {}", target.display(), e))
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        api_key: env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
