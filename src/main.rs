// src/main.rs

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tabletop_ar::session::{ArSession, Capabilities};
use tabletop_ar::types::{Config, Frame};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());
    let config = Config::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("tabletop_ar={}", config.logging.level))
        .init();

    info!("🍽️ Tabletop AR tracking starting");
    info!("✓ Configuration loaded from {}", config_path);
    info!(
        "Stability: window={} frames, threshold={:.2}, tick={}ms",
        config.stabilizer.stability_frames,
        config.stabilizer.confidence_threshold,
        config.session.tick_interval_ms
    );

    let capture_files = find_capture_files(&config.capture.input_dir)?;
    if capture_files.is_empty() {
        error!("No capture frames found in {}", config.capture.input_dir);
        return Ok(());
    }
    info!("Found {} capture frame(s) to process", capture_files.len());

    let stats = process_capture(&capture_files, &config)?;

    info!("\n📊 Final Report:");
    info!("  Total frames: {}", stats.total_frames);
    info!(
        "  Stable frames: {} ({:.1}%)",
        stats.stable_frames,
        100.0 * stats.stable_frames as f64 / stats.total_frames.max(1) as f64
    );
    info!("  Peak confidence: {:.2}", stats.peak_confidence);
    match stats.placed_at_frame {
        Some(frame) => info!("  ✅ Dish placed at frame {}", frame),
        None => warn!("  ⚠️  No placement (surface never stabilized)"),
    }

    Ok(())
}

struct ProcessingStats {
    total_frames: u64,
    stable_frames: u64,
    peak_confidence: f32,
    placed_at_frame: Option<u64>,
}

/// Still images in the capture directory stand in for the live camera feed,
/// replayed in filename order at the configured tick interval.
fn find_capture_files(input_dir: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .with_context(|| format!("reading capture dir {}", input_dir))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("png") | Some("jpg") | Some("jpeg")
            )
        })
        .collect();
    files.sort();
    Ok(files)
}

fn load_frame(path: &Path, timestamp_ms: f64) -> Result<Frame> {
    let img = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgb8();
    Ok(Frame {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
        timestamp_ms,
    })
}

fn process_capture(files: &[PathBuf], config: &Config) -> Result<ProcessingStats> {
    std::fs::create_dir_all(&config.capture.output_dir)?;
    let jsonl_path = Path::new(&config.capture.output_dir).join("tracking.jsonl");
    let mut results_file = std::fs::File::create(&jsonl_path)?;
    info!("💾 Tracking events will be written to {}", jsonl_path.display());

    // Replayed captures have a camera but no live sensors.
    let capabilities = Capabilities {
        camera: true,
        orientation: false,
        motion: false,
    };
    let mut session = ArSession::new(config, capabilities);

    let mut stats = ProcessingStats {
        total_frames: 0,
        stable_frames: 0,
        peak_confidence: 0.0,
        placed_at_frame: None,
    };
    let mut was_stable = false;

    for (idx, path) in files.iter().enumerate() {
        let timestamp_ms = idx as f64 * config.session.tick_interval_ms as f64;
        let frame = match load_frame(path, timestamp_ms) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Frame {} failed: {}", idx, e);
                continue;
            }
        };

        stats.total_frames += 1;
        let out = session.tick(Some(&frame), None, None);

        if out.detection.confidence > stats.peak_confidence {
            stats.peak_confidence = out.detection.confidence;
        }
        if out.detection.is_stable {
            stats.stable_frames += 1;
        }

        if out.detection.is_stable && !was_stable {
            info!(
                "🎯 Surface stabilized at frame {} ({:.2}s): conf={:.2}, {:.2}m x {:.2}m",
                idx,
                timestamp_ms / 1000.0,
                out.detection.confidence,
                out.detection.dimensions.width,
                out.detection.dimensions.height
            );
            write_event(
                &mut results_file,
                serde_json::json!({
                    "type": "surface_stable",
                    "frame": idx,
                    "timestamp_ms": timestamp_ms,
                    "detection": out.detection,
                }),
            )?;
        }
        was_stable = out.detection.is_stable;

        if out.placed_this_tick {
            stats.placed_at_frame = Some(idx as u64);
            write_event(
                &mut results_file,
                serde_json::json!({
                    "type": "placement",
                    "frame": idx,
                    "timestamp_ms": timestamp_ms,
                    "placement": session.placement(),
                }),
            )?;
        }

        if (idx + 1) % 25 == 0 {
            info!(
                "Progress: {}/{} | Phase: {} | conf={:.2}",
                idx + 1,
                files.len(),
                out.phase.as_str(),
                out.detection.confidence
            );
        }
    }

    // Manual placement path: if auto-place is off but the capture ended on a
    // stable surface, place once at the end so the run reports a transform.
    if stats.placed_at_frame.is_none() && session.last_detection().is_stable {
        match session.place() {
            Ok(placement) => {
                stats.placed_at_frame = Some(stats.total_frames.saturating_sub(1));
                write_event(
                    &mut results_file,
                    serde_json::json!({
                        "type": "placement",
                        "frame": stats.total_frames - 1,
                        "placement": placement,
                    }),
                )?;
            }
            Err(e) => warn!("Placement failed: {}", e),
        }
    }

    session.reset();
    Ok(stats)
}

fn write_event(file: &mut std::fs::File, event: serde_json::Value) -> Result<()> {
    let json_line = serde_json::to_string(&event)?;
    writeln!(file, "{}", json_line)?;
    file.flush()?;
    Ok(())
}
