use crate::config::ConvertConfig;
use crate::document::{output_path, serialize, write_document};
use crate::error::{ConvertError, Result};
use crate::graph::assemble;
use crate::svg::{parse_markers, resolve_systems};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use pfconv_esi::UniverseLookup;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Callback for reporting conversion progress
pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Options for one SVG -> map conversion
pub struct ConvertOptions {
    pub svg_path: PathBuf,
    pub region_name: String,
    pub output_dir: PathBuf,
    pub config: ConvertConfig,
    pub show_progress_bars: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub markers_found: usize,
    pub systems_resolved: usize,
    pub systems_written: usize,
    pub connections_written: usize,
    pub edges_skipped: usize,
    pub output_path: PathBuf,
}

impl ConversionSummary {
    pub fn systems_skipped(&self) -> usize {
        self.markers_found - self.systems_resolved
    }
}

/// Runs the whole conversion: read SVG, resolve systems and gates, write the
/// map document. Every lookup is awaited in turn.
pub async fn convert<L: UniverseLookup>(
    lookup: &L,
    options: ConvertOptions,
) -> Result<ConversionSummary> {
    let ConvertOptions {
        svg_path,
        region_name,
        output_dir,
        config,
        show_progress_bars,
    } = options;

    if !svg_path.is_file() {
        return Err(ConvertError::InputNotFound(svg_path));
    }

    // One timestamp for every created/updated field in this run
    let now = Utc::now().timestamp();

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Reading SVG...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let progress_callback: Option<ProgressCallback> = progress_bar.clone().map(|pb| {
        Arc::new(move |message: String| pb.set_message(message)) as ProgressCallback
    });

    let result = run(
        lookup,
        &svg_path,
        &region_name,
        &output_dir,
        &config,
        now,
        progress_callback.as_ref(),
    )
    .await;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    result
}

async fn run<L: UniverseLookup>(
    lookup: &L,
    svg_path: &Path,
    region_name: &str,
    output_dir: &Path,
    config: &ConvertConfig,
    now: i64,
    progress: Option<&ProgressCallback>,
) -> Result<ConversionSummary> {
    info!("Converting {} into region '{}'", svg_path.display(), region_name);

    let svg = String::from_utf8(fs::read(svg_path)?).map_err(|e| {
        ConvertError::MalformedInput(format!("{} is not UTF-8 text: {}", svg_path.display(), e))
    })?;
    let markers = parse_markers(&svg, config)?;
    let systems = resolve_systems(lookup, &markers, config, now, progress).await?;
    let systems_resolved = systems.len();

    let graph = assemble(lookup, systems, config, now, progress).await?;

    if let Some(callback) = progress {
        callback("Writing map document...".to_string());
    }
    let bytes = serialize(region_name, &graph, now)?;
    let path = output_path(output_dir, region_name);
    write_document(&path, &bytes, config.output_mode)?;

    Ok(ConversionSummary {
        markers_found: markers.len(),
        systems_resolved,
        systems_written: graph.systems.len(),
        connections_written: graph.connections.len(),
        edges_skipped: graph.skipped_edges,
        output_path: path,
    })
}
