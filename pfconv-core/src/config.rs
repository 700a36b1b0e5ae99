// Conversion settings and the compatibility constants behind them

use std::fmt;
use std::str::FromStr;

/// Hard cap on systems written into one map import.
pub const MAX_SYSTEMS: usize = 100;
/// Horizontal scale from dotlan SVG units to Pathfinder canvas units.
pub const X_SCALE: f64 = 1.2;
/// Vertical scale from dotlan SVG units to Pathfinder canvas units.
pub const Y_SCALE: f64 = 1.2;
/// Marker ids look like `sys30000142`.
pub const MARKER_PREFIX_LEN: usize = 3;
/// Id of the `<g>` element holding one `<use>` marker per system.
pub const SYSTEM_LAYER_ID: &str = "sysuse";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// What to do when ESI has no usable answer for a system or stargate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPolicy {
    /// Log and leave the system or connection out
    #[default]
    Skip,
    /// Fail the whole conversion
    Abort,
    /// Re-attempt up to n more times right away, then skip
    Retry(u32),
}

impl LookupPolicy {
    /// Total number of requests made for one lookup.
    pub fn attempts(&self) -> u32 {
        match self {
            LookupPolicy::Retry(n) => n.saturating_add(1),
            _ => 1,
        }
    }
}

impl FromStr for LookupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(LookupPolicy::Skip),
            "abort" => Ok(LookupPolicy::Abort),
            other => other
                .strip_prefix("retry-")
                .and_then(|n| n.parse::<u32>().ok())
                .map(LookupPolicy::Retry)
                .ok_or_else(|| {
                    format!(
                        "Unknown lookup policy '{}' (expected skip, abort or retry-<n>)",
                        s
                    )
                }),
        }
    }
}

impl fmt::Display for LookupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupPolicy::Skip => write!(f, "skip"),
            LookupPolicy::Abort => write!(f, "abort"),
            LookupPolicy::Retry(n) => write!(f, "retry-{}", n),
        }
    }
}

/// How the output file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Overwrite,
    /// Legacy behavior: concatenate onto whatever is already there
    Append,
}

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub max_systems: usize,
    pub x_scale: f64,
    pub y_scale: f64,
    pub marker_prefix_len: usize,
    pub system_layer_id: String,
    pub lookup_policy: LookupPolicy,
    pub output_mode: OutputMode,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_systems: MAX_SYSTEMS,
            x_scale: X_SCALE,
            y_scale: Y_SCALE,
            marker_prefix_len: MARKER_PREFIX_LEN,
            system_layer_id: SYSTEM_LAYER_ID.to_string(),
            lookup_policy: LookupPolicy::default(),
            output_mode: OutputMode::default(),
        }
    }
}

impl ConvertConfig {
    pub fn with_lookup_policy(mut self, policy: LookupPolicy) -> Self {
        self.lookup_policy = policy;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }
}
