use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use pfconv_core::{
    ConversionSummary, ConvertConfig, ConvertError, ConvertOptions, LookupPolicy, OutputMode,
    convert,
};
use pfconv_esi::EsiClient;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use url::Url;

pub const DEFAULT_SVG_DIR: &str = "SVG";

// Helper functions for the convert handler

/// Path of the SVG for a base name; a trailing `.svg` is accepted too
pub fn svg_path_for(svg_dir: &Path, name: &str) -> PathBuf {
    let name = name.trim();
    if name.to_lowercase().ends_with(".svg") {
        svg_dir.join(name)
    } else {
        svg_dir.join(format!("{}.svg", name))
    }
}

/// Region names become file names, so they must be a single path component
pub fn validate_region_name(name: &str) -> Result<String, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Region name must not be empty".to_string());
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(format!("Region name '{}' is not a valid file name", name));
    }
    Ok(name.to_string())
}

/// Expand `~` in a user-supplied directory
pub fn expand_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Create the SVG input directory. Returns false if it already existed
pub fn ensure_svg_dir(path: &Path) -> io::Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    Ok(true)
}

pub fn format_summary(summary: &ConversionSummary) -> String {
    let mut report = String::new();
    report.push_str(&format!("  Markers found: {}\n", summary.markers_found));
    report.push_str(&format!("  Systems resolved: {}\n", summary.systems_resolved));
    if summary.systems_skipped() > 0 {
        report.push_str(&format!("  Systems skipped: {}\n", summary.systems_skipped()));
    }
    report.push_str(&format!("  Systems written: {}\n", summary.systems_written));
    report.push_str(&format!("  Connections written: {}\n", summary.connections_written));
    if summary.edges_skipped > 0 {
        report.push_str(&format!("  Stargates skipped: {}\n", summary.edges_skipped));
    }
    report.push_str(&format!("  Output: {}\n", summary.output_path.display()));
    report
}

pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

pub fn print_banner() {
    println!(
        "{}",
        r#"
         ___ ___ ___ ___  _ ___   __
        | _ \ __/ __/ _ \| \| \ \ / /
        |  _/ _| (_| (_) | .` |\ V /
        |_| |_| \___\___/|_|\_| \_/
    "#
        .bright_cyan()
    );
    println!(
        "    {} {}\n",
        "dotlan -> Pathfinder".bright_white().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .context("Failed to read from stdin")?;
    Ok(response.trim().to_string())
}

fn value_or_prompt(args: &ArgMatches, id: &str, prompt: &str) -> Result<String> {
    match args.get_one::<String>(id) {
        Some(value) => Ok(value.clone()),
        None => print_prompt(prompt),
    }
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    let raw_dir = args
        .get_one::<String>("DIR")
        .map(String::as_str)
        .unwrap_or(DEFAULT_SVG_DIR);
    let svg_dir = expand_dir(raw_dir);

    let created = ensure_svg_dir(&svg_dir)
        .with_context(|| format!("Failed to create {}", svg_dir.display()))?;

    if created {
        println!(
            "{} Created SVG directory: {}",
            "✓".green().bold(),
            svg_dir.display().to_string().bright_white()
        );
    } else {
        println!(
            "{} SVG directory already exists: {}",
            "ℹ".blue(),
            svg_dir.display().to_string().bright_white()
        );
    }
    println!(
        "{} Drop dotlan region SVGs in there, then run {}",
        "→".blue(),
        "pfconv convert".bright_white()
    );
    Ok(())
}

pub async fn handle_convert(args: &ArgMatches, quiet: bool) -> Result<()> {
    let svg_dir = expand_dir(
        args.get_one::<String>("svg-dir")
            .map(String::as_str)
            .unwrap_or(DEFAULT_SVG_DIR),
    );
    let output_dir = expand_dir(
        args.get_one::<String>("output-dir")
            .map(String::as_str)
            .unwrap_or("."),
    );

    if !svg_dir.is_dir() && ensure_svg_dir(&svg_dir)? {
        println!(
            "{} Created missing SVG directory {}",
            "→".yellow().bold(),
            svg_dir.display()
        );
    }

    let svg_name = value_or_prompt(
        args,
        "svg",
        "Please enter the name of the SVG file (without the .svg extension):",
    )?;
    if svg_name.trim().is_empty() {
        bail!("No SVG file name given");
    }

    let svg_path = svg_path_for(&svg_dir, &svg_name);
    if !svg_path.is_file() {
        return Err(ConvertError::InputNotFound(svg_path).into());
    }

    let region_name = value_or_prompt(args, "region", "Please enter the name of the region:")?;
    let region_name = validate_region_name(&region_name).map_err(|e| anyhow!(e))?;

    let lookup_policy = args
        .get_one::<LookupPolicy>("on-lookup-failure")
        .copied()
        .unwrap_or_default();
    let output_mode = if args.get_flag("append") {
        OutputMode::Append
    } else {
        OutputMode::Overwrite
    };
    let config = ConvertConfig::default()
        .with_lookup_policy(lookup_policy)
        .with_output_mode(output_mode);

    let mut client = match args.get_one::<Url>("esi-url") {
        Some(url) => EsiClient::with_base_url(url.as_str())?,
        None => EsiClient::new()?,
    };
    if let Some(datasource) = args.get_one::<String>("datasource") {
        client = client.with_datasource(datasource);
    }

    if !quiet {
        print_divider();
        println!(
            "{} {} {} {}",
            "Converting".bright_white().bold(),
            svg_path.display().to_string().bright_white(),
            "→".blue(),
            region_name.bright_white().bold()
        );
        println!("{} {}", "ESI:".blue(), client.base_url());
        println!("{} {}", "On lookup failure:".blue(), lookup_policy);
        if output_mode == OutputMode::Append {
            println!(
                "{}",
                "⚠ Append mode: re-runs concatenate documents into one file".yellow()
            );
        }
        print_divider();
    }

    let summary = convert(
        &client,
        ConvertOptions {
            svg_path,
            region_name,
            output_dir,
            config,
            show_progress_bars: !quiet,
        },
    )
    .await?;

    if !quiet {
        println!("\n{} Conversion complete!\n", "✓".green().bold());
        print!("{}", format_summary(&summary));
    }
    Ok(())
}
