//! glfwgen CLI
//!
//! Command-line interface for composing platform-specific GLFW3 headers.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glfwgen_core::{ContextPlatform, Release, Version, VersionCache, WindowPlatform};
use glfwgen_headers::{Composer, HeaderStorage};
use glfwgen_preprocessor::{MacroDefinition, MacroTable};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "glfwgen")]
#[command(author, version, about = "GLFW3 header assembly for FFI bindings", long_about = None)]
struct Cli {
    /// Template header storage directory
    #[arg(long, global = true, default_value = "headers")]
    headers_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a header for a platform/version selection
    Render {
        /// Window platform (win32, cocoa, x11, wayland)
        #[arg(short, long)]
        window: Option<WindowPlatform>,

        /// Context platform (wgl, nsgl, glx, egl, osmesa)
        #[arg(short, long)]
        context: Option<ContextPlatform>,

        /// GLFW version (known release or custom token)
        #[arg(short, long, default_value = "3.3.6")]
        version: String,

        /// Extra macro definitions, NAME or NAME=VALUE
        #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
        defines: Vec<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List known releases and installed template sets
    Versions {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Render every release/platform pairing and report failures
    Verify,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storage = HeaderStorage::new(&cli.headers_dir);

    match cli.command {
        Commands::Render {
            window,
            context,
            version,
            defines,
            output,
        } => render(storage, window, context, &version, &defines, output),
        Commands::Versions { format } => versions(storage, &format),
        Commands::Verify => verify(storage),
    }
}

fn render(
    storage: HeaderStorage,
    window: Option<WindowPlatform>,
    context: Option<ContextPlatform>,
    version: &str,
    defines: &[String],
    output: Option<PathBuf>,
) -> Result<()> {
    let mut cache = VersionCache::new();
    let version = cache.resolve(version);
    storage
        .ensure_bundled(&version)
        .context("provisioning template headers")?;

    let mut base = MacroTable::new();
    for define in defines {
        let def = match define.split_once('=') {
            Some((name, value)) => MacroDefinition::with_value(name, value),
            None => MacroDefinition::defined(define),
        };
        base.define(&def.name, def.value.as_deref())
            .with_context(|| format!("bad --define {define:?}"))?;
    }

    let composer = Composer::new(storage);
    let text = composer.create(window, context, &version, Some(&base))?;

    match output {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn versions(storage: HeaderStorage, format: &str) -> Result<()> {
    let known: Vec<&str> = Release::ALL.iter().map(|r| r.as_str()).collect();
    let installed: Vec<String> = storage
        .installed_versions()
        .iter()
        .map(|v| v.as_str().to_string())
        .collect();

    match format {
        "json" => {
            let value = serde_json::json!({
                "known": known,
                "latest": Release::LATEST.as_str(),
                "installed": installed,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        "text" => {
            println!("known releases:");
            for release in known {
                println!("  {release}");
            }
            println!("installed under {}:", storage.root().display());
            if installed.is_empty() {
                println!("  (none)");
            }
            for version in installed {
                println!("  {version}");
            }
        }
        other => bail!("unknown format: {other}"),
    }
    Ok(())
}

/// The platform pairings exercised against real binaries upstream
const VERIFY_PAIRINGS: [(WindowPlatform, ContextPlatform); 7] = [
    (WindowPlatform::Win32, ContextPlatform::Wgl),
    (WindowPlatform::X11, ContextPlatform::Glx),
    (WindowPlatform::X11, ContextPlatform::Egl),
    (WindowPlatform::Wayland, ContextPlatform::Glx),
    (WindowPlatform::Wayland, ContextPlatform::Egl),
    (WindowPlatform::Cocoa, ContextPlatform::Osmesa),
    (WindowPlatform::Cocoa, ContextPlatform::Nsgl),
];

fn verify(storage: HeaderStorage) -> Result<()> {
    for release in Release::ALL {
        storage.ensure_bundled(&Version::from(release))?;
    }

    let composer = Composer::new(storage);
    let mut jobs = Vec::new();
    for release in Release::ALL {
        for (window, context) in VERIFY_PAIRINGS {
            jobs.push((release, window, context));
        }
    }

    let failures: Vec<String> = jobs
        .par_iter()
        .filter_map(|&(release, window, context)| {
            let version = Version::from(release);
            match composer.create(Some(window), Some(context), &version, None) {
                Ok(text) if text.trim().is_empty() => {
                    Some(format!("{window}/{context}/{release}: empty output"))
                }
                Ok(_) => None,
                Err(e) => Some(format!("{window}/{context}/{release}: {e}")),
            }
        })
        .collect();

    let total = jobs.len();
    if failures.is_empty() {
        println!("verified {total} combinations");
        Ok(())
    } else {
        for failure in &failures {
            eprintln!("FAIL {failure}");
        }
        bail!("{} of {total} combinations failed", failures.len());
    }
}
