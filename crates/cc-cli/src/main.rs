//! Chorus Crisp command line
//!
//! Usage:
//!   chorus-crisp apply project.json          - Splice the selected clips
//!   chorus-crisp presets list                - Show the preset catalog
//!   chorus-crisp presets save NAME           - Save current values as a preset
//!   chorus-crisp presets delete NAME         - Delete a user preset
//!   chorus-crisp settings show|reset         - Inspect or reset last-used values

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cc_core::{FadeCurve, SliderValues};
use cc_engine::{TrackManager, apply_all, apply_to_selection};
use cc_state::{CatalogEntry, EditSession, FileStore, PresetSelection, SettingsStore};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chorus-crisp", about = "Splice-and-crossfade chops for audio clips")]
struct Cli {
    /// Settings directory (defaults to the platform config directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Splice clips in a project file
    Apply {
        /// Project JSON file
        project: PathBuf,
        /// Write the result here instead of overwriting the project
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Start from a preset
        #[arg(short, long)]
        preset: Option<String>,
        /// Process every audio clip, not just the selected ones
        #[arg(long)]
        all: bool,
        #[command(flatten)]
        sliders: SliderArgs,
    },
    /// Manage presets
    Presets {
        #[command(subcommand)]
        command: PresetCommands,
    },
    /// Manage last-used settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum PresetCommands {
    /// List built-in and user presets
    List,
    /// Save the last-used values (with overrides) as a user preset
    Save {
        name: String,
        /// Replace an existing user preset with the same name
        #[arg(long)]
        overwrite: bool,
        #[command(flatten)]
        sliders: SliderArgs,
    },
    /// Delete a user preset
    Delete { name: String },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the last-used values
    Show,
    /// Restore the default values
    Reset,
}

/// Slider overrides, 0-100
#[derive(Args, Default)]
struct SliderArgs {
    /// Splice slider
    #[arg(long)]
    splice: Option<i32>,
    /// Crisp slider
    #[arg(long)]
    crisp: Option<i32>,
    /// Offset slider
    #[arg(long)]
    offset: Option<i32>,
    /// Fade curve name or index (0-4)
    #[arg(long)]
    curve: Option<String>,
}

impl SliderArgs {
    fn apply_to(&self, session: &mut EditSession) -> Result<()> {
        if let Some(v) = self.splice {
            session.set_splice(v);
        }
        if let Some(v) = self.crisp {
            session.set_crisp(v);
        }
        if let Some(v) = self.offset {
            session.set_offset(v);
        }
        if let Some(curve) = &self.curve {
            let curve: FadeCurve = curve.parse()?;
            session.set_curve(curve.index());
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let store = match cli.config_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::open_default(),
    };
    log::debug!("Settings directory: {:?}", store.dir());

    match cli.command {
        Commands::Apply {
            project,
            output,
            preset,
            all,
            sliders,
        } => apply(&store, &project, output, preset.as_deref(), all, &sliders),
        Commands::Presets { command } => match command {
            PresetCommands::List => list_presets(&store),
            PresetCommands::Save {
                name,
                overwrite,
                sliders,
            } => save_preset(&store, &name, overwrite, &sliders),
            PresetCommands::Delete { name } => delete_preset(&store, &name),
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show => show_settings(&store),
            SettingsCommands::Reset => {
                store.save_settings(&SliderValues::default());
                show_settings(&store)
            }
        },
    }
}

fn select_preset(session: &mut EditSession, name: &str) -> Result<()> {
    match session.catalog().find_ignore_case(name) {
        Some(PresetSelection::Custom) | None => bail!("Unknown preset '{}'", name),
        Some(selection) => {
            session.select(selection);
            Ok(())
        }
    }
}

fn apply(
    store: &FileStore,
    project: &Path,
    output: Option<PathBuf>,
    preset: Option<&str>,
    all: bool,
    sliders: &SliderArgs,
) -> Result<()> {
    let mut session = EditSession::open(store);
    if let Some(name) = preset {
        select_preset(&mut session, name)?;
    }
    sliders.apply_to(&mut session)?;

    let mut timeline = TrackManager::load(project)
        .with_context(|| format!("Failed to load project {:?}", project))?;

    let params = session.splice_params();
    let report = if all {
        let segments = timeline.audio_segments();
        apply_all(&mut timeline, &segments, &params)
    } else {
        apply_to_selection(&mut timeline, &params)?
    };

    let output = output.unwrap_or_else(|| project.to_path_buf());
    timeline
        .save(&output)
        .with_context(|| format!("Failed to save project {:?}", output))?;

    session.commit(store);

    println!("{}", report);
    Ok(())
}

fn list_presets(store: &FileStore) -> Result<()> {
    let session = EditSession::open(store);
    let current = session.selected_display_index();

    for (index, entry) in session.catalog().entries().iter().enumerate() {
        let marker = if index == current { "*" } else { " " };
        match entry {
            CatalogEntry::Custom => println!("{} {}", marker, entry.label()),
            CatalogEntry::Separator(label) => println!("  {}", label),
            CatalogEntry::Preset(preset) => {
                let v = preset.values;
                println!(
                    "{} {:<20} splice {:>3}  crisp {:>3}  offset {:>3}  curve {}",
                    marker,
                    preset.name,
                    v.splice,
                    v.crisp,
                    v.offset,
                    v.fade_curve()
                );
            }
        }
    }
    Ok(())
}

fn save_preset(store: &FileStore, name: &str, overwrite: bool, sliders: &SliderArgs) -> Result<()> {
    let mut session = EditSession::open(store);
    sliders.apply_to(&mut session)?;

    if session.save_preset(store, name, overwrite)? == PresetSelection::Custom {
        bail!("Preset '{}' could not be written to {:?}", name.trim(), store.user_presets_path());
    }
    println!("Saved preset '{}'", session.selected_name());
    Ok(())
}

fn delete_preset(store: &FileStore, name: &str) -> Result<()> {
    let mut session = EditSession::open(store);
    let Some(selection) = session.catalog().find_user(name) else {
        bail!("No user preset named '{}'", name);
    };

    session.select(selection);
    if let Some(deleted) = session.delete_selected(store) {
        println!("Deleted preset '{}'", deleted);
    }
    Ok(())
}

fn show_settings(store: &FileStore) -> Result<()> {
    let session = EditSession::open(store);
    let values = session.values();
    let params = session.splice_params();

    println!("Preset:      {}", session.selected_name());
    println!(
        "Splice:      {} ({:.3}s)",
        values.splice_label(),
        params.splice_time
    );
    println!("Crisp:       {}", values.duck_label());
    println!("Offset:      {}", values.offset_label());
    println!("Fade type:   {}", values.fade_curve());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "chorus-crisp",
            "apply",
            "song.json",
            "--preset",
            "snappy",
            "--curve",
            "fast",
            "--config-dir",
            "/tmp/cc",
        ])
        .unwrap();

        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/cc")));
        let Commands::Apply {
            project,
            preset,
            sliders,
            all,
            ..
        } = cli.command
        else {
            panic!("expected apply");
        };
        assert_eq!(project, PathBuf::from("song.json"));
        assert_eq!(preset.as_deref(), Some("snappy"));
        assert_eq!(sliders.curve.as_deref(), Some("fast"));
        assert!(!all);
    }

    #[test]
    fn test_slider_overrides() {
        let mut session = EditSession::with_values(Default::default(), SliderValues::default());
        let sliders = SliderArgs {
            splice: Some(40),
            crisp: Some(80),
            offset: Some(10),
            curve: Some("Linear".to_string()),
        };
        sliders.apply_to(&mut session).unwrap();
        assert_eq!(session.selected_name(), "Standard");

        let bad = SliderArgs {
            curve: Some("wobbly".to_string()),
            ..SliderArgs::default()
        };
        assert!(bad.apply_to(&mut session).is_err());
    }

    #[test]
    fn test_select_preset() {
        let mut session = EditSession::with_values(Default::default(), SliderValues::default());
        select_preset(&mut session, "jario style").unwrap();
        assert_eq!(session.values(), SliderValues::new(50, 80, 20, 4));
        assert!(select_preset(&mut session, "custom").is_err());
        assert!(select_preset(&mut session, "nope").is_err());
    }

    #[test]
    fn test_save_preset_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        let store = FileStore::new(&blocker);
        let err = save_preset(&store, "Mine", false, &SliderArgs::default()).unwrap_err();
        assert!(err.to_string().contains("could not be written"));

        let store = FileStore::new(dir.path().join("ChorusCrisp"));
        save_preset(&store, "Mine", false, &SliderArgs::default()).unwrap();
        assert_eq!(store.load_user_presets().len(), 1);
    }
}
