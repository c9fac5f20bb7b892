//! `cutlist config` - settings management
//!
//! Provides commands to view and modify the persisted settings record.

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::config::Settings;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current settings values
    Show,

    /// Set a settings value
    Set(SetArgs),

    /// Show the path of the settings file
    Path,

    /// List all available settings keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Settings key (e.g., image_folder)
    pub key: String,

    /// Value to set
    pub value: String,
}

/// Valid settings keys
const VALID_KEYS: &[(&str, &str)] = &[(
    "image_folder",
    "Root folder holding the part preview images",
)];

pub fn run(cmd: ConfigCommands, _global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => run_show(),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show() -> Result<()> {
    let settings = Settings::load_or_init();
    println!("image_folder = {}", settings.image_folder.display());
    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    if !VALID_KEYS.iter().any(|(key, _)| *key == args.key) {
        let known: Vec<&str> = VALID_KEYS.iter().map(|(key, _)| *key).collect();
        return Err(miette::miette!(
            "Unknown key '{}'. Known keys: {}",
            args.key,
            known.join(", ")
        ));
    }

    let Some(path) = Settings::path() else {
        return Err(miette::miette!(
            "No settings directory available on this system"
        ));
    };

    let mut settings = Settings::load_or_init_at(&path);
    settings.image_folder = args.value.clone().into();
    settings
        .save_at(&path)
        .map_err(|e| miette::miette!("Failed to write settings: {}", e))?;

    println!("{} Set {} = {}", style("✓").green(), args.key, args.value);
    Ok(())
}

fn run_path() -> Result<()> {
    match Settings::path() {
        Some(path) => println!("{}", path.display()),
        None => println!("(no settings directory available)"),
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    for (key, description) in VALID_KEYS {
        println!("{:<16} {}", key, description);
    }
    Ok(())
}
