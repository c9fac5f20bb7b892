//! `cutlist generate` - produce the component-list report

use std::path::PathBuf;

use chrono::Local;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::config::Settings;
use crate::core::detail::{Detail, Profile};
use crate::report;
use crate::report::layout::{LayoutOptions, PageBreak};

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Detail serial number (prompted for when omitted)
    pub serial: Option<String>,

    /// Folder scanned for part images (falls back to the persisted setting)
    #[arg(long, env = "CUTLIST_IMAGE_FOLDER")]
    pub image_folder: Option<PathBuf>,

    /// Parsing and ordering profile
    #[arg(long, value_enum, default_value = "thickness")]
    pub profile: Profile,

    /// Page-break placement (defaults to the profile's native trigger)
    #[arg(long, value_enum)]
    pub page_break: Option<PageBreak>,

    /// Directory the report is written to
    #[arg(long, short = 'o', default_value = "output")]
    pub output_dir: PathBuf,

    /// Open the report in the default viewer afterwards
    #[arg(long)]
    pub open: bool,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let serial = match args.serial {
        Some(serial) => serial,
        None => prompt_serial()?,
    };

    let mut detail = Detail::new(&serial).map_err(|e| miette::miette!("{}", e))?;

    let image_folder = args
        .image_folder
        .unwrap_or_else(|| Settings::load_or_init().image_folder);
    detail.scan(&image_folder, args.profile);

    let opts = LayoutOptions {
        page_break: args
            .page_break
            .unwrap_or_else(|| PageBreak::for_profile(args.profile)),
        generated_at: Local::now(),
    };

    let path = report::write_report(&detail, &opts, &args.output_dir)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Report written to: {} ({} component(s))",
            style("✓").green(),
            path.display(),
            detail.components.len()
        );
    }

    if args.open {
        open::that(&path).into_diagnostic()?;
    }

    Ok(())
}

fn prompt_serial() -> Result<String> {
    // Serials are at most five digits; the prompt clamps like the entry
    // field on the production terminal does.
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Serial number (SN)")
        .validate_with(|input: &String| {
            let ok = !input.is_empty()
                && input.len() <= 5
                && input.chars().all(|c| c.is_ascii_digit());
            if ok {
                Ok(())
            } else {
                Err("enter one to five digits")
            }
        })
        .interact_text()
        .into_diagnostic()
}
