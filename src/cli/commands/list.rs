//! `cutlist list` - print the parsed component records

use std::path::PathBuf;

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Settings;
use crate::core::detail::{Component, Detail, Profile};
use crate::parse::THICKNESS_UNKNOWN;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Detail serial number
    pub serial: String,

    /// Folder scanned for part images (falls back to the persisted setting)
    #[arg(long, env = "CUTLIST_IMAGE_FOLDER")]
    pub image_folder: Option<PathBuf>,

    /// Parsing and ordering profile
    #[arg(long, value_enum, default_value = "thickness")]
    pub profile: Profile,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let mut detail = Detail::new(&args.serial).map_err(|e| miette::miette!("{}", e))?;

    let image_folder = args
        .image_folder
        .unwrap_or_else(|| Settings::load_or_init().image_folder);
    detail.scan(&image_folder, args.profile);

    if detail.components.is_empty() {
        match global.format {
            OutputFormat::Json => println!("[]"),
            _ => println!("No components found for SN {}.", detail.serial()),
        }
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&detail.components).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Tsv => {
            for c in &detail.components {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    c.raw_name,
                    c.count,
                    thickness_label(c),
                    c.sheet,
                    engraver_label(c)
                );
            }
        }
        OutputFormat::Auto => {
            let mut table = Builder::default();
            table.push_record(["Name", "Per set", "Thickness", "Sheet", "Engraver"]);
            for c in &detail.components {
                table.push_record([
                    c.raw_name.clone(),
                    c.count.to_string(),
                    thickness_label(c),
                    c.sheet.clone(),
                    engraver_label(c).to_string(),
                ]);
            }
            println!("{}", table.build().with(Style::markdown()));
            println!();
            println!(
                "{} component(s) found",
                style(detail.components.len()).cyan()
            );
        }
    }

    Ok(())
}

fn thickness_label(c: &Component) -> String {
    if c.thickness == THICKNESS_UNKNOWN {
        "?".to_string()
    } else {
        format!("{}", c.thickness)
    }
}

fn engraver_label(c: &Component) -> &'static str {
    if c.engraver {
        "yes"
    } else {
        "no"
    }
}
