//! Detail and component records
//!
//! A detail is the parent assembly being reported on, identified by a
//! numeric serial number. Its components are derived from the image files
//! the collector finds, one record per file, immutable once the scan has
//! populated the list.

use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::scan;
use crate::parse;

/// Parsing and ordering profile.
///
/// The two filename conventions observed on the shop machines differ in how
/// candidates are matched and how records are ordered; both are expressed as
/// profiles of the same parser and collector rather than separate code
/// paths.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    /// Serial followed by a separator; records ordered by sheet thickness.
    #[default]
    Thickness,
    /// Bare serial prefix; records ordered by sheet type.
    Sheet,
}

/// One physical part, derived from one image file.
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    /// Original filename stem, printed as the part label.
    pub raw_name: String,
    /// On-disk image the record was derived from.
    pub source: PathBuf,
    /// Quantity per assembly set.
    pub count: u32,
    /// Sheet thickness; 999 when the name does not encode one.
    pub thickness: f64,
    /// Material/grade descriptor; "???" when the name does not encode one.
    pub sheet: String,
    /// Part is marked for the engraving station.
    pub engraver: bool,
}

impl Component {
    /// Build a record from a collected image file. Never fails; fields the
    /// name does not encode hold their sentinels.
    pub fn from_image(stem: &str, source: PathBuf) -> Self {
        let fields = parse::parse_stem(stem);
        Self {
            raw_name: stem.to_string(),
            source,
            count: fields.count,
            thickness: fields.thickness,
            sheet: fields.sheet,
            engraver: fields.engraver,
        }
    }
}

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("serial number must be a non-empty string of digits, got {0:?}")]
    InvalidSerial(String),
}

/// The parent assembly a report is generated for.
#[derive(Debug)]
pub struct Detail {
    serial: String,
    pub components: Vec<Component>,
}

impl Detail {
    /// Validate the serial and create an empty detail.
    pub fn new(serial: &str) -> Result<Self, DetailError> {
        if serial.is_empty() || !serial.chars().all(|c| c.is_ascii_digit()) {
            return Err(DetailError::InvalidSerial(serial.to_string()));
        }
        Ok(Self {
            serial: serial.to_string(),
            components: Vec::new(),
        })
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Walk the image folder and populate the component list, ordered by the
    /// profile's sort key.
    pub fn scan(&mut self, root: &Path, profile: Profile) {
        self.components = scan::collect(root, &self.serial, profile)
            .into_iter()
            .map(|c| Component::from_image(&c.stem, c.path))
            .collect();
        self.order(profile);
    }

    /// Stable sort: ties keep collector order.
    fn order(&mut self, profile: Profile) {
        match profile {
            Profile::Thickness => self
                .components
                .sort_by(|a, b| a.thickness.total_cmp(&b.thickness)),
            Profile::Sheet => self.components.sort_by(|a, b| a.sheet.cmp(&b.sheet)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, thickness: f64, sheet: &str) -> Component {
        Component {
            raw_name: name.to_string(),
            source: PathBuf::from(format!("{name}.png")),
            count: 1,
            thickness,
            sheet: sheet.to_string(),
            engraver: false,
        }
    }

    #[test]
    fn serial_must_be_numeric_and_non_empty() {
        assert!(Detail::new("700").is_ok());
        assert!(matches!(Detail::new(""), Err(DetailError::InvalidSerial(_))));
        assert!(matches!(
            Detail::new("70a"),
            Err(DetailError::InvalidSerial(_))
        ));
        assert!(matches!(
            Detail::new("7 0"),
            Err(DetailError::InvalidSerial(_))
        ));
    }

    #[test]
    fn thickness_order_is_ascending_and_stable() {
        let mut detail = Detail::new("700").unwrap();
        detail.components = vec![
            component("b", 3.0, "Stal"),
            component("a", 1.5, "Stal"),
            component("c", 3.0, "Stal"),
            component("d", parse::THICKNESS_UNKNOWN, "???"),
        ];
        detail.order(Profile::Thickness);

        let names: Vec<&str> = detail.components.iter().map(|c| c.raw_name.as_str()).collect();
        // Equal thicknesses keep their collector order; the sentinel sinks
        // to the end.
        assert_eq!(names, ["a", "b", "c", "d"]);
    }

    #[test]
    fn sheet_order_is_lexical() {
        let mut detail = Detail::new("700").unwrap();
        detail.components = vec![
            component("b", 3.0, "Stal"),
            component("a", 1.0, "AlMg3"),
            component("c", 2.0, "DC01"),
        ];
        detail.order(Profile::Sheet);

        let sheets: Vec<&str> = detail.components.iter().map(|c| c.sheet.as_str()).collect();
        assert_eq!(sheets, ["AlMg3", "DC01", "Stal"]);
    }

    #[test]
    fn component_from_image_carries_the_stem_and_source() {
        let c = Component::from_image("700_x#3_Stal_gr", PathBuf::from("/scan/700_x#3_Stal_gr.png"));
        assert_eq!(c.raw_name, "700_x#3_Stal_gr");
        assert_eq!(c.source, PathBuf::from("/scan/700_x#3_Stal_gr.png"));
        assert_eq!(c.thickness, 3.0);
        assert_eq!(c.sheet, "Stal");
        assert!(c.engraver);
    }
}
