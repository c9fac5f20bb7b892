//! Candidate collection
//!
//! Read-only recursive walk over the image folder. A file is a candidate
//! when it carries the machines' preview extension and its name starts with
//! the requested serial. Traversal order is not part of the contract;
//! ordering is the detail's job.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::detail::Profile;

/// File extension of the machine's part previews.
const IMAGE_EXT: &str = "png";

/// Characters accepted between the serial and the rest of the name.
const PREFIX_SEPARATORS: [char; 3] = [' ', '-', '_'];

/// One accepted file, stem and real on-disk path.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub stem: String,
    pub path: PathBuf,
}

/// Recursively collect the image files belonging to `serial` under `root`.
pub fn collect(root: &Path, serial: &str, profile: Profile) -> Vec<Candidate> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let path = e.path();
            let is_image = path
                .extension()
                .and_then(|x| x.to_str())
                .is_some_and(|x| x.eq_ignore_ascii_case(IMAGE_EXT));
            if !is_image {
                return None;
            }

            let stem = path.file_stem()?.to_str()?;
            if !accepts(stem, serial, profile) {
                return None;
            }

            Some(Candidate {
                stem: stem.to_string(),
                path: path.to_path_buf(),
            })
        })
        .collect()
}

fn accepts(stem: &str, serial: &str, profile: Profile) -> bool {
    let Some(rest) = stem.strip_prefix(serial) else {
        return false;
    };
    match profile {
        Profile::Thickness => rest
            .chars()
            .next()
            .is_some_and(|c| PREFIX_SEPARATORS.contains(&c)),
        Profile::Sheet => true,
    }
}
