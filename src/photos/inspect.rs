//! Image inspection and text extraction.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use exif::{In, Tag, Value};
use tracing::debug;

use super::PhotoError;
use crate::models::PhotoFacts;

/// Supplies the text visible in a photo.
pub trait TextSource {
    fn extract(&self, photo: &Path) -> Result<String, PhotoError>;
}

/// Reads text from a `<photo>.txt` file beside the photo, as produced by an
/// external OCR pass. A missing sidecar means no text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarText;

impl SidecarText {
    pub fn sidecar_path(photo: &Path) -> PathBuf {
        let mut name: OsString = photo.as_os_str().to_owned();
        name.push(".txt");
        PathBuf::from(name)
    }
}

impl TextSource for SidecarText {
    fn extract(&self, photo: &Path) -> Result<String, PhotoError> {
        match fs::read_to_string(Self::sidecar_path(photo)) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// File-level facts about a photo.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub facts: PhotoFacts,
    pub size_bytes: u64,

    /// EXIF capture time, else file modification time
    pub modified: Option<DateTime<Utc>>,
}

/// Capture time from EXIF `DateTimeOriginal`, else `DateTime`.
///
/// EXIF times carry no zone and are read as UTC. Files without EXIF data
/// give `None`.
pub fn exif_timestamp(path: &Path) -> Option<DateTime<Utc>> {
    let file = File::open(path).ok()?;
    let exif = match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("No EXIF data in {:?}: {}", path, e);
            return None;
        }
    };

    [Tag::DateTimeOriginal, Tag::DateTime]
        .into_iter()
        .find_map(|tag| {
            let field = exif.get_field(tag, In::PRIMARY)?;
            let Value::Ascii(ref parts) = field.value else {
                return None;
            };
            let stamp = exif::DateTime::from_ascii(parts.first()?).ok()?;
            NaiveDate::from_ymd_opt(
                i32::from(stamp.year),
                u32::from(stamp.month),
                u32::from(stamp.day),
            )?
            .and_hms_opt(
                u32::from(stamp.hour),
                u32::from(stamp.minute),
                u32::from(stamp.second),
            )
            .map(|naive| naive.and_utc())
        })
}

/// Decode a photo and measure it.
pub fn inspect_photo(path: &Path, text: &dyn TextSource) -> Result<Inspection, PhotoError> {
    let metadata = fs::metadata(path)?;
    let image = image::open(path)?.to_rgb8();
    let (width, height) = image.dimensions();

    let mut sums = [0u64; 3];
    for pixel in image.pixels() {
        for (sum, channel) in sums.iter_mut().zip(pixel.0) {
            *sum += u64::from(channel);
        }
    }
    let count = u64::from(width) * u64::from(height);
    let mean_rgb = if count == 0 {
        [0.0; 3]
    } else {
        sums.map(|s| s as f64 / count as f64)
    };

    Ok(Inspection {
        facts: PhotoFacts {
            width,
            height,
            mean_rgb,
            text: text.extract(path)?.to_lowercase(),
        },
        size_bytes: metadata.len(),
        modified: exif_timestamp(path)
            .or_else(|| metadata.modified().ok().map(DateTime::<Utc>::from)),
    })
}
