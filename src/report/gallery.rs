//! Photo contact sheet: a captioned thumbnail grid.

use std::path::Path;

use image::{imageops, Rgb, RgbImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{info, warn};

use super::ReportError;
use crate::models::PhotoRecord;

const FONT: &str = "sans-serif";
pub(crate) const COLUMNS: u32 = 4;
pub(crate) const MAX_PHOTOS: usize = 40;
const THUMB: u32 = 240;
const PADDING: u32 = 10;
const CAPTION_HEIGHT: u32 = 44;
const TITLE_HEIGHT: u32 = 60;
const CAPTION_NAME_CHARS: usize = 20;

const CELL_WIDTH: u32 = THUMB + PADDING * 2;
const CELL_HEIGHT: u32 = CAPTION_HEIGHT + THUMB + PADDING;

/// Sheet size for `photos` thumbnails.
pub(crate) fn sheet_size(photos: usize) -> (u32, u32) {
    let shown = photos.min(MAX_PHOTOS) as u32;
    let rows = shown.div_ceil(COLUMNS);
    (COLUMNS * CELL_WIDTH, TITLE_HEIGHT + rows * CELL_HEIGHT)
}

/// Top-left corner of cell `index`.
fn cell_origin(index: usize) -> (u32, u32) {
    let index = index as u32;
    (
        (index % COLUMNS) * CELL_WIDTH,
        TITLE_HEIGHT + (index / COLUMNS) * CELL_HEIGHT,
    )
}

/// Thumbnails of the first 40 photos, four to a row, each captioned with
/// its category and file name. Photos that fail to load get a placeholder.
pub fn render_contact_sheet(photos: &[PhotoRecord], path: &Path) -> Result<(), ReportError> {
    if photos.is_empty() {
        return Err(ReportError::EmptyChart("no photos for contact sheet".to_string()));
    }

    let shown = &photos[..photos.len().min(MAX_PHOTOS)];
    let (width, height) = sheet_size(shown.len());
    let mut sheet = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    let mut failed = Vec::new();
    for (index, photo) in shown.iter().enumerate() {
        let (x, y) = cell_origin(index);
        match image::open(&photo.path) {
            Ok(img) => {
                let thumb = img.thumbnail(THUMB, THUMB).to_rgb8();
                // Centre inside the thumbnail box.
                let dx = (THUMB - thumb.width()) / 2;
                let dy = (THUMB - thumb.height()) / 2;
                imageops::overlay(
                    &mut sheet,
                    &thumb,
                    i64::from(x + PADDING + dx),
                    i64::from(y + CAPTION_HEIGHT + dy),
                );
            }
            Err(e) => {
                warn!("Contact sheet could not load {:?}: {}", photo.path, e);
                failed.push(index);
            }
        }
    }

    {
        let root = BitMapBackend::with_buffer(&mut sheet, (width, height)).into_drawing_area();
        let centred = |size: u32| {
            TextStyle::from((FONT, size).into_font())
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center))
        };

        root.draw(&Text::new(
            "Photo Gallery",
            ((width / 2) as i32, (TITLE_HEIGHT / 2) as i32),
            centred(30),
        ))
        .map_err(|e| ReportError::Plot(e.to_string()))?;

        for (index, photo) in shown.iter().enumerate() {
            let (x, y) = cell_origin(index);
            let cx = (x + CELL_WIDTH / 2) as i32;
            let name: String = photo.file_name.chars().take(CAPTION_NAME_CHARS).collect();

            for (line, text) in [photo.category.label().to_string(), name].into_iter().enumerate() {
                root.draw(&Text::new(
                    text,
                    (cx, (y + 12 + line as u32 * 18) as i32),
                    centred(15),
                ))
                .map_err(|e| ReportError::Plot(e.to_string()))?;
            }

            if failed.contains(&index) {
                root.draw(&Text::new(
                    "Error loading image",
                    (cx, (y + CAPTION_HEIGHT + THUMB / 2) as i32),
                    centred(15),
                ))
                .map_err(|e| ReportError::Plot(e.to_string()))?;
            }
        }

        root.present().map_err(|e| ReportError::Plot(e.to_string()))?;
    }

    sheet.save(path)?;
    info!("Saved contact sheet: {:?} ({} photos)", path, shown.len());
    Ok(())
}
