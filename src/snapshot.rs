//! Debug snapshots of the planner's cost field.
//!
//! Writes the internal cost grid as an 8-bit grayscale PGM next to a small
//! text file holding the endpoints, for offline inspection of what the
//! planner actually saw.

use std::fs::File;
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{GrayImage, ImageEncoder};

use crate::planner::NavFieldPlanner;
use crate::types::NavFieldError;

/// Write `<stem>.pgm` (the cost grid) and `<stem>.txt` (goal and start).
pub fn save_snapshot(planner: &NavFieldPlanner, stem: &Path) -> Result<(), NavFieldError> {
    let goal = planner.goal();
    let start = planner.start();
    std::fs::write(
        stem.with_extension("txt"),
        format!("Goal: {} {}\nStart: {} {}\n", goal.x, goal.y, start.x, start.y),
    )?;

    let image = GrayImage::from_raw(
        planner.width(),
        planner.height(),
        planner.cost_data().to_vec(),
    )
    .ok_or_else(|| {
        NavFieldError::SizeMismatch("cost buffer does not fill the image".to_string())
    })?;

    let file = File::create(stem.with_extension("pgm"))?;
    let encoder = PnmEncoder::new(file)
        .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary));
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::L8,
    )?;
    Ok(())
}
