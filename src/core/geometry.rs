//! Reframe Geometry
//!
//! Computes the center-crop converting a source frame to the 9:16 portrait
//! ratio, then the isotropic resize to the target output height. Pure geometry
//! only; pixel resampling is delegated to the codec engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Size2D;

/// Target portrait aspect ratio (width / height)
pub const TARGET_ASPECT: f64 = 9.0 / 16.0;

/// Errors raised during reframe planning
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Source frame is already narrower than the target portrait ratio.
    /// Only center-crop is supported; letterboxing/padding is out of scope.
    #[error("Unsupported geometry: source {width}x{height} narrower than 9:16")]
    UnsupportedGeometry { width: u32, height: u32 },
}

/// Center-crop region in source pixel coordinates (f64, unrounded)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPlan {
    /// Left edge of the crop region
    pub x0: f64,
    /// Top edge of the crop region
    pub y0: f64,
    /// Crop width (frame_height * 9/16)
    pub crop_width: f64,
    /// Crop height (full source height)
    pub crop_height: f64,
}

impl CropPlan {
    /// Plans a center-crop of the source frame to the 9:16 ratio.
    ///
    /// Full height is retained; width is reduced around the vertical center
    /// axis. Idempotent: the same frame size always yields the same plan.
    pub fn plan(frame: Size2D) -> Result<Self, GeometryError> {
        let crop_width = frame.height as f64 * TARGET_ASPECT;
        if crop_width > frame.width as f64 {
            return Err(GeometryError::UnsupportedGeometry {
                width: frame.width,
                height: frame.height,
            });
        }
        Ok(Self {
            x0: frame.width as f64 / 2.0 - crop_width / 2.0,
            y0: 0.0,
            crop_width,
            crop_height: frame.height as f64,
        })
    }
}

/// Isotropic resize of the cropped region to the output height
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizePlan {
    /// Fixed output height
    pub target_height: u32,
    /// Output width, rounded to the nearest even integer for the encoder
    pub target_width: u32,
    /// Scale factor applied to both axes
    pub scale_factor: f64,
}

impl ResizePlan {
    /// Plans the resize from the crop region to `target_height`.
    pub fn plan(crop: &CropPlan, target_height: u32) -> Self {
        let scale_factor = target_height as f64 / crop.crop_height;
        let target_width = round_to_even(crop.crop_width * scale_factor);
        Self {
            target_height,
            target_width,
            scale_factor,
        }
    }
}

/// Complete reframe plan handed to the codec engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FramePlan {
    pub crop: CropPlan,
    pub resize: ResizePlan,
}

impl FramePlan {
    /// Plans the full reframe: center-crop to 9:16, then resize to
    /// `target_height`.
    pub fn plan(frame: Size2D, target_height: u32) -> Result<Self, GeometryError> {
        let crop = CropPlan::plan(frame)?;
        let resize = ResizePlan::plan(&crop, target_height);
        Ok(Self { crop, resize })
    }

    /// Output frame size after crop and resize
    pub fn output_size(&self) -> Size2D {
        Size2D::new(self.resize.target_width, self.resize.target_height)
    }
}

/// Rounds to the nearest even integer (libx264 requires even dimensions)
fn round_to_even(value: f64) -> u32 {
    let rounded = value.round() as u32;
    if rounded % 2 == 0 {
        rounded
    } else {
        // Pick the even neighbor closest to the unrounded value
        let down = rounded - 1;
        let up = rounded + 1;
        if (value - down as f64).abs() <= (up as f64 - value).abs() {
            down
        } else {
            up
        }
    }
}
