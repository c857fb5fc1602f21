use std::path::Path;

use thiserror::Error;

use crate::backend::mathphysics::MapExtent;


#[derive(Debug, Error)]
pub enum MapError {
    #[error("Failed to read map image with error `{0}`")]
    ImageError(#[from] image::ImageError),
    #[error("Map image `{0}` has no pixels")]
    EmptyImage(String),
}


pub struct MapImage;

impl MapImage {
    /// Reads the pixel size of the map image. Only the header is decoded.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file is not a readable image or has zero
    /// width or height.
    pub fn load(path: &Path) -> Result<MapExtent, MapError> {
        let (width, height) = image::image_dimensions(path)?;

        MapExtent::new(width, height)
            .ok_or_else(|| MapError::EmptyImage(path.display().to_string()))
    }
}


#[cfg(test)]
mod tests {
    use image::RgbImage;

    use super::*;


    #[test]
    fn extent_of_png() {
        let path = std::env::temp_dir().join("wifi_heatmap_map_extent.png");

        RgbImage::new(40, 30)
            .save(&path)
            .unwrap_or_else(|error| panic!("{}", error));

        let extent = MapImage::load(&path)
            .unwrap_or_else(|error| panic!("{}", error));

        let _ = std::fs::remove_file(&path);

        assert_eq!(40, extent.width());
        assert_eq!(30, extent.height());
    }

    #[test]
    fn missing_image() {
        let path = std::env::temp_dir().join("wifi_heatmap_no_such_map.png");

        assert!(
            matches!(MapImage::load(&path), Err(MapError::ImageError(_)))
        );
    }
}
