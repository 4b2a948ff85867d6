use crate::error::ViewerError;
use crate::scene::environment::EquirectTexture;
use image::GenericImageView;
use log::info;
use std::path::Path;

/// Loads a panoramic Radiance `.hdr` image as an environment texture.
pub fn load_hdr<P: AsRef<Path>>(path: P) -> Result<EquirectTexture, ViewerError> {
    let path_ref = path.as_ref();
    let img = image::open(path_ref)?;
    let (width, height) = img.dimensions();
    info!("loaded environment image {:?} ({}x{})", path_ref, width, height);
    Ok(to_equirect(img))
}

/// Decodes an in-memory environment image (the HDRI-upload path).
pub fn decode_hdr(bytes: &[u8]) -> Result<EquirectTexture, ViewerError> {
    let img = image::load_from_memory(bytes)?;
    Ok(to_equirect(img))
}

fn to_equirect(img: image::DynamicImage) -> EquirectTexture {
    let (width, height) = img.dimensions();
    let rgb = img.to_rgb32f();
    let pixels = rgb.pixels().map(|p| p.0).collect();
    EquirectTexture::new(width, height, pixels)
}
