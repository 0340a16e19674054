//! PNG 인코더.
//!
//! 렌더링된 표면을 파일 또는 Base64 문자열로 내보낸다.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use beacon_core::error::CoreError;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::fs;
use std::path::Path;
use tracing::debug;

/// PNG 인코딩
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CoreError> {
    let (w, h) = image.dimensions();
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(image.as_raw(), w, h, ExtendedColorType::Rgba8)
        .map_err(|e| CoreError::Image(format!("PNG 인코딩 실패: {e}")))?;

    debug!("PNG 인코딩: {}x{} → {} bytes", w, h, bytes.len());
    Ok(bytes)
}

/// PNG 인코딩 후 Base64 반환
pub fn encode_png_base64(image: &RgbaImage) -> Result<String, CoreError> {
    let bytes = encode_png(image)?;
    Ok(B64.encode(&bytes))
}

/// PNG 파일로 저장
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), CoreError> {
    let bytes = encode_png(image)?;
    fs::write(path, bytes)?;
    Ok(())
}
