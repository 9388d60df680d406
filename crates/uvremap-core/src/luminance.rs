//! Luma from RGB using ITU-R BT.601 coefficients.
//!
//! Masks authored as color images are reduced to one channel with these
//! weights; alpha never contributes.

/// ITU-R BT.601 coefficient for red channel.
pub const LUMA_R: f32 = 0.299;

/// ITU-R BT.601 coefficient for green channel.
pub const LUMA_G: f32 = 0.587;

/// ITU-R BT.601 coefficient for blue channel.
pub const LUMA_B: f32 = 0.114;

/// Luma of u8 RGB values, rounded to the nearest integer.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let value = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    value.clamp(0.0, 255.0).round() as u8
}
