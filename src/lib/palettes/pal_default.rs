use ::palette::encoding;
use ::palette::{FromColor, Hsv, Srgb};

use crate::palettes::DEFAULT_PALETTE_NAME;
use crate::palettes::palette::{Color, Palette};

const HUE_STEP: usize = 16;
const HUE_END: u16 = 352;
const VALUE_STEP: usize = 16;
const VALUE_MIN: u8 = 15;

/// Scales a 0..=1 channel to 16 bits and keeps the high byte, so in-between shades are truncated
/// rather than rounded to the nearest 8-bit value.
fn channel_to_u8(x: f64) -> u8 {
	((x * u16::MAX as f64).round() as u32 >> 8) as u8
}

/// Converts HSV with the hue in degrees and saturation and value in 0..=255 to RGB.
pub(crate) fn color_from_hsv(hue: u16, saturation: u8, value: u8) -> Color {
	let hsv: Hsv<encoding::Srgb, f64> = Hsv::new(
		hue as f64,
		saturation as f64 / u8::MAX as f64,
		value as f64 / u8::MAX as f64,
	);
	let rgb: Srgb<f64> = Srgb::from_color(hsv);
	Color::new(channel_to_u8(rgb.red), channel_to_u8(rgb.green), channel_to_u8(rgb.blue))
}

impl Palette {
	/// Builds the default palette named "Default". See [`Palette::make_default_named`].
	pub fn make_default() -> Palette {
		Self::make_default_named(DEFAULT_PALETTE_NAME)
	}

	/// Builds a palette of 352 fully saturated colors: 22 hues in steps of 16 degrees, each with
	/// 16 shades going from brightest to darkest.
	///
	/// The colors are appended one by one, so the returned palette counts as modified.
	pub fn make_default_named<S: Into<String>>(name: S) -> Palette {
		let mut pal = Palette::new(name, None);

		for hue in (0..HUE_END).step_by(HUE_STEP) {
			for value in (VALUE_MIN..=u8::MAX).rev().step_by(VALUE_STEP) {
				pal.append_color(color_from_hsv(hue, u8::MAX, value));
			}
		}

		pal
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hsv_primaries() {
		assert_eq!(color_from_hsv(0, 255, 255), Color::new(255, 0, 0));
		assert_eq!(color_from_hsv(120, 255, 255), Color::new(0, 255, 0));
		assert_eq!(color_from_hsv(240, 255, 255), Color::new(0, 0, 255));
		assert_eq!(color_from_hsv(0, 0, 128), Color::new(128, 128, 128));
		assert_eq!(color_from_hsv(0, 255, 15), Color::new(15, 0, 0));
	}

	#[test]
	fn hsv_in_between() {
		// 16 degrees is 16/60 of the way from red to yellow
		assert_eq!(color_from_hsv(16, 255, 255), Color::new(255, 68, 0));
		assert_eq!(color_from_hsv(60, 255, 255), Color::new(255, 255, 0));
		assert_eq!(color_from_hsv(336, 255, 255), Color::new(255, 0, 102));
	}

	#[test]
	fn hsv_shades_truncate() {
		assert_eq!(color_from_hsv(16, 255, 239), Color::new(239, 63, 0));
		assert_eq!(color_from_hsv(16, 255, 175), Color::new(175, 46, 0));
		assert_eq!(color_from_hsv(16, 255, 111), Color::new(111, 29, 0));
	}

	#[test]
	fn channels_keep_full_values() {
		for v in 0..=u8::MAX {
			assert_eq!(channel_to_u8(v as f64 / u8::MAX as f64), v);
		}
	}
}
