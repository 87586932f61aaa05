use std::fmt::{Display, Formatter};

use crate::palettes::GPL_EXTENSION;

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Color {
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}
}

impl From<[u8; 3]> for Color {
	fn from(v: [u8; 3]) -> Self {
		Self {
			r: v[0],
			g: v[1],
			b: v[2],
		}
	}
}

impl Display for Color {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let mut rgb = self.r as u32;
		rgb = (rgb << 8) | self.g as u32;
		rgb = (rgb << 8) | self.b as u32;
		write!(f, "#{:06X}", rgb)
	}
}

/// An ordered, named list of colors that remembers whether it was changed since it was last
/// created, loaded or saved.
///
/// Index arguments follow slice semantics: passing an index outside the valid range is a bug in
/// the caller and panics.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	name: String,
	filename: String,
	colors: Vec<Color>,
	pub(crate) modified: bool,
}

fn filename_for(name: &str) -> String {
	format!("{name}.{GPL_EXTENSION}")
}

impl Palette {
	/// Creates an empty palette. Without a filename (or with an empty one) it becomes `<name>.gpl`.
	pub fn new<S: Into<String>>(name: S, filename: Option<String>) -> Self {
		let name = name.into();
		let filename = match filename {
			Some(f) if !f.is_empty() => f,
			_ => filename_for(&name),
		};

		Self {
			name,
			filename,
			colors: Vec::new(),
			modified: false,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn filename(&self) -> &str {
		&self.filename
	}

	pub fn is_modified(&self) -> bool {
		self.modified
	}

	pub fn count(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	/// Returns the color at `index`.
	///
	/// # Panics
	///
	/// Panics if `index >= self.count()`.
	pub fn color(&self, index: usize) -> Color {
		self.check_index("color", index);
		self.colors[index]
	}

	pub fn get_color(&self, index: usize) -> Option<Color> {
		self.colors.get(index).copied()
	}

	/// Replaces the color at `index`.
	///
	/// # Panics
	///
	/// Panics if `index >= self.count()`.
	pub fn set_color(&mut self, index: usize, color: Color) {
		self.check_index("set_color", index);
		self.colors[index] = color;
		self.modified = true;
	}

	/// Inserts `color` before `index`, shifting everything after it to the right.
	/// `index == self.count()` appends.
	///
	/// # Panics
	///
	/// Panics if `index > self.count()`.
	pub fn insert_color(&mut self, index: usize, color: Color) {
		assert!(
			index <= self.colors.len(),
			"insert_color: index {index} out of range for palette with {} colors",
			self.colors.len()
		);
		self.colors.insert(index, color);
		self.modified = true;
	}

	pub fn append_color(&mut self, color: Color) {
		self.insert_color(self.colors.len(), color);
	}

	/// Removes and returns the color at `index`, shifting everything after it to the left.
	///
	/// # Panics
	///
	/// Panics if `index >= self.count()`.
	pub fn remove_color(&mut self, index: usize) -> Color {
		self.check_index("remove_color", index);
		self.modified = true;
		self.colors.remove(index)
	}

	/// Renames the palette. The filename follows the name; `name` is not checked for characters
	/// that are invalid in file names.
	pub fn set_name<S: Into<String>>(&mut self, name: S) {
		self.name = name.into();
		self.filename = filename_for(&self.name);
		self.modified = true;
	}

	fn check_index(&self, op: &str, index: usize) {
		assert!(
			index < self.colors.len(),
			"{op}: index {index} out of range for palette with {} colors",
			self.colors.len()
		);
	}
}

#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
	#[error("Not a GIMP palette, first line is \"{found}\"")]
	InvalidHeader { found: String },
	#[error("Missing palette name, second line is \"{found}\"")]
	MissingName { found: String },
	#[error("io error: {0}")]
	IoErr(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn color_conversions() {
		assert_eq!(Color::from([0x1E, 0x3D, 0x54]), Color::new(0x1E, 0x3D, 0x54));
		assert_eq!(Color::new(0xE2, 0xED, 0xF5).to_string(), "#E2EDF5");
	}

	#[test]
	fn filename_defaults_to_name() {
		assert_eq!(Palette::new("Skin", None).filename(), "Skin.gpl");
		assert_eq!(Palette::new("Skin", Some(String::new())).filename(), "Skin.gpl");
		assert_eq!(Palette::new("Skin", Some("tones.gpl".to_string())).filename(), "tones.gpl");
	}

	#[test]
	fn remove_returns_color() {
		let mut pal = Palette::new("P", None);
		pal.append_color(Color::new(1, 1, 1));
		pal.append_color(Color::new(2, 2, 2));
		assert_eq!(pal.remove_color(0), Color::new(1, 1, 1));
		assert_eq!(pal.colors(), &[Color::new(2, 2, 2)]);
	}
}
