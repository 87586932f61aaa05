use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tempfile::Builder;

use crate::palettes::palette::{Color, Palette, PaletteError};
use crate::palettes::{DEFAULT_COLOR_LABEL, GIMP_MAGIC, GPL_EXTENSION, NAME_PREFIX};

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r|\n").unwrap());
static TOKEN_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

const BOM: char = '\u{FEFF}';

/// Parses one color component. Anything that isn't a base-10 integer counts as 0, everything
/// else saturates to the u8 range.
fn parse_component(token: &str, line: usize) -> u8 {
	match token.parse::<i32>() {
		Ok(v) => {
			let clamped = v.clamp(0, u8::MAX as i32);
			if clamped != v {
				tracing::warn!(line, value = v, "color component out of range, clamped to {clamped}");
			}
			clamped as u8
		}
		Err(_) => {
			tracing::warn!(line, token, "color component is not an integer, using 0");
			0
		}
	}
}

/// Returns `None` for blank lines, comments and lines with fewer than three tokens.
fn parse_color_line(line: &str, line_no: usize) -> Option<Color> {
	let trimmed = line.trim_start_matches([' ', '\t']);
	if trimmed.is_empty() || trimmed.starts_with('#') {
		return None;
	}

	let tokens = TOKEN_SEPARATOR.split(trimmed)
		.filter(|t| !t.is_empty())
		.take(3)
		.collect::<Vec<&str>>();

	// "Columns: 16" and other headers we don't know about end up here
	if tokens.len() < 3 {
		return None;
	}

	let rgb = [tokens[0], tokens[1], tokens[2]].map(|t| parse_component(t, line_no));
	Some(Color::from(rgb))
}

impl Palette {
	fn from_gpl_internal<R: Read>(mut reader: R, source: &str) -> Result<Palette, PaletteError> {
		let mut buf = Vec::new();
		reader.read_to_end(&mut buf)?;

		let text = String::from_utf8_lossy(&buf);
		let text = text.strip_prefix(BOM).unwrap_or(&text);
		let mut lines = LINE_BREAK.split(text);

		let magic = lines.next().unwrap_or_default();
		if magic != GIMP_MAGIC {
			return Err(PaletteError::InvalidHeader { found: magic.to_string() });
		}

		let name_line = lines.next().unwrap_or_default();
		let name = match name_line.strip_prefix(NAME_PREFIX) {
			Some(name) => name.trim_matches(|c: char| c.is_ascii_whitespace()),
			None => return Err(PaletteError::MissingName { found: name_line.to_string() }),
		};

		let filename = (!source.is_empty()).then(|| source.to_string());
		let mut pal = Palette::new(name, filename);

		for (i, line) in lines.enumerate() {
			// the first two lines were the header
			let line_no = i + 3;
			match parse_color_line(line, line_no) {
				Some(col) => pal.append_color(col),
				None => tracing::trace!(line = line_no, "skipped line"),
			}
		}

		pal.modified = false;
		Ok(pal)
	}

	/// Reads a GIMP palette from any byte stream. `source` names where the data came from and
	/// becomes the palette's filename. Pass an empty string to derive it from the palette name.
	pub fn from_gpl_reader<R: Read>(reader: R, source: &str) -> Result<Palette, PaletteError> {
		Self::from_gpl_internal(reader, source)
	}

	pub fn from_gpl_string<S: AsRef<str>>(s: S, source: &str) -> Result<Palette, PaletteError> {
		Self::from_gpl_internal(s.as_ref().as_bytes(), source)
	}

	/// Loads a GIMP palette file. The palette's filename is the file name of `path`.
	pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Palette, PaletteError> {
		let path = path.as_ref();
		let f = File::open(path)?;
		let source = path.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_default();

		let pal = Self::from_gpl_internal(BufReader::new(f), &source)?;
		tracing::debug!(path = %path.display(), name = pal.name(), colors = pal.count(), "loaded palette");
		Ok(pal)
	}

	/// Renders the palette in GIMP palette format without touching the modified flag.
	///
	/// The format has no way to escape line breaks, so any `\r` or `\n` in the name is written as a
	/// space. Such a name reads back with spaces in place of the line breaks.
	pub fn to_gpl_string(&self) -> String {
		let name = self.name().replace(['\r', '\n'], " ");
		let mut out = format!("{GIMP_MAGIC}\n{NAME_PREFIX} {name}\n#\n");
		for c in self.colors() {
			out.push_str(&format!("{} {} {}\t{DEFAULT_COLOR_LABEL}\n", c.r, c.g, c.b));
		}
		out
	}

	/// Writes the palette to `writer` and marks it as unmodified once everything was written.
	pub fn write_gpl<W: Write>(&mut self, mut writer: W) -> Result<(), PaletteError> {
		writer.write_all(self.to_gpl_string().as_bytes())?;
		writer.flush()?;
		self.modified = false;
		Ok(())
	}

	/// Saves the palette to `path`.
	///
	/// The data is written to a temporary file next to `path` first, which then replaces `path`.
	/// If anything fails, an existing file at `path` is left as it was and the palette stays
	/// modified.
	pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), PaletteError> {
		let path = path.as_ref();
		let dir = match path.parent() {
			Some(p) if !p.as_os_str().is_empty() => p,
			_ => Path::new("."),
		};

		let mut temp_file = Builder::new()
			.prefix(".palette")
			.suffix(&format!(".{GPL_EXTENSION}"))
			.tempfile_in(dir)?;

		temp_file.write_all(self.to_gpl_string().as_bytes())?;
		temp_file.as_file().sync_all()?;

		// keep the permissions of the file we're replacing
		if let Ok(meta) = fs::metadata(path) {
			fs::set_permissions(temp_file.path(), meta.permissions())?;
		}

		temp_file.persist(path).map_err(|e| e.error)?;

		self.modified = false;
		tracing::debug!(path = %path.display(), name = self.name(), colors = self.count(), "saved palette");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn components_saturate() {
		assert_eq!(parse_component("300", 1), 255);
		assert_eq!(parse_component("-4", 1), 0);
		assert_eq!(parse_component("+12", 1), 12);
		assert_eq!(parse_component("12abc", 1), 0);
		assert_eq!(parse_component("99999999999", 1), 0);
	}

	#[test]
	fn color_lines() {
		assert_eq!(parse_color_line("255 0 0\tRed", 1), Some(Color::new(255, 0, 0)));
		assert_eq!(parse_color_line("\t 1\t\t2  3", 1), Some(Color::new(1, 2, 3)));
		assert_eq!(parse_color_line("Columns: 16", 1), None);
		assert_eq!(parse_color_line("  # 1 2 3", 1), None);
		assert_eq!(parse_color_line("   ", 1), None);
		assert_eq!(parse_color_line("", 1), None);
		assert_eq!(parse_color_line("a b c", 1), Some(Color::new(0, 0, 0)));
	}

	#[test]
	fn line_endings() {
		for sep in ["\n", "\r\n", "\r"] {
			let s = ["GIMP Palette", "Name: Endings", "1 2 3", "4 5 6", ""].join(sep);
			let pal = Palette::from_gpl_string(&s, "").unwrap();
			assert_eq!(pal.name(), "Endings");
			assert_eq!(pal.colors(), &[Color::new(1, 2, 3), Color::new(4, 5, 6)]);
		}
	}

	#[test]
	fn byte_order_mark() {
		let pal = Palette::from_gpl_string("\u{FEFF}GIMP Palette\nName: BOM\n7 8 9\n", "").unwrap();
		assert_eq!(pal.colors(), &[Color::new(7, 8, 9)]);
	}
}
