pub(crate) mod pal_default;
pub(crate) mod pal_gpl;
pub mod palette;

pub use self::palette::{Color, Palette, PaletteError};

pub const GPL_EXTENSION: &str = "gpl";
pub const DEFAULT_PALETTE_NAME: &str = "Default";

const GIMP_MAGIC: &str = "GIMP Palette";
const NAME_PREFIX: &str = "Name:";
const DEFAULT_COLOR_LABEL: &str = "Untitled";
