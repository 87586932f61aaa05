//! Ordered RGB color palettes stored in the GIMP palette (`.gpl`) text format.

pub mod palettes;
