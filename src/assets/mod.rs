/// Photo decoding into paint-ready pixmaps.
pub mod decode;
