pub mod constants;
pub mod frames;
pub mod geometry;
pub mod interpolation;
pub mod reader;
pub mod table;
pub mod tecplot_errors;
pub mod writer;
