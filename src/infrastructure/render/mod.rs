pub mod svg;

pub use svg::SvgRenderer;
