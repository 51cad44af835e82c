//! Physical page geometry.

use std::fmt;
use std::str::FromStr;

use super::error::ExportError;

/// Millimetres per inch.
const MM_PER_INCH: f64 = 25.4;

/// A4 short edge in millimetres.
pub const A4_SHORT_MM: f64 = 210.0;

/// A4 long edge in millimetres.
pub const A4_LONG_MM: f64 = 297.0;

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Lower-case name, as used in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }

    /// Page width and height in millimetres.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            Orientation::Portrait => (A4_SHORT_MM, A4_LONG_MM),
            Orientation::Landscape => (A4_LONG_MM, A4_SHORT_MM),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(ExportError::InvalidOrientation(s.to_string())),
        }
    }
}

/// Output page size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Pixel size of an A4 page at `dpi`: `round(mm / 25.4 × dpi)` per edge.
///
/// ```
/// use mapsheet::export::{a4_dimensions, Orientation};
///
/// let page = a4_dimensions(Orientation::Portrait, 300);
/// assert_eq!((page.width, page.height), (2480, 3508));
/// ```
pub fn a4_dimensions(orientation: Orientation, dpi: u32) -> PageSize {
    let (width_mm, height_mm) = orientation.dimensions_mm();
    PageSize {
        width: mm_to_px(width_mm, dpi),
        height: mm_to_px(height_mm, dpi),
    }
}

/// Width-to-height ratio of an A4 page.
pub fn a4_ratio(orientation: Orientation) -> f64 {
    let (width_mm, height_mm) = orientation.dimensions_mm();
    width_mm / height_mm
}

#[inline]
fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    (mm / MM_PER_INCH * dpi as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_portrait_300_dpi() {
        let page = a4_dimensions(Orientation::Portrait, 300);
        assert_eq!(page, PageSize { width: 2480, height: 3508 });
    }

    #[test]
    fn test_a4_landscape_swaps() {
        let page = a4_dimensions(Orientation::Landscape, 300);
        assert_eq!(page, PageSize { width: 3508, height: 2480 });
    }

    #[test]
    fn test_a4_other_resolutions() {
        assert_eq!(
            a4_dimensions(Orientation::Portrait, 72),
            PageSize { width: 595, height: 842 }
        );
        assert_eq!(
            a4_dimensions(Orientation::Portrait, 150),
            PageSize { width: 1240, height: 1754 }
        );
    }

    #[test]
    fn test_ratio() {
        assert!((a4_ratio(Orientation::Portrait) - 210.0 / 297.0).abs() < 1e-12);
        assert!((a4_ratio(Orientation::Landscape) - 297.0 / 210.0).abs() < 1e-12);
    }

    #[test]
    fn test_orientation_parse_and_display() {
        assert_eq!("portrait".parse::<Orientation>().unwrap(), Orientation::Portrait);
        assert_eq!(" Landscape ".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert!("square".parse::<Orientation>().is_err());
        assert_eq!(Orientation::Landscape.to_string(), "landscape");
    }

    #[test]
    fn test_page_size_display() {
        assert_eq!(PageSize { width: 10, height: 20 }.to_string(), "10×20");
    }
}
