//! Rendering ports used by the export pipeline

use recarga_domain::Result;

use crate::reports::ChartSpec;

/// An 8-bit RGB bitmap, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl RasterImage {
    /// Whether the buffer length matches the dimensions.
    pub fn is_well_formed(&self) -> bool {
        let expected = u64::from(self.width) * u64::from(self.height) * 3;
        self.width > 0 && self.height > 0 && self.rgb.len() as u64 == expected
    }
}

/// Turns a chart description into a bitmap.
pub trait ChartRenderer: Send + Sync {
    fn rasterize(&self, chart: &ChartSpec) -> Result<RasterImage>;
}

/// Sequential document builder.
///
/// Calls append to the document in order; nothing is visible outside the
/// writer until [`DocumentWriter::finish`] returns the serialized bytes.
pub trait DocumentWriter: Send {
    fn heading(&mut self, text: &str) -> Result<()>;

    fn paragraph(&mut self, text: &str) -> Result<()>;

    /// A bordered table under a caption. Every row has `headers.len()` cells.
    fn table(&mut self, caption: &str, headers: &[&str], rows: &[Vec<String>]) -> Result<()>;

    /// Place `image` on a page of its own, under `caption`.
    fn image_page(&mut self, caption: &str, image: &RasterImage) -> Result<()>;

    fn finish(self: Box<Self>) -> Result<Vec<u8>>;
}

/// Creates a fresh [`DocumentWriter`] per export.
pub trait DocumentWriterFactory: Send + Sync {
    fn create(&self, title: &str) -> Box<dyn DocumentWriter>;
}
