//! Recording fakes for the export ports.

use std::sync::{Arc, Mutex};

use recarga_core::{ChartRenderer, ChartSpec, DocumentWriter, DocumentWriterFactory, RasterImage};
use recarga_domain::{DashboardError, Result as DomainResult};

/// One call made on a [`RecordingWriter`].
#[derive(Debug, Clone, PartialEq)]
pub enum WrittenBlock {
    Heading(String),
    Paragraph(String),
    Table { caption: String, headers: Vec<String>, rows: Vec<Vec<String>> },
    Image { caption: String, width: u32, height: u32 },
}

/// Blocks written by every writer a factory handed out.
pub type Journal = Arc<Mutex<Vec<WrittenBlock>>>;

/// Renders every chart to a tiny solid image and records its title.
#[derive(Default)]
pub struct FakeChartRenderer {
    pub rendered: Mutex<Vec<String>>,
    pub fail: bool,
}

impl FakeChartRenderer {
    pub fn failing() -> Self {
        Self { rendered: Mutex::new(Vec::new()), fail: true }
    }
}

impl ChartRenderer for FakeChartRenderer {
    fn rasterize(&self, chart: &ChartSpec) -> DomainResult<RasterImage> {
        if self.fail {
            return Err(DashboardError::Render(format!("cannot draw {}", chart.title)));
        }
        self.rendered.lock().unwrap().push(chart.title.clone());
        Ok(RasterImage { width: 2, height: 2, rgb: vec![255; 12] })
    }
}

pub struct RecordingWriter {
    journal: Journal,
}

impl DocumentWriter for RecordingWriter {
    fn heading(&mut self, text: &str) -> DomainResult<()> {
        self.journal.lock().unwrap().push(WrittenBlock::Heading(text.into()));
        Ok(())
    }

    fn paragraph(&mut self, text: &str) -> DomainResult<()> {
        self.journal.lock().unwrap().push(WrittenBlock::Paragraph(text.into()));
        Ok(())
    }

    fn table(&mut self, caption: &str, headers: &[&str], rows: &[Vec<String>]) -> DomainResult<()> {
        self.journal.lock().unwrap().push(WrittenBlock::Table {
            caption: caption.into(),
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows.to_vec(),
        });
        Ok(())
    }

    fn image_page(&mut self, caption: &str, image: &RasterImage) -> DomainResult<()> {
        self.journal.lock().unwrap().push(WrittenBlock::Image {
            caption: caption.into(),
            width: image.width,
            height: image.height,
        });
        Ok(())
    }

    fn finish(self: Box<Self>) -> DomainResult<Vec<u8>> {
        Ok(b"%PDF-fake".to_vec())
    }
}

#[derive(Default)]
pub struct RecordingWriterFactory {
    pub journal: Journal,
}

impl RecordingWriterFactory {
    pub fn blocks(&self) -> Vec<WrittenBlock> {
        self.journal.lock().unwrap().clone()
    }

    /// All cell text written in tables, flattened.
    pub fn table_cells(&self) -> Vec<String> {
        self.blocks()
            .into_iter()
            .filter_map(|block| match block {
                WrittenBlock::Table { rows, .. } => Some(rows.into_iter().flatten()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

impl DocumentWriterFactory for RecordingWriterFactory {
    fn create(&self, _title: &str) -> Box<dyn DocumentWriter> {
        Box::new(RecordingWriter { journal: self.journal.clone() })
    }
}
