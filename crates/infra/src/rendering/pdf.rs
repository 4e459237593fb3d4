//! PDF document writer built on `lopdf`
//!
//! Lays out A4 portrait pages top to bottom with the standard Helvetica
//! fonts, so no font files are embedded. Text is encoded as WinAnsi; any
//! character outside Latin-1 is written as `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use recarga_core::{DocumentWriter, DocumentWriterFactory, RasterImage};
use recarga_domain::{DashboardError, Result};
use tracing::debug;

use crate::errors::InfraError;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const HEADING_SIZE: f32 = 18.0;
const CAPTION_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 18.0;
const CELL_PADDING: f32 = 4.0;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Writes one PDF document; see [`DocumentWriter`].
pub struct PdfDocumentWriter {
    doc: Document,
    pages_id: ObjectId,
    fonts_id: ObjectId,
    title: String,
    pages: Vec<ObjectId>,
    ops: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
    cursor: f32,
}

impl PdfDocumentWriter {
    pub fn new(title: &str) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(font("Helvetica"));
        let bold = doc.add_object(font("Helvetica-Bold"));
        let fonts_id = doc.add_object(dictionary! {
            REGULAR => regular,
            BOLD => bold,
        });

        Self {
            doc,
            pages_id,
            fonts_id,
            title: title.to_string(),
            pages: Vec::new(),
            ops: Vec::new(),
            images: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn page_is_blank(&self) -> bool {
        self.ops.is_empty()
    }

    /// Start a new page unless `needed` points still fit on this one.
    fn reserve(&mut self, needed: f32) -> Result<()> {
        if self.cursor - needed < MARGIN && !self.page_is_blank() {
            self.flush_page()?;
        }
        Ok(())
    }

    fn flush_page(&mut self) -> Result<()> {
        let content = Content { operations: std::mem::take(&mut self.ops) };
        let encoded = content.encode().map_err(InfraError::from)?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

        let mut xobjects = Dictionary::new();
        for (name, id) in self.images.drain(..) {
            xobjects.set(name, id);
        }
        let resources = dictionary! {
            "Font" => self.fonts_id,
            "XObject" => xobjects,
        };

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.pages.push(page_id);
        self.cursor = PAGE_HEIGHT - MARGIN;
        Ok(())
    }

    fn text(&mut self, font_name: &str, size: f32, x: f32, y: f32, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("Tf", vec![font_name.into(), size.into()]));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn line(&mut self, font_name: &str, size: f32, text: &str) -> Result<()> {
        let leading = size * 1.4;
        self.reserve(leading)?;
        self.cursor -= leading;
        let y = self.cursor;
        self.text(font_name, size, MARGIN, y, text);
        Ok(())
    }

    fn table_row(&mut self, cells: &[String], bold: bool) {
        let columns = cells.len().max(1) as f32;
        let width = CONTENT_WIDTH / columns;
        let bottom = self.cursor - ROW_HEIGHT;

        self.ops.push(Operation::new("w", vec![0.5.into()]));
        for (i, cell) in cells.iter().enumerate() {
            let x = MARGIN + width * i as f32;
            self.ops.push(Operation::new(
                "re",
                vec![x.into(), bottom.into(), width.into(), ROW_HEIGHT.into()],
            ));
            self.ops.push(Operation::new("S", vec![]));
            let fitted = truncate(cell, width - 2.0 * CELL_PADDING, BODY_SIZE);
            let font_name = if bold { BOLD } else { REGULAR };
            self.text(font_name, BODY_SIZE, x + CELL_PADDING, bottom + 5.0, &fitted);
        }
        self.cursor = bottom;
    }
}

impl DocumentWriter for PdfDocumentWriter {
    fn heading(&mut self, text: &str) -> Result<()> {
        self.line(BOLD, HEADING_SIZE, text)?;
        self.cursor -= HEADING_SIZE * 0.5;
        Ok(())
    }

    fn paragraph(&mut self, text: &str) -> Result<()> {
        for line in wrap(text, CONTENT_WIDTH, BODY_SIZE) {
            self.line(REGULAR, BODY_SIZE, &line)?;
        }
        self.cursor -= BODY_SIZE * 0.5;
        Ok(())
    }

    fn table(&mut self, caption: &str, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
        let header: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();

        self.reserve(CAPTION_SIZE * 1.4 + ROW_HEIGHT * 2.0)?;
        self.line(BOLD, CAPTION_SIZE, caption)?;
        self.cursor -= 4.0;
        self.table_row(&header, true);

        for row in rows {
            if row.len() != headers.len() {
                return Err(DashboardError::Export(format!(
                    "table '{caption}' row has {} cells, expected {}",
                    row.len(),
                    headers.len()
                )));
            }
            if self.cursor - ROW_HEIGHT < MARGIN {
                self.flush_page()?;
                self.table_row(&header, true);
            }
            self.table_row(row, false);
        }
        self.cursor -= ROW_HEIGHT;
        Ok(())
    }

    fn image_page(&mut self, caption: &str, image: &RasterImage) -> Result<()> {
        if !image.is_well_formed() {
            return Err(DashboardError::Export(format!(
                "image '{caption}' buffer does not match {}x{}",
                image.width, image.height
            )));
        }
        if !self.page_is_blank() {
            self.flush_page()?;
        }

        let mut stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width),
                "Height" => i64::from(image.height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            image.rgb.clone(),
        );
        // Flate keeps flat-colour charts small; on failure the stream stays raw.
        if let Err(e) = stream.compress() {
            debug!(error = %e, caption, "image stream left uncompressed");
        }
        let image_id = self.doc.add_object(stream);
        let name = format!("Im{}", self.pages.len() + 1);
        self.images.push((name.clone(), image_id));

        self.line(BOLD, CAPTION_SIZE, caption)?;
        let scale = CONTENT_WIDTH / image.width as f32;
        let drawn_height = image.height as f32 * scale;
        let y = self.cursor - 10.0 - drawn_height;
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                CONTENT_WIDTH.into(),
                0.into(),
                0.into(),
                drawn_height.into(),
                MARGIN.into(),
                y.into(),
            ],
        ));
        self.ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        self.ops.push(Operation::new("Q", vec![]));

        self.flush_page()
    }

    fn finish(mut self: Box<Self>) -> Result<Vec<u8>> {
        if !self.page_is_blank() || self.pages.is_empty() {
            self.flush_page()?;
        }

        let kids: Vec<Object> = self.pages.iter().map(|id| (*id).into()).collect();
        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::String(win_ansi(&self.title), StringFormat::Literal),
            "Producer" => Object::string_literal("recarga-dashboard"),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes).map_err(InfraError::from)?;
        debug!(pages = count, bytes = bytes.len(), "pdf document serialized");
        Ok(bytes)
    }
}

/// Hands out a fresh [`PdfDocumentWriter`] per export.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfWriterFactory;

impl DocumentWriterFactory for PdfWriterFactory {
    fn create(&self, title: &str) -> Box<dyn DocumentWriter> {
        Box::new(PdfDocumentWriter::new(title))
    }
}

fn font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')).collect()
}

/// Rough Helvetica advance: half the font size per character.
fn text_width(chars: usize, size: f32) -> f32 {
    chars as f32 * size * 0.5
}

fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let max_chars = ((width / (size * 0.5)) as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = current.chars().count() + word.chars().count() + 1;
        if !current.is_empty() && candidate > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn truncate(text: &str, width: f32, size: f32) -> String {
    let count = text.chars().count();
    if text_width(count, size) <= width {
        return text.to_string();
    }
    let keep = ((width / (size * 0.5)) as usize).saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> RasterImage {
        RasterImage { width, height, rgb: vec![200; (width * height * 3) as usize] }
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let writer: Box<dyn DocumentWriter> = PdfWriterFactory.create("Vazio");
        let bytes = writer.finish().unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_images_get_their_own_pages() {
        let mut writer = PdfWriterFactory.create("Relatório");
        writer.heading("Relatório Consolidado").unwrap();
        writer.paragraph("Período: 01/08/2025 a 31/08/2025").unwrap();
        writer.image_page("Gráfico A", &image(40, 20)).unwrap();
        writer.image_page("Gráfico B", &image(40, 20)).unwrap();
        writer
            .table("Tabela", &["Categoria", "Valor"], &[vec!["PIX".into(), "R$ 150.00".into()]])
            .unwrap();

        let doc = Document::load_mem(&writer.finish().unwrap()).unwrap();
        // header page, two image pages, table page
        assert_eq!(doc.get_pages().len(), 4);
    }

    #[test]
    fn test_long_table_breaks_across_pages() {
        let rows: Vec<Vec<String>> =
            (0..120).map(|i| vec![format!("PDV {i}"), format!("R$ {i}.00")]).collect();
        let mut writer = PdfWriterFactory.create("Rankings");
        writer.table("PDVs", &["PDV", "Faturamento"], &rows).unwrap();

        let doc = Document::load_mem(&writer.finish().unwrap()).unwrap();
        assert!(doc.get_pages().len() >= 3);
    }

    #[test]
    fn test_ragged_rows_and_bad_images_are_rejected() {
        let mut writer = PdfWriterFactory.create("x");
        let err = writer.table("t", &["a", "b"], &[vec!["only one".into()]]).unwrap_err();
        assert_eq!(err.label(), "export");

        let broken = RasterImage { width: 10, height: 10, rgb: vec![0; 3] };
        assert!(writer.image_page("broken", &broken).is_err());
    }

    #[test]
    fn test_win_ansi_keeps_latin1_and_replaces_others() {
        assert_eq!(win_ansi("Média"), vec![b'M', 0xE9, b'd', b'i', b'a']);
        assert_eq!(win_ansi("a→b"), b"a?b".to_vec());
    }

    #[test]
    fn test_wrap_and_truncate() {
        let lines = wrap("um dois tres quatro cinco", 40.0, 10.0);
        assert!(lines.iter().all(|line| line.chars().count() <= 8));
        assert_eq!(lines.join(" "), "um dois tres quatro cinco");
        assert_eq!(truncate("abcdefghijklmnop", 50.0, 10.0), "abcdefg...");
    }
}
