use anyhow::{anyhow, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use treadline_core::export::{paginate, LineStyle, ReportDocument, ReportPage, LINES_PER_PAGE};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const MARGIN_TOP: f32 = 20.0;
const LINE_HEIGHT: f32 = 5.25;
const FOOTER_Y: f32 = 12.0;
const LAYER: &str = "Layer 1";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    mono: IndirectFontRef,
    mono_bold: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self> {
        let font = |builtin| {
            doc.add_builtin_font(builtin)
                .map_err(|err| anyhow!("load pdf font: {}", err))
        };
        Ok(Self {
            regular: font(BuiltinFont::Helvetica)?,
            bold: font(BuiltinFont::HelveticaBold)?,
            italic: font(BuiltinFont::HelveticaOblique)?,
            mono: font(BuiltinFont::Courier)?,
            mono_bold: font(BuiltinFont::CourierBold)?,
        })
    }

    fn for_style(&self, style: LineStyle) -> (&IndirectFontRef, f32) {
        match style {
            LineStyle::Title => (&self.bold, 16.0),
            LineStyle::Heading => (&self.bold, 12.0),
            LineStyle::Body => (&self.regular, 10.0),
            LineStyle::TableHeader => (&self.mono_bold, 8.0),
            LineStyle::TableRow => (&self.mono, 8.0),
            LineStyle::Note => (&self.italic, 9.0),
        }
    }
}

/// Renders the report as an A4 PDF, one `ReportPage` per sheet.
pub fn render_report_pdf(report: &ReportDocument) -> Result<Vec<u8>> {
    let pages = paginate(report, LINES_PER_PAGE);
    let page_count = pages.len();
    let (doc, first_page, first_layer) =
        PdfDocument::new(&report.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    let fonts = Fonts::load(&doc)?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        draw_page(&layer, &fonts, page, page_count);
    }

    doc.save_to_bytes()
        .map_err(|err| anyhow!("write pdf: {}", err))
}

fn draw_page(
    layer: &printpdf::PdfLayerReference,
    fonts: &Fonts,
    page: &ReportPage,
    page_count: usize,
) {
    let mut y = PAGE_HEIGHT - MARGIN_TOP;
    for line in &page.lines {
        if !line.text.is_empty() {
            let (font, size) = fonts.for_style(line.style);
            layer.use_text(line.text.clone(), size, Mm(MARGIN_LEFT), Mm(y), font);
        }
        y -= LINE_HEIGHT;
    }
    layer.use_text(
        footer(page.number, page_count),
        8.0,
        Mm(MARGIN_LEFT),
        Mm(FOOTER_Y),
        &fonts.regular,
    );
}

fn footer(number: usize, count: usize) -> String {
    format!("Page {} of {}", number, count)
}

#[cfg(test)]
mod tests {
    use super::{footer, render_report_pdf};
    use chrono::FixedOffset;
    use treadline_core::export::{build_report, ReportKind};

    #[test]
    fn footer_numbers_pages() {
        assert_eq!(footer(2, 3), "Page 2 of 3");
    }

    #[test]
    fn renders_empty_report_as_pdf() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let report = build_report(ReportKind::Leads, &[], "all leads", 0, offset, 25);
        let bytes = render_report_pdf(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
