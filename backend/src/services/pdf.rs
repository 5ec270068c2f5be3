//! PDF invoice renderer
//!
//! Draws a composed [`InvoiceLayout`] onto A4 pages. The geometry is fixed
//! in millimetres to line up with the firm's pre-printed stationery: the
//! letterhead PNG stretched over the whole page, a centered title,
//! right-aligned metadata, the "Bill To" block, the centered six-column
//! item table, and on the final page the warranty text, amount-in-words
//! line and signature rule.
//!
//! The renderer is stateless over a layout: all page-splitting of table
//! rows happened in the composer; the only layout decision left here is
//! whether the trailing block still fits under the table or needs a fresh
//! page.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use printpdf::path::PaintMode;
use printpdf::*;

use shared::layout::{InvoiceLayout, InvoicePage, LayoutRow};

use crate::config::InvoiceConfig;
use crate::error::{AppError, AppResult};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;

/// Vertical space the warranty + amount-in-words + signature block needs
const TRAILING_BLOCK_HEIGHT: f32 = 45.0;

/// Minimum space that must remain below the trailing block
const FOOTER_SAFE_MARGIN: f32 = 35.0;

const COLUMN_WIDTHS: [f32; 6] = [15.0, 70.0, 25.0, 20.0, 25.0, 30.0];
const ROW_HEIGHT: f32 = 6.0;
const CELL_PADDING: f32 = 2.0;

/// Approximate mm per pt for Helvetica's average glyph width; printpdf has
/// no metrics for built-in fonts, and the columns are wide enough that an
/// estimate keeps right/center alignment visually correct
const GLYPH_WIDTH_FACTOR: f32 = 0.5 * 0.352_778;

const WARRANTY_LINES: [&str; 3] = [
    "We, being persons resident in Pakistan, carrying on business at 19A Extension Block, Ittefaq Town,",
    "Multan Road, Lahore under the name of M/s Ramay Electromedics do hereby give this warranty that the",
    "IOLs described above as sold by us do not contravene the provisions of Section 23 of Drug Act, 1976.",
];

/// Presentation flags supplied with each save request
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Draw the letterhead image behind every page
    pub use_letterhead: bool,
    /// Print the tax identification line in the header
    pub print_ntn: bool,
}

/// Stateless invoice PDF renderer
pub struct PdfRenderer {
    letterhead_path: PathBuf,
    ntn_number: String,
    trailing_blank_page: bool,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfRenderer {
    pub fn new(config: &InvoiceConfig) -> Self {
        Self {
            letterhead_path: PathBuf::from(&config.letterhead_path),
            ntn_number: config.ntn_number.clone(),
            trailing_blank_page: config.trailing_blank_page,
        }
    }

    /// Render a composed layout to PDF bytes
    pub fn render(&self, layout: &InvoiceLayout, options: &RenderOptions) -> AppResult<Vec<u8>> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            format!("Invoice {}", layout.invoice_no),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Layer 1",
        );

        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_err)?,
        };

        // Loaded once, stamped onto each page; missing or undecodable files
        // degrade to plain pages
        let letterhead = if options.use_letterhead {
            self.load_letterhead()
        } else {
            None
        };

        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        draw_letterhead(&layer, &letterhead);

        // Header and Bill To appear on the first page only; continuation
        // pages carry just the letterhead and the table
        let header_bottom_y = PAGE_HEIGHT - 42.0;
        draw_header(&layer, &fonts, layout, options, &self.ntn_number, header_bottom_y);

        let bill_to_y = header_bottom_y - 10.0 - 6.0;
        let address_lines = layout.bill_to.address_lines();
        draw_bill_to(&layer, &fonts, layout, &address_lines, bill_to_y);

        let table_top_y = bill_to_y - address_lines.len() as f32 * 5.0 - 22.0;

        let last_index = layout.pages.len() - 1;
        for (page_index, page) in layout.pages.iter().enumerate() {
            if page_index > 0 {
                let (page_ref, layer_ref) =
                    doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                layer = doc.get_page(page_ref).get_layer(layer_ref);
                draw_letterhead(&layer, &letterhead);
            }

            let table_bottom_y = draw_table(&layer, &fonts, page, table_top_y);

            if page_index == last_index {
                let start_y = if table_bottom_y - TRAILING_BLOCK_HEIGHT < FOOTER_SAFE_MARGIN {
                    // Not enough room under the table: re-anchor the block
                    // near the top of a fresh page
                    let (page_ref, layer_ref) =
                        doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                    layer = doc.get_page(page_ref).get_layer(layer_ref);
                    draw_letterhead(&layer, &letterhead);
                    PAGE_HEIGHT - 70.0
                } else {
                    table_bottom_y - 15.0
                };

                draw_trailing_block(&layer, &fonts, layout, start_y);
            }
        }

        // Binding convention: a blank page after the last content page
        if self.trailing_blank_page {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        }

        doc.save_to_bytes().map_err(render_err)
    }

    fn load_letterhead(&self) -> Option<ImageXObject> {
        let file = match File::open(&self.letterhead_path) {
            Ok(file) => file,
            Err(_) => {
                tracing::debug!(path = %self.letterhead_path.display(), "letterhead not found, rendering without it");
                return None;
            }
        };
        let decoder = match image_crate::codecs::png::PngDecoder::new(BufReader::new(file)) {
            Ok(decoder) => decoder,
            Err(e) => {
                tracing::warn!("letterhead is not a readable PNG: {}", e);
                return None;
            }
        };
        match Image::try_from(decoder) {
            Ok(image) => Some(image.image),
            Err(e) => {
                tracing::warn!("letterhead could not be embedded: {}", e);
                None
            }
        }
    }
}

fn render_err(err: printpdf::Error) -> AppError {
    AppError::Render(err.to_string())
}

/// Stretch the letterhead over the full page
fn draw_letterhead(layer: &PdfLayerReference, letterhead: &Option<ImageXObject>) {
    let Some(xobject) = letterhead else {
        return;
    };

    const DPI: f32 = 300.0;
    let width_mm = xobject.width.0 as f32 * 25.4 / DPI;
    let height_mm = xobject.height.0 as f32 * 25.4 / DPI;
    if width_mm <= 0.0 || height_mm <= 0.0 {
        return;
    }

    Image::from(xobject.clone()).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            scale_x: Some(PAGE_WIDTH / width_mm),
            scale_y: Some(PAGE_HEIGHT / height_mm),
            dpi: Some(DPI),
            ..Default::default()
        },
    );
}

fn draw_header(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    layout: &InvoiceLayout,
    options: &RenderOptions,
    ntn_number: &str,
    header_bottom_y: f32,
) {
    set_black(layer);
    draw_centered(layer, &fonts.bold, "INVOICE", 16.0, PAGE_WIDTH / 2.0, header_bottom_y - 5.0);

    let meta_x = PAGE_WIDTH - 20.0;
    let line_height = 6.0;
    let mut current_y = header_bottom_y - 12.0;

    if options.print_ntn {
        draw_right(layer, &fonts.bold, &format!("NTN No # {}", ntn_number), 11.0, meta_x, current_y);
        current_y -= line_height;
    }
    draw_right(layer, &fonts.bold, &format!("Invoice No: {}", layout.invoice_no), 11.0, meta_x, current_y);
    current_y -= line_height;
    draw_right(layer, &fonts.bold, &format!("Date: {}", layout.date), 11.0, meta_x, current_y);
}

fn draw_bill_to(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    layout: &InvoiceLayout,
    address_lines: &[&str],
    bill_to_y: f32,
) {
    let bill_to_x = 20.0;
    let name_x = bill_to_x + 16.0;

    set_black(layer);
    layer.use_text("Bill To:", 12.0, Mm(bill_to_x), Mm(bill_to_y), &fonts.bold);
    layer.use_text(&layout.bill_to.name, 12.0, Mm(name_x), Mm(bill_to_y), &fonts.regular);

    for (i, line) in address_lines.iter().enumerate() {
        layer.use_text(
            *line,
            10.0,
            Mm(name_x),
            Mm(bill_to_y - 6.0 - 5.0 * i as f32),
            &fonts.regular,
        );
    }
}

/// Draw one page's item table; returns the y of the table bottom
fn draw_table(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    page: &InvoicePage,
    table_top_y: f32,
) -> f32 {
    let table_width: f32 = COLUMN_WIDTHS.iter().sum();
    let table_x = (PAGE_WIDTH - table_width) / 2.0;

    let header = ["#", "DESCRIPTION", "POWER", "QTY", "RATE", "AMOUNT"];

    // Header row: dark band with white bold labels
    let header_bottom = table_top_y - ROW_HEIGHT;
    fill_rect(layer, table_x, header_bottom, table_width, ROW_HEIGHT, (0.165, 0.184, 0.553));
    set_fill(layer, (1.0, 1.0, 1.0));
    draw_row_text(layer, &fonts.bold, &header, table_x, table_top_y);

    // Body rows with a light grid
    set_black(layer);
    let body_top = header_bottom;
    let mut y = body_top;
    for row in &page.rows {
        y -= ROW_HEIGHT;
        draw_row_text(layer, &fonts.regular, &row.cells(), table_x, y + ROW_HEIGHT);
    }
    let body_bottom = y;
    draw_grid(layer, table_x, body_top, body_bottom, page.rows.len());

    // Distinct TOTAL row on the final page
    let mut bottom = body_bottom;
    if let Some(total_row) = &page.total_row {
        let row_bottom = bottom - ROW_HEIGHT;
        fill_rect(layer, table_x, row_bottom, table_width, ROW_HEIGHT, (0.96, 0.96, 0.96));
        set_black(layer);
        set_outline(layer, (0.0, 0.0, 0.0), 1.0);
        horizontal_line(layer, table_x, table_x + table_width, bottom);
        draw_row_text(layer, &fonts.bold, &total_row.cells(), table_x, bottom);
        bottom = row_bottom;
    }

    bottom
}

/// Warranty text, amount-in-words and signature rule (final page only)
fn draw_trailing_block(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    layout: &InvoiceLayout,
    start_y: f32,
) {
    let table_width: f32 = COLUMN_WIDTHS.iter().sum();
    let table_x = (PAGE_WIDTH - table_width) / 2.0;
    let line_gap = 4.5;

    set_black(layer);
    let mut y = start_y;
    for line in WARRANTY_LINES {
        layer.use_text(line, 10.0, Mm(table_x), Mm(y), &fonts.regular);
        y -= line_gap;
    }

    layer.use_text(
        format!("Amount (in words): {}", layout.amount_in_words),
        11.0,
        Mm(table_x),
        Mm(y - 6.0),
        &fonts.bold,
    );

    // Signature rule flush with the table's right edge
    let sig_y = y - 24.0;
    let sig_len = 60.0;
    let sig_x = table_x + table_width - sig_len;

    set_outline(layer, (0.0, 0.0, 0.0), 1.0);
    horizontal_line(layer, sig_x, sig_x + sig_len, sig_y);
    layer.use_text("Authorized Signatory", 9.0, Mm(sig_x), Mm(sig_y - 6.0), &fonts.regular);
}

fn draw_row_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    cells: &[&str; 6],
    table_x: f32,
    row_top_y: f32,
) {
    let baseline_y = row_top_y - ROW_HEIGHT + 1.8;
    let mut x = table_x;
    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        if !cell.is_empty() {
            layer.use_text(*cell, 9.0, Mm(x + CELL_PADDING), Mm(baseline_y), font);
        }
        x += width;
    }
}

/// Light grey grid around the body rows only; the header band and the TOTAL
/// row are styled by their backgrounds instead
fn draw_grid(
    layer: &PdfLayerReference,
    table_x: f32,
    body_top: f32,
    body_bottom: f32,
    row_count: usize,
) {
    if row_count == 0 {
        return;
    }
    let table_width: f32 = COLUMN_WIDTHS.iter().sum();
    set_outline(layer, (0.83, 0.83, 0.83), 0.35);

    for i in 0..=row_count {
        let y = body_top - i as f32 * ROW_HEIGHT;
        horizontal_line(layer, table_x, table_x + table_width, y);
    }

    let mut x = table_x;
    vertical_line(layer, x, body_top, body_bottom);
    for width in COLUMN_WIDTHS {
        x += width;
        vertical_line(layer, x, body_top, body_bottom);
    }
}

fn fill_rect(
    layer: &PdfLayerReference,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: (f32, f32, f32),
) {
    set_fill(layer, color);
    let rect = Rect::new(Mm(x), Mm(y), Mm(x + width), Mm(y + height)).with_mode(PaintMode::Fill);
    layer.add_rect(rect);
}

fn horizontal_line(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn vertical_line(layer: &PdfLayerReference, x: f32, y1: f32, y2: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x), Mm(y1)), false),
            (Point::new(Mm(x), Mm(y2)), false),
        ],
        is_closed: false,
    });
}

fn draw_centered(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    size: f32,
    center_x: f32,
    y: f32,
) {
    let width = estimate_width(text, size);
    layer.use_text(text, size, Mm(center_x - width / 2.0), Mm(y), font);
}

fn draw_right(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    size: f32,
    right_x: f32,
    y: f32,
) {
    let width = estimate_width(text, size);
    layer.use_text(text, size, Mm(right_x - width), Mm(y), font);
}

fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH_FACTOR
}

fn set_black(layer: &PdfLayerReference) {
    set_fill(layer, (0.0, 0.0, 0.0));
}

fn set_fill(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

fn set_outline(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32), thickness: f32) {
    layer.set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
    layer.set_outline_thickness(thickness);
}
