//! PDF rendering of a [`Layout`]

use crate::error::DocumentResult;
use crate::layout::{self, Align, Element, Layout};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect,
    Rgb,
};
use tracing::debug;

const LAYER_NAME: &str = "content";

/// Render every page of `layout` with Helvetica
pub fn render(layout: &Layout) -> DocumentResult<Vec<u8>> {
    let (width, height) = (layout.width(), layout.height());
    let (doc, first_page, first_layer) =
        PdfDocument::new(layout.title(), Mm(width), Mm(height), LAYER_NAME);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    for (index, page) in layout.pages().iter().enumerate() {
        let canvas = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_ref, layer_ref) = doc.add_page(Mm(width), Mm(height), LAYER_NAME);
            doc.get_page(page_ref).get_layer(layer_ref)
        };

        for element in &page.elements {
            draw(&canvas, &font, height, element);
        }
    }

    let bytes = doc.save_to_bytes()?;
    debug!(title = layout.title(), pages = layout.page_count(), size = bytes.len(), "pdf rendered");
    Ok(bytes)
}

fn draw(canvas: &PdfLayerReference, font: &IndirectFontRef, page_height: f32, element: &Element) {
    match element {
        Element::Text {
            text,
            x,
            y,
            size,
            color,
            align,
        } => {
            let x = match align {
                Align::Left => *x,
                Align::Center => x - layout::text_width(text, *size) / 2.0,
            };
            canvas.set_fill_color(pdf_color(*color));
            canvas.use_text(text.as_str(), *size, Mm(x), Mm(page_height - y), font);
        }
        Element::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            canvas.set_fill_color(pdf_color(*color));
            canvas.add_rect(rect(*x, *y, *width, *height, page_height).with_mode(PaintMode::Fill));
        }
        Element::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            thickness,
        } => {
            canvas.set_outline_color(pdf_color(*color));
            canvas.set_outline_thickness(*thickness);
            canvas.add_rect(rect(*x, *y, *width, *height, page_height).with_mode(PaintMode::Stroke));
        }
    }
}

/// Top-left based box to PDF's bottom-left based rectangle
fn rect(x: f32, y: f32, width: f32, height: f32, page_height: f32) -> Rect {
    let bottom = page_height - y - height;
    Rect::new(Mm(x), Mm(bottom), Mm(x + width), Mm(bottom + height))
}

fn pdf_color(color: layout::Color) -> PdfColor {
    let layout::Color(r, g, b) = color;
    PdfColor::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Color, Orientation};

    #[test]
    fn test_renders_every_page() {
        let mut layout = Layout::new("Teste", Orientation::Portrait);
        layout.fill_rect(15.0, 15.0, 180.0, 20.0, Color::HEADER_FILL);
        layout.centered_text("RELATÓRIO", 27.0, 18.0, Color::BRAND);
        layout.add_page();
        layout.stroke_rect(10.0, 10.0, 190.0, 277.0, Color::BRAND, 1.5);
        layout.text("fim", 15.0, 15.0, 10.0, Color::BLACK);

        let bytes = render(&layout).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
