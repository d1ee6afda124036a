//! Page geometry and the element plan rendered into a PDF
//!
//! Coordinates are millimetres measured from the top-left corner of the page,
//! with `y` growing downwards. The renderer flips them into PDF space.

/// A4 short side
pub const A4_SHORT_MM: f32 = 210.0;
/// A4 long side
pub const A4_LONG_MM: f32 = 297.0;
/// Page margin on every side
pub const MARGIN_MM: f32 = 15.0;

/// Distance of footer text from the bottom edge
pub const FOOTER_OFFSET_MM: f32 = 10.0;

const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// `(width, height)` in millimetres
    pub fn size(self) -> (f32, f32) {
        match self {
            Self::Portrait => (A4_SHORT_MM, A4_LONG_MM),
            Self::Landscape => (A4_LONG_MM, A4_SHORT_MM),
        }
    }
}

/// Vertical write position for flowing content.
///
/// Starts at the top margin. Callers advance it after each line and ask
/// whether the next line would fall past the bottom margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    y: f32,
    page_height: f32,
    margin: f32,
}

impl PageCursor {
    pub fn new(orientation: Orientation) -> Self {
        Self::with_margin(orientation, MARGIN_MM)
    }

    pub fn with_margin(orientation: Orientation, margin: f32) -> Self {
        Self {
            y: margin,
            page_height: orientation.size().1,
            margin,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Cursor passed `page height - margin`
    pub fn needs_break(&self) -> bool {
        self.y > self.page_height - self.margin
    }

    /// Move to the top of a fresh page
    pub fn reset(&mut self) {
        self.y = self.margin;
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const BRAND: Self = Self(25, 118, 210);
    pub const GREY: Self = Self(128, 128, 128);
    pub const DARK_GREY: Self = Self(51, 51, 51);
    pub const MID_GREY: Self = Self(102, 102, 102);
    pub const LIGHT_GREY: Self = Self(153, 153, 153);
    pub const HEADER_FILL: Self = Self(242, 242, 242);
    pub const ROW_SHADE: Self = Self(250, 250, 250);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        align: Align,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        thickness: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

/// All pages of one document, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    title: String,
    orientation: Orientation,
    pages: Vec<Page>,
}

impl Layout {
    /// A layout with one empty page
    pub fn new(title: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            title: title.into(),
            orientation,
            pages: vec![Page::default()],
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn width(&self) -> f32 {
        self.orientation.size().0
    }

    pub fn height(&self) -> f32 {
        self.orientation.size().1
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Color) {
        self.push(Element::Text {
            text: text.into(),
            x,
            y,
            size,
            color,
            align: Align::Left,
        });
    }

    /// Text centred horizontally on the page
    pub fn centered_text(&mut self, text: impl Into<String>, y: f32, size: f32, color: Color) {
        let x = self.width() / 2.0;
        self.push(Element::Text {
            text: text.into(),
            x,
            y,
            size,
            color,
            align: Align::Center,
        });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.push(Element::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    pub fn stroke_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        thickness: f32,
    ) {
        self.push(Element::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            thickness,
        });
    }

    /// Every text string in page order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|page| {
            page.elements.iter().filter_map(|element| match element {
                Element::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }
}

/// Approximate rendered width of `text` in Helvetica at `size` points.
///
/// Built-in PDF fonts carry no metrics here, so glyph widths are bucketed.
pub fn text_width(text: &str, size: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '|' | '!' | '\'' => 0.25,
            'f' | 't' | 'r' | 'I' | ' ' | '(' | ')' | '-' => 0.32,
            'm' | 'w' => 0.83,
            'M' | 'W' => 0.88,
            c if c.is_uppercase() => 0.68,
            c if c.is_ascii_digit() => 0.56,
            _ => 0.54,
        })
        .sum();
    em * size * PT_TO_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_breaks_past_bottom_margin() {
        let mut cursor = PageCursor::new(Orientation::Portrait);
        assert_eq!(cursor.y(), MARGIN_MM);

        cursor.advance(A4_LONG_MM - 2.0 * MARGIN_MM);
        assert!(!cursor.needs_break(), "exactly at the limit still fits");

        cursor.advance(0.5);
        assert!(cursor.needs_break());

        cursor.reset();
        assert_eq!(cursor.y(), MARGIN_MM);
    }

    #[test]
    fn test_landscape_is_shorter() {
        let mut cursor = PageCursor::new(Orientation::Landscape);
        cursor.advance(A4_SHORT_MM);
        assert!(cursor.needs_break());
        assert_eq!(Orientation::Landscape.size(), (A4_LONG_MM, A4_SHORT_MM));
    }

    #[test]
    fn test_elements_land_on_current_page() {
        let mut layout = Layout::new("t", Orientation::Portrait);
        layout.text("first", 0.0, 0.0, 10.0, Color::BLACK);
        layout.add_page();
        layout.centered_text("second", 0.0, 10.0, Color::BLACK);

        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.pages()[0].elements.len(), 1);
        assert_eq!(layout.texts().collect::<Vec<_>>(), ["first", "second"]);
        assert!(matches!(
            layout.pages()[1].elements[0],
            Element::Text { align: Align::Center, x, .. } if x == A4_SHORT_MM / 2.0
        ));
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let small = text_width("Relatório", 10.0);
        assert!(small > 0.0);
        assert!((text_width("Relatório", 20.0) - 2.0 * small).abs() < 1e-3);
        assert_eq!(text_width("", 12.0), 0.0);
    }
}
