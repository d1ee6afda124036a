//! Tabular report covering many volunteers

use crate::error::DocumentResult;
use crate::format;
use crate::layout::{self, Color, FOOTER_OFFSET_MM, Layout, Orientation, PageCursor};
use crate::output::Document;
use crate::render;
use chrono::NaiveDateTime;
use ellp_core::Volunteer;
use tracing::instrument;

pub const TITLE: &str = "RELATÓRIO DE VOLUNTÁRIOS";

const HEADER_ROW_MM: f32 = 7.0;
const ROW_MM: f32 = 6.0;
const HEADER_SIZE: f32 = 9.0;
const ROW_SIZE: f32 = 8.0;

/// Column titles with their offset from the left margin
const COLUMNS: [(&str, f32); 4] = [("Nome", 2.0), ("Email", 60.0), ("Oficinas", 120.0), ("Status", 150.0)];

/// `relatorio-voluntarios-YYYY-MM-DD.pdf`
pub fn file_name(generated_at: NaiveDateTime) -> String {
    format!(
        "relatorio-voluntarios-{}.pdf",
        generated_at.date().format("%Y-%m-%d")
    )
}

#[instrument(skip_all, fields(volunteers = volunteers.len()))]
pub fn batch_report(
    volunteers: &[Volunteer],
    generated_at: NaiveDateTime,
) -> DocumentResult<Document> {
    let layout = batch_layout(volunteers, generated_at);
    Ok(Document::new(file_name(generated_at), render::render(&layout)?))
}

pub fn batch_layout(volunteers: &[Volunteer], generated_at: NaiveDateTime) -> Layout {
    let mut layout = Layout::new(TITLE, Orientation::Portrait);
    let mut cursor = PageCursor::new(layout.orientation());
    let margin = cursor.margin();
    let table_width = layout.width() - 2.0 * margin;

    layout.centered_text(TITLE, cursor.y(), 16.0, Color::BRAND);
    cursor.advance(10.0);
    layout.centered_text(
        format!("Relatório contendo {} voluntário(s)", volunteers.len()),
        cursor.y(),
        10.0,
        Color::GREY,
    );
    cursor.advance(15.0);

    table_header(&mut layout, &mut cursor, table_width);

    for (index, volunteer) in volunteers.iter().enumerate() {
        if cursor.needs_break() {
            layout.add_page();
            cursor.reset();
            table_header(&mut layout, &mut cursor, table_width);
        }

        let y = cursor.y();
        if index % 2 == 0 {
            layout.fill_rect(margin, y, table_width, ROW_MM, Color::ROW_SHADE);
        }

        let cells = [
            volunteer.name.clone(),
            volunteer.email.clone(),
            volunteer.workshop_count().to_string(),
            format::status_label(volunteer.is_active).to_string(),
        ];
        for (column, cell) in cells.into_iter().enumerate() {
            let x = margin + COLUMNS[column].1;
            let max_width = column_width(column, table_width);
            layout.text(fit(&cell, ROW_SIZE, max_width), x, y + 4.0, ROW_SIZE, Color::BLACK);
        }
        cursor.advance(ROW_MM);
    }

    let footer_y = layout.height() - FOOTER_OFFSET_MM;
    layout.centered_text(
        format!("Gerado em {}", format::timestamp(generated_at)),
        footer_y,
        8.0,
        Color::GREY,
    );
    layout
}

fn table_header(layout: &mut Layout, cursor: &mut PageCursor, table_width: f32) {
    let margin = cursor.margin();
    let y = cursor.y();
    layout.fill_rect(margin, y, table_width, HEADER_ROW_MM, Color::HEADER_FILL);
    for (title, offset) in COLUMNS {
        layout.text(title, margin + offset, y + 5.0, HEADER_SIZE, Color::BRAND);
    }
    cursor.advance(HEADER_ROW_MM + 3.0);
}

/// Space available to a column before the next one starts
fn column_width(column: usize, table_width: f32) -> f32 {
    let start = COLUMNS[column].1;
    let end = COLUMNS
        .get(column + 1)
        .map_or(table_width, |(_, offset)| *offset);
    end - start - 2.0
}

/// Shorten `text` with a trailing `...` until it fits in `max_width`
fn fit(text: &str, size: f32, max_width: f32) -> String {
    if layout::text_width(text, size) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "...";
        if layout::text_width(&candidate, size) <= max_width {
            return candidate;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Element;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn volunteers(count: usize) -> Vec<Volunteer> {
        (0..count)
            .map(|i| Volunteer {
                id: format!("v{i}"),
                name: format!("Voluntário {i}"),
                email: format!("v{i}@ellp.org"),
                phone: None,
                is_academic: false,
                course: None,
                ra: None,
                entry_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                exit_date: None,
                is_active: i % 3 != 0,
                workshops: vec!["w1".into(); i % 4],
                created_at: None,
                updated_at: None,
            })
            .collect()
    }

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 30)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn shaded_rows(layout: &Layout) -> usize {
        layout
            .pages()
            .iter()
            .flat_map(|p| &p.elements)
            .filter(|e| matches!(e, Element::FillRect { color, .. } if *color == Color::ROW_SHADE))
            .count()
    }

    #[test]
    fn test_table_content() {
        let layout = batch_layout(&volunteers(3), generated());

        assert_eq!(layout.page_count(), 1);
        assert!(layout.contains_text("Relatório contendo 3 voluntário(s)"));
        for (title, _) in COLUMNS {
            assert!(layout.contains_text(title));
        }
        assert!(layout.contains_text("v2@ellp.org"));
        assert!(layout.contains_text("Inativo"));
        assert!(layout.contains_text("Gerado em 30/11/2024 às 08:00:00"));
        // Rows 0 and 2 are shaded
        assert_eq!(shaded_rows(&layout), 2);
    }

    #[test]
    fn test_many_rows_break_pages() {
        let layout = batch_layout(&volunteers(45), generated());
        assert_eq!(layout.page_count(), 2);
        assert_eq!(shaded_rows(&layout), 23);
        assert!(layout.contains_text("Voluntário 44"));
    }

    #[test]
    fn test_empty_batch_still_renders() {
        let document = batch_report(&[], generated()).unwrap();
        assert_eq!(document.file_name, "relatorio-voluntarios-2024-11-30.pdf");
        assert!(document.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_cells_are_shortened() {
        let long = "a".repeat(200);
        let shortened = fit(&long, ROW_SIZE, 56.0);
        assert!(shortened.ends_with("..."));
        assert!(layout::text_width(&shortened, ROW_SIZE) <= 56.0);
        assert_eq!(fit("Ana", ROW_SIZE, 56.0), "Ana");
    }
}
