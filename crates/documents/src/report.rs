//! Participation report for a single volunteer

use crate::error::DocumentResult;
use crate::format::{self, NOT_AVAILABLE, NOT_INFORMED};
use crate::layout::{Color, FOOTER_OFFSET_MM, Layout, Orientation, PageCursor};
use crate::output::Document;
use crate::render;
use chrono::NaiveDateTime;
use ellp_core::{Volunteer, Workshop};
use tracing::instrument;

pub const TITLE: &str = "RELATÓRIO DE PARTICIPAÇÃO";

const HEADER_HEIGHT_MM: f32 = 20.0;
const INDENT_MM: f32 = 5.0;
const LINE_MM: f32 = 6.0;
const HEADING_GAP_MM: f32 = 8.0;
const SECTION_GAP_MM: f32 = 5.0;

/// `relatorio-<Name-Dashed>.pdf`
pub fn file_name(volunteer: &Volunteer) -> String {
    format!("relatorio-{}.pdf", format::dashed(&volunteer.name))
}

/// Report listing the volunteer's workshops by identifier
#[instrument(skip_all, fields(volunteer = %volunteer.id))]
pub fn participation_report(
    volunteer: &Volunteer,
    generated_at: NaiveDateTime,
) -> DocumentResult<Document> {
    let layout = report_layout(volunteer, &volunteer.workshops, generated_at);
    Ok(Document::new(file_name(volunteer), render::render(&layout)?))
}

/// Report listing workshops by name and date
#[instrument(skip_all, fields(volunteer = %volunteer.id, workshops = workshops.len()))]
pub fn participation_report_with_workshops(
    volunteer: &Volunteer,
    workshops: &[Workshop],
    generated_at: NaiveDateTime,
) -> DocumentResult<Document> {
    let entries: Vec<String> = workshops
        .iter()
        .map(|w| format!("{} ({})", w.name, format::short_date(w.date)))
        .collect();
    let layout = report_layout(volunteer, &entries, generated_at);
    Ok(Document::new(file_name(volunteer), render::render(&layout)?))
}

/// Flowing text writer; starts a new page before a line that would not fit
struct Writer {
    layout: Layout,
    cursor: PageCursor,
}

impl Writer {
    fn heading(&mut self, text: impl Into<String>) {
        self.ensure_room();
        let margin = self.cursor.margin();
        self.layout.text(text, margin, self.cursor.y(), 12.0, Color::BRAND);
        self.advance(HEADING_GAP_MM);
    }

    fn line(&mut self, text: impl Into<String>) {
        self.ensure_room();
        let x = self.cursor.margin() + INDENT_MM;
        self.layout.text(text, x, self.cursor.y(), 10.0, Color::BLACK);
        self.advance(LINE_MM);
    }

    fn advance(&mut self, dy: f32) {
        self.cursor.advance(dy);
    }

    fn ensure_room(&mut self) {
        if self.cursor.needs_break() {
            self.layout.add_page();
            self.cursor.reset();
        }
    }
}

pub fn report_layout(
    volunteer: &Volunteer,
    workshops: &[String],
    generated_at: NaiveDateTime,
) -> Layout {
    let layout = Layout::new(format!("Relatório - {}", volunteer.name), Orientation::Portrait);
    let cursor = PageCursor::new(layout.orientation());
    let mut w = Writer { layout, cursor };

    let margin = w.cursor.margin();
    let width = w.layout.width();
    let top = w.cursor.y();
    w.layout
        .fill_rect(margin, top, width - 2.0 * margin, HEADER_HEIGHT_MM, Color::HEADER_FILL);
    w.layout.centered_text(TITLE, top + 12.0, 18.0, Color::BRAND);
    w.advance(HEADER_HEIGHT_MM + 5.0);

    w.heading("Informações do Voluntário");
    w.line(format!("Nome: {}", volunteer.name));
    w.line(format!("Email: {}", volunteer.email));
    w.line(format!(
        "Telefone: {}",
        volunteer.phone.as_deref().unwrap_or(NOT_INFORMED)
    ));
    w.line(format!("Status: {}", format::status_label(volunteer.is_active)));
    w.line(format!(
        "Data de Entrada: {}",
        format::short_date(volunteer.entry_date.date_naive())
    ));
    if let Some(exit_date) = volunteer.exit_date {
        w.line(format!("Data de Saída: {}", format::short_date(exit_date.date_naive())));
    }
    w.advance(SECTION_GAP_MM);

    if let Some((course, ra)) = volunteer.academic_info() {
        w.heading("Informações Acadêmicas");
        w.line(format!("Curso: {}", course.unwrap_or(NOT_AVAILABLE)));
        w.line(format!("RA: {}", ra.unwrap_or(NOT_AVAILABLE)));
        w.advance(SECTION_GAP_MM);
    }

    if !workshops.is_empty() {
        w.heading(format!("Oficinas Participadas ({})", workshops.len()));
        for (index, workshop) in workshops.iter().enumerate() {
            w.line(format!("{}. {}", index + 1, workshop));
        }
    }

    let mut layout = w.layout;
    let footer_y = layout.height() - FOOTER_OFFSET_MM;
    layout.centered_text(
        format!(
            "Documento gerado automaticamente em {}",
            format::timestamp(generated_at)
        ),
        footer_y,
        8.0,
        Color::GREY,
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn volunteer(workshops: usize) -> Volunteer {
        Volunteer {
            id: "v1".into(),
            name: "João Pereira".into(),
            email: "joao@ellp.org".into(),
            phone: None,
            is_academic: false,
            course: None,
            ra: None,
            entry_date: Utc.with_ymd_and_hms(2023, 8, 14, 0, 0, 0).unwrap(),
            exit_date: None,
            is_active: false,
            workshops: (1..=workshops).map(|i| format!("w{i}")).collect(),
            created_at: None,
            updated_at: None,
        }
    }

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 2)
            .unwrap()
            .and_hms_opt(14, 3, 9)
            .unwrap()
    }

    #[test]
    fn test_volunteer_section() {
        let v = volunteer(2);
        let layout = report_layout(&v, &v.workshops, generated());

        assert_eq!(layout.orientation(), Orientation::Portrait);
        assert_eq!(layout.page_count(), 1);
        assert!(layout.contains_text(TITLE));
        assert!(layout.contains_text("Telefone: Não informado"));
        assert!(layout.contains_text("Status: Inativo"));
        assert!(layout.contains_text("Data de Entrada: 14/08/2023"));
        assert!(!layout.contains_text("Informações Acadêmicas"));
        assert!(layout.contains_text("Oficinas Participadas (2)"));
        assert!(layout.contains_text("2. w2"));
        assert!(layout.contains_text("Documento gerado automaticamente em 02/06/2024 às 14:03:09"));
    }

    #[test]
    fn test_academic_section_when_academic() {
        let mut v = volunteer(0);
        v.is_academic = true;
        v.ra = Some("a1234567".into());
        let layout = report_layout(&v, &[], generated());

        assert!(layout.contains_text("Informações Acadêmicas"));
        assert!(layout.contains_text("Curso: N/A"));
        assert!(layout.contains_text("RA: a1234567"));
        assert!(!layout.contains_text("Oficinas Participadas"));
    }

    #[test]
    fn test_long_workshop_list_breaks_pages() {
        let v = volunteer(30);
        assert_eq!(report_layout(&v, &v.workshops, generated()).page_count(), 1);

        let v = volunteer(40);
        let layout = report_layout(&v, &v.workshops, generated());
        assert_eq!(layout.page_count(), 2);
        assert!(layout.contains_text("40. w40"));
    }

    #[test]
    fn test_named_workshops() {
        let workshop = Workshop {
            id: "w1".into(),
            name: "Lógica com Scratch".into(),
            date: NaiveDate::from_ymd_opt(2024, 4, 20).unwrap(),
            description: None,
            volunteers: vec!["v1".into()],
            created_at: None,
            updated_at: None,
        };
        let document =
            participation_report_with_workshops(&volunteer(1), &[workshop], generated()).unwrap();
        assert_eq!(document.file_name, "relatorio-João-Pereira.pdf");
        assert!(document.bytes.starts_with(b"%PDF"));
    }
}
