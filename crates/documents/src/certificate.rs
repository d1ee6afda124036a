//! Participation certificate: one landscape A4 page

use crate::error::DocumentResult;
use crate::format::{self, NOT_AVAILABLE};
use crate::layout::{Color, Layout, Orientation};
use crate::output::Document;
use crate::render;
use chrono::NaiveDateTime;
use ellp_core::Volunteer;
use tracing::instrument;

pub const TITLE: &str = "CERTIFICADO DE PARTICIPAÇÃO";
pub const PROJECT_NAME: &str = "ELLP - Ensino Lúdico de Lógica e Programação";
pub const EXTERNAL_VOLUNTEER: &str = "Voluntário Externo";
const INSTITUTION: &str = "Projeto ELLP - Universidade Tecnológica Federal do Paraná";

const FRAME_INSET_MM: f32 = 10.0;

/// `certificado-<Name-Dashed>.pdf`
pub fn file_name(volunteer: &Volunteer) -> String {
    format!("certificado-{}.pdf", format::dashed(&volunteer.name))
}

#[instrument(skip_all, fields(volunteer = %volunteer.id))]
pub fn certificate(volunteer: &Volunteer, issued_at: NaiveDateTime) -> DocumentResult<Document> {
    let layout = certificate_layout(volunteer, issued_at);
    Ok(Document::new(file_name(volunteer), render::render(&layout)?))
}

/// Line describing the volunteer's academic link
pub fn academic_line(volunteer: &Volunteer) -> String {
    match volunteer.academic_info() {
        Some((course, ra)) => format!(
            "Curso: {} | RA: {}",
            course.unwrap_or(NOT_AVAILABLE),
            ra.unwrap_or(NOT_AVAILABLE)
        ),
        None => EXTERNAL_VOLUNTEER.to_string(),
    }
}

pub fn certificate_layout(volunteer: &Volunteer, issued_at: NaiveDateTime) -> Layout {
    let mut layout = Layout::new(format!("Certificado - {}", volunteer.name), Orientation::Landscape);
    let (width, height) = (layout.width(), layout.height());

    layout.stroke_rect(
        FRAME_INSET_MM,
        FRAME_INSET_MM,
        width - 2.0 * FRAME_INSET_MM,
        height - 2.0 * FRAME_INSET_MM,
        Color::BRAND,
        3.0,
    );

    layout.centered_text(TITLE, 42.0, 26.0, Color::BRAND);
    let rule_width = width * 0.6;
    layout.fill_rect((width - rule_width) / 2.0, 50.0, rule_width, 0.8, Color::BRAND);

    layout.centered_text("Por este meio, certificamos que", 72.0, 14.0, Color::DARK_GREY);
    layout.centered_text(volunteer.name.as_str(), 88.0, 22.0, Color::BRAND);
    layout.centered_text("participou como voluntário do projeto", 103.0, 14.0, Color::DARK_GREY);
    layout.centered_text(PROJECT_NAME, 118.0, 17.0, Color::BRAND);

    let entry_date = format::long_date(volunteer.entry_date.date_naive());
    layout.centered_text(
        format!("Data de Participação: {entry_date}"),
        140.0,
        11.0,
        Color::MID_GREY,
    );
    layout.centered_text(
        format!("Total de Oficinas Participadas: {}", volunteer.workshop_count()),
        147.0,
        11.0,
        Color::MID_GREY,
    );
    layout.centered_text(academic_line(volunteer), 154.0, 11.0, Color::MID_GREY);

    layout.centered_text(
        format!("Documento emitido em {}", format::short_date(issued_at.date())),
        178.0,
        9.0,
        Color::LIGHT_GREY,
    );
    layout.centered_text(INSTITUTION, 184.0, 9.0, Color::LIGHT_GREY);

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn volunteer(is_academic: bool) -> Volunteer {
        Volunteer {
            id: "v1".into(),
            name: "Maria da Silva".into(),
            email: "maria@ellp.org".into(),
            phone: None,
            is_academic,
            course: is_academic.then(|| "Engenharia de Software".to_string()),
            ra: None,
            entry_date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            exit_date: None,
            is_active: true,
            workshops: vec!["w1".into(), "w2".into()],
            created_at: None,
            updated_at: None,
        }
    }

    fn issued() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 5)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_single_landscape_page() {
        let layout = certificate_layout(&volunteer(true), issued());

        assert_eq!(layout.orientation(), Orientation::Landscape);
        assert_eq!(layout.page_count(), 1);
        assert!(layout.contains_text(TITLE));
        assert!(layout.contains_text("Maria da Silva"));
        assert!(layout.contains_text("Data de Participação: 1 de março de 2024"));
        assert!(layout.contains_text("Total de Oficinas Participadas: 2"));
        assert!(layout.contains_text("Curso: Engenharia de Software | RA: N/A"));
        assert!(layout.contains_text("Documento emitido em 05/12/2024"));
    }

    #[test]
    fn test_external_volunteer_line() {
        let layout = certificate_layout(&volunteer(false), issued());
        assert!(layout.contains_text(EXTERNAL_VOLUNTEER));
        assert!(!layout.contains_text("Curso:"));
    }

    #[test]
    fn test_file_name_and_render() {
        let document = certificate(&volunteer(false), issued()).unwrap();
        assert_eq!(document.file_name, "certificado-Maria-da-Silva.pdf");
        assert!(document.bytes.starts_with(b"%PDF"));
    }
}
