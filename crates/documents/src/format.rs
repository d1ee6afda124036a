//! pt-BR formatting used in document text and file names

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

pub const NOT_INFORMED: &str = "Não informado";
pub const NOT_AVAILABLE: &str = "N/A";

/// `01/03/2024`
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `1 de março de 2024`
pub fn long_date(date: NaiveDate) -> String {
    // month0() is always in 0..12
    let month = MONTHS[date.month0() as usize];
    format!("{} de {} de {}", date.day(), month, date.year())
}

/// `dd/mm/yyyy às hh:mm:ss`
pub fn timestamp(at: NaiveDateTime) -> String {
    format!("{} às {}", short_date(at.date()), at.format("%H:%M:%S"))
}

pub fn status_label(is_active: bool) -> &'static str {
    if is_active { "Ativo" } else { "Inativo" }
}

/// Replace every run of whitespace with a single dash.
///
/// Path separators are dashed too so the result is always a plain file name.
pub fn dashed(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .replace(['/', '\\'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(short_date(date), "01/03/2024");
        assert_eq!(long_date(date), "1 de março de 2024");

        let at = date.and_hms_opt(9, 5, 7).unwrap();
        assert_eq!(timestamp(at), "01/03/2024 às 09:05:07");
    }

    #[test]
    fn test_dashed() {
        assert_eq!(dashed("Maria  da Silva"), "Maria-da-Silva");
        assert_eq!(dashed(" Ana\tPaula "), "Ana-Paula");
        assert_eq!(dashed("João"), "João");
        assert_eq!(dashed("a/b"), "a-b");
    }
}
