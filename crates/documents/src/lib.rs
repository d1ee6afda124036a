//! ELLP document generation
//!
//! Builds participation certificates, single-volunteer reports and the
//! batch volunteer report. Each document is first laid out as a list of
//! positioned elements per page, then rendered to PDF bytes.

pub mod batch;
pub mod certificate;
pub mod error;
pub mod format;
pub mod layout;
pub mod output;
pub mod render;
pub mod report;

pub use batch::batch_report;
pub use certificate::certificate;
pub use error::{DocumentError, DocumentResult};
pub use layout::{Layout, Orientation, PageCursor};
pub use output::Document;
pub use report::{participation_report, participation_report_with_workshops};
