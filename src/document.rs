//! Per-document state kept between LSP requests

use crate::parsers::Dependency;
use crate::scanner::ScanReport;

pub struct DocumentState {
    /// Dependencies as last parsed
    pub dependencies: Vec<Dependency>,
    /// Result of the last scan
    pub report: ScanReport,
}
