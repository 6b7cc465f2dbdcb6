//! Format detection for spreadsheet packages.

use crate::package::Package;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Main workbook part of a SpreadsheetML package.
pub const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Content type for the XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for the XLSM (macro-enabled) workbook part.
const XLSM_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

/// Content type for the XLTX template workbook part.
const XLTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.template.main+xml";

/// Content type for the XLTM (macro-enabled template) workbook part.
const XLTM_CONTENT_TYPE: &str = "application/vnd.ms-excel.template.macroEnabled.main+xml";

/// Kind of spreadsheet package, from the workbook part's content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    /// Excel workbook (.xlsx)
    Workbook,
    /// Macro-enabled workbook (.xlsm)
    MacroEnabled,
    /// Template (.xltx)
    Template,
    /// Macro-enabled template (.xltm)
    MacroEnabledTemplate,
}

impl SpreadsheetKind {
    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            SpreadsheetKind::Workbook => "Excel Workbook",
            SpreadsheetKind::MacroEnabled => "Excel Macro-Enabled Workbook",
            SpreadsheetKind::Template => "Excel Template",
            SpreadsheetKind::MacroEnabledTemplate => "Excel Macro-Enabled Template",
        }
    }

    fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            XLSX_CONTENT_TYPE => Some(SpreadsheetKind::Workbook),
            XLSM_CONTENT_TYPE => Some(SpreadsheetKind::MacroEnabled),
            XLTX_CONTENT_TYPE => Some(SpreadsheetKind::Template),
            XLTM_CONTENT_TYPE => Some(SpreadsheetKind::MacroEnabledTemplate),
            _ => None,
        }
    }
}

impl std::fmt::Display for SpreadsheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the spreadsheet kind of an opened package.
///
/// Returns `None` when the package has no SpreadsheetML workbook part.
pub fn detect_spreadsheet_kind(package: &Package) -> Option<SpreadsheetKind> {
    package
        .content_type(WORKBOOK_PART)
        .and_then(SpreadsheetKind::from_content_type)
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}
