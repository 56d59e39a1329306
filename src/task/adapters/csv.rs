//! Inbound CSV adapter turning spreadsheet exports into [`ImportRow`]s.

use crate::task::domain::{ImportColumn, ImportRow};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Field separator used by the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// `,`
    #[default]
    Comma,
    /// `;`
    Semicolon,
    /// Horizontal tab.
    Tab,
}

impl Delimiter {
    /// Returns the separator byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Semicolon => b';',
            Self::Tab => b'\t',
        }
    }

    /// Returns the option name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Tab => "tab",
        }
    }
}

impl FromStr for Delimiter {
    type Err = UnknownDelimiterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "comma" | "," => Ok(Self::Comma),
            "semicolon" | ";" => Ok(Self::Semicolon),
            "tab" | "\\t" => Ok(Self::Tab),
            _ => Err(UnknownDelimiterError(value.to_owned())),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned for unsupported delimiter names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown delimiter '{0}', expected comma, semicolon or tab")]
pub struct UnknownDelimiterError(pub String);

/// Character encoding of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Byte-order mark if present, else UTF-8, else Windows-1252.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// UTF-8, with or without a byte-order mark.
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// Windows-1252, the usual encoding of spreadsheets saved on Windows.
    #[serde(rename = "windows-1252", alias = "cp1252")]
    Windows1252,
    /// ISO-8859-1: every byte is the code point of the same value.
    #[serde(rename = "iso-8859-1", alias = "latin1")]
    Latin1,
}

impl TextEncoding {
    /// Returns the option name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Utf8 => "utf-8",
            Self::Windows1252 => "windows-1252",
            Self::Latin1 => "iso-8859-1",
        }
    }
}

impl FromStr for TextEncoding {
    type Err = UnknownEncodingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "windows-1252" | "cp1252" => Ok(Self::Windows1252),
            "iso-8859-1" | "latin1" | "latin-1" => Ok(Self::Latin1),
            _ => Err(UnknownEncodingError(value.to_owned())),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for unsupported encoding names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown encoding '{0}', expected auto, utf-8, windows-1252 or iso-8859-1")]
pub struct UnknownEncodingError(pub String);

/// Reader options mirroring the import wizard settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvImportOptions {
    /// Field separator.
    pub delimiter: Delimiter,
    /// Whether the first line holds column labels. Without a header,
    /// [`ImportColumn::CANONICAL_ORDER`] is assumed.
    pub has_header: bool,
    /// Character encoding of the file.
    pub encoding: TextEncoding,
}

impl Default for CsvImportOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Comma,
            has_header: true,
            encoding: TextEncoding::Auto,
        }
    }
}

/// The file could not be read at all.
#[derive(Debug, Error)]
pub enum CsvReadError {
    /// The header line is malformed.
    #[error("cannot read CSV header: {0}")]
    Header(#[source] ::csv::Error),
    /// The bytes are not valid in the requested encoding.
    #[error("the file is not valid {0}; choose another encoding or save it as UTF-8")]
    Encoding(TextEncoding),
}

/// A single record could not be parsed; sibling records are unaffected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct CsvRowError {
    /// 1-based source line.
    pub line: usize,
    /// Parser message.
    pub message: String,
}

/// Decodes raw file bytes into text, dropping any byte-order mark.
///
/// With [`TextEncoding::Auto`] a byte-order mark decides the encoding; files
/// without one are read as UTF-8 when valid and as Windows-1252 otherwise.
/// Windows-1252 maps every byte, so automatic detection never fails.
///
/// # Errors
///
/// Returns [`CsvReadError::Encoding`] when [`TextEncoding::Utf8`] is
/// requested and the bytes are not valid UTF-8.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<Cow<'_, str>, CsvReadError> {
    match encoding {
        TextEncoding::Auto => Ok(detect_and_decode(bytes)),
        TextEncoding::Utf8 => {
            let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
            if had_errors {
                return Err(CsvReadError::Encoding(encoding));
            }
            Ok(text)
        }
        TextEncoding::Windows1252 => Ok(WINDOWS_1252.decode_without_bom_handling(bytes).0),
        TextEncoding::Latin1 => Ok(encoding_rs::mem::decode_latin1(bytes)),
    }
}

fn detect_and_decode(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            tracing::warn!(
                encoding = encoding.name(),
                "malformed sequences replaced while decoding input"
            );
        }
        return text;
    }
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return text;
    }
    tracing::info!("input is not valid UTF-8, decoding as Windows-1252");
    WINDOWS_1252.decode_without_bom_handling(bytes).0
}

/// Reads every record of a CSV export.
///
/// Records that fail to parse are returned as [`CsvRowError`]s in place so
/// the caller can report them and carry on.
///
/// # Errors
///
/// Returns [`CsvReadError::Encoding`] when the bytes do not decode, or
/// [`CsvReadError::Header`] when the header line cannot be read.
pub fn read_rows(
    bytes: &[u8],
    options: CsvImportOptions,
) -> Result<Vec<Result<ImportRow, CsvRowError>>, CsvReadError> {
    let text = decode(bytes, options.encoding)?;
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(options.delimiter.as_byte())
        .has_headers(options.has_header)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = if options.has_header {
        reader
            .headers()
            .map_err(CsvReadError::Header)?
            .iter()
            .map(|header| header.trim().to_owned())
            .collect()
    } else {
        ImportColumn::CANONICAL_ORDER
            .iter()
            .map(|column| column.label().to_owned())
            .collect()
    };
    let first_data_line = if options.has_header { 2 } else { 1 };

    let rows = reader
        .records()
        .enumerate()
        .map(|(index, record)| {
            let fallback_line = first_data_line + index;
            match record {
                Ok(fields) => {
                    let line = fields
                        .position()
                        .and_then(|position| usize::try_from(position.line()).ok())
                        .unwrap_or(fallback_line);
                    Ok(ImportRow::from_cells(
                        line,
                        headers.iter().cloned().zip(fields.iter().map(str::to_owned)),
                    ))
                }
                Err(err) => Err(CsvRowError {
                    line: err
                        .position()
                        .and_then(|position| usize::try_from(position.line()).ok())
                        .unwrap_or(fallback_line),
                    message: err.to_string(),
                }),
            }
        })
        .collect();
    Ok(rows)
}
