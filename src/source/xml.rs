use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::SourceError;
use crate::models::FilingRecord;

/// Mark text locations, most preferred first.
const MARK_TAGS: [&str; 3] = ["mark-identification", "mark-text", "word-mark"];
const CLASS_TAGS: [&str; 3] = [
    "international-code",
    "primary-international-class",
    "international-class",
];
const GOODS_TAGS: [&str; 2] = ["goods-services-description", "identification-text"];
const PARTY_TAGS: [&str; 3] = ["party-name", "owner", "applicant"];

/// Filing source over USPTO trademark daily XML files.
///
/// Directories contribute their `*.xml` files in name order. Files are read and
/// parsed one at a time as filings are pulled. A file that is not well-formed XML
/// is skipped and counted; an unreadable file is an error.
pub struct XmlFilingSource {
    files: VecDeque<PathBuf>,
    buffered: VecDeque<FilingRecord>,
    rejected: usize,
}

impl XmlFilingSource {
    pub fn from_paths(paths: &[PathBuf]) -> Result<Self, SourceError> {
        let mut files = VecDeque::new();
        for path in paths {
            if path.is_dir() {
                files.extend(xml_files_in(path)?);
            } else {
                files.push_back(path.clone());
            }
        }

        Ok(XmlFilingSource {
            files,
            buffered: VecDeque::new(),
            rejected: 0,
        })
    }
}

impl super::FilingSource for XmlFilingSource {
    fn next_filing(&mut self) -> Result<Option<FilingRecord>, SourceError> {
        loop {
            if let Some(record) = self.buffered.pop_front() {
                return Ok(Some(record));
            }
            let Some(path) = self.files.pop_front() else {
                return Ok(None);
            };

            let bytes = std::fs::read(&path).map_err(|source| SourceError::Io {
                path: path.clone(),
                source,
            })?;
            let content = String::from_utf8_lossy(&bytes);
            match parse_case_files(content.trim_start_matches('\u{feff}')) {
                Ok(records) => {
                    tracing::info!(file = %path.display(), filings = records.len(), "parsed filing file");
                    self.buffered.extend(records);
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "malformed filing XML, file skipped");
                    self.rejected += 1;
                }
            }
        }
    }

    fn rejected_files(&self) -> usize {
        self.rejected
    }
}

fn xml_files_in(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let entries = std::fs::read_dir(dir).map_err(|source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Fields collected while inside one `<case-file>`.
#[derive(Default)]
struct CaseFile {
    serial_number: Option<String>,
    filing_date: Option<String>,
    mark_text: [Option<String>; 3],
    classes: BTreeSet<u32>,
    goods_services: Vec<String>,
    applicant_name: Option<String>,
}

impl CaseFile {
    fn accept(&mut self, stack: &[String], text: &str) {
        let text = text.trim();
        let Some(tag) = stack.last().map(String::as_str) else {
            return;
        };
        if text.is_empty() {
            return;
        }

        if tag == "serial-number" {
            self.serial_number.get_or_insert_with(|| text.to_string());
        } else if tag == "filing-date" {
            self.filing_date.get_or_insert_with(|| text.to_string());
        } else if let Some(i) = MARK_TAGS.iter().position(|t| *t == tag) {
            self.mark_text[i].get_or_insert_with(|| text.to_string());
        } else if CLASS_TAGS.contains(&tag) {
            // Non-numeric class codes are ignored.
            if let Ok(class) = text.parse::<u32>() {
                self.classes.insert(class);
            }
        } else if GOODS_TAGS.contains(&tag) {
            self.goods_services.push(text.to_string());
        } else if PARTY_TAGS.contains(&tag)
            || (matches!(tag, "name" | "entity-name")
                && stack.iter().any(|t| PARTY_TAGS.contains(&t.as_str())))
        {
            self.applicant_name.get_or_insert_with(|| text.to_string());
        }
    }

    fn finish(self) -> Option<FilingRecord> {
        let serial_number = self.serial_number?;
        Some(FilingRecord {
            serial_number,
            mark_text: self.mark_text.into_iter().flatten().next().unwrap_or_default(),
            filing_date: self.filing_date,
            classes: self.classes,
            goods_services: self.goods_services.join(" "),
            applicant_name: self.applicant_name,
        })
    }
}

/// Parse every `<case-file>` element in a document using the quick-xml event API.
///
/// Case files without a serial number are dropped.
pub fn parse_case_files(content: &str) -> Result<Vec<FilingRecord>, quick_xml::Error> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<CaseFile> = None;
    let mut dropped = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                if name == "case-file" {
                    current = Some(CaseFile::default());
                }
                stack.push(name);
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                if name == "case-file" {
                    match current.take().and_then(CaseFile::finish) {
                        Some(record) => records.push(record),
                        None => dropped += 1,
                    }
                }
                stack.pop();
            }
            Event::Text(ref e) => {
                if let Some(case_file) = current.as_mut() {
                    let text = e
                        .unescape()
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(e).into_owned());
                    case_file.accept(&stack, &text);
                }
            }
            Event::CData(ref e) => {
                if let Some(case_file) = current.as_mut() {
                    case_file.accept(&stack, &String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if dropped > 0 {
        tracing::debug!(dropped, "case files without a serial number skipped");
    }
    Ok(records)
}
