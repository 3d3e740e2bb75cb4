//! Generates the dbt schema file for a seed CSV from its header row.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

pub const SCHEMA_VERSION: u32 = 2;
pub const NOT_NULL: &str = "not_null";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} has no header row")]
    EmptyHeader(PathBuf),

    #[error("{path}: unterminated quoted field in header")]
    UnterminatedQuote { path: PathBuf },

    #[error("Failed to serialise schema: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level dbt schema document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedSchema {
    pub version: u32,
    pub seeds: Vec<SeedSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedSpec {
    pub name: String,
    pub description: String,
    pub columns: Vec<SeedColumnSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedColumnSpec {
    pub name: String,
    pub tests: Vec<String>,
}

/// Split the first CSV record into trimmed column names.
///
/// A quote opens a quoted field only at the start of the field; elsewhere it
/// is literal. Quoted fields may contain commas, line breaks and doubled
/// quotes. Returns `None` for an unterminated quote.
pub fn parse_header(content: &str) -> Option<Vec<String>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' | '\n' => break,
            _ => field.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(field);

    Some(fields.into_iter().map(|f| f.trim().to_string()).collect())
}

/// Read the header row of a CSV file.
pub fn read_header(path: &Path) -> Result<Vec<String>, SeedError> {
    let content = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let headers = parse_header(&content).ok_or_else(|| SeedError::UnterminatedQuote {
        path: path.to_path_buf(),
    })?;

    if headers.iter().all(String::is_empty) {
        return Err(SeedError::EmptyHeader(path.to_path_buf()));
    }
    Ok(headers)
}

pub fn build_schema(seed_name: &str, headers: &[String]) -> SeedSchema {
    let columns = headers
        .iter()
        .map(|name| SeedColumnSpec {
            name: name.clone(),
            tests: vec![NOT_NULL.to_string()],
        })
        .collect();

    SeedSchema {
        version: SCHEMA_VERSION,
        seeds: vec![SeedSpec {
            name: seed_name.to_string(),
            description: format!("(auto-generated seed schema for {seed_name}.csv)"),
            columns,
        }],
    }
}

pub fn render(schema: &SeedSchema) -> Result<String, SeedError> {
    Ok(serde_yaml::to_string(schema)?)
}

/// Write the rendered schema, creating parent directories as needed.
pub fn write_schema(path: &Path, yaml: &str) -> Result<(), SeedError> {
    let write_err = |source| SeedError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, yaml).map_err(write_err)
}

/// Read `csv_path`, write the schema for `seed_name` to `yaml_path`, and
/// return the number of columns written.
pub fn generate(csv_path: &Path, yaml_path: &Path, seed_name: &str) -> Result<usize, SeedError> {
    let headers = read_header(csv_path)?;
    debug!(columns = ?headers, "Read CSV header");

    let schema = build_schema(seed_name, &headers);
    write_schema(yaml_path, &render(&schema)?)?;

    info!(path = %yaml_path.display(), columns = headers.len(), "Wrote seed schema");
    Ok(headers.len())
}
