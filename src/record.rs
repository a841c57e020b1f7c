//! Card records and the places they are read from: Markdown posts with a front-matter block,
//! or a JSON manifest.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::foundation::error::{OgError, OgResult};

/// A validated record, ready to be drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Output file stem.
    pub id: String,
    /// May be empty; an empty title draws no title lines.
    pub title: String,
    pub created: time::Date,
}

impl Record {
    /// `created` as drawn on the card, `YYYY/MM/DD`.
    pub fn card_date(&self) -> OgResult<String> {
        format_date(self.created)
    }
}

/// Record fields as found in a source, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordSource {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    /// Why the source could not be read or its id cannot be used; such a source always
    /// fails [`RecordSource::into_record`].
    #[serde(skip)]
    pub rejected: Option<String>,
}

impl RecordSource {
    pub fn new(id: impl Into<String>, title: Option<String>, created: Option<String>) -> Self {
        Self {
            id: id.into(),
            title,
            created,
            rejected: None,
        }
    }

    fn reject(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rejected: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn into_record(self) -> OgResult<Record> {
        if let Some(reason) = self.rejected {
            return Err(OgError::input(format!("record '{}': {reason}", self.id)));
        }
        let Some(title) = self.title else {
            return Err(OgError::input(format!("record '{}' has no title", self.id)));
        };
        let Some(created) = self.created else {
            return Err(OgError::input(format!(
                "record '{}' has no created date",
                self.id
            )));
        };
        let created = parse_created(&created)
            .map_err(|e| OgError::input(format!("record '{}': {e}", self.id)))?;
        Ok(Record {
            id: self.id,
            title,
            created,
        })
    }
}

/// Reformat `YYYY-MM-DD` or an RFC 3339 timestamp as `YYYY/MM/DD`.
///
/// Timestamps keep the calendar date they were written with; no timezone conversion happens.
pub fn format_card_date(created: &str) -> OgResult<String> {
    format_date(parse_created(created).map_err(OgError::input)?)
}

fn parse_created(created: &str) -> Result<time::Date, String> {
    let s = created.trim();
    if let Ok(date) = time::Date::parse(s, format_description!("[year]-[month]-[day]")) {
        return Ok(date);
    }
    time::OffsetDateTime::parse(s, &Rfc3339)
        .map(|ts| ts.date())
        .map_err(|_| format!("malformed created date '{s}', expected YYYY-MM-DD or RFC 3339"))
}

fn format_date(date: time::Date) -> OgResult<String> {
    date.format(format_description!("[year]/[month]/[day]"))
        .map_err(|e| OgError::render(format!("format date {date}: {e}")))
}

/// Read `title` and `created` from the leading `---` block of a Markdown post.
///
/// Only top-level scalar keys are understood; quotes around a value are stripped, nested
/// keys and every other field are ignored. A post without a closed block yields a source
/// with neither field.
pub fn parse_front_matter(id: impl Into<String>, markdown: &str) -> RecordSource {
    let mut source = RecordSource {
        id: id.into(),
        ..RecordSource::default()
    };

    let mut lines = markdown.trim_start_matches('\u{feff}').lines();
    if lines.next().map(str::trim_end) != Some("---") {
        return source;
    }

    let mut block = Vec::new();
    let mut closed = false;
    for line in lines {
        let end = line.trim_end();
        if end == "---" || end == "..." {
            closed = true;
            break;
        }
        block.push(line);
    }
    if !closed {
        return source;
    }

    for line in block {
        if line.starts_with([' ', '\t', '#', '-']) {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = scalar(value);
        match key.trim() {
            "title" => source.title = value,
            "created" => source.created = value,
            _ => {}
        }
    }
    source
}

fn scalar(raw: &str) -> Option<String> {
    let v = raw.trim();
    if v.is_empty() || v == "~" || v == "null" {
        return None;
    }
    for q in ['"', '\''] {
        if v.len() >= 2 && v.starts_with(q) && v.ends_with(q) {
            let inner = &v[1..v.len() - 1];
            return Some(match q {
                '"' => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
                _ => inner.replace("''", "'"),
            });
        }
    }
    let v = match v.find(" #") {
        Some(i) => v[..i].trim_end(),
        None => v,
    };
    Some(v.to_string())
}

/// Every `*.md` file directly inside `dir`, sorted by file name; the id is the file stem.
#[tracing::instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub fn discover_posts(dir: impl AsRef<Path>) -> OgResult<Vec<RecordSource>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
        .map_err(|e| OgError::input(format!("read posts dir '{}': {e}", dir.display())))?;

    let mut posts: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| OgError::input(format!("read posts dir '{}': {e}", dir.display())))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping post with a non UTF-8 name");
            continue;
        };
        posts.push((stem.to_string(), path));
    }
    posts.sort_by(|a, b| a.1.file_name().cmp(&b.1.file_name()));

    let mut sources = Vec::with_capacity(posts.len());
    for (id, path) in posts {
        let source = match std::fs::read_to_string(&path) {
            Ok(markdown) => parse_front_matter(id, &markdown),
            Err(e) => RecordSource::reject(id, format!("read post '{}': {e}", path.display())),
        };
        sources.push(source);
    }
    tracing::debug!(count = sources.len(), "discovered posts");
    Ok(sources)
}

/// Records from a JSON array of `{ "id", "title", "created" }` objects.
///
/// Only an unreadable file or one that is not a JSON array fails here. An entry that does not
/// fit the record shape comes back rejected, under its `id` when it has a string one and
/// `#<index>` otherwise.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_manifest(path: impl AsRef<Path>) -> OgResult<Vec<RecordSource>> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path)
        .map_err(|e| OgError::input(format!("read manifest '{}': {e}", path.display())))?;
    let entries: Vec<serde_json::Value> = serde_json::from_str(&s)
        .map_err(|e| OgError::input(format!("parse manifest '{}': {e}", path.display())))?;

    let sources: Vec<RecordSource> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| manifest_entry(index, entry))
        .collect();
    tracing::debug!(count = sources.len(), "loaded manifest");
    Ok(sources)
}

fn manifest_entry(index: usize, entry: serde_json::Value) -> RecordSource {
    let id = entry
        .get("id")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);
    match serde_json::from_value::<RecordSource>(entry) {
        Ok(source) => source,
        Err(e) => {
            let id = id.unwrap_or_else(|| format!("#{index}"));
            tracing::warn!(index, id = %id, error = %e, "malformed manifest entry");
            RecordSource::reject(id, format!("manifest entry {index}: {e}"))
        }
    }
}

/// Ids become file names under the output directory, so they must be plain and unique.
///
/// Rejects every source whose id is unusable, and every repeat of an id after its first use.
/// Returns how many sources were rejected.
pub fn reject_unusable_ids(sources: &mut [RecordSource]) -> usize {
    let mut seen = HashSet::new();
    let mut rejected = 0;
    for s in sources.iter_mut().filter(|s| s.rejected.is_none()) {
        let id = s.id.as_str();
        let reason = if id.trim().is_empty()
            || id == "."
            || id == ".."
            || id.contains(['/', '\\'])
        {
            "id is not usable as a file name"
        } else if !seen.insert(id.to_string()) {
            "duplicate record id"
        } else {
            continue;
        };
        s.rejected = Some(reason.to_string());
        rejected += 1;
    }
    rejected
}

#[cfg(test)]
#[path = "../tests/unit/record/record.rs"]
mod tests;
