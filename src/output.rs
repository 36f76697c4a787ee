//! Rendering of search results.

use std::{io::Write, str::FromStr};

use crate::{
    error::{Error, Result},
    record::Record,
    search::SearchResult,
};

const CSV_HEADER: [&str; 6] =
    ["Query", "Occurrences", "Year", "Publication", "Author(s)", "Title"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One indented block per result.
    #[default]
    Pretty,
    /// Comma-separated values with a header row.
    Csv,
    /// Comma-separated values without a header row.
    CsvNoHeader,
    /// A pretty-printed JSON array.
    Json,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "csv" => Ok(Self::Csv),
            "csv-no-hdr" => Ok(Self::CsvNoHeader),
            "json" => Ok(Self::Json),
            other => Err(Error::Config(format!(
                "invalid result format: {other} (expected pretty, csv, \
                 csv-no-hdr, or json)"
            ))),
        }
    }
}

/// Write `results` to `out` in `format`.
pub fn write_results(
    out: &mut dyn Write,
    results: &[SearchResult],
    format: Format,
) -> Result<()> {
    match format {
        Format::Pretty => {
            for r in results {
                write_pretty(out, r)?;
            }
        }
        Format::Csv => {
            writeln!(out, "{}", CSV_HEADER.join(","))?;
            for r in results {
                write_csv(out, r)?;
            }
        }
        Format::CsvNoHeader => {
            for r in results {
                write_csv(out, r)?;
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, results)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Write the full metadata block for one record, ending in a blank line.
pub fn write_record_details(
    out: &mut dyn Write,
    record: &Record,
    hash: &str,
) -> Result<()> {
    writeln!(out, "Title: {}", record.title)?;
    writeln!(out, "Author(s): {}", record.authors.join(" / "))?;
    writeln!(out, "Publication: {}", record.publication)?;
    writeln!(out, "Year: {}", record.year)?;
    writeln!(out, "Language: {}", record.language)?;
    writeln!(out, "Metadata Hash: {hash}")?;
    writeln!(out)?;
    Ok(())
}

fn write_pretty(out: &mut dyn Write, r: &SearchResult) -> Result<()> {
    writeln!(out, "Query: {}", r.query)?;
    writeln!(out, "   Occurrences: {}", r.occurrences)?;
    writeln!(out, "   Year:        {}", r.record.year)?;
    writeln!(out, "   Publication: {}", r.record.publication)?;
    writeln!(out, "   Author(s):   {}", r.record.authors.join(" / "))?;
    writeln!(out, "   Title:       {}", r.record.title)?;
    writeln!(out)?;
    Ok(())
}

fn write_csv(out: &mut dyn Write, r: &SearchResult) -> Result<()> {
    let fields = [
        r.query.clone(),
        r.occurrences.to_string(),
        r.record.year.to_string(),
        r.record.publication.clone(),
        r.record.authors.join(" / "),
        r.record.title.clone(),
    ];
    let line: Vec<String> = fields.iter().map(|f| csv_quote(f)).collect();
    writeln!(out, "{}", line.join(","))?;
    Ok(())
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::record;

    fn result() -> SearchResult {
        SearchResult {
            query: "deep learning".into(),
            occurrences: 3,
            record: record(
                "A \"Deep\" Review",
                "Nature",
                2015,
                &["Smith", "Jones"],
            ),
        }
    }

    fn render(format: Format) -> String {
        let mut buf = Vec::new();
        write_results(&mut buf, &[result()], format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("pretty".parse::<Format>().unwrap(), Format::Pretty);
        assert_eq!("CSV".parse::<Format>().unwrap(), Format::Csv);
        assert_eq!(
            "csv-no-hdr".parse::<Format>().unwrap(),
            Format::CsvNoHeader
        );
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn pretty_block() {
        let out = render(Format::Pretty);
        assert!(out.starts_with("Query: deep learning\n"));
        assert!(out.contains("   Occurrences: 3\n"));
        assert!(out.contains("   Author(s):   Smith / Jones\n"));
        assert!(out.ends_with("\n\n"));
    }

    #[test]
    fn csv_with_header_escapes_quotes() {
        let out = render(Format::Csv);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Query,Occurrences,Year,Publication,Author(s),Title");
        assert_eq!(
            lines[1],
            r#""deep learning","3","2015","Nature","Smith / Jones","A ""Deep"" Review""#
        );
    }

    #[test]
    fn csv_without_header() {
        let out = render(Format::CsvNoHeader);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("\"deep learning\""));
    }

    #[test]
    fn record_details_block() {
        let mut r = record("Deep Learning", "Nature", 2015, &["Smith", "Jones"]);
        r.language = "eng".into();
        let mut buf = Vec::new();
        write_record_details(&mut buf, &r, &r.hash_string()).unwrap();

        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            format!(
                "Title: Deep Learning\nAuthor(s): Smith / Jones\n\
                 Publication: Nature\nYear: 2015\nLanguage: eng\n\
                 Metadata Hash: {}\n\n",
                r.hash_string()
            )
        );
    }

    #[test]
    fn json_array() {
        let out = render(Format::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["query"], "deep learning");
        assert_eq!(value[0]["occurrences"], 3);
        assert_eq!(value[0]["record"]["year"], 2015);
    }
}
