//! CSV input and output for raw tickets and curated training samples.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use log::info;

use crate::curation::{LabeledTicket, Ticket, TrainingSample};
use crate::error::{missing_file, ClassifierError};

fn open(path: &Path, kind: &str) -> Result<File, ClassifierError> {
    File::open(path).map_err(|e| ClassifierError::DataError(missing_file(kind, path, e)))
}

/// Reads raw tickets from a CSV file, taking the body from `text_column`.
///
/// Other columns are ignored; short rows yield an empty body.
pub fn read_tickets(path: &Path, text_column: &str) -> Result<Vec<Ticket>, ClassifierError> {
    let tickets = read_tickets_from(open(path, "Ticket")?, text_column)?;
    info!("Read {} raw tickets from {:?}", tickets.len(), path);
    Ok(tickets)
}

pub fn read_tickets_from<R: Read>(reader: R, text_column: &str) -> Result<Vec<Ticket>, ClassifierError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let column = headers
        .iter()
        .position(|header| header.trim() == text_column)
        .ok_or_else(|| {
            ClassifierError::DataError(format!(
                "Column '{}' not found; available columns: {}",
                text_column,
                headers.iter().collect::<Vec<_>>().join(", ")
            ))
        })?;

    let mut tickets = Vec::new();
    for record in reader.records() {
        let record = record?;
        tickets.push(Ticket::new(record.get(column).unwrap_or_default()));
    }
    Ok(tickets)
}

/// Writes a curated sample as CSV (`body`, `cleaned_description`, `category`),
/// creating parent directories as needed.
pub fn write_sample(path: &Path, sample: &TrainingSample) -> Result<(), ClassifierError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ClassifierError::data("Failed to create sample directory", e))?;
    }
    let file = File::create(path).map_err(|e| ClassifierError::data("Failed to create sample file", e))?;
    write_sample_to(file, sample)?;
    info!("Wrote {} curated tickets to {:?}", sample.len(), path);
    Ok(())
}

pub fn write_sample_to<W: Write>(writer: W, sample: &TrainingSample) -> Result<(), ClassifierError> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    for record in sample.records() {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| ClassifierError::data("Failed to flush sample", e))?;
    Ok(())
}

pub fn read_sample(path: &Path) -> Result<TrainingSample, ClassifierError> {
    let sample = read_sample_from(open(path, "Training sample")?)?;
    info!("Read {} curated tickets from {:?}", sample.len(), path);
    Ok(sample)
}

pub fn read_sample_from<R: Read>(reader: R) -> Result<TrainingSample, ClassifierError> {
    let mut reader = ReaderBuilder::new().from_reader(reader);
    let mut records = Vec::new();
    for (i, record) in reader.deserialize::<LabeledTicket>().enumerate() {
        let record = record.map_err(|e| ClassifierError::data(&format!("Malformed sample row {}", i + 1), e))?;
        records.push(record);
    }
    TrainingSample::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    #[test]
    fn test_read_tickets_picks_column() {
        let csv = "subject,body,priority\nHi,\"Forgot password, help\",high\nYo,Refund please,low\nshort\n";
        let tickets = read_tickets_from(csv.as_bytes(), "body").unwrap();
        assert_eq!(tickets.len(), 3);
        assert_eq!(tickets[0].body, "Forgot password, help");
        assert_eq!(tickets[2].body, "");
    }

    #[test]
    fn test_missing_column() {
        let csv = "subject,text\nHi,hello\n";
        let result = read_tickets_from(csv.as_bytes(), "body");
        assert!(matches!(result, Err(ClassifierError::DataError(msg)) if msg.contains("body")));
    }

    #[test]
    fn test_missing_file() {
        let result = read_tickets(Path::new("/definitely/not/here.csv"), "body");
        assert!(matches!(result, Err(ClassifierError::DataError(msg)) if msg.contains("not found")));
    }

    #[test]
    fn test_sample_csv_layout() {
        let sample = TrainingSample::from_records(vec![LabeledTicket {
            raw_text: "Can't login!".into(),
            cleaned_text: "cant login".into(),
            category: Category::Login,
        }])
        .unwrap();
        let mut buffer = Vec::new();
        write_sample_to(&mut buffer, &sample).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(text, "body,cleaned_description,category\nCan't login!,cant login,Login\n");
        assert_eq!(read_sample_from(buffer.as_slice()).unwrap(), sample);
    }

    #[test]
    fn test_sample_with_unknown_category() {
        let csv = "body,cleaned_description,category\nx,x,Shipping\n";
        assert!(read_sample_from(csv.as_bytes()).is_err());
    }
}
