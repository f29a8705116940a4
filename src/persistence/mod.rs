//! Task file codec.
//!
//! One record per line: `text||doneFlag||priority`, where the flag is `True`
//! or `False` and the priority is `0..=3`. The legacy form `text||doneFlag`
//! loads with priority 0. Text is not escaped and must not contain `||`.

mod error;
mod file;

pub use error::PersistenceError;
pub use file::TaskFile;

use crate::canvas::{TaskSnapshot, MAX_PRIORITY};
use log::*;

const SEPARATOR: &str = "||";
const TRUE_FLAG: &str = "True";
const FALSE_FLAG: &str = "False";

/// One persisted task.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRecord {
    pub text: String,
    pub done: bool,
    pub priority: u8,
}

impl From<&TaskSnapshot> for TaskRecord {
    fn from(task: &TaskSnapshot) -> Self {
        TaskRecord {
            text: task.text.clone(),
            done: task.done,
            priority: task.priority,
        }
    }
}

/// Encode records into the file format, one newline-terminated line each.
///
pub fn encode(records: &[TaskRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let flag = if record.done { TRUE_FLAG } else { FALSE_FLAG };
        out.push_str(&format!(
            "{}{}{}{}{}\n",
            record.text, SEPARATOR, flag, SEPARATOR, record.priority
        ));
    }
    out
}

/// Decode a single line. `number` is used for error reporting only.
///
pub fn decode_line(line: &str, number: usize) -> Result<TaskRecord, PersistenceError> {
    let malformed = |reason: String| PersistenceError::MalformedRecord {
        line: number,
        reason,
    };
    // Flag and priority are taken from the right so text may end in `|`.
    let mut fields: Vec<&str> = line.trim().rsplitn(3, SEPARATOR).collect();
    fields.reverse();
    if fields.first().is_some_and(|text| text.contains(SEPARATOR)) {
        let count = line.trim().split(SEPARATOR).count();
        return Err(malformed(format!("expected 2 or 3 fields, found {}", count)));
    }
    let (text, flag, priority) = match fields.as_slice() {
        [text, flag] => (*text, *flag, 0),
        [text, flag, priority] => {
            let priority: u8 = priority
                .trim()
                .parse()
                .map_err(|_| malformed(format!("invalid priority '{}'", priority)))?;
            if priority > MAX_PRIORITY {
                return Err(malformed(format!("priority {} out of range", priority)));
            }
            (*text, *flag, priority)
        }
        _ => return Err(malformed(format!("expected 2 or 3 fields, found {}", fields.len()))),
    };
    let done = match flag.trim() {
        TRUE_FLAG => true,
        FALSE_FLAG => false,
        other => return Err(malformed(format!("invalid done flag '{}'", other))),
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(malformed("empty task text".to_string()));
    }
    Ok(TaskRecord {
        text: text.to_string(),
        done,
        priority,
    })
}

/// Decode a whole file. Blank lines are ignored and malformed lines are
/// skipped with a warning.
///
pub fn decode(content: &str) -> Vec<TaskRecord> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match decode_line(line, index + 1) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping task line: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    #[test]
    fn round_trip_preserves_order_and_fields() {
        let records: Vec<TaskRecord> = (0..8)
            .map(|i| TaskRecord {
                text: Sentence(1..5).fake::<String>().replace(SEPARATOR, "|"),
                done: i % 3 == 0,
                priority: (i % 4) as u8,
            })
            .filter(|record| !record.text.trim().is_empty())
            .collect();
        let encoded = encode(&records);
        let decoded = decode(&encoded);
        let trimmed: Vec<TaskRecord> = records
            .into_iter()
            .map(|record| TaskRecord {
                text: record.text.trim().to_string(),
                ..record
            })
            .collect();
        assert_eq!(decoded, trimmed);
    }

    #[test]
    fn text_ending_in_pipe_survives_reload() {
        let records: Vec<TaskRecord> = ["pay A|", "|", "a | b |"]
            .iter()
            .enumerate()
            .map(|(i, text)| TaskRecord {
                text: text.to_string(),
                done: i == 1,
                priority: i as u8,
            })
            .collect();
        let encoded = encode(&records);
        assert!(encoded.starts_with("pay A|||False||0\n"));
        assert_eq!(decode(&encoded), records);
        assert_eq!(decode_line("odd|||True", 1).unwrap().text, "odd|");
    }

    #[test]
    fn encodes_flags_as_words() {
        let records = vec![TaskRecord {
            text: "Call mom".to_string(),
            done: false,
            priority: 2,
        }];
        assert_eq!(encode(&records), "Call mom||False||2\n");
    }

    #[test]
    fn legacy_lines_default_to_priority_zero() {
        let record = decode_line("Water plants||True", 1).unwrap();
        assert_eq!(
            record,
            TaskRecord {
                text: "Water plants".to_string(),
                done: true,
                priority: 0,
            }
        );
    }

    #[test]
    fn decodes_example_file() {
        let records = decode("Call mom||False||2\nWrite report||True||0\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "Call mom");
        assert_eq!(records[0].priority, 2);
        assert!(!records[0].done);
        assert!(records[1].done);
    }

    #[test]
    fn skips_lines_with_other_field_counts() {
        let records = decode("just text\na||True||1||extra\n\nkept||False\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "kept");
    }

    #[test]
    fn rejects_bad_flags_and_priorities() {
        assert!(matches!(
            decode_line("x||yes||1", 3),
            Err(PersistenceError::MalformedRecord { line: 3, .. })
        ));
        assert!(decode_line("x||True||7", 1).is_err());
        assert!(decode_line("x||True||high", 1).is_err());
        assert!(decode_line("||True||1", 1).is_err());
    }

    #[test]
    fn tolerates_windows_line_endings() {
        let records = decode("a||True||3\r\nb||False\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].priority, 3);
        assert!(!records[1].done);
    }
}
