// src/question_bank.rs

use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use rand::seq::SliceRandom;

use crate::models::question::Question;

/// Failure to read the question bank.
#[derive(Debug)]
pub enum QuestionBankError {
    Io(io::Error),

    /// Malformed CSV or a field that is not valid UTF-8.
    Csv(csv::Error),

    /// A row without both a prompt and a marker.
    ShortRow { line: u64 },
}

impl fmt::Display for QuestionBankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionBankError::Io(err) => write!(f, "failed to open question bank: {}", err),
            QuestionBankError::Csv(err) => write!(f, "failed to parse question bank: {}", err),
            QuestionBankError::ShortRow { line } => {
                write!(f, "question bank line {} has no answer marker", line)
            }
        }
    }
}

impl std::error::Error for QuestionBankError {}

impl From<io::Error> for QuestionBankError {
    fn from(err: io::Error) -> Self {
        QuestionBankError::Io(err)
    }
}

impl From<csv::Error> for QuestionBankError {
    fn from(err: csv::Error) -> Self {
        QuestionBankError::Csv(err)
    }
}

/// All questions of the bank, in file order.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Reads a `;`-delimited bank without header row.
    pub fn load(path: &Path) -> Result<Self, QuestionBankError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, QuestionBankError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut questions = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let fields = record.iter().map(str::to_owned).collect();
            let question = Question::from_fields(fields).ok_or(QuestionBankError::ShortRow { line })?;
            questions.push(question);
        }

        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Picks `count` questions without replacement, or every question when
    /// the bank is smaller than that.
    pub fn sample(&self, count: usize) -> Vec<Question> {
        let mut rng = rand::thread_rng();
        self.questions
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const BANK: &str = "\
Capital of France?;Berlin;Paris;Rome;Madrid;B
2 + 2?;3;4;5;6;B
Largest planet?;Jupiter;Mars;Venus;Earth;A
Water boils at (C)?;90;100;110;120;B
Fastest land animal?;Lion;Cheetah;Horse;Hare;B
Binary of 2?;01;10;11;00;B
";

    #[test]
    fn loads_rows_in_order() {
        let bank = QuestionBank::from_reader(BANK.as_bytes()).unwrap();

        assert_eq!(bank.len(), 6);
        assert_eq!(bank.questions()[0].text, "Capital of France?");
        assert_eq!(bank.questions()[0].options[1], "Paris");
        assert_eq!(bank.questions()[2].answer, "A");
    }

    #[test]
    fn decodes_utf8_fields() {
        let bank = QuestionBank::from_reader("Ile de la Cité?;Oui;Non;A\n".as_bytes()).unwrap();
        assert_eq!(bank.questions()[0].text, "Ile de la Cité?");
    }

    #[test]
    fn tolerates_ragged_rows() {
        let raw = "Short one?;yes;no;A\nLong one?;a;b;c;d;D\n";
        let bank = QuestionBank::from_reader(raw.as_bytes()).unwrap();

        assert_eq!(bank.questions()[0].options.len(), 2);
        assert_eq!(bank.questions()[1].options.len(), 4);
    }

    #[test]
    fn reports_rows_without_marker() {
        let raw = "Fine?;a;b;A\nbroken\n";
        let err = QuestionBank::from_reader(raw.as_bytes()).unwrap_err();

        assert!(matches!(err, QuestionBankError::ShortRow { line: 2 }));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let raw: &[u8] = b"Bad \xff byte?;a;b;A\n";
        let err = QuestionBank::from_reader(raw).unwrap_err();

        assert!(matches!(err, QuestionBankError::Csv(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = QuestionBank::load(Path::new("/nonexistent/questions.csv")).unwrap_err();
        assert!(matches!(err, QuestionBankError::Io(_)));
    }

    #[test]
    fn sample_draws_distinct_questions() {
        let bank = QuestionBank::from_reader(BANK.as_bytes()).unwrap();

        for _ in 0..20 {
            let picked = bank.sample(5);
            assert_eq!(picked.len(), 5);

            let distinct: HashSet<&str> = picked.iter().map(|q| q.text.as_str()).collect();
            assert_eq!(distinct.len(), 5);
        }
    }

    #[test]
    fn sample_is_capped_by_bank_size() {
        let bank = QuestionBank::from_reader("Only?;a;b;A\n".as_bytes()).unwrap();
        assert_eq!(bank.sample(5).len(), 1);
        assert!(QuestionBank::default().sample(5).is_empty());
    }
}
