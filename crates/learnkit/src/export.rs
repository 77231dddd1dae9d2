//! Export formats.

use lcore::Flashcard;
use std::io;

/// Write flashcards as CSV with a `question,answer` header, for Anki import.
pub fn flashcards_csv<W: io::Write>(cards: &[Flashcard], writer: W) -> io::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["question", "answer"])?;
    for card in cards {
        csv.write_record([card.question.as_str(), card.answer.as_str()])?;
    }
    csv.flush()
}
