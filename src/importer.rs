use std::io::Read;
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::categorizer;
use crate::error::{KasboekError, Result};
use crate::models::FileParseResult;
use crate::parser::RabobankRowParser;
use crate::store;

/// Import a Rabobank CSV export for one user.
pub fn import_file(conn: &Connection, file_path: &Path, user_id: i64) -> Result<FileParseResult> {
    let file = std::fs::File::open(file_path)?;
    import_stream(conn, file, user_id)
}

/// Process every row of a CSV stream independently and tally the outcomes.
///
/// The first row is the bank's header and is skipped. A failing row never
/// aborts the run: parse and validation failures count as faulty, a dedup-code
/// collision counts as duplicate. Rows are handled sequentially so a category
/// assigned while processing row N can be found by row N+1's similarity
/// search. Database and IO failures are real errors and do propagate.
pub fn import_stream<R: Read>(
    conn: &Connection,
    reader: R,
    user_id: i64,
) -> Result<FileParseResult> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let parser = RabobankRowParser;
    let mut result = FileParseResult::default();

    for record in csv_reader.records().skip(1) {
        let record = match record {
            Ok(record) => record,
            Err(reason) => {
                debug!(%reason, "skipping unreadable row");
                result.faulty += 1;
                continue;
            }
        };
        process_row(conn, &parser, &record, user_id, &mut result)?;
    }

    info!(
        successful = result.successful,
        duplicate = result.duplicate,
        faulty = result.faulty,
        "import finished"
    );
    Ok(result)
}

fn process_row(
    conn: &Connection,
    parser: &RabobankRowParser,
    record: &csv::StringRecord,
    user_id: i64,
    result: &mut FileParseResult,
) -> Result<()> {
    let mut transaction = match parser.parse(record) {
        Ok(transaction) => transaction,
        Err(KasboekError::MalformedRow(reason)) | Err(KasboekError::InvalidAmount(reason)) => {
            debug!(%reason, "skipping faulty row");
            result.faulty += 1;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    transaction.user_id = Some(user_id);
    if let Err(reason) = transaction.validate() {
        debug!(%reason, "skipping invalid row");
        result.faulty += 1;
        return Ok(());
    }

    match store::insert_transaction(conn, &transaction) {
        Ok(event) => {
            categorizer::handle_save(conn, &event)?;
            result.successful += 1;
        }
        Err(KasboekError::Duplicate(_)) => result.duplicate += 1,
        Err(KasboekError::Validation(_)) => result.faulty += 1,
        Err(e) => return Err(e),
    }
    Ok(())
}
