//! Snapshot table codec.
//!
//! # Responsibility
//! - Write the full record sequence into snapshot tables in one transaction.
//! - Read records back in their stored order.
//!
//! # Invariants
//! - `records.position` preserves store iteration order.
//! - `record_labels.position` preserves label order, duplicates included.

use crate::db::DbResult;
use crate::model::record::Record;
use rusqlite::{params, Connection};

/// Replaces all snapshot rows with `records`.
pub fn write_snapshot(conn: &mut Connection, records: &[Record]) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM record_labels;", [])?;
    tx.execute("DELETE FROM records;", [])?;

    {
        let mut insert_record =
            tx.prepare("INSERT INTO records (position, name, text) VALUES (?1, ?2, ?3);")?;
        let mut insert_label = tx.prepare(
            "INSERT INTO record_labels (record_name, position, value) VALUES (?1, ?2, ?3);",
        )?;

        for (position, record) in records.iter().enumerate() {
            insert_record.execute(params![position as i64, record.name(), record.text()])?;
            for (label_position, label) in record.labels().iter().enumerate() {
                insert_label.execute(params![
                    record.name(),
                    label_position as i64,
                    label.value()
                ])?;
            }
        }
    }

    tx.commit()?;
    Ok(())
}

/// Reads all records ordered by their stored position.
pub fn read_snapshot(conn: &Connection) -> DbResult<Vec<Record>> {
    let mut stmt = conn.prepare("SELECT name, text FROM records ORDER BY position ASC;")?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        let text: String = row.get("text")?;
        let labels = load_labels(conn, &name)?;
        records.push(Record::new(name, labels, text));
    }
    Ok(records)
}

fn load_labels(conn: &Connection, record_name: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT value
         FROM record_labels
         WHERE record_name = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([record_name])?;
    let mut labels = Vec::new();
    while let Some(row) = rows.next()? {
        labels.push(row.get(0)?);
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::{read_snapshot, write_snapshot};
    use crate::db::open_db_in_memory;
    use crate::model::record::Record;

    #[test]
    fn write_then_read_preserves_order_and_duplicate_labels() {
        let mut conn = open_db_in_memory().unwrap();
        let records = vec![
            Record::new("zeta", ["b", "a", "b"], "last by name, first by position"),
            Record::new("alpha", Vec::<String>::new(), ""),
        ];

        write_snapshot(&mut conn, &records).unwrap();
        assert_eq!(read_snapshot(&conn).unwrap(), records);
    }

    #[test]
    fn rewriting_replaces_previous_rows() {
        let mut conn = open_db_in_memory().unwrap();
        write_snapshot(&mut conn, &[Record::new("old", ["x"], "gone")]).unwrap();
        write_snapshot(&mut conn, &[Record::new("new", ["y"], "kept")]).unwrap();

        let loaded = read_snapshot(&conn).unwrap();
        assert_eq!(loaded, vec![Record::new("new", ["y"], "kept")]);
        let orphan_labels: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM record_labels WHERE record_name = 'old';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphan_labels, 0);
    }
}
