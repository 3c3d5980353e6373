use std::collections::BTreeMap;

use rusqlite::{params, Connection, OptionalExtension};

use crate::distribute::{DistributionStore, GroupMove};
use crate::error::{Result, TadistError};
use crate::map_db_err;
use crate::model::{Assignee, GraderId, Group, GroupId, PartId};

use super::Database;

fn read_assignee(conn: &Connection, part: &PartId, group: GroupId) -> Result<Assignee> {
    let ta: Option<String> = conn
        .query_row(
            "SELECT ta FROM distribution WHERE part = ?1 AND group_id = ?2",
            params![part.as_str(), group.0],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| map_db_err!("read distribution record", e))?;

    Ok(ta.map(GraderId::new).into())
}

impl Database {
    fn group_label(&self, group: GroupId) -> String {
        self.group(group)
            .map(|g| g.name)
            .unwrap_or_else(|_| group.to_string())
    }

    fn stale(
        &self,
        part: &PartId,
        group: GroupId,
        expected: &Assignee,
        actual: &Assignee,
    ) -> TadistError {
        let expected = match expected {
            Assignee::Unassigned => "unassigned".to_string(),
            Assignee::Grader(g) => format!("assigned to {}", g),
        };
        TadistError::StaleAssignment {
            part: part.to_string(),
            group: self.group_label(group),
            expected,
            actual: actual.to_string(),
        }
    }
}

impl DistributionStore for Database {
    fn assign(&self, part: &PartId, group: GroupId, grader: &GraderId) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| TadistError::transaction("begin assign", e))?;

        match read_assignee(&tx, part, group)? {
            Assignee::Grader(existing) if &existing == grader => return Ok(()),
            Assignee::Grader(existing) => {
                return Err(self.stale(
                    part,
                    group,
                    &Assignee::Unassigned,
                    &Assignee::Grader(existing),
                ))
            }
            Assignee::Unassigned => {}
        }

        tx.execute(
            "INSERT INTO distribution (part, group_id, ta) VALUES (?1, ?2, ?3)",
            params![part.as_str(), group.0, grader.as_str()],
        )
        .map_err(|e| map_db_err!("insert distribution record", e))?;

        tx.commit()
            .map_err(|e| TadistError::transaction("commit assign", e))
    }

    fn unassign(&self, part: &PartId, group: GroupId, grader: &GraderId) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM distribution WHERE part = ?1 AND group_id = ?2 AND ta = ?3",
                params![part.as_str(), group.0, grader.as_str()],
            )
            .map_err(|e| map_db_err!("delete distribution record", e))?;

        if changed == 0 {
            let actual = read_assignee(&self.conn, part, group)?;
            return Err(self.stale(part, group, &Assignee::Grader(grader.clone()), &actual));
        }
        Ok(())
    }

    fn is_empty(&self, part: &PartId) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM distribution WHERE part = ?1",
                params![part.as_str()],
                |r| r.get(0),
            )
            .map_err(|e| map_db_err!("count distribution records", e))?;
        Ok(count == 0)
    }

    fn assigned_groups(&self, part: &PartId, grader: &GraderId) -> Result<Vec<Group>> {
        self.load_groups(
            "WHERE g.id IN (SELECT group_id FROM distribution WHERE part = ?1 AND ta = ?2)",
            &[&part.as_str(), &grader.as_str()],
        )
    }

    fn assignee(&self, part: &PartId, group: GroupId) -> Result<Assignee> {
        read_assignee(&self.conn, part, group)
    }

    fn distribution(&self, part: &PartId) -> Result<BTreeMap<GroupId, GraderId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT group_id, ta FROM distribution WHERE part = ?1")
            .map_err(|e| map_db_err!("prepare distribution query", e))?;

        let records = stmt
            .query_map(params![part.as_str()], |r| {
                Ok((
                    GroupId(r.get::<_, i64>(0)?),
                    GraderId::new(r.get::<_, String>(1)?),
                ))
            })
            .map_err(|e| map_db_err!("read distribution", e))?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()
            .map_err(|e| map_db_err!("read distribution row", e))?;

        Ok(records)
    }

    #[tracing::instrument(skip(self, batch), fields(parts = batch.len()))]
    fn replace_distributions(&self, batch: &[(PartId, Vec<(GroupId, GraderId)>)]) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| TadistError::transaction("begin distribution write", e))?;

        for (part, records) in batch {
            tx.execute(
                "DELETE FROM distribution WHERE part = ?1",
                params![part.as_str()],
            )
            .map_err(|e| map_db_err!("clear distribution", e))?;

            let mut insert = tx
                .prepare_cached("INSERT INTO distribution (part, group_id, ta) VALUES (?1, ?2, ?3)")
                .map_err(|e| map_db_err!("prepare distribution insert", e))?;

            for (group, grader) in records {
                insert
                    .execute(params![part.as_str(), group.0, grader.as_str()])
                    .map_err(|e| map_db_err!("insert distribution record", e))?;
            }

            tracing::debug!(part = %part, records = records.len(), "wrote distribution");
        }

        tx.commit()
            .map_err(|e| TadistError::transaction("commit distribution write", e))
    }

    #[tracing::instrument(skip_all, fields(part = %part, moves = moves.len()))]
    fn move_groups(&self, part: &PartId, moves: &[GroupMove]) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| TadistError::transaction("begin move", e))?;

        for m in moves {
            let actual = read_assignee(&tx, part, m.group)?;
            if actual != m.from {
                return Err(self.stale(part, m.group, &m.from, &actual));
            }

            tx.execute(
                "DELETE FROM distribution WHERE part = ?1 AND group_id = ?2",
                params![part.as_str(), m.group.0],
            )
            .map_err(|e| map_db_err!("delete distribution record", e))?;

            if let Assignee::Grader(grader) = &m.to {
                tx.execute(
                    "INSERT INTO distribution (part, group_id, ta) VALUES (?1, ?2, ?3)",
                    params![part.as_str(), m.group.0, grader.as_str()],
                )
                .map_err(|e| map_db_err!("insert distribution record", e))?;
            }
        }

        tx.commit()
            .map_err(|e| TadistError::transaction("commit move", e))
    }
}
