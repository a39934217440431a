// SPDX-License-Identifier: PMPL-1.0-or-later
//! Read-only views over the table: sorted listing, substring search, and
//! aggregate summaries.
//!
//! Every view operates on a copy or on borrowed records; the authoritative
//! table is never reordered.

use serde::Serialize;

use crate::args::Field;
use crate::error::MarkbookError;
use crate::record::{GradeBand, Record};
use crate::table::RecordTable;

// ---------------------------------------------------------------------------
// Sorted listing
// ---------------------------------------------------------------------------

/// Sortable columns for SHOW ALL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Mark,
    Programme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub dir: SortDir,
}

/// Parse the optional `SORT BY <key> [ASC|DESC]` tail of a SHOW ALL command.
///
/// No clause means insertion order (`None`). A clause naming an unknown key
/// is rejected rather than silently ignored.
pub fn parse_sort_clause(args: &str) -> Result<Option<SortSpec>, MarkbookError> {
    let upper = args.to_uppercase();
    let Some(at) = upper.find("SORT BY") else {
        return Ok(None);
    };

    let tail = &upper[at + "SORT BY".len()..];
    let mut tokens = tail.split_whitespace();
    let key = match tokens.next() {
        Some("ID") => SortKey::Id,
        Some("MARK") => SortKey::Mark,
        Some("PROGRAMME") => SortKey::Programme,
        _ => return Err(MarkbookError::BadSortClause(args.trim().to_string())),
    };
    let dir = match tokens.next() {
        Some("DESC") => SortDir::Desc,
        _ => SortDir::Asc,
    };

    Ok(Some(SortSpec { key, dir }))
}

/// A sorted copy of the table (or an insertion-order copy when `spec` is
/// `None`). Ties always break by ascending id, so repeated sorts of the
/// same input are identical.
pub fn sorted_view(table: &RecordTable, spec: Option<SortSpec>) -> Vec<Record> {
    let mut rows: Vec<Record> = table.records().to_vec();
    let Some(spec) = spec else {
        return rows;
    };

    rows.sort_by(|a, b| {
        let primary = match spec.key {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Mark => a.mark.total_cmp(&b.mark),
            SortKey::Programme => a.programme.cmp(&b.programme),
        };
        let primary = match spec.dir {
            SortDir::Asc => primary,
            SortDir::Desc => primary.reverse(),
        };
        primary.then(a.id.cmp(&b.id))
    });
    rows
}

// ---------------------------------------------------------------------------
// Substring search
// ---------------------------------------------------------------------------

/// Searchable text columns for FIND.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Name,
    Programme,
}

impl SearchField {
    /// The argument marker carrying the keyword for this field.
    pub fn marker(self) -> Field {
        match self {
            SearchField::Name => Field::Name,
            SearchField::Programme => Field::Programme,
        }
    }
}

/// Case-insensitive containment search, results in table order. An empty
/// result is a normal outcome, not an error.
pub fn find_containing<'a>(
    table: &'a RecordTable,
    field: SearchField,
    keyword: &str,
) -> Vec<&'a Record> {
    let needle = keyword.to_lowercase();
    table
        .records()
        .iter()
        .filter(|r| {
            let haystack = match field {
                SearchField::Name => &r.name,
                SearchField::Programme => &r.programme,
            };
            haystack.to_lowercase().contains(&needle)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Tally of records per grade band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GradeBands {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
    pub f: usize,
}

impl GradeBands {
    fn count(&mut self, band: GradeBand) {
        match band {
            GradeBand::A => self.a += 1,
            GradeBand::B => self.b += 1,
            GradeBand::C => self.c += 1,
            GradeBand::D => self.d += 1,
            GradeBand::F => self.f += 1,
        }
    }
}

/// Whole-table aggregate: count, mean, extremes, and grade bands.
/// Defined only for a non-empty table.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub highest: Record,
    pub lowest: Record,
    pub bands: GradeBands,
}

/// Compute the global summary, or `None` when the table is empty.
/// Ties for highest/lowest go to the first occurrence in table order.
pub fn summarize(table: &RecordTable) -> Option<Summary> {
    let records = table.records();
    let first = records.first()?;

    let mut sum = 0.0;
    let mut highest = first;
    let mut lowest = first;
    let mut bands = GradeBands::default();

    for record in records {
        sum += record.mark;
        if record.mark > highest.mark {
            highest = record;
        }
        if record.mark < lowest.mark {
            lowest = record;
        }
        bands.count(record.grade_band());
    }

    Some(Summary {
        count: records.len(),
        mean: sum / records.len() as f64,
        highest: highest.clone(),
        lowest: lowest.clone(),
        bands,
    })
}

/// Count and mean mark for one programme group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgrammeSummary {
    pub programme: String,
    pub count: usize,
    pub mean: f64,
}

/// Group records by exact programme text, in first-seen order.
pub fn programme_summary(table: &RecordTable) -> Vec<ProgrammeSummary> {
    let mut groups: Vec<(String, usize, f64)> = Vec::new();

    for record in table.records() {
        match groups.iter_mut().find(|(p, _, _)| *p == record.programme) {
            Some((_, count, sum)) => {
                *count += 1;
                *sum += record.mark;
            }
            None => groups.push((record.programme.clone(), 1, record.mark)),
        }
    }

    groups
        .into_iter()
        .map(|(programme, count, sum)| ProgrammeSummary {
            programme,
            count,
            mean: sum / count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(u32, &str, &str, f64)]) -> RecordTable {
        let mut t = RecordTable::new();
        for &(id, name, programme, mark) in rows {
            t.insert(Record::new(id, name, programme, mark)).unwrap();
        }
        t
    }

    #[test]
    fn test_parse_sort_clause_variants() {
        assert_eq!(parse_sort_clause("").unwrap(), None);
        assert_eq!(parse_sort_clause("  ").unwrap(), None);

        let spec = parse_sort_clause(" SORT BY ID").unwrap().unwrap();
        assert_eq!(spec.key, SortKey::Id);
        assert_eq!(spec.dir, SortDir::Asc);

        let spec = parse_sort_clause(" sort by mark desc").unwrap().unwrap();
        assert_eq!(spec.key, SortKey::Mark);
        assert_eq!(spec.dir, SortDir::Desc);

        let spec = parse_sort_clause(" SORT BY PROGRAMME ASC").unwrap().unwrap();
        assert_eq!(spec.key, SortKey::Programme);
        assert_eq!(spec.dir, SortDir::Asc);
    }

    #[test]
    fn test_parse_sort_clause_unknown_key_rejected() {
        assert!(matches!(
            parse_sort_clause(" SORT BY NAME"),
            Err(MarkbookError::BadSortClause(_))
        ));
        assert!(matches!(
            parse_sort_clause(" SORT BY"),
            Err(MarkbookError::BadSortClause(_))
        ));
    }

    #[test]
    fn test_sorted_view_leaves_table_untouched() {
        let t = table(&[(3, "C", "CS", 50.0), (1, "A", "CS", 70.0)]);
        let spec = Some(SortSpec {
            key: SortKey::Id,
            dir: SortDir::Asc,
        });
        let view = sorted_view(&t, spec);
        assert_eq!(view[0].id, 1);
        // Authoritative table keeps insertion order.
        assert_eq!(t.records()[0].id, 3);
    }

    #[test]
    fn test_mark_ties_break_by_ascending_id() {
        let t = table(&[
            (30, "C", "CS", 70.0),
            (10, "A", "CS", 70.0),
            (20, "B", "CS", 55.0),
        ]);
        let asc = sorted_view(
            &t,
            Some(SortSpec {
                key: SortKey::Mark,
                dir: SortDir::Asc,
            }),
        );
        let ids: Vec<u32> = asc.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![20, 10, 30]);

        // Descending still breaks ties by ascending id.
        let desc = sorted_view(
            &t,
            Some(SortSpec {
                key: SortKey::Mark,
                dir: SortDir::Desc,
            }),
        );
        let ids: Vec<u32> = desc.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 30, 20]);
    }

    #[test]
    fn test_programme_sort_is_lexicographic() {
        let t = table(&[
            (1, "A", "Software Engineering", 60.0),
            (2, "B", "Computer Science", 60.0),
            (3, "C", "Information Security", 60.0),
        ]);
        let view = sorted_view(
            &t,
            Some(SortSpec {
                key: SortKey::Programme,
                dir: SortDir::Asc,
            }),
        );
        let progs: Vec<&str> = view.iter().map(|r| r.programme.as_str()).collect();
        assert_eq!(
            progs,
            vec![
                "Computer Science",
                "Information Security",
                "Software Engineering"
            ]
        );
    }

    #[test]
    fn test_find_is_case_insensitive_and_in_table_order() {
        let t = table(&[
            (1, "Michelle Lee", "CS", 70.0),
            (2, "Bob", "CS", 60.0),
            (3, "Shelly", "CS", 50.0),
        ]);
        let hits = find_containing(&t, SearchField::Name, "ELL");
        let ids: Vec<u32> = hits.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_find_no_matches_is_empty() {
        let t = table(&[(1, "Ann", "CS", 70.0)]);
        assert!(find_containing(&t, SearchField::Name, "zzz").is_empty());
    }

    #[test]
    fn test_find_by_programme() {
        let t = table(&[
            (1, "Ann", "Computer Science", 70.0),
            (2, "Bo", "Data Science", 60.0),
        ]);
        let hits = find_containing(&t, SearchField::Programme, "science");
        assert_eq!(hits.len(), 2);
        let hits = find_containing(&t, SearchField::Programme, "data");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn test_summary_empty_table_is_none() {
        assert!(summarize(&RecordTable::new()).is_none());
    }

    #[test]
    fn test_summary_scenario() {
        // Insert {1001, Ann, CS, 72.5} and {1002, Bo, CS, 55.0}:
        // count=2, mean=63.75, highest=Ann, lowest=Bo, bands B=1 D=1.
        let t = table(&[(1001, "Ann", "CS", 72.5), (1002, "Bo", "CS", 55.0)]);
        let s = summarize(&t).unwrap();
        assert_eq!(s.count, 2);
        assert!((s.mean - 63.75).abs() < 1e-9);
        assert_eq!(s.highest.name, "Ann");
        assert_eq!(s.lowest.name, "Bo");
        assert_eq!(s.bands.b, 1);
        assert_eq!(s.bands.d, 1);
        assert_eq!(s.bands.a + s.bands.c + s.bands.f, 0);
    }

    #[test]
    fn test_summary_ties_first_occurrence_wins() {
        let t = table(&[
            (1, "First", "CS", 70.0),
            (2, "Second", "CS", 70.0),
        ]);
        let s = summarize(&t).unwrap();
        assert_eq!(s.highest.id, 1);
        assert_eq!(s.lowest.id, 1);
    }

    #[test]
    fn test_programme_summary_groups_in_first_seen_order() {
        let t = table(&[
            (1, "A", "CS", 80.0),
            (2, "B", "IS", 60.0),
            (3, "C", "CS", 70.0),
        ]);
        let groups = programme_summary(&t);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].programme, "CS");
        assert_eq!(groups[0].count, 2);
        assert!((groups[0].mean - 75.0).abs() < 1e-9);
        assert_eq!(groups[1].programme, "IS");
        assert_eq!(groups[1].count, 1);
    }

    #[test]
    fn test_programme_grouping_is_case_sensitive() {
        let t = table(&[(1, "A", "cs", 80.0), (2, "B", "CS", 60.0)]);
        assert_eq!(programme_summary(&t).len(), 2);
    }
}
