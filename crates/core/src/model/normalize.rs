use std::cmp::Ordering;

use chrono::NaiveDate;

use super::experience::ExperienceRecord;

/// Sort records chronologically by start date.
///
/// The sort is stable: records sharing a start date keep their input order.
/// Records whose start date does not parse sort after every dated record,
/// also in input order.
pub fn normalize(records: &[ExperienceRecord]) -> Vec<ExperienceRecord> {
    let mut keyed: Vec<(Option<NaiveDate>, &ExperienceRecord)> =
        records.iter().map(|r| (r.start(), r)).collect();
    keyed.sort_by(|(a, _), (b, _)| compare_start(*a, *b));

    let undated = keyed.iter().filter(|(key, _)| key.is_none()).count();
    if undated > 0 {
        log::debug!("{undated} experience(s) have an unparseable start date; placed last");
    }

    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

fn compare_start(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, start: &str) -> ExperienceRecord {
        ExperienceRecord::new(id, "Engineer", start, Some("2024-01")).with_id(id)
    }

    fn ids(records: &[ExperienceRecord]) -> Vec<&str> {
        records.iter().filter_map(|r| r.id.as_deref()).collect()
    }

    #[test]
    fn sorts_ascending_by_start() {
        let input = vec![
            record("c", "2022-01"),
            record("a", "2018-06"),
            record("b", "2020-03-15"),
        ];
        assert_eq!(ids(&normalize(&input)), vec!["a", "b", "c"]);
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let input = vec![
            record("second", "2020-01"),
            record("first", "2019-01"),
            record("third", "2020-01-01"),
            record("fourth", "2020-01"),
        ];
        assert_eq!(
            ids(&normalize(&input)),
            vec!["first", "second", "third", "fourth"]
        );
    }

    #[test]
    fn undated_records_go_last_in_input_order() {
        let input = vec![
            record("x", "someday"),
            record("a", "2019-01"),
            record("y", "later"),
        ];
        assert_eq!(ids(&normalize(&input)), vec!["a", "x", "y"]);
    }

    #[test]
    fn output_is_non_decreasing() {
        let input = vec![
            record("a", "2023-05"),
            record("b", "2010-01"),
            record("c", "2015-07"),
            record("d", "2015-02"),
            record("e", "2030-12"),
        ];
        let sorted = normalize(&input);
        assert!(sorted.windows(2).all(|w| w[0].start() <= w[1].start()));
    }

    #[test]
    fn empty_input() {
        assert!(normalize(&[]).is_empty());
    }
}
