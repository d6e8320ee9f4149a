//! Category totals and rankings.
//!
//! This module summarizes a record subset into per-category sums and turns
//! those sums into a ranking for bar, pie and treemap views.

use crate::models::{CategoryValues, GroupTotal, RankEntry, Record, Selector};
use crate::schema::CategorySchema;

/// Per-category sums for the records picked by `selector`.
///
/// `Selector::Total` sums every record that has a year. `Selector::Year`
/// uses the first record of that year; when there is none the totals are all
/// zero, which is a valid "no data yet" state.
pub fn totals(records: &[Record], schema: &CategorySchema, selector: Selector) -> CategoryValues {
    let mut totals = CategoryValues::zeroed(schema.keys());

    match selector {
        Selector::Total => {
            for record in records.iter().filter(|r| r.year.is_some()) {
                totals.accumulate(&record.values);
            }
        }
        Selector::Year(year) => {
            if let Some(record) = records.iter().find(|r| r.year == Some(year)) {
                totals.accumulate(&record.values);
            }
        }
    }

    totals
}

/// Categories sorted by value, highest first.
///
/// Ties keep schema-declared order; labels never take part in ordering.
pub fn ranking(totals: &CategoryValues, schema: &CategorySchema) -> Vec<RankEntry> {
    let mut entries: Vec<RankEntry> = schema
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| RankEntry {
            key: category.key.clone(),
            label: category.label.clone(),
            value: totals.at(i),
        })
        .collect();

    // sort_by is stable
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries
}

/// The `n` highest non-zero entries of a ranking.
pub fn top(ranking: &[RankEntry], n: usize) -> Vec<RankEntry> {
    ranking
        .iter()
        .filter(|entry| entry.value > 0.0)
        .take(n)
        .cloned()
        .collect()
}

/// Subtotals per category group, in the schema's group order.
///
/// Ungrouped categories are left out; a schema without groups yields nothing.
pub fn group_totals(totals: &CategoryValues, schema: &CategorySchema) -> Vec<GroupTotal> {
    schema
        .groups()
        .into_iter()
        .map(|group| {
            let members: Vec<usize> = schema
                .categories
                .iter()
                .enumerate()
                .filter(|(_, c)| c.group.as_deref() == Some(group))
                .map(|(i, _)| i)
                .collect();
            GroupTotal {
                group: group.to_string(),
                value: members.iter().map(|&i| totals.at(i)).sum(),
                categories: members.len(),
            }
        })
        .collect()
}

/// Share of each entry in the ranking total, in percent.
pub fn shares(ranking: &[RankEntry]) -> Vec<(String, f64)> {
    let total: f64 = ranking.iter().map(|e| e.value).sum();
    ranking
        .iter()
        .map(|entry| {
            let share = if total > 0.0 {
                entry.value / total * 100.0
            } else {
                0.0
            };
            (entry.key.clone(), share)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Category;

    fn schema() -> CategorySchema {
        CategorySchema::new(
            "civil-status",
            "civilStatus",
            vec![
                Category::new("single", "Single"),
                Category::new("married", "Married"),
            ],
        )
        .unwrap()
    }

    fn record(year: Option<i32>, single: f64, married: f64) -> Record {
        Record {
            id: None,
            year,
            values: CategoryValues::new(vec![
                ("single".to_string(), single),
                ("married".to_string(), married),
            ]),
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record(Some(2019), 10.0, 5.0),
            record(Some(2020), 20.0, 15.0),
        ]
    }

    #[test]
    fn test_total_across_years() {
        let schema = schema();
        let totals = totals(&sample(), &schema, Selector::Total);
        assert_eq!(totals.get("single"), Some(30.0));
        assert_eq!(totals.get("married"), Some(20.0));

        let ranking = ranking(&totals, &schema);
        let ranked: Vec<_> = ranking.iter().map(|e| (e.key.as_str(), e.value)).collect();
        assert_eq!(ranked, vec![("single", 30.0), ("married", 20.0)]);
    }

    #[test]
    fn test_missing_year_is_all_zero() {
        let schema = schema();
        let totals = totals(&sample(), &schema, Selector::Year(2021));
        assert_eq!(totals.sum(), 0.0);

        let ranking = ranking(&totals, &schema);
        let keys: Vec<_> = ranking.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["single", "married"]);
        assert!(ranking.iter().all(|e| e.value == 0.0));
    }

    #[test]
    fn test_single_year_uses_first_match() {
        let schema = schema();
        let mut records = sample();
        records.push(record(Some(2020), 1.0, 1.0));

        let totals = totals(&records, &schema, Selector::Year(2020));
        assert_eq!(totals.get("single"), Some(20.0));
        assert_eq!(totals.get("married"), Some(15.0));
    }

    #[test]
    fn test_records_without_year_excluded() {
        let schema = schema();
        let mut records = sample();
        records.push(record(None, 1000.0, 1000.0));

        let totals = totals(&records, &schema, Selector::Total);
        assert_eq!(totals.get("single"), Some(30.0));
    }

    #[test]
    fn test_ties_follow_schema_order() {
        let schema = CategorySchema::new(
            "t",
            "t",
            vec![
                Category::new("zeta", "A label"),
                Category::new("alpha", "Z label"),
                Category::new("mid", "M label"),
            ],
        )
        .unwrap();
        let totals = CategoryValues::new(vec![
            ("zeta".to_string(), 5.0),
            ("alpha".to_string(), 5.0),
            ("mid".to_string(), 9.0),
        ]);

        for _ in 0..3 {
            let keys: Vec<_> = ranking(&totals, &schema)
                .into_iter()
                .map(|e| e.key)
                .collect();
            assert_eq!(keys, vec!["mid", "zeta", "alpha"]);
        }
    }

    #[test]
    fn test_ranking_sums_back_to_totals() {
        let schema = schema();
        let totals = totals(&sample(), &schema, Selector::Total);
        let ranking = ranking(&totals, &schema);

        for (key, value) in totals.iter() {
            let ranked: f64 = ranking.iter().filter(|e| e.key == key).map(|e| e.value).sum();
            assert_eq!(ranked, value);
        }
        assert_eq!(ranking.iter().map(|e| e.value).sum::<f64>(), totals.sum());
    }

    #[test]
    fn test_empty_subset() {
        let schema = schema();
        let totals = totals(&[], &schema, Selector::Total);
        let ranking = ranking(&totals, &schema);
        assert_eq!(ranking[0].key, "single");
        assert_eq!(ranking[1].key, "married");
    }

    #[test]
    fn test_top_drops_zero_entries() {
        let schema = schema();
        let totals = CategoryValues::new(vec![
            ("single".to_string(), 0.0),
            ("married".to_string(), 4.0),
        ]);
        let top = top(&ranking(&totals, &schema), 5);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].key, "married");
    }

    #[test]
    fn test_group_totals() {
        let countries = CategorySchema::new(
            "countries",
            "countries",
            vec![
                Category::new("CANADA", "Canada").in_group("Americas"),
                Category::new("JAPAN", "Japan").in_group("Asia"),
                Category::new("PERU", "Peru").in_group("Americas"),
                Category::new("OTHERS", "Others"),
            ],
        )
        .unwrap();
        let values = CategoryValues::new(vec![
            ("CANADA".to_string(), 10.0),
            ("JAPAN".to_string(), 7.0),
            ("PERU".to_string(), 2.0),
            ("OTHERS".to_string(), 100.0),
        ]);

        let groups = group_totals(&values, &countries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, "Americas");
        assert_eq!(groups[0].value, 12.0);
        assert_eq!(groups[0].categories, 2);
        assert_eq!(groups[1].value, 7.0);

        let ungrouped = schema();
        let totals = totals(&sample(), &ungrouped, Selector::Total);
        assert!(group_totals(&totals, &ungrouped).is_empty());
    }

    #[test]
    fn test_shares() {
        let schema = schema();
        let totals = totals(&sample(), &schema, Selector::Total);
        let shares = shares(&ranking(&totals, &schema));
        assert_eq!(shares[0], ("single".to_string(), 60.0));
        assert_eq!(shares[1], ("married".to_string(), 40.0));
    }
}
