use crate::domain::locale::LocaleDirectory;
use crate::domain::model::{Batch, TripPair, TripRequest};
use crate::utils::error::Result;
use chrono::NaiveDate;

/// `days` consecutive departure dates starting at `start`.
pub fn departure_window(start: NaiveDate, days: u32) -> Vec<NaiveDate> {
    start.iter_days().take(days as usize).collect()
}

/// Builds one request per (date, trip pair), dates outer and pairs inner.
///
/// Responses are matched to requests by position, so this order is part of
/// the contract. The first unresolvable name aborts the whole build.
pub fn build_batch(
    trip_pairs: &[TripPair],
    dates: &[NaiveDate],
    directory: &LocaleDirectory,
) -> Result<Batch> {
    let mut batch = Vec::with_capacity(trip_pairs.len() * dates.len());

    for &departure_date in dates {
        for pair in trip_pairs {
            batch.push(TripRequest {
                origin_id: directory.lookup(&pair.origin)?,
                destination_id: directory.lookup(&pair.destination)?,
                departure_date,
            });
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn directory_of(count: i64) -> LocaleDirectory {
        LocaleDirectory::from_entries(
            (1..=count)
                .map(|id| json!({"id": id, "city": format!("City {}", id)}))
                .collect(),
        )
    }

    #[test]
    fn single_pair_single_date() {
        let directory = LocaleDirectory::from_entries(vec![
            json!({"id": 1, "city": "A"}),
            json!({"id": 2, "city": "B"}),
        ]);

        let batch = build_batch(&[TripPair::new("A", "B")], &[date(2024, 1, 1)], &directory).unwrap();

        assert_eq!(
            batch,
            vec![TripRequest {
                origin_id: 1,
                destination_id: 2,
                departure_date: date(2024, 1, 1),
            }]
        );
    }

    #[test]
    fn ten_pairs_by_eight_dates_is_date_major() {
        let directory = directory_of(11);
        let pairs: Vec<TripPair> = (1..=10)
            .map(|i| TripPair::new(format!("City {}", i), format!("City {}", i + 1)))
            .collect();
        let dates = departure_window(date(2024, 1, 1), 8);

        let batch = build_batch(&pairs, &dates, &directory).unwrap();

        assert_eq!(batch.len(), 80);
        for (index, request) in batch.iter().enumerate() {
            assert_eq!(request.departure_date, dates[index / 10]);
            assert_eq!(request.origin_id, (index % 10) as i64 + 1);
        }
    }

    #[test]
    fn unknown_city_aborts_the_whole_batch() {
        let directory = LocaleDirectory::from_entries(vec![
            json!({"id": 1, "city": "A"}),
            json!({"id": 2, "city": "B"}),
        ]);
        let pairs = [TripPair::new("A", "B"), TripPair::new("A", "Z")];

        let result = build_batch(&pairs, &[date(2024, 1, 1)], &directory);

        assert!(matches!(
            result,
            Err(EtlError::LocaleNotFound { city }) if city == "Z"
        ));
    }

    #[test]
    fn duplicate_pairs_are_kept_in_order() {
        let directory = directory_of(2);
        let pair = TripPair::new("City 1", "City 2");
        let batch = build_batch(&[pair.clone(), pair], &[date(2024, 3, 1)], &directory).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], batch[1]);
    }

    #[test]
    fn departure_window_is_consecutive() {
        let dates = departure_window(date(2024, 2, 27), 4);
        assert_eq!(
            dates,
            vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
        assert!(departure_window(date(2024, 1, 1), 0).is_empty());
    }
}
