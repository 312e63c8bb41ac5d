use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// The operator's place directory, fetched once per run.
///
/// Entries are kept as the operator sent them; shape problems surface on
/// [`LocaleDirectory::lookup`] as [`EtlError::DirectoryCorrupt`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleDirectory {
    entries: Vec<Value>,
}

impl LocaleDirectory {
    pub fn from_entries(entries: Vec<Value>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a city name to its numeric id by exact, case-sensitive match.
    ///
    /// Every entry is checked, so a malformed entry anywhere in the directory
    /// is reported even when a valid match comes first. With duplicate city
    /// names the first entry wins.
    pub fn lookup(&self, city: &str) -> Result<i64> {
        let mut found = None;

        for (index, entry) in self.entries.iter().enumerate() {
            let id = entry.get("id").and_then(Value::as_i64);
            let name = entry.get("city").and_then(Value::as_str);

            let (id, name) = match (id, name) {
                (Some(id), Some(name)) => (id, name),
                _ => {
                    return Err(EtlError::DirectoryCorrupt {
                        message: format!("entry {} has no integer id or city: {}", index, entry),
                    })
                }
            };

            if found.is_none() && name == city {
                found = Some(id);
            }
        }

        found.ok_or_else(|| EtlError::LocaleNotFound {
            city: city.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directory(entries: Value) -> LocaleDirectory {
        LocaleDirectory::from_entries(entries.as_array().unwrap().clone())
    }

    #[test]
    fn lookup_matches_exact_city_name() {
        let dir = directory(json!([{"id": 1, "city": "A"}, {"id": 2, "city": "B"}]));
        assert_eq!(dir.lookup("A").unwrap(), 1);
        assert_eq!(dir.lookup("B").unwrap(), 2);
    }

    #[test]
    fn lookup_is_idempotent() {
        let dir = directory(json!([{"id": 10, "city": "Curitiba"}]));
        let first = dir.lookup("Curitiba").unwrap();
        let second = dir.lookup("Curitiba").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let dir = directory(json!([{"id": 1, "city": "Campinas"}]));
        assert!(matches!(
            dir.lookup("campinas"),
            Err(EtlError::LocaleNotFound { city }) if city == "campinas"
        ));
    }

    #[test]
    fn missing_city_is_not_found() {
        let dir = directory(json!([{"id": 1, "city": "A"}]));
        assert!(matches!(dir.lookup("Z"), Err(EtlError::LocaleNotFound { .. })));
    }

    #[test]
    fn entry_without_id_is_corrupt() {
        let dir = directory(json!([{"city": "A"}]));
        assert!(matches!(dir.lookup("A"), Err(EtlError::DirectoryCorrupt { .. })));
    }

    #[test]
    fn non_integer_id_is_corrupt() {
        let dir = directory(json!([{"id": "1", "city": "A"}]));
        assert!(matches!(dir.lookup("A"), Err(EtlError::DirectoryCorrupt { .. })));

        let dir = directory(json!([{"id": 1.5, "city": "A"}]));
        assert!(matches!(dir.lookup("A"), Err(EtlError::DirectoryCorrupt { .. })));
    }

    #[test]
    fn corruption_after_a_match_is_still_reported() {
        let dir = directory(json!([{"id": 1, "city": "A"}, {"id": null, "city": "B"}]));
        assert!(matches!(dir.lookup("A"), Err(EtlError::DirectoryCorrupt { .. })));
    }

    #[test]
    fn first_duplicate_wins() {
        let dir = directory(json!([{"id": 3, "city": "A"}, {"id": 4, "city": "A"}]));
        assert_eq!(dir.lookup("A").unwrap(), 3);
    }
}
