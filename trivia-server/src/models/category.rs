use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// The id -> label map embedded in question listings. Keys are the
/// string-encoded ids, matching how questions store their category.
pub fn category_map(categories: &[Category]) -> BTreeMap<String, String> {
    categories
        .iter()
        .map(|category| (category.id.to_string(), category.kind.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_carries_the_same_ids_and_labels_as_the_list() {
        let categories = vec![
            Category {
                id: 1,
                kind: "Science".to_string(),
            },
            Category {
                id: 5,
                kind: "Entertainment".to_string(),
            },
        ];

        let map = category_map(&categories);
        assert_eq!(map.len(), categories.len());
        for category in &categories {
            assert_eq!(map.get(&category.id.to_string()), Some(&category.kind));
        }
    }

    #[test]
    fn serializes_the_kind_field_as_type() {
        let category = Category {
            id: 2,
            kind: "Art".to_string(),
        };
        let value = serde_json::to_value(&category).unwrap();
        assert_eq!(value["type"], "Art");
    }
}
