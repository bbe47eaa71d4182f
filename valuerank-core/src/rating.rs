/// Post-ranking helpers: the top list, 1-10 importance ratings, a rough
/// confidence figure, and the record a host persists at the end of a session.
use crate::constants::DEFAULT_RATING;
use crate::error::RankError;
use crate::types::{Item, ItemId, ScoreEntry};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// A top value together with how important the user rated it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RatedItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub score: f64,
    pub is_custom: bool,
    pub rating: u8,
}

impl RatedItem {
    /// Carry over an existing rating, or start at the default.
    pub fn unrated(item: &Item) -> Self {
        RatedItem {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            score: item.score,
            is_custom: item.is_custom,
            rating: item.rating.unwrap_or(DEFAULT_RATING),
        }
    }
}

impl From<RatedItem> for Item {
    fn from(rated: RatedItem) -> Self {
        Item {
            id: rated.id,
            name: rated.name,
            description: rated.description,
            score: rated.score,
            is_custom: rated.is_custom,
            rating: Some(rated.rating),
        }
    }
}

pub fn rate(item: &Item, rating: u8) -> Result<RatedItem, RankError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(RankError::InvalidRating { rating });
    }
    Ok(RatedItem {
        rating,
        ..RatedItem::unrated(item)
    })
}

/// The `n` highest-scoring items, best first. Ties keep their input order.
pub fn top_values(ranking: &[Item], n: usize) -> Vec<Item> {
    let mut sorted = ranking.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted.truncate(n);
    sorted
}

/// Percentage of the pairwise comparison space the scores account for,
/// reading every `weight` points of absolute score as one comparison.
/// `weight` is what one answer moves a score by under the active rule.
/// Capped at 100.
pub fn ranking_confidence(items: &[Item], weight: f64) -> f64 {
    let n = items.len() as f64;
    let possible = n * (n - 1.0) / 2.0;
    if possible <= 0.0 || weight <= 0.0 {
        return 0.0;
    }
    let implied: f64 = items.iter().map(|item| item.score.abs() / weight).sum();
    (implied / possible * 100.0).min(100.0)
}

/// What a finished session leaves behind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SessionRecord {
    pub top_values: Vec<RatedItem>,
    pub all_values: Vec<ScoreEntry>,
}

impl SessionRecord {
    pub fn new(top_values: Vec<RatedItem>, ranking: &[Item]) -> Self {
        SessionRecord {
            top_values,
            all_values: ranking
                .iter()
                .map(|item| ScoreEntry { id: item.id, score: item.score })
                .collect(),
        }
    }

    /// Mean rating across the top list, if there is one.
    pub fn average_rating(&self) -> Option<f64> {
        if self.top_values.is_empty() {
            return None;
        }
        let total: u32 = self.top_values.iter().map(|v| u32::from(v.rating)).sum();
        Some(f64::from(total) / self.top_values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: ItemId, score: f64) -> Item {
        Item {
            score,
            ..Item::new(id, format!("V{id}"), "")
        }
    }

    #[test]
    fn test_rate_validates_range() {
        let item = scored(1, 3.0);
        assert_eq!(rate(&item, 1).unwrap().rating, 1);
        assert_eq!(rate(&item, 10).unwrap().rating, 10);
        assert_eq!(rate(&item, 0), Err(RankError::InvalidRating { rating: 0 }));
        assert_eq!(rate(&item, 11), Err(RankError::InvalidRating { rating: 11 }));
    }

    #[test]
    fn test_unrated_defaults_to_five() {
        let rated = RatedItem::unrated(&scored(4, 0.0));
        assert_eq!(rated.rating, 5);
        let item: Item = rated.into();
        assert_eq!(item.rating, Some(5));
    }

    #[test]
    fn test_top_values_sorted_and_stable() {
        let items = vec![scored(1, 1.0), scored(2, 5.0), scored(3, 1.0), scored(4, 3.0)];
        let top: Vec<ItemId> = top_values(&items, 3).iter().map(|i| i.id).collect();
        assert_eq!(top, vec![2, 4, 1]);
        assert_eq!(top_values(&items, 10).len(), 4);
    }

    #[test]
    fn test_ranking_confidence() {
        // 4 items, 6 possible pairs; |scores| sum to 96 = 3 comparisons at K = 32.
        let items = vec![scored(1, 48.0), scored(2, -16.0), scored(3, -32.0), scored(4, 0.0)];
        assert!((ranking_confidence(&items, 32.0) - 50.0).abs() < 1e-9);

        let saturated = vec![scored(1, 1000.0), scored(2, -1000.0)];
        assert_eq!(ranking_confidence(&saturated, 32.0), 100.0);
        assert_eq!(ranking_confidence(&[scored(1, 5.0)], 32.0), 0.0);
    }

    #[test]
    fn test_session_record() {
        let ranking = vec![scored(2, 4.0), scored(1, -4.0)];
        let top = vec![rate(&ranking[0], 8).unwrap(), rate(&ranking[1], 3).unwrap()];
        let record = SessionRecord::new(top, &ranking);
        assert_eq!(record.all_values, vec![ScoreEntry { id: 2, score: 4.0 }, ScoreEntry { id: 1, score: -4.0 }]);
        assert_eq!(record.average_rating(), Some(5.5));
        assert_eq!(SessionRecord::new(Vec::new(), &ranking).average_rating(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_session_record_json_shape() {
        let ranking = vec![scored(7, 2.0)];
        let record = SessionRecord::new(vec![rate(&ranking[0], 9).unwrap()], &ranking);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["topValues"][0]["rating"], 9);
        assert_eq!(json["topValues"][0]["isCustom"], false);
        assert_eq!(json["allValues"][0]["id"], 7);
    }
}
