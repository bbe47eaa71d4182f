/// The built-in catalog of personal values.
use crate::types::{Item, ItemId};

/// `(id, name, description)` for every standard value, ordered by id.
/// Ids 84 and up extend the classic card-sort list with values common among
/// meditators and changemakers.
pub const STANDARD_VALUES: [(ItemId, &str, &str); 93] = [
    (1, "ACCEPTANCE", "to be accepted as I am"),
    (2, "ACCURACY", "to be accurate in my opinions and beliefs"),
    (3, "ACHIEVEMENT", "to have important accomplishments"),
    (4, "ADVENTURE", "to have new and exciting experiences"),
    (5, "ATTRACTIVENESS", "to be physically attractive"),
    (6, "AUTHORITY", "to be in charge of and responsible for others"),
    (7, "AUTONOMY", "to be self-determined and independent"),
    (8, "BEAUTY", "to appreciate beauty around me"),
    (9, "CARING", "to take care of others"),
    (10, "CHALLENGE", "to take on difficult tasks and problems"),
    (11, "CHANGE", "to have a life full of change and variety"),
    (12, "COMFORT", "to have a pleasant and comfortable life"),
    (13, "COMMITMENT", "to make enduring, meaningful commitments"),
    (14, "COMPASSION", "to feel and act on concern for others"),
    (15, "CONTRIBUTION", "to make a lasting contribution in the world"),
    (16, "COOPERATION", "to work collaboratively with others"),
    (17, "COURTESY", "to be considerate and polite toward others"),
    (18, "CREATIVITY", "to have new and original ideas"),
    (19, "DEPENDABILITY", "to be reliable and trustworthy"),
    (20, "DUTY", "to carry out my duties and obligations"),
    (21, "ECOLOGY", "to live in harmony with the environment"),
    (22, "EXCITEMENT", "to have a life full of thrills and stimulation"),
    (23, "FAITHFULNESS", "to be loyal and true in relationships"),
    (24, "FAME", "to be known and recognized"),
    (25, "FAMILY", "to have a happy, loving family"),
    (26, "FITNESS", "to be physically fit and strong"),
    (27, "FLEXIBILITY", "to adjust to new circumstances easily"),
    (28, "FORGIVENESS", "to be forgiving of others"),
    (29, "FRIENDSHIP", "to have close, supportive friends"),
    (30, "FUN", "to play and have fun"),
    (31, "GENEROSITY", "to give what I have to others"),
    (32, "GENUINENESS", "to act in a manner that is true to who I am"),
    (33, "GOD'S WILL", "to seek and obey the will of God"),
    (34, "GROWTH", "to keep changing and growing"),
    (35, "HEALTH", "to be physically well and healthy"),
    (36, "HELPFULNESS", "to be helpful to others"),
    (37, "HONESTY", "to be honest and truthful"),
    (38, "HOPE", "to maintain a positive and optimistic outlook"),
    (39, "HUMILITY", "to be modest and unassuming"),
    (40, "HUMOR", "to see the humorous side of myself and the world"),
    (41, "INDEPENDENCE", "to be free from dependence on others"),
    (42, "INDUSTRY", "to work hard and well at my life tasks"),
    (43, "INNER PEACE", "to experience personal peace"),
    (44, "INTIMACY", "to share my innermost experiences with others"),
    (45, "JUSTICE", "to promote fair and equal treatment for all"),
    (46, "KNOWLEDGE", "to learn and contribute valuable knowledge"),
    (47, "LEISURE", "to take time to relax and enjoy"),
    (48, "LOVED", "to be loved by those close to me"),
    (49, "LOVING", "to give love to others"),
    (50, "MASTERY", "to be competent in my everyday activities"),
    (51, "MINDFULNESS", "to live conscious and mindful of the present moment"),
    (52, "MODERATION", "to avoid excesses and find a middle ground"),
    (53, "MONOGAMY", "to have one close, loving relationship"),
    (54, "NON-CONFORMITY", "to question and challenge authority and norms"),
    (55, "NURTURANCE", "to take care of and nurture others"),
    (56, "OPENNESS", "to be open to new experiences, ideas, and options"),
    (57, "ORDER", "to have a life that is well-ordered and organized"),
    (58, "PASSION", "to have deep feelings about ideas, activities, or people"),
    (59, "PLEASURE", "to feel good"),
    (60, "POPULARITY", "to be well-liked by many people"),
    (61, "POWER", "to have control over others"),
    (62, "PURPOSE", "to have meaning and direction in my life"),
    (63, "RATIONALITY", "to be guided by reason and logic"),
    (64, "REALISM", "to see and act realistically and practically"),
    (65, "RESPONSIBILITY", "to make and carry out responsible decisions"),
    (66, "RISK", "to take risks and chances"),
    (67, "ROMANCE", "to have intense, exciting love in my life"),
    (68, "SELF-ACCEPTANCE", "to accept myself as I am"),
    (69, "SAFETY", "to be safe and secure"),
    (70, "SELF-CONTROL", "to be disciplined in my own actions"),
    (71, "SELF-ESTEEM", "to feel good about myself"),
    (72, "SELF-KNOWLEDGE", "to have a deep and honest understanding of myself"),
    (73, "SERVICE", "to be of service to others"),
    (74, "SEXUALITY", "to have an active and satisfying sex life"),
    (75, "SIMPLICITY", "to live life simply, with minimal needs"),
    (76, "SOLITUDE", "to have time and space where I can be apart from others"),
    (77, "SPIRITUALITY", "to grow and mature spiritually"),
    (78, "STABILITY", "to have a life that stays fairly consistent"),
    (79, "TOLERANCE", "to accept and respect those who differ from me"),
    (80, "TRADITION", "to follow respected patterns of the past"),
    (81, "VIRTUE", "to live a morally pure and excellent life"),
    (82, "WEALTH", "to have plenty of money"),
    (83, "WORLD PEACE", "to work to promote peace in the world"),
    (84, "PRESENCE", "to be fully engaged in the current moment"),
    (85, "EMOTIONAL INTELLIGENCE", "to understand and work skillfully with my emotions"),
    (86, "CATALYST", "to initiate positive change in systems and communities"),
    (87, "INTEGRITY", "to align my actions with my deepest values"),
    (88, "TRANSMISSION", "to share my spiritual experience to benefit others"),
    (89, "VULNERABILITY", "to be open about my true feelings and experiences"),
    (90, "IMPACT", "to create lasting positive change in the world"),
    (91, "EQUANIMITY", "to maintain balance amid life's ups and downs"),
    (92, "COMMUNITY", "to be part of a supportive growth-oriented group"),
    (93, "AUTHENTICITY", "to live in alignment with my true nature"),
];

/// The standard values as a fresh, unscored pool.
pub fn standard_values() -> Vec<Item> {
    STANDARD_VALUES
        .iter()
        .map(|&(id, name, description)| Item::new(id, name, description))
        .collect()
}

/// Id for the next custom value added to `pool`: one past the largest id in use.
pub fn next_custom_id(pool: &[Item]) -> ItemId {
    pool.iter().map(|item| item.id).max().unwrap_or(0) + 1
}

/// Look up a standard value by name, case-insensitively.
pub fn find_standard(name: &str) -> Option<Item> {
    STANDARD_VALUES
        .iter()
        .find(|(_, candidate, _)| candidate.eq_ignore_ascii_case(name.trim()))
        .map(|&(id, name, description)| Item::new(id, name, description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_dense_and_sorted() {
        let values = standard_values();
        assert_eq!(values.len(), 93);
        for (i, value) in values.iter().enumerate() {
            assert_eq!(value.id, i as ItemId + 1);
            assert_eq!(value.score, 0.0);
            assert!(!value.is_custom);
            assert!(value.rating.is_none());
        }
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<&str> = STANDARD_VALUES.iter().map(|(_, name, _)| *name).collect();
        assert_eq!(names.len(), STANDARD_VALUES.len());
    }

    #[test]
    fn test_known_entries() {
        let values = standard_values();
        assert_eq!(values[0].name, "ACCEPTANCE");
        assert_eq!(values[0].description, "to be accepted as I am");
        assert_eq!(values[92].name, "AUTHENTICITY");
        assert_eq!(find_standard("tolerance").map(|v| v.id), Some(79));
        assert!(find_standard("PROCRASTINATION").is_none());
    }

    #[test]
    fn test_next_custom_id() {
        let mut pool = standard_values();
        assert_eq!(next_custom_id(&pool), 94);
        pool.push(Item::custom(94, "CRAFT", "to make things well"));
        assert_eq!(next_custom_id(&pool), 95);
        assert_eq!(next_custom_id(&[]), 1);
    }
}
