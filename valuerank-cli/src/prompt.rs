/// Question rendering for the terminal session.
use valuerank_core::{ComparisonSet, Item};

const BAR_WIDTH: usize = 30;

pub fn progress_bar(percent: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn describe(item: &Item) -> String {
    if item.description.is_empty() {
        item.name.clone()
    } else {
        format!("{}: {}", item.name, item.description)
    }
}

/// Two values side by side, numbered 1 and 2.
pub fn render_pair(first: &Item, second: &Item, percent: f64) -> String {
    format!(
        "\n{}\n\
         Which is more important to you?\n\n\
         \x20 1) {}\n\
         \x20 2) {}\n\n\
         [1/2] choose, [s] can't decide, [q] save and quit: ",
        progress_bar(percent),
        describe(first),
        describe(second),
    )
}

/// A best-worst set, numbered from 1.
pub fn render_set(set: &ComparisonSet, percent: f64) -> String {
    let mut out = format!(
        "\n{}\n\
         Pick the MOST and the LEAST important to you.\n\n",
        progress_bar(percent)
    );
    for (i, item) in set.items.iter().enumerate() {
        out.push_str(&format!("  {}) {}\n", i + 1, describe(item)));
    }
    out.push_str("\nmost least (e.g. \"2 5\"), [q] save and quit: ");
    out
}

pub fn render_rating(rank: usize, item: &Item, default: u8) -> String {
    format!(
        "{rank:>2}. {}\n    How important is this to you, 1-10? [{default}]: ",
        describe(item)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, description: &str) -> Item {
        Item::new(id, name, description)
    }

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0), format!("[{}]   0%", "-".repeat(30)));
        assert_eq!(progress_bar(100.0), format!("[{}] 100%", "#".repeat(30)));
        assert_eq!(progress_bar(250.0), progress_bar(100.0));
        assert!(progress_bar(50.0).contains(&"#".repeat(15)));
    }

    #[test]
    fn test_render_pair_contains_both_values() {
        let prompt = render_pair(
            &item(1, "ACCEPTANCE", "to be accepted as I am"),
            &item(2, "PLAY", ""),
            10.0,
        );
        assert!(prompt.contains("1) ACCEPTANCE: to be accepted as I am"));
        assert!(prompt.contains("2) PLAY\n"));
        assert!(prompt.contains("[s] can't decide"));
    }

    #[test]
    fn test_render_set_numbers_every_item() {
        let set = ComparisonSet {
            set_id: "screening-0".to_string(),
            items: (1..=5).map(|id| item(id, &format!("V{id}"), "")).collect(),
            most_important_id: None,
            least_important_id: None,
        };
        let prompt = render_set(&set, 0.0);
        for n in 1..=5 {
            assert!(prompt.contains(&format!("  {n}) V{n}\n")));
        }
        assert!(prompt.contains("MOST"));
    }

    #[test]
    fn test_render_rating_shows_default() {
        let prompt = render_rating(3, &item(9, "CARING", "to take care of others"), 5);
        assert!(prompt.starts_with(" 3. CARING"));
        assert!(prompt.ends_with("[5]: "));
    }
}
