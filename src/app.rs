use crate::selector;
use rand::Rng;

/// Immutable content state shared across request handler threads. Per-visitor
/// recency lives in a round-trip token, so picking needs no locking.
#[derive(Debug, Clone, Default)]
pub struct GusterApp {
    pub image_urls: Vec<String>,
    pub nicknames: Vec<String>,
    pub max_recent: usize,
}

impl GusterApp {
    pub fn new(image_urls: Vec<String>, nicknames: Vec<String>, max_recent: usize) -> Self {
        Self {
            image_urls,
            nicknames,
            max_recent,
        }
    }

    /// Next nickname, avoiding only the immediately previous one.
    pub fn pick_nickname(&self, previous: Option<&str>, rng: &mut impl Rng) -> Option<&str> {
        selector::pick_different(&self.nicknames, previous, rng)
    }

    /// Next image URL, avoiding everything in the visitor's recent window.
    pub fn pick_image(&self, recent: &[String], rng: &mut impl Rng) -> Option<&str> {
        selector::pick_excluding(&self.image_urls, recent, rng)
    }

    pub fn update_recent(&self, recent: &[String], chosen: Option<&str>) -> Vec<String> {
        selector::update_recent(recent, chosen, self.max_recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn app() -> GusterApp {
        GusterApp::new(
            vec![
                "https://a.jpg".to_string(),
                "https://b.jpg".to_string(),
                "https://c.jpg".to_string(),
            ],
            vec!["Shawn".to_string(), "Gus".to_string()],
            10,
        )
    }

    #[test]
    fn test_pick_nickname_skips_previous() {
        let app = app();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(app.pick_nickname(Some("Shawn"), &mut rng), Some("Gus"));
        }
    }

    #[test]
    fn test_pick_image_then_update_recent_round_trip() {
        let app = app();
        let mut rng = StdRng::seed_from_u64(3);
        let recent = vec!["https://a.jpg".to_string(), "https://b.jpg".to_string()];

        let picked = app.pick_image(&recent, &mut rng);
        assert_eq!(picked, Some("https://c.jpg"));

        let updated = app.update_recent(&recent, picked);
        assert_eq!(
            updated,
            vec![
                "https://a.jpg".to_string(),
                "https://b.jpg".to_string(),
                "https://c.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_app_picks_nothing() {
        let app = GusterApp::default();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(app.pick_nickname(None, &mut rng), None);
        assert_eq!(app.pick_image(&[], &mut rng), None);
        assert!(app.update_recent(&[], None).is_empty());
    }
}
