// 📊 View data for the map, chart and browser collaborators
//
// The front-ends draw these; nothing here touches the terminal.

use crate::catalog::Park;
use anyhow::{Context, Result};
use std::process::{Command, Stdio};

/// `(name, visitors)` sorted by visitors descending; ties keep input order
pub fn visitor_ranking(parks: &[Park]) -> Vec<(String, u64)> {
    let mut ranking: Vec<(String, u64)> = parks
        .iter()
        .map(|p| (p.name.clone(), p.visitor_count_2022))
        .collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ranking
}

/// `(name, longitude, latitude)` in canvas (x, y) order
pub fn map_points(parks: &[Park]) -> Vec<(String, f64, f64)> {
    parks
        .iter()
        .map(|p| (p.name.clone(), p.location.longitude, p.location.latitude))
        .collect()
}

/// Longitude/latitude window covering all points, padded, clamped to the globe.
/// Falls back to the contiguous US when there is nothing to show.
pub fn map_bounds(parks: &[Park]) -> ([f64; 2], [f64; 2]) {
    const PAD: f64 = 5.0;

    if parks.is_empty() {
        return ([-125.0, -66.0], [24.0, 50.0]);
    }

    let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
    let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);
    for p in parks {
        min_x = min_x.min(p.location.longitude);
        max_x = max_x.max(p.location.longitude);
        min_y = min_y.min(p.location.latitude);
        max_y = max_y.max(p.location.latitude);
    }

    (
        [(min_x - PAD).max(-180.0), (max_x + PAD).min(180.0)],
        [(min_y - PAD).max(-90.0), (max_y + PAD).min(90.0)],
    )
}

/// Plain-text bar chart, one row per park, widest bar = `width` cells
pub fn text_chart(parks: &[Park], width: usize) -> Vec<String> {
    let ranking = visitor_ranking(parks);
    let max = ranking.first().map(|(_, v)| *v).unwrap_or(0).max(1);
    let label_width = ranking.iter().map(|(n, _)| n.chars().count()).max().unwrap_or(0);

    ranking
        .iter()
        .map(|(name, visitors)| {
            let cells = (*visitors as u128 * width as u128 / max as u128) as usize;
            format!(
                "{:<label_width$} │{} {}",
                name,
                "█".repeat(cells),
                visitors,
                label_width = label_width
            )
        })
        .collect()
}

// ============================================================================
// BROWSER
// ============================================================================

/// Opens a URL somewhere the user can see it
pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Hands the URL to the platform's default opener
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let mut command = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else {
            Command::new("xdg-open")
        };

        command
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to open {}", url))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Location;

    fn park(name: &str, visitors: u64, lat: f64, lon: f64) -> Park {
        Park {
            name: name.to_string(),
            url: String::new(),
            location: Location {
                latitude: lat,
                longitude: lon,
            },
            activities: Default::default(),
            topics: Default::default(),
            state: "CA".to_string(),
            visitor_count_2022: visitors,
        }
    }

    #[test]
    fn test_ranking_descending_stable() {
        let parks = vec![
            park("Low", 10, 0.0, 0.0),
            park("TieA", 50, 0.0, 0.0),
            park("High", 90, 0.0, 0.0),
            park("TieB", 50, 0.0, 0.0),
        ];

        let order: Vec<String> = visitor_ranking(&parks).into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["High", "TieA", "TieB", "Low"]);
    }

    #[test]
    fn test_text_chart_scales_to_width() {
        let parks = vec![park("Big", 100, 0.0, 0.0), park("Half", 50, 0.0, 0.0)];
        let lines = text_chart(&parks, 10);

        assert_eq!(lines[0], format!("Big  │{} 100", "█".repeat(10)));
        assert_eq!(lines[1], format!("Half │{} 50", "█".repeat(5)));
    }

    #[test]
    fn test_map_bounds() {
        assert_eq!(map_bounds(&[]), ([-125.0, -66.0], [24.0, 50.0]));

        let parks = vec![park("A", 0, 36.0, -118.0), park("B", 0, 44.0, -110.0)];
        assert_eq!(map_bounds(&parks), ([-123.0, -105.0], [31.0, 49.0]));
        assert_eq!(map_points(&parks)[0], ("A".to_string(), -118.0, 36.0));
    }
}
