//! HTML page output.
//!
//! Serialises a [`RenderedGrid`] into a standalone HTML document. Output
//! depends only on the grid and the page title, so the same input always
//! produces the same bytes.

use std::fmt;

use crate::grid::{RenderedGrid, StreamCell};

const STYLE: &str = "\
* { box-sizing: border-box; }
body { margin: 0; background: #111; color: #eee; font-family: sans-serif; }
.app { padding: 1rem; }
.grid { display: grid; gap: 1rem; }
.stream-container { display: flex; flex-direction: column; background: #1c1c1c; border-radius: 6px; overflow: hidden; }
.player-container { position: relative; width: 100%; aspect-ratio: 16 / 9; }
.youtube-player { position: absolute; inset: 0; border: 0; }
.stream-info { padding: 0.5rem 0.75rem; }
.stream-info h3 { margin: 0 0 0.25rem; font-size: 1rem; }
.stream-info p { margin: 0; font-size: 0.875rem; color: #aaa; }
";

/// HTML-escapes text and attribute values on write.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(pos) = rest.find(['&', '<', '>', '"', '\'']) {
            let (plain, tail) = rest.split_at(pos);
            f.write_str(plain)?;
            let mut chars = tail.chars();
            let entity = match chars.next() {
                Some('&') => "&amp;",
                Some('<') => "&lt;",
                Some('>') => "&gt;",
                Some('"') => "&quot;",
                Some('\'') => "&#39;",
                _ => "",
            };
            f.write_str(entity)?;
            rest = chars.as_str();
        }
        f.write_str(rest)
    }
}

/// A complete HTML document for a rendered grid.
#[derive(Debug, Clone, Copy)]
pub struct HtmlPage<'a> {
    title: &'a str,
    grid: &'a RenderedGrid,
}

impl<'a> HtmlPage<'a> {
    /// Creates a page titled `title` showing `grid`.
    #[must_use]
    pub const fn new(title: &'a str, grid: &'a RenderedGrid) -> Self {
        Self { title, grid }
    }

    fn write_cell(f: &mut fmt::Formatter<'_>, cell: &StreamCell) -> fmt::Result {
        let player = &cell.player;
        writeln!(
            f,
            "      <div class=\"stream-container\" data-key=\"{}\" data-row=\"{}\" data-column=\"{}\">",
            Escaped(&cell.key),
            cell.position.row,
            cell.position.column,
        )?;
        writeln!(f, "        <div class=\"player-container\">")?;
        writeln!(
            f,
            "          <iframe class=\"youtube-player\" src=\"{}\" width=\"{}\" height=\"{}\" allow=\"{}\" allowfullscreen title=\"{}\"></iframe>",
            Escaped(player.src.as_str()),
            player.width,
            player.height,
            Escaped(player.allow),
            Escaped(&cell.heading),
        )?;
        writeln!(f, "        </div>")?;
        writeln!(f, "        <div class=\"stream-info\">")?;
        writeln!(f, "          <h3>{}</h3>", Escaped(&cell.heading))?;
        writeln!(f, "          <p>{}</p>", Escaped(&cell.text))?;
        writeln!(f, "        </div>")?;
        writeln!(f, "      </div>")
    }
}

impl fmt::Display for HtmlPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "  <head>")?;
        writeln!(f, "    <meta charset=\"utf-8\">")?;
        writeln!(
            f,
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        )?;
        writeln!(f, "    <title>{}</title>", Escaped(self.title))?;
        writeln!(f, "    <style>\n{STYLE}    </style>")?;
        writeln!(f, "  </head>")?;
        writeln!(f, "  <body>")?;
        writeln!(f, "    <div class=\"app\">")?;
        writeln!(
            f,
            "    <div class=\"grid\" style=\"grid-template-columns: repeat({}, 1fr)\">",
            self.grid.layout().columns()
        )?;
        for cell in self.grid.cells() {
            Self::write_cell(f, cell)?;
        }
        writeln!(f, "    </div>")?;
        writeln!(f, "    </div>")?;
        writeln!(f, "  </body>")?;
        writeln!(f, "</html>")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::grid::{GridLayout, GridRenderer};
    use crate::player::YouTubeEmbed;
    use crate::record::{StreamConfig, StreamRecord};

    fn render(records: Vec<StreamRecord>, columns: usize) -> RenderedGrid {
        let config = StreamConfig::new(records);
        let player = YouTubeEmbed::builder().build().unwrap();
        GridRenderer::new(&config, player, GridLayout::new(columns).unwrap()).render()
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            Escaped(r#"<a href="x">Tom & Jerry's</a>"#).to_string(),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(Escaped("plain").to_string(), "plain");
        assert_eq!(Escaped("").to_string(), "");
    }

    #[test]
    fn test_single_cell_page() {
        // Arrange
        let grid = render(vec![StreamRecord::new("abc123", "Live Feed A", "Camera 1")], 3);

        // Act
        let html = HtmlPage::new("Streams", &grid).to_string();

        // Assert
        assert!(html.contains("<title>Streams</title>"));
        assert!(html.contains("grid-template-columns: repeat(3, 1fr)"));
        assert!(html.contains("data-key=\"abc123\""));
        assert!(html.contains(
            "src=\"https://www.youtube.com/embed/abc123?autoplay=1&amp;mute=1&amp;controls=0"
        ));
        assert!(html.contains("<iframe class=\"youtube-player\" src="));
        assert!(html.contains("width=\"100%\" height=\"100%\" allow=\"autoplay; encrypted-media\""));
        assert!(html.contains("<h3>Live Feed A</h3>"));
        assert!(html.contains("<p>Camera 1</p>"));
        assert_eq!(html.matches("<iframe").count(), 1);
    }

    #[test]
    fn test_empty_grid_page() {
        // Arrange
        let grid = render(vec![], 2);

        // Act
        let html = HtmlPage::new("Empty", &grid).to_string();

        // Assert
        assert!(html.contains("class=\"grid\""));
        assert!(!html.contains("<iframe"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_cells_in_order_with_escaped_text() {
        // Arrange
        let grid = render(
            vec![
                StreamRecord::new("first", "<b>One</b>", ""),
                StreamRecord::new("second", "Two", "Tom & Jerry"),
            ],
            1,
        );

        // Act
        let html = HtmlPage::new("A \"quoted\" page", &grid).to_string();

        // Assert
        let first = html.find("data-key=\"first\"").unwrap();
        let second = html.find("data-key=\"second\"").unwrap();
        assert!(first < second);
        assert!(html.contains("<h3>&lt;b&gt;One&lt;/b&gt;</h3>"));
        assert!(html.contains("<p></p>"));
        assert!(html.contains("<p>Tom &amp; Jerry</p>"));
        assert!(html.contains("<title>A &quot;quoted&quot; page</title>"));
        assert!(html.contains("data-row=\"1\" data-column=\"0\""));
    }

    #[test]
    fn test_page_is_deterministic() {
        let grid = render(vec![StreamRecord::new("a", "A", "a"), StreamRecord::new("b", "B", "b")], 2);
        let first = HtmlPage::new("T", &grid).to_string();
        let second = HtmlPage::new("T", &grid).to_string();
        assert_eq!(first, second);
    }
}
