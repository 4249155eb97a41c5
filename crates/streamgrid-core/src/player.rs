//! Embedded video player capability.
//!
//! The grid never looks inside a player. It hands over a video id and the
//! fixed [`PlaybackOptions`] and gets back a [`PlayerSurface`] describing
//! what to embed. Loading, buffering and playback errors belong to the
//! provider's widget. Extra behaviour is layered on with wrappers such as
//! [`Traced`].

use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use url::Url;

use crate::options::{Dimension, PlaybackOptions};

/// Default YouTube embed endpoint.
pub const YOUTUBE_EMBED_URL: &str = "https://www.youtube.com/embed/";

/// Privacy-enhanced YouTube embed endpoint.
pub const YOUTUBE_NOCOOKIE_EMBED_URL: &str = "https://www.youtube-nocookie.com/embed/";

/// YouTube watch page, used to open a stream outside the grid.
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch";

#[allow(clippy::expect_used)]
static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("failed to compile video id regex")
});

/// What the grid embeds for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSurface {
    /// Provider name, e.g. `"youtube"`.
    pub provider: &'static str,
    /// The id the player is bound to.
    pub video_id: String,
    /// Embed source URL.
    pub src: Url,
    /// Player width.
    pub width: Dimension,
    /// Player height.
    pub height: Dimension,
    /// Value for the iframe `allow` attribute.
    pub allow: &'static str,
}

/// A third-party player that can be bound to a video id.
pub trait EmbedPlayer {
    /// Produces the surface for `video_id` configured with `options`.
    fn render(&self, video_id: &str, options: &PlaybackOptions) -> PlayerSurface;
}

impl<P: EmbedPlayer + ?Sized> EmbedPlayer for &P {
    fn render(&self, video_id: &str, options: &PlaybackOptions) -> PlayerSurface {
        (**self).render(video_id, options)
    }
}

/// YouTube iframe player.
#[derive(Debug, Clone)]
pub struct YouTubeEmbed {
    /// Embed endpoint; the video id is appended as a path segment.
    base_url: Url,
}

/// Builder for `YouTubeEmbed`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct YouTubeEmbedBuilder {
    base_url: Option<Url>,
    privacy_enhanced: bool,
}

impl YouTubeEmbedBuilder {
    /// Overrides the embed endpoint.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Uses the `youtube-nocookie.com` endpoint (ignored if `base_url` is set).
    #[must_use]
    pub const fn privacy_enhanced(mut self, enabled: bool) -> Self {
        self.privacy_enhanced = enabled;
        self
    }

    /// Builds the player.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot take path segments
    /// (e.g. a `data:` URL).
    pub fn build(self) -> Result<YouTubeEmbed> {
        let base_url = if let Some(url) = self.base_url {
            url
        } else if self.privacy_enhanced {
            Url::parse(YOUTUBE_NOCOOKIE_EMBED_URL).context("invalid default embed URL")?
        } else {
            Url::parse(YOUTUBE_EMBED_URL).context("invalid default embed URL")?
        };
        if base_url.cannot_be_a_base() {
            bail!("embed URL cannot be a base: {base_url}");
        }
        Ok(YouTubeEmbed { base_url })
    }
}

impl YouTubeEmbed {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> YouTubeEmbedBuilder {
        YouTubeEmbedBuilder::default()
    }

    /// Returns `true` if `id` has the shape of a YouTube video id
    /// (11 characters of `[A-Za-z0-9_-]`).
    #[must_use]
    pub fn looks_like_video_id(id: &str) -> bool {
        VIDEO_ID_RE.is_match(id)
    }

    /// Watch page URL for `video_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the watch URL constant fails to parse.
    pub fn watch_url(video_id: &str) -> Result<Url> {
        let mut url = Url::parse(YOUTUBE_WATCH_URL).context("invalid watch URL")?;
        url.query_pairs_mut().append_pair("v", video_id);
        Ok(url)
    }
}

impl EmbedPlayer for YouTubeEmbed {
    fn render(&self, video_id: &str, options: &PlaybackOptions) -> PlayerSurface {
        let mut src = self.base_url.clone();
        // `build` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut segments) = src.path_segments_mut() {
            segments.pop_if_empty().push(video_id);
        }
        {
            let mut query = src.query_pairs_mut();
            for (key, value) in options.player_vars() {
                query.append_pair(key, value);
            }
            // A single video only loops when it is also its own playlist.
            if options.looped() {
                query.append_pair("playlist", video_id);
            }
        }
        PlayerSurface {
            provider: "youtube",
            video_id: String::from(video_id),
            src,
            width: options.width(),
            height: options.height(),
            allow: "autoplay; encrypted-media",
        }
    }
}

/// Wrapper that logs every bind at DEBUG level before delegating.
#[derive(Debug, Clone)]
pub struct Traced<P> {
    inner: P,
}

impl<P> Traced<P> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: EmbedPlayer> EmbedPlayer for Traced<P> {
    fn render(&self, video_id: &str, options: &PlaybackOptions) -> PlayerSurface {
        let surface = self.inner.render(video_id, options);
        tracing::debug!(
            provider = surface.provider,
            video_id,
            src = %surface.src,
            "bound player"
        );
        surface
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    #[test]
    fn test_render_default_endpoint() {
        // Arrange
        let player = YouTubeEmbed::builder().build().unwrap();

        // Act
        let surface = player.render("abc123", &PlaybackOptions::fixed());

        // Assert
        assert_eq!(
            surface.src.as_str(),
            "https://www.youtube.com/embed/abc123?autoplay=1&mute=1&controls=0&modestbranding=1&rel=0&showinfo=0&loop=1&playlist=abc123"
        );
        assert_eq!(surface.video_id, "abc123");
        assert_eq!(surface.provider, "youtube");
        assert_eq!(surface.width, Dimension::Percent(100));
        assert_eq!(surface.height, Dimension::Percent(100));
        assert_eq!(surface.allow, "autoplay; encrypted-media");
    }

    #[test]
    fn test_render_privacy_enhanced() {
        // Arrange
        let player = YouTubeEmbed::builder().privacy_enhanced(true).build().unwrap();

        // Act
        let surface = player.render("abc123", &PlaybackOptions::fixed());

        // Assert
        assert_eq!(surface.src.host_str(), Some("www.youtube-nocookie.com"));
        assert_eq!(surface.src.path(), "/embed/abc123");
    }

    #[test]
    fn test_render_custom_base_without_trailing_slash() {
        // Arrange
        let base = Url::parse("http://localhost:8080/embed").unwrap();
        let player = YouTubeEmbed::builder().base_url(base).build().unwrap();

        // Act
        let surface = player.render("xyz", &PlaybackOptions::fixed());

        // Assert
        assert_eq!(surface.src.path(), "/embed/xyz");
    }

    #[test]
    fn test_render_escapes_id_as_single_segment() {
        // Arrange
        let player = YouTubeEmbed::builder().build().unwrap();

        // Act
        let surface = player.render("a/b c", &PlaybackOptions::fixed());

        // Assert
        assert_eq!(surface.src.path(), "/embed/a%2Fb%20c");
    }

    #[test]
    fn test_build_rejects_cannot_be_a_base() {
        let base = Url::parse("data:text/plain,hello").unwrap();
        assert!(YouTubeEmbed::builder().base_url(base).build().is_err());
    }

    #[test]
    fn test_looks_like_video_id() {
        assert!(YouTubeEmbed::looks_like_video_id("jfKfPfyJRdk"));
        assert!(YouTubeEmbed::looks_like_video_id("21X5lGlDOf-"));
        assert!(!YouTubeEmbed::looks_like_video_id("abc123"));
        assert!(!YouTubeEmbed::looks_like_video_id("jfKfPfyJRd!"));
    }

    #[test]
    fn test_watch_url() {
        let url = YouTubeEmbed::watch_url("abc123").unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn test_traced_delegates_and_logs() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .at_level(tracing::Level::DEBUG)
                    .with_fields(expect::msg("bound player")),
            )
            .only()
            .run_with_handle();
        let inner = YouTubeEmbed::builder().build().unwrap();
        let expected = inner.render("abc123", &PlaybackOptions::fixed());
        let traced = Traced::new(inner);

        // Act
        let surface = with_default(subscriber, || {
            traced.render("abc123", &PlaybackOptions::fixed())
        });

        // Assert
        assert_eq!(surface, expected);
        handle.assert_finished();
    }
}
