//! Classification of entry URLs into [`MediaDescriptor`]s.
//!
//! Rules are tried in order and the first match wins. Several rules can
//! match the same URL structurally (a gfycat slug ending in `.png`, for
//! instance), so the order of [`Resolver::builtin`] is load-bearing.
//!
//! ```text
//!  1 imgur album        7 bare imgur image
//!  2 v.redd.it stream    8 imgur gifv/mp4
//!  3 imgur gallery       9 deviantart
//!  4 quickmeme          10 youtube
//!  5 livememe           11 image extension
//!  6 gfycat             12 gif extension (shadowed by 11)
//!                       13 fallback
//! ```
//!
//! Resolution is pure: no network access, no state, the same URL always
//! yields the same descriptor.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::{
    CollectionKind, LoaderKind, MediaDescriptor, PlayerProvider, VideoSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    ImgurAlbum,
    RedditVideo,
    ImgurGallery,
    Quickmeme,
    Livememe,
    Gfycat,
    ImgurImage,
    ImgurVideo,
    Deviantart,
    Youtube,
    ImageExtension,
    /// Every URL it matches is already claimed by `ImageExtension`.
    GifExtension,
    Custom(&'static str),
    Fallback,
}

/// Builds a descriptor from the first matching pattern's captures, the
/// original URL and the entry title.
pub type BuildFn = fn(&Captures<'_>, &str, &str) -> MediaDescriptor;

pub struct Rule {
    id: RuleId,
    patterns: Vec<Regex>,
    build: BuildFn,
}

impl Rule {
    pub fn new(id: RuleId, patterns: &[&str], build: BuildFn) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { id, patterns, build })
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn matches(&self, url: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(url))
    }

    fn apply(&self, url: &str, title: &str) -> Option<MediaDescriptor> {
        self.patterns
            .iter()
            .find_map(|p| p.captures(url))
            .map(|caps| (self.build)(&caps, url, title))
    }
}

pub struct Resolver {
    rules: Vec<Rule>,
}

static BUILTIN: Lazy<Resolver> = Lazy::new(Resolver::builtin);

/// Resolve with the built-in rule table.
pub fn resolve(url: &str, title: &str) -> MediaDescriptor {
    BUILTIN.resolve(url, title)
}

pub fn resolve_with_rule(url: &str, title: &str) -> (RuleId, MediaDescriptor) {
    BUILTIN.resolve_with_rule(url, title)
}

impl Resolver {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn builtin() -> Self {
        let rules = vec![
            builtin_rule(RuleId::ImgurAlbum, &[r"^https?://imgur\.com/a/(.*)$"], |caps, _, title| {
                collection(CollectionKind::Album, &caps[1], title)
            }),
            builtin_rule(RuleId::RedditVideo, &[r"^https?://v\.redd\.it/(.*)$"], |caps, _, _| {
                MediaDescriptor::Video {
                    sources: vec![VideoSource::new(
                        format!("https://v.redd.it/{}/DASH_600_K", &caps[1]),
                        None,
                    )],
                }
            }),
            builtin_rule(
                RuleId::ImgurGallery,
                &[r"^https?://imgur\.com/gallery/(.*)$"],
                |caps, _, title| collection(CollectionKind::Gallery, &caps[1], title),
            ),
            builtin_rule(
                RuleId::Quickmeme,
                &[r"(?:qkme\.me|quickmeme\.com/meme)/([A-Za-z0-9_]*)"],
                |caps, _, title| MediaDescriptor::Image {
                    src: format!("http://i.qkme.me/{}.jpg", &caps[1]),
                    alt: title.to_string(),
                },
            ),
            builtin_rule(RuleId::Livememe, &[r"livememe\.com/([A-Za-z0-9_]*)"], |caps, _, title| {
                MediaDescriptor::AnimatedImage {
                    src: format!("http://ai1.livememe.com/{}.gif", &caps[1]),
                    alt: title.to_string(),
                }
            }),
            builtin_rule(
                RuleId::Gfycat,
                &[r"^https?://gfycat\.com/(?:.*/)?([^/]*)$"],
                |caps, _, _| {
                    let slug = &caps[1];
                    let webm = |host: &str| {
                        VideoSource::new(
                            format!("https://{host}.gfycat.com/{slug}.webm"),
                            Some("video/webm"),
                        )
                    };
                    MediaDescriptor::Video {
                        sources: vec![
                            webm("giant"),
                            webm("zippy"),
                            webm("fat"),
                            VideoSource::new(
                                format!("https://far.gfycat.com/{slug}.mp4"),
                                Some("video/mp4"),
                            ),
                        ],
                    }
                },
            ),
            builtin_rule(
                RuleId::ImgurImage,
                &[r"^https?://(?:i\.|m\.)?imgur\.com/([^/.]+)$"],
                |caps, _, title| MediaDescriptor::Image {
                    src: format!("https://i.imgur.com/{}.jpg", &caps[1]),
                    alt: title.to_string(),
                },
            ),
            builtin_rule(
                RuleId::ImgurVideo,
                &[r"^https?://(?:i|m)\.imgur\.com/(.*)\.(gifv|mp4)$"],
                |caps, _, _| MediaDescriptor::Video {
                    sources: vec![VideoSource::new(
                        format!("https://i.imgur.com/{}.mp4", &caps[1]),
                        Some("video/mp4"),
                    )],
                },
            ),
            builtin_rule(
                RuleId::Deviantart,
                &[r"^https://www\.deviantart\.com/(.*)/art/(.*)$", r"^http://fav\.me/(.*)$"],
                |_, url, _| MediaDescriptor::ExternalAsync {
                    loader_kind: LoaderKind::Deviantart,
                    source_url: url.to_string(),
                },
            ),
            builtin_rule(
                RuleId::Youtube,
                &[r"^https://youtu\.be/(.*)$", r"^https://www\.youtube\.com/watch\?v=(.*)$"],
                |caps, _, _| MediaDescriptor::EmbeddedPlayer {
                    provider: PlayerProvider::Youtube,
                    embed_src: format!("https://www.youtube.com/embed/{}", &caps[1]),
                },
            ),
            builtin_rule(
                RuleId::ImageExtension,
                &[r"\.(jpg|jpeg|png|gif)(?:\?[^/]*)?$"],
                |_, url, title| MediaDescriptor::Image {
                    src: url.to_string(),
                    alt: title.to_string(),
                },
            ),
            // Kept in its original position. `.gif` is already an image
            // extension above, so this never fires.
            builtin_rule(RuleId::GifExtension, &[r"\.gif(?:\?[^/]*)?$"], |_, url, title| {
                MediaDescriptor::AnimatedImage {
                    src: url.to_string(),
                    alt: title.to_string(),
                }
            }),
        ];

        Self { rules }
    }

    /// Put a rule ahead of the rule currently at `index`.
    pub fn insert(&mut self, index: usize, rule: Rule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn resolve(&self, url: &str, title: &str) -> MediaDescriptor {
        self.resolve_with_rule(url, title).1
    }

    /// Like [`resolve`](Self::resolve), also reporting which rule fired.
    pub fn resolve_with_rule(&self, url: &str, title: &str) -> (RuleId, MediaDescriptor) {
        for rule in &self.rules {
            if let Some(descriptor) = rule.apply(url, title) {
                tracing::debug!(rule = ?rule.id, url, "resolved media");
                return (rule.id, descriptor);
            }
        }

        tracing::debug!(url, "no media rule matched");
        (
            RuleId::Fallback,
            MediaDescriptor::Unresolved {
                original_url: url.to_string(),
            },
        )
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_rule(id: RuleId, patterns: &[&str], build: BuildFn) -> Rule {
    Rule::new(id, patterns, build).expect("built-in media patterns are valid")
}

fn collection(kind: CollectionKind, id: &str, title: &str) -> MediaDescriptor {
    MediaDescriptor::Collection {
        kind,
        id: id.to_string(),
        item_title_prefix: title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imgur_album() {
        assert_eq!(
            resolve("https://imgur.com/a/abc123", "T"),
            MediaDescriptor::Collection {
                kind: CollectionKind::Album,
                id: "abc123".into(),
                item_title_prefix: "T".into(),
            }
        );
    }

    #[test]
    fn test_imgur_gallery() {
        let (rule, descriptor) = resolve_with_rule("http://imgur.com/gallery/XyZ9", "Maps");
        assert_eq!(rule, RuleId::ImgurGallery);
        assert_eq!(
            descriptor,
            MediaDescriptor::Collection {
                kind: CollectionKind::Gallery,
                id: "XyZ9".into(),
                item_title_prefix: "Maps".into(),
            }
        );
    }

    #[test]
    fn test_reddit_video() {
        assert_eq!(
            resolve("https://v.redd.it/xyz", "T"),
            MediaDescriptor::Video {
                sources: vec![VideoSource {
                    src: "https://v.redd.it/xyz/DASH_600_K".into(),
                    mime_type: None,
                }],
            }
        );
    }

    #[test]
    fn test_plain_image_extension() {
        assert_eq!(
            resolve("https://example.com/foo.png", "T"),
            MediaDescriptor::Image {
                src: "https://example.com/foo.png".into(),
                alt: "T".into(),
            }
        );
        let (rule, _) = resolve_with_rule("https://example.com/photo.jpeg?width=640", "T");
        assert_eq!(rule, RuleId::ImageExtension);
    }

    #[test]
    fn test_unresolved_fallback() {
        assert_eq!(
            resolve("https://unknown.example/page", "T"),
            MediaDescriptor::Unresolved {
                original_url: "https://unknown.example/page".into(),
            }
        );
        assert_eq!(
            resolve("", "T"),
            MediaDescriptor::Unresolved {
                original_url: String::new(),
            }
        );
    }

    #[test]
    fn test_quickmeme_and_livememe() {
        assert_eq!(
            resolve("http://qkme.me/3p4z1x", "Meme"),
            MediaDescriptor::Image {
                src: "http://i.qkme.me/3p4z1x.jpg".into(),
                alt: "Meme".into(),
            }
        );
        assert_eq!(
            resolve("http://www.quickmeme.com/meme/3rbbx2/", "Meme"),
            MediaDescriptor::Image {
                src: "http://i.qkme.me/3rbbx2.jpg".into(),
                alt: "Meme".into(),
            }
        );
        assert_eq!(
            resolve("http://www.livememe.com/by2q1n5", "Live"),
            MediaDescriptor::AnimatedImage {
                src: "http://ai1.livememe.com/by2q1n5.gif".into(),
                alt: "Live".into(),
            }
        );
    }

    #[test]
    fn test_gfycat_source_order() {
        let descriptor = resolve("https://gfycat.com/gifs/detail/HappyCat", "T");
        let MediaDescriptor::Video { sources } = descriptor else {
            panic!("expected video");
        };
        let srcs: Vec<&str> = sources.iter().map(|s| s.src.as_str()).collect();
        assert_eq!(
            srcs,
            vec![
                "https://giant.gfycat.com/HappyCat.webm",
                "https://zippy.gfycat.com/HappyCat.webm",
                "https://fat.gfycat.com/HappyCat.webm",
                "https://far.gfycat.com/HappyCat.mp4",
            ]
        );
        assert_eq!(sources[3].mime_type.as_deref(), Some("video/mp4"));
        assert_eq!(sources[0].mime_type.as_deref(), Some("video/webm"));
    }

    #[test]
    fn test_earlier_rule_wins_over_image_extension() {
        let url = "https://gfycat.com/HappyCat.png";
        let builtin = Resolver::builtin();
        assert!(builtin.rule(RuleId::Gfycat).unwrap().matches(url));
        assert!(builtin.rule(RuleId::ImageExtension).unwrap().matches(url));

        let (rule, descriptor) = builtin.resolve_with_rule(url, "T");
        assert_eq!(rule, RuleId::Gfycat);
        assert!(matches!(descriptor, MediaDescriptor::Video { .. }));
    }

    #[test]
    fn test_imgur_bare_image_assumes_jpg() {
        for url in [
            "https://imgur.com/Ab12Cd",
            "https://i.imgur.com/Ab12Cd",
            "http://m.imgur.com/Ab12Cd",
        ] {
            assert_eq!(
                resolve(url, "T"),
                MediaDescriptor::Image {
                    src: "https://i.imgur.com/Ab12Cd.jpg".into(),
                    alt: "T".into(),
                },
                "{url}"
            );
        }
    }

    #[test]
    fn test_imgur_gifv_becomes_mp4() {
        for url in ["https://i.imgur.com/Ab12Cd.gifv", "https://m.imgur.com/Ab12Cd.mp4"] {
            assert_eq!(
                resolve(url, "T"),
                MediaDescriptor::Video {
                    sources: vec![VideoSource::new(
                        "https://i.imgur.com/Ab12Cd.mp4",
                        Some("video/mp4")
                    )],
                }
            );
        }
        // Direct image links fall through to the extension rule
        let (rule, _) = resolve_with_rule("https://i.imgur.com/Ab12Cd.jpg", "T");
        assert_eq!(rule, RuleId::ImageExtension);
    }

    #[test]
    fn test_deviantart_shapes() {
        for url in [
            "https://www.deviantart.com/someone/art/Landscape-123456",
            "http://fav.me/d2enxz7",
        ] {
            assert_eq!(
                resolve(url, "T"),
                MediaDescriptor::ExternalAsync {
                    loader_kind: LoaderKind::Deviantart,
                    source_url: url.into(),
                }
            );
        }
    }

    #[test]
    fn test_youtube_shapes() {
        for url in ["https://youtu.be/dQw4w9WgXcQ", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"] {
            assert_eq!(
                resolve(url, "T"),
                MediaDescriptor::EmbeddedPlayer {
                    provider: PlayerProvider::Youtube,
                    embed_src: "https://www.youtube.com/embed/dQw4w9WgXcQ".into(),
                }
            );
        }
    }

    #[test]
    fn test_gif_extension_rule_is_unreachable() {
        let builtin = Resolver::builtin();
        let gif_rule = builtin.rule(RuleId::GifExtension).unwrap();
        let image_rule = builtin.rule(RuleId::ImageExtension).unwrap();

        for url in [
            "https://example.com/a.gif",
            "https://example.com/a.gif?x=1",
            "http://cdn.example.org/deep/path/funny.gif",
        ] {
            assert!(gif_rule.matches(url));
            assert!(image_rule.matches(url));
            let (rule, descriptor) = builtin.resolve_with_rule(url, "T");
            assert_eq!(rule, RuleId::ImageExtension);
            assert!(matches!(descriptor, MediaDescriptor::Image { .. }));
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let urls = [
            "https://imgur.com/a/abc123",
            "https://v.redd.it/xyz",
            "https://gfycat.com/HappyCat",
            "https://example.com/foo.png",
            "https://unknown.example/page",
        ];
        let fresh = Resolver::builtin();
        for url in urls {
            let first = resolve(url, "T");
            assert_eq!(first, resolve(url, "T"));
            assert_eq!(first, fresh.resolve(url, "T"));
        }
    }

    #[test]
    fn test_non_matching_rule_falls_through() {
        // Looks like an album host but not an album path
        let (rule, _) = resolve_with_rule("https://imgur.com/user/someone/posts", "T");
        assert_eq!(rule, RuleId::Fallback);
    }

    #[test]
    fn test_custom_rule_precedence() {
        let mut resolver = Resolver::builtin();
        let rule = Rule::new(
            RuleId::Custom("streamable"),
            &[r"^https://streamable\.com/(\w+)$"],
            |caps, _, _| MediaDescriptor::EmbeddedPlayer {
                provider: PlayerProvider::Youtube,
                embed_src: format!("https://streamable.com/e/{}", &caps[1]),
            },
        )
        .unwrap();
        resolver.insert(0, rule);

        let (rule, _) = resolver.resolve_with_rule("https://streamable.com/abc", "T");
        assert_eq!(rule, RuleId::Custom("streamable"));
        assert_eq!(resolver.rules().count(), 13);
    }

    #[test]
    fn test_invalid_custom_pattern_is_error() {
        let result = Rule::new(RuleId::Custom("broken"), &["("], |_, url, _| {
            MediaDescriptor::Unresolved {
                original_url: url.to_string(),
            }
        });
        assert!(result.is_err());
    }
}
