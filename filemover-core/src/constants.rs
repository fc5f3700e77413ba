//! Built-in defaults.

use std::time::Duration;

/// How far back to look for matching events.
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

/// Upper bound on events requested from a provider in one call.
pub const DEFAULT_MAX_RESULTS: usize = 250;

/// Wall-clock limit for a calendar fetch before it is cancelled.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Folder-name template used until the user saves their own.
pub const DEFAULT_EVENT_FORMAT: &str = "{date}_{event}";

/// Date pattern for a bare `{date}` placeholder.
pub const DEFAULT_DATE_PATTERN: &str = "%Y%m%d";

/// Characters that may not appear in a destination folder name.
pub const ILLEGAL_PATH_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Archive extension handled by the extractor (compared case-insensitively).
pub const ARCHIVE_EXTENSION: &str = "zip";

pub const DEFAULT_KEYWORDS: &[&str] = &[
    "ケモ", "けも", "獣", "ふぁーすと", "kemocon", "OFFF", "もっふ", "モッフ", "モフ", "もふ",
    "JMoF", "着ぐるみ", "きぐるみ", "fur", "666", "kemo", "kemono", "off", "オフ", "おふ",
    "撮影", "オオカミ", "ookami", "いぬ",
];

pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff", "heic", "heif", "raw", "cr2",
    "cr3", "nef", "arw", "orf", "rw2", "dng",
];
