/// Issuer metadata at the repository root.
pub const ISSUER_FILE: &str = "issuer.json";
/// Image file name, used both for the issuer and inside each class directory.
pub const IMAGE_FILE: &str = "img.png";
/// Award page at the repository root.
pub const AWARD_FILE: &str = "award.html";
/// Class metadata inside a class directory.
pub const CLASS_FILE: &str = "class.json";

/// Commit messages containing this marker record the creation of a class.
pub const CLASS_COMMIT_MARKER: &str = "Add metadata for class ";

/// Placeholder in the award template replaced with `<user>.github.io/<repo>`.
pub const AWARD_REPO_TOKEN: &str = "REPO_PATH";

pub const UID_LEN: usize = 20;
pub const UID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Commits fetched per history page.
pub const HISTORY_PAGE_SIZE: u32 = 100;
pub const DEFAULT_HISTORY_DEPTH: u32 = 1;

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
