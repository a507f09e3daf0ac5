//! Paths that bypass authentication entirely.
//!
//! Patterns are matched segment by segment:
//! - `**` matches zero or more whole segments
//! - `*` matches exactly one segment, or any run of characters inside a segment
//! - `?` matches a single character inside a segment
//! - anything else is literal
//!
//! A trailing slash is significant: `/favicon.ico/` does not match
//! `/favicon.ico`. Patterns ending in `**` accept either form.

pub const DEFAULT_EXEMPT_PATHS: [&str; 6] = [
    "/api/v1/auth/**",
    "/swagger-ui/**",
    "/v3/api-docs/**",
    "/swagger-resources/**",
    "/webjars/**",
    "/favicon.ico",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    AnyDepth,
    Literal(String),
    Glob(Vec<char>),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw == "**" {
            Segment::AnyDepth
        } else if raw.contains(['*', '?']) {
            Segment::Glob(raw.chars().collect())
        } else {
            Segment::Literal(raw.to_string())
        }
    }

    fn matches(&self, segment: &str) -> bool {
        match self {
            Segment::AnyDepth => true,
            Segment::Literal(lit) => lit == segment,
            Segment::Glob(pattern) => glob_segment(pattern, segment),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl PathPattern {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            segments: split_path(raw).map(Segment::parse).collect(),
            trailing_slash: has_trailing_slash(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let open_ended = matches!(self.segments.last(), Some(Segment::AnyDepth));
        if !open_ended && has_trailing_slash(path) != self.trailing_slash {
            return false;
        }

        let path: Vec<&str> = split_path(path).collect();
        match_segments(&self.segments, &path)
    }
}

/// Immutable allowlist consulted on every request.
#[derive(Debug, Clone)]
pub struct ExemptPathSet {
    patterns: Vec<PathPattern>,
}

impl Default for ExemptPathSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXEMPT_PATHS)
    }
}

impl ExemptPathSet {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| PathPattern::new(p.as_ref()))
                .collect(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(PathPattern::as_str)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn has_trailing_slash(path: &str) -> bool {
    path.len() > 1 && path.ends_with('/')
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            Some((head, tail)) => segment.matches(head) && match_segments(rest, tail),
            None => false,
        },
    }
}

// Wildcard match within one segment (`*` = any run, `?` = one char).
fn glob_segment(pattern: &[char], text: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        // `*` is always a wildcard, even when the text holds a literal `*`.
        if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if let Some((star, start)) = backtrack {
            p = star + 1;
            t = start + 1;
            backtrack = Some((star, start + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}
