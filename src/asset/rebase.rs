//! CSS `url()` rebasing.
//!
//! Relative references are resolved against the stylesheet's own directory
//! and rewritten as site-absolute paths under the project root:
//!
//! ```text
//! /proj/stylesheets/style.css:  url(../images/logo.png)
//!                           ──► url(/images/logo.png)
//! ```
//!
//! External (`http:`, `https:`, `//`), `data:` and already absolute
//! references are left alone, as are references that escape the root.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::path::{is_external_url, lexical_normalize, split_path_suffix, to_posix};

/// `url(...)` with double, single or no quotes. Group 1-3 hold the reference.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^'")\s]*))\s*\)"#).unwrap()
});

/// Rewrites relative `url()` references against a project root.
#[derive(Debug, Clone)]
pub struct CssUrlRebaser {
    root: PathBuf,
}

impl CssUrlRebaser {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: lexical_normalize(root.as_ref()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rewrite every relative reference in `css`, which was read from `css_path`.
    ///
    /// Each match is spliced in place by byte range and scanning resumes right
    /// after the replacement, so identical references elsewhere are handled
    /// one at a time.
    pub fn rebase(&self, css_path: &Path, css: &str) -> String {
        let base = css_path.parent().unwrap_or(Path::new(""));
        let mut out = css.to_string();
        let mut pos = 0;

        while pos <= out.len() {
            let Some(caps) = URL_RE.captures_at(&out, pos) else {
                break;
            };
            let whole = caps.get(0).map_or(pos..out.len(), |m| m.range());
            let Some(reference) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))
            else {
                pos = whole.end;
                continue;
            };
            let range = reference.range();
            let rewritten = self.rewrite(base, reference.as_str());
            drop(caps);

            match rewritten {
                Some(new) => {
                    let end = whole.end - range.len() + new.len();
                    out.replace_range(range, &new);
                    pos = end;
                }
                None => pos = whole.end,
            }
        }

        out
    }

    /// New reference for `url`, or `None` to keep it.
    fn rewrite(&self, base: &Path, url: &str) -> Option<String> {
        let url = url.trim();
        if url.is_empty() || url.starts_with('#') || url.starts_with('/') || is_external_url(url) {
            return None;
        }

        let (path, suffix) = split_path_suffix(url);
        if path.is_empty() {
            return None;
        }

        let resolved = lexical_normalize(&base.join(path));
        let rel = resolved.strip_prefix(&self.root).ok()?;
        Some(format!("/{}{}", to_posix(rel), suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebase(css: &str) -> String {
        CssUrlRebaser::new("/proj").rebase(Path::new("/proj/stylesheets/style.css"), css)
    }

    #[test]
    fn test_relative_url_rebased() {
        assert_eq!(
            rebase("background: url(../images/logo.png)"),
            "background: url(/images/logo.png)"
        );
    }

    #[test]
    fn test_external_and_data_untouched() {
        let css = "a{background:url(https://cdn.example.com/x.png)}";
        assert_eq!(rebase(css), css);
        let css = "a{background:url(data:image/png;base64,AAAA)}";
        assert_eq!(rebase(css), css);
        let css = "a{background:url(//cdn.example.com/x.png)}";
        assert_eq!(rebase(css), css);
    }

    #[test]
    fn test_absolute_untouched() {
        let css = "a{background:url(/images/a.png)}";
        assert_eq!(rebase(css), css);
    }

    #[test]
    fn test_quotes_preserved() {
        assert_eq!(
            rebase(r#"a{b:url("img/a.png")} c{d:url( 'img/b.png' )}"#),
            r#"a{b:url("/stylesheets/img/a.png")} c{d:url( '/stylesheets/img/b.png' )}"#
        );
    }

    #[test]
    fn test_case_insensitive_and_suffix() {
        assert_eq!(
            rebase("@font-face{src:URL(../fonts/a.eot?#iefix)}"),
            "@font-face{src:URL(/fonts/a.eot?#iefix)}"
        );
    }

    #[test]
    fn test_repeated_urls_each_rewritten() {
        assert_eq!(
            rebase("a{b:url(x.png)}c{d:url(x.png)}e{f:url(../x.png)}"),
            "a{b:url(/stylesheets/x.png)}c{d:url(/stylesheets/x.png)}e{f:url(/x.png)}"
        );
    }

    #[test]
    fn test_adjacent_matches() {
        assert_eq!(
            rebase("src:url(a.woff)url(b.woff)"),
            "src:url(/stylesheets/a.woff)url(/stylesheets/b.woff)"
        );
    }

    #[test]
    fn test_outside_root_and_fragments_untouched() {
        assert_eq!(rebase("a{b:url(../../up.png)}"), "a{b:url(../../up.png)}");
        assert_eq!(rebase("a{filter:url(#blur)}"), "a{filter:url(#blur)}");
        assert_eq!(rebase("a{b:url()}"), "a{b:url()}");
    }
}
