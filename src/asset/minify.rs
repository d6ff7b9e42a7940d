//! Asset minification for JS and CSS files.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Unlike a best-effort
//! pass, every failure here is surfaced: a bundle is never built from a file
//! that did not parse.

use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::MinifyError;

/// Minified JavaScript plus its source map (JSON).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifiedJs {
    pub code: String,
    pub map: Option<String>,
}

/// Minify one JavaScript file.
///
/// Files are parsed as classic scripts: bundles concatenate them, so
/// top-level names stay shared and are not mangled. `map_source` is the name
/// recorded in the source map; `None` skips map generation.
pub fn minify_js(
    path: &Path,
    source: &str,
    map_source: Option<&str>,
) -> Result<MinifiedJs, MinifyError> {
    let allocator = Allocator::default();
    let source_type = SourceType::script();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(MinifyError::syntax(path, message));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions {
            top_level: Some(false),
            ..MangleOptions::default()
        }),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let ret = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            source_map_path: map_source.map(Into::into),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program);

    Ok(MinifiedJs {
        code: ret.code,
        map: ret.map.map(|map| map.to_json_string()),
    })
}

/// Minify one stylesheet.
pub fn minify_css(path: &Path, source: &str) -> Result<String, MinifyError> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|err| MinifyError::syntax(path, err.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|err| MinifyError::syntax(path, err.to_string()))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_js_shrinks() {
        let source = "function add(first, second) {\n  // sum\n  return first + second;\n}\n";
        let out = minify_js(Path::new("add.js"), source, None).unwrap();
        assert!(out.code.len() < source.len());
        assert!(out.code.contains("add"));
        assert!(!out.code.contains("// sum"));
        assert_eq!(out.map, None);
    }

    #[test]
    fn test_minify_js_keeps_top_level_declarations() {
        let source = "function helper(x){return x+1}\nvar config={debug:true};\nconst LIMIT=5;\nlet state=0;";
        let out = minify_js(Path::new("a.js"), source, None).unwrap();
        for name in ["helper", "config", "LIMIT", "state"] {
            assert!(out.code.contains(name), "{name} missing from {:?}", out.code);
        }
    }

    #[test]
    fn test_minify_js_source_map() {
        let out = minify_js(Path::new("a.js"), "var answer = 42;\n", Some("js/a.js")).unwrap();
        let map: serde_json::Value = serde_json::from_str(out.map.as_deref().unwrap()).unwrap();
        assert_eq!(map["version"], 3);
        assert!(map["sources"].to_string().contains("js/a.js"));
    }

    #[test]
    fn test_minify_js_syntax_error() {
        let err = minify_js(Path::new("bad.js"), "function (", None).unwrap_err();
        assert!(matches!(err, MinifyError::Syntax { ref path, .. } if path == Path::new("bad.js")));
    }

    #[test]
    fn test_minify_css() {
        let out = minify_css(Path::new("a.css"), "body {\n  color: #ff0000;\n}\n").unwrap();
        assert_eq!(out, "body{color:red}");
    }

    #[test]
    fn test_minify_css_keeps_urls() {
        let out = minify_css(Path::new("a.css"), ".a { background: url(../img/x.png); }").unwrap();
        assert!(out.contains("../img/x.png"));
    }

    #[test]
    fn test_minify_css_error() {
        let err = minify_css(Path::new("bad.css"), "a[ { color: red }").unwrap_err();
        assert!(err.to_string().contains("bad.css"));
    }
}
