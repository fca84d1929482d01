//! Naming-convention classification of indexed template files.
//!
//! Every template file falls into one of four kinds, derived purely from
//! its name and location:
//!
//! | Kind   | Convention                          | Example               |
//! |--------|-------------------------------------|-----------------------|
//! | Layout | leading marker, optional parent     | `_sub.base.tmpl`      |
//! | Target | stem references a layout short name | `index.base.tmpl`     |
//! | Global | plain stem under the global dir     | `g/nav.tmpl`          |
//! | Local  | plain stem anywhere else            | `posts/sidebar.tmpl`  |
//!
//! Classification is recomputed on demand and never stored; the virtual
//! filesystem stays the single owner of entry data.

use std::path::Component;

use compact_str::CompactString;

use crate::path::TemplatePath;

/// Naming conventions the classifier applies.
///
/// Defaults match the common layout: `.tmpl` files, a `g/` directory for
/// globals, and a leading underscore marking layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conventions {
    /// Template file extension, without the leading dot.
    pub template_ext: String,
    /// Reserved directory name whose templates apply to every target.
    pub global_dir: String,
    /// Leading marker identifying layout files.
    pub layout_marker: char,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            template_ext: "tmpl".to_string(),
            global_dir: "g".to_string(),
            layout_marker: '_',
        }
    }
}

/// The derived kind of a template file, with its naming metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateKind {
    /// Shared structure, addressable by short name, optionally extending a
    /// parent layout by its short name.
    Layout {
        short: CompactString,
        parent: Option<CompactString>,
    },
    /// A renderable file referencing exactly one layout short name.
    Target { layout: CompactString },
    /// Contributes to every target regardless of directory.
    Global,
    /// Contributes only to targets in its own directory.
    Local,
}

/// A classified template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub path: TemplatePath,
    pub kind: TemplateKind,
}

/// Classify an indexed path by naming convention.
///
/// Returns `None` for directories and for files whose extension is not
/// the configured template extension. The grammar works on the stem (file
/// name minus the final extension), split on `.`:
///
/// - leading marker: a layout; one remaining segment is the short name,
///   a second is the declared parent short name (further segments are
///   ignored)
/// - two or more segments without the marker: a target referencing the
///   final segment
/// - a single segment: global when any directory component on the path
///   equals the reserved global name, local otherwise
pub fn classify(path: &TemplatePath, conv: &Conventions) -> Option<Template> {
    if path.is_dir() || path.extension() != Some(conv.template_ext.as_str()) {
        return None;
    }

    let stem = path.file_stem();
    let kind = match stem.strip_prefix(conv.layout_marker) {
        Some(rest) if !rest.is_empty() => {
            let mut segments = rest.split('.');
            let short = CompactString::from(segments.next().unwrap_or_default());
            let parent = segments.next().map(CompactString::from);
            TemplateKind::Layout { short, parent }
        }
        _ => {
            let segments: Vec<&str> = stem.split('.').collect();
            if segments.len() >= 2 {
                TemplateKind::Target {
                    layout: CompactString::from(*segments.last().unwrap_or(&"")),
                }
            } else if under_global_dir(path, conv) {
                TemplateKind::Global
            } else {
                TemplateKind::Local
            }
        }
    };

    Some(Template {
        path: path.clone(),
        kind,
    })
}

/// True when any directory component along the path equals the reserved
/// global directory name, at any depth.
fn under_global_dir(path: &TemplatePath, conv: &Conventions) -> bool {
    path.dir().components().any(|c| match c {
        Component::Normal(seg) => seg.to_str() == Some(conv.global_dir.as_str()),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;

    fn classify_raw(raw: &str) -> Option<Template> {
        let root = Arc::new(PathBuf::from("/site"));
        let path = TemplatePath::parse(&root, raw).unwrap();
        classify(&path, &Conventions::default())
    }

    fn kind(raw: &str) -> TemplateKind {
        classify_raw(raw).unwrap().kind
    }

    #[test]
    fn test_layout_without_parent() {
        assert_eq!(
            kind("_layout.tmpl"),
            TemplateKind::Layout {
                short: "layout".into(),
                parent: None,
            }
        );
    }

    #[test]
    fn test_layout_with_parent() {
        assert_eq!(
            kind("a/_sub.base.tmpl"),
            TemplateKind::Layout {
                short: "sub".into(),
                parent: Some("base".into()),
            }
        );
    }

    #[test]
    fn test_target_references_final_segment() {
        assert_eq!(kind("a/target1.layout.tmpl"), TemplateKind::Target { layout: "layout".into() });
        assert_eq!(kind("a/2.sub.tmpl"), TemplateKind::Target { layout: "sub".into() });
    }

    #[test]
    fn test_global_and_local() {
        assert_eq!(kind("g/1.tmpl"), TemplateKind::Global);
        assert_eq!(kind("a/1.tmpl"), TemplateKind::Local);
        assert_eq!(kind("1.tmpl"), TemplateKind::Local);
    }

    #[test]
    fn test_global_dir_matches_at_any_depth() {
        assert_eq!(kind("a/g/1.tmpl"), TemplateKind::Global);
        assert_eq!(kind("g/b/1.tmpl"), TemplateKind::Global);
        // substring of a component does not count
        assert_eq!(kind("gg/1.tmpl"), TemplateKind::Local);
    }

    #[test]
    fn test_non_template_extension_ignored() {
        assert!(classify_raw("a/readme.txt").is_none());
        assert!(classify_raw("a/_layout.html").is_none());
    }

    #[test]
    fn test_directories_are_not_classified() {
        assert!(classify_raw("a/b").is_none());
    }

    #[test]
    fn test_extra_layout_segments_ignored() {
        assert_eq!(
            kind("_sub.base.extra.tmpl"),
            TemplateKind::Layout {
                short: "sub".into(),
                parent: Some("base".into()),
            }
        );
    }

    #[test]
    fn test_bare_marker_is_not_a_layout() {
        // `_.tmpl` has no short name to offer
        assert_eq!(kind("_.tmpl"), TemplateKind::Local);
    }

    #[test]
    fn test_custom_conventions() {
        let root = Arc::new(PathBuf::from("/site"));
        let conv = Conventions {
            template_ext: "html".to_string(),
            global_dir: "shared".to_string(),
            layout_marker: '~',
        };

        let layout = TemplatePath::parse(&root, "~base.html").unwrap();
        assert_eq!(
            classify(&layout, &conv).unwrap().kind,
            TemplateKind::Layout { short: "base".into(), parent: None }
        );

        let global = TemplatePath::parse(&root, "shared/nav.html").unwrap();
        assert_eq!(classify(&global, &conv).unwrap().kind, TemplateKind::Global);

        let skipped = TemplatePath::parse(&root, "shared/nav.tmpl").unwrap();
        assert!(classify(&skipped, &conv).is_none());
    }
}
