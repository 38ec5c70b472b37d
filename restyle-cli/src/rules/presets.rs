//! Built-in rule tables.
//!
//! Each preset is an ordered list of [`RuleSpec`]s. Composite presets pull in
//! other presets first and then append their own rules.

use serde::Serialize;
use std::path::Path;

use super::{RuleSet, RuleSpec};
use crate::core::error::{RestyleError, Result};

#[derive(Debug, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,

    /// Glob used for target discovery when no files are given
    pub default_glob: &'static str,

    /// Presets whose rules run before this preset's own rules
    pub includes: &'static [&'static str],

    /// Stylesheets, relative to the root, that rewritten pages link to
    pub stylesheets: &'static [&'static str],

    pub rules: &'static [RuleSpec],
}

impl Preset {
    /// Flatten includes and own rules into application order.
    pub fn specs(&self) -> Vec<&'static RuleSpec> {
        let mut specs = Vec::new();
        for name in self.includes {
            if let Some(included) = PRESETS.iter().find(|p| p.name == *name) {
                specs.extend(included.specs());
            }
        }
        specs.extend(self.rules.iter());
        specs
    }

    /// Stylesheets referenced by this preset and its includes, without repeats.
    pub fn linked_stylesheets(&self) -> Vec<&'static str> {
        let mut sheets = Vec::new();
        for name in self.includes {
            if let Some(included) = PRESETS.iter().find(|p| p.name == *name) {
                for sheet in included.linked_stylesheets() {
                    if !sheets.contains(&sheet) {
                        sheets.push(sheet);
                    }
                }
            }
        }
        for sheet in self.stylesheets {
            if !sheets.contains(sheet) {
                sheets.push(*sheet);
            }
        }
        sheets
    }
}

const STYLESHEET_MARKERS: &[&str] = &[r#"href="styles.css""#, r#"href="css/main.css""#];

const TAILWIND_LAYOUT: &[RuleSpec] = &[
    // The config block only matters while the CDN script is present, so it
    // has to go before the CDN rule removes the marker.
    RuleSpec::regex(
        "tailwind-config",
        r"<script>\s*tailwind\.config\s*=\s*\{[\s\S]*?\}\s*</script>\s*",
        "",
    )
    .only_if("cdn.tailwindcss.com"),
    RuleSpec::regex(
        "tailwind-cdn",
        r#"<script src="https://cdn\.tailwindcss\.com"></script>\s*"#,
        "",
    ),
    RuleSpec::regex(
        "fonts-preconnect",
        r#"<link rel="preconnect" href="https://fonts\.googleapis\.com">\s*"#,
        "",
    ),
    RuleSpec::regex(
        "fonts-preconnect-static",
        r#"<link rel="preconnect" href="https://fonts\.gstatic\.com"[^>]*>\s*"#,
        "",
    ),
    RuleSpec::regex(
        "fonts-inter",
        r#"<link href="https://fonts\.googleapis\.com/css2\?family=Inter[^>]*>\s*"#,
        "",
    ),
    RuleSpec::literal(
        "head-stylesheet",
        "<head>",
        "<head>\n    <link rel=\"stylesheet\" href=\"styles.css\">",
    )
    .unless(STYLESHEET_MARKERS),
    RuleSpec::regex("body-class", r#"<body class="[^"]*">"#, "<body>"),
    RuleSpec::literal(
        "page-container",
        r#"<div class="flex min-h-screen">"#,
        r#"<div class="page-container">"#,
    ),
    RuleSpec::regex(
        "sidebar",
        r#"<aside class="w-\[280px\] fixed h-screen bg-white border-r border-gray-200 overflow-y-auto(?:\s+[^"]*)?">"#,
        r#"<aside class="sidebar">"#,
    ),
    RuleSpec::literal(
        "sidebar-content",
        r#"<div class="p-6">"#,
        r#"<div class="sidebar-content">"#,
    ),
    RuleSpec::literal(
        "sidebar-logo",
        r#"<div class="flex items-center gap-3 mb-8">"#,
        r#"<div class="sidebar-logo">"#,
    ),
    RuleSpec::literal(
        "sidebar-logo-icon",
        r#"<div class="w-10 h-10 bg-indigo-600 rounded-lg flex items-center justify-center">"#,
        r#"<div class="sidebar-logo-icon">"#,
    ),
    RuleSpec::literal(
        "sidebar-nav-title",
        r#"<h3 class="text-xs font-semibold text-gray-400 uppercase tracking-wider mb-3">"#,
        r#"<h3 class="sidebar-nav-title">"#,
    ),
    // Depends on sidebar-nav-title having run.
    RuleSpec::regex(
        "sidebar-nav-group",
        r#"<div>(\s*)<h3 class="sidebar-nav-title">"#,
        r#"<div class="sidebar-nav-group">${1}<h3 class="sidebar-nav-title">"#,
    ),
    RuleSpec::literal(
        "sidebar-nav-list",
        r#"<ul class="space-y-1">"#,
        r#"<ul class="sidebar-nav-list">"#,
    ),
    RuleSpec::regex(
        "sidebar-nav-link",
        r#"<a href="([^"]*)" class="nav-link block px-4 py-2\.5 text-sm text-gray-600 hover:text-indigo-700 hover:bg-indigo-50 rounded-md transition-all" data-page="([^"]*)">"#,
        r#"<a href="${1}" class="sidebar-nav-link" data-page="${2}">"#,
    ),
    RuleSpec::literal(
        "active-link-hint",
        r#"<!-- class="block px-4 py-2.5 text-sm bg-indigo-50 text-indigo-700 font-medium rounded-md transition-all text-center" -->"#,
        "",
    ),
    RuleSpec::literal(
        "main-content",
        r#"<main class="flex-1 ml-[280px]">"#,
        r#"<main class="main-content">"#,
    ),
    RuleSpec::literal(
        "content-wrapper",
        r#"<div class="max-w-7xl mx-auto px-8 py-12">"#,
        r#"<div class="content-wrapper">"#,
    ),
];

const SEMANTIC_CLASSES: &[RuleSpec] = &[
    // sidebar logo
    RuleSpec::literal(
        "sidebar-logo-svg",
        r#"<svg class="w-6 h-6 text-white""#,
        r#"<svg class="sidebar-logo-svg""#,
    ),
    RuleSpec::literal(
        "sidebar-logo-title",
        r#"<h1 class="font-bold text-gray-900">"#,
        r#"<h1 class="sidebar-logo-title">"#,
    ),
    RuleSpec::literal(
        "sidebar-logo-subtitle",
        r#"<p class="text-xs text-gray-500">"#,
        r#"<p class="sidebar-logo-subtitle">"#,
    ),
    // page header
    RuleSpec::literal(
        "page-intro",
        r#"<p class="text-xl text-gray-600 mb-8""#,
        r#"<p class="page-intro""#,
    ),
    RuleSpec::literal(
        "section-intro",
        r#"<p class="text-xl text-gray-700 mb-6""#,
        r#"<p class="section-intro""#,
    ),
    RuleSpec::literal(
        "btn-group",
        r#"<div class="flex gap-4 mb-10">"#,
        r#"<div class="btn-group">"#,
    ),
    // code preview window
    RuleSpec::literal(
        "code-preview",
        r#"<div class="code-block">"#,
        r#"<div class="code-preview">"#,
    ),
    RuleSpec::literal(
        "code-preview-header",
        r#"<div class="code-header">"#,
        r#"<div class="code-preview-header">"#,
    ),
    RuleSpec::literal(
        "code-preview-dots",
        r#"<div class="code-dots">"#,
        r#"<div class="code-preview-dots">"#,
    ),
    RuleSpec::regex(
        "code-preview-dot",
        r#"<div class="code-dot (red|yellow|green)"></div>"#,
        r#"<div class="code-preview-dot code-preview-dot-${1}"></div>"#,
    ),
    RuleSpec::literal(
        "code-preview-filename",
        r#"<span class="code-filename">"#,
        r#"<span class="code-preview-filename">"#,
    ),
    RuleSpec::literal(
        "code-preview-content",
        r#"<div class="code-body">"#,
        r#"<div class="code-preview-content">"#,
    ),
    // syntax highlight spans
    RuleSpec::literal(
        "code-keyword",
        r#"<span class="text-purple-400">"#,
        r#"<span class="code-keyword">"#,
    ),
    RuleSpec::literal(
        "code-class",
        r#"<span class="text-yellow-300">"#,
        r#"<span class="code-class">"#,
    ),
    RuleSpec::literal(
        "code-function",
        r#"<span class="text-blue-400">"#,
        r#"<span class="code-function">"#,
    ),
    RuleSpec::regex(
        "code-string",
        r#"<span class="text-green-[34]00">"#,
        r#"<span class="code-string">"#,
    ),
    // table of contents
    RuleSpec::literal(
        "toc-list",
        r#"<ol class="space-y-2 text-sm text-gray-700">"#,
        r#"<ol class="toc-list">"#,
    ),
    RuleSpec::regex(
        "toc-item",
        r#"<li class="flex items-start gap-2"><span class="text-indigo-600 font-medium">(\d+)\.</span>"#,
        r#"<li class="toc-item"><span class="toc-number">${1}.</span>"#,
    ),
    RuleSpec::regex(
        "toc-link",
        r#"<a href="([^"]+)" class="hover:text-indigo-600 transition-colors">([^<]+)</a>"#,
        r#"<a href="${1}" class="toc-link">${2}</a>"#,
    ),
    RuleSpec::regex(
        "card-title",
        r#"<h4 class="card-title card-title-(blue|green|purple|orange)">"#,
        r#"<h4 class="card-title-${1}">"#,
    ),
    RuleSpec::regex(
        "list-styled",
        r#"<ul class="text-(blue|green|gray)-700 space-y-1">"#,
        r#"<ul class="list-styled list-${1}">"#,
    ),
    RuleSpec::literal(
        "subsection-title",
        r#"<h3 class="text-xl font-semibold text-gray-900 mb-4">"#,
        r#"<h3 class="subsection-title">"#,
    ),
    RuleSpec::literal(
        "subsection-title-sm",
        r#"<h3 class="text-lg font-semibold text-gray-900 mb-3">"#,
        r#"<h3 class="subsection-title-sm">"#,
    ),
    RuleSpec::literal(
        "paragraph",
        r#"<p class="text-gray-700 mb-6">"#,
        r#"<p class="paragraph">"#,
    ),
    RuleSpec::literal(
        "paragraph-secondary",
        r#"<p class="text-gray-600 mb-4">"#,
        r#"<p class="paragraph-secondary">"#,
    ),
    RuleSpec::regex(
        "code-filename-badge",
        r#"<div class="absolute top-0 right-0 px-3 py-1 bg-gray-800 text-gray-400 text-xs font-medium rounded-bl-md">([^<]+)</div>"#,
        r#"<div class="code-filename-badge">${1}</div>"#,
    ),
    RuleSpec::literal(
        "code-wrapper",
        r#"<div class="relative mb-6">"#,
        r#"<div class="code-wrapper">"#,
    ),
    RuleSpec::regex(
        "grid-columns",
        r#"<div class="grid grid-cols-1 md:grid-cols-([23]) gap-6 mb-6">"#,
        r#"<div class="grid-${1}col">"#,
    ),
    RuleSpec::regex(
        "link-external",
        r#"<a href="([^"]*)" target="_blank" class="text-blue-600 hover:underline">"#,
        r#"<a href="${1}" target="_blank" class="link-external">"#,
    ),
];

const CSS_MODULES: &[RuleSpec] = &[RuleSpec::regex(
    "css-modules",
    r#"<link rel="stylesheet" href="styles\.css">"#,
    "<!-- Modular CSS -->\n    <link rel=\"stylesheet\" href=\"css/main.css\">",
)
.unless(&["css/main.css"])];

const CODEBLOCK_COPY: &[RuleSpec] = &[
    RuleSpec::regex(
        "codeblock-import",
        r"(import\s*\{[^}]*CodeBlock[^}]*\}\s*from\s*'\.\./components/ui')",
        "${1}\nimport { CodeBlockWithCopy } from '../components/ui'",
    )
    .unless(&["CodeBlockWithCopy"]),
    RuleSpec::regex("codeblock-open", r"<CodeBlock\s+", "<CodeBlockWithCopy "),
    RuleSpec::literal("codeblock-close", "</CodeBlock>", "</CodeBlockWithCopy>"),
];

pub static PRESETS: &[Preset] = &[
    Preset {
        name: "tailwind-layout",
        description: "Drop Tailwind/Google Fonts CDN tags and map page layout classes",
        default_glob: "*.html",
        includes: &[],
        stylesheets: &["styles.css"],
        rules: TAILWIND_LAYOUT,
    },
    Preset {
        name: "semantic-classes",
        description: "Replace utility classes in page content with semantic names",
        default_glob: "*.html",
        includes: &[],
        stylesheets: &[],
        rules: SEMANTIC_CLASSES,
    },
    Preset {
        name: "css-modules",
        description: "Point styles.css references at css/main.css",
        default_glob: "*.html",
        includes: &[],
        stylesheets: &["css/main.css"],
        rules: CSS_MODULES,
    },
    Preset {
        name: "codeblock-copy",
        description: "Swap CodeBlock for CodeBlockWithCopy in TSX pages",
        default_glob: "src/pages/*.tsx",
        includes: &[],
        stylesheets: &[],
        rules: CODEBLOCK_COPY,
    },
    Preset {
        name: "html",
        description: "tailwind-layout, then semantic-classes, then css-modules",
        default_glob: "*.html",
        includes: &["tailwind-layout", "semantic-classes", "css-modules"],
        stylesheets: &[],
        rules: &[],
    },
];

pub fn lookup(name: &str) -> Result<&'static Preset> {
    PRESETS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| RestyleError::UnknownPreset(name.to_string()))
}

/// Stylesheets linked by the named presets that do not exist under `root`.
pub fn missing_stylesheets<S: AsRef<str>>(root: &Path, names: &[S]) -> Result<Vec<&'static str>> {
    let mut missing = Vec::new();
    for name in names {
        for sheet in lookup(name.as_ref())?.linked_stylesheets() {
            if !missing.contains(&sheet) && !root.join(sheet).is_file() {
                missing.push(sheet);
            }
        }
    }
    Ok(missing)
}

/// Compile the named presets, concatenated in the order given.
pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<RuleSet> {
    let mut specs = Vec::new();
    for name in names {
        specs.extend(lookup(name.as_ref())?.specs());
    }
    RuleSet::compile(specs)
}
