use once_cell::sync::Lazy;
use regex::Regex;

use crate::HP;

static BRACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[{]{2,}|[}]{2,}").unwrap());

static LINK_DELIM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[|\]\]").unwrap());

static REF_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<ref\b[^>]*/>|<ref\b[^>]*>|</ref\s*>").unwrap());

static EXTERNAL_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?|ftp)://[^\s\]\[|<>]+|\bwww\.[^\s\]\[|<>]+").unwrap()
});

static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:file|image):").unwrap());

static REDIRECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#redirect").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuralCounts {
    pub templates: usize,
    pub categories: usize,
    pub internal_links: usize,
    pub references: usize,
    pub images: usize,
    pub sections: usize,
    pub external_links: usize,
    pub redirects: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    Open,
    Close,
    SelfClosing,
}

// A close with nothing open is ignored and an open that is never closed does
// not count, so broken markup can lower a count but never take it below zero.
fn count_balanced(delims: impl IntoIterator<Item = Delim>) -> usize {
    let mut depth = 0usize;
    let mut complete = 0usize;
    for delim in delims {
        match delim {
            Delim::Open => depth += 1,
            Delim::Close if depth > 0 => {
                depth -= 1;
                complete += 1;
            }
            Delim::Close => {}
            Delim::SelfClosing => complete += 1,
        }
    }
    complete
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brace {
    Template,
    Parameter,
}

// `{{{name}}}` is a template parameter, not a template. An opening run opens
// templates two braces at a time, with an odd run ending in one innermost
// parameter. A closing run closes whatever is innermost until it runs out.
fn count_templates(text: &str) -> usize {
    let mut open: Vec<Brace> = Vec::new();
    let mut templates = 0usize;

    for run in BRACE_RUN_RE.find_iter(text) {
        let mut braces = run.as_str().len();
        if run.as_str().starts_with('{') {
            let parameter = braces % 2 == 1;
            if parameter {
                braces -= 3;
            }
            open.extend(std::iter::repeat(Brace::Template).take(braces / 2));
            if parameter {
                open.push(Brace::Parameter);
            }
            continue;
        }
        while let Some(&innermost) = open.last() {
            let width = match innermost {
                Brace::Template => 2,
                Brace::Parameter => 3,
            };
            if braces < width {
                break;
            }
            open.pop();
            braces -= width;
            if innermost == Brace::Template {
                templates += 1;
            }
        }
    }
    templates
}

fn count_references(text: &str) -> usize {
    count_balanced(REF_TAG_RE.find_iter(text).map(|m| {
        let tag = m.as_str();
        if tag.starts_with("</") {
            Delim::Close
        } else if tag.ends_with("/>") {
            Delim::SelfClosing
        } else {
            Delim::Open
        }
    }))
}

/// Count `[[...]]` pairs, split into (categories, internal links).
fn count_links(text: &str) -> (usize, usize) {
    let mut open_ends: Vec<usize> = Vec::new();
    let mut categories = 0usize;
    let mut links = 0usize;

    for m in LINK_DELIM_RE.find_iter(text) {
        if m.as_str() == "[[" {
            open_ends.push(m.end());
            continue;
        }
        let Some(inner_start) = open_ends.pop() else {
            continue;
        };
        if is_category_target(&text[inner_start..m.start()]) {
            categories += 1;
        } else {
            links += 1;
        }
    }
    (categories, links)
}

fn is_category_target(inner: &str) -> bool {
    const PREFIX: &str = "category:";
    inner
        .trim_start()
        .get(..PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(PREFIX))
}

/// Heading depth of a `== Title ==` line, if it is one.
fn heading_depth(line: &str) -> Option<usize> {
    let line = line.trim_end();
    let leading = line.chars().take_while(|&c| c == '=').count();
    let trailing = line.chars().rev().take_while(|&c| c == '=').count();
    if leading != trailing || !(HP.section_min_depth..=HP.section_max_depth).contains(&leading) {
        return None;
    }
    // `leading` and `trailing` count ASCII bytes.
    let inner = line.get(leading..line.len().saturating_sub(trailing))?;
    if inner.trim().is_empty() {
        None
    } else {
        Some(leading)
    }
}

fn count_sections(text: &str) -> usize {
    text.lines().filter_map(heading_depth).count()
}

/// Count every markup construct in `text`.
pub fn count_structure(text: &str) -> StructuralCounts {
    let (categories, internal_links) = count_links(text);
    StructuralCounts {
        templates: count_templates(text),
        categories,
        internal_links,
        references: count_references(text),
        images: IMAGE_RE.find_iter(text).count(),
        sections: count_sections(text),
        external_links: EXTERNAL_LINK_RE.find_iter(text).count(),
        redirects: REDIRECT_RE.find_iter(text).count(),
    }
}
