//! Header/footer variable resolution
//!
//! Recognised tokens: `{{page.current}}`, `{{page.total}}`,
//! `{{document.title}}`, `{{document.numero}}` and
//! `{{date.format("<pattern>")}}`. Anything else between braces is left
//! untouched.

mod date;

pub use date::format_date;

use crate::settings::HeaderFooterContent;
use chrono::{Local, NaiveDate};
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{(page\.current|page\.total|document\.title|document\.numero|date\.format\("([^"]+)"\))\}\}"#)
        .unwrap()
});

/// Values substituted into a template
#[derive(Debug, Clone, PartialEq)]
pub struct VariableContext<'a> {
    /// 1-based page number
    pub page_number: usize,
    pub total_pages: usize,
    pub document_title: &'a str,
    pub document_number: Option<&'a str>,
    pub date: NaiveDate,
}

impl<'a> VariableContext<'a> {
    /// Context dated today in local time
    pub fn new(page_number: usize, total_pages: usize, document_title: &'a str) -> Self {
        Self {
            page_number,
            total_pages,
            document_title,
            document_number: None,
            date: Local::now().date_naive(),
        }
    }

    pub fn with_number(mut self, number: Option<&'a str>) -> Self {
        self.document_number = number;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Same document and date, different page
    pub fn for_page(&self, page_number: usize) -> Self {
        Self {
            page_number,
            ..self.clone()
        }
    }
}

/// Expand every recognised token in `template`
pub fn resolve_with(template: &str, ctx: &VariableContext<'_>) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }

    TOKEN_RE
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "page.current" => ctx.page_number.to_string(),
            "page.total" => ctx.total_pages.to_string(),
            "document.title" => ctx.document_title.to_string(),
            "document.numero" => ctx.document_number.unwrap_or_default().to_string(),
            _ => match caps.get(2) {
                Some(pattern) => format_date(ctx.date, pattern.as_str()),
                None => caps[0].to_string(),
            },
        })
        .into_owned()
}

/// Expand `template` for one page of a document, dated today
pub fn resolve(template: &str, page_number: usize, total_pages: usize, document_title: &str) -> String {
    resolve_with(template, &VariableContext::new(page_number, total_pages, document_title))
}

/// The three zones of a header or footer after resolution
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResolvedZones {
    pub left: String,
    pub center: String,
    pub right: String,
}

/// Resolve all zones of a header or footer
pub fn resolve_content(content: &HeaderFooterContent, ctx: &VariableContext<'_>) -> ResolvedZones {
    ResolvedZones {
        left: resolve_with(&content.left, ctx),
        center: resolve_with(&content.center, ctx),
        right: resolve_with(&content.right, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(page: usize, total: usize, title: &str) -> VariableContext<'_> {
        VariableContext::new(page, total, title).with_date(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap())
    }

    #[test]
    fn test_page_numbers() {
        assert_eq!(resolve("Page {{page.current}} / {{page.total}}", 2, 5, "Brief"), "Page 2 / 5");
    }

    #[test]
    fn test_document_title() {
        assert_eq!(resolve("{{document.title}}", 1, 1, "Conclusions"), "Conclusions");
    }

    #[test]
    fn test_document_number() {
        let ctx = fixed(1, 1, "Assignation").with_number(Some("RG 24/0012"));
        assert_eq!(resolve_with("N° {{document.numero}}", &ctx), "N° RG 24/0012");
        assert_eq!(resolve_with("N° {{document.numero}}", &fixed(1, 1, "")), "N° ");
    }

    #[test]
    fn test_date_format() {
        let ctx = fixed(1, 1, "");
        assert_eq!(resolve_with(r#"Paris, le {{date.format("D MMMM YYYY")}}"#, &ctx), "Paris, le 3 mai 2024");
        assert_eq!(resolve_with(r#"{{date.format("DD/MM/YYYY")}}"#, &ctx), "03/05/2024");
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        let ctx = fixed(3, 4, "T");
        assert_eq!(resolve_with("{{client.name}} {{page.current}}", &ctx), "{{client.name}} 3");
        assert_eq!(resolve_with("{{date.format()}}", &ctx), "{{date.format()}}");
        assert_eq!(resolve_with("{page.current}", &ctx), "{page.current}");
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let ctx = fixed(7, 9, "T");
        assert_eq!(resolve_with("{{page.current}}-{{page.current}}", &ctx), "7-7");
    }

    #[test]
    fn test_resolve_content() {
        let content = HeaderFooterContent::new("{{document.title}}", "", "{{page.current}}");
        let zones = resolve_content(&content, &fixed(2, 3, "Note"));
        assert_eq!(zones.left, "Note");
        assert_eq!(zones.right, "2");
        assert!(zones.center.is_empty());
    }
}
