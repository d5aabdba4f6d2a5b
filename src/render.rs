use serde::Serialize;

use crate::parser::SummaryResult;

pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SectionBody {
    Text(String),
    Bullets(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Display {
    pub reference_banner: String,
    pub sections: Vec<Section>,
}

fn sections(result: &SummaryResult) -> Vec<Section> {
    let text = [
        ("Overview", &result.overview),
        ("Historical Context", &result.historical_context),
        ("Summary", &result.summary),
    ];
    let lists = [
        ("Key Verses", &result.key_verses),
        ("Themes", &result.themes),
        ("Life Application", &result.life_application),
        ("Reflection Questions", &result.reflection_questions),
        ("Cross-References", &result.cross_references),
    ];

    let text = text.into_iter().filter_map(|(title, v)| match v {
        Some(s) if !s.is_empty() => Some(Section { title, body: SectionBody::Text(s.clone()) }),
        _ => None,
    });
    let lists = lists.into_iter().filter_map(|(title, v)| match v {
        Some(items) if !items.is_empty() => {
            Some(Section { title, body: SectionBody::Bullets(items.clone()) })
        }
        _ => None,
    });
    text.chain(lists).collect()
}

fn heading(result: &SummaryResult) -> &str {
    match result.reference.as_deref() {
        Some(r) if !r.is_empty() => r,
        _ => "Summary",
    }
}

pub fn to_display(result: &SummaryResult) -> Display {
    let reference = match result.reference.as_deref() {
        Some(r) if !r.is_empty() => r,
        _ => "(unknown)",
    };
    Display {
        reference_banner: format!("Reference: {reference}"),
        sections: sections(result),
    }
}

pub fn to_markdown(result: &SummaryResult) -> String {
    let mut md = format!("# {}", heading(result));
    for section in sections(result) {
        md.push_str("\n\n## ");
        md.push_str(section.title);
        md.push('\n');
        match section.body {
            SectionBody::Text(s) => md.push_str(&s),
            SectionBody::Bullets(items) => {
                let lines: Vec<String> = items.iter().map(|x| format!("- {x}")).collect();
                md.push_str(&lines.join("\n"));
            }
        }
    }
    md.push('\n');
    md
}

pub fn export_file_name(result: &SummaryResult) -> String {
    let base = match result.reference.as_deref() {
        Some(r) if !r.is_empty() => r,
        _ => "summary",
    };
    let safe: String = base
        .chars()
        .map(|c| match c {
            ' ' | '"' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{safe}.md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    const JOHN_3_JSON: &str = include_str!("../tests/fixtures/john_3.json");
    const JOHN_3_MD: &str = include_str!("../tests/fixtures/john_3.md");

    #[test]
    fn empty_result_is_just_the_default_heading() {
        assert_eq!(to_markdown(&SummaryResult::default()), "# Summary\n");
        assert!(to_display(&SummaryResult::default()).sections.is_empty());
    }

    #[test]
    fn full_result_matches_golden_file() {
        let result = parser::parse(JOHN_3_JSON).unwrap();
        assert_eq!(to_markdown(&result), JOHN_3_MD);
    }

    #[test]
    fn sections_follow_fixed_order() {
        let result = parser::parse(JOHN_3_JSON).unwrap();
        let md = to_markdown(&result);
        let order = [
            "# John 3",
            "## Overview",
            "## Historical Context",
            "## Summary",
            "## Key Verses",
            "## Themes",
            "## Life Application",
            "## Reflection Questions",
            "## Cross-References",
        ];
        let positions: Vec<usize> = order.iter().map(|h| md.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let titles: Vec<&str> = to_display(&result).sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, order[1..].iter().map(|h| &h[3..]).collect::<Vec<_>>());
    }

    #[test]
    fn missing_and_empty_fields_are_omitted() {
        let result = SummaryResult {
            reference: Some("Ruth 1".into()),
            overview: Some(String::new()),
            summary: Some("Naomi returns with Ruth.".into()),
            themes: Some(vec![]),
            life_application: Some(vec!["Stay loyal".into()]),
            ..Default::default()
        };
        assert_eq!(
            to_markdown(&result),
            "# Ruth 1\n\n## Summary\nNaomi returns with Ruth.\n\n## Life Application\n- Stay loyal\n"
        );
        let display = to_display(&result);
        assert_eq!(display.reference_banner, "Reference: Ruth 1");
        assert_eq!(display.sections.len(), 2);
        assert_eq!(
            display.sections[1].body,
            SectionBody::Bullets(vec!["Stay loyal".into()])
        );
    }

    #[test]
    fn markdown_is_stable() {
        let result = parser::parse(JOHN_3_JSON).unwrap();
        assert_eq!(to_markdown(&result), to_markdown(&result.clone()));
    }

    #[test]
    fn export_name_from_reference() {
        let mut result = SummaryResult { reference: Some("Mosiah 2-5".into()), ..Default::default() };
        assert_eq!(export_file_name(&result), "Mosiah_2-5.md");
        result.reference = Some("faith/works \"James\"".into());
        assert_eq!(export_file_name(&result), "faith_works__James_.md");
        result.reference = None;
        assert_eq!(export_file_name(&result), "summary.md");
    }

    #[test]
    fn section_body_serializes_tagged() {
        let json = serde_json::to_value(SectionBody::Bullets(vec!["a".into()])).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "bullets", "value": ["a"]}));
    }
}
