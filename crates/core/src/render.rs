//! Template rendering.
//!
//! Templates are Handlebars documents (normally Word 2003 XML) rendered against the
//! serialized [`Resume`]. Field names in templates are the camelCase names used by the data
//! formats, e.g. `{{basics.name}}` or `{{#each work}}{{label}}{{/each}}`.
//!
//! `{{value}}` substitutions are XML-escaped, and characters XML 1.0 forbids are dropped.
//! Helpers registered for every render:
//!
//! | Helper | Example | Output |
//! |---|---|---|
//! | `MYYYY` | `{{MYYYY startDate}}` | `2/1998` |
//! | `MMMMYYYY` | `{{MMMMYYYY startDate}}` | `February 1998` |
//! | `plus1` | `{{plus1 @index}}` | loop counter from 1 |
//! | `toUpper` | `{{toUpper basics.name}}` | upper-cased text |
//! | `paragraphs` | `{{#paragraphs summary}}...{{/paragraphs}}` | block per translated paragraph |
//! | `richText` | `{{{richText summary}}}` | `<w:p>` fragment |
//!
//! Date helpers pass text that is not a `YYYY-MM-DD` date through unchanged, so an end date
//! of "Present" still renders.

use crate::markup::{self, Paragraph};
use crate::wordml::{self, strip_invalid_xml_chars};
use crate::CoreResult;
use fodder_types::CalendarDate;
use handlebars::{
    handlebars_helper, BlockContext, Context, Handlebars, Helper, HelperDef, HelperResult,
    JsonValue, Output, RenderContext, RenderErrorReason, Renderable,
};
use resume_data::Resume;

const TEMPLATE_NAME: &str = "resume";

/// Render a résumé through a template.
///
/// A new registry is built for every call, so concurrent renders share nothing.
///
/// # Errors
///
/// - `CoreError::TemplateSyntax` if the template does not parse.
/// - `CoreError::Render` if a helper or expression fails while rendering.
pub fn render(resume: &Resume, template_text: &str) -> CoreResult<Vec<u8>> {
    tracing::debug!(template_bytes = template_text.len(), "rendering resume");

    let mut registry = registry();
    registry.register_template_string(TEMPLATE_NAME, template_text)?;
    let rendered = registry.render(TEMPLATE_NAME, resume)?;

    tracing::debug!(output_bytes = rendered.len(), "rendered resume");
    Ok(rendered.into_bytes())
}

fn registry() -> Handlebars<'static> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(false);
    registry.register_escape_fn(escape_xml);

    registry.register_helper("MYYYY", Box::new(month_year));
    registry.register_helper("MMMMYYYY", Box::new(month_name_year));
    registry.register_helper("plus1", Box::new(plus_one));
    registry.register_helper("toUpper", Box::new(to_upper));
    registry.register_helper("paragraphs", Box::new(ParagraphsHelper));
    registry.register_helper("richText", Box::new(RichTextHelper));
    registry
}

fn escape_xml(text: &str) -> String {
    quick_xml::escape::escape(strip_invalid_xml_chars(text).as_ref()).into_owned()
}

/// Text of a helper argument; missing values are empty.
fn text_of(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn format_date(value: &JsonValue, format: fn(&CalendarDate) -> String) -> String {
    let text = text_of(value);
    if text.is_empty() {
        return text;
    }
    match CalendarDate::parse(&text) {
        Ok(date) => format(&date),
        Err(err) => {
            tracing::warn!("{err}; rendering the value unchanged");
            text
        }
    }
}

handlebars_helper!(month_year: |date: Json| format_date(date, CalendarDate::month_year));
handlebars_helper!(month_name_year: |date: Json| format_date(date, CalendarDate::month_name_year));
handlebars_helper!(plus_one: |n: i64| n.saturating_add(1));
handlebars_helper!(to_upper: |value: Json| text_of(value).to_uppercase());

fn translated_param(
    h: &Helper<'_>,
    name: &'static str,
) -> Result<Vec<Paragraph>, RenderErrorReason> {
    let param = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex(name, 0))?;
    Ok(markup::translate(&text_of(param.value())))
}

/// `{{#paragraphs field}}` renders its block once per translated paragraph. Using it without a
/// block is a render error.
///
/// Inside the block the context is the paragraph (`style`, `listItem`, `runs`), with
/// `@index`, `@first` and `@last` set.
#[derive(Clone, Copy)]
struct ParagraphsHelper;

impl HelperDef for ParagraphsHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let paragraphs = translated_param(h, "paragraphs")?;
        let template = h.template().ok_or(RenderErrorReason::BlockContentRequired)?;

        let last = paragraphs.len().saturating_sub(1);
        for (index, paragraph) in paragraphs.iter().enumerate() {
            let value = serde_json::to_value(paragraph)
                .map_err(|e| RenderErrorReason::Other(e.to_string()))?;

            let mut block = BlockContext::new();
            block.set_base_value(value);
            block.set_local_var("index", JsonValue::from(index));
            block.set_local_var("first", JsonValue::from(index == 0));
            block.set_local_var("last", JsonValue::from(index == last));

            rc.push_block(block);
            template.render(r, ctx, rc, out)?;
            rc.pop_block();
        }
        Ok(())
    }
}

/// `{{{richText field}}}` writes the translated field as WordprocessingML paragraphs.
#[derive(Clone, Copy)]
struct RichTextHelper;

impl HelperDef for RichTextHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let paragraphs = translated_param(h, "richText")?;
        let fragment = wordml::paragraphs_to_wordml(&paragraphs)
            .map_err(|e| RenderErrorReason::Other(e.to_string()))?;
        out.write(&fragment)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use resume_data::{EntryGroup, Work};

    fn render_str(resume: &Resume, template: &str) -> String {
        String::from_utf8(render(resume, template).unwrap()).unwrap()
    }

    fn resume_with_work(start: &str, end: &str) -> Resume {
        let mut resume = Resume::default();
        resume.work[0] = EntryGroup::new(
            "Experience",
            vec![Work {
                company: "Initech".into(),
                start_date: start.into(),
                end_date: end.into(),
                ..Work::default()
            }],
        );
        resume
    }

    #[test]
    fn test_date_helpers() {
        let resume = resume_with_work("1998-02-01", "not-a-date");
        let template = "{{#each work}}{{#each entries}}{{MYYYY startDate}}|{{MMMMYYYY startDate}}|{{MYYYY endDate}}|{{MMMMYYYY endDate}}{{/each}}{{/each}}";
        assert_eq!(
            render_str(&resume, template),
            "2/1998|February 1998|not-a-date|not-a-date"
        );
    }

    #[test]
    fn test_date_helpers_on_empty_and_missing_values() {
        let resume = resume_with_work("", "");
        let template = "{{#each work}}{{#each entries}}[{{MYYYY endDate}}][{{MMMMYYYY noSuchField}}]{{/each}}{{/each}}";
        assert_eq!(render_str(&resume, template), "[][]");
    }

    #[test]
    fn test_date_fallback_is_escaped() {
        let resume = resume_with_work("<soon>", "");
        let template = "{{#each work}}{{#each entries}}{{MYYYY startDate}}{{/each}}{{/each}}";
        assert_eq!(render_str(&resume, template), "&lt;soon&gt;");
    }

    #[test]
    fn test_plus1_and_to_upper() {
        let mut resume = Resume::default();
        resume.basics.name = "Peter Gibbons".into();
        resume.basics.highlights = vec!["a".into(), "b".into()];
        let template = "{{toUpper basics.name}}:{{#each basics.highlights}} {{plus1 @index}}.{{this}}{{/each}}";
        assert_eq!(render_str(&resume, template), "PETER GIBBONS: 1.a 2.b");
    }

    #[test]
    fn test_substitution_is_xml_escaped() {
        let mut resume = Resume::default();
        resume.basics.name = r#"Bob & "Lumbergh" <boss>"#.into();
        let output = render_str(&resume, "<w:t>{{basics.name}}</w:t>");
        assert_eq!(
            output,
            "<w:t>Bob &amp; &quot;Lumbergh&quot; &lt;boss&gt;</w:t>"
        );
    }

    #[test]
    fn test_substitution_drops_forbidden_characters() {
        let mut resume = Resume::default();
        resume.basics.name = "Peter\u{b}Gibbons\u{0}\u{fffe}".into();
        resume.basics.label = "tab\there".into();
        let template = "{{toUpper basics.name}}|{{basics.name}}|{{basics.label}}";
        assert_eq!(render_str(&resume, template), "PETERGIBBONS|PeterGibbons|tab\there");
    }

    #[test]
    fn test_paragraphs_without_block_is_render_error() {
        let mut resume = Resume::default();
        resume.basics.summary = "Intro".into();
        let err = render(&resume, "{{paragraphs basics.summary}}").unwrap_err();
        assert!(matches!(err, CoreError::Render(_)), "{err}");
    }

    #[test]
    fn test_paragraphs_block_helper() {
        let mut resume = Resume::default();
        resume.basics.summary = "Intro with **bold**\n- first\n- second".into();
        let template = concat!(
            "{{#paragraphs basics.summary}}",
            "[{{@index}}{{#if listItem}} bullet{{/if}}:",
            "{{#each runs}}{{#if bold}}<b>{{text}}</b>{{else}}{{text}}{{/if}}{{/each}}]",
            "{{/paragraphs}}"
        );
        assert_eq!(
            render_str(&resume, template),
            "[0:Intro with <b>bold</b>][1 bullet:first][2 bullet:second]"
        );
    }

    #[test]
    fn test_paragraphs_escapes_run_text() {
        let mut resume = Resume::default();
        resume.basics.summary = "AT&T".into();
        let template = "{{#paragraphs basics.summary}}{{#each runs}}{{text}}{{/each}}{{/paragraphs}}";
        assert_eq!(render_str(&resume, template), "AT&amp;T");
    }

    #[test]
    fn test_rich_text_helper() {
        let mut resume = Resume::default();
        resume.basics.summary = "- _Did_ nothing".into();
        let output = render_str(&resume, "{{{richText basics.summary}}}");
        assert!(output.starts_with(r#"<w:p><w:pPr><w:pStyle w:val="ListBullet"/></w:pPr>"#));
        assert!(output.contains(r#"<w:r><w:rPr><w:i/></w:rPr><w:t xml:space="preserve">Did</w:t></w:r>"#));
    }

    #[test]
    fn test_syntax_error_is_template_syntax() {
        let err = render(&Resume::default(), "{{#each work}}never closed").unwrap_err();
        assert!(matches!(err, CoreError::TemplateSyntax(_)), "{err}");
    }

    #[test]
    fn test_unknown_helper_is_render_error() {
        let err = render(&Resume::default(), "{{noSuchHelper basics.name}}").unwrap_err();
        assert!(matches!(err, CoreError::Render(_)), "{err}");
    }

    #[test]
    fn test_render_is_deterministic() {
        let resume = resume_with_work("1998-02-01", "");
        let template = "{{#each work}}{{label}}{{#each entries}}{{company}} {{MMMMYYYY startDate}}{{/each}}{{/each}}";
        let first = render(&resume, template).unwrap();
        let second = render(&resume, template).unwrap();
        assert_eq!(first, second);
    }
}
