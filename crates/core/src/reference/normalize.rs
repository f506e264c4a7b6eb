use lol_html::html_content::ContentType;
use scraper::Html;

use crate::parse::selector;
use crate::text::{collapse_whitespace, flatten_html};
use crate::{MidweekError, Result};

// Source markup carries its own line breaks, so chapter boundaries are
// marked with a character that cannot come from the page layout.
const CHAPTER_BREAK: &str = "\u{2029}";

fn rewrite_error(e: lol_html::errors::RewritingError) -> MidweekError {
    MidweekError::HtmlParseError(e.to_string())
}

/// Text of a talk or article: every standard-body paragraph, paragraph
/// numbers removed, one line each.
pub fn talk_text(html: &str) -> Result<String> {
    let mut stripped = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![lol_html::element!("span.parNum", |el| {
                el.remove();
                Ok(())
            })],
            ..Default::default()
        },
        |c: &[u8]| {
            stripped.push_str(&String::from_utf8_lossy(c));
        },
    );
    rewriter.write(html.as_bytes()).map_err(rewrite_error)?;
    rewriter.end().map_err(rewrite_error)?;

    let fragment = Html::parse_fragment(&stripped);
    let paragraphs = selector("p.sb")?;
    let lines: Vec<String> = fragment
        .select(&paragraphs)
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(MidweekError::Format("talk publication has no body paragraphs".to_string()));
    }
    Ok(lines.join("\n"))
}

/// Text of a scripture range: footnote and cross-reference markers removed,
/// a line break at each chapter and a space at each verse.
pub fn scripture_text(html: &str) -> Result<String> {
    let mut marked = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("a.fn", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("a.b", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("span.cl", |el| {
                    el.before(CHAPTER_BREAK, ContentType::Text);
                    Ok(())
                }),
                lol_html::element!("span.v", |el| {
                    el.before(" ", ContentType::Text);
                    Ok(())
                }),
            ],
            ..Default::default()
        },
        |c: &[u8]| {
            marked.push_str(&String::from_utf8_lossy(c));
        },
    );
    rewriter.write(html.as_bytes()).map_err(rewrite_error)?;
    rewriter.end().map_err(rewrite_error)?;

    let fragment = Html::parse_fragment(&marked);
    let text: String = fragment.root_element().text().collect();
    let chapters: Vec<String> = text
        .split(CHAPTER_BREAK)
        .map(collapse_whitespace)
        .filter(|chapter| !chapter.is_empty())
        .collect();
    Ok(chapters.join("\n"))
}

/// Text of any other publication: flattened, line breaks collapsed.
pub fn generic_text(html: &str) -> Result<String> {
    Ok(flatten_html(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_talk_text_strips_paragraph_numbers() {
        let html = r#"<header><h1>Creation</h1></header>
            <p class="sb"><span class="parNum" data-pnum="1">1</span> The universe had a   beginning.</p>
            <p class="ss">Study question?</p>
            <p class="sb"><span class="parNum" data-pnum="2">2</span> God is its Source.</p>"#;
        assert_eq!(talk_text(html).unwrap(), "The universe had a beginning.\nGod is its Source.");
    }

    #[test]
    fn test_talk_text_without_body() {
        assert!(matches!(talk_text("<p>loose</p>"), Err(MidweekError::Format(_))));
    }

    #[test]
    fn test_scripture_text_marks_boundaries() {
        let html = r##"<p class="sb"><span class="v" id="v1-1-1-1"><span class="cl"><strong>1</strong> </span>In the beginning God created the heavens and the earth.<a class="fn" href="#fn1">*</a></span>
            <span class="v" id="v1-1-2-1"><sup class="vl">2</sup> Now the earth was formless<a class="b" href="#cr1">+</a> and waste.</span></p>
            <p class="sb"><span class="v" id="v1-2-1-1"><span class="cl"><strong>2</strong> </span>Thus the heavens and the earth were completed.</span></p>"##;
        assert_eq!(
            scripture_text(html).unwrap(),
            "1 In the beginning God created the heavens and the earth. 2 Now the earth was formless and waste.\n\
             2 Thus the heavens and the earth were completed."
        );
    }

    #[test]
    fn test_generic_text_collapses_breaks() {
        let html = "<div><p>Line one</p>\n\n<p></p><p>Line   two</p></div>";
        assert_eq!(generic_text(html).unwrap(), "Line one\nLine two");
    }
}
