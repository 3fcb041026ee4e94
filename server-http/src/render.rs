use promo::domain::PromoItem;
use promo::ports::PromoRenderer;

/// Default HTML strategy for the rendered surfaces. Text lands in element
/// content or attribute values, so everything user-authored goes through
/// `escape_html` before interpolation.
pub struct HtmlRenderer;

impl PromoRenderer for HtmlRenderer {
    fn render_blocks(&self, items: &[PromoItem]) -> String {
        let mut html = String::from("<div class=\"promo-blocks\">\n");

        for item in items {
            html.push_str(&format!(
                "  <div class=\"promo-block\" data-id=\"{}\">\n",
                item.id
            ));

            if let Some(image) = &item.image {
                html.push_str(&format!(
                    "    <div class=\"promo-image\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\"></div>\n",
                    escape_html(&image.url),
                    escape_html(if image.alt.is_empty() { &item.title } else { &image.alt }),
                ));
            }

            html.push_str("    <div class=\"promo-content\">\n");
            html.push_str(&format!(
                "      <h3 class=\"promo-title\">{}</h3>\n",
                escape_html(&item.title)
            ));
            html.push_str(&format!(
                "      <div class=\"promo-description\">{}</div>\n",
                escape_html(&item.content)
            ));

            if let Some((text, url)) = item.cta() {
                html.push_str(&format!(
                    "      <div class=\"promo-cta\"><a href=\"{}\" class=\"promo-cta-button\">{}</a></div>\n",
                    escape_html(url),
                    escape_html(text),
                ));
            }

            html.push_str("    </div>\n  </div>\n");
        }

        html.push_str("</div>");
        html
    }

    fn render_empty(&self, message: &str) -> String {
        format!(
            "<div class=\"promo-blocks promo-blocks-empty\"><p>{}</p></div>",
            escape_html(message)
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
