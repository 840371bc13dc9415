use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::PostItem;

/// Render the HTML description of a post: its images, then its caption.
pub fn render_description(item: &PostItem) -> String {
    let mut html = String::new();

    if item.is_multi_image() {
        for image in &item.images {
            html.push_str(&format!(
                "<a href=\"{}\"><img src=\"{}\"></a><br>",
                encode_double_quoted_attribute(&image.original_link),
                encode_double_quoted_attribute(&image.image_url),
            ));
        }
    } else if let Some(ref cover) = item.cover {
        html.push_str(&format!(
            "<img src=\"{}\"><br>",
            encode_double_quoted_attribute(cover)
        ));
    }

    let caption = encode_text(item.summary.trim()).replace('\n', "<br>");
    if !caption.is_empty() {
        html.push_str("<p>");
        html.push_str(&caption);
        html.push_str("</p>");
    }

    html
}
