use intake::{ImageKind, UploadedImage};
use session::{Notice, SessionState};
use std::fmt::Write;

use crate::markup::{escape, to_html};

pub const PAGE_TITLE: &str = "OCR with Gemma-3";
pub const HEADING: &str = "Gemma-3 OCR";
pub const PAGE_ICON: &str = "🔎";
pub const DESCRIPTION: &str = "Extract structured text from images using Gemma-3 Vision!";
pub const PLACEHOLDER: &str = "Upload an image and click 'Extract Text' to see the results here.";
pub const BUSY_MESSAGE: &str = "Processing image...";

/// Per-request inputs that are not part of the cached result.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViewInputs<'a> {
    pub image: Option<&'a UploadedImage>,
    pub notice: Option<&'a Notice>,
    pub model: &'a str,
    /// Header logo as a data URL; the page icon stands in when absent
    pub logo: Option<&'a str>,
}

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; color: #262730; }
.layout { display: flex; min-height: 100vh; }
aside { width: 320px; padding: 2rem 1.5rem; background: #f0f2f6; box-sizing: border-box; }
main { flex: 1; padding: 2rem 3rem; }
.topbar { display: flex; justify-content: space-between; align-items: center; }
.topbar h1 { margin: 0; }
.topbar h1 img { vertical-align: -12px; }
.description { margin-top: 0.25rem; }
.preview img { max-width: 100%; border-radius: 4px; }
.preview figcaption { font-size: 0.85rem; color: #6b6f76; text-align: center; }
button { padding: 0.4rem 0.9rem; border-radius: 6px; border: 1px solid #d0d3d9; background: #fff; cursor: pointer; }
button.primary { background: #ff4b4b; border-color: #ff4b4b; color: #fff; }
button:disabled { opacity: 0.5; cursor: not-allowed; }
.notice { padding: 0.75rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.notice.error { background: #ffe9e9; color: #7d1a1a; }
.notice.warning { background: #fff8e1; color: #6a4b00; }
.info { padding: 0.75rem 1rem; border-radius: 6px; background: #e8f0fe; color: #1c3f8c; }
.busy { display: none; margin-top: 0.75rem; }
.busy.active { display: block; }
footer { margin-top: 2rem; font-size: 0.8rem; color: #6b6f76; }
"#;

/// Render the whole page from the cached result and this request's inputs.
pub fn render_page(state: &SessionState, inputs: &ViewInputs<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(PAGE_TITLE));
    let _ = writeln!(
        html,
        "<link rel=\"icon\" href=\"data:image/svg+xml,%3Csvg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22%3E%3Ctext y=%22.9em%22 font-size=%2290%22%3E{}%3C/text%3E%3C/svg%3E\">",
        PAGE_ICON
    );
    let _ = writeln!(html, "<style>{}</style>\n</head>\n<body>\n<div class=\"layout\">", STYLE);

    render_sidebar(&mut html, inputs.image);
    render_main(&mut html, state, inputs);

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, image: Option<&UploadedImage>) {
    html.push_str("<aside>\n<h2>Upload Image</h2>\n");

    let _ = writeln!(
        html,
        r#"<form action="/upload" method="post" enctype="multipart/form-data">
<label for="file">Choose an image...</label>
<input id="file" type="file" name="file" accept="{}" onchange="this.form.submit()">
<noscript><button type="submit">Upload</button></noscript>
</form>"#,
        ImageKind::accept_attribute()
    );

    if let Some(image) = image {
        let (width, height) = image.dimensions();
        let _ = writeln!(
            html,
            r#"<figure class="preview"><img src="{}" alt="{}" width="{}" height="{}"><figcaption>Uploaded Image</figcaption></figure>"#,
            image.preview_data_url(),
            escape(image.file_name()),
            width,
            height
        );
    }

    // Extract only does something once an image is selected
    let disabled = if image.is_some() { "" } else { " disabled" };
    let _ = writeln!(
        html,
        r#"<form action="/extract" method="post" onsubmit="this.querySelector('button').disabled = true; document.getElementById('busy').classList.add('active');">
<button class="primary" type="submit"{}>Extract Text 🔍</button>
</form>
<div id="busy" class="busy" role="status">⏳ {}</div>"#,
        disabled,
        escape(BUSY_MESSAGE)
    );

    html.push_str("</aside>\n");
}

fn render_main(html: &mut String, state: &SessionState, inputs: &ViewInputs<'_>) {
    html.push_str("<main>\n<div class=\"topbar\">\n");
    match inputs.logo {
        Some(logo) => {
            let _ = writeln!(
                html,
                "<h1><img src=\"{}\" width=\"50\" alt=\"\"> {}</h1>",
                escape(logo),
                escape(HEADING)
            );
        }
        None => {
            let _ = writeln!(html, "<h1>{} {}</h1>", PAGE_ICON, escape(HEADING));
        }
    }
    html.push_str(
        "<form action=\"/clear\" method=\"post\"><button type=\"submit\">Clear 🗑️</button></form>\n</div>\n",
    );
    let _ = writeln!(html, "<p class=\"description\">{}</p>\n<hr>", escape(DESCRIPTION));

    if let Some(notice) = inputs.notice {
        let class = match notice {
            Notice::Error(_) => "error",
            Notice::Warning(_) => "warning",
        };
        let _ = writeln!(
            html,
            "<div class=\"notice {}\" role=\"alert\">{}</div>",
            class,
            escape(notice.message())
        );
    }

    html.push_str("<section id=\"result\">\n");
    match state.result() {
        Some(text) => html.push_str(&to_html(text)),
        None => {
            let _ = writeln!(html, "<div class=\"info\">{}</div>", escape(PLACEHOLDER));
        }
    }
    html.push_str("</section>\n<hr>\n");

    if !inputs.model.is_empty() {
        let _ = writeln!(html, "<footer>Model: {}</footer>", escape(inputs.model));
    }
    html.push_str("</main>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake::testing::sample_png;

    fn inputs<'a>(image: Option<&'a UploadedImage>, notice: Option<&'a Notice>) -> ViewInputs<'a> {
        ViewInputs { image, notice, model: "gemma3:12b", logo: None }
    }

    #[test]
    fn test_empty_state_shows_placeholder() {
        let html = render_page(&SessionState::Empty, &inputs(None, None));

        assert!(html.contains(&escape(PLACEHOLDER)));
        assert!(!html.contains("<h1>HELLO</h1>"));
        assert!(html.contains("<title>OCR with Gemma-3</title>"));
    }

    #[test]
    fn test_result_rendered_as_markup() {
        let state = SessionState::HasResult("# HELLO".to_string());
        let html = render_page(&state, &inputs(None, None));

        assert!(html.contains("<h1>HELLO</h1>"));
        assert!(!html.contains(&escape(PLACEHOLDER)));
    }

    #[test]
    fn test_extract_disabled_without_image() {
        let html = render_page(&SessionState::Empty, &inputs(None, None));
        assert!(html.contains(r#"type="submit" disabled>Extract Text"#));
        assert!(!html.contains("Uploaded Image"));
    }

    #[test]
    fn test_selected_image_preview() {
        let image = UploadedImage::accept("photo.png", sample_png(3, 2)).unwrap();
        let html = render_page(&SessionState::Empty, &inputs(Some(&image), None));

        assert!(html.contains("src=\"data:image/png;base64,"));
        assert!(html.contains("width=\"3\" height=\"2\""));
        assert!(html.contains("<figcaption>Uploaded Image</figcaption>"));
        assert!(html.contains(r#"type="submit">Extract Text"#));
    }

    #[test]
    fn test_error_notice_alongside_previous_result() {
        let state = SessionState::HasResult("# HELLO".to_string());
        let notice = Notice::Error("Error processing image: <timeout>".to_string());
        let html = render_page(&state, &inputs(None, Some(&notice)));

        assert!(html.contains("notice error"));
        assert!(html.contains("Error processing image: &lt;timeout&gt;"));
        assert!(html.contains("<h1>HELLO</h1>"));
    }

    #[test]
    fn test_upload_control_restricted() {
        let html = render_page(&SessionState::Empty, &inputs(None, None));
        assert!(html.contains(r#"accept=".png,.jpg,.jpeg""#));
        assert!(html.contains(BUSY_MESSAGE));
    }

    #[test]
    fn test_header_icon_and_logo() {
        let html = render_page(&SessionState::Empty, &inputs(None, None));
        assert!(html.contains("<link rel=\"icon\" href=\"data:image/svg+xml,"));
        assert!(html.contains("<h1>🔎 Gemma-3 OCR</h1>"));

        let logo = "data:image/jpeg;base64,/9j/";
        let with_logo = ViewInputs { logo: Some(logo), ..inputs(None, None) };
        let html = render_page(&SessionState::Empty, &with_logo);
        assert!(html.contains("<h1><img src=\"data:image/jpeg;base64,/9j/\" width=\"50\" alt=\"\"> Gemma-3 OCR</h1>"));
    }

    #[test]
    fn test_render_is_pure() {
        let state = SessionState::HasResult("- a\n- b".to_string());
        let a = render_page(&state, &inputs(None, None));
        let b = render_page(&state, &inputs(None, None));
        assert_eq!(a, b);
    }
}
