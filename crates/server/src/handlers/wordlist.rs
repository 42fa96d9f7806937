//! PDF word-list extraction endpoints.
//!
//! A self-contained HTML tool: the form and its results render on the same
//! page, and failures are reported inline rather than as API errors.

use crate::metrics::WORDLISTS_PARSED;
use axum::extract::Multipart;
use axum::response::Html;
use bytes::Bytes;
use splitpack_core::wordlist::parse_word_list;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>PDF word-list extractor</title>
    <style>
        body { font-family: sans-serif; margin: 2em; line-height: 1.6; }
        .container { max-width: 600px; margin: auto; padding: 2em; border: 1px solid #ccc; border-radius: 8px; }
        input[type="file"] { margin-bottom: 1em; }
        input[type="submit"] { padding: 0.5em 1em; }
        pre { background-color: #f4f4f4; padding: 1em; border-radius: 4px; overflow-x: auto; }
        .error { color: #b00; }
        h1, h2 { color: #333; }
    </style>
</head>
<body>
    <div class="container">
        <h1>PDF word-list extractor</h1>
        <p>Upload a PDF to extract English words and their Japanese meanings.</p>
        <form action="/wordlist" method="post" enctype="multipart/form-data">
            <label for="pdf_file">Choose a file:</label><br>
            <input type="file" name="pdf_file" id="pdf_file" accept=".pdf"><br>
            <input type="submit" value="Upload and extract">
        </form>
        {{content}}
    </div>
</body>
</html>
"#;

fn render(content: &str) -> Html<String> {
    Html(PAGE_TEMPLATE.replace("{{content}}", content))
}

fn render_error(message: &str) -> Html<String> {
    render(&format!("<p class=\"error\">{message}</p>"))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// GET /wordlist - Upload form.
pub async fn wordlist_form() -> Html<String> {
    render("")
}

/// POST /wordlist - Extract a word list from an uploaded PDF.
///
/// Accepts only `.pdf`-suffixed filenames in the `pdf_file` field.
#[tracing::instrument(skip_all)]
pub async fn wordlist_extract(mut multipart: Multipart) -> Html<String> {
    let mut upload: Option<(String, Bytes)> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("pdf_file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(data) => upload = Some((filename, data)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read pdf_file field");
                        return render_error("The upload could not be read.");
                    }
                }
            }
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid multipart body");
                return render_error("The upload could not be read.");
            }
        }
    }

    let Some((filename, data)) = upload else {
        return render_error("No file was selected.");
    };
    if filename.is_empty() || data.is_empty() {
        return render_error("No file was selected.");
    }
    if !filename.ends_with(".pdf") {
        return render_error("Only PDF files can be uploaded.");
    }

    let text = match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "PDF text extraction failed");
            return render_error("The PDF could not be parsed.");
        }
        Err(e) => {
            tracing::error!(error = %e, "PDF extraction task panicked");
            return render_error("The PDF could not be parsed.");
        }
    };

    let entries = parse_word_list(&text);
    WORDLISTS_PARSED.inc();
    tracing::debug!(entries = entries.len(), "Word list extracted");

    render(&format!(
        "<h2>Extracted word list</h2><pre>{}</pre>",
        escape_html(&entries.join("\n"))
    ))
}
