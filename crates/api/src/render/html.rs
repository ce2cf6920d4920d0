//! Server-side HTML for the project pages.
//!
//! Every value taken from the view context is escaped with `html-escape`
//! before it reaches the page.

use std::fmt::Write;

use axum::response::{Html, IntoResponse, Response};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;

use super::{PageRenderer, RenderError, View, DETAIL, FORM, LIST};

/// Form fields in display order, with their labels.
const FORM_FIELDS: &[(&str, &str)] = &[
    ("name", "Name"),
    ("category", "Category"),
    ("uri", "URI"),
    ("home", "Home page"),
    ("doc", "Documentation"),
    ("download", "Download"),
    ("src", "Source"),
    ("logo", "Logo"),
    ("repo", "Repository"),
    ("author", "Author"),
    ("licence", "Licence"),
    ("lang", "Language"),
    ("os", "Operating system"),
    ("tags", "Tags"),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl PageRenderer for HtmlRenderer {
    fn render(&self, view: &View) -> Result<Response, RenderError> {
        let (title, body) = match view.template {
            LIST => ("Open source projects".to_string(), list_page(view)),
            FORM => ("Publish a project".to_string(), form_page(view)),
            DETAIL => {
                let name = str_field(view.get("project"), "name");
                (name, detail_page(view))
            }
            other => return Err(RenderError::UnknownTemplate(other.to_string())),
        };
        Ok(Html(layout(&title, view, &body)).into_response())
    }
}

fn layout(title: &str, view: &View, body: &str) -> String {
    let nav = view
        .get("active_nav")
        .and_then(Value::as_str)
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n\
         <body data-nav=\"{}\">\n{}</body>\n</html>\n",
        encode_text(title),
        encode_double_quoted_attribute(nav),
        body
    )
}

fn list_page(view: &View) -> String {
    let mut out = String::from("<ul class=\"projects\">\n");
    let likeflags = view.get("likeflags").and_then(Value::as_object);

    for project in view
        .get("projects")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        let id = project.get("id").and_then(Value::as_i64).unwrap_or_default();
        let liked = likeflags
            .and_then(|flags| flags.get(&id.to_string()))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let _ = writeln!(
            out,
            "<li data-id=\"{id}\"><a href=\"/p/{}\">{}</a> <span class=\"category\">{}</span> \
             <span class=\"likes{}\">{}</span></li>",
            encode_double_quoted_attribute(&str_field(Some(project), "uri")),
            encode_text(&str_field(Some(project), "name")),
            encode_text(&str_field(Some(project), "category")),
            if liked { " liked" } else { "" },
            int_field(Some(project), "likenum"),
        );
    }
    out.push_str("</ul>\n");

    if let Some(page) = view.get("page") {
        out.push_str("<nav class=\"pager\">\n");
        if page.get("has_prev").and_then(Value::as_bool) == Some(true) {
            let _ = writeln!(
                out,
                "<a rel=\"prev\" href=\"/projects?lastid={}\">Previous</a>",
                int_field(Some(page), "prev_id")
            );
        }
        if page.get("has_next").and_then(Value::as_bool) == Some(true) {
            let _ = writeln!(
                out,
                "<a rel=\"next\" href=\"/projects?lastid={}\">Next</a>",
                int_field(Some(page), "next_id")
            );
        }
        out.push_str("</nav>\n");
    }
    out
}

fn form_page(view: &View) -> String {
    let project = view.get("project").filter(|p| p.is_object());
    let action = match project.and_then(|p| p.get("id")).and_then(Value::as_i64) {
        Some(id) => format!("/project/modify?id={id}"),
        None => "/project/new".to_string(),
    };

    let mut out = format!(
        "<form method=\"post\" action=\"{}\">\n",
        encode_double_quoted_attribute(&action)
    );
    for (field, label) in FORM_FIELDS {
        let _ = writeln!(
            out,
            "<label>{label} <input name=\"{field}\" value=\"{}\"></label>",
            encode_double_quoted_attribute(&str_field(project, field)),
        );
    }
    let _ = writeln!(
        out,
        "<label>Description <textarea name=\"description\">{}</textarea></label>",
        encode_text(&str_field(project, "description"))
    );
    out.push_str("<button type=\"submit\">Submit</button>\n</form>\n");
    out
}

fn detail_page(view: &View) -> String {
    let project = view.get("project");
    let mut out = format!(
        "<article class=\"project\">\n<h1>{}</h1>\n<p class=\"description\">{}</p>\n",
        encode_text(&str_field(project, "name")),
        encode_text(&str_field(project, "description")),
    );

    out.push_str("<ul class=\"links\">\n");
    for (field, label) in [("home", "Home page"), ("doc", "Documentation"), ("src", "Source")] {
        let href = str_field(project, field);
        if !href.is_empty() {
            let _ = writeln!(
                out,
                "<li><a href=\"{}\">{label}</a></li>",
                encode_double_quoted_attribute(&href)
            );
        }
    }
    out.push_str("</ul>\n");

    let flag = |key: &str| view.get(key).and_then(Value::as_bool) == Some(true);
    let _ = writeln!(
        out,
        "<p class=\"stats\">Views {} &middot; Likes <span class=\"likes{}\">{}</span> \
         &middot; Comments {}{}</p>",
        int_field(project, "viewnum"),
        if flag("likeflag") { " liked" } else { "" },
        int_field(project, "likenum"),
        int_field(project, "cmtnum"),
        if flag("hadcollect") {
            " &middot; <span class=\"collected\">In favorites</span>"
        } else {
            ""
        },
    );

    if let Some(users) = view.get("view_user_num").and_then(Value::as_i64) {
        let _ = writeln!(out, "<section class=\"analytics\">\n<p>Signed-in viewers: {users}</p>");
        if let Some(source) = view.get("view_source").filter(|s| s.is_object()) {
            out.push_str("<ul class=\"sources\">\n");
            for key in ["google", "baidu", "bing", "sogou", "so", "other"] {
                let _ = writeln!(out, "<li>{key}: {}</li>", int_field(Some(source), key));
            }
            out.push_str("</ul>\n");
        }
        out.push_str("</section>\n");
    }

    out.push_str("</article>\n");
    out
}

fn str_field(value: Option<&Value>, key: &str) -> String {
    value
        .and_then(|v| v.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn int_field(value: Option<&Value>, key: &str) -> i64 {
    value
        .and_then(|v| v.get(key))
        .and_then(Value::as_i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::header::CONTENT_TYPE;
    use http_body_util::BodyExt;
    use serde_json::json;

    use super::*;

    async fn render_to_string(view: &View) -> String {
        let response = HtmlRenderer.render(view).unwrap();
        assert!(response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn list_escapes_names_and_links_pages() {
        let view = View::new(LIST)
            .with(
                "projects",
                json!([{"id": 7, "uri": "gin", "name": "<b>Gin</b>", "category": "web", "likenum": 2}]),
            )
            .unwrap()
            .with(
                "page",
                json!({"has_prev": false, "prev_id": 0, "has_next": true, "next_id": 7}),
            )
            .unwrap()
            .with("likeflags", json!({"7": true}))
            .unwrap();

        let html = render_to_string(&view).await;
        assert!(html.contains("&lt;b&gt;Gin&lt;/b&gt;"));
        assert!(!html.contains("<b>Gin</b>"));
        assert!(html.contains("href=\"/p/gin\""));
        assert!(html.contains("class=\"likes liked\""));
        assert!(html.contains("/projects?lastid=7"));
        assert!(!html.contains("rel=\"prev\""));
    }

    #[tokio::test]
    async fn form_targets_modify_when_editing() {
        let blank = render_to_string(&View::new(FORM)).await;
        assert!(blank.contains("action=\"/project/new\""));

        let view = View::new(FORM)
            .with("project", json!({"id": 3, "name": "say \"hi\""}))
            .unwrap();
        let html = render_to_string(&view).await;
        assert!(html.contains("action=\"/project/modify?id=3\""));
        assert!(html.contains("value=\"say &quot;hi&quot;\""));
    }

    #[tokio::test]
    async fn detail_shows_analytics_only_when_present() {
        let base = View::new(DETAIL)
            .with("project", json!({"name": "Gin", "viewnum": 11}))
            .unwrap();
        let html = render_to_string(&base).await;
        assert!(html.contains("Views 11"));
        assert!(!html.contains("analytics"));

        let owner = base
            .with("view_user_num", 4)
            .unwrap()
            .with("view_source", json!({"google": 2}))
            .unwrap();
        let html = render_to_string(&owner).await;
        assert!(html.contains("Signed-in viewers: 4"));
        assert!(html.contains("<li>google: 2</li>"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let err = HtmlRenderer.render(&View::new("nope.html")).unwrap_err();
        assert_matches!(err, RenderError::UnknownTemplate(name) if name == "nope.html");
    }
}
