//! Server-rendered HTML pages.

pub mod edit;
pub mod error;
pub mod selection;

use crate::flash::FlashMessage;
use crate::utils::escape;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f6f7f9;color:#1f2933}\
header{background:#243b53;padding:.75rem 1.5rem}\
header a{color:#fff;text-decoration:none;font-weight:600}\
main{max-width:960px;margin:1.5rem auto;padding:0 1rem}\
.flash{padding:.6rem 1rem;border-radius:4px;margin-bottom:.75rem}\
.flash-success{background:#e3f9e5}.flash-info{background:#e6f6ff}\
.flash-warning{background:#fffbea}.flash-error{background:#ffe3e3}\
table{border-collapse:collapse;width:100%;background:#fff}\
th,td{text-align:left;padding:.5rem;border-bottom:1px solid #d9e2ec}\
fieldset,details{background:#fff;border:1px solid #d9e2ec;border-radius:4px;margin-bottom:1rem;padding:1rem}\
summary{font-weight:600;cursor:pointer}\
label{display:block;margin:.5rem 0}\
label span{display:inline-block;width:10rem}\
.muted{color:#627d98}";

/// Wrap page content in the shared chrome, rendering any pending flash messages.
pub fn layout(title: &str, flashes: &[FlashMessage], body: &str) -> String {
    let flashes: String = flashes
        .iter()
        .map(|f| {
            format!(
                "<div class=\"flash flash-{}\">{}</div>\n",
                f.category.as_str(),
                escape::html(&f.message)
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
<title>{title} · Property Editor</title>
<style>{STYLE}</style>
</head>
<body>
<header><a href=\"/\">Property Editor</a></header>
<main>
{flashes}{body}
</main>
</body>
</html>
",
        title = escape::html(title),
    )
}

/// `/portfolio/{portfolio_id}`
pub fn portfolio_href(portfolio_id: &str) -> String {
    format!("/portfolio/{}", escape::path_segment(portfolio_id))
}

/// `/edit/{portfolio_id}/{property_id}`
pub fn edit_href(portfolio_id: &str, property_id: &str) -> String {
    format!(
        "/edit/{}/{}",
        escape::path_segment(portfolio_id),
        escape::path_segment(property_id)
    )
}

/// `/update/{portfolio_id}/{property_id}`
pub fn update_href(portfolio_id: &str, property_id: &str) -> String {
    format!(
        "/update/{}/{}",
        escape::path_segment(portfolio_id),
        escape::path_segment(property_id)
    )
}
