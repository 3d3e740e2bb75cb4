use std::fmt::Write;

use crate::entity::property_input;
use crate::flash::FlashMessage;
use crate::models::property::{EditableField, FieldKind, Section};
use crate::utils::escape;

use super::{layout, portfolio_href, update_href};

/// The edit form. The Header section is always shown; later sections are
/// collapsible and start open so every field is visible on first load.
pub fn page(
    property: &property_input::Model,
    dashboard_url: Option<&str>,
    flashes: &[FlashMessage],
) -> String {
    let display_name = property
        .property_name
        .as_deref()
        .unwrap_or(&property.property_id);

    let mut body = format!(
        "<p><a href=\"{}\">&larr; Portfolio {}</a></p>\n<h1>{}</h1>\n",
        portfolio_href(&property.portfolio_id),
        escape::html(&property.portfolio_id),
        escape::html(display_name),
    );

    let updated = property
        .staging_loaded_at
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".into());
    let _ = writeln!(
        body,
        "<p class=\"muted\">Property {} · Last updated {updated}</p>",
        escape::html(&property.property_id)
    );

    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"{}\">",
        update_href(&property.portfolio_id, &property.property_id)
    );

    for section in Section::ALL {
        let (open, close) = match section {
            Section::Header => (
                format!("<fieldset>\n<legend>{}</legend>\n", section.title()),
                "</fieldset>\n",
            ),
            _ => (
                format!("<details open>\n<summary>{}</summary>\n", section.title()),
                "</details>\n",
            ),
        };
        body.push_str(&open);
        for field in EditableField::ALL.into_iter().filter(|f| f.section() == section) {
            body.push_str(&input(field, property));
        }
        body.push_str(close);
    }

    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");

    if let Some(url) = dashboard_url {
        let _ = writeln!(
            body,
            "<p><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Open dashboard</a></p>",
            escape::html(url)
        );
    }

    layout(display_name, flashes, &body)
}

fn input(field: EditableField, property: &property_input::Model) -> String {
    let mode = match field.kind() {
        FieldKind::Text => "",
        FieldKind::Numeric => " inputmode=\"decimal\"",
    };
    format!(
        "<label><span>{label}</span><input type=\"text\" name=\"{name}\" value=\"{value}\"{mode}></label>\n",
        label = field.label(),
        name = field.name(),
        value = escape::html(&field.display_value(property)),
    )
}
