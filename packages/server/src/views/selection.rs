use std::fmt::Write;

use crate::flash::FlashMessage;
use crate::models::property::{PropertySummary, format_number};
use crate::utils::escape;

use super::{edit_href, layout, portfolio_href};

pub fn portfolio_page(company_id: i32, portfolios: &[String], flashes: &[FlashMessage]) -> String {
    let mut body = String::from("<h1>Select a Portfolio</h1>\n");

    if portfolios.is_empty() {
        let _ = writeln!(
            body,
            "<p class=\"muted\">No portfolios found for company {company_id}.</p>"
        );
    } else {
        body.push_str("<ul class=\"portfolios\">\n");
        for portfolio in portfolios {
            let _ = writeln!(
                body,
                "<li><a href=\"{}\">{}</a></li>",
                portfolio_href(portfolio),
                escape::html(portfolio)
            );
        }
        body.push_str("</ul>");
    }

    layout("Portfolios", flashes, &body)
}

pub fn property_page(
    portfolio_id: &str,
    properties: &[PropertySummary],
    flashes: &[FlashMessage],
) -> String {
    let text = |v: &Option<String>| v.as_deref().map(escape::html).unwrap_or_default();

    let mut body = format!(
        "<p><a href=\"/\">&larr; Portfolios</a></p>\n<h1>Portfolio {}</h1>\n\
         <table>\n<thead><tr><th>Property</th><th>Address</th><th>City</th>\
         <th>Units</th><th>Class</th><th></th></tr></thead>\n<tbody>\n",
        escape::html(portfolio_id)
    );

    for p in properties {
        let name = match &p.property_name {
            Some(name) => escape::html(name),
            None => escape::html(&p.property_id),
        };
        let _ = writeln!(
            body,
            "<tr><td>{name}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"{}\">Edit</a></td></tr>",
            text(&p.property_address),
            text(&p.city),
            p.unit_count.map(format_number).unwrap_or_default(),
            text(&p.building_class),
            edit_href(portfolio_id, &p.property_id),
        );
    }
    body.push_str("</tbody>\n</table>");

    layout(&format!("Portfolio {portfolio_id}"), flashes, &body)
}
