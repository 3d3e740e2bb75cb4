use crate::flash::FlashMessage;
use crate::utils::escape;

use super::layout;

pub fn page(message: &str, flashes: &[FlashMessage]) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to portfolios</a></p>",
        escape::html(message)
    );
    layout("Error", flashes, &body)
}
