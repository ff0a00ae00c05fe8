//! Loading the flat menu structure of a book.

use bookkit_client::{RetryingInvoker, Session, Transport, UseCase, use_case_uri};
use bookkit_core::Menu;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::error::{AppError, AppResult};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookStructure {
    item_map: Menu,
}

/// Fetch the menu of the book at `book_uri` with a single unretried read.
///
/// # Errors
///
/// Returns [`AppError::Remote`] when the read fails and
/// [`AppError::MenuDecode`] when the body carries no usable `itemMap`.
pub async fn load_menu<T: Transport>(
    invoker: &RetryingInvoker<T>,
    book_uri: &Url,
    session: &Session,
) -> AppResult<Menu> {
    let operation = UseCase::GetBookStructure.as_str();
    let uri = use_case_uri(book_uri, UseCase::GetBookStructure)
        .map_err(|source| AppError::remote(operation, source))?;
    let body = invoker
        .get(&uri, None, session)
        .await
        .map_err(|source| AppError::remote(operation, source))?;

    let menu = decode_menu(body)?;
    info!(pages = menu.len(), "loaded book structure");
    Ok(menu)
}

/// Accepts the structure either at the top level of the body or wrapped in a
/// `data` envelope.
fn decode_menu(body: Value) -> AppResult<Menu> {
    let body = match body {
        Value::Object(mut fields) if !fields.contains_key("itemMap") => {
            fields.remove("data").unwrap_or(Value::Object(fields))
        }
        other => other,
    };
    serde_json::from_value::<BookStructure>(body)
        .map(|structure| structure.item_map)
        .map_err(|source| AppError::MenuDecode { source })
}
