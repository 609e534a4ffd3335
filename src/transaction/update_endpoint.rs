//! Defines the endpoint for moving a transaction to another category.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::{ALERT_DISMISS_AFTER, Alert},
    category::{Category, get_all_categories},
    database_id::{CategoryId, TransactionId},
};

use super::{
    Transaction,
    core::{TransactionUpdate, get_transaction, update_transaction},
    view::transaction_row,
};

/// The state needed to change the category of a transaction.
#[derive(Debug, Clone)]
pub struct UpdateCategoryState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    /// The new category, empty for uncategorized.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// Move a transaction to the category in the form.
///
/// Responds with the updated table row and a message that disappears after a
/// few seconds. On failure only the message is sent, the row is left as is.
pub async fn update_transaction_category_endpoint(
    State(state): State<UpdateCategoryState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<CategoryForm>,
) -> Response {
    match set_category(transaction_id, form.category_id, &state.db_connection) {
        Ok((transaction, categories)) => {
            let alert = Alert::SuccessSimple {
                message: "Category updated successfully".to_owned(),
            };

            updated_row_view(&transaction, &categories, alert).into_response()
        }
        Err(error) => {
            tracing::error!(
                "Could not set category of transaction {transaction_id} to {:?}: {error}",
                form.category_id
            );
            let (status_code, alert) = error.into_status_and_alert();

            (
                status_code,
                [("hx-reswap", "none")],
                alert.into_transient_html(ALERT_DISMISS_AFTER),
            )
                .into_response()
        }
    }
}

fn set_category(
    transaction_id: TransactionId,
    category_id: Option<CategoryId>,
    db_connection: &Mutex<Connection>,
) -> Result<(Transaction, Vec<Category>), Error> {
    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection)?;
    let update = TransactionUpdate {
        category_id,
        ..TransactionUpdate::from(&transaction)
    };
    let transaction = update_transaction(transaction_id, update, &connection)?;
    let categories = get_all_categories(&connection)?;

    Ok((transaction, categories))
}

fn updated_row_view(transaction: &Transaction, categories: &[Category], alert: Alert) -> Markup {
    html! {
        (transaction_row(transaction, categories))
        (alert.into_transient_html(ALERT_DISMISS_AFTER))
    }
}
