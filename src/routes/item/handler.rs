use axum::{
    extract::{Extension, Form, Path, State, rejection::FormRejection},
    response::{Html, IntoResponse, Redirect, Response},
};

use super::model::ItemForm;
use crate::{
    AppState,
    error::{PageError, rerender_or_fail},
    middleware::AuthenticatedContext,
    services::ItemInput,
    views::{self, ItemFormValues},
};

pub async fn index() -> Redirect {
    Redirect::to("/crud")
}

#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
) -> Result<Html<String>, PageError> {
    let items = state.items.list().await?;
    Ok(views::crud_page(&context.username, &items))
}

pub async fn create_form() -> Html<String> {
    views::create_page(&ItemFormValues::default(), None)
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
    form: Result<Form<ItemForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return rerender_or_fail(rejection.into(), |message| {
                views::create_page(&ItemFormValues::default(), Some(message))
            });
        }
    };
    let values = form.values();

    let result = match ItemInput::try_from(form) {
        Ok(input) => state.items.create(input, Some(context.user_id)).await.map(drop),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => Redirect::to("/crud").into_response(),
        Err(e) => rerender_or_fail(e, |message| views::create_page(&values, Some(message))),
    }
}

#[axum::debug_handler]
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let item = state.items.get(&id).await?;
    Ok(views::update_page(&id, &ItemFormValues::from(&item), None))
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<ItemForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return rerender_or_fail(rejection.into(), |message| {
                views::update_page(&id, &ItemFormValues::default(), Some(message))
            });
        }
    };
    let values = form.values();

    let result = match ItemInput::try_from(form) {
        Ok(input) => state.items.update(&id, input).await.map(drop),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => Redirect::to("/crud").into_response(),
        Err(e) => rerender_or_fail(e, |message| views::update_page(&id, &values, Some(message))),
    }
}

#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, PageError> {
    state.items.delete(&id).await?;
    Ok(Redirect::to("/crud"))
}
