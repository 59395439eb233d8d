use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    let page = error_view(
        "Não encontrado",
        "404",
        "Página não encontrada.",
        "Confira o endereço ou volte para a página inicial.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
