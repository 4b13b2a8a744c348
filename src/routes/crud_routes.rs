use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};

use crate::controllers::{CrudController, Submission};
use crate::dto::{ApiResponse, FormView};
use crate::middleware::AntiforgeryCookie;
use crate::models::Entity;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};

/// Router CRUD de una entidad, montado bajo `/<E::ROUTE>`
pub fn create_crud_router<E: Entity>() -> Router<AppState> {
    Router::new()
        .route("/", get(index::<E>))
        .route("/Index", get(index::<E>))
        .route("/Details", get(details::<E>))
        .route("/Details/:id", get(details::<E>))
        .route("/Create", get(create_form::<E>).post(create::<E>))
        .route("/Edit", get(edit_form::<E>))
        .route("/Edit/:id", get(edit_form::<E>).post(edit::<E>))
        .route("/Delete", get(delete_form::<E>))
        .route("/Delete/:id", get(delete_form::<E>).post(delete_confirmed::<E>))
}

fn index_location<E: Entity>() -> String {
    format!("/{}", E::ROUTE)
}

fn controller<E: Entity>(state: &AppState) -> CrudController<E> {
    CrudController::new(state.context())
}

/// Formulario enlazado o 400 si ni siquiera se puede interpretar
fn bound_form<F>(form: Result<Form<F>, FormRejection>) -> Result<F, AppError> {
    form.map(|Form(form)| form)
        .map_err(|rejection| bad_request_error(&rejection.body_text()))
}

fn submission_response<E: Entity>(
    state: &AppState,
    cookie: AntiforgeryCookie,
    submission: Submission<E::Form, E>,
) -> Result<Response, AppError> {
    match submission {
        Submission::Saved(_) => Ok(Redirect::to(&index_location::<E>()).into_response()),
        Submission::Invalid { form, errors } => {
            let view = FormView::invalid(cookie.token(state)?, form, errors);
            cookie.attach(state, (StatusCode::UNPROCESSABLE_ENTITY, Json(view)))
        }
    }
}

/// Vista de formulario con un token para la cookie del cliente
fn form_view<T: serde::Serialize>(
    state: &AppState,
    cookie: AntiforgeryCookie,
    record: Option<T>,
) -> Result<Response, AppError> {
    let token = cookie.token(state)?;
    let view = match record {
        Some(record) => FormView::with_record(token, record),
        None => FormView::empty(token),
    };
    cookie.attach(state, Json(view))
}

async fn index<E: Entity>(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<E>>>, AppError> {
    let rows = controller::<E>(&state).index().await?;
    Ok(Json(ApiResponse::success(rows)))
}

async fn details<E: Entity>(
    State(state): State<AppState>,
    id: Option<Path<E::Key>>,
) -> Result<Json<ApiResponse<E>>, AppError> {
    let record = controller::<E>(&state)
        .details(id.map(|Path(id)| id))
        .await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn create_form<E: Entity>(
    State(state): State<AppState>,
    cookie: AntiforgeryCookie,
) -> Result<Response, AppError> {
    form_view::<E::Form>(&state, cookie, None)
}

async fn create<E: Entity>(
    State(state): State<AppState>,
    cookie: AntiforgeryCookie,
    form: Result<Form<E::Form>, FormRejection>,
) -> Result<Response, AppError> {
    let form = bound_form(form)?;
    let submission = controller::<E>(&state).create(form).await?;
    submission_response::<E>(&state, cookie, submission)
}

async fn edit_form<E: Entity>(
    State(state): State<AppState>,
    cookie: AntiforgeryCookie,
    id: Option<Path<E::Key>>,
) -> Result<Response, AppError> {
    let record = controller::<E>(&state)
        .edit_form(id.map(|Path(id)| id))
        .await?;
    form_view(&state, cookie, Some(record))
}

async fn edit<E: Entity>(
    State(state): State<AppState>,
    cookie: AntiforgeryCookie,
    Path(id): Path<E::Key>,
    form: Result<Form<E::Form>, FormRejection>,
) -> Result<Response, AppError> {
    let form = bound_form(form)?;
    let submission = controller::<E>(&state).edit(id, form).await?;
    submission_response::<E>(&state, cookie, submission)
}

async fn delete_form<E: Entity>(
    State(state): State<AppState>,
    cookie: AntiforgeryCookie,
    id: Option<Path<E::Key>>,
) -> Result<Response, AppError> {
    let record = controller::<E>(&state)
        .delete_form(id.map(|Path(id)| id))
        .await?;
    form_view(&state, cookie, Some(record))
}

async fn delete_confirmed<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<E::Key>,
) -> Result<Redirect, AppError> {
    controller::<E>(&state).delete_confirmed(id).await?;
    Ok(Redirect::to(&index_location::<E>()))
}
